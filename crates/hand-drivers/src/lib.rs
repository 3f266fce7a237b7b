//! Concrete LinkerHand drivers.
//!
//! One driver per model family, each implementing [`hand_core::Hand`] over an
//! owned [`hand_core::FrameTransport`]:
//!
//! - [`L6Hand`]: L6 and O6
//! - [`L7Hand`]: L7
//! - [`L10Hand`]: L10 on CAN or EtherCAT
//! - [`L20Hand`]: L20
//! - [`L25Hand`]: L25 and L21, selected by [`L25Variant`]
//! - `ModbusL10Hand`: L10 over Modbus RTU (feature `modbus`)
//!
//! Drivers are normally built by the factory in `hand-hardware`; constructing
//! one directly is useful with a simulated transport:
//!
//! ```rust,ignore
//! let bus = hand_driver_mock::SimulatedBus::new();
//! let identity = HandIdentity::new(HandModel::L10, Handedness::Left, TransportKind::Can0);
//! let mut hand = L10Hand::new(identity, Box::new(bus.hand(TransportKind::Can0)))?;
//! hand.set_joint_angles(&[0.0; 10]).await?;
//! ```

mod l10;
mod l20;
mod l25;
mod l6;
mod l7;
#[cfg(feature = "modbus")]
pub mod modbus_l10;
pub mod protocol;

pub use l10::{L10Hand, L10_COMMANDS};
pub use l20::{L20Hand, L20_COMMANDS};
pub use l25::{L25Hand, L25Variant, L25_COMMANDS};
pub use l6::{L6Hand, L6_COMMANDS};
pub use l7::{L7Hand, L7_COMMANDS};
#[cfg(feature = "modbus")]
pub use modbus_l10::ModbusL10Hand;
pub use protocol::{CommandSet, Register, Segment};
