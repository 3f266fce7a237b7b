//! Simulated LinkerHand bus for tests and demos.
//!
//! [`SimulatedBus`] implements [`hand_core::TransportOpener`] and hands out
//! [`SimulatedHand`] transports that emulate the hand firmware: CAN-framed
//! register writes and queries, and Modbus RTU holding/input registers. Faults
//! are injected through a [`FaultPlan`].
//!
//! ```rust,ignore
//! use hand_driver_mock::{FaultPlan, FaultScenario, SimulatedBus};
//!
//! let bus = SimulatedBus::with_faults(FaultPlan::scenario(
//!     FaultScenario::CommunicationLoss { after: 10 },
//! ));
//! let factory = HandFactory::new(Arc::new(bus.clone()), HandSettings::default());
//! ```

pub mod common;
mod registers;
mod simulated_hand;

pub use common::{FaultPlan, FaultScenario, SimRng};
pub use simulated_hand::{SimulatedBus, SimulatedHand};
