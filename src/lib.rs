//! # LinkerHand
//!
//! Hardware abstraction layer for LinkerHand dexterous robotic hands. This
//! crate re-exports the workspace crates under one roof and hosts the
//! `linker-hand` command-line tool.
//!
//! ## Crate Structure
//!
//! - **`core`** (`hand-core`): identity enums, the bus frame, per-model joint
//!   limit tables, the raw/angle conversion engine, the `Hand` trait and the
//!   transport seam.
//! - **`drivers`** (`hand-drivers`): one driver per model family, plus the
//!   Modbus L10 driver behind the `modbus` feature.
//! - **`hardware`** (`hand-hardware`): the `HandFactory`.
//! - **`mock`** (`hand-driver-mock`): a simulated bus with fault injection.
//!
//! ## Example
//!
//! ```rust,no_run
//! use linker_hand::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn demo() -> HandResult<()> {
//! let bus = SimulatedBus::new();
//! let factory = HandFactory::new(Arc::new(bus), HandSettings::default());
//! let mut hand = factory.create_hand(HandModel::L10, 0x28, TransportKind::Can0).await?;
//! hand.set_joint_angles(&[0.2; 10]).await?;
//! let angles = hand.read_joint_angles().await?;
//! # Ok(())
//! # }
//! ```

pub use hand_core as core;
pub use hand_driver_mock as mock;
pub use hand_drivers as drivers;
pub use hand_hardware as hardware;

/// Common imports for applications.
pub mod prelude {
    pub use hand_core::conversion::{angle_to_raw, raw_to_angle};
    pub use hand_core::{
        Hand, HandError, HandIdentity, HandModel, HandResult, HandSettings, Handedness,
        SensorSnapshot, TransportKind,
    };
    pub use hand_driver_mock::SimulatedBus;
    pub use hand_hardware::{HandFactory, HandRequest};
}
