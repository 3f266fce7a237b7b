//! `hand-core`
//!
//! Core types for LinkerHand dexterous hands: identity enums, the bus
//! [`Frame`], per-model joint limit tables, the raw/angle conversion engine,
//! the [`Hand`] capability trait and the [`FrameTransport`] seam drivers talk
//! through.
//!
//! ## Key Types
//!
//! - [`HandModel`], [`Handedness`], [`TransportKind`]: what a hand is
//! - [`JointLimitTable`]: static per-joint `(min, max, direction)` records
//! - [`Hand`]: async capability contract every driver implements
//! - [`HandError`]: the single error type of the stack
//!
//! ## Example
//!
//! ```rust
//! use hand_core::{conversion, HandModel, Handedness};
//!
//! let angles = conversion::raw_to_angle(HandModel::L10, Handedness::Left, &[128; 10])?;
//! let raw = conversion::angle_to_raw(HandModel::L10, Handedness::Left, &angles)?;
//! assert_eq!(raw.len(), 10);
//! # Ok::<(), hand_core::HandError>(())
//! ```

pub mod capabilities;
pub mod config;
pub mod conversion;
pub mod error;
pub mod frame;
pub mod limits;
pub mod model;
pub mod transport;

pub use capabilities::{FingerReading, Hand, SensorSnapshot, FINGER_COUNT, FINGER_NAMES};
pub use config::{ChannelNames, HandSettings};
pub use error::{HandError, HandResult, TransportError};
pub use frame::{Frame, MAX_FRAME_LEN};
pub use limits::{resolve_limit_table, Direction, JointLimit, JointLimitTable};
pub use model::{DriverFamily, HandIdentity, HandModel, Handedness, TransportKind};
pub use transport::{FrameTransport, TransportEndpoint, TransportOpener};
