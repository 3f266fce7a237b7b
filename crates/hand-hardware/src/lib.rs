//! `hand-hardware`
//!
//! Turns a hand request into a connected driver. The [`HandFactory`] validates
//! the hand id, picks the driver family for the model and transport, opens the
//! transport through an injected [`hand_core::TransportOpener`] and returns the
//! driver as a `Box<dyn Hand>`.
//!
//! Modbus requests are routed to the L10 Modbus RTU driver when the `modbus`
//! feature is enabled and fail with `FeatureDisabled` otherwise.

pub mod factory;

pub use factory::{select_driver, DriverKind, HandFactory, HandRequest};
