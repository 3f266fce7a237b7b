//! Shared infrastructure for the simulated bus.
//!
//! - **faults**: scripted and random fault injection
//! - **rng**: seeded random number generator

pub mod faults;
pub mod rng;

pub use faults::{FaultPlan, FaultScenario};
pub use rng::SimRng;
