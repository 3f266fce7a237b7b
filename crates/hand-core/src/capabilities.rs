//! Hand capability interface.
//!
//! Every driver implements [`Hand`]. Callers hold a `Box<dyn Hand>` returned by
//! the factory and never see the concrete type.
//!
//! Required methods cover what every LinkerHand model supports: joint
//! position in raw and angle units and the fingertip sensor block. Optional
//! capabilities (speed, torque, temperatures, faults, version) have default
//! implementations that fail with [`HandError::Unsupported`]; variants that
//! offer them override the default.
//!
//! # Example
//!
//! ```rust,ignore
//! async fn open_and_close(hand: &mut dyn Hand) -> HandResult<()> {
//!     let open = vec![0.0; hand.limits().joint_count()];
//!     hand.set_joint_angles(&open).await?;
//!     let pose = hand.read_joint_angles().await?;
//!     tracing::info!(?pose, "hand opened");
//!     Ok(())
//! }
//! ```

use crate::conversion::{angle_to_raw, raw_to_angle};
use crate::error::{HandError, HandResult};
use crate::limits::JointLimitTable;
use crate::model::HandIdentity;
use async_trait::async_trait;

/// Fingers in sensor order.
pub const FINGER_NAMES: [&str; 5] = ["thumb", "index", "middle", "ring", "little"];

/// Number of fingers reported by a sensor read.
pub const FINGER_COUNT: usize = FINGER_NAMES.len();

// =============================================================================
// Sensor Data
// =============================================================================

/// One fingertip sensor sweep, one byte per finger per channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SensorSnapshot {
    /// Normal force per finger.
    pub normal_force: [u8; FINGER_COUNT],
    /// Tangential force magnitude per finger.
    pub tangential_force: [u8; FINGER_COUNT],
    /// Direction of the tangential force, 0-255 over a full turn.
    pub tangential_direction: [u8; FINGER_COUNT],
    /// Proximity per finger.
    pub proximity: [u8; FINGER_COUNT],
}

impl SensorSnapshot {
    /// All four channels for one finger.
    pub fn finger(&self, index: usize) -> Option<FingerReading> {
        if index >= FINGER_COUNT {
            return None;
        }
        Some(FingerReading {
            name: FINGER_NAMES[index],
            normal_force: self.normal_force[index],
            tangential_force: self.tangential_force[index],
            tangential_direction: self.tangential_direction[index],
            proximity: self.proximity[index],
        })
    }

    /// Every finger, thumb first.
    pub fn fingers(&self) -> impl Iterator<Item = FingerReading> + '_ {
        (0..FINGER_COUNT).filter_map(|i| self.finger(i))
    }
}

/// Per-finger view of a [`SensorSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerReading {
    /// Finger name from [`FINGER_NAMES`].
    pub name: &'static str,
    /// Normal force.
    pub normal_force: u8,
    /// Tangential force magnitude.
    pub tangential_force: u8,
    /// Tangential force direction.
    pub tangential_direction: u8,
    /// Proximity.
    pub proximity: u8,
}

// =============================================================================
// Hand
// =============================================================================

/// Capability contract for a dexterous hand.
///
/// Bus operations take `&mut self`: a hand has exactly one user at a time.
/// Angle methods have default implementations that route through
/// [`crate::conversion`] and the raw methods.
#[async_trait]
pub trait Hand: Send {
    /// Model, handedness and transport this driver was built for.
    fn identity(&self) -> HandIdentity;

    /// Limit table used for every conversion this driver performs.
    fn limits(&self) -> JointLimitTable;

    /// Secondary selector inside a shared driver family, if any.
    fn sub_variant(&self) -> Option<u8> {
        None
    }

    /// Re-establish the bus link after [`Hand::disconnect`].
    async fn connect(&mut self) -> HandResult<()>;

    /// Close the bus link. Further bus calls fail with `NotConnected`. If the
    /// transport refuses to close, the hand stays connected.
    async fn disconnect(&mut self) -> HandResult<()>;

    fn is_connected(&self) -> bool;

    /// Command raw positions, one byte per joint.
    async fn set_joint_raw(&mut self, raw: &[u8]) -> HandResult<()>;

    /// Read raw positions, one byte per joint.
    async fn read_joint_raw(&mut self) -> HandResult<Vec<u8>>;

    /// Read the fingertip sensor block.
    async fn read_sensors(&mut self) -> HandResult<SensorSnapshot>;

    /// Command joint angles in radians. Out-of-range values are clamped.
    async fn set_joint_angles(&mut self, angles: &[f64]) -> HandResult<()> {
        let id = self.identity();
        let raw = angle_to_raw(id.model, id.handedness, angles)?;
        self.set_joint_raw(&raw).await
    }

    /// Read joint angles in radians.
    async fn read_joint_angles(&mut self) -> HandResult<Vec<f64>> {
        let id = self.identity();
        let raw = self.read_joint_raw().await?;
        raw_to_angle(id.model, id.handedness, &raw)
    }

    // -------------------------------------------------------------------------
    // Optional capabilities
    // -------------------------------------------------------------------------

    /// Per-joint speed limit, raw units.
    async fn set_speed(&mut self, _speed: &[u8]) -> HandResult<()> {
        Err(self.unsupported("set_speed"))
    }

    /// Per-joint torque limit, raw units.
    async fn set_torque(&mut self, _torque: &[u8]) -> HandResult<()> {
        Err(self.unsupported("set_torque"))
    }

    /// Motor temperatures in degrees Celsius, one per joint.
    async fn read_temperatures(&mut self) -> HandResult<Vec<u8>> {
        Err(self.unsupported("read_temperatures"))
    }

    /// Motor fault codes, one per joint. Zero means healthy.
    async fn read_fault_codes(&mut self) -> HandResult<Vec<u8>> {
        Err(self.unsupported("read_fault_codes"))
    }

    async fn clear_faults(&mut self) -> HandResult<()> {
        Err(self.unsupported("clear_faults"))
    }

    /// Firmware/hardware version bytes as reported by the hand.
    async fn read_version(&mut self) -> HandResult<Vec<u8>> {
        Err(self.unsupported("read_version"))
    }

    #[doc(hidden)]
    fn unsupported(&self, capability: &'static str) -> HandError {
        HandError::Unsupported {
            model: self.identity().model,
            capability,
        }
    }
}
