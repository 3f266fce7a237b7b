//! Static per-model, per-handedness joint limit tables.
//!
//! Angles are in radians. A joint marked [`Direction::Inverted`] maps raw 0 to
//! its maximum angle and raw 255 to its minimum (raw 255 is the open hand on
//! the flexion joints).
//!
//! The 20- and 25-joint families share a wide layout:
//!
//! ```text
//!  0-4   root pitch      thumb, index, middle, ring, little
//!  5-9   side yaw        thumb, index, middle, ring, little
//!  10    thumb roll
//!  11-14 palm arch       index..little (reserved on L20 and L21)
//!  15-19 middle phalanx  (L25) / fingertip (L20)
//!  20-24 fingertip       (L25 only)
//! ```

use crate::error::{HandError, HandResult};
use crate::model::{HandModel, Handedness};

/// Mapping direction between raw ascending and angle ascending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Raw 0 is the minimum angle.
    Forward,
    /// Raw 0 is the maximum angle.
    Inverted,
}

impl Direction {
    /// +1 or -1.
    pub fn sign(&self) -> i8 {
        match self {
            Self::Forward => 1,
            Self::Inverted => -1,
        }
    }
}

/// Limits of one joint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JointLimit {
    /// Joint name, e.g. `index_mcp_pitch`.
    pub name: &'static str,
    /// Lower angle bound in radians.
    pub min_angle: f64,
    /// Upper angle bound in radians.
    pub max_angle: f64,
    /// Whether raw 0 maps to `min_angle` or `max_angle`.
    pub direction: Direction,
}

impl JointLimit {
    const fn fwd(name: &'static str, min_angle: f64, max_angle: f64) -> Self {
        Self {
            name,
            min_angle,
            max_angle,
            direction: Direction::Forward,
        }
    }

    const fn inv(name: &'static str, min_angle: f64, max_angle: f64) -> Self {
        Self {
            name,
            min_angle,
            max_angle,
            direction: Direction::Inverted,
        }
    }

    const fn reserved(name: &'static str) -> Self {
        Self::fwd(name, 0.0, 0.0)
    }

    /// Angle range in raw-ascending order: `(angle at raw 0, angle at raw 255)`.
    pub fn raw_ordered_range(&self) -> (f64, f64) {
        match self.direction {
            Direction::Forward => (self.min_angle, self.max_angle),
            Direction::Inverted => (self.max_angle, self.min_angle),
        }
    }

    /// Midpoint of the angle range.
    pub fn center(&self) -> f64 {
        (self.min_angle + self.max_angle) / 2.0
    }
}

/// Resolved limits for one (model, handedness) pair.
#[derive(Debug, Clone, Copy)]
pub struct JointLimitTable {
    model: HandModel,
    handedness: Handedness,
    joints: &'static [JointLimit],
}

impl JointLimitTable {
    /// Model the table was resolved for.
    pub fn model(&self) -> HandModel {
        self.model
    }

    /// Handedness the table was resolved for.
    pub fn handedness(&self) -> Handedness {
        self.handedness
    }

    /// Expected length of any joint vector for this hand.
    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    /// Joint limits in wire order.
    pub fn joints(&self) -> &'static [JointLimit] {
        self.joints
    }

    /// Limits of joint `index`, if it exists.
    pub fn get(&self, index: usize) -> Option<&'static JointLimit> {
        self.joints.get(index)
    }

    /// Iterate joints in wire order.
    pub fn iter(&self) -> impl Iterator<Item = &'static JointLimit> {
        self.joints.iter()
    }

    /// Fail with [`HandError::LengthMismatch`] unless `len == joint_count()`.
    pub fn check_len(&self, len: usize) -> HandResult<()> {
        if len != self.joints.len() {
            return Err(HandError::LengthMismatch {
                expected: self.joints.len(),
                actual: len,
            });
        }
        Ok(())
    }
}

/// Look up the static limit table for a model and handedness.
///
/// O6 resolves to the L6 limits and L21 to the L25 limits; the returned table
/// still reports the requested model.
pub fn resolve_limit_table(model: HandModel, handedness: Handedness) -> HandResult<JointLimitTable> {
    let joints: &'static [JointLimit] = match (model.table_model(), handedness) {
        (HandModel::L6, Handedness::Left) => &L6_LEFT,
        (HandModel::L6, Handedness::Right) => &L6_RIGHT,
        (HandModel::L7, Handedness::Left) => &L7_LEFT,
        (HandModel::L7, Handedness::Right) => &L7_RIGHT,
        (HandModel::L10, Handedness::Left) => &L10_LEFT,
        (HandModel::L10, Handedness::Right) => &L10_RIGHT,
        (HandModel::L20, Handedness::Left) => &L20_LEFT,
        (HandModel::L20, Handedness::Right) => &L20_RIGHT,
        (HandModel::L25, Handedness::Left) => &L25_LEFT,
        (HandModel::L25, Handedness::Right) => &L25_RIGHT,
        _ => return Err(HandError::unsupported_model(model, "(no limit table)")),
    };
    debug_assert_eq!(joints.len(), model.joint_count());
    Ok(JointLimitTable {
        model,
        handedness,
        joints,
    })
}

// =============================================================================
// L6 / O6
// =============================================================================

static L6_LEFT: [JointLimit; 6] = [
    JointLimit::inv("thumb_cmc_pitch", 0.0, 0.99),
    JointLimit::inv("thumb_cmc_yaw", 0.0, 1.43),
    JointLimit::inv("index_mcp_pitch", 0.0, 1.44),
    JointLimit::inv("middle_mcp_pitch", 0.0, 1.44),
    JointLimit::inv("ring_mcp_pitch", 0.0, 1.44),
    JointLimit::inv("little_mcp_pitch", 0.0, 1.44),
];

static L6_RIGHT: [JointLimit; 6] = [
    JointLimit::inv("thumb_cmc_pitch", 0.0, 0.99),
    JointLimit::fwd("thumb_cmc_yaw", -1.43, 0.0),
    JointLimit::inv("index_mcp_pitch", 0.0, 1.44),
    JointLimit::inv("middle_mcp_pitch", 0.0, 1.44),
    JointLimit::inv("ring_mcp_pitch", 0.0, 1.44),
    JointLimit::inv("little_mcp_pitch", 0.0, 1.44),
];

// =============================================================================
// L7
// =============================================================================

static L7_LEFT: [JointLimit; 7] = [
    JointLimit::inv("thumb_cmc_pitch", 0.0, 0.44),
    JointLimit::inv("thumb_cmc_yaw", 0.0, 1.43),
    JointLimit::inv("index_mcp_pitch", 0.0, 1.62),
    JointLimit::inv("middle_mcp_pitch", 0.0, 1.62),
    JointLimit::inv("ring_mcp_pitch", 0.0, 1.62),
    JointLimit::inv("little_mcp_pitch", 0.0, 1.62),
    JointLimit::inv("thumb_cmc_roll", 0.0, 1.56),
];

static L7_RIGHT: [JointLimit; 7] = [
    JointLimit::inv("thumb_cmc_pitch", 0.0, 0.44),
    JointLimit::fwd("thumb_cmc_yaw", -1.43, 0.0),
    JointLimit::inv("index_mcp_pitch", 0.0, 1.62),
    JointLimit::inv("middle_mcp_pitch", 0.0, 1.62),
    JointLimit::inv("ring_mcp_pitch", 0.0, 1.62),
    JointLimit::inv("little_mcp_pitch", 0.0, 1.62),
    JointLimit::fwd("thumb_cmc_roll", -1.56, 0.0),
];

// =============================================================================
// L10
// =============================================================================

static L10_LEFT: [JointLimit; 10] = [
    JointLimit::inv("thumb_cmc_pitch", 0.0, 0.75),
    JointLimit::inv("thumb_cmc_yaw", 0.0, 1.43),
    JointLimit::inv("index_mcp_pitch", 0.0, 1.62),
    JointLimit::inv("middle_mcp_pitch", 0.0, 1.62),
    JointLimit::inv("ring_mcp_pitch", 0.0, 1.62),
    JointLimit::inv("little_mcp_pitch", 0.0, 1.62),
    JointLimit::fwd("index_mcp_yaw", -0.26, 0.26),
    JointLimit::inv("ring_mcp_yaw", -0.26, 0.26),
    JointLimit::inv("little_mcp_yaw", -0.52, 0.26),
    JointLimit::inv("thumb_cmc_roll", -0.52, 1.01),
];

static L10_RIGHT: [JointLimit; 10] = [
    JointLimit::inv("thumb_cmc_pitch", 0.0, 0.75),
    JointLimit::fwd("thumb_cmc_yaw", -1.43, 0.0),
    JointLimit::inv("index_mcp_pitch", 0.0, 1.62),
    JointLimit::inv("middle_mcp_pitch", 0.0, 1.62),
    JointLimit::inv("ring_mcp_pitch", 0.0, 1.62),
    JointLimit::inv("little_mcp_pitch", 0.0, 1.62),
    JointLimit::inv("index_mcp_yaw", -0.26, 0.26),
    JointLimit::fwd("ring_mcp_yaw", -0.26, 0.26),
    JointLimit::fwd("little_mcp_yaw", -0.26, 0.52),
    JointLimit::fwd("thumb_cmc_roll", -1.01, 0.52),
];

// =============================================================================
// L20
// =============================================================================

static L20_LEFT: [JointLimit; 20] = [
    JointLimit::inv("thumb_cmc_pitch", 0.0, 0.70),
    JointLimit::inv("index_mcp_pitch", 0.0, 1.57),
    JointLimit::inv("middle_mcp_pitch", 0.0, 1.57),
    JointLimit::inv("ring_mcp_pitch", 0.0, 1.57),
    JointLimit::inv("little_mcp_pitch", 0.0, 1.57),
    JointLimit::inv("thumb_cmc_yaw", 0.0, 1.31),
    JointLimit::fwd("index_mcp_yaw", -0.26, 0.26),
    JointLimit::fwd("middle_mcp_yaw", -0.26, 0.26),
    JointLimit::inv("ring_mcp_yaw", -0.26, 0.26),
    JointLimit::inv("little_mcp_yaw", -0.26, 0.26),
    JointLimit::inv("thumb_cmc_roll", 0.0, 1.57),
    JointLimit::reserved("index_arch"),
    JointLimit::reserved("middle_arch"),
    JointLimit::reserved("ring_arch"),
    JointLimit::reserved("little_arch"),
    JointLimit::inv("thumb_ip", 0.0, 1.13),
    JointLimit::inv("index_pip", 0.0, 1.57),
    JointLimit::inv("middle_pip", 0.0, 1.57),
    JointLimit::inv("ring_pip", 0.0, 1.57),
    JointLimit::inv("little_pip", 0.0, 1.57),
];

static L20_RIGHT: [JointLimit; 20] = [
    JointLimit::inv("thumb_cmc_pitch", 0.0, 0.70),
    JointLimit::inv("index_mcp_pitch", 0.0, 1.57),
    JointLimit::inv("middle_mcp_pitch", 0.0, 1.57),
    JointLimit::inv("ring_mcp_pitch", 0.0, 1.57),
    JointLimit::inv("little_mcp_pitch", 0.0, 1.57),
    JointLimit::fwd("thumb_cmc_yaw", -1.31, 0.0),
    JointLimit::inv("index_mcp_yaw", -0.26, 0.26),
    JointLimit::inv("middle_mcp_yaw", -0.26, 0.26),
    JointLimit::fwd("ring_mcp_yaw", -0.26, 0.26),
    JointLimit::fwd("little_mcp_yaw", -0.26, 0.26),
    JointLimit::fwd("thumb_cmc_roll", -1.57, 0.0),
    JointLimit::reserved("index_arch"),
    JointLimit::reserved("middle_arch"),
    JointLimit::reserved("ring_arch"),
    JointLimit::reserved("little_arch"),
    JointLimit::inv("thumb_ip", 0.0, 1.13),
    JointLimit::inv("index_pip", 0.0, 1.57),
    JointLimit::inv("middle_pip", 0.0, 1.57),
    JointLimit::inv("ring_pip", 0.0, 1.57),
    JointLimit::inv("little_pip", 0.0, 1.57),
];

// =============================================================================
// L25 / L21
// =============================================================================

static L25_LEFT: [JointLimit; 25] = [
    JointLimit::inv("thumb_cmc_pitch", 0.0, 0.61),
    JointLimit::inv("index_mcp_pitch", 0.0, 1.57),
    JointLimit::inv("middle_mcp_pitch", 0.0, 1.57),
    JointLimit::inv("ring_mcp_pitch", 0.0, 1.57),
    JointLimit::inv("little_mcp_pitch", 0.0, 1.57),
    JointLimit::inv("thumb_cmc_yaw", 0.0, 1.48),
    JointLimit::fwd("index_mcp_yaw", -0.18, 0.18),
    JointLimit::fwd("middle_mcp_yaw", -0.18, 0.18),
    JointLimit::inv("ring_mcp_yaw", -0.18, 0.18),
    JointLimit::inv("little_mcp_yaw", -0.18, 0.18),
    JointLimit::inv("thumb_cmc_roll", 0.0, 0.87),
    JointLimit::inv("index_arch", 0.0, 0.17),
    JointLimit::inv("middle_arch", 0.0, 0.17),
    JointLimit::inv("ring_arch", 0.0, 0.26),
    JointLimit::inv("little_arch", 0.0, 0.35),
    JointLimit::inv("thumb_mcp", 0.0, 1.05),
    JointLimit::inv("index_pip", 0.0, 1.57),
    JointLimit::inv("middle_pip", 0.0, 1.57),
    JointLimit::inv("ring_pip", 0.0, 1.57),
    JointLimit::inv("little_pip", 0.0, 1.57),
    JointLimit::inv("thumb_ip", 0.0, 1.22),
    JointLimit::inv("index_dip", 0.0, 1.22),
    JointLimit::inv("middle_dip", 0.0, 1.22),
    JointLimit::inv("ring_dip", 0.0, 1.22),
    JointLimit::inv("little_dip", 0.0, 1.22),
];

static L25_RIGHT: [JointLimit; 25] = [
    JointLimit::inv("thumb_cmc_pitch", 0.0, 0.61),
    JointLimit::inv("index_mcp_pitch", 0.0, 1.57),
    JointLimit::inv("middle_mcp_pitch", 0.0, 1.57),
    JointLimit::inv("ring_mcp_pitch", 0.0, 1.57),
    JointLimit::inv("little_mcp_pitch", 0.0, 1.57),
    JointLimit::fwd("thumb_cmc_yaw", -1.48, 0.0),
    JointLimit::inv("index_mcp_yaw", -0.18, 0.18),
    JointLimit::inv("middle_mcp_yaw", -0.18, 0.18),
    JointLimit::fwd("ring_mcp_yaw", -0.18, 0.18),
    JointLimit::fwd("little_mcp_yaw", -0.18, 0.18),
    JointLimit::fwd("thumb_cmc_roll", -0.87, 0.0),
    JointLimit::inv("index_arch", 0.0, 0.17),
    JointLimit::inv("middle_arch", 0.0, 0.17),
    JointLimit::inv("ring_arch", 0.0, 0.26),
    JointLimit::inv("little_arch", 0.0, 0.35),
    JointLimit::inv("thumb_mcp", 0.0, 1.05),
    JointLimit::inv("index_pip", 0.0, 1.57),
    JointLimit::inv("middle_pip", 0.0, 1.57),
    JointLimit::inv("ring_pip", 0.0, 1.57),
    JointLimit::inv("little_pip", 0.0, 1.57),
    JointLimit::inv("thumb_ip", 0.0, 1.22),
    JointLimit::inv("index_dip", 0.0, 1.22),
    JointLimit::inv("middle_dip", 0.0, 1.22),
    JointLimit::inv("ring_dip", 0.0, 1.22),
    JointLimit::inv("little_dip", 0.0, 1.22),
];
