//! Hand identity: model, handedness and transport.
//!
//! These three enumerations select which limit table and which driver family
//! apply to a hand. They are plain `Copy` values and never change for the
//! lifetime of a driver.

use crate::error::HandError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Hand Model
// =============================================================================

/// Supported hand models.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandModel {
    /// Six-joint hand sold under the O6 name, same electronics as L6.
    O6,
    /// Six-joint hand.
    L6,
    /// Seven-joint hand.
    L7,
    /// Ten-joint hand, on CAN, EtherCAT or Modbus.
    L10,
    /// Twenty-joint hand with four reserved slots.
    L20,
    /// 21-DoF product sharing the 25-joint layout and driver.
    L21,
    /// Twenty-five-joint hand.
    L25,
}

/// Driver families. Several models may share one family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverFamily {
    /// L6 and O6.
    SixJoint,
    /// L7.
    SevenJoint,
    /// L10.
    TenJoint,
    /// L20.
    TwentyJoint,
    /// L21 and L25.
    TwentyFiveJoint,
}

impl HandModel {
    /// Every model, in declaration order.
    pub const ALL: [HandModel; 7] = [
        HandModel::O6,
        HandModel::L6,
        HandModel::L7,
        HandModel::L10,
        HandModel::L20,
        HandModel::L21,
        HandModel::L25,
    ];

    /// Catalogue name (e.g. "L10").
    pub fn name(&self) -> &'static str {
        match self {
            Self::O6 => "O6",
            Self::L6 => "L6",
            Self::L7 => "L7",
            Self::L10 => "L10",
            Self::L20 => "L20",
            Self::L21 => "L21",
            Self::L25 => "L25",
        }
    }

    /// Length of raw/angle joint vectors for this model.
    ///
    /// L21 uses the 25-wide layout of its driver family; four slots are
    /// reserved (see [`crate::conversion::should_skip_joint`]).
    pub fn joint_count(&self) -> usize {
        match self {
            Self::O6 | Self::L6 => 6,
            Self::L7 => 7,
            Self::L10 => 10,
            Self::L20 => 20,
            Self::L21 | Self::L25 => 25,
        }
    }

    /// Driver family that implements this model.
    pub fn family(&self) -> DriverFamily {
        match self {
            Self::O6 | Self::L6 => DriverFamily::SixJoint,
            Self::L7 => DriverFamily::SevenJoint,
            Self::L10 => DriverFamily::TenJoint,
            Self::L20 => DriverFamily::TwentyJoint,
            Self::L21 | Self::L25 => DriverFamily::TwentyFiveJoint,
        }
    }

    /// Secondary selector inside a shared driver family.
    ///
    /// Fixed lookup, never caller supplied: L25 is 0, L21 is 1.
    pub fn sub_variant(&self) -> Option<u8> {
        match self {
            Self::L25 => Some(0),
            Self::L21 => Some(1),
            _ => None,
        }
    }

    /// Model whose limit tables this model uses.
    pub(crate) fn table_model(&self) -> HandModel {
        match self {
            Self::O6 => Self::L6,
            Self::L21 => Self::L25,
            other => *other,
        }
    }
}

impl fmt::Display for HandModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for HandModel {
    type Err = HandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        HandModel::ALL
            .into_iter()
            .find(|m| m.name() == upper)
            .ok_or_else(|| HandError::unsupported_model(s.trim(), "(unknown model name)"))
    }
}

// =============================================================================
// Handedness
// =============================================================================

/// Left or right hand. The discriminant is the hand id used on the bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[repr(u32)]
pub enum Handedness {
    /// Hand id 0x28.
    Left = 0x28,
    /// Hand id 0x27.
    Right = 0x27,
}

impl Handedness {
    /// Bus-level hand id.
    pub fn hand_id(&self) -> u32 {
        *self as u32
    }

    /// Lowercase label used by the conversion input surface.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

impl TryFrom<u32> for Handedness {
    type Error = HandError;

    fn try_from(hand_id: u32) -> Result<Self, Self::Error> {
        match hand_id {
            0x28 => Ok(Self::Left),
            0x27 => Ok(Self::Right),
            other => Err(HandError::InvalidHandedness(format!("{other:#04x}"))),
        }
    }
}

impl FromStr for Handedness {
    type Err = HandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" => Ok(Self::Left),
            "right" | "r" => Ok(Self::Right),
            _ => Err(HandError::InvalidHandedness(s.trim().to_string())),
        }
    }
}

impl fmt::Display for Handedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Transport Kind
// =============================================================================

/// Bus a hand is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransportKind {
    /// First CAN channel.
    Can0,
    /// Second CAN channel.
    Can1,
    /// Modbus RTU serial link.
    Modbus,
    /// EtherCAT carrying CAN-style frames.
    EtherCat,
}

impl TransportKind {
    /// Every kind, indexed by its numeric selector.
    pub const ALL: [TransportKind; 4] = [
        TransportKind::Can0,
        TransportKind::Can1,
        TransportKind::Modbus,
        TransportKind::EtherCat,
    ];

    /// Lowercase name, also the default channel name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Can0 => "can0",
            Self::Can1 => "can1",
            Self::Modbus => "modbus",
            Self::EtherCat => "ethercat",
        }
    }

    /// CAN channels and EtherCAT share the CAN-framed driver families.
    pub fn uses_can_framing(&self) -> bool {
        !matches!(self, Self::Modbus)
    }
}

impl TryFrom<u8> for TransportKind {
    type Error = HandError;

    fn try_from(selector: u8) -> Result<Self, Self::Error> {
        TransportKind::ALL
            .get(selector as usize)
            .copied()
            .ok_or_else(|| HandError::UnknownTransport(selector.to_string()))
    }
}

impl FromStr for TransportKind {
    type Err = HandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        TransportKind::ALL
            .into_iter()
            .find(|t| t.as_str() == lower)
            .ok_or_else(|| HandError::UnknownTransport(s.trim().to_string()))
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Hand Identity
// =============================================================================

/// Immutable identity of a constructed hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandIdentity {
    /// Hand model.
    pub model: HandModel,
    /// Left or right.
    pub handedness: Handedness,
    /// Bus the hand is reached on.
    pub transport: TransportKind,
}

impl HandIdentity {
    /// Bundle the three identity fields.
    pub fn new(model: HandModel, handedness: Handedness, transport: TransportKind) -> Self {
        Self {
            model,
            handedness,
            transport,
        }
    }

    /// Bus-level hand id (CAN identifier / Modbus unit).
    pub fn hand_id(&self) -> u32 {
        self.handedness.hand_id()
    }
}

impl fmt::Display for HandIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} on {}", self.model, self.handedness, self.transport)
    }
}
