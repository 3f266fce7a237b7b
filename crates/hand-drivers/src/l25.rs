//! Twenty-five-joint driver family (L25 and L21).
//!
//! Both products use the same 25-wide joint layout and per-finger frames; the
//! L21 has no palm-arch actuators, so slots 11-14 are masked to zero. Which
//! product a driver talks to is fixed by [`L25Variant`].

use crate::protocol::{CommandSet, HandLink, Register, Segment, VERSION};
use async_trait::async_trait;
use hand_core::{
    DriverFamily, FrameTransport, Hand, HandError, HandIdentity, HandModel, HandResult,
    JointLimitTable, SensorSnapshot,
};
use tracing::instrument;

const THUMB: &[usize] = &[0, 5, 10, 15, 20];
const INDEX: &[usize] = &[1, 6, 11, 16, 21];
const MIDDLE: &[usize] = &[2, 7, 12, 17, 22];
const RING: &[usize] = &[3, 8, 13, 18, 23];
const LITTLE: &[usize] = &[4, 9, 14, 19, 24];

const fn fingers(base: u8) -> [Segment; 5] {
    [
        Segment::new(base, THUMB),
        Segment::new(base + 1, INDEX),
        Segment::new(base + 2, MIDDLE),
        Segment::new(base + 3, RING),
        Segment::new(base + 4, LITTLE),
    ]
}

static POSITION_FINGERS: [Segment; 5] = fingers(0x41);
static SPEED_FINGERS: [Segment; 5] = fingers(0x49);
static TORQUE_FINGERS: [Segment; 5] = fingers(0x51);
static TEMPERATURE_FINGERS: [Segment; 5] = fingers(0x59);
static FAULT_FINGERS: [Segment; 5] = fingers(0x61);

/// Register map of the twenty-five-joint family.
pub static L25_COMMANDS: CommandSet = CommandSet {
    position: &POSITION_FINGERS,
    speed: Some(&SPEED_FINGERS),
    torque: Some(&TORQUE_FINGERS),
    temperature: Some(&TEMPERATURE_FINGERS),
    fault: Some(&FAULT_FINGERS),
    version: Some(VERSION),
};

/// Product inside the 25-joint family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum L25Variant {
    /// L25, selector 0.
    L25 = 0,
    /// L21, selector 1.
    L21 = 1,
}

impl L25Variant {
    /// Numeric selector used by the factory.
    pub fn selector(&self) -> u8 {
        *self as u8
    }

    /// Model this variant reports.
    pub fn model(&self) -> HandModel {
        match self {
            Self::L25 => HandModel::L25,
            Self::L21 => HandModel::L21,
        }
    }
}

impl TryFrom<u8> for L25Variant {
    type Error = HandError;

    fn try_from(selector: u8) -> Result<Self, Self::Error> {
        match selector {
            0 => Ok(Self::L25),
            1 => Ok(Self::L21),
            _ => Err(HandError::unsupported_model(
                format!("selector {selector}"),
                "in the twenty-five-joint family",
            )),
        }
    }
}

/// Driver for L25 and L21 hands on CAN or EtherCAT.
pub struct L25Hand {
    link: HandLink,
    variant: L25Variant,
}

impl L25Hand {
    /// Build a driver for the product selected by `sub_variant`.
    ///
    /// The selector must agree with `identity.model`.
    pub fn new(
        identity: HandIdentity,
        sub_variant: u8,
        transport: Box<dyn FrameTransport>,
    ) -> HandResult<Self> {
        if identity.model.family() != DriverFamily::TwentyFiveJoint {
            return Err(HandError::unsupported_model(
                identity.model,
                "by the twenty-five-joint driver",
            ));
        }
        let variant = L25Variant::try_from(sub_variant)?;
        if variant.model() != identity.model {
            return Err(HandError::unsupported_model(
                identity.model,
                "with this sub-variant selector",
            ));
        }
        let link = HandLink::new(identity, &L25_COMMANDS, transport)?;
        tracing::debug!(hand = %identity, sub_variant, "twenty-five-joint driver ready");
        Ok(Self { link, variant })
    }

    /// Product this driver was built for.
    pub fn variant(&self) -> L25Variant {
        self.variant
    }
}

#[async_trait]
impl Hand for L25Hand {
    fn identity(&self) -> HandIdentity {
        self.link.identity()
    }

    fn limits(&self) -> JointLimitTable {
        self.link.limits()
    }

    fn sub_variant(&self) -> Option<u8> {
        Some(self.variant.selector())
    }

    async fn connect(&mut self) -> HandResult<()> {
        self.link.connect().await
    }

    async fn disconnect(&mut self) -> HandResult<()> {
        self.link.disconnect().await
    }

    fn is_connected(&self) -> bool {
        self.link.is_connected()
    }

    #[instrument(skip(self, raw), fields(hand_id = self.link.hand_id(), variant = ?self.variant))]
    async fn set_joint_raw(&mut self, raw: &[u8]) -> HandResult<()> {
        self.link
            .write_register(Register::Position, "set_joint_raw", raw)
            .await
    }

    #[instrument(skip(self), fields(hand_id = self.link.hand_id(), variant = ?self.variant))]
    async fn read_joint_raw(&mut self) -> HandResult<Vec<u8>> {
        self.link.read_register(Register::Position, "read_joint_raw").await
    }

    #[instrument(skip(self), fields(hand_id = self.link.hand_id()))]
    async fn read_sensors(&mut self) -> HandResult<SensorSnapshot> {
        self.link.read_sensors().await
    }

    async fn set_speed(&mut self, speed: &[u8]) -> HandResult<()> {
        self.link
            .write_register(Register::Speed, "set_speed", speed)
            .await
    }

    async fn set_torque(&mut self, torque: &[u8]) -> HandResult<()> {
        self.link
            .write_register(Register::Torque, "set_torque", torque)
            .await
    }

    async fn read_temperatures(&mut self) -> HandResult<Vec<u8>> {
        self.link
            .read_register(Register::Temperature, "read_temperatures")
            .await
    }

    async fn read_fault_codes(&mut self) -> HandResult<Vec<u8>> {
        self.link.read_register(Register::Fault, "read_fault_codes").await
    }

    async fn clear_faults(&mut self) -> HandResult<()> {
        self.link.clear_faults().await
    }

    async fn read_version(&mut self) -> HandResult<Vec<u8>> {
        self.link.read_version().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_core::{Handedness, TransportKind};
    use hand_driver_mock::SimulatedBus;

    fn build(bus: &SimulatedBus, model: HandModel, selector: u8) -> HandResult<L25Hand> {
        let identity = HandIdentity::new(model, Handedness::Left, TransportKind::Can0);
        L25Hand::new(identity, selector, Box::new(bus.hand(TransportKind::Can0)))
    }

    #[test]
    fn test_selector_must_match_model() {
        let bus = SimulatedBus::new();
        assert_eq!(build(&bus, HandModel::L25, 0).unwrap().variant(), L25Variant::L25);
        assert_eq!(build(&bus, HandModel::L21, 1).unwrap().variant(), L25Variant::L21);
        assert!(build(&bus, HandModel::L21, 0).is_err());
        assert!(build(&bus, HandModel::L25, 2).is_err());
        assert!(build(&bus, HandModel::L20, 0).is_err());
    }

    #[test]
    fn test_finger_segments_cover_every_joint_once() {
        let mut seen: Vec<usize> = POSITION_FINGERS
            .iter()
            .flat_map(|s| s.joints.iter().copied())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..25).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_l21_masks_palm_arch() {
        let bus = SimulatedBus::new();
        let mut hand = build(&bus, HandModel::L21, 1).unwrap();
        hand.set_joint_raw(&[90; 25]).await.unwrap();

        // Index finger frame: root, yaw, arch, middle phalanx, tip.
        let sent = bus.sent_frames();
        assert_eq!(sent.len(), 5);
        assert_eq!(sent[1].data(), &[0x42, 90, 90, 0, 90, 90]);
        assert_eq!(hand.sub_variant(), Some(1));
    }

    #[tokio::test]
    async fn test_l25_drives_palm_arch() {
        let bus = SimulatedBus::new();
        let mut hand = build(&bus, HandModel::L25, 0).unwrap();
        hand.set_joint_raw(&[90; 25]).await.unwrap();
        assert_eq!(bus.sent_frames()[1].data(), &[0x42, 90, 90, 90, 90, 90]);

        let raw = hand.read_joint_raw().await.unwrap();
        assert!(raw.iter().all(|&r| r == 90));
    }
}
