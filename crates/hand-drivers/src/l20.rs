//! Twenty-joint driver (L20).
//!
//! Registers are sent as four rows of five: root pitch, side yaw, thumb roll
//! plus the four reserved palm-arch slots, and fingertips. Reserved slots are
//! always transmitted and reported as zero.

use crate::protocol::{CommandSet, HandLink, Register, Segment, VERSION};
use async_trait::async_trait;
use hand_core::{
    DriverFamily, FrameTransport, Hand, HandError, HandIdentity, HandResult, JointLimitTable,
    SensorSnapshot,
};
use tracing::instrument;

const ROOTS: &[usize] = &[0, 1, 2, 3, 4];
const YAW: &[usize] = &[5, 6, 7, 8, 9];
const ROLL_AND_RESERVED: &[usize] = &[10, 11, 12, 13, 14];
const TIPS: &[usize] = &[15, 16, 17, 18, 19];

const fn rows(base: u8) -> [Segment; 4] {
    [
        Segment::new(base, ROOTS),
        Segment::new(base + 1, YAW),
        Segment::new(base + 2, ROLL_AND_RESERVED),
        Segment::new(base + 3, TIPS),
    ]
}

static POSITION_ROWS: [Segment; 4] = rows(0x01);
static SPEED_ROWS: [Segment; 4] = rows(0x05);
static TEMPERATURE_ROWS: [Segment; 4] = rows(0x31);
static FAULT_ROWS: [Segment; 4] = rows(0x35);

/// Register map of the twenty-joint hand. No torque register.
pub static L20_COMMANDS: CommandSet = CommandSet {
    position: &POSITION_ROWS,
    speed: Some(&SPEED_ROWS),
    torque: None,
    temperature: Some(&TEMPERATURE_ROWS),
    fault: Some(&FAULT_ROWS),
    version: Some(VERSION),
};

/// Driver for L20 hands on CAN or EtherCAT.
pub struct L20Hand {
    link: HandLink,
}

impl L20Hand {
    /// Fails unless `identity.model` is L20.
    pub fn new(identity: HandIdentity, transport: Box<dyn FrameTransport>) -> HandResult<Self> {
        if identity.model.family() != DriverFamily::TwentyJoint {
            return Err(HandError::unsupported_model(
                identity.model,
                "by the twenty-joint driver",
            ));
        }
        let link = HandLink::new(identity, &L20_COMMANDS, transport)?;
        tracing::debug!(hand = %identity, "twenty-joint driver ready");
        Ok(Self { link })
    }
}

#[async_trait]
impl Hand for L20Hand {
    fn identity(&self) -> HandIdentity {
        self.link.identity()
    }

    fn limits(&self) -> JointLimitTable {
        self.link.limits()
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

    #[instrument(skip(self, raw), fields(hand_id = self.link.hand_id()))]
    async fn set_joint_raw(&mut self, raw: &[u8]) -> HandResult<()> {
        self.link
            .write_register(Register::Position, "set_joint_raw", raw)
            .await
    }

    #[instrument(skip(self), fields(hand_id = self.link.hand_id()))]
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
    use hand_core::{HandModel, Handedness, TransportKind};
    use hand_driver_mock::SimulatedBus;

    #[tokio::test]
    async fn test_reserved_slots_sent_as_zero() {
        let bus = SimulatedBus::new();
        let identity = HandIdentity::new(HandModel::L20, Handedness::Right, TransportKind::Can0);
        let mut hand = L20Hand::new(identity, Box::new(bus.hand(TransportKind::Can0))).unwrap();

        hand.set_joint_raw(&[200; 20]).await.unwrap();
        let sent = bus.sent_frames();
        assert_eq!(sent.len(), 4);
        assert_eq!(sent[2].data(), &[0x03, 200, 0, 0, 0, 0]);

        let raw = hand.read_joint_raw().await.unwrap();
        assert_eq!(&raw[11..=14], &[0, 0, 0, 0]);
        assert_eq!(raw[10], 200);
        assert_eq!(raw[19], 200);
    }

    #[tokio::test]
    async fn test_torque_unsupported() {
        let bus = SimulatedBus::new();
        let identity = HandIdentity::new(HandModel::L20, Handedness::Left, TransportKind::Can0);
        let mut hand = L20Hand::new(identity, Box::new(bus.hand(TransportKind::Can0))).unwrap();
        assert!(matches!(
            hand.set_torque(&[0; 20]).await,
            Err(HandError::Unsupported {
                capability: "set_torque",
                ..
            })
        ));
    }

    #[test]
    fn test_row_commands() {
        let codes: Vec<u8> = L20_COMMANDS.commands().collect();
        assert_eq!(&codes[..4], &[0x01, 0x02, 0x03, 0x04]);
        assert!(codes.contains(&0x38));
    }
}
