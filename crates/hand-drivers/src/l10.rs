//! Ten-joint driver (L10).
//!
//! Ten values do not fit one frame: every register is split into the six
//! primary joints and the four auxiliary joints (finger yaw and thumb roll).

use crate::protocol::{CommandSet, HandLink, Register, Segment, VERSION};
use async_trait::async_trait;
use hand_core::{
    DriverFamily, FrameTransport, Hand, HandError, HandIdentity, HandResult, JointLimitTable,
    SensorSnapshot,
};
use tracing::instrument;

const PRIMARY: &[usize] = &[0, 1, 2, 3, 4, 5];
const AUXILIARY: &[usize] = &[6, 7, 8, 9];

/// Register map of the ten-joint hand, split over two frames per register.
pub static L10_COMMANDS: CommandSet = CommandSet {
    position: &[Segment::new(0x01, PRIMARY), Segment::new(0x04, AUXILIARY)],
    torque: Some(&[Segment::new(0x02, PRIMARY), Segment::new(0x03, AUXILIARY)]),
    speed: Some(&[Segment::new(0x05, PRIMARY), Segment::new(0x06, AUXILIARY)]),
    temperature: Some(&[Segment::new(0x33, PRIMARY), Segment::new(0x34, AUXILIARY)]),
    fault: Some(&[Segment::new(0x35, PRIMARY), Segment::new(0x36, AUXILIARY)]),
    version: Some(VERSION),
};

/// Driver for L10 hands on CAN or EtherCAT.
pub struct L10Hand {
    link: HandLink,
}

impl L10Hand {
    /// Fails unless `identity.model` is L10.
    pub fn new(identity: HandIdentity, transport: Box<dyn FrameTransport>) -> HandResult<Self> {
        if identity.model.family() != DriverFamily::TenJoint {
            return Err(HandError::unsupported_model(
                identity.model,
                "by the ten-joint driver",
            ));
        }
        let link = HandLink::new(identity, &L10_COMMANDS, transport)?;
        tracing::debug!(hand = %identity, "ten-joint driver ready");
        Ok(Self { link })
    }
}

#[async_trait]
impl Hand for L10Hand {
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
    use hand_core::{HandModel, Handedness, TransportKind};
    use hand_driver_mock::SimulatedBus;

    fn l10(bus: &SimulatedBus, transport: TransportKind) -> L10Hand {
        let identity = HandIdentity::new(HandModel::L10, Handedness::Left, transport);
        L10Hand::new(identity, Box::new(bus.hand(transport))).unwrap()
    }

    #[tokio::test]
    async fn test_position_split_across_two_frames() {
        let bus = SimulatedBus::new();
        let mut hand = l10(&bus, TransportKind::EtherCat);
        hand.set_joint_raw(&[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]).await.unwrap();

        let sent = bus.sent_frames();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].data(), &[0x01, 0, 1, 2, 3, 4, 5]);
        assert_eq!(sent[1].data(), &[0x04, 6, 7, 8, 9]);
    }

    #[tokio::test]
    async fn test_raw_round_trip() {
        let bus = SimulatedBus::new();
        let mut hand = l10(&bus, TransportKind::Can0);
        let raw = [255, 128, 64, 32, 16, 8, 4, 2, 1, 0];
        hand.set_joint_raw(&raw).await.unwrap();
        assert_eq!(hand.read_joint_raw().await.unwrap(), raw.to_vec());
    }

    #[tokio::test]
    async fn test_clear_faults_zeroes_fault_register() {
        let bus = SimulatedBus::new();
        bus.seed_register(0x28, 0x35, &[0, 0, 4, 0, 0, 0]);
        bus.seed_register(0x28, 0x36, &[1, 0, 0, 0]);
        let mut hand = l10(&bus, TransportKind::Can0);

        let faults = hand.read_fault_codes().await.unwrap();
        assert_eq!(faults, vec![0, 0, 4, 0, 0, 0, 1, 0, 0, 0]);

        hand.clear_faults().await.unwrap();
        assert!(hand.read_fault_codes().await.unwrap().iter().all(|&f| f == 0));
    }

    #[tokio::test]
    async fn test_disconnected_hand_refuses_bus_calls() {
        let bus = SimulatedBus::new();
        let mut hand = l10(&bus, TransportKind::Can0);
        hand.disconnect().await.unwrap();
        assert!(!hand.is_connected());
        assert!(matches!(
            hand.read_joint_raw().await,
            Err(HandError::NotConnected)
        ));

        hand.connect().await.unwrap();
        assert!(hand.is_connected());
        assert!(hand.read_joint_raw().await.is_ok());
    }
}
