//! Six-joint driver (L6, also sold as O6).
//!
//! One frame carries the whole hand: every register is a single segment.

use crate::protocol::{CommandSet, HandLink, Register, Segment, VERSION};
use async_trait::async_trait;
use hand_core::{
    DriverFamily, FrameTransport, Hand, HandError, HandIdentity, HandResult, JointLimitTable,
    SensorSnapshot,
};
use tracing::instrument;

const ALL_JOINTS: &[usize] = &[0, 1, 2, 3, 4, 5];

/// Register map of the six-joint hand.
pub static L6_COMMANDS: CommandSet = CommandSet {
    position: &[Segment::new(0x01, ALL_JOINTS)],
    torque: Some(&[Segment::new(0x02, ALL_JOINTS)]),
    speed: Some(&[Segment::new(0x05, ALL_JOINTS)]),
    temperature: None,
    fault: Some(&[Segment::new(0x35, ALL_JOINTS)]),
    version: Some(VERSION),
};

/// Driver for L6 and O6 hands.
pub struct L6Hand {
    link: HandLink,
}

impl L6Hand {
    /// Fails unless `identity.model` is L6 or O6.
    pub fn new(identity: HandIdentity, transport: Box<dyn FrameTransport>) -> HandResult<Self> {
        if identity.model.family() != DriverFamily::SixJoint {
            return Err(HandError::unsupported_model(
                identity.model,
                "by the six-joint driver",
            ));
        }
        let link = HandLink::new(identity, &L6_COMMANDS, transport)?;
        tracing::debug!(hand = %identity, "six-joint driver ready");
        Ok(Self { link })
    }
}

#[async_trait]
impl Hand for L6Hand {
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

    fn hand(model: HandModel) -> (SimulatedBus, HandResult<L6Hand>) {
        let bus = SimulatedBus::new();
        let identity = HandIdentity::new(model, Handedness::Right, TransportKind::Can0);
        let transport = Box::new(bus.hand(TransportKind::Can0));
        (bus.clone(), L6Hand::new(identity, transport))
    }

    #[test]
    fn test_accepts_o6_and_l6_only() {
        assert!(hand(HandModel::O6).1.is_ok());
        assert!(hand(HandModel::L6).1.is_ok());
        assert!(matches!(
            hand(HandModel::L7).1,
            Err(HandError::UnsupportedModel { .. })
        ));
    }

    #[tokio::test]
    async fn test_single_frame_position_write() {
        let (bus, hand) = hand(HandModel::L6);
        let mut hand = hand.unwrap();
        hand.set_joint_raw(&[10, 20, 30, 40, 50, 60]).await.unwrap();

        let sent = bus.sent_frames();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].identifier(), 0x27);
        assert_eq!(sent[0].data(), &[0x01, 10, 20, 30, 40, 50, 60]);
    }

    #[tokio::test]
    async fn test_temperatures_unsupported() {
        let (_bus, hand) = hand(HandModel::O6);
        let mut hand = hand.unwrap();
        assert!(matches!(
            hand.read_temperatures().await,
            Err(HandError::Unsupported {
                model: HandModel::O6,
                ..
            })
        ));
    }
}
