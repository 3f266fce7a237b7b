//! Seven-joint driver (L7).

use crate::protocol::{CommandSet, HandLink, Register, Segment, VERSION};
use async_trait::async_trait;
use hand_core::{
    DriverFamily, FrameTransport, Hand, HandError, HandIdentity, HandResult, JointLimitTable,
    SensorSnapshot,
};
use tracing::instrument;

const ALL_JOINTS: &[usize] = &[0, 1, 2, 3, 4, 5, 6];

/// Register map of the seven-joint hand.
pub static L7_COMMANDS: CommandSet = CommandSet {
    position: &[Segment::new(0x01, ALL_JOINTS)],
    torque: Some(&[Segment::new(0x02, ALL_JOINTS)]),
    speed: Some(&[Segment::new(0x05, ALL_JOINTS)]),
    temperature: Some(&[Segment::new(0x33, ALL_JOINTS)]),
    fault: Some(&[Segment::new(0x35, ALL_JOINTS)]),
    version: Some(VERSION),
};

/// Driver for L7 hands on CAN or EtherCAT.
pub struct L7Hand {
    link: HandLink,
}

impl L7Hand {
    /// Fails unless `identity.model` is L7.
    pub fn new(identity: HandIdentity, transport: Box<dyn FrameTransport>) -> HandResult<Self> {
        if identity.model.family() != DriverFamily::SevenJoint {
            return Err(HandError::unsupported_model(
                identity.model,
                "by the seven-joint driver",
            ));
        }
        let link = HandLink::new(identity, &L7_COMMANDS, transport)?;
        tracing::debug!(hand = %identity, "seven-joint driver ready");
        Ok(Self { link })
    }
}

#[async_trait]
impl Hand for L7Hand {
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
