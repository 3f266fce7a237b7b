//! L10 over Modbus RTU.
//!
//! Each [`Frame`] carries one RTU ADU without the address byte: the frame
//! identifier is the unit id (the hand id), the payload is the PDU followed by
//! the CRC-16/MODBUS of `[unit, pdu..]`, low byte first. The 8-byte payload
//! limit caps reads at two registers per request.
//!
//! | Table    | Address          | Contents                              |
//! |----------|------------------|---------------------------------------|
//! | holding  | `0x0000 + joint` | position                              |
//! | holding  | `0x0010 + joint` | speed                                 |
//! | holding  | `0x0020 + joint` | torque                                |
//! | input    | `0x0100`         | sensors, 4 channels x 5 fingers       |
//! | input    | `0x0200 + joint` | temperature                           |
//! | input    | `0x0210 + joint` | fault code                            |
//! | input    | `0x0300`         | version, 4 registers                  |

use async_trait::async_trait;
use crc::{Crc, CRC_16_MODBUS};
use hand_core::{
    Frame, FrameTransport, Hand, HandError, HandIdentity, HandModel, HandResult, JointLimitTable,
    SensorSnapshot, TransportKind, FINGER_COUNT,
};
use tracing::instrument;

static MODBUS_CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_MODBUS);

/// Function code: read holding registers.
pub const READ_HOLDING: u8 = 0x03;
/// Function code: read input registers.
pub const READ_INPUT: u8 = 0x04;
/// Function code: write a single holding register.
pub const WRITE_SINGLE: u8 = 0x06;

/// Holding registers, one per joint position.
pub const POSITION_BASE: u16 = 0x0000;
/// Holding registers, one per joint speed.
pub const SPEED_BASE: u16 = 0x0010;
/// Holding registers, one per joint torque.
pub const TORQUE_BASE: u16 = 0x0020;
/// Input registers, sensor channels finger by finger.
pub const SENSOR_BASE: u16 = 0x0100;
/// Input registers, one per joint temperature.
pub const TEMPERATURE_BASE: u16 = 0x0200;
/// Holding registers, one per joint fault code.
pub const FAULT_BASE: u16 = 0x0210;
/// Input registers holding the firmware version.
pub const VERSION_BASE: u16 = 0x0300;
/// Length of the version block.
pub const VERSION_REGISTERS: u16 = 4;

/// Registers per read request that fit one frame.
const MAX_READ: u16 = 2;

/// CRC-16/MODBUS over the unit byte and the PDU.
pub fn rtu_crc(unit: u8, pdu: &[u8]) -> u16 {
    let mut digest = MODBUS_CRC.digest();
    digest.update(&[unit]);
    digest.update(pdu);
    digest.finalize()
}

/// Wrap a PDU into a frame addressed to `unit`.
pub fn encode_pdu(unit: u8, pdu: &[u8]) -> HandResult<Frame> {
    let crc = rtu_crc(unit, pdu).to_le_bytes();
    let mut payload = pdu.to_vec();
    payload.extend_from_slice(&crc);
    Frame::new(u32::from(unit), &payload)
}

/// Check the CRC of a reply and return its PDU.
pub fn decode_pdu(unit: u8, function: u8, frame: &Frame) -> HandResult<Vec<u8>> {
    let data = frame.data();
    if data.len() < 3 {
        return Err(HandError::UnexpectedResponse {
            command: function,
            reason: format!("reply of {} bytes is too short", data.len()),
        });
    }
    let (pdu, crc) = data.split_at(data.len() - 2);
    if u16::from_le_bytes([crc[0], crc[1]]) != rtu_crc(unit, pdu) {
        return Err(HandError::UnexpectedResponse {
            command: function,
            reason: "CRC mismatch".to_string(),
        });
    }
    if pdu[0] == function | 0x80 {
        return Err(HandError::UnexpectedResponse {
            command: function,
            reason: format!("exception code {:#04x}", pdu.get(1).copied().unwrap_or(0)),
        });
    }
    if pdu[0] != function {
        return Err(HandError::UnexpectedResponse {
            command: function,
            reason: format!("reply carries function {:#04x}", pdu[0]),
        });
    }
    Ok(pdu.to_vec())
}

/// L10 hand behind a Modbus RTU gateway.
pub struct ModbusL10Hand {
    identity: HandIdentity,
    limits: JointLimitTable,
    transport: Box<dyn FrameTransport>,
    connected: bool,
}

impl ModbusL10Hand {
    /// Fails unless `identity.model` is L10.
    pub fn new(identity: HandIdentity, transport: Box<dyn FrameTransport>) -> HandResult<Self> {
        if identity.model != HandModel::L10 {
            return Err(HandError::unsupported_model(identity.model, "on modbus"));
        }
        if identity.transport != TransportKind::Modbus {
            return Err(HandError::unsupported_model(
                identity.model,
                "by the modbus driver on a CAN-framed transport",
            ));
        }
        let limits = hand_core::resolve_limit_table(identity.model, identity.handedness)?;
        tracing::debug!(hand = %identity, "modbus L10 driver ready");
        Ok(Self {
            identity,
            limits,
            transport,
            connected: true,
        })
    }

    fn unit(&self) -> u8 {
        self.identity.handedness.hand_id() as u8
    }

    fn ensure_connected(&self) -> HandResult<()> {
        if self.connected {
            Ok(())
        } else {
            Err(HandError::NotConnected)
        }
    }

    async fn transact(&mut self, pdu: &[u8]) -> HandResult<Vec<u8>> {
        let unit = self.unit();
        let request = encode_pdu(unit, pdu)?;
        tracing::trace!(?request, "tx");
        self.transport.send(request).await?;
        let reply = self.transport.recv().await?;
        tracing::trace!(?reply, "rx");
        decode_pdu(unit, pdu[0], &reply)
    }

    async fn write_register(&mut self, address: u16, value: u16) -> HandResult<()> {
        let [ah, al] = address.to_be_bytes();
        let [vh, vl] = value.to_be_bytes();
        let request = [WRITE_SINGLE, ah, al, vh, vl];
        let echo = self.transact(&request).await?;
        if echo != request {
            return Err(HandError::UnexpectedResponse {
                command: WRITE_SINGLE,
                reason: format!("write to {address:#06x} not echoed"),
            });
        }
        Ok(())
    }

    async fn read_registers(&mut self, function: u8, start: u16, count: u16) -> HandResult<Vec<u16>> {
        let mut values = Vec::with_capacity(count as usize);
        let mut address = start;
        let end = start + count;
        while address < end {
            let qty = MAX_READ.min(end - address);
            let [ah, al] = address.to_be_bytes();
            let [qh, ql] = qty.to_be_bytes();
            let pdu = self.transact(&[function, ah, al, qh, ql]).await?;

            let byte_count = usize::from(qty) * 2;
            if pdu.len() != byte_count + 2 || usize::from(pdu[1]) != byte_count {
                return Err(HandError::UnexpectedResponse {
                    command: function,
                    reason: format!("expected {byte_count} data bytes at {address:#06x}"),
                });
            }
            values.extend(
                pdu[2..]
                    .chunks_exact(2)
                    .map(|pair| u16::from_be_bytes([pair[0], pair[1]])),
            );
            address += qty;
        }
        Ok(values)
    }

    async fn write_joints(&mut self, base: u16, values: &[u8]) -> HandResult<()> {
        self.ensure_connected()?;
        self.limits.check_len(values.len())?;
        for (offset, &value) in (0u16..).zip(values) {
            self.write_register(base + offset, u16::from(value)).await?;
        }
        Ok(())
    }

    async fn read_joints(&mut self, function: u8, base: u16) -> HandResult<Vec<u8>> {
        self.ensure_connected()?;
        let count = self.limits.joint_count() as u16;
        let registers = self.read_registers(function, base, count).await?;
        Ok(registers.into_iter().map(saturate).collect())
    }
}

fn saturate(register: u16) -> u8 {
    register.min(u16::from(u8::MAX)) as u8
}

#[async_trait]
impl Hand for ModbusL10Hand {
    fn identity(&self) -> HandIdentity {
        self.identity
    }

    fn limits(&self) -> JointLimitTable {
        self.limits
    }

    async fn connect(&mut self) -> HandResult<()> {
        if !self.connected {
            self.transport.reopen().await?;
            self.connected = true;
        }
        Ok(())
    }

    async fn disconnect(&mut self) -> HandResult<()> {
        if self.connected {
            self.transport.close().await?;
            self.connected = false;
        }
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    #[instrument(skip(self, raw), fields(unit = self.unit()))]
    async fn set_joint_raw(&mut self, raw: &[u8]) -> HandResult<()> {
        self.write_joints(POSITION_BASE, raw).await
    }

    #[instrument(skip(self), fields(unit = self.unit()))]
    async fn read_joint_raw(&mut self) -> HandResult<Vec<u8>> {
        self.read_joints(READ_HOLDING, POSITION_BASE).await
    }

    #[instrument(skip(self), fields(unit = self.unit()))]
    async fn read_sensors(&mut self) -> HandResult<SensorSnapshot> {
        self.ensure_connected()?;
        let registers = self
            .read_registers(READ_INPUT, SENSOR_BASE, (4 * FINGER_COUNT) as u16)
            .await?;
        let mut snapshot = SensorSnapshot::default();
        let channels = [
            &mut snapshot.normal_force,
            &mut snapshot.tangential_force,
            &mut snapshot.tangential_direction,
            &mut snapshot.proximity,
        ];
        for (channel, chunk) in channels.into_iter().zip(registers.chunks_exact(FINGER_COUNT)) {
            for (slot, &value) in channel.iter_mut().zip(chunk) {
                *slot = saturate(value);
            }
        }
        Ok(snapshot)
    }

    async fn set_speed(&mut self, speed: &[u8]) -> HandResult<()> {
        self.write_joints(SPEED_BASE, speed).await
    }

    async fn set_torque(&mut self, torque: &[u8]) -> HandResult<()> {
        self.write_joints(TORQUE_BASE, torque).await
    }

    async fn read_temperatures(&mut self) -> HandResult<Vec<u8>> {
        self.read_joints(READ_INPUT, TEMPERATURE_BASE).await
    }

    async fn read_fault_codes(&mut self) -> HandResult<Vec<u8>> {
        self.read_joints(READ_INPUT, FAULT_BASE).await
    }

    async fn read_version(&mut self) -> HandResult<Vec<u8>> {
        self.ensure_connected()?;
        let registers = self
            .read_registers(READ_INPUT, VERSION_BASE, VERSION_REGISTERS)
            .await?;
        Ok(registers.into_iter().map(saturate).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hand_core::Handedness;
    use hand_driver_mock::SimulatedBus;

    fn modbus_hand(bus: &SimulatedBus) -> ModbusL10Hand {
        let identity = HandIdentity::new(HandModel::L10, Handedness::Right, TransportKind::Modbus);
        ModbusL10Hand::new(identity, Box::new(bus.hand(TransportKind::Modbus))).unwrap()
    }

    #[test]
    fn test_crc_known_vector() {
        // 01 03 00 00 00 01 -> CRC 84 0A
        assert_eq!(rtu_crc(0x01, &[0x03, 0x00, 0x00, 0x00, 0x01]), 0x0A84);
    }

    #[test]
    fn test_decode_rejects_bad_crc() {
        let mut frame = encode_pdu(0x27, &[0x03, 0x02, 0x00, 0x10]).unwrap();
        assert!(decode_pdu(0x27, 0x03, &frame).is_ok());
        let mut data = frame.data().to_vec();
        data[2] ^= 0xFF;
        frame = Frame::new(0x27, &data).unwrap();
        assert!(matches!(
            decode_pdu(0x27, 0x03, &frame),
            Err(HandError::UnexpectedResponse { .. })
        ));
    }

    #[test]
    fn test_decode_exception() {
        let frame = encode_pdu(0x28, &[0x83, 0x02]).unwrap();
        let err = decode_pdu(0x28, 0x03, &frame).unwrap_err();
        assert!(err.to_string().contains("exception code 0x02"));
    }

    #[test]
    fn test_only_l10_on_modbus() {
        let bus = SimulatedBus::new();
        let identity = HandIdentity::new(HandModel::L20, Handedness::Left, TransportKind::Modbus);
        assert!(matches!(
            ModbusL10Hand::new(identity, Box::new(bus.hand(TransportKind::Modbus))),
            Err(HandError::UnsupportedModel { .. })
        ));
    }

    #[tokio::test]
    async fn test_positions_round_trip_through_registers() {
        let bus = SimulatedBus::new();
        let mut hand = modbus_hand(&bus);
        let raw = [5, 15, 25, 35, 45, 55, 65, 75, 85, 95];
        hand.set_joint_raw(&raw).await.unwrap();
        assert_eq!(bus.holding_register(0x27, POSITION_BASE + 3), 35);
        assert_eq!(hand.read_joint_raw().await.unwrap(), raw.to_vec());
    }

    #[tokio::test]
    async fn test_sensor_block() {
        let bus = SimulatedBus::new();
        for i in 0..20u16 {
            bus.seed_input_register(0x27, SENSOR_BASE + i, i * 10);
        }
        let mut hand = modbus_hand(&bus);
        let snapshot = hand.read_sensors().await.unwrap();
        assert_eq!(snapshot.normal_force, [0, 10, 20, 30, 40]);
        assert_eq!(snapshot.proximity, [150, 160, 170, 180, 190]);
    }

    #[tokio::test]
    async fn test_clear_faults_not_offered() {
        let bus = SimulatedBus::new();
        let mut hand = modbus_hand(&bus);
        assert!(matches!(
            hand.clear_faults().await,
            Err(HandError::Unsupported { .. })
        ));
    }
}
