//! Register file and wire-protocol emulation of a simulated hand.
//!
//! CAN-framed transports: a frame with a command byte and a body is a write
//! and is stored under `(identifier, command)`; a frame with only a command
//! byte is a query and is answered with the stored body. Registers never
//! written read back as a command default or as seven zero bytes.
//!
//! Modbus: frames carry an RTU PDU plus CRC. Functions 0x03, 0x04 and 0x06 are
//! served from holding/input register maps; anything else gets exception 0x01.
//! Frames with a bad CRC are ignored, as a real slave would.

use crc::{Crc, CRC_16_MODBUS};
use hand_core::Frame;
use std::collections::HashMap;

static MODBUS_CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_MODBUS);

/// Body returned for a register that was never written.
const BLANK_REGISTER: [u8; 7] = [0; 7];

/// Highest register count per read that fits one reply frame.
const MAX_READ: u16 = 2;

#[derive(Debug, Default)]
pub(crate) struct RegisterFile {
    can: HashMap<(u32, u8), Vec<u8>>,
    can_defaults: HashMap<u8, Vec<u8>>,
    holding: HashMap<(u8, u16), u16>,
    input: HashMap<(u8, u16), u16>,
}

impl RegisterFile {
    pub(crate) fn seed_can(&mut self, identifier: u32, command: u8, body: &[u8]) {
        self.can.insert((identifier, command), body.to_vec());
    }

    pub(crate) fn seed_can_default(&mut self, command: u8, body: &[u8]) {
        self.can_defaults.insert(command, body.to_vec());
    }

    pub(crate) fn can_register(&self, identifier: u32, command: u8) -> Option<Vec<u8>> {
        self.can.get(&(identifier, command)).cloned()
    }

    pub(crate) fn seed_input(&mut self, unit: u8, address: u16, value: u16) {
        self.input.insert((unit, address), value);
    }

    pub(crate) fn holding(&self, unit: u8, address: u16) -> u16 {
        self.holding.get(&(unit, address)).copied().unwrap_or(0)
    }

    /// Apply a CAN-framed request, returning the reply if it was a query.
    pub(crate) fn respond_can(&mut self, request: &Frame) -> Option<Frame> {
        let command = request.command_byte()?;
        let identifier = request.identifier();
        if !request.body().is_empty() {
            self.seed_can(identifier, command, request.body());
            return None;
        }
        let body = self
            .can
            .get(&(identifier, command))
            .or_else(|| self.can_defaults.get(&command))
            .map(Vec::as_slice)
            .unwrap_or(&BLANK_REGISTER[..]);
        let body = &body[..body.len().min(BLANK_REGISTER.len())];
        Frame::command(identifier, command, body).ok()
    }

    /// Apply a Modbus RTU request, returning the slave's reply.
    pub(crate) fn respond_modbus(&mut self, request: &Frame) -> Option<Frame> {
        let unit = u8::try_from(request.identifier()).ok()?;
        let data = request.data();
        if data.len() < 3 {
            return None;
        }
        let (pdu, crc) = data.split_at(data.len() - 2);
        if u16::from_le_bytes([crc[0], crc[1]]) != rtu_crc(unit, pdu) {
            tracing::trace!(?request, "dropping modbus frame with bad CRC");
            return None;
        }

        let function = pdu[0];
        let reply = match (function, pdu.len()) {
            (0x06, 5) => {
                let address = u16::from_be_bytes([pdu[1], pdu[2]]);
                let value = u16::from_be_bytes([pdu[3], pdu[4]]);
                self.holding.insert((unit, address), value);
                pdu.to_vec()
            }
            (0x03 | 0x04, 5) => {
                let start = u16::from_be_bytes([pdu[1], pdu[2]]);
                let qty = u16::from_be_bytes([pdu[3], pdu[4]]);
                if qty == 0 || qty > MAX_READ {
                    vec![function | 0x80, 0x03]
                } else {
                    let table = if function == 0x03 {
                        &self.holding
                    } else {
                        &self.input
                    };
                    let mut reply = vec![function, (qty * 2) as u8];
                    for address in start..start.saturating_add(qty) {
                        let value = table.get(&(unit, address)).copied().unwrap_or(0);
                        reply.extend_from_slice(&value.to_be_bytes());
                    }
                    reply
                }
            }
            _ => vec![function | 0x80, 0x01],
        };

        let mut payload = reply;
        let crc = rtu_crc(unit, &payload).to_le_bytes();
        payload.extend_from_slice(&crc);
        Frame::new(u32::from(unit), &payload).ok()
    }
}

fn rtu_crc(unit: u8, pdu: &[u8]) -> u16 {
    let mut digest = MODBUS_CRC.digest();
    digest.update(&[unit]);
    digest.update(pdu);
    digest.finalize()
}
