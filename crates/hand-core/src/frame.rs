//! Bus transaction unit exchanged with the transport layer.
//!
//! A [`Frame`] carries an identifier, a declared length (0-8) and a fixed
//! 8-byte payload. Only the first `len` bytes are meaningful; [`Frame::data`]
//! never exposes the rest.

use crate::error::{HandError, HandResult};
use std::fmt;

/// Maximum payload bytes in one frame.
pub const MAX_FRAME_LEN: usize = 8;

/// One bus transaction.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    identifier: u32,
    len: u8,
    payload: [u8; MAX_FRAME_LEN],
}

impl Frame {
    /// Build a frame from an identifier and payload bytes.
    ///
    /// Fails with [`HandError::InvalidFrame`] if `data` is longer than 8 bytes.
    pub fn new(identifier: u32, data: &[u8]) -> HandResult<Self> {
        let mut frame = Self::with_length(identifier, data.len())?;
        frame.payload[..data.len()].copy_from_slice(data);
        Ok(frame)
    }

    /// Zero-filled frame with the given declared length.
    pub fn with_length(identifier: u32, len: usize) -> HandResult<Self> {
        if len > MAX_FRAME_LEN {
            return Err(HandError::InvalidFrame(len));
        }
        Ok(Self {
            identifier,
            len: len as u8,
            payload: [0; MAX_FRAME_LEN],
        })
    }

    /// Command frame: one command byte followed by at most 7 body bytes.
    pub fn command(identifier: u32, command: u8, body: &[u8]) -> HandResult<Self> {
        let mut frame = Self::with_length(identifier, body.len() + 1)?;
        frame.payload[0] = command;
        frame.payload[1..=body.len()].copy_from_slice(body);
        Ok(frame)
    }

    /// Arbitration identifier, the hand id for LinkerHand frames.
    pub fn identifier(&self) -> u32 {
        self.identifier
    }

    /// Declared payload length.
    pub fn len(&self) -> usize {
        self.len as usize
    }

    /// True when the payload length is zero.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Meaningful payload bytes.
    pub fn data(&self) -> &[u8] {
        &self.payload[..self.len as usize]
    }

    /// First payload byte, if any.
    pub fn command_byte(&self) -> Option<u8> {
        self.data().first().copied()
    }

    /// Payload after the command byte.
    pub fn body(&self) -> &[u8] {
        self.data().get(1..).unwrap_or(&[])
    }
}

impl fmt::Debug for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Frame({:#05x} [", self.identifier)?;
        for (i, b) in self.data().iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{b:02X}")?;
        }
        f.write_str("])")
    }
}
