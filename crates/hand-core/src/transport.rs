//! Frame transport abstraction.
//!
//! Drivers talk to the bus through [`FrameTransport`] and never open a device
//! themselves. A [`TransportOpener`] turns a [`TransportEndpoint`] into an
//! open transport; the factory holds one opener and calls it while building a
//! hand, so tests can substitute a simulated bus without touching drivers.

use crate::error::TransportError;
use crate::frame::Frame;
use crate::model::TransportKind;
use async_trait::async_trait;
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where and how to open a transport.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportEndpoint {
    /// Bus kind.
    pub kind: TransportKind,
    /// Interface or device name, e.g. `can0` or `/dev/ttyUSB0`.
    pub channel: String,
    /// Bus bitrate in bits per second.
    pub bitrate: u32,
}

impl fmt::Display for TransportEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} @ {} bps)", self.kind, self.channel, self.bitrate)
    }
}

/// An open, exclusively owned bus link.
#[async_trait]
pub trait FrameTransport: Send {
    /// Transmit one frame.
    async fn send(&mut self, frame: Frame) -> Result<(), TransportError>;

    /// Wait for the next inbound frame.
    async fn recv(&mut self) -> Result<Frame, TransportError>;

    /// Release the link. Idempotent.
    async fn close(&mut self) -> Result<(), TransportError>;

    /// Re-acquire the link after [`FrameTransport::close`].
    async fn reopen(&mut self) -> Result<(), TransportError> {
        Err(TransportError::Closed)
    }

    /// Short label for logs.
    fn label(&self) -> String {
        "transport".to_string()
    }
}

/// Opens transports for the factory.
pub trait TransportOpener: Send + Sync {
    fn open<'a>(
        &'a self,
        endpoint: &'a TransportEndpoint,
    ) -> BoxFuture<'a, Result<Box<dyn FrameTransport>, TransportError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_display() {
        let endpoint = TransportEndpoint {
            kind: TransportKind::Can1,
            channel: "can1".into(),
            bitrate: 1_000_000,
        };
        assert_eq!(endpoint.to_string(), "can1 (can1 @ 1000000 bps)");
    }
}
