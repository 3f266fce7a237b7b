//! Error types for the hand abstraction layer.
//!
//! Every failure the dispatch layer and the conversion engine can report is a
//! variant of [`HandError`]. Callers can match on the variant to tell bad
//! input (`InvalidHandedness`, `LengthMismatch`) from bad configuration
//! (`UnsupportedModel`, `FeatureDisabled`) and from bus trouble
//! (`TransportOpen`, `Transport`).
//!
//! ## Error Hierarchy
//!
//! ```text
//! HandError
//! ├── InvalidHandedness / UnknownTransport / UnsupportedModel   - selection
//! ├── FeatureDisabled                                           - build config
//! ├── LengthMismatch / NonFiniteAngle / DegenerateDomain        - conversion
//! ├── InvalidFrame / UnexpectedResponse                         - framing
//! ├── TransportOpen / Transport / NotConnected                  - bus
//! └── Unsupported / Config                                      - misc
//! ```
//!
//! Nothing here is retried automatically. Retry policy belongs to the caller
//! or the transport layer.

use crate::model::{HandModel, TransportKind};
use thiserror::Error;

/// Convenience alias for results using [`HandError`].
pub type HandResult<T> = std::result::Result<T, HandError>;

// =============================================================================
// Transport Errors
// =============================================================================

/// Failures reported by a [`FrameTransport`](crate::transport::FrameTransport)
/// or a [`TransportOpener`](crate::transport::TransportOpener).
#[derive(Error, Debug)]
pub enum TransportError {
    /// The underlying device or socket could not be opened.
    #[error("failed to open '{channel}': {reason}")]
    Open { channel: String, reason: String },

    /// The transport was closed, locally or by the peer.
    #[error("transport closed")]
    Closed,

    /// The transport gave up waiting for a frame.
    #[error("timed out waiting for a frame")]
    Timeout,

    /// Operating-system level I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Any other bus-specific failure.
    #[error("bus error: {0}")]
    Bus(String),
}

// =============================================================================
// Hand Errors
// =============================================================================

/// Primary error type for hand selection, conversion and driver operations.
#[derive(Error, Debug)]
pub enum HandError {
    /// Hand selector is neither LEFT (0x28) nor RIGHT (0x27).
    #[error("unsupported hand '{0}' (expected 0x28/left or 0x27/right)")]
    InvalidHandedness(String),

    /// Transport selector does not name a known transport.
    #[error("unknown transport '{0}'")]
    UnknownTransport(String),

    /// No driver or limit table exists for this model on the requested path.
    #[error("model {model} is not supported {context}")]
    UnsupportedModel { model: String, context: &'static str },

    /// The requested driver family was compiled out of this build.
    #[error("feature '{0}' is not enabled. Rebuild with --features {0}")]
    FeatureDisabled(&'static str),

    /// A joint vector does not match the model's joint count.
    #[error("expected {expected} joint values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// An angle is NaN or infinite and cannot be clamped.
    #[error("joint {joint} angle {value} is not finite")]
    NonFiniteAngle { joint: usize, value: f64 },

    /// The source interval of a linear map has zero width.
    #[error("degenerate source domain [{lo}, {hi}]")]
    DegenerateDomain { lo: f64, hi: f64 },

    /// Frame payload length exceeds the 8-byte limit.
    #[error("frame length {0} exceeds 8 bytes")]
    InvalidFrame(usize),

    /// A telemetry frame did not have the expected shape.
    #[error("unexpected response to command {command:#04x}: {reason}")]
    UnexpectedResponse { command: u8, reason: String },

    /// Opening the transport failed while constructing a hand.
    #[error("failed to open {transport} transport: {source}")]
    TransportOpen {
        transport: TransportKind,
        #[source]
        source: TransportError,
    },

    /// Send or receive failed on an open transport.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The hand was disconnected before the call.
    #[error("hand is not connected")]
    NotConnected,

    /// Optional capability not offered by this hand variant.
    #[error("{capability} is not supported by {model}")]
    Unsupported {
        model: HandModel,
        capability: &'static str,
    },

    /// Settings could not be extracted.
    #[error("configuration error: {0}")]
    Config(#[from] Box<figment::Error>),
}

impl HandError {
    /// Shorthand for [`HandError::UnsupportedModel`].
    pub fn unsupported_model(model: impl ToString, context: &'static str) -> Self {
        Self::UnsupportedModel {
            model: model.to_string(),
            context,
        }
    }

    /// True for errors caused by caller input rather than configuration or I/O.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidHandedness(_)
                | Self::UnknownTransport(_)
                | Self::LengthMismatch { .. }
                | Self::NonFiniteAngle { .. }
                | Self::InvalidFrame(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handedness_message_is_hex() {
        let err = HandError::InvalidHandedness(format!("{:#04x}", 0x30));
        assert_eq!(
            err.to_string(),
            "unsupported hand '0x30' (expected 0x28/left or 0x27/right)"
        );
    }

    #[test]
    fn test_feature_disabled_message() {
        let err = HandError::FeatureDisabled("modbus");
        assert!(err.to_string().contains("--features modbus"));
    }

    #[test]
    fn test_transport_error_converts() {
        fn fails() -> HandResult<()> {
            Err(TransportError::Closed)?
        }
        assert!(matches!(
            fails(),
            Err(HandError::Transport(TransportError::Closed))
        ));
    }

    #[test]
    fn test_input_error_classification() {
        assert!(HandError::LengthMismatch {
            expected: 10,
            actual: 6
        }
        .is_input_error());
        assert!(HandError::NonFiniteAngle {
            joint: 2,
            value: f64::NAN
        }
        .is_input_error());
        assert!(!HandError::FeatureDisabled("modbus").is_input_error());
        assert!(!HandError::unsupported_model("L7", "on modbus").is_input_error());
    }
}
