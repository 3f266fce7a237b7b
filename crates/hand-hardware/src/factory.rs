//! Hand factory.
//!
//! Resolves `(model, hand id, transport)` into a concrete driver, opens the
//! transport through a [`TransportOpener`] and hands the caller exclusive
//! ownership of the result as a `Box<dyn Hand>`.
//!
//! # Example
//!
//! ```rust,ignore
//! let factory = HandFactory::new(Arc::new(bus), HandSettings::load(None)?);
//! let mut hand = factory
//!     .create_hand(HandModel::L10, 0x28, TransportKind::Can0)
//!     .await?;
//! hand.set_joint_angles(&[0.0; 10]).await?;
//! ```

use figment::providers::{Format, Toml};
use figment::Figment;
use hand_core::{
    Hand, HandError, HandIdentity, HandModel, HandResult, HandSettings, Handedness,
    TransportKind, TransportOpener,
};
use hand_drivers::{L10Hand, L20Hand, L25Hand, L6Hand, L7Hand};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::instrument;

// =============================================================================
// Driver Selection
// =============================================================================

/// Concrete driver chosen for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverKind {
    /// [`L6Hand`] for L6 and O6.
    SixJoint,
    /// [`L7Hand`].
    SevenJoint,
    /// [`L10Hand`] over CAN framing.
    TenJoint,
    /// [`L20Hand`].
    TwentyJoint,
    /// Shared L21/L25 driver with its fixed sub-variant selector.
    TwentyFiveJoint { sub_variant: u8 },
    /// L10 over Modbus RTU.
    #[cfg(feature = "modbus")]
    ModbusTenJoint,
}

impl fmt::Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SixJoint => f.write_str("six-joint"),
            Self::SevenJoint => f.write_str("seven-joint"),
            Self::TenJoint => f.write_str("ten-joint"),
            Self::TwentyJoint => f.write_str("twenty-joint"),
            Self::TwentyFiveJoint { sub_variant } => {
                write!(f, "twenty-five-joint (selector {sub_variant})")
            }
            #[cfg(feature = "modbus")]
            Self::ModbusTenJoint => f.write_str("modbus ten-joint"),
        }
    }
}

/// Pick the driver for `model` on `transport` without opening anything.
pub fn select_driver(model: HandModel, transport: TransportKind) -> HandResult<DriverKind> {
    if transport == TransportKind::Modbus {
        return select_modbus_driver(model);
    }
    Ok(match model {
        HandModel::O6 | HandModel::L6 => DriverKind::SixJoint,
        HandModel::L7 => DriverKind::SevenJoint,
        HandModel::L10 => DriverKind::TenJoint,
        HandModel::L20 => DriverKind::TwentyJoint,
        HandModel::L21 | HandModel::L25 => DriverKind::TwentyFiveJoint {
            sub_variant: model
                .sub_variant()
                .ok_or_else(|| HandError::unsupported_model(model, "without a sub-variant"))?,
        },
    })
}

#[cfg(feature = "modbus")]
fn select_modbus_driver(model: HandModel) -> HandResult<DriverKind> {
    match model {
        HandModel::L10 => Ok(DriverKind::ModbusTenJoint),
        other => Err(HandError::unsupported_model(other, "on modbus")),
    }
}

#[cfg(not(feature = "modbus"))]
fn select_modbus_driver(_model: HandModel) -> HandResult<DriverKind> {
    Err(HandError::FeatureDisabled("modbus"))
}

// =============================================================================
// Config-driven requests
// =============================================================================

/// A hand request as written in a config file.
///
/// ```toml
/// model = "L10"
/// hand = "left"        # or "0x28"
/// transport = "can0"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandRequest {
    /// Model name, case-insensitive.
    pub model: String,
    /// `left`, `right` or a numeric hand id.
    pub hand: String,
    /// Transport name, case-insensitive.
    pub transport: String,
}

impl HandRequest {
    /// Parse a request from TOML text.
    pub fn from_toml(source: &str) -> HandResult<Self> {
        Ok(Figment::from(Toml::string(source))
            .extract::<Self>()
            .map_err(Box::new)?)
    }

    /// Parse the three selectors.
    pub fn resolve(&self) -> HandResult<(HandModel, u32, TransportKind)> {
        let model: HandModel = self.model.parse()?;
        let hand_id = parse_hand_selector(&self.hand)?;
        let transport: TransportKind = self.transport.parse()?;
        Ok((model, hand_id, transport))
    }
}

/// Accepts `left`/`right` or a numeric hand id (`0x28`, `40`).
fn parse_hand_selector(selector: &str) -> HandResult<u32> {
    let trimmed = selector.trim();
    let numeric = match trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        Some(hex) => u32::from_str_radix(hex, 16).ok(),
        None => trimmed.parse::<u32>().ok(),
    };
    match numeric {
        Some(id) => Ok(id),
        None => trimmed.parse::<Handedness>().map(|h| h.hand_id()),
    }
}

// =============================================================================
// HandFactory
// =============================================================================

/// Builds connected hands. Holds no mutable state and can be shared freely.
#[derive(Clone)]
pub struct HandFactory {
    opener: Arc<dyn TransportOpener>,
    settings: HandSettings,
}

impl fmt::Debug for HandFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandFactory")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl HandFactory {
    /// Factory opening transports through `opener`.
    pub fn new(opener: Arc<dyn TransportOpener>, settings: HandSettings) -> Self {
        Self { opener, settings }
    }

    /// Settings used for every endpoint.
    pub fn settings(&self) -> &HandSettings {
        &self.settings
    }

    /// Create a hand for `model` with hand id `hand_id` on `transport`.
    ///
    /// # Errors
    ///
    /// - `InvalidHandedness` if `hand_id` is not 0x28 or 0x27
    /// - `UnsupportedModel` if no driver serves `model` on `transport`
    /// - `FeatureDisabled` for Modbus in a build without the `modbus` feature
    /// - `TransportOpen` if the transport cannot be opened
    #[instrument(skip(self))]
    pub async fn create_hand(
        &self,
        model: HandModel,
        hand_id: u32,
        transport: TransportKind,
    ) -> HandResult<Box<dyn Hand>> {
        let handedness = Handedness::try_from(hand_id)?;
        let driver = select_driver(model, transport)?;
        let identity = HandIdentity::new(model, handedness, transport);

        let endpoint = self.settings.endpoint(transport);
        let link = self
            .opener
            .open(&endpoint)
            .await
            .map_err(|source| HandError::TransportOpen { transport, source })?;

        let hand: Box<dyn Hand> = match driver {
            DriverKind::SixJoint => Box::new(L6Hand::new(identity, link)?),
            DriverKind::SevenJoint => Box::new(L7Hand::new(identity, link)?),
            DriverKind::TenJoint => Box::new(L10Hand::new(identity, link)?),
            DriverKind::TwentyJoint => Box::new(L20Hand::new(identity, link)?),
            DriverKind::TwentyFiveJoint { sub_variant } => {
                Box::new(L25Hand::new(identity, sub_variant, link)?)
            }
            #[cfg(feature = "modbus")]
            DriverKind::ModbusTenJoint => {
                Box::new(hand_drivers::ModbusL10Hand::new(identity, link)?)
            }
        };
        tracing::info!(hand = %identity, %driver, %endpoint, "hand created");
        Ok(hand)
    }

    /// Like [`create_hand`](Self::create_hand) with the numeric transport
    /// selector (0 = can0, 1 = can1, 2 = modbus, 3 = ethercat).
    pub async fn create_hand_from_selector(
        &self,
        model: HandModel,
        hand_id: u32,
        transport: u8,
    ) -> HandResult<Box<dyn Hand>> {
        let transport = TransportKind::try_from(transport)?;
        self.create_hand(model, hand_id, transport).await
    }

    /// Resolve a [`HandRequest`] and build the hand.
    pub async fn create_from_config(&self, request: &HandRequest) -> HandResult<Box<dyn Hand>> {
        let (model, hand_id, transport) = request.resolve()?;
        self.create_hand(model, hand_id, transport).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_driver_aliases() {
        assert_eq!(
            select_driver(HandModel::O6, TransportKind::Can0).unwrap(),
            DriverKind::SixJoint
        );
        assert_eq!(
            select_driver(HandModel::L25, TransportKind::EtherCat).unwrap(),
            DriverKind::TwentyFiveJoint { sub_variant: 0 }
        );
        assert_eq!(
            select_driver(HandModel::L21, TransportKind::Can1).unwrap(),
            DriverKind::TwentyFiveJoint { sub_variant: 1 }
        );
    }

    #[test]
    fn test_parse_hand_selector() {
        assert_eq!(parse_hand_selector("left").unwrap(), 0x28);
        assert_eq!(parse_hand_selector(" R ").unwrap(), 0x27);
        assert_eq!(parse_hand_selector("0x28").unwrap(), 0x28);
        assert_eq!(parse_hand_selector("39").unwrap(), 0x27);
        assert!(matches!(
            parse_hand_selector("middle"),
            Err(HandError::InvalidHandedness(_))
        ));
    }

    #[test]
    fn test_request_from_toml() {
        let request = HandRequest::from_toml(
            r#"
            model = "L20"
            hand = "0x27"
            transport = "ethercat"
            "#,
        )
        .unwrap();
        assert_eq!(
            request.resolve().unwrap(),
            (HandModel::L20, 0x27, TransportKind::EtherCat)
        );
    }

    #[test]
    fn test_request_unknown_transport() {
        let request = HandRequest {
            model: "L10".into(),
            hand: "left".into(),
            transport: "usb".into(),
        };
        assert!(matches!(
            request.resolve(),
            Err(HandError::UnknownTransport(t)) if t == "usb"
        ));
    }

    #[test]
    fn test_request_missing_field_is_config_error() {
        assert!(matches!(
            HandRequest::from_toml("model = \"L10\""),
            Err(HandError::Config(_))
        ));
    }
}
