//! Transport settings.
//!
//! Layering, lowest priority first:
//!
//! 1. [`HandSettings::default`] (1 Mbit/s, channels named after the transport)
//! 2. an optional TOML file
//! 3. `LINKER_HAND_*` environment variables, `__` separating nested keys
//!    (e.g. `LINKER_HAND_CHANNELS__CAN0=vcan0`)
//!
//! ```toml
//! bitrate = 1000000
//!
//! [channels]
//! can0 = "can0"
//! modbus = "/dev/ttyUSB0"
//! ```

use crate::error::HandResult;
use crate::model::TransportKind;
use crate::transport::TransportEndpoint;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default bus bitrate.
pub const DEFAULT_BITRATE: u32 = 1_000_000;

/// Environment prefix for overrides.
pub const ENV_PREFIX: &str = "LINKER_HAND_";

/// Interface name per transport kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChannelNames {
    /// Interface for [`TransportKind::Can0`].
    pub can0: String,
    /// Interface for [`TransportKind::Can1`].
    pub can1: String,
    /// Serial device for [`TransportKind::Modbus`].
    pub modbus: String,
    /// Interface for [`TransportKind::EtherCat`].
    pub ethercat: String,
}

impl Default for ChannelNames {
    fn default() -> Self {
        Self {
            can0: TransportKind::Can0.as_str().to_string(),
            can1: TransportKind::Can1.as_str().to_string(),
            modbus: TransportKind::Modbus.as_str().to_string(),
            ethercat: TransportKind::EtherCat.as_str().to_string(),
        }
    }
}

impl ChannelNames {
    /// Channel name configured for `kind`.
    pub fn for_kind(&self, kind: TransportKind) -> &str {
        match kind {
            TransportKind::Can0 => &self.can0,
            TransportKind::Can1 => &self.can1,
            TransportKind::Modbus => &self.modbus,
            TransportKind::EtherCat => &self.ethercat,
        }
    }
}

/// Settings the factory uses to build transport endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandSettings {
    /// Bus bitrate in bits per second.
    pub bitrate: u32,
    /// Interface names per transport.
    pub channels: ChannelNames,
}

impl Default for HandSettings {
    fn default() -> Self {
        Self {
            bitrate: DEFAULT_BITRATE,
            channels: ChannelNames::default(),
        }
    }
}

impl HandSettings {
    /// Provider stack without extracting.
    pub fn figment(config_path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(HandSettings::default()));
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load settings from defaults, an optional TOML file and the environment.
    pub fn load(config_path: Option<&Path>) -> HandResult<Self> {
        let settings = Self::figment(config_path)
            .extract::<Self>()
            .map_err(Box::new)?;
        tracing::debug!(?settings, "loaded hand settings");
        Ok(settings)
    }

    /// Endpoint for `kind` under these settings.
    pub fn endpoint(&self, kind: TransportKind) -> TransportEndpoint {
        TransportEndpoint {
            kind,
            channel: self.channels.for_kind(kind).to_string(),
            bitrate: self.bitrate,
        }
    }
}
