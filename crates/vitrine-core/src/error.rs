//! Error types shared by the viewer crates
//!
//! Nothing here is fatal: every failure leaves the previous visual state in place.

use thiserror::Error;

use crate::requests::AssetSlot;

/// Rejected write at the settings boundary
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SettingsError {
    #[error("Invalid value for {path}: {reason}")]
    InvalidParameter { path: String, reason: String },
}

impl SettingsError {
    pub fn invalid(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Failure to fetch or decode a remote asset (texture, font, mesh)
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Failed to load {slot} asset from {source_url}: {reason}")]
pub struct AssetLoadError {
    pub slot: AssetSlot,
    pub source_url: String,
    pub reason: String,
}

impl AssetLoadError {
    pub fn new(slot: AssetSlot, source_url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            slot,
            source_url: source_url.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to parse JSON config: {0}")]
    JsonError(#[from] serde_json::Error),
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}
