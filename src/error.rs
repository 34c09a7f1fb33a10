//! Error type for the fallible edges of the crate.
//!
//! Classification itself is total: missing or malformed upstream fields
//! resolve to defaults. Errors only surface when a document cannot be read
//! at all, when the engine config is broken, or when an external builder
//! fails.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TubeInfoError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid config value for {key}: {reason}")]
    InvalidConfig { key: &'static str, reason: String },

    #[error("Manifest builder error: {0}")]
    Builder(String),
}

pub type Result<T> = std::result::Result<T, TubeInfoError>;
