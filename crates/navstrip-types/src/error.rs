//! Error types for navstrip.

use std::io;

/// Errors produced by the navigation strip.
///
/// None of these are fatal to the host: callers degrade to a plain but
/// functional strip and log the error.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    #[error("config error: {0}")]
    Config(String),

    #[error("action list error: {0}")]
    ActionList(String),

    #[error("icon error: {0}")]
    Icon(String),

    #[error("lock task query failed: {0}")]
    LockTask(String),

    #[error("layout error: {0}")]
    Layout(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, NavError>;
