//! Error types for the simulation harness.

use council_core::CouncilError;
use council_env::EnvError;
use thiserror::Error;

/// Errors surfaced by the harness and CLI.
#[derive(Debug, Error)]
pub enum SimError {
    /// Engine rejected the parameters or a record
    #[error(transparent)]
    Council(#[from] CouncilError),

    /// Environment failure (closed control channel, ...)
    #[error(transparent)]
    Env(#[from] EnvError),

    /// Settings outside the ranges the harness accepts
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unknown preset name
    #[error("Unknown preset: {0}")]
    UnknownPreset(String),

    #[error("Config file error: {0}")]
    ConfigFile(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A spawned task panicked or was cancelled
    #[error("Task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl SimError {
    /// Creates an invalid-configuration error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
