//! Error types for the council engine.

use thiserror::Error;

/// Errors raised by the council engine.
///
/// None of these are transient: a configuration error means the caller passed
/// parameters the engine refuses to run with, and every other variant is an
/// ordering defect in whoever drives the history buffer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CouncilError {
    /// Parameters outside their documented ranges (including NaN / infinity).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A history row was recorded out of order or twice.
    #[error("Sequence error: expected row {expected}, got row {got}")]
    Sequence { expected: usize, got: usize },

    /// A history row index at or past the configured step count.
    #[error("Row {step} is outside the history (step count {step_count})")]
    RowOutOfRange { step: usize, step_count: usize },

    /// A row whose width does not match the member count.
    #[error("Row width mismatch: expected {expected} members, got {got}")]
    RowWidth { expected: usize, got: usize },

    /// A read of a row that has not been written yet.
    #[error("Row {step} has not been recorded ({recorded} rows written)")]
    NotRecorded { step: usize, recorded: usize },
}

impl CouncilError {
    /// Creates a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Result alias used throughout the engine.
pub type Result<T> = std::result::Result<T, CouncilError>;
