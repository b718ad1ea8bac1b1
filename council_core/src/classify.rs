//! Qualitative labels for a run.
//!
//! Both the live label and the final outcome use the same pair of
//! thresholds: above [`YES_THRESHOLD`] the council agrees on yes, below
//! [`NO_THRESHOLD`] it agrees on no.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Mean opinion above which the council is said to agree on yes.
pub const YES_THRESHOLD: f64 = 0.7;

/// Mean opinion below which the council is said to agree on no.
pub const NO_THRESHOLD: f64 = 0.3;

/// Final classification of a finished run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    ConsensusYes,
    ConsensusNo,
    OscillatingOrChaotic,
}

impl Outcome {
    /// Classifies a final mean opinion.
    pub fn from_final_mean(mean: f64) -> Self {
        if mean > YES_THRESHOLD {
            Outcome::ConsensusYes
        } else if mean < NO_THRESHOLD {
            Outcome::ConsensusNo
        } else {
            Outcome::OscillatingOrChaotic
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::ConsensusYes => "Consensus on YES",
            Outcome::ConsensusNo => "Consensus on NO",
            Outcome::OscillatingOrChaotic => "Oscillation or chaos in the end",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Classifies a mean trajectory by its last value. Empty trajectories have no outcome.
pub fn classify(means: &[f64]) -> Option<Outcome> {
    means.last().map(|&m| Outcome::from_final_mean(m))
}

/// Per-step status shown while a run is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LiveStatus {
    MajorityYes,
    MajorityNo,
    DebateInProgress,
}

impl LiveStatus {
    pub fn from_mean(mean: f64) -> Self {
        if mean > YES_THRESHOLD {
            LiveStatus::MajorityYes
        } else if mean < NO_THRESHOLD {
            LiveStatus::MajorityNo
        } else {
            LiveStatus::DebateInProgress
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            LiveStatus::MajorityYes => "Majority says YES",
            LiveStatus::MajorityNo => "Majority says NO",
            LiveStatus::DebateInProgress => "Debate in progress",
        }
    }
}

impl fmt::Display for LiveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
