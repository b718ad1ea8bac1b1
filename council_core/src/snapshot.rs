//! Read-only views handed to presentation sinks.

use crate::classify::{LiveStatus, Outcome};
use crate::controller::RunState;
use crate::update::Feedback;
use serde::{Deserialize, Serialize};

/// A point-in-time copy of everything a renderer needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Number of rows written so far (the next step to compute)
    pub step: usize,

    /// Total steps in the run
    pub step_count: usize,

    pub member_count: usize,

    pub state: RunState,

    /// Written history rows, time-major
    pub rows: Vec<Vec<f64>>,

    /// Mean trajectory so far
    pub means: Vec<f64>,

    /// Live label for the latest mean, if any step has run
    #[serde(skip_serializing_if = "Option::is_none")]
    pub live_status: Option<LiveStatus>,

    /// Verdict that produced the latest row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_feedback: Option<Feedback>,

    /// Final classification, present only once the run is complete
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl SessionSnapshot {
    /// Mean of the latest row.
    pub fn current_mean(&self) -> Option<f64> {
        self.means.last().copied()
    }

    /// Latest row.
    pub fn current_row(&self) -> Option<&[f64]> {
        self.rows.last().map(Vec::as_slice)
    }

    pub fn is_complete(&self) -> bool {
        self.step >= self.step_count
    }

    /// Fraction of the run completed, in [0, 1].
    pub fn progress(&self) -> f64 {
        if self.step_count == 0 {
            return 1.0;
        }
        self.step as f64 / self.step_count as f64
    }
}
