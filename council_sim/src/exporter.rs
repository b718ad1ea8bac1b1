//! JSON exporter for offline rendering.
//!
//! Exports per-step frames (opinion row, mean, status) so an external plotter
//! can draw the heatmap and the trajectory without re-running the engine.

use crate::error::SimError;
use crate::sink::PresentationSink;
use council_core::{CouncilParams, Feedback, LiveStatus, Outcome, SessionSnapshot};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// A single recorded step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimFrame {
    /// Row index in the history
    pub step: usize,

    /// Mean opinion after this step
    pub mean: f64,

    /// Live label for this step
    pub status: LiveStatus,

    /// Verdict that produced this row
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<Feedback>,

    /// Opinion of every member after this step
    pub opinions: Vec<f64>,
}

/// Complete simulation export.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimExport {
    /// Preset name, or "custom"
    pub preset: String,

    /// Seed used, if the run was seeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    pub params: CouncilParams,

    /// All frames
    pub frames: Vec<SimFrame>,

    /// Whether every step ran
    pub completed: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_mean: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,
}

impl SimExport {
    /// Creates a new export container.
    pub fn new(preset: &str, seed: Option<u64>, params: CouncilParams) -> Self {
        Self {
            preset: preset.to_string(),
            seed,
            params,
            frames: Vec::with_capacity(params.step_count),
            completed: false,
            final_mean: None,
            outcome: None,
        }
    }

    /// Adds a frame.
    pub fn add_frame(&mut self, frame: SimFrame) {
        self.frames.push(frame);
    }

    /// Finalizes the export from the completed session.
    pub fn finalize(&mut self, snapshot: &SessionSnapshot) {
        self.completed = snapshot.is_complete();
        self.final_mean = snapshot.current_mean();
        self.outcome = snapshot.outcome;
    }

    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> Result<String, SimError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Writes to a JSON file.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<(), SimError> {
        let json = self.to_json()?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }
}

impl PresentationSink for SimExport {
    fn on_snapshot(&mut self, snapshot: &SessionSnapshot) {
        let (Some(row), Some(mean), Some(status)) = (
            snapshot.current_row(),
            snapshot.current_mean(),
            snapshot.live_status,
        ) else {
            return;
        };

        self.add_frame(SimFrame {
            step: snapshot.step - 1,
            mean,
            status,
            feedback: snapshot.last_feedback,
            opinions: row.to_vec(),
        });
    }

    fn on_complete(&mut self, snapshot: &SessionSnapshot) {
        self.finalize(snapshot);
    }
}
