//! Scripted control signals for headless and deterministic runs.

use async_trait::async_trait;
use council_env::{ControlChannel, ControlSignal};
use std::collections::VecDeque;

/// Replays control signals at fixed drain rounds.
///
/// A stepping loop drains its control channel once per tick; each drain is one
/// round. A signal scheduled for round `n` is delivered during the first drain
/// that reaches `n`. While the loop is halted and waiting, the script jumps
/// straight to its next scheduled signal, so a paused run resumes as soon as
/// the script says so without wall-clock waiting.
#[derive(Debug, Clone, Default)]
pub struct ScriptedControl {
    /// Pending (round, signal) pairs in delivery order
    schedule: VecDeque<(usize, ControlSignal)>,

    /// Completed drain rounds
    round: usize,
}

impl ScriptedControl {
    /// Creates an empty script. With nothing scheduled the run never starts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script that starts the run immediately.
    pub fn autostart() -> Self {
        Self::new().at(0, ControlSignal::Start)
    }

    /// Schedules `signal` for drain round `round`.
    ///
    /// Signals scheduled for the same round are delivered in insertion order.
    pub fn at(mut self, round: usize, signal: ControlSignal) -> Self {
        let pos = self
            .schedule
            .iter()
            .position(|&(r, _)| r > round)
            .unwrap_or(self.schedule.len());
        self.schedule.insert(pos, (round, signal));
        self
    }

    /// Pauses before step `step` and resumes on the following round.
    ///
    /// Assumes the run was started at round 0 and has not been paused before.
    pub fn with_pause_at(self, step: usize) -> Self {
        self.at(step, ControlSignal::Pause)
            .at(step + 1, ControlSignal::Start)
    }

    /// Number of signals not yet delivered.
    pub fn remaining(&self) -> usize {
        self.schedule.len()
    }
}

#[async_trait]
impl ControlChannel for ScriptedControl {
    fn try_recv(&mut self) -> Option<ControlSignal> {
        match self.schedule.front() {
            Some(&(round, _)) if round <= self.round => {
                self.schedule.pop_front().map(|(_, signal)| signal)
            }
            _ => {
                self.round += 1;
                None
            }
        }
    }

    async fn recv(&mut self) -> Option<ControlSignal> {
        let (round, signal) = self.schedule.pop_front()?;
        self.round = self.round.max(round);
        Some(signal)
    }
}
