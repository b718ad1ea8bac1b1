//! Presentation sinks: consumers of session snapshots.

use council_core::SessionSnapshot;
use tracing::{debug, info};

/// Something that renders or records session snapshots.
///
/// The stepping loop calls `on_snapshot` after every recorded step,
/// `on_state_change` whenever a control signal starts, pauses or restarts the
/// run, and `on_complete` once when the run finishes. Sinks never touch the
/// session.
pub trait PresentationSink {
    /// A step was recorded.
    fn on_snapshot(&mut self, snapshot: &SessionSnapshot);

    /// The run state changed without a new step (`snapshot.state` is current).
    fn on_state_change(&mut self, _snapshot: &SessionSnapshot) {}

    /// The run completed; `snapshot.outcome` is set.
    fn on_complete(&mut self, snapshot: &SessionSnapshot) {
        self.on_snapshot(snapshot);
    }
}

impl<S: PresentationSink + ?Sized> PresentationSink for &mut S {
    fn on_snapshot(&mut self, snapshot: &SessionSnapshot) {
        (**self).on_snapshot(snapshot);
    }

    fn on_state_change(&mut self, snapshot: &SessionSnapshot) {
        (**self).on_state_change(snapshot);
    }

    fn on_complete(&mut self, snapshot: &SessionSnapshot) {
        (**self).on_complete(snapshot);
    }
}

impl<S: PresentationSink> PresentationSink for Option<S> {
    fn on_snapshot(&mut self, snapshot: &SessionSnapshot) {
        if let Some(sink) = self {
            sink.on_snapshot(snapshot);
        }
    }

    fn on_state_change(&mut self, snapshot: &SessionSnapshot) {
        if let Some(sink) = self {
            sink.on_state_change(snapshot);
        }
    }

    fn on_complete(&mut self, snapshot: &SessionSnapshot) {
        if let Some(sink) = self {
            sink.on_complete(snapshot);
        }
    }
}

impl<A: PresentationSink, B: PresentationSink> PresentationSink for (A, B) {
    fn on_snapshot(&mut self, snapshot: &SessionSnapshot) {
        self.0.on_snapshot(snapshot);
        self.1.on_snapshot(snapshot);
    }

    fn on_state_change(&mut self, snapshot: &SessionSnapshot) {
        self.0.on_state_change(snapshot);
        self.1.on_state_change(snapshot);
    }

    fn on_complete(&mut self, snapshot: &SessionSnapshot) {
        self.0.on_complete(snapshot);
        self.1.on_complete(snapshot);
    }
}

/// Logs the live status line and the final verdict through `tracing`.
#[derive(Debug, Default)]
pub struct LogSink {
    /// Log every step at INFO instead of DEBUG
    loud: bool,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Logs every step at INFO.
    pub fn loud() -> Self {
        Self { loud: true }
    }
}

impl PresentationSink for LogSink {
    fn on_snapshot(&mut self, snapshot: &SessionSnapshot) {
        let (Some(mean), Some(status)) = (snapshot.current_mean(), snapshot.live_status) else {
            return;
        };
        if self.loud {
            info!("step {:>3}/{} | mean={:.3} | {}", snapshot.step, snapshot.step_count, mean, status);
        } else {
            debug!("step {:>3}/{} | mean={:.3} | {}", snapshot.step, snapshot.step_count, mean, status);
        }
    }

    fn on_complete(&mut self, snapshot: &SessionSnapshot) {
        let mean = snapshot.current_mean().unwrap_or_default();
        match snapshot.outcome {
            Some(outcome) => info!("Final average opinion {:.2} | Outcome: {}", mean, outcome),
            None => info!("Final average opinion {:.2}", mean),
        }
    }
}

/// Keeps every snapshot it receives (tests, offline rendering).
#[derive(Debug, Default)]
pub struct RecordingSink {
    /// One per recorded step
    pub snapshots: Vec<SessionSnapshot>,
    /// One per start/pause/restart
    pub transitions: Vec<SessionSnapshot>,
    pub completed: Option<SessionSnapshot>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PresentationSink for RecordingSink {
    fn on_snapshot(&mut self, snapshot: &SessionSnapshot) {
        self.snapshots.push(snapshot.clone());
    }

    fn on_state_change(&mut self, snapshot: &SessionSnapshot) {
        self.transitions.push(snapshot.clone());
    }

    fn on_complete(&mut self, snapshot: &SessionSnapshot) {
        self.completed = Some(snapshot.clone());
    }
}
