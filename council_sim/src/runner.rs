//! Session runner - drives a council session from control signals.

use crate::error::SimError;
use crate::sink::PresentationSink;

use council_core::{CouncilParams, CouncilSession, Outcome, TickOutcome};
use council_env::{ControlChannel, ControlSignal, CouncilContext, SessionId};
use rand::Rng;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Results from driving a session.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    /// Session that was driven
    pub session_id: SessionId,

    /// Master seed of the context, if seeded
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    /// Rows written when the runner stopped
    pub steps_recorded: usize,

    /// Total steps in the run
    pub step_count: usize,

    /// Whether the run reached its last step
    pub completed: bool,

    /// Number of Running -> Paused transitions
    pub pauses: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub final_mean: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub outcome: Option<Outcome>,

    /// Context time spent driving (virtual in simulation)
    pub elapsed: Duration,
}

/// Drives sessions: drains control signals, ticks, notifies sinks, paces.
///
/// The runner is the only writer of the session while it drives it. Pacing
/// goes through the context so a simulation context never really sleeps.
pub struct SessionRunner<Ctx> {
    /// Clock and entropy source
    context: Arc<Ctx>,

    /// Delay after each recorded step
    pacing: Duration,

    /// Identifier used in logs and reports
    session_id: SessionId,
}

impl<Ctx: CouncilContext> SessionRunner<Ctx> {
    /// Creates a new runner with no pacing.
    pub fn new(context: Arc<Ctx>) -> Self {
        let session_id = match context.seed() {
            Some(seed) => SessionId::from_seed(seed),
            None => SessionId::new(),
        };
        Self {
            context,
            pacing: Duration::ZERO,
            session_id,
        }
    }

    /// Sets the delay after each recorded step.
    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    pub fn session_id(&self) -> SessionId {
        self.session_id
    }

    pub fn context(&self) -> &Arc<Ctx> {
        &self.context
    }

    /// Builds a fresh session for run number `run` using the context's RNG.
    pub fn build_session(&self, params: CouncilParams, run: u64) -> Result<CouncilSession, SimError> {
        Ok(CouncilSession::new(params, self.context.session_rng(run))?)
    }

    /// Drives `session` until it completes, is shut down, or its control
    /// channel closes while paused.
    ///
    /// Pending signals are drained before every tick. While paused the runner
    /// waits on the channel instead of spinning; resuming continues at the
    /// next unwritten row.
    pub async fn drive<R, Ctl, S>(
        &self,
        session: &mut CouncilSession<R>,
        control: &mut Ctl,
        sink: &mut S,
    ) -> Result<RunReport, SimError>
    where
        R: Rng,
        Ctl: ControlChannel,
        S: PresentationSink,
    {
        let started = self.context.now();
        let mut pauses = 0;
        info!(
            "Session {} ready: {} members, {} steps (seed={:?})",
            self.session_id,
            session.params().member_count,
            session.params().step_count,
            self.context.seed()
        );

        let completed = 'drive: loop {
            while let Some(signal) = control.try_recv() {
                if !self.apply(session, signal, sink, &mut pauses) {
                    break 'drive false;
                }
            }

            match session.tick()? {
                TickOutcome::Continue => {
                    sink.on_snapshot(&session.snapshot());
                    if !self.pacing.is_zero() {
                        self.context.sleep(self.pacing).await;
                    }
                }
                TickOutcome::Halt => match control.recv().await {
                    Some(signal) => {
                        if !self.apply(session, signal, sink, &mut pauses) {
                            break 'drive false;
                        }
                    }
                    None => {
                        warn!(
                            "Control channel closed while paused at step {}",
                            session.current_step()
                        );
                        break 'drive false;
                    }
                },
                TickOutcome::Complete => {
                    sink.on_complete(&session.snapshot());
                    break 'drive true;
                }
            }
        };

        let report = RunReport {
            session_id: self.session_id,
            seed: self.context.seed(),
            steps_recorded: session.current_step(),
            step_count: session.params().step_count,
            completed,
            pauses,
            final_mean: session.history().last_mean(),
            outcome: session.outcome(),
            elapsed: self.context.now().saturating_sub(started),
        };
        info!(
            "Session {} stopped at step {}/{} (completed={})",
            report.session_id, report.steps_recorded, report.step_count, report.completed
        );
        Ok(report)
    }

    /// Drives `session` run after run.
    ///
    /// After a run completes the runner keeps listening: `Start` restarts the
    /// session with the same parameters (the RNG stream continues) and drives
    /// it again, `Pause` is ignored, and `Shutdown` or a closed channel ends
    /// the loop. Returns one report per run, in order.
    pub async fn serve<R, Ctl, S>(
        &self,
        session: &mut CouncilSession<R>,
        control: &mut Ctl,
        sink: &mut S,
    ) -> Result<Vec<RunReport>, SimError>
    where
        R: Rng,
        Ctl: ControlChannel,
        S: PresentationSink,
    {
        let mut reports = Vec::new();
        loop {
            let report = self.drive(session, control, sink).await?;
            let completed = report.completed;
            reports.push(report);
            if !completed {
                return Ok(reports);
            }

            info!("Press start to run the council again");
            loop {
                match control.recv().await {
                    Some(ControlSignal::Start) => break,
                    Some(ControlSignal::Pause) => {
                        debug!("Pause ignored: run {} already complete", reports.len())
                    }
                    Some(ControlSignal::Shutdown) | None => return Ok(reports),
                }
            }

            session.restart()?;
            session.start();
            info!("▶ Run {} started", reports.len() + 1);
            sink.on_state_change(&session.snapshot());
        }
    }

    /// Applies one signal, telling the sink about state changes. Returns false
    /// on shutdown.
    fn apply<R: Rng, S: PresentationSink>(
        &self,
        session: &mut CouncilSession<R>,
        signal: ControlSignal,
        sink: &mut S,
        pauses: &mut usize,
    ) -> bool {
        match signal {
            ControlSignal::Start => {
                if session.start() {
                    info!("▶ Running from step {}", session.current_step());
                    sink.on_state_change(&session.snapshot());
                }
            }
            ControlSignal::Pause => {
                if session.pause() {
                    *pauses += 1;
                    info!("⏸ Paused at step {}", session.current_step());
                    sink.on_state_change(&session.snapshot());
                }
            }
            ControlSignal::Shutdown => {
                debug!("Shutdown requested at step {}", session.current_step());
                return false;
            }
        }
        true
    }
}
