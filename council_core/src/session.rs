//! A single simulation session: state, history, controller and RNG as one unit.

use crate::classify::{classify, LiveStatus, Outcome};
use crate::controller::{RunController, RunState, TickOutcome};
use crate::error::Result;
use crate::history::OpinionHistory;
use crate::params::CouncilParams;
use crate::snapshot::SessionSnapshot;
use crate::update::{self, Feedback};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, trace};

/// Owns everything one run needs.
///
/// State vector, history buffer and run controller are only ever built or
/// rebuilt together. The RNG is injected so that seeded runs are reproducible.
#[derive(Debug, Clone)]
pub struct CouncilSession<R = ChaCha8Rng> {
    params: CouncilParams,
    opinions: Vec<f64>,
    history: OpinionHistory,
    controller: RunController,
    rng: R,
    last_feedback: Option<Feedback>,
}

impl CouncilSession<ChaCha8Rng> {
    /// Creates a reproducible session backed by a seeded ChaCha8 stream.
    pub fn from_seed(params: CouncilParams, seed: u64) -> Result<Self> {
        Self::new(params, ChaCha8Rng::seed_from_u64(seed))
    }

    /// Creates a session seeded from OS entropy.
    pub fn from_entropy(params: CouncilParams) -> Result<Self> {
        Self::new(params, ChaCha8Rng::from_entropy())
    }
}

impl<R: Rng> CouncilSession<R> {
    /// Validates `params` and builds a paused session.
    ///
    /// Nothing is allocated if validation fails.
    pub fn new(params: CouncilParams, mut rng: R) -> Result<Self> {
        params.validate()?;
        let opinions = initial_opinions(params.member_count, &mut rng);
        debug!(
            members = params.member_count,
            steps = params.step_count,
            conformity = params.conformity,
            noise = params.noise,
            "council session created"
        );

        Ok(Self {
            history: OpinionHistory::new(params.step_count, params.member_count),
            controller: RunController::new(),
            params,
            opinions,
            rng,
            last_feedback: None,
        })
    }

    /// Tears down and rebuilds the session with new parameters.
    ///
    /// The RNG stream continues. On validation failure the current session is
    /// left exactly as it was.
    pub fn reinitialize(&mut self, params: CouncilParams) -> Result<()> {
        params.validate()?;
        self.opinions = initial_opinions(params.member_count, &mut self.rng);
        self.history = OpinionHistory::new(params.step_count, params.member_count);
        self.controller = RunController::new();
        self.last_feedback = None;
        self.params = params;
        debug!(members = params.member_count, steps = params.step_count, "council session reinitialized");
        Ok(())
    }

    /// Starts a new run with the same parameters.
    pub fn restart(&mut self) -> Result<()> {
        self.reinitialize(self.params)
    }

    /// Start signal. Returns true if the controller changed state.
    pub fn start(&mut self) -> bool {
        self.controller.on_start()
    }

    /// Pause signal. Returns true if the controller changed state.
    pub fn pause(&mut self) -> bool {
        self.controller.on_pause()
    }

    /// Advances the run by at most one step.
    ///
    /// A step is atomic: compute the next vector, clamp it, record it. While
    /// paused nothing happens; once every row is written the session reports
    /// `Complete` until it is re-initialized.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        let step = self.history.len();
        let outcome = self.controller.gate(step, self.params.step_count);
        if outcome != TickOutcome::Continue {
            return Ok(outcome);
        }

        let feedback = update::step_in_place(
            &mut self.opinions,
            self.params.conformity,
            self.params.noise,
            &mut self.rng,
        );
        self.history.record(step, &self.opinions)?;
        self.last_feedback = Some(feedback);

        trace!(
            step,
            r = feedback.value(),
            mean = self.history.last_mean().unwrap_or_default(),
            "step recorded"
        );
        Ok(outcome)
    }

    /// Starts the run and ticks until it completes.
    pub fn run_to_completion(&mut self) -> Result<&OpinionHistory> {
        self.start();
        while self.tick()? != TickOutcome::Complete {}
        Ok(&self.history)
    }

    /// Index of the next unwritten row.
    pub fn current_step(&self) -> usize {
        self.history.len()
    }

    pub fn is_complete(&self) -> bool {
        self.history.is_full()
    }

    pub fn params(&self) -> &CouncilParams {
        &self.params
    }

    /// Current state vector.
    pub fn opinions(&self) -> &[f64] {
        &self.opinions
    }

    pub fn history(&self) -> &OpinionHistory {
        &self.history
    }

    pub fn run_state(&self) -> RunState {
        self.controller.state()
    }

    pub fn last_feedback(&self) -> Option<Feedback> {
        self.last_feedback
    }

    /// Live label for the latest recorded mean.
    pub fn live_status(&self) -> Option<LiveStatus> {
        self.history.last_mean().map(LiveStatus::from_mean)
    }

    /// Final classification, available once the run is complete.
    pub fn outcome(&self) -> Option<Outcome> {
        if self.is_complete() {
            classify(self.history.means())
        } else {
            None
        }
    }

    /// Copies out everything a presentation sink needs.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            step: self.current_step(),
            step_count: self.params.step_count,
            member_count: self.params.member_count,
            state: self.run_state(),
            rows: self.history.to_grid(),
            means: self.history.means().to_vec(),
            live_status: self.live_status(),
            last_feedback: self.last_feedback,
            outcome: self.outcome(),
        }
    }
}

/// Samples `n` independent opinions uniformly in [0, 1).
fn initial_opinions<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<f64> {
    (0..n).map(|_| rng.gen::<f64>()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CouncilError;
    use crate::update::mean;
    use approx::assert_relative_eq;

    fn params(members: usize, conformity: f64, noise: f64, steps: usize) -> CouncilParams {
        CouncilParams::new(members, conformity, noise, steps)
    }

    #[test]
    fn test_new_session_is_paused_and_empty() {
        let session = CouncilSession::from_seed(CouncilParams::default(), 42).unwrap();
        assert_eq!(session.run_state(), RunState::Paused);
        assert_eq!(session.current_step(), 0);
        assert_eq!(session.opinions().len(), 10);
        assert!(session.opinions().iter().all(|v| (0.0..1.0).contains(v)));
        assert!(session.outcome().is_none());
        assert!(session.live_status().is_none());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let err = CouncilSession::from_seed(params(0, 0.5, 0.1, 10), 1).unwrap_err();
        assert!(matches!(err, CouncilError::Configuration(_)));

        let err = CouncilSession::from_seed(params(5, f64::NAN, 0.1, 10), 1).unwrap_err();
        assert!(matches!(err, CouncilError::Configuration(_)));
    }

    #[test]
    fn test_unaddressable_history_is_an_error_not_a_panic() {
        let err = CouncilSession::from_seed(params(1 << 61, 0.5, 0.1, 2), 1).unwrap_err();
        assert!(matches!(err, CouncilError::Configuration(_)));

        let mut session = CouncilSession::from_seed(params(4, 0.5, 0.1, 6), 1).unwrap();
        assert!(session.reinitialize(params(1 << 61, 0.5, 0.1, 2)).is_err());
        assert_eq!(session.history().capacity(), 6);
    }

    #[test]
    fn test_paused_tick_halts_without_advancing() {
        let mut session = CouncilSession::from_seed(CouncilParams::default(), 42).unwrap();
        let before = session.opinions().to_vec();

        assert_eq!(session.tick().unwrap(), TickOutcome::Halt);
        assert_eq!(session.tick().unwrap(), TickOutcome::Halt);
        assert_eq!(session.current_step(), 0);
        assert_eq!(session.opinions(), &before[..]);
    }

    #[test]
    fn test_run_to_completion() {
        let mut session = CouncilSession::from_seed(params(8, 0.5, 0.1, 12), 7).unwrap();
        let history = session.run_to_completion().unwrap();
        assert!(history.is_full());
        assert_eq!(history.len(), 12);

        assert!(session.is_complete());
        assert!(session.outcome().is_some());
        assert_eq!(session.tick().unwrap(), TickOutcome::Complete);

        // Terminal regardless of state
        session.pause();
        assert_eq!(session.tick().unwrap(), TickOutcome::Complete);
    }

    #[test]
    fn test_history_invariants() {
        let mut session = CouncilSession::from_seed(params(6, 0.3, 0.4, 20), 99).unwrap();
        session.run_to_completion().unwrap();

        let history = session.history();
        for (t, row) in history.rows().enumerate() {
            assert!(row.iter().all(|v| (0.0..=1.0).contains(v)));
            assert_relative_eq!(history.mean_at(t).unwrap(), mean(row));
        }
    }

    #[test]
    fn test_same_seed_is_bit_identical() {
        let p = params(15, 0.6, 0.3, 25);
        let mut a = CouncilSession::from_seed(p, 1234).unwrap();
        let mut b = CouncilSession::from_seed(p, 1234).unwrap();
        a.run_to_completion().unwrap();
        b.run_to_completion().unwrap();

        assert_eq!(a.history(), b.history());
        assert_eq!(a.snapshot(), b.snapshot());
    }

    #[test]
    fn test_different_seeds_differ() {
        let p = params(15, 0.6, 0.3, 25);
        let mut a = CouncilSession::from_seed(p, 1).unwrap();
        let mut b = CouncilSession::from_seed(p, 2).unwrap();
        a.run_to_completion().unwrap();
        b.run_to_completion().unwrap();
        assert_ne!(a.history(), b.history());
    }

    #[test]
    fn test_pause_resume_is_continuation() {
        let p = params(10, 0.5, 0.2, 12);
        let mut uninterrupted = CouncilSession::from_seed(p, 77).unwrap();
        uninterrupted.run_to_completion().unwrap();

        let mut session = CouncilSession::from_seed(p, 77).unwrap();
        session.start();
        for _ in 0..5 {
            assert_eq!(session.tick().unwrap(), TickOutcome::Continue);
        }
        let row4 = session.history().row(4).unwrap().to_vec();

        session.pause();
        for _ in 0..3 {
            assert_eq!(session.tick().unwrap(), TickOutcome::Halt);
        }
        assert_eq!(session.current_step(), 5);
        assert_eq!(session.opinions(), &row4[..]);

        session.start();
        while session.tick().unwrap() != TickOutcome::Complete {}

        assert_eq!(session.history(), uninterrupted.history());
    }

    #[test]
    fn test_snap_scenario_end_to_end() {
        // members=10, alpha=1, noise=0, steps=5
        let mut session = CouncilSession::from_seed(params(10, 1.0, 0.0, 5), 2024).unwrap();
        let initial = session.opinions().to_vec();
        let snapped = Feedback::from_mean(mean(&initial)).target();

        session.run_to_completion().unwrap();
        let history = session.history();

        // Step 0 snaps everyone to 1 - R(initial mean); after that the snapped
        // mean reproduces the same verdict every step.
        for (t, row) in history.rows().enumerate() {
            assert!(row.iter().all(|&v| v == snapped), "row {t} not snapped");
            assert_eq!(history.mean_at(t).unwrap(), snapped);
        }
        let expected = if snapped == 1.0 {
            Outcome::ConsensusYes
        } else {
            Outcome::ConsensusNo
        };
        assert_eq!(session.outcome(), Some(expected));
    }

    #[test]
    fn test_reinitialize_rebuilds_everything() {
        let mut session = CouncilSession::from_seed(params(4, 0.5, 0.1, 6), 5).unwrap();
        session.start();
        session.tick().unwrap();
        session.tick().unwrap();

        session.reinitialize(params(7, 0.2, 0.0, 3)).unwrap();
        assert_eq!(session.run_state(), RunState::Paused);
        assert_eq!(session.current_step(), 0);
        assert_eq!(session.opinions().len(), 7);
        assert_eq!(session.history().capacity(), 3);
        assert_eq!(session.history().member_count(), 7);
        assert!(session.last_feedback().is_none());
    }

    #[test]
    fn test_failed_reinitialize_leaves_session_intact() {
        let p = params(4, 0.5, 0.1, 6);
        let mut session = CouncilSession::from_seed(p, 5).unwrap();
        session.start();
        session.tick().unwrap();
        let before = session.snapshot();

        assert!(session.reinitialize(params(4, 3.0, 0.1, 6)).is_err());
        assert_eq!(session.snapshot(), before);
        assert_eq!(session.params(), &p);
    }

    #[test]
    fn test_restart_after_completion() {
        let mut session = CouncilSession::from_seed(params(3, 0.5, 0.1, 2), 8).unwrap();
        session.run_to_completion().unwrap();
        assert!(session.is_complete());

        session.restart().unwrap();
        assert!(!session.is_complete());
        assert_eq!(session.tick().unwrap(), TickOutcome::Halt);
    }

    #[test]
    fn test_snapshot_contents() {
        let mut session = CouncilSession::from_seed(params(3, 0.5, 0.1, 4), 8).unwrap();
        session.start();
        session.tick().unwrap();
        session.tick().unwrap();

        let snap = session.snapshot();
        assert_eq!(snap.step, 2);
        assert_eq!(snap.rows.len(), 2);
        assert_eq!(snap.means.len(), 2);
        assert_eq!(snap.state, RunState::Running);
        assert!(snap.live_status.is_some());
        assert!(snap.last_feedback.is_some());
        assert!(snap.outcome.is_none());
        assert!(!snap.is_complete());
        assert_relative_eq!(snap.progress(), 0.5);

        let json = serde_json::to_string(&snap).unwrap();
        assert!(!json.contains("outcome"));
    }
}
