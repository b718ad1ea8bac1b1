//! Core environment context trait for council runs.

use async_trait::async_trait;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

/// The interface between a stepping loop and the outside world.
///
/// The engine itself never waits or draws entropy on its own; whoever drives
/// it goes through a context so that the same loop runs against a real clock
/// or a virtual one.
///
/// # Implementations
///
/// - **Production**: `TokioContext` - wraps `tokio::time`, OS entropy
/// - **Simulation**: `SimContext` - virtual clock, seeded streams
#[async_trait]
pub trait CouncilContext: Send + Sync + 'static {
    /// Returns the monotonic time since context creation.
    ///
    /// In simulation, this is the virtual clock time.
    fn now(&self) -> Duration;

    /// Suspends the stepping loop for the given duration (animation pacing).
    ///
    /// In production: wraps `tokio::time::sleep`
    /// In simulation: advances the virtual clock
    async fn sleep(&self, duration: Duration);

    /// Returns the RNG for run number `run`.
    ///
    /// Seeded contexts derive a distinct, reproducible stream per run so that
    /// restarting does not replay the previous run. Unseeded contexts draw
    /// from OS entropy every time.
    fn session_rng(&self, run: u64) -> ChaCha8Rng;

    /// Returns the master seed, or `None` when the context is not seeded.
    fn seed(&self) -> Option<u64>;
}

/// Derives the seed for run number `run` from a master seed.
///
/// `master * golden_ratio + run * prime`, so neighbouring runs and
/// neighbouring master seeds land on unrelated streams.
pub fn derive_run_seed(master_seed: u64, run: u64) -> u64 {
    master_seed
        .wrapping_mul(0x9e3779b97f4a7c15)
        .wrapping_add(run.wrapping_mul(0x517cc1b727220a95))
}
