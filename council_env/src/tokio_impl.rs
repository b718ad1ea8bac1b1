//! Production implementations backed by Tokio.

use crate::control::ControlChannel;
use crate::error::EnvError;
use crate::types::ControlSignal;
use crate::context::{derive_run_seed, CouncilContext};
use async_trait::async_trait;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

/// Production context backed by Tokio.
///
/// Time always comes from the system clock. Randomness comes from the OS
/// unless the context was created with [`TokioContext::seeded`], in which case
/// runs are reproducible while still pacing in real time.
pub struct TokioContext {
    /// Start time for monotonic duration calculations
    start: Instant,

    /// Master seed, if any
    seed: Option<u64>,
}

impl TokioContext {
    /// Creates a new unseeded TokioContext.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            seed: None,
        }
    }

    /// Creates a TokioContext whose run RNGs derive from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Self {
            start: Instant::now(),
            seed: Some(seed),
        }
    }

    /// Creates an Arc-wrapped context for sharing across tasks.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl Default for TokioContext {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CouncilContext for TokioContext {
    fn now(&self) -> Duration {
        self.start.elapsed()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }

    fn session_rng(&self, run: u64) -> ChaCha8Rng {
        match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(derive_run_seed(seed, run)),
            None => ChaCha8Rng::from_entropy(),
        }
    }

    fn seed(&self) -> Option<u64> {
        self.seed
    }
}

/// Sending half handed to a UI; cheap to clone.
#[derive(Debug, Clone)]
pub struct ControlSender {
    tx: mpsc::UnboundedSender<ControlSignal>,
}

impl ControlSender {
    /// Queues a signal for the stepping loop. Never blocks.
    pub fn send(&self, signal: ControlSignal) -> Result<(), EnvError> {
        self.tx
            .send(signal)
            .map_err(|e| EnvError::closed(format!("dropped {} signal", e.0)))
    }
}

/// Channel-backed control source for interactive runs.
pub struct TokioControlChannel {
    rx: mpsc::UnboundedReceiver<ControlSignal>,
}

impl TokioControlChannel {
    /// Creates a connected sender / channel pair.
    pub fn pair() -> (ControlSender, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ControlSender { tx }, Self { rx })
    }
}

#[async_trait]
impl ControlChannel for TokioControlChannel {
    fn try_recv(&mut self) -> Option<ControlSignal> {
        self.rx.try_recv().ok()
    }

    async fn recv(&mut self) -> Option<ControlSignal> {
        self.rx.recv().await
    }
}
