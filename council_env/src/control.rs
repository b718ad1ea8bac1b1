//! Start/pause control channel abstraction.

use async_trait::async_trait;
use crate::types::ControlSignal;

/// Source of edge-triggered control signals for a stepping loop.
///
/// # Implementations
///
/// - **Production**: `TokioControlChannel` - fed by a UI through a `ControlSender`
/// - **Simulation**: `ScriptedControl` - signals scheduled at fixed points
///
/// # Signal Flow
///
/// ```text
/// UI / script              Channel                 Stepping loop
///   |                         |                          |
///   |-- Start --------------->|                          |
///   |                         |<-- try_recv() per tick --|
///   |-- Pause --------------->|                          |
///   |                         |<-- recv() while paused --|
/// ```
#[async_trait]
pub trait ControlChannel: Send + 'static {
    /// Returns the next pending signal without waiting.
    ///
    /// The stepping loop drains this before every tick.
    fn try_recv(&mut self) -> Option<ControlSignal>;

    /// Waits for the next signal.
    ///
    /// # Returns
    /// * `Some(signal)` - A signal arrived
    /// * `None` - The channel was closed (no further signals will ever come)
    async fn recv(&mut self) -> Option<ControlSignal>;
}
