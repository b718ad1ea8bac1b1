//! Paradoxical Council - simulation engine
//!
//! A discrete-time opinion-dynamics model in which the system's verdict
//! inverts the majority: if the average member leans yes, the system answers
//! no, and every member adjusts toward that answer.
//!
//! The engine is synchronous and has no notion of wall-clock time:
//! 1. **Update Rule** (`update`): one step of the council map
//! 2. **History** (`history`): append-only, pre-sized opinion log
//! 3. **Run Controller** (`controller`): Paused / Running gate
//! 4. **Session** (`session`): owns all of the above plus the injected RNG
//!
//! Pacing, control signals and rendering belong to the caller.

pub mod classify;
pub mod controller;
pub mod error;
pub mod history;
pub mod params;
pub mod session;
pub mod snapshot;
pub mod update;

// Re-export key types for convenience
pub use classify::{classify, LiveStatus, Outcome, NO_THRESHOLD, YES_THRESHOLD};
pub use controller::{RunController, RunState, TickOutcome};
pub use error::{CouncilError, Result};
pub use history::OpinionHistory;
pub use params::CouncilParams;
pub use session::CouncilSession;
pub use snapshot::SessionSnapshot;
pub use update::{Feedback, StepOutput};
