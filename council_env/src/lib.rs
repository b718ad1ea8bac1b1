//! Paradoxical Council Environment Abstraction Layer
//!
//! This crate provides the "Sans-IO" seam between the council engine and the
//! world that drives it, so the same stepping loop runs in **Production**
//! (tokio) and **Simulation** (virtual clock) environments.
//!
//! # Core Concept
//!
//! Everything the loop needs from outside is intercepted:
//! - Time (`now()`, `sleep()`)
//! - Randomness (`session_rng()`)
//! - Control (`try_recv()`, `recv()`)
//!
//! Deriving all entropy from a single 64-bit seed makes any run reproducible
//! from its seed number.
//!
//! # Example
//!
//! ```ignore
//! use council_env::{ControlChannel, CouncilContext};
//!
//! async fn drive<Ctx: CouncilContext, Ctl: ControlChannel>(ctx: &Ctx, control: &mut Ctl) {
//!     while let Some(signal) = control.try_recv() {
//!         apply(signal);
//!     }
//!     ctx.sleep(Duration::from_millis(50)).await;
//! }
//! ```

mod context;
mod control;
mod error;
mod tokio_impl;
mod types;

pub use context::{derive_run_seed, CouncilContext};
pub use control::ControlChannel;
pub use error::EnvError;
pub use tokio_impl::{ControlSender, TokioContext, TokioControlChannel};
pub use types::{ControlSignal, SessionId};
