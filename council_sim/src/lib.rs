//! Paradoxical Council Simulation Harness
//!
//! This crate drives the council engine the way a front end would: control
//! signals come in, steps are taken one at a time, and snapshots go out to
//! presentation sinks. Everything that could make a run non-reproducible is
//! routed through a [`council_env::CouncilContext`]:
//! - **Time**: pacing sleeps advance a virtual clock in simulation
//! - **Randomness**: every run's RNG derives from a single 64-bit seed
//! - **Control**: start/pause come from a channel or a script
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      SessionRunner                       │
//! │                                                          │
//! │  ControlChannel ──► CouncilSession::tick() ──► Sink(s)   │
//! │   (start/pause)      (update + record)        (log/JSON/ │
//! │                            │                   TUI)      │
//! │                            ▼                             │
//! │                 CouncilContext::sleep(pacing)            │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use council_sim::{ScriptedControl, SessionRunner, SimContext, LogSink};
//!
//! let runner = SessionRunner::new(SimContext::shared(42));
//! let mut session = runner.build_session(CouncilParams::default(), 0)?;
//! let report = runner
//!     .drive(&mut session, &mut ScriptedControl::autostart(), &mut LogSink::new())
//!     .await?;
//! ```

mod config;
mod context;
mod control;
mod error;
mod exporter;
mod runner;
mod sink;
pub mod scenarios;

#[cfg(feature = "dashboard")]
pub mod dashboard;

pub use config::{SimConfig, DELAY_RANGE_MS, MEMBER_RANGE, STEP_RANGE};
pub use context::SimContext;
pub use control::ScriptedControl;
pub use error::SimError;
pub use exporter::{SimExport, SimFrame};
pub use runner::{RunReport, SessionRunner};
pub use sink::{LogSink, PresentationSink, RecordingSink};
