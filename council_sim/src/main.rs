//! Paradoxical Council CLI
//!
//! Run a council simulation headless (log output, optional JSON export) or,
//! with the `dashboard` feature, interactively in the terminal.

use clap::Parser;
use council_env::{CouncilContext, TokioContext};
use council_sim::scenarios::ScenarioId;
use council_sim::{
    LogSink, RunReport, ScriptedControl, SessionRunner, SimConfig, SimContext, SimError, SimExport,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Paradoxical Council simulation CLI
#[derive(Parser, Debug)]
#[command(name = "council-sim")]
#[command(about = "Simulate a council whose verdict inverts the majority", long_about = None)]
struct Args {
    /// Parameter preset (default, snap, stubborn, chaos, quiet)
    #[arg(short = 'P', long, conflicts_with = "config")]
    preset: Option<String>,

    /// TOML config file (params, delay_ms, seed)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of council members
    #[arg(short = 'n', long)]
    members: Option<usize>,

    /// Readiness to change opinion (alpha, 0..1)
    #[arg(short, long)]
    alpha: Option<f64>,

    /// Noise level (0..1)
    #[arg(long)]
    noise: Option<f64>,

    /// Simulation steps
    #[arg(short = 't', long)]
    steps: Option<usize>,

    /// Animation delay per step in milliseconds
    #[arg(short, long)]
    delay_ms: Option<u64>,

    /// Master seed for determinism (omit for a random run)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Use a virtual clock: no real sleeping between steps
    #[arg(long)]
    instant: bool,

    /// Pause before this step, then resume (headless pause/resume)
    #[arg(long, conflicts_with = "dashboard")]
    pause_at: Option<usize>,

    /// Export frames to a JSON file
    #[arg(long, conflicts_with = "dashboard")]
    export: Option<PathBuf>,

    /// JSON summary on stdout
    #[arg(long, conflicts_with = "dashboard")]
    json: bool,

    /// Log every step
    #[arg(short, long)]
    verbose: bool,

    /// List presets and exit
    #[arg(long)]
    list_presets: bool,

    /// Interactive terminal dashboard (requires the `dashboard` feature)
    #[arg(long)]
    dashboard: bool,
}

/// Preset (or config file) first, explicit flags on top.
fn build_config(args: &Args) -> Result<(SimConfig, String), SimError> {
    let (mut config, label) = match (&args.config, &args.preset) {
        (Some(path), _) => (SimConfig::load(path)?, "custom".to_string()),
        (None, Some(name)) => {
            let preset: ScenarioId = name.parse().map_err(|_| SimError::UnknownPreset(name.clone()))?;
            (SimConfig::with_params(preset.params()), preset.name().to_string())
        }
        (None, None) => (SimConfig::default(), ScenarioId::Default.name().to_string()),
    };

    if let Some(members) = args.members {
        config.params.member_count = members;
    }
    if let Some(alpha) = args.alpha {
        config.params.conformity = alpha;
    }
    if let Some(noise) = args.noise {
        config.params.noise = noise;
    }
    if let Some(steps) = args.steps {
        config.params.step_count = steps;
    }
    if let Some(delay_ms) = args.delay_ms {
        config.delay_ms = delay_ms;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    config.validate()?;
    if let Some(step) = args.pause_at {
        if step == 0 || step >= config.params.step_count {
            return Err(SimError::invalid(format!(
                "--pause-at must be in 1..{}, got {}",
                config.params.step_count, step
            )));
        }
    }
    Ok((config, label))
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_headless<Ctx: CouncilContext>(
    context: Arc<Ctx>,
    args: &Args,
    config: &SimConfig,
    label: &str,
) -> Result<RunReport, SimError> {
    let runner = SessionRunner::new(context).with_pacing(config.pacing());
    let mut session = runner.build_session(config.params, 0)?;

    let mut control = ScriptedControl::autostart();
    if let Some(step) = args.pause_at {
        control = control.with_pause_at(step);
    }

    let log = if args.verbose { LogSink::loud() } else { LogSink::new() };
    let export = args
        .export
        .as_ref()
        .map(|_| SimExport::new(label, config.seed, config.params));
    let mut sinks = (log, export);

    let report = runner.drive(&mut session, &mut control, &mut sinks).await?;

    if let (Some(export), Some(path)) = (&sinks.1, &args.export) {
        export.write_to_file(path)?;
        info!("Exported {} frames to {}", export.frames.len(), path.display());
    }

    if args.json {
        let summary = serde_json::json!({
            "preset": label,
            "params": config.params,
            "report": report,
            "means": session.history().means(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(report)
}

#[cfg(feature = "dashboard")]
async fn run_dashboard<Ctx: CouncilContext>(
    context: Arc<Ctx>,
    config: &SimConfig,
) -> Result<RunReport, SimError> {
    use council_env::TokioControlChannel;
    use council_sim::dashboard::{CouncilDashboard, DashboardSink};

    let runner = SessionRunner::new(context).with_pacing(config.pacing());
    let mut session = runner.build_session(config.params, 0)?;
    let initial = session.snapshot();

    let (control_tx, mut control) = TokioControlChannel::pair();
    let (snapshot_tx, snapshot_rx) = crossbeam::channel::unbounded();

    let driver = tokio::spawn(async move {
        let mut sink = DashboardSink::new(snapshot_tx);
        runner.serve(&mut session, &mut control, &mut sink).await
    });

    let mut dashboard = CouncilDashboard::new(snapshot_rx, control_tx).with_initial(initial);
    tokio::task::spawn_blocking(move || dashboard.run()).await??;

    let mut reports = driver.await??;
    info!("Dashboard closed after {} run(s)", reports.len());
    reports
        .pop()
        .ok_or_else(|| SimError::invalid("dashboard closed before any run"))
}

#[cfg(not(feature = "dashboard"))]
async fn run_dashboard<Ctx: CouncilContext>(
    _context: Arc<Ctx>,
    _config: &SimConfig,
) -> Result<RunReport, SimError> {
    Err(SimError::invalid("built without the `dashboard` feature"))
}

async fn run<Ctx: CouncilContext>(
    context: Arc<Ctx>,
    args: &Args,
    config: &SimConfig,
    label: &str,
) -> Result<RunReport, SimError> {
    if args.dashboard {
        run_dashboard(context, config).await
    } else {
        run_headless(context, args, config, label).await
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if args.list_presets {
        for preset in ScenarioId::all() {
            println!("{:<10} {}", preset.name(), preset.description());
        }
        return;
    }

    // The dashboard owns the terminal; logging would tear it.
    if !args.dashboard {
        init_tracing(args.verbose);
    }

    let (config, label) = match build_config(&args) {
        Ok(built) => built,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if !args.json {
        info!("Paradoxical Council v0.1.0");
        info!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
        info!(
            "preset={} members={} alpha={:.2} noise={:.2} steps={} delay={}ms",
            label,
            config.params.member_count,
            config.params.conformity,
            config.params.noise,
            config.params.step_count,
            config.delay_ms
        );
    }

    let result = match (args.instant, config.seed) {
        (true, seed) => {
            let seed = seed.unwrap_or_else(rand::random);
            run(SimContext::shared(seed), &args, &config, &label).await
        }
        (false, Some(seed)) => run(Arc::new(TokioContext::seeded(seed)), &args, &config, &label).await,
        (false, None) => run(TokioContext::shared(), &args, &config, &label).await,
    };

    match result {
        Ok(report) if report.completed => {
            if !args.json {
                info!("✅ Run complete ({} pauses)", report.pauses);
            }
        }
        Ok(report) => {
            info!(
                "Run stopped at step {}/{}. Adjust parameters and start again.",
                report.steps_recorded, report.step_count
            );
        }
        Err(e) => {
            error!("❌ {}", e);
            if args.dashboard {
                eprintln!("Error: {}", e);
            }
            std::process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headless_flags_conflict_with_dashboard() {
        let headless: [&[&str]; 3] = [&["--pause-at", "3"], &["--export", "out.json"], &["--json"]];
        for flag in headless {
            let mut argv = vec!["council-sim", "--dashboard"];
            argv.extend_from_slice(flag);
            assert!(Args::try_parse_from(argv).is_err(), "{flag:?} accepted with --dashboard");
        }
        assert!(Args::try_parse_from(["council-sim", "--json", "--pause-at", "3"]).is_ok());
    }

    #[test]
    fn test_flags_override_preset() {
        let args = Args::try_parse_from(["council-sim", "-P", "snap", "-n", "20"]).unwrap();
        let (config, label) = build_config(&args).unwrap();
        assert_eq!(label, "snap");
        assert_eq!(config.params.member_count, 20);
        assert_eq!(config.params.conformity, 1.0);
    }
}
