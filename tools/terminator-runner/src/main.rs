//! Headless driver: runs the chase environment under a scripted policy and
//! optionally dumps the step history.

mod policy;

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;

use terminator_core::config::{
    load_environment, load_plane, load_target, EnvironmentConfig, PlaneConfig, TargetConfig,
};
use terminator_core::error::ConfigError;
use terminator_env::{Env, EnvError};

use crate::policy::PolicyKind;

#[derive(Parser)]
#[command(name = "terminator-runner", about = "Run Target Terminator episodes headlessly")]
struct Cli {
    /// Plane config (JSON). Built-in defaults when omitted.
    #[arg(long)]
    plane: Option<PathBuf>,

    /// Target config (JSON).
    #[arg(long)]
    target: Option<PathBuf>,

    /// Environment config (JSON).
    #[arg(long)]
    env: Option<PathBuf>,

    /// Total steps across all episodes.
    #[arg(long, default_value_t = 10_000)]
    steps: u64,

    /// Spawn seed. Random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// Policy driving the airplane.
    #[arg(long, value_enum, default_value_t = PolicyKind::Chase)]
    policy: PolicyKind,

    /// Directory for the observation history dump.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "run failed");
            ExitCode::FAILURE
        }
    }
}

#[derive(Debug, Default)]
struct RunStats {
    episodes: u32,
    terminated: u32,
    truncated: u32,
    total_reward: f64,
}

fn run(cli: &Cli) -> Result<(), EnvError> {
    let plane = load_or_default(cli.plane.as_deref(), load_plane, PlaneConfig::default)?;
    let target = load_or_default(cli.target.as_deref(), load_target, TargetConfig::default)?;
    let env_config =
        load_or_default(cli.env.as_deref(), load_environment, EnvironmentConfig::default)?;

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = Arc::clone(&stop);
        if let Err(e) = ctrlc::set_handler(move || stop.store(true, Ordering::SeqCst)) {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
        }
    }

    let mut env = Env::new(plane, target, env_config, cli.seed)?;
    let mut policy = policy::resolve(cli.policy, cli.seed.unwrap_or_default());
    tracing::info!(policy = policy.name(), steps = cli.steps, "run started");

    let mut stats = RunStats {
        episodes: 1,
        ..Default::default()
    };
    for _ in 0..cli.steps {
        if stop.load(Ordering::SeqCst) {
            tracing::info!("interrupted, shutting down");
            break;
        }

        let action = policy.act(&env);
        let result = env.step(action)?;
        stats.total_reward += result.reward;

        if result.is_done() {
            if result.terminated {
                stats.terminated += 1;
            }
            if result.truncated {
                stats.truncated += 1;
            }
            env.reset(None)?;
            stats.episodes += 1;
        }
    }

    tracing::info!(
        episodes = stats.episodes,
        targets_destroyed = stats.terminated,
        crashes = stats.truncated,
        total_reward = stats.total_reward,
        "run finished"
    );

    if let Some(path) = env.close(cli.output.as_deref())? {
        tracing::info!(path = %path.display(), "history saved");
    }
    Ok(())
}

fn load_or_default<T>(
    path: Option<&Path>,
    load: fn(&Path) -> Result<T, ConfigError>,
    default: fn() -> T,
) -> Result<T, ConfigError> {
    match path {
        Some(path) => load(path),
        None => Ok(default()),
    }
}
