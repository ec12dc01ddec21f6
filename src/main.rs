use std::io;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use regime_allocator::config::Config;
use regime_allocator::engine::DecisionEngine;
use regime_allocator::replay::replay;
use regime_allocator::session::{load_snapshot_from_path, persist_snapshot_to_path};

const USAGE: &str = "usage: regime-allocator [--config <path>] [--session <path>] < ticks.csv";

#[derive(Debug, Default)]
struct CliArgs {
    config: Option<PathBuf>,
    session: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Option<CliArgs>> {
    let mut out = CliArgs::default();
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "-h" | "--help" => return Ok(None),
            "--config" => {
                let value = iter.next().context("--config requires a path")?;
                out.config = Some(PathBuf::from(value));
            }
            "--session" => {
                let value = iter.next().context("--session requires a path")?;
                out.session = Some(PathBuf::from(value));
            }
            other => bail!("unknown argument '{}'\n{}", other, USAGE),
        }
    }
    Ok(Some(out))
}

fn init_logging(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        config
            .logging
            .level
            .parse()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"))
    });
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_ansi(false);
    if config.logging.json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(args) = parse_args(&args)? else {
        println!("{}", USAGE);
        return Ok(());
    };

    let config = match &args.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    init_logging(&config);

    tracing::info!(
        assets = ?config.engine.assets,
        warmup_epochs = config.engine.warmup_epochs,
        "Starting regime-allocator"
    );

    let mut engine = DecisionEngine::new(config)?;
    if let Some(path) = &args.session {
        if let Some(snapshot) = load_snapshot_from_path(path)? {
            engine
                .restore(snapshot)
                .with_context(|| format!("failed to resume session from {}", path.display()))?;
        }
    }

    let stdin = io::stdin();
    let stdout = io::stdout();
    let written = replay(&mut engine, stdin.lock(), stdout.lock())?;

    if let Some(path) = &args.session {
        persist_snapshot_to_path(path, &engine.snapshot())?;
        tracing::info!(path = %path.display(), "Persisted engine session");
    }
    tracing::info!(decisions = written, "Replay complete");
    Ok(())
}
