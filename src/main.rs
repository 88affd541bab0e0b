//! swipe-replay - play a recorded input script through the gesture classifier
//!
//! Prints one JSON line per recognized gesture on stdout.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use swipe_gesture::input::SwipeRecord;
use swipe_gesture::replay::{replay, Script};
use swipe_gesture::SwipeConfig;

#[derive(Parser, Debug)]
#[command(name = "swipe-replay")]
#[command(about = "Replay a TOML input script and print the recognized swipes", long_about = None)]
struct Args {
    /// Script of input steps
    script: PathBuf,

    /// Configuration file (defaults to ~/.config/swipe-gesture/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Enable verbose debug output
    #[arg(short, long)]
    debug: bool,

    /// Also write a daily-rotated log file into this directory
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Quiet by default, verbose with --debug
    let default_filter = if args.debug {
        "debug,swipe_gesture=debug"
    } else {
        "warn,swipe_gesture=info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let (file_layer, _guard) = match &args.log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating log directory {}", dir.display()))?;
            let file_appender = tracing_appender::rolling::daily(dir, "swipe-replay.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            (
                Some(fmt::layer().with_writer(non_blocking).with_ansi(false)),
                Some(guard),
            )
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    let config = match &args.config {
        Some(path) => SwipeConfig::load(path)?,
        None => SwipeConfig::load_default(),
    };
    let script = Script::load(&args.script)?;
    info!(steps = script.steps.len(), script = %args.script.display(), "Replaying input script");

    let swipes = replay(&script, config);

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for swipe in &swipes {
        let line = serde_json::to_string(&SwipeRecord::from(*swipe))?;
        writeln!(out, "{}", line)?;
    }

    info!("{} gesture(s) recognized", swipes.len());
    Ok(())
}
