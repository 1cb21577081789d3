//! segfeat CLI
//!
//! Prints the mean, maximum and minimum of every channel for each window of a
//! whitespace-separated sample file, with the window's majority label.

use anyhow::{Context, Result};
use clap::Parser;
use crossbeam_channel::RecvTimeoutError;
use segfeat::{
    config::Config,
    create_shared_stats,
    input::{InputSource, RowCollector},
    OutputFormat, Pipeline, PipelineOptions, VERSION,
};
use std::io::Write;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// How long the processing loop waits for a line before rechecking Ctrl+C.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Parser)]
#[command(name = "segfeat")]
#[command(version = VERSION)]
#[command(about = "Prints mean, max and min per window of a sample file", long_about = None)]
struct Cli {
    /// File to read from ("-" for stdin)
    #[arg(default_value = "-")]
    file: String,

    /// Number of samples to merge into one feature vector
    #[arg(short = 'n', long = "duration")]
    window_length: Option<usize>,

    /// Output format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Abort on the first malformed row instead of skipping it
    #[arg(long)]
    strict: bool,

    /// Write run statistics as JSON to this path
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Configuration file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Save the effective settings as the new configuration
    #[arg(long)]
    save_config: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(Config::config_path);
    let mut config = Config::load_from(&config_path)
        .with_context(|| format!("failed to load config from {}", config_path.display()))?;

    if let Some(window_length) = cli.window_length {
        config.window_length = window_length;
    }
    if let Some(format) = cli.format {
        config.format = format;
    }
    config.strict |= cli.strict;

    if cli.save_config {
        config
            .save_to(&config_path)
            .with_context(|| format!("failed to save config to {}", config_path.display()))?;
        tracing::info!(path = %config_path.display(), "saved configuration");
    }

    let source = InputSource::from_arg(&cli.file);
    let mut collector = RowCollector::from_source(&source)
        .with_context(|| format!("failed to open {source}"))?;

    let stats = create_shared_stats();
    let mut pipeline = Pipeline::new(
        PipelineOptions {
            window_length: config.window_length,
            format: config.format,
            strict: config.strict,
        },
        stats.clone(),
    );

    // Set up Ctrl+C handler
    let running = Arc::new(AtomicBool::new(true));
    ctrlc_handler(running.clone());

    collector.start()?;
    tracing::debug!(%source, "reading input");

    let receiver = collector.receiver().clone();
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let mut exhausted = false;

    while running.load(Ordering::SeqCst) {
        let line = match receiver.recv_timeout(POLL_INTERVAL) {
            Ok(line) => line.with_context(|| format!("failed to read {source}"))?,
            Err(RecvTimeoutError::Timeout) => continue,
            Err(RecvTimeoutError::Disconnected) => {
                exhausted = true;
                break;
            }
        };

        if let Some(output) = pipeline.process_line(&line)? {
            writeln!(out, "{output}").context("failed to write output")?;
        }
    }
    out.flush().context("failed to write output")?;

    collector.stop();
    if exhausted {
        collector.join();
    } else {
        tracing::info!("interrupted");
    }

    if let Some(engine) = pipeline.engine() {
        if engine.buffered_samples() > 0 {
            tracing::info!(
                samples = engine.buffered_samples(),
                "discarding incomplete final window"
            );
        }
    }

    if let Some(path) = &cli.stats {
        stats
            .save(path)
            .with_context(|| format!("failed to write stats to {}", path.display()))?;
    }

    if !exhausted || cli.verbose > 0 {
        eprintln!("{}", stats.summary());
    }

    Ok(())
}

/// Install the tracing subscriber; `RUST_LOG` takes precedence over `-v`.
fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Set up Ctrl+C handler.
fn ctrlc_handler(running: Arc<AtomicBool>) {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .expect("Error setting Ctrl+C handler");
}
