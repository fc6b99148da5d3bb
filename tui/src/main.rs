//! AgeTicker - how old are you, to the second?
//!
//! Prompts for a date and time of birth, then shows the elapsed time as big
//! block digits until ESC is pressed.
//!
//! # Usage
//!
//! ```bash
//! # Seconds precision, record in the XDG data directory
//! ageticker
//!
//! # Show milliseconds, repaint every 50ms
//! ageticker --millis --tick-ms 50
//!
//! # Keep the record somewhere else
//! ageticker --record ./lastdob.txt
//!
//! # Debug logging to a file (the screen belongs to the UI)
//! ageticker --log-level debug --log-file /tmp/ageticker.log
//! ```
//!
//! # Signals
//!
//! - `SIGTERM` / `SIGINT`: leave the display as if ESC was pressed

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use ageticker_tui::input::{InputCollector, InputError};
use ageticker_tui::surface::{install_panic_hook, CrosstermSurface};
use ageticker_tui::{version_banner, GlyphRenderer, GlyphTable, TickerLoop, VERSION};
use ticker_core::{
    default_config_path, load_config_from_path, BirthRecord, Clock, ConfigSource, FileStore,
    Precision, SystemClock, TickerConfig,
};

/// Snapshot width when the terminal size is unknown
const SNAPSHOT_FALLBACK_WIDTH: u16 = 80;

/// AgeTicker - live age in big block digits
#[derive(Parser, Debug)]
#[command(name = "ageticker")]
#[command(author, about, long_about = None, disable_version_flag = true)]
pub struct Args {
    /// Show milliseconds
    #[arg(long)]
    millis: bool,

    /// Path of the last-used birth record
    #[arg(long, value_name = "PATH")]
    record: Option<PathBuf>,

    /// Configuration file path
    #[arg(short = 'c', long, env = "AGETICKER_CONFIG", value_name = "FILE")]
    config: Option<PathBuf>,

    /// Milliseconds between repaints (clamped to 10..=1000)
    #[arg(long, value_name = "MS")]
    tick_ms: Option<u64>,

    /// Do not print the final snapshot after leaving the display
    #[arg(long)]
    no_snapshot: bool,

    /// Log level for --log-file (trace, debug, info, warn, error).
    /// Without a log file stderr shows errors only, or what RUST_LOG selects
    #[arg(short = 'l', long, env = "AGETICKER_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long, env = "AGETICKER_LOG_FILE", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print version and exit
    #[arg(short = 'V', long)]
    version: bool,
}

/// Initialize logging with the specified level
///
/// The terminal belongs to the UI, so full logs only go to a file. Without
/// one, stderr gets errors or whatever `RUST_LOG` asks for.
fn init_logging(level: &str, log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(path) => {
            let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                EnvFilter::new(format!(
                    "ageticker={level},ageticker_tui={level},ticker_core={level}"
                ))
            });
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {path:?}"))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(true)
                .with_line_number(true)
                .init();
        }
        None => {
            let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
            tracing_subscriber::fmt()
                .with_env_filter(stderr_filter(rust_log.as_deref()))
                .with_writer(io::stderr)
                .with_target(false)
                .init();
        }
    }

    Ok(())
}

/// `RUST_LOG` directives when set and valid, otherwise errors only
fn stderr_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|directives| !directives.trim().is_empty())
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new("error"))
}

/// Whether a session failure needs logging on top of `main`'s error return
///
/// Only the file sink; stderr already gets the returned error.
fn logs_session_failure(args: &Args) -> bool {
    args.log_file.is_some()
}

/// Layer CLI flags over file and environment configuration
fn resolve_config(args: &Args) -> Result<TickerConfig> {
    let path = args.config.clone().or_else(default_config_path);
    let mut config = load_config_from_path(path).context("Failed to load configuration")?;

    let mut from_cli = false;
    if args.millis {
        config.precision = Precision::Millis;
        from_cli = true;
    }
    if let Some(ref record) = args.record {
        config.record_path = record.clone();
        from_cli = true;
    }
    if let Some(ms) = args.tick_ms {
        config.tick_interval = Duration::from_millis(ms);
        from_cli = true;
    }
    if args.no_snapshot {
        config.snapshot_on_exit = false;
        from_cli = true;
    }
    if from_cli {
        config.set_source(ConfigSource::Cli);
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

/// SIGINT/SIGTERM set the shared exit flag
fn spawn_signal_listener(exit: Arc<AtomicBool>) {
    tokio::spawn(async move {
        let (mut sigterm, mut sigint) = match (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) {
            (Ok(term), Ok(int)) => (term, int),
            (Err(e), _) | (_, Err(e)) => {
                warn!(error = %e, "Failed to install signal handlers");
                return;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM, leaving display"),
            _ = sigint.recv() => info!("Received SIGINT, leaving display"),
        }
        exit.store(true, Ordering::Release);
    });
}

/// Print the final plain-text snapshot after the display is gone
fn print_snapshot<C: Clock>(ticker: &mut TickerLoop<C>, birth: &BirthRecord) -> io::Result<()> {
    let width = crossterm::terminal::size()
        .map(|(w, _)| w)
        .unwrap_or(SNAPSHOT_FALLBACK_WIDTH);
    let elapsed = ticker.sample(birth);

    let mut out = io::stdout().lock();
    writeln!(out, "{}", version_banner())?;
    writeln!(out)?;
    for line in ticker.renderer().snapshot(&elapsed, width) {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

/// Prompt, then tick until exit; the terminal is restored before returning
async fn run_session(config: &TickerConfig, exit: &AtomicBool) -> Result<()> {
    let mut surface = CrosstermSurface::new().context("Failed to initialize terminal")?;

    let store = FileStore::new(&config.record_path, config.precision);
    let collector = InputCollector::new(store, config.precision);
    let birth = match collector.collect(&mut surface, &SystemClock, exit).await {
        Ok(birth) => birth,
        Err(InputError::Cancelled) => {
            info!("Input cancelled");
            return Ok(());
        }
        Err(e) => return Err(e).context("Failed to read birth date"),
    };

    let renderer = GlyphRenderer::new(GlyphTable::standard(), config.precision);
    let mut ticker = TickerLoop::from_config(SystemClock, renderer, config);
    let result = ticker.run(&birth, &mut surface, exit).await;

    // Leave the alternate screen before printing anything
    drop(surface);

    if config.snapshot_on_exit {
        if let Err(e) = print_snapshot(&mut ticker, &birth) {
            warn!(error = %e, "Failed to print snapshot");
        }
    }

    let report = result.context("Terminal stopped responding")?;
    info!(
        exit = ?report.exit,
        ticks = report.ticks,
        frames = report.frames_presented,
        "Session finished"
    );
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("{}", version_banner());
        return Ok(());
    }

    init_logging(&args.log_level, args.log_file.as_deref())?;

    info!(version = VERSION, pid = std::process::id(), "AgeTicker starting");

    let config = resolve_config(&args)?;
    info!(
        precision = ?config.precision,
        tick_ms = config.tick_interval.as_millis() as u64,
        record = ?config.record_path,
        source = %config.source(),
        "Configuration resolved"
    );

    let exit = Arc::new(AtomicBool::new(false));
    spawn_signal_listener(Arc::clone(&exit));
    install_panic_hook();

    let result = run_session(&config, &exit).await;
    if let Err(ref e) = result {
        if logs_session_failure(&args) {
            error!(error = %format!("{e:#}"), "AgeTicker failed");
        }
    }
    result
}
