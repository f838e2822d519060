//! Key echo entry point.
//!
//! # Usage
//!
//! ```bash
//! # Echo keys with the default 25 ms tick and 50 ms idle flush
//! keyecho
//!
//! # Slower escape resolution, debug logs to a file
//! keyecho --idle-ms 200 --log-level debug --log-file keyecho.log
//! ```

use std::{fs::File, path::PathBuf, sync::Mutex, time::Duration};

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use ttykey_core::SessionConfig;

/// Terminal key echo
#[derive(Parser, Debug)]
#[command(name = "keyecho")]
#[command(about = "Print the keys decoded from raw terminal input")]
#[command(version)]
struct Args {
    /// Tick interval in milliseconds
    #[arg(long, default_value = "25", value_parser = clap::value_parser!(u64).range(1..))]
    tick_ms: u64,

    /// Idle time in milliseconds after which pending input is flushed
    #[arg(long, default_value = "50")]
    idle_ms: u64,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,

    /// Write logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    // Output is in raw mode, so logs need their own sink when wanted
    let file_layer = match &args.log_file {
        Some(path) => {
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(File::create(path)?)))
        },
        None => None,
    };
    let stderr_layer = args.log_file.is_none().then(|| fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry().with(file_layer).with(stderr_layer).with(filter).init();

    let config = SessionConfig {
        tick_interval: Duration::from_millis(args.tick_ms),
        idle_threshold: Duration::from_millis(args.idle_ms),
    };

    let runtime = tokio::runtime::Builder::new_current_thread().enable_all().build()?;
    let result = runtime.block_on(ttykey_tui::run(config));

    // The stdin reader thread blocks until the next keypress; do not wait
    runtime.shutdown_background();

    result?;
    Ok(())
}
