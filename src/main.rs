//! # Gamepad Bridge
//!
//! Self-calibrating 3-axis joystick to gamepad report bridge.
//!
//! Reads raw potentiometer and button samples from a serial bench feed,
//! runs them through the joystick pipeline at 50 Hz and answers host polls
//! with the latest 4-byte report.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

use gamepad_bridge::acquisition::{run_acquisition, Joystick};
use gamepad_bridge::config::{Config, LoggingConfig};
use gamepad_bridge::input::feed::{feed_samples, open_feed_port};
use gamepad_bridge::input::{SampleFrame, WatchSampleSource};
use gamepad_bridge::report::slot::ReportSlot;
use gamepad_bridge::transport::HostLink;

/// File name prefix for rolling log files
const LOG_FILE_PREFIX: &str = "gamepad-bridge.log";

/// Main entry point for Gamepad Bridge
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration (path as first argument, defaults otherwise)
///    - Set up logging
///    - Open the bench feed and the host link
///
/// 2. **Main Loop**
///    - Bench feed task publishes raw frames as they arrive
///    - Host link task answers polls from the latest report
///    - Acquisition loop updates the report every poll interval
///
/// 3. **Shutdown**
///    - On Ctrl+C, when the bench feed ends or when the host closes the link
///
/// # Errors
///
/// Returns error if the configuration is invalid or a serial port cannot be
/// opened.
///
/// # Examples
///
/// ```bash
/// cargo run --release -- config/default.toml
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args().nth(1);
    let config = match &config_path {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let _log_guard = init_logging(&config.logging);

    info!("Gamepad Bridge v{} starting...", env!("CARGO_PKG_VERSION"));
    match &config_path {
        Some(path) => info!("Loaded configuration from {}", path),
        None => info!("No configuration file given, using defaults"),
    }

    // Raw samples
    let (frame_tx, frame_rx) = watch::channel(SampleFrame::default());
    let feed_port = open_feed_port(&config.input)?;
    let mut feed_task =
        tokio::spawn(async move { feed_samples(BufReader::new(feed_port), frame_tx).await });

    // Host link
    let slot = Arc::new(ReportSlot::new());
    let mut link = HostLink::open(&config.transport)?;
    info!("Answering host polls on {}", link.device_path());
    let link_slot = Arc::clone(&slot);
    let mut link_task = tokio::spawn(async move { link.serve(&link_slot).await });

    // Acquisition
    let mut joystick = Joystick::from_config(&config);
    let mut source = WatchSampleSource::new(frame_rx);
    let period = Duration::from_millis(config.acquisition.poll_interval_ms);

    info!("Press Ctrl+C to exit");

    tokio::select! {
        _ = run_acquisition(
            &mut joystick,
            &mut source,
            &slot,
            period,
            config.acquisition.log_interval_cycles,
        ) => {}

        result = &mut feed_task => {
            match result {
                Ok(Ok(frames)) => info!("Sample feed closed after {} frames, shutting down...", frames),
                Ok(Err(e)) => error!("Sample feed failed: {}", e),
                Err(e) => error!("Sample feed task aborted: {}", e),
            }
        }

        result = &mut link_task => {
            match result {
                Ok(Ok(frames)) => info!("Host link closed after {} reports, shutting down...", frames),
                Ok(Err(e)) => error!("Host link failed: {}", e),
                Err(e) => error!("Host link task aborted: {}", e),
            }
        }

        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
        }
    }

    feed_task.abort();
    link_task.abort();

    info!(
        "Final bounds h=[{}, {}] v=[{}, {}] r=[{}, {}]",
        joystick.horizontal().min(),
        joystick.horizontal().max(),
        joystick.vertical().min(),
        joystick.vertical().max(),
        joystick.rotation().min(),
        joystick.rotation().max()
    );

    Ok(())
}

/// Installs the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level. With a log
/// directory configured, output goes to a daily rolling file through a
/// non-blocking writer whose guard must be kept alive.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.level));

    match &config.directory {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, LOG_FILE_PREFIX);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(writer)
                .with_ansi(false)
                .init();
            Some(guard)
        }
        None => {
            tracing_subscriber::fmt().with_env_filter(filter).init();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gamepad_bridge::acquisition::POLL_INTERVAL_MS;

    #[test]
    fn test_default_poll_rate_is_50hz() {
        let config = Config::default();
        assert_eq!(config.acquisition.poll_interval_ms, POLL_INTERVAL_MS);
        assert_eq!(1000 / config.acquisition.poll_interval_ms, 50);
    }

    #[test]
    fn test_log_file_prefix() {
        assert!(LOG_FILE_PREFIX.starts_with(env!("CARGO_PKG_NAME")));
    }
}
