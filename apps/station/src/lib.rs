//! # KOT Station Library
//!
//! Core library for the ordering station. Sets up logging, loads the
//! configuration, wires the services and runs the console.
//!
//! ## Module Organization
//! ```text
//! kot_station_lib/
//! ├── lib.rs          ◄─── You are here (startup & run)
//! ├── console.rs      ◄─── Command parser and loop
//! ├── state/
//! │   ├── mod.rs      ◄─── State type exports
//! │   ├── station.rs  ◄─── Config + lifecycle wiring
//! │   └── notify.rs   ◄─── Notice queue for the console
//! ├── commands/
//! │   ├── mod.rs      ◄─── Command exports
//! │   ├── order.rs    ◄─── Menu and order commands
//! │   └── ticket.rs   ◄─── Preview / print / share commands
//! └── error.rs        ◄─── API error type for commands
//! ```

pub mod commands;
pub mod console;
pub mod error;
pub mod state;

use std::path::PathBuf;

use kot_service::KotConfig;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use console::Console;
use error::StationError;
use state::StationState;

/// Runs the station on stdin/stdout.
///
/// ## Startup Sequence
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │                       Station Startup                                   │
/// │                                                                         │
/// │  1. Initialize Logging ───────────────────────────────────────────────► │
/// │     • tracing-subscriber with env filter, written to stderr             │
/// │     • Default: info,kot=debug, can be overridden with RUST_LOG          │
/// │                                                                         │
/// │  2. Load Configuration ───────────────────────────────────────────────► │
/// │     • first argument or KOT_CONFIG: must load and validate              │
/// │     • otherwise the platform config dir, written with defaults on the   │
/// │       first run, falling back to defaults if it cannot be read          │
/// │     • KOT_* environment overrides, then validation                      │
/// │                                                                         │
/// │  3. Initialize State ─────────────────────────────────────────────────► │
/// │     • menu, aggregator, document pipeline, print/share services        │
/// │                                                                         │
/// │  4. Run Console ──────────────────────────────────────────────────────► │
/// │     • until `quit` or end of input                                      │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub async fn run() -> Result<(), StationError> {
    init_tracing();

    info!("Starting KOT station");

    let config = load_config(config_path())?;
    let state = StationState::from_config(config)?;

    let mut console = Console::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout());
    console.run(&state).await?;

    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=kot_service=trace` - Show trace for the service crate only
/// - Default: `info,kot=debug`
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,kot=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the station configuration.
///
/// An explicitly chosen file must load cleanly. Without one, the platform
/// config file is used: defaults are written there on the first run so they
/// can be edited, and a broken file falls back to defaults.
fn load_config(explicit: Option<PathBuf>) -> Result<KotConfig, StationError> {
    if explicit.is_some() {
        return Ok(KotConfig::load(explicit)?);
    }

    if let Some(path) = KotConfig::default_config_path().filter(|path| !path.exists()) {
        match KotConfig::default().save(Some(path.clone())) {
            Ok(()) => info!(?path, "Wrote default station config"),
            Err(e) => warn!(?path, error = %e, "Could not write default station config"),
        }
    }

    Ok(KotConfig::load_or_default(None))
}

/// Config file chosen on the command line or through `KOT_CONFIG`.
///
/// `None` falls back to the platform config directory.
fn config_path() -> Option<PathBuf> {
    std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("KOT_CONFIG").map(PathBuf::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_file(contents: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("kot-station-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("station.toml");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let path = scratch_file("[ticket]\norder_no_prefix = \"T\"\n");
        let config = load_config(Some(path.clone())).unwrap();
        assert_eq!(config.ticket.order_no_prefix, "T");
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_broken_explicit_config_is_an_error() {
        let path = scratch_file("[ticket\n");
        let result = load_config(Some(path.clone()));
        assert!(matches!(result, Err(StationError::Config(_))));
        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
