//! # KOT Station Entry Point
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          KOT Station                                    │
//! │                                                                         │
//! │  main.rs ────► starts the runtime, reports fatal errors                 │
//! │  lib.rs ─────► logging, config, state, console loop                     │
//! │  commands/ ──► add_item, remove_item, preview_ticket, print_ticket      │
//! │  state/ ─────► StationState, ConsoleEmitter                             │
//! │                                                                         │
//! │  Files:                                                                 │
//! │  documents/  KOT_<orderNo>_<epochMillis>.<ext>   every preview/print    │
//! │  spool/      print jobs for the kitchen printer                         │
//! │  shared/     tickets handed on after printing                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    match kot_station_lib::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Station stopped: {}", e);
            eprintln!("kot-station: {}", e);
            ExitCode::FAILURE
        }
    }
}
