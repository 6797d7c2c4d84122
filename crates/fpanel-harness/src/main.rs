#![forbid(unsafe_code)]

//! fpanel script replayer.
//!
//! # Running
//!
//! ```sh
//! cargo run -p fpanel-harness -- scenario.fps
//! echo "open n1 summary\nrender" | cargo run -p fpanel-harness
//! FPANEL_LOG=fpanel_runtime=debug cargo run -p fpanel-harness -- scenario.fps
//! ```

use std::io::{self, Read, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use fpanel_harness::{CONFIG_ENV, HarnessError, LOG_ENV, Session, load_coordinator};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

fn setup_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_target(true),
        )
        .init();
}

fn run() -> Result<(), HarnessError> {
    let config = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    let coordinator = load_coordinator(config.as_deref())?;

    let script = match std::env::args_os().nth(1) {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut session = Session::new(coordinator);
    session.run_script(&script, &mut out)?;
    out.flush()?;
    Ok(())
}

fn main() -> ExitCode {
    setup_tracing();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "harness run failed");
            eprintln!("fpanel-harness: {err}");
            ExitCode::FAILURE
        }
    }
}
