//! stint CLI entry point.

mod args;
mod x11;

use std::io;

use anyhow::Context;
use clap::Parser;
use stint_core::{run_fixed, run_interactive, ExitStatus, Outcome};
use tracing::{debug, error};
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, Config, Mode};
use crate::x11::X11Session;

fn main() {
    // Logs go to stderr; stdout carries samples only.
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    ignore_sigpipe();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and are not failures.
            let _ = e.print();
            let status = if e.use_stderr() {
                ExitStatus::InvalidConfig
            } else {
                ExitStatus::Success
            };
            std::process::exit(status.code());
        }
    };

    let status = match cli.into_config() {
        Ok(config) => match run(&config) {
            Ok(outcome) => {
                debug!("Finished: {:?}", outcome);
                ExitStatus::from(outcome)
            }
            Err(e) => {
                error!("{:#}", e);
                ExitStatus::SetupFailed
            }
        },
        Err(e) => {
            error!("{}", e);
            ExitStatus::InvalidConfig
        }
    };

    std::process::exit(status.code());
}

/// Open the display and run the configured mode.
///
/// The session is dropped before this returns, so the cursor is freed and
/// the connection closed ahead of `process::exit`.
fn run(config: &Config) -> anyhow::Result<Outcome> {
    let mut session =
        X11Session::open(config.display.as_deref()).context("Failed to set up display")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    let outcome = match config.mode {
        Mode::Fixed(at) => run_fixed(&mut session, at, config.format, &mut out)
            .with_context(|| format!("Failed to sample {}", at))?,
        Mode::Interactive => run_interactive(&mut session, config.format, &mut out)?,
    };

    Ok(outcome)
}

/// Make writes to a closed pipe fail with `EPIPE` instead of killing us, so
/// the capture loop can release the grab and exit cleanly.
#[cfg(unix)]
fn ignore_sigpipe() {
    // SAFETY: setting SIGPIPE to SIG_IGN has no preconditions and runs before
    // any other thread exists.
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_IGN);
    }
}

#[cfg(not(unix))]
fn ignore_sigpipe() {}
