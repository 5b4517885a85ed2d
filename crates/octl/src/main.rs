//! `octl` - Outlook mail and calendar from the terminal.
//!
//! Talks to Microsoft Graph with a token obtained through the device code
//! flow and prints results as tables, JSON or tab-separated text.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use std::process::ExitCode;

use clap::Parser;
use octl::cli::Cli;
use octl::commands;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding a tracing filter, e.g. `octl_core=debug`.
const LOG_ENV: &str = "OCTL_LOG";

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "octl=debug,octl_core=debug,octl_oauth=debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match commands::run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
