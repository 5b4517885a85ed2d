//! `octl auth` commands.

use clap::{Parser, Subcommand};

/// Authentication commands.
#[derive(Debug, Parser)]
pub struct AuthCommand {
    /// Action to run.
    #[command(subcommand)]
    pub action: AuthAction,
}

/// Available auth actions.
#[derive(Debug, Subcommand)]
pub enum AuthAction {
    /// Sign in with the device code flow.
    Login {
        /// Azure app (client) ID; saved to the config file when given.
        #[arg(long)]
        client_id: Option<String>,
        /// Open the verification page in the default browser.
        #[arg(long)]
        open: bool,
    },
    /// Remove the stored credential and sign-in record.
    Logout,
    /// Show whether octl is configured and signed in.
    Status,
}
