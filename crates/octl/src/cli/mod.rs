//! Command-line definitions.

pub mod auth;
pub mod calendar;
pub mod mail;

use clap::{ArgAction, Parser, Subcommand};

use crate::output::Format;

const LONG_ABOUT: &str = "\
octl is a command-line client for Microsoft Outlook mail and calendar.

It talks to Microsoft Graph and authenticates with the device code flow,
so it works over SSH and on machines without a browser.

Getting started:
  1. Register an app in the Azure portal (App registrations) and enable
     public client flows
  2. Run 'octl auth login --client-id <your-client-id>'
  3. Run 'octl mail list' or 'octl calendar today'";

/// Outlook CLI - Access Microsoft Outlook from the terminal.
#[derive(Debug, Parser)]
#[command(name = "octl", version)]
#[command(about = "Outlook CLI - Access Microsoft Outlook from the terminal", long_about = LONG_ABOUT)]
pub struct Cli {
    /// Output as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Output as tab-separated plain text.
    #[arg(long, global = true)]
    pub plain: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Command to run.
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Output format chosen by `--json` / `--plain`.
    #[must_use]
    pub const fn format(&self) -> Format {
        Format::from_flags(self.json, self.plain)
    }
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in, sign out and show sign-in state.
    Auth(auth::AuthCommand),
    /// Read, search, send and organize mail.
    Mail(mail::MailCommand),
    /// View, create and respond to calendar events.
    #[command(alias = "cal")]
    Calendar(calendar::CalendarCommand),
}
