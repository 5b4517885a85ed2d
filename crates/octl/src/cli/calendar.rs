//! `octl calendar` commands.

use clap::{Parser, Subcommand};

/// Calendar commands.
#[derive(Debug, Parser)]
pub struct CalendarCommand {
    /// Action to run.
    #[command(subcommand)]
    pub action: CalendarAction,
}

/// Available calendar actions.
#[derive(Debug, Subcommand)]
pub enum CalendarAction {
    /// List upcoming events.
    List {
        /// Number of days to show, starting today.
        #[arg(short, long, default_value_t = 7, value_parser = clap::value_parser!(u32).range(1..=366))]
        days: u32,
    },
    /// Show today's events.
    Today,
    /// Show this week's events (Monday to Sunday).
    Week,
    /// Show event details.
    Show {
        /// Event ID.
        id: String,
    },
    /// Create an event.
    Create {
        /// Event title.
        #[arg(short, long)]
        subject: String,
        /// Start time (RFC 3339 or YYYY-MM-DDTHH:MM:SS UTC; YYYY-MM-DD with --all-day).
        #[arg(long)]
        start: String,
        /// End time; defaults to start plus --duration.
        #[arg(long)]
        end: Option<String>,
        /// Length when --end is not given, e.g. 30m, 1h, 2h30m.
        #[arg(long, default_value = "1h")]
        duration: String,
        /// Location.
        #[arg(short, long)]
        location: Option<String>,
        /// Description.
        #[arg(short, long)]
        body: Option<String>,
        /// Create an all-day event.
        #[arg(long)]
        all_day: bool,
        /// Attendee addresses.
        #[arg(short, long, value_delimiter = ',')]
        attendees: Vec<String>,
        /// Create a Teams meeting.
        #[arg(long)]
        online: bool,
    },
    /// Accept, decline or tentatively accept an invitation.
    Respond {
        /// Event ID.
        id: String,
        /// accept, decline or tentative.
        response: String,
        /// Note to the organizer.
        #[arg(short, long, default_value = "")]
        comment: String,
    },
    /// Delete an event.
    Delete {
        /// Event ID.
        id: String,
    },
}
