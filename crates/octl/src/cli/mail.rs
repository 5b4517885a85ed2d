//! `octl mail` commands.

use clap::{Parser, Subcommand};

/// Mail commands.
#[derive(Debug, Parser)]
pub struct MailCommand {
    /// Action to run.
    #[command(subcommand)]
    pub action: MailAction,
}

/// Available mail actions.
#[derive(Debug, Subcommand)]
pub enum MailAction {
    /// List messages, newest first.
    List {
        /// Number of messages to show.
        #[arg(short = 'n', long = "count", alias = "limit", default_value_t = 25, value_parser = clap::value_parser!(u32).range(1..=1000))]
        limit: u32,
        /// Only unread messages.
        #[arg(short, long)]
        unread: bool,
        /// Folder ID or well-known name (inbox, drafts, sentitems, ...).
        #[arg(short, long)]
        folder: Option<String>,
    },
    /// Show a message with its body.
    Read {
        /// Message ID.
        id: String,
        /// Convert an HTML body to Markdown instead of plain text.
        #[arg(long)]
        markdown: bool,
    },
    /// Search messages.
    Search {
        /// Search terms.
        query: String,
        /// Number of results to show.
        #[arg(short = 'n', long = "count", alias = "limit", default_value_t = 25, value_parser = clap::value_parser!(u32).range(1..=1000))]
        limit: u32,
    },
    /// List mail folders.
    Folders,
    /// Send a message.
    Send {
        /// Recipient addresses.
        #[arg(long, required = true, value_delimiter = ',')]
        to: Vec<String>,
        /// Carbon copy addresses.
        #[arg(long, value_delimiter = ',')]
        cc: Vec<String>,
        /// Blind carbon copy addresses.
        #[arg(long, value_delimiter = ',')]
        bcc: Vec<String>,
        /// Subject line.
        #[arg(short, long)]
        subject: String,
        /// Message body.
        #[arg(short, long)]
        body: String,
        /// Send the body as HTML.
        #[arg(long)]
        html: bool,
    },
    /// Save a draft.
    Draft {
        /// Recipient addresses.
        #[arg(long, value_delimiter = ',')]
        to: Vec<String>,
        /// Subject line.
        #[arg(short, long, default_value = "")]
        subject: String,
        /// Message body.
        #[arg(short, long, default_value = "")]
        body: String,
        /// Treat the body as HTML.
        #[arg(long)]
        html: bool,
    },
    /// Move a message to another folder.
    Move {
        /// Message ID.
        id: String,
        /// Destination folder ID or well-known name.
        folder: String,
    },
    /// Mark a message as read.
    MarkRead {
        /// Message ID.
        id: String,
        /// Mark as unread instead.
        #[arg(long)]
        unread: bool,
    },
    /// Delete a message.
    Delete {
        /// Message ID.
        id: String,
    },
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use crate::cli::{Cli, Commands};
    use clap::Parser;

    use super::*;

    fn mail(args: &[&str]) -> MailAction {
        let cli = Cli::try_parse_from(["octl", "mail"].iter().chain(args)).unwrap();
        match cli.command {
            Commands::Mail(cmd) => cmd.action,
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_list_defaults() {
        let MailAction::List {
            limit,
            unread,
            folder,
        } = mail(&["list"])
        else {
            panic!("expected list");
        };
        assert_eq!(limit, 25);
        assert!(!unread);
        assert!(folder.is_none());
    }

    #[test]
    fn test_count_flag_and_limit_alias() {
        for args in [
            ["list", "--count", "5"],
            ["list", "--limit", "5"],
            ["list", "-n", "5"],
        ] {
            let MailAction::List { limit, .. } = mail(&args) else {
                panic!("expected list");
            };
            assert_eq!(limit, 5);
        }
        let MailAction::Search { limit, .. } = mail(&["search", "report", "--count", "3"]) else {
            panic!("expected search");
        };
        assert_eq!(limit, 3);
    }

    #[test]
    fn test_count_out_of_range() {
        assert!(Cli::try_parse_from(["octl", "mail", "list", "--count", "0"]).is_err());
    }

    #[test]
    fn test_send_recipients_repeat_and_split() {
        let MailAction::Send { to, cc, html, .. } = mail(&[
            "send",
            "--to",
            "a@example.com,b@example.com",
            "--to",
            "c@example.com",
            "--cc",
            "d@example.com",
            "--subject",
            "Hi",
            "--body",
            "Hello",
        ]) else {
            panic!("expected send");
        };
        assert_eq!(to, ["a@example.com", "b@example.com", "c@example.com"]);
        assert_eq!(cc, ["d@example.com"]);
        assert!(!html);
    }

    #[test]
    fn test_send_requires_to() {
        let result = Cli::try_parse_from(["octl", "mail", "send", "-s", "Hi", "-b", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_mark_read_unread_flag() {
        let MailAction::MarkRead { id, unread } = mail(&["mark-read", "AAMk1", "--unread"]) else {
            panic!("expected mark-read");
        };
        assert_eq!(id, "AAMk1");
        assert!(unread);
    }
}
