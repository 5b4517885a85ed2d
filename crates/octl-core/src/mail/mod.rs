//! Mail operations against `/me/messages` and `/me/mailFolders`.

mod folders;
mod messages;
mod send;

pub use folders::{get_folder, list_folders, move_message};
pub use messages::{get_message, list_messages, search_messages};
pub use send::{create_draft, delete_message, mark_as_read, send_message};

use std::borrow::Cow;

use chrono::{DateTime, Datelike, Local, Utc};
use serde::{Deserialize, Serialize};

use crate::graph::model::{GraphMessage, MailFolder, Recipient};
use crate::util::truncate;

/// Well-known folder names accepted wherever a folder ID is.
pub const WELL_KNOWN_FOLDERS: &[&str] = &[
    "inbox",
    "drafts",
    "sentitems",
    "deleteditems",
    "junkemail",
    "archive",
];

/// Returns true if `name` is a well-known folder name.
#[must_use]
pub fn is_well_known_folder(name: &str) -> bool {
    WELL_KNOWN_FOLDERS
        .iter()
        .any(|f| f.eq_ignore_ascii_case(name))
}

/// Path segment for a folder: well-known names are lowercased, IDs are kept.
#[must_use]
pub fn folder_segment(name: &str) -> Cow<'_, str> {
    if is_well_known_folder(name) {
        Cow::Owned(name.to_ascii_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

/// Message body format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyType {
    /// Plain text.
    #[default]
    Text,
    /// HTML.
    Html,
}

impl BodyType {
    /// Value for the Graph `contentType` field.
    #[must_use]
    pub const fn as_graph(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Html => "html",
        }
    }

    fn from_graph(content_type: &str) -> Self {
        if content_type.eq_ignore_ascii_case("html") {
            Self::Html
        } else {
            Self::Text
        }
    }
}

/// A mail message.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Message {
    /// Message ID.
    pub id: String,
    /// Subject line.
    pub subject: String,
    /// Sender, `Name <addr>` or a bare address.
    pub from: String,
    /// Primary recipient addresses.
    pub to: Vec<String>,
    /// Arrival time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub received_at: Option<DateTime<Utc>>,
    /// Read flag.
    pub is_read: bool,
    /// Attachment flag.
    pub has_attachments: bool,
    /// First characters of the body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_preview: Option<String>,
    /// Full body, only for single-message reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Format of `body`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_content_type: Option<BodyType>,
}

impl Message {
    /// Sender truncated to `max` characters.
    #[must_use]
    pub fn format_from(&self, max: usize) -> String {
        truncate(&self.from, max)
    }

    /// Subject truncated to `max` characters; `(no subject)` when empty.
    #[must_use]
    pub fn format_subject(&self, max: usize) -> String {
        if self.subject.is_empty() {
            return truncate("(no subject)", max);
        }
        truncate(&self.subject, max)
    }

    /// Compact arrival date relative to `now`, in local time.
    ///
    /// `HH:MM` for today, `Mon DD` earlier this year, `YYYY-MM-DD` otherwise.
    #[must_use]
    pub fn format_date(&self, now: DateTime<Local>) -> String {
        let Some(received) = self.received_at else {
            return String::new();
        };
        let received = received.with_timezone(&Local);
        if received.date_naive() == now.date_naive() {
            received.format("%H:%M").to_string()
        } else if received.year() == now.year() {
            received.format("%b %d").to_string()
        } else {
            received.format("%Y-%m-%d").to_string()
        }
    }

    /// True when the body is HTML.
    #[must_use]
    pub fn is_html(&self) -> bool {
        self.body_content_type == Some(BodyType::Html)
    }
}

impl From<GraphMessage> for Message {
    fn from(msg: GraphMessage) -> Self {
        let from = msg.from.as_ref().map(format_sender).unwrap_or_default();
        let to = msg
            .to_recipients
            .iter()
            .filter_map(|r| r.email_address.as_ref())
            .map(|a| a.address.clone().unwrap_or_default())
            .collect();
        let (body, body_content_type) = match msg.body {
            Some(b) => (
                b.content,
                b.content_type.as_deref().map(BodyType::from_graph),
            ),
            None => (None, None),
        };

        Self {
            id: msg.id.unwrap_or_default(),
            subject: msg.subject.unwrap_or_default(),
            from,
            to,
            received_at: msg.received_date_time,
            is_read: msg.is_read.unwrap_or(false),
            has_attachments: msg.has_attachments.unwrap_or(false),
            body_preview: msg.body_preview.filter(|p| !p.is_empty()),
            body,
            body_content_type,
        }
    }
}

/// `Name <addr>` when the name adds information, else the bare address.
fn format_sender(recipient: &Recipient) -> String {
    let Some(addr) = recipient.email_address.as_ref() else {
        return String::new();
    };
    let name = addr.name.as_deref().unwrap_or_default();
    let email = addr.address.as_deref().unwrap_or_default();
    if !name.is_empty() && name != email {
        format!("{name} <{email}>")
    } else {
        email.to_string()
    }
}

/// A mail folder.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Folder {
    /// Folder ID.
    pub id: String,
    /// Display name.
    pub display_name: String,
    /// Number of items.
    pub total_item_count: i32,
    /// Number of unread items.
    pub unread_item_count: i32,
    /// Parent folder ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_folder_id: Option<String>,
}

impl From<MailFolder> for Folder {
    fn from(f: MailFolder) -> Self {
        Self {
            id: f.id.unwrap_or_default(),
            display_name: f.display_name.unwrap_or_default(),
            total_item_count: f.total_item_count.unwrap_or(0),
            unread_item_count: f.unread_item_count.unwrap_or(0),
            parent_folder_id: f.parent_folder_id.filter(|p| !p.is_empty()),
        }
    }
}

/// Options for [`list_messages`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// Page size.
    pub top: u32,
    /// Number of messages to skip.
    pub skip: u32,
    /// `OData` filter expression.
    pub filter: Option<String>,
    /// `OData` sort expression.
    pub order_by: String,
    /// Only unread messages.
    pub unread_only: bool,
    /// Restrict to a folder (ID or well-known name).
    pub folder_id: Option<String>,
}

impl Default for ListOptions {
    fn default() -> Self {
        Self {
            top: 25,
            skip: 0,
            filter: None,
            order_by: "receivedDateTime desc".to_string(),
            unread_only: false,
            folder_id: None,
        }
    }
}

/// Options for [`send_message`] and [`create_draft`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendOptions {
    /// Primary recipients.
    pub to: Vec<String>,
    /// Carbon copy recipients.
    pub cc: Vec<String>,
    /// Blind carbon copy recipients.
    pub bcc: Vec<String>,
    /// Subject line.
    pub subject: String,
    /// Body content.
    pub body: String,
    /// Body format.
    pub body_type: BodyType,
    /// Keep a copy in Sent Items.
    pub save_to_sent: bool,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            to: Vec::new(),
            cc: Vec::new(),
            bcc: Vec::new(),
            subject: String::new(),
            body: String::new(),
            body_type: BodyType::Text,
            save_to_sent: true,
        }
    }
}

/// Fields requested for message listings.
pub(crate) const LIST_SELECT: &str =
    "id,subject,from,toRecipients,receivedDateTime,isRead,hasAttachments,bodyPreview";
