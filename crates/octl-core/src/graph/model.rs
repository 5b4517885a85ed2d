//! Microsoft Graph wire types (camelCase JSON).
//!
//! Only the fields octl reads or writes are modelled. Incoming types default
//! every field so a sparse `$select` response still deserializes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// `{"error": {...}}` body of a failed request.
#[derive(Debug, Deserialize)]
pub struct ErrorEnvelope {
    /// Error details.
    pub error: ErrorBody,
}

/// Graph error code and message.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ErrorBody {
    /// Machine-readable code, e.g. `ErrorItemNotFound`.
    pub code: String,
    /// Human-readable message.
    pub message: String,
}

/// A page of a collection response.
#[derive(Debug, Deserialize)]
pub struct Collection<T> {
    /// Items on this page.
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
    /// URL of the next page, if any.
    #[serde(rename = "@odata.nextLink", default)]
    pub next_link: Option<String>,
}

/// Name and SMTP address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailAddress {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// SMTP address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Message sender or recipient.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Recipient {
    /// Address of the recipient.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<EmailAddress>,
}

impl Recipient {
    /// Recipient with an address and no display name.
    #[must_use]
    pub fn address(address: &str) -> Self {
        Self {
            email_address: Some(EmailAddress {
                name: None,
                address: Some(address.to_string()),
            }),
        }
    }
}

/// Message or event body.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ItemBody {
    /// `text` or `html` (Graph accepts any case).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Body content.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Mail message as returned by `/me/messages`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphMessage {
    /// Message ID.
    pub id: Option<String>,
    /// Subject line.
    pub subject: Option<String>,
    /// Sender.
    pub from: Option<Recipient>,
    /// Primary recipients.
    pub to_recipients: Vec<Recipient>,
    /// Time the message arrived.
    pub received_date_time: Option<DateTime<Utc>>,
    /// Read flag.
    pub is_read: Option<bool>,
    /// Attachment flag.
    pub has_attachments: Option<bool>,
    /// First characters of the body.
    pub body_preview: Option<String>,
    /// Full body (only when selected).
    pub body: Option<ItemBody>,
}

/// Mail folder.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MailFolder {
    /// Folder ID.
    pub id: Option<String>,
    /// Display name.
    pub display_name: Option<String>,
    /// Number of items.
    pub total_item_count: Option<i32>,
    /// Number of unread items.
    pub unread_item_count: Option<i32>,
    /// Parent folder ID.
    pub parent_folder_id: Option<String>,
}

/// Outgoing message for `sendMail` and draft creation.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutgoingMessage {
    /// Subject line.
    pub subject: String,
    /// Body.
    pub body: ItemBody,
    /// Primary recipients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub to_recipients: Vec<Recipient>,
    /// Carbon copy recipients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub cc_recipients: Vec<Recipient>,
    /// Blind carbon copy recipients.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub bcc_recipients: Vec<Recipient>,
}

/// `POST /me/sendMail` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMailRequest {
    /// Message to send.
    pub message: OutgoingMessage,
    /// Keep a copy in Sent Items.
    pub save_to_sent_items: bool,
}

/// `POST /me/messages/{id}/move` body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest<'a> {
    /// Folder ID or well-known folder name.
    pub destination_id: &'a str,
}

/// `PATCH /me/messages/{id}` body for the read flag.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadFlagUpdate {
    /// New read state.
    pub is_read: bool,
}

/// Date, time, and the zone they are expressed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DateTimeTimeZone {
    /// Local date and time, e.g. `2024-01-15T10:00:00.0000000`.
    pub date_time: String,
    /// Windows or IANA zone name, e.g. `UTC`.
    pub time_zone: String,
}

/// Event location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Location {
    /// Display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
}

/// Attendee response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ResponseStatus {
    /// `none`, `organizer`, `accepted`, `declined`, `tentativelyAccepted`, ...
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
}

/// Event attendee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Attendee {
    /// Attendee address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_address: Option<EmailAddress>,
    /// `required`, `optional` or `resource`.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Attendee's response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ResponseStatus>,
}

/// Online meeting details.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OnlineMeetingInfo {
    /// Join link.
    pub join_url: Option<String>,
}

/// Calendar event as returned by `/me/events` and `calendarView`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphEvent {
    /// Event ID.
    pub id: Option<String>,
    /// Title.
    pub subject: Option<String>,
    /// Start time.
    pub start: Option<DateTimeTimeZone>,
    /// End time.
    pub end: Option<DateTimeTimeZone>,
    /// Location.
    pub location: Option<Location>,
    /// All-day flag.
    pub is_all_day: Option<bool>,
    /// Organizer.
    pub organizer: Option<Recipient>,
    /// Attendees.
    pub attendees: Vec<Attendee>,
    /// Body (only when selected).
    pub body: Option<ItemBody>,
    /// Outlook on the web link.
    pub web_link: Option<String>,
    /// The signed-in user's response.
    pub response_status: Option<ResponseStatus>,
    /// Online meeting flag.
    pub is_online_meeting: Option<bool>,
    /// Online meeting details.
    pub online_meeting: Option<OnlineMeetingInfo>,
    /// Legacy join URL, still filled for some meeting providers.
    pub online_meeting_url: Option<String>,
}

/// `POST /me/events` body.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    /// Title.
    pub subject: String,
    /// Start time.
    pub start: DateTimeTimeZone,
    /// End time.
    pub end: DateTimeTimeZone,
    /// Location.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Body.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<ItemBody>,
    /// All-day flag.
    pub is_all_day: bool,
    /// Attendees.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<Attendee>,
    /// Request a Teams meeting.
    pub is_online_meeting: bool,
}

/// Body for `accept`, `decline` and `tentativelyAccept`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponseRequest<'a> {
    /// Optional note to the organizer.
    #[serde(skip_serializing_if = "str::is_empty")]
    pub comment: &'a str,
    /// Notify the organizer.
    pub send_response: bool,
}
