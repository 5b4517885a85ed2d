//! Calendar operations against `/me/calendar/calendarView` and `/me/events`.

mod datetime;
mod events;

pub use datetime::{
    days_window, parse_all_day, parse_date_time, parse_duration, parse_time_input,
    resolve_event_times, to_graph_date_time, today_window, week_window,
};
pub use events::{create_event, delete_event, get_event, list_events, respond_to_event};

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Local, Utc};
use serde::Serialize;

use crate::error::Error;
use crate::graph::model::{DateTimeTimeZone, GraphEvent};
use crate::mail::BodyType;

/// A calendar event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Event ID.
    pub id: String,
    /// Title.
    pub subject: String,
    /// Start time.
    pub start: Option<DateTime<Utc>>,
    /// End time.
    pub end: Option<DateTime<Utc>>,
    /// Location display name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// All-day flag.
    pub is_all_day: bool,
    /// Organizer address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer: Option<String>,
    /// Attendee addresses.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attendees: Vec<String>,
    /// Description, only for single-event reads.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<String>,
    /// Format of `body`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_content_type: Option<BodyType>,
    /// Outlook on the web link.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web_link: Option<String>,
    /// The signed-in user's response.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_status: Option<String>,
    /// Online meeting flag.
    pub is_online: bool,
    /// Join link for online meetings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub online_meeting_url: Option<String>,
}

impl Event {
    /// `All day`, or `HH:MM - HH:MM` in local time.
    #[must_use]
    pub fn format_time(&self) -> String {
        if self.is_all_day {
            return "All day".to_string();
        }
        let hm = |t: Option<DateTime<Utc>>| {
            t.map(|t| t.with_timezone(&Local).format("%H:%M").to_string())
                .unwrap_or_default()
        };
        format!("{} - {}", hm(self.start), hm(self.end))
    }

    /// Start date as `Mon Jan 02`.
    ///
    /// All-day events keep their calendar date; timed events show the local
    /// date.
    #[must_use]
    pub fn format_date(&self) -> String {
        let Some(start) = self.start else {
            return String::new();
        };
        if self.is_all_day {
            start.format("%a %b %d").to_string()
        } else {
            start.with_timezone(&Local).format("%a %b %d").to_string()
        }
    }

    /// End minus start, when both are known.
    #[must_use]
    pub fn duration(&self) -> Option<Duration> {
        Some(self.end? - self.start?)
    }

    /// Location for listings: the location, else `Online` for online events.
    #[must_use]
    pub fn display_location(&self) -> &str {
        match self.location.as_deref() {
            Some(loc) if !loc.is_empty() => loc,
            _ if self.is_online => "Online",
            _ => "",
        }
    }

    /// True when the body is HTML.
    #[must_use]
    pub fn is_html(&self) -> bool {
        self.body_content_type == Some(BodyType::Html)
    }
}

fn convert_time(t: Option<&DateTimeTimeZone>) -> Option<DateTime<Utc>> {
    t.and_then(|t| parse_date_time(&t.date_time, &t.time_zone))
}

fn non_empty(s: Option<String>) -> Option<String> {
    s.filter(|s| !s.is_empty())
}

impl From<GraphEvent> for Event {
    fn from(ev: GraphEvent) -> Self {
        let attendees = ev
            .attendees
            .iter()
            .filter_map(|a| a.email_address.as_ref())
            .map(|a| a.address.clone().unwrap_or_default())
            .collect();
        let organizer = ev
            .organizer
            .and_then(|o| o.email_address)
            .and_then(|a| a.address);
        let online_meeting_url = ev
            .online_meeting
            .and_then(|m| m.join_url)
            .filter(|u| !u.is_empty())
            .or(ev.online_meeting_url);
        let (body, body_content_type) = match ev.body {
            Some(b) => (
                b.content,
                b.content_type.map(|ct| {
                    if ct.eq_ignore_ascii_case("html") {
                        BodyType::Html
                    } else {
                        BodyType::Text
                    }
                }),
            ),
            None => (None, None),
        };

        Self {
            id: ev.id.unwrap_or_default(),
            subject: ev.subject.unwrap_or_default(),
            start: convert_time(ev.start.as_ref()),
            end: convert_time(ev.end.as_ref()),
            location: non_empty(ev.location.and_then(|l| l.display_name)),
            is_all_day: ev.is_all_day.unwrap_or(false),
            organizer: non_empty(organizer),
            attendees,
            body: non_empty(body),
            body_content_type,
            web_link: non_empty(ev.web_link),
            response_status: non_empty(ev.response_status.and_then(|r| r.response)),
            is_online: ev.is_online_meeting.unwrap_or(false),
            online_meeting_url: non_empty(online_meeting_url),
        }
    }
}

/// Time range for [`list_events`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListOptions {
    /// Window start (inclusive).
    pub start: DateTime<Utc>,
    /// Window end (exclusive).
    pub end: DateTime<Utc>,
    /// Maximum number of events.
    pub top: u32,
}

impl ListOptions {
    /// Window with the default page size of 50.
    #[must_use]
    pub const fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            start,
            end,
            top: 50,
        }
    }
}

impl From<(DateTime<Utc>, DateTime<Utc>)> for ListOptions {
    fn from((start, end): (DateTime<Utc>, DateTime<Utc>)) -> Self {
        Self::new(start, end)
    }
}

/// Input for [`create_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateEventOptions {
    /// Title.
    pub subject: String,
    /// Start time.
    pub start: DateTime<Utc>,
    /// End time.
    pub end: DateTime<Utc>,
    /// Location display name.
    pub location: Option<String>,
    /// Plain-text description.
    pub body: Option<String>,
    /// All-day flag.
    pub is_all_day: bool,
    /// Required attendee addresses.
    pub attendees: Vec<String>,
    /// Request an online meeting.
    pub is_online: bool,
}

/// Reply to a meeting invitation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Response {
    /// Accept.
    Accept,
    /// Decline.
    Decline,
    /// Tentatively accept.
    Tentative,
}

impl Response {
    /// Graph action path segment.
    #[must_use]
    pub const fn action(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Decline => "decline",
            Self::Tentative => "tentativelyAccept",
        }
    }

    /// Command-line name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Accept => "accept",
            Self::Decline => "decline",
            Self::Tentative => "tentative",
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Response {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "accept" => Ok(Self::Accept),
            "decline" => Ok(Self::Decline),
            "tentative" => Ok(Self::Tentative),
            _ => Err(Error::InvalidInput(format!(
                "invalid response: {s} (use accept, decline, or tentative)"
            ))),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::graph::model::{
        Attendee, EmailAddress, ItemBody, Location, OnlineMeetingInfo, Recipient, ResponseStatus,
    };
    use chrono::TimeZone;

    fn graph_event() -> GraphEvent {
        GraphEvent {
            id: Some("e1".to_string()),
            subject: Some("Standup".to_string()),
            start: Some(DateTimeTimeZone {
                date_time: "2024-01-15T09:00:00.0000000".to_string(),
                time_zone: "UTC".to_string(),
            }),
            end: Some(DateTimeTimeZone {
                date_time: "2024-01-15T09:15:00.0000000".to_string(),
                time_zone: "UTC".to_string(),
            }),
            location: Some(Location {
                display_name: Some(String::new()),
            }),
            organizer: Some(Recipient::address("boss@example.com")),
            attendees: vec![Attendee {
                email_address: Some(EmailAddress {
                    name: Some("Ada".to_string()),
                    address: Some("ada@example.com".to_string()),
                }),
                kind: Some("required".to_string()),
                status: None,
            }],
            body: Some(ItemBody {
                content_type: Some("html".to_string()),
                content: Some("<p>Agenda</p>".to_string()),
            }),
            response_status: Some(ResponseStatus {
                response: Some("accepted".to_string()),
            }),
            is_online_meeting: Some(true),
            online_meeting: Some(OnlineMeetingInfo {
                join_url: Some("https://teams.example/join".to_string()),
            }),
            ..GraphEvent::default()
        }
    }

    #[test]
    fn test_from_graph_event() {
        let ev = Event::from(graph_event());
        assert_eq!(ev.id, "e1");
        assert_eq!(ev.start, Some(Utc.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap()));
        assert_eq!(ev.duration(), Some(Duration::minutes(15)));
        assert_eq!(ev.location, None);
        assert_eq!(ev.display_location(), "Online");
        assert_eq!(ev.organizer.as_deref(), Some("boss@example.com"));
        assert_eq!(ev.attendees, vec!["ada@example.com"]);
        assert!(ev.is_html());
        assert_eq!(ev.response_status.as_deref(), Some("accepted"));
        assert_eq!(
            ev.online_meeting_url.as_deref(),
            Some("https://teams.example/join")
        );
    }

    #[test]
    fn test_legacy_online_meeting_url() {
        let ev = Event::from(GraphEvent {
            online_meeting_url: Some("https://legacy.example".to_string()),
            ..GraphEvent::default()
        });
        assert_eq!(ev.online_meeting_url.as_deref(), Some("https://legacy.example"));
    }

    #[test]
    fn test_format_time_and_date() {
        let start = Local.with_ymd_and_hms(2024, 1, 2, 9, 30, 0).unwrap();
        let ev = Event {
            start: Some(start.with_timezone(&Utc)),
            end: Some((start + Duration::hours(1)).with_timezone(&Utc)),
            ..Event::default()
        };
        assert_eq!(ev.format_time(), "09:30 - 10:30");
        assert_eq!(ev.format_date(), "Tue Jan 02");

        let all_day = Event {
            start: Some(Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap()),
            is_all_day: true,
            ..Event::default()
        };
        assert_eq!(all_day.format_time(), "All day");
        assert_eq!(all_day.format_date(), "Sat Jan 20");
    }

    #[test]
    fn test_display_location() {
        let ev = Event {
            location: Some("Room 1".to_string()),
            is_online: true,
            ..Event::default()
        };
        assert_eq!(ev.display_location(), "Room 1");
        assert_eq!(Event::default().display_location(), "");
    }

    #[test]
    fn test_response_parse() {
        assert_eq!("accept".parse::<Response>().unwrap(), Response::Accept);
        assert_eq!("DECLINE".parse::<Response>().unwrap(), Response::Decline);
        assert_eq!("Tentative".parse::<Response>().unwrap(), Response::Tentative);
        assert_eq!(Response::Tentative.action(), "tentativelyAccept");
        assert_eq!(Response::Accept.to_string(), "accept");

        let err = "maybe".parse::<Response>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid response: maybe (use accept, decline, or tentative)"
        );
    }

    #[test]
    fn test_event_json_shape() {
        let json = serde_json::to_value(Event::from(graph_event())).unwrap();
        assert_eq!(json["subject"], "Standup");
        assert_eq!(json["is_online"], true);
        assert_eq!(json["body_content_type"], "html");
        assert!(json.get("location").is_none());
        assert!(json.get("web_link").is_none());
    }
}
