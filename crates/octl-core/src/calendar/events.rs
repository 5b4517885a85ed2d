//! Event requests.

use tracing::{debug, info};

use super::{CreateEventOptions, Event, ListOptions, Response, to_graph_date_time};
use crate::error::Result;
use crate::graph::GraphClient;
use crate::graph::model::{
    Attendee, Collection, DateTimeTimeZone, EmailAddress, EventResponseRequest, GraphEvent,
    ItemBody, Location, NewEvent,
};

/// Asks Graph to express event times in UTC.
const PREFER_UTC: (&str, &str) = ("Prefer", "outlook.timezone=\"UTC\"");

const LIST_SELECT: &str = "id,subject,start,end,location,isAllDay,organizer,attendees,webLink,\
                           responseStatus,isOnlineMeeting,onlineMeeting,onlineMeetingUrl";

/// Lists event occurrences (recurring events expanded) in a time window.
///
/// # Errors
///
/// Returns an error if the Graph request fails.
pub async fn list_events(client: &GraphClient, opts: &ListOptions) -> Result<Vec<Event>> {
    let top = if opts.top == 0 { 50 } else { opts.top };
    let url = client.url(&["me", "calendar", "calendarView"])?;
    let query = [
        ("startDateTime", opts.start.to_rfc3339()),
        ("endDateTime", opts.end.to_rfc3339()),
        ("$top", top.to_string()),
        ("$orderby", "start/dateTime".to_string()),
        ("$select", LIST_SELECT.to_string()),
    ];
    debug!(start = %opts.start, end = %opts.end, "listing events");

    let page: Collection<GraphEvent> = client.get_json(url, &query, &[PREFER_UTC]).await?;
    Ok(page.value.into_iter().map(Event::from).collect())
}

/// Fetches one event including its description.
///
/// # Errors
///
/// Returns an error if the event does not exist or the request fails.
pub async fn get_event(client: &GraphClient, id: &str) -> Result<Event> {
    let url = client.url(&["me", "events", id])?;
    let select = format!("{LIST_SELECT},body");
    let event: GraphEvent = client
        .get_json(url, &[("$select", select)], &[PREFER_UTC])
        .await?;
    Ok(event.into())
}

fn new_event(opts: &CreateEventOptions) -> NewEvent {
    let utc = |t| DateTimeTimeZone {
        date_time: to_graph_date_time(t),
        time_zone: "UTC".to_string(),
    };

    NewEvent {
        subject: opts.subject.clone(),
        start: utc(opts.start),
        end: utc(opts.end),
        location: opts
            .location
            .as_ref()
            .filter(|l| !l.is_empty())
            .map(|l| Location {
                display_name: Some(l.clone()),
            }),
        body: opts.body.as_ref().filter(|b| !b.is_empty()).map(|b| ItemBody {
            content_type: Some("text".to_string()),
            content: Some(b.clone()),
        }),
        is_all_day: opts.is_all_day,
        attendees: opts
            .attendees
            .iter()
            .map(|a| a.trim())
            .filter(|a| !a.is_empty())
            .map(|address| Attendee {
                email_address: Some(EmailAddress {
                    name: None,
                    address: Some(address.to_string()),
                }),
                kind: Some("required".to_string()),
                status: None,
            })
            .collect(),
        is_online_meeting: opts.is_online,
    }
}

/// Creates an event in the default calendar.
///
/// # Errors
///
/// Returns an error if the Graph request fails.
pub async fn create_event(client: &GraphClient, opts: &CreateEventOptions) -> Result<Event> {
    let url = client.url(&["me", "events"])?;
    let created: GraphEvent = client.post_json(url, &new_event(opts)).await?;
    info!(subject = %opts.subject, "event created");
    Ok(created.into())
}

/// Accepts, declines or tentatively accepts an invitation.
///
/// The organizer is notified; `comment` is included when non-empty.
///
/// # Errors
///
/// Returns an error if the Graph request fails.
pub async fn respond_to_event(
    client: &GraphClient,
    id: &str,
    response: Response,
    comment: &str,
) -> Result<()> {
    let url = client.url(&["me", "events", id, response.action()])?;
    let body = EventResponseRequest {
        comment,
        send_response: true,
    };
    client.post_empty(url, &body).await?;
    info!(%response, "event response sent");
    Ok(())
}

/// Deletes an event.
///
/// # Errors
///
/// Returns an error if the Graph request fails.
pub async fn delete_event(client: &GraphClient, id: &str) -> Result<()> {
    let url = client.url(&["me", "events", id])?;
    client.delete(url).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use wiremock::matchers::{body_json, body_partial_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GraphClient {
        GraphClient::new("tok")
            .unwrap()
            .with_base_url(&server.uri())
            .unwrap()
    }

    #[tokio::test]
    async fn test_list_events() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/calendar/calendarView"))
            .and(query_param("startDateTime", "2024-01-15T00:00:00+00:00"))
            .and(query_param("endDateTime", "2024-01-16T00:00:00+00:00"))
            .and(query_param("$top", "50"))
            .and(query_param("$orderby", "start/dateTime"))
            .and(header("prefer", "outlook.timezone=\"UTC\""))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "value": [{
                    "id": "e1",
                    "subject": "Standup",
                    "start": {"dateTime": "2024-01-15T09:00:00.0000000", "timeZone": "UTC"},
                    "end": {"dateTime": "2024-01-15T09:15:00.0000000", "timeZone": "UTC"},
                    "location": {"displayName": "Room 4"},
                    "isAllDay": false
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let opts = ListOptions::new(
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap(),
        );
        let events = list_events(&client(&server), &opts).await.unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].location.as_deref(), Some("Room 4"));
        assert_eq!(
            events[0].end,
            Some(Utc.with_ymd_and_hms(2024, 1, 15, 9, 15, 0).unwrap())
        );
    }

    #[tokio::test]
    async fn test_get_event_selects_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/me/events/e1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "e1",
                "body": {"contentType": "text", "content": "Bring slides"}
            })))
            .mount(&server)
            .await;

        let event = get_event(&client(&server), "e1").await.unwrap();
        assert_eq!(event.body.as_deref(), Some("Bring slides"));
    }

    #[tokio::test]
    async fn test_create_event() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/me/events"))
            .and(body_partial_json(serde_json::json!({
                "subject": "Sync",
                "start": {"dateTime": "2024-01-15T10:00:00", "timeZone": "UTC"},
                "end": {"dateTime": "2024-01-15T10:30:00", "timeZone": "UTC"},
                "isAllDay": false,
                "isOnlineMeeting": true,
                "attendees": [{
                    "emailAddress": {"address": "ada@example.com"},
                    "type": "required"
                }]
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "new-1",
                "subject": "Sync",
                "start": {"dateTime": "2024-01-15T10:00:00.0000000", "timeZone": "UTC"},
                "end": {"dateTime": "2024-01-15T10:30:00.0000000", "timeZone": "UTC"},
                "webLink": "https://outlook.office365.com/owa/?itemid=new-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let opts = CreateEventOptions {
            subject: "Sync".to_string(),
            start: Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap(),
            location: None,
            body: None,
            is_all_day: false,
            attendees: vec!["ada@example.com".to_string()],
            is_online: true,
        };
        let event = create_event(&client(&server), &opts).await.unwrap();
        assert_eq!(event.id, "new-1");
        assert!(event.web_link.is_some());
    }

    #[test]
    fn test_new_event_omits_empty_fields() {
        let opts = CreateEventOptions {
            subject: "Solo".to_string(),
            start: Utc.with_ymd_and_hms(2024, 1, 20, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 1, 21, 0, 0, 0).unwrap(),
            location: Some(String::new()),
            body: Some("Notes".to_string()),
            is_all_day: true,
            attendees: Vec::new(),
            is_online: false,
        };
        let json = serde_json::to_value(new_event(&opts)).unwrap();
        assert!(json.get("location").is_none());
        assert!(json.get("attendees").is_none());
        assert_eq!(json["body"]["content"], "Notes");
        assert_eq!(json["isAllDay"], true);
    }

    #[tokio::test]
    async fn test_respond_to_event() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/me/events/e1/tentativelyAccept"))
            .and(body_json(serde_json::json!({
                "comment": "might be late",
                "sendResponse": true
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        respond_to_event(&client(&server), "e1", Response::Tentative, "might be late")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_delete_event() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/me/events/e1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        delete_event(&client(&server), "e1").await.unwrap();
    }
}
