//! `octl calendar` handlers.

use std::io::Write;

use anyhow::{Context as _, Result};
use chrono::Local;
use octl_core::calendar::{self, CreateEventOptions, Event, ListOptions, Response};
use octl_core::html::strip_html;
use octl_core::truncate;

use super::{Context, notice};
use crate::cli::calendar::CalendarAction;
use crate::output::{Content, Format, Formatter, Table};

const SUBJECT_WIDTH: usize = 40;
const LOCATION_WIDTH: usize = 25;

pub async fn run<W: Write>(
    ctx: &Context,
    action: CalendarAction,
    out: &mut Formatter<W>,
) -> Result<()> {
    let today = Local::now().date_naive();
    match action {
        CalendarAction::List { days } => {
            let window = calendar::days_window(today, days);
            let events = list(ctx, window.into()).await?;
            print_events(out, &events, "No events found")?;
        }
        CalendarAction::Today => {
            let events = list(ctx, calendar::today_window(today).into()).await?;
            print_events(out, &events, "No events today")?;
        }
        CalendarAction::Week => {
            let events = list(ctx, calendar::week_window(today).into()).await?;
            print_events(out, &events, "No events this week")?;
        }
        CalendarAction::Show { id } => {
            let client = ctx.graph().await?;
            let event = calendar::get_event(&client, &id)
                .await
                .context("failed to get event")?;
            write_event(out, &event)?;
        }
        CalendarAction::Create {
            subject,
            start,
            end,
            duration,
            location,
            body,
            all_day,
            attendees,
            online,
        } => {
            let (start, end) =
                calendar::resolve_event_times(&start, end.as_deref(), &duration, all_day)?;
            let opts = CreateEventOptions {
                subject,
                start,
                end,
                location,
                body,
                is_all_day: all_day,
                attendees,
                is_online: online,
            };
            let client = ctx.graph().await?;
            let event = calendar::create_event(&client, &opts)
                .await
                .context("failed to create event")?;
            write_created(out, &event)?;
        }
        CalendarAction::Respond {
            id,
            response,
            comment,
        } => {
            let response: Response = response.parse()?;
            let client = ctx.graph().await?;
            calendar::respond_to_event(&client, &id, response, &comment)
                .await
                .context("failed to respond to event")?;
            out.line(format!("Response sent: {response}"))?;
        }
        CalendarAction::Delete { id } => {
            let client = ctx.graph().await?;
            calendar::delete_event(&client, &id)
                .await
                .context("failed to delete event")?;
            out.line("Event deleted")?;
        }
    }
    Ok(())
}

async fn list(ctx: &Context, opts: ListOptions) -> Result<Vec<Event>> {
    let client = ctx.graph().await?;
    calendar::list_events(&client, &opts)
        .await
        .context("failed to list events")
}

fn event_table(events: &[Event]) -> Table {
    let mut table = Table::new(["DATE", "TIME", "SUBJECT", "LOCATION"]);
    for ev in events {
        table.push_row(vec![
            ev.format_date(),
            ev.format_time(),
            truncate(&ev.subject, SUBJECT_WIDTH),
            truncate(ev.display_location(), LOCATION_WIDTH),
        ]);
    }
    table
}

fn print_events<W: Write>(
    out: &mut Formatter<W>,
    events: &[Event],
    empty: &str,
) -> std::io::Result<()> {
    if out.format() == Format::Json {
        return out.print_value(&events);
    }
    if events.is_empty() {
        return notice(out, empty);
    }
    out.print(&Content::Table(&event_table(events)))
}

fn write_event<W: Write>(out: &mut Formatter<W>, ev: &Event) -> std::io::Result<()> {
    if out.format() == Format::Json {
        return out.print_value(ev);
    }

    out.line(format!("Subject:   {}", ev.subject))?;
    out.line(format!("Date:      {}", ev.format_date()))?;
    out.line(format!("Time:      {}", ev.format_time()))?;
    if let Some(location) = &ev.location {
        out.line(format!("Location:  {location}"))?;
    }
    if let Some(organizer) = &ev.organizer {
        out.line(format!("Organizer: {organizer}"))?;
    }
    if !ev.attendees.is_empty() {
        out.line(format!("Attendees: {}", ev.attendees.join(", ")))?;
    }
    if let Some(response) = &ev.response_status {
        out.line(format!("Response:  {response}"))?;
    }
    if ev.is_online {
        out.line("Type:      Online meeting")?;
        if let Some(url) = &ev.online_meeting_url {
            out.line(format!("Join URL:  {url}"))?;
        }
    }
    if let Some(link) = &ev.web_link {
        out.line(format!("Web Link:  {link}"))?;
    }

    if let Some(body) = &ev.body {
        let body = if ev.is_html() {
            strip_html(body)
        } else {
            body.clone()
        };
        if !body.is_empty() {
            out.line("")?;
            out.line("---")?;
            out.line(body)?;
        }
    }
    Ok(())
}

fn write_created<W: Write>(out: &mut Formatter<W>, ev: &Event) -> std::io::Result<()> {
    if out.format() == Format::Json {
        return out.print_value(ev);
    }
    out.line(format!("Event created: {}", ev.subject))?;
    out.line(format!("ID: {}", ev.id))?;
    out.line(format!("Time: {} {}", ev.format_date(), ev.format_time()))?;
    if let Some(link) = &ev.web_link {
        out.line(format!("Link: {link}"))?;
    }
    Ok(())
}
