//! `octl mail` handlers.

use std::io::Write;

use anyhow::{Context as _, Result};
use chrono::{DateTime, Local};
use octl_core::html::strip_html;
use octl_core::mail::{self, BodyType, Folder, ListOptions, Message, SendOptions};

use super::{Context, notice, short_id};
use crate::cli::mail::MailAction;
use crate::output::{Content, Format, Formatter, Table};

const FROM_WIDTH: usize = 30;
const SUBJECT_WIDTH: usize = 50;

pub async fn run<W: Write>(
    ctx: &Context,
    action: MailAction,
    out: &mut Formatter<W>,
) -> Result<()> {
    match action {
        MailAction::List {
            limit,
            unread,
            folder,
        } => {
            let opts = ListOptions {
                top: limit,
                unread_only: unread,
                folder_id: folder.filter(|f| !f.is_empty()),
                ..ListOptions::default()
            };
            let client = ctx.graph().await?;
            let messages = mail::list_messages(&client, &opts)
                .await
                .context("failed to list messages")?;
            print_messages(out, &messages, true, Local::now())?;
        }
        MailAction::Read { id, markdown } => {
            let client = ctx.graph().await?;
            let message = mail::get_message(&client, &id)
                .await
                .context("failed to get message")?;
            write_message(out, &message, markdown)?;
        }
        MailAction::Search { query, limit } => {
            let client = ctx.graph().await?;
            let messages = mail::search_messages(&client, &query, limit)
                .await
                .context("failed to search messages")?;
            print_messages(out, &messages, false, Local::now())?;
        }
        MailAction::Folders => {
            let client = ctx.graph().await?;
            let folders = mail::list_folders(&client)
                .await
                .context("failed to list folders")?;
            if out.format() == Format::Json {
                out.print_value(&folders)?;
            } else {
                out.print(&Content::Table(&folder_table(&folders)))?;
            }
        }
        MailAction::Send {
            to,
            cc,
            bcc,
            subject,
            body,
            html,
        } => {
            let opts = SendOptions {
                to,
                cc,
                bcc,
                subject,
                body,
                body_type: body_type(html),
                ..SendOptions::default()
            };
            let client = ctx.graph().await?;
            mail::send_message(&client, &opts)
                .await
                .context("failed to send message")?;
            out.line("Message sent successfully")?;
        }
        MailAction::Draft {
            to,
            subject,
            body,
            html,
        } => {
            let opts = SendOptions {
                to,
                subject,
                body,
                body_type: body_type(html),
                ..SendOptions::default()
            };
            let client = ctx.graph().await?;
            let draft = mail::create_draft(&client, &opts)
                .await
                .context("failed to create draft")?;
            if out.format() == Format::Json {
                out.print_value(&draft)?;
            } else {
                out.line(format!("Draft created: {}", draft.id))?;
            }
        }
        MailAction::Move { id, folder } => {
            let client = ctx.graph().await?;
            let moved = mail::move_message(&client, &id, &folder)
                .await
                .context("failed to move message")?;
            if out.format() == Format::Json {
                out.print_value(&moved)?;
            } else {
                out.line("Message moved successfully")?;
            }
        }
        MailAction::MarkRead { id, unread } => {
            let client = ctx.graph().await?;
            mail::mark_as_read(&client, &id, !unread)
                .await
                .context("failed to update message")?;
            out.line(if unread {
                "Message marked as unread"
            } else {
                "Message marked as read"
            })?;
        }
        MailAction::Delete { id } => {
            let client = ctx.graph().await?;
            mail::delete_message(&client, &id)
                .await
                .context("failed to delete message")?;
            out.line("Message deleted")?;
        }
    }
    Ok(())
}

const fn body_type(html: bool) -> BodyType {
    if html { BodyType::Html } else { BodyType::Text }
}

fn message_table(messages: &[Message], with_read: bool, now: DateTime<Local>) -> Table {
    let mut headers = vec!["ID", "FROM", "SUBJECT", "DATE"];
    if with_read {
        headers.push("READ");
    }
    let mut table = Table::new(headers);
    for msg in messages {
        let mut row = vec![
            short_id(&msg.id),
            msg.format_from(FROM_WIDTH),
            msg.format_subject(SUBJECT_WIDTH),
            msg.format_date(now),
        ];
        if with_read {
            row.push(if msg.is_read { "✓" } else { "" }.to_string());
        }
        table.push_row(row);
    }
    table
}

fn print_messages<W: Write>(
    out: &mut Formatter<W>,
    messages: &[Message],
    with_read: bool,
    now: DateTime<Local>,
) -> std::io::Result<()> {
    if out.format() == Format::Json {
        return out.print_value(&messages);
    }
    if messages.is_empty() {
        return notice(out, "No messages found");
    }
    out.print(&Content::Table(&message_table(messages, with_read, now)))
}

fn folder_table(folders: &[Folder]) -> Table {
    let mut table = Table::new(["ID", "NAME", "TOTAL", "UNREAD"]);
    for f in folders {
        table.push_row(vec![
            short_id(&f.id),
            f.display_name.clone(),
            f.total_item_count.to_string(),
            f.unread_item_count.to_string(),
        ]);
    }
    table
}

/// Header block, separator and body of one message.
fn write_message<W: Write>(out: &mut Formatter<W>, msg: &Message, markdown: bool) -> Result<()> {
    if out.format() == Format::Json {
        out.print_value(msg)?;
        return Ok(());
    }

    let date = msg
        .received_at
        .map(|t| t.with_timezone(&Local).to_rfc2822())
        .unwrap_or_default();
    out.line(format!("From:    {}", msg.from))?;
    out.line(format!("To:      {}", msg.to.join(", ")))?;
    out.line(format!("Subject: {}", msg.subject))?;
    out.line(format!("Date:    {date}"))?;
    out.line("")?;
    out.line("---")?;
    out.line("")?;

    let body = msg.body.as_deref().unwrap_or_default();
    let body = match (msg.is_html(), markdown) {
        (true, true) => htmd::convert(body).context("failed to convert HTML to Markdown")?,
        (true, false) => strip_html(body),
        (false, _) => body.to_string(),
    };
    out.line(body)?;
    Ok(())
}
