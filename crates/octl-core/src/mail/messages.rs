//! Listing, reading and searching messages.

use tracing::debug;

use super::{LIST_SELECT, ListOptions, Message, folder_segment};
use crate::error::Result;
use crate::graph::GraphClient;
use crate::graph::model::{Collection, GraphMessage};

/// Builds the `$filter` value, folding in the unread restriction.
fn effective_filter(opts: &ListOptions) -> Option<String> {
    let filter = opts.filter.as_deref().filter(|f| !f.is_empty());
    match (filter, opts.unread_only) {
        (Some(f), true) => Some(format!("({f}) and isRead eq false")),
        (None, true) => Some("isRead eq false".to_string()),
        (Some(f), false) => Some(f.to_string()),
        (None, false) => None,
    }
}

fn list_query(opts: &ListOptions) -> Vec<(&'static str, String)> {
    let top = if opts.top == 0 { 25 } else { opts.top };
    let order_by = if opts.order_by.is_empty() {
        "receivedDateTime desc"
    } else {
        opts.order_by.as_str()
    };

    let mut query = vec![
        ("$top", top.to_string()),
        ("$orderby", order_by.to_string()),
        ("$select", LIST_SELECT.to_string()),
    ];
    if opts.skip > 0 {
        query.push(("$skip", opts.skip.to_string()));
    }
    if let Some(filter) = effective_filter(opts) {
        query.push(("$filter", filter));
    }
    query
}

/// Lists messages, newest first by default.
///
/// With `folder_id` set only that folder is listed; the paging, sort and
/// filter options apply either way.
///
/// # Errors
///
/// Returns an error if the Graph request fails.
pub async fn list_messages(client: &GraphClient, opts: &ListOptions) -> Result<Vec<Message>> {
    let url = match opts.folder_id.as_deref().filter(|f| !f.is_empty()) {
        Some(folder) => {
            let folder = folder_segment(folder);
            client.url(&["me", "mailFolders", &*folder, "messages"])?
        }
        None => client.url(&["me", "messages"])?,
    };
    let query = list_query(opts);
    debug!(?query, "listing messages");

    let page: Collection<GraphMessage> = client.get_json(url, &query, &[]).await?;
    Ok(page.value.into_iter().map(Message::from).collect())
}

/// Fetches one message including its body.
///
/// # Errors
///
/// Returns an error if the message does not exist or the request fails.
pub async fn get_message(client: &GraphClient, id: &str) -> Result<Message> {
    let url = client.url(&["me", "messages", id])?;
    let select = "id,subject,from,toRecipients,receivedDateTime,isRead,hasAttachments,body";
    let msg: GraphMessage = client
        .get_json(url, &[("$select", select.to_string())], &[])
        .await?;
    Ok(msg.into())
}

/// Full-text search across the mailbox.
///
/// Graph does not allow `$orderby` together with `$search`; results come
/// back in relevance order.
///
/// # Errors
///
/// Returns an error if the Graph request fails.
pub async fn search_messages(client: &GraphClient, query: &str, top: u32) -> Result<Vec<Message>> {
    let top = if top == 0 { 25 } else { top };
    let url = client.url(&["me", "messages"])?;
    let search = format!("\"{}\"", query.replace('"', "\\\""));
    debug!(%search, "searching messages");

    let params = [
        ("$search", search),
        ("$top", top.to_string()),
        ("$select", LIST_SELECT.to_string()),
    ];
    let page: Collection<GraphMessage> = client.get_json(url, &params, &[]).await?;
    Ok(page.value.into_iter().map(Message::from).collect())
}
