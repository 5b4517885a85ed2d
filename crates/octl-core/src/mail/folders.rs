//! Mail folders and moving messages between them.

use tracing::debug;

use super::{Folder, Message, folder_segment};
use crate::error::{Error, Result};
use crate::graph::GraphClient;
use crate::graph::model::{Collection, GraphMessage, MailFolder, MoveRequest};

/// Folders per request; Graph returns 10 by default.
const FOLDER_PAGE_SIZE: u32 = 100;

/// Lists the top-level mail folders.
///
/// # Errors
///
/// Returns an error if the Graph request fails.
pub async fn list_folders(client: &GraphClient) -> Result<Vec<Folder>> {
    let url = client.url(&["me", "mailFolders"])?;
    let page: Collection<MailFolder> = client
        .get_json(url, &[("$top", FOLDER_PAGE_SIZE.to_string())], &[])
        .await?;
    if page.next_link.is_some() {
        debug!("more folders available than fit in one page");
    }
    Ok(page.value.into_iter().map(Folder::from).collect())
}

/// Fetches a folder by ID or well-known name.
///
/// # Errors
///
/// Returns an error if the folder does not exist or the request fails.
pub async fn get_folder(client: &GraphClient, id: &str) -> Result<Folder> {
    let url = client.url(&["me", "mailFolders", &*folder_segment(id)])?;
    let folder: MailFolder = client.get_json(url, &[], &[]).await?;
    Ok(folder.into())
}

/// Moves a message to `destination` (folder ID or well-known name).
///
/// Returns the message as it exists in the destination; its ID changes.
///
/// # Errors
///
/// Returns an error if `destination` is empty or the request fails.
pub async fn move_message(client: &GraphClient, id: &str, destination: &str) -> Result<Message> {
    let destination = folder_segment(destination.trim());
    if destination.is_empty() {
        return Err(Error::InvalidInput(
            "destination folder is required".to_string(),
        ));
    }

    let url = client.url(&["me", "messages", id, "move"])?;
    let moved: GraphMessage = client
        .post_json(
            url,
            &MoveRequest {
                destination_id: &destination,
            },
        )
        .await?;
    debug!(%destination, "message moved");
    Ok(moved.into())
}
