//! Sending, drafting, flagging and deleting messages.

use tracing::{debug, info};

use super::{Message, SendOptions};
use crate::error::{Error, Result};
use crate::graph::GraphClient;
use crate::graph::model::{
    GraphMessage, ItemBody, OutgoingMessage, ReadFlagUpdate, Recipient, SendMailRequest,
};

fn recipients(addresses: &[String]) -> Vec<Recipient> {
    addresses
        .iter()
        .map(|a| a.trim())
        .filter(|a| !a.is_empty())
        .map(Recipient::address)
        .collect()
}

fn outgoing(opts: &SendOptions) -> OutgoingMessage {
    OutgoingMessage {
        subject: opts.subject.clone(),
        body: ItemBody {
            content_type: Some(opts.body_type.as_graph().to_string()),
            content: Some(opts.body.clone()),
        },
        to_recipients: recipients(&opts.to),
        cc_recipients: recipients(&opts.cc),
        bcc_recipients: recipients(&opts.bcc),
    }
}

/// Sends a message immediately.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] without a `to` recipient, or an error if
/// the Graph request fails.
pub async fn send_message(client: &GraphClient, opts: &SendOptions) -> Result<()> {
    let message = outgoing(opts);
    if message.to_recipients.is_empty() {
        return Err(Error::InvalidInput(
            "at least one recipient is required".to_string(),
        ));
    }

    let url = client.url(&["me", "sendMail"])?;
    let request = SendMailRequest {
        message,
        save_to_sent_items: opts.save_to_sent,
    };
    client.post_empty(url, &request).await?;
    info!(recipients = opts.to.len(), "message sent");
    Ok(())
}

/// Saves a draft in the Drafts folder. Recipients are optional.
///
/// # Errors
///
/// Returns an error if the Graph request fails.
pub async fn create_draft(client: &GraphClient, opts: &SendOptions) -> Result<Message> {
    let url = client.url(&["me", "messages"])?;
    let draft: GraphMessage = client.post_json(url, &outgoing(opts)).await?;
    debug!(id = ?draft.id, "draft created");
    Ok(draft.into())
}

/// Sets or clears the read flag.
///
/// # Errors
///
/// Returns an error if the Graph request fails.
pub async fn mark_as_read(client: &GraphClient, id: &str, is_read: bool) -> Result<()> {
    let url = client.url(&["me", "messages", id])?;
    client.patch_json(url, &ReadFlagUpdate { is_read }).await
}

/// Deletes a message (moves it to Deleted Items).
///
/// # Errors
///
/// Returns an error if the Graph request fails.
pub async fn delete_message(client: &GraphClient, id: &str) -> Result<()> {
    let url = client.url(&["me", "messages", id])?;
    client.delete(url).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::mail::BodyType;
    use wiremock::matchers::{body_json, body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GraphClient {
        GraphClient::new("tok")
            .unwrap()
            .with_base_url(&server.uri())
            .unwrap()
    }

    #[test]
    fn test_recipients_skip_blank() {
        let list = recipients(&[
            " a@example.com ".to_string(),
            String::new(),
            "b@example.com".to_string(),
        ]);
        assert_eq!(
            list,
            vec![
                Recipient::address("a@example.com"),
                Recipient::address("b@example.com")
            ]
        );
    }

    #[tokio::test]
    async fn test_send_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/me/sendMail"))
            .and(body_partial_json(serde_json::json!({
                "saveToSentItems": true,
                "message": {
                    "subject": "Lunch",
                    "body": {"contentType": "html", "content": "<b>noon</b>"},
                    "toRecipients": [{"emailAddress": {"address": "a@example.com"}}],
                    "ccRecipients": [{"emailAddress": {"address": "c@example.com"}}]
                }
            })))
            .respond_with(ResponseTemplate::new(202))
            .expect(1)
            .mount(&server)
            .await;

        let opts = SendOptions {
            to: vec!["a@example.com".to_string()],
            cc: vec!["c@example.com".to_string()],
            subject: "Lunch".to_string(),
            body: "<b>noon</b>".to_string(),
            body_type: BodyType::Html,
            ..SendOptions::default()
        };
        send_message(&client(&server), &opts).await.unwrap();
    }

    #[tokio::test]
    async fn test_send_message_requires_recipient() {
        let server = MockServer::start().await;
        let err = send_message(&client(&server), &SendOptions::default())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "at least one recipient is required");
    }

    #[tokio::test]
    async fn test_create_draft_without_recipients() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/me/messages"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "id": "draft-1",
                "subject": "Notes",
                "isRead": true
            })))
            .expect(1)
            .mount(&server)
            .await;

        let opts = SendOptions {
            subject: "Notes".to_string(),
            ..SendOptions::default()
        };
        let draft = create_draft(&client(&server), &opts).await.unwrap();
        assert_eq!(draft.id, "draft-1");
        assert!(draft.to.is_empty());
    }

    #[tokio::test]
    async fn test_mark_as_read_and_delete() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/me/messages/m1"))
            .and(body_json(serde_json::json!({"isRead": false})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "m1"})))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/me/messages/m1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = client(&server);
        mark_as_read(&client, "m1", false).await.unwrap();
        delete_message(&client, "m1").await.unwrap();
    }
}
