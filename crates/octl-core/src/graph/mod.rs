//! Thin Microsoft Graph HTTP client.
//!
//! Requests carry the bearer token and `Accept: application/json`. Paths are
//! built from escaped segments, so message and event IDs containing `/`,
//! `+` or `=` are safe to pass through.

pub mod model;

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response, header};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

/// Microsoft Graph v1.0 endpoint.
pub const DEFAULT_BASE_URL: &str = "https://graph.microsoft.com/v1.0";

/// Upper bound for a single Graph request.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Authenticated Microsoft Graph client.
#[derive(Debug, Clone)]
pub struct GraphClient {
    http: Client,
    base_url: String,
    access_token: String,
}

impl GraphClient {
    /// Creates a client for the public Graph endpoint.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(access_token: impl Into<String>) -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: access_token.into(),
        })
    }

    /// Points the client at another Graph root (national clouds, tests).
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is empty or not an absolute URL.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(Error::Config("Graph base URL must not be empty".to_string()));
        }
        Url::parse(trimmed)
            .map_err(|e| Error::Config(format!("invalid Graph base URL {trimmed:?}: {e}")))?;
        self.base_url = trimmed.trim_end_matches('/').to_string();
        Ok(self)
    }

    /// Replaces the HTTP client.
    #[must_use]
    pub fn with_http_client(mut self, http: Client) -> Self {
        self.http = http;
        self
    }

    /// Returns the Graph root this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Builds `base_url/segment/...`, escaping each segment.
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.base_url)
            .map_err(|e| Error::Config(format!("invalid Graph base URL: {e}")))?;
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|()| Error::Config("Graph base URL must be absolute".to_string()))?;
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        Ok(url)
    }

    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
        extra_headers: &[(&str, &str)],
    ) -> Result<T> {
        let mut request = self.http.get(url).query(query);
        for (key, value) in extra_headers {
            request = request.header(*key, *value);
        }

        let response = self.send_request(request).await?;
        Ok(response.json::<T>().await?)
    }

    pub(crate) async fn post_json<TReq: Serialize, TRes: DeserializeOwned>(
        &self,
        url: Url,
        body: &TReq,
    ) -> Result<TRes> {
        let request = self.http.post(url).json(body);
        let response = self.send_request(request).await?;
        Ok(response.json::<TRes>().await?)
    }

    /// POSTs `body` and ignores the response body (`202 Accepted` endpoints).
    pub(crate) async fn post_empty<TReq: Serialize>(&self, url: Url, body: &TReq) -> Result<()> {
        let request = self.http.post(url).json(body);
        self.send_request(request).await?;
        Ok(())
    }

    pub(crate) async fn patch_json<TReq: Serialize>(&self, url: Url, body: &TReq) -> Result<()> {
        let request = self.http.patch(url).json(body);
        self.send_request(request).await?;
        Ok(())
    }

    pub(crate) async fn delete(&self, url: Url) -> Result<()> {
        let request = self.http.delete(url);
        self.send_request(request).await?;
        Ok(())
    }

    async fn send_request(&self, request: RequestBuilder) -> Result<Response> {
        let response = request
            .bearer_auth(&self.access_token)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), url = %response.url(), "graph response");
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(graph_error(status.as_u16(), &body))
    }
}

/// Maps an error response to [`Error::Graph`].
fn graph_error(status: u16, body: &str) -> Error {
    match serde_json::from_str::<model::ErrorEnvelope>(body) {
        Ok(envelope) => Error::Graph {
            status,
            code: envelope.error.code,
            message: envelope.error.message,
        },
        Err(_) => Error::Graph {
            status,
            code: String::new(),
            message: body.trim().to_string(),
        },
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::Value;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client(server: &MockServer) -> GraphClient {
        GraphClient::new("tok")
            .unwrap()
            .with_base_url(&format!("{}/v1.0/", server.uri()))
            .unwrap()
    }

    #[test]
    fn test_with_base_url_validation() {
        let client = GraphClient::new("t").unwrap();
        assert!(client.clone().with_base_url("  ").is_err());
        assert!(client.clone().with_base_url("not a url").is_err());
        let client = client.with_base_url("https://graph.example/v1.0//").unwrap();
        assert_eq!(client.base_url(), "https://graph.example/v1.0");
    }

    #[test]
    fn test_url_escapes_segments() {
        let client = GraphClient::new("t").unwrap();
        let url = client.url(&["me", "messages", "AAMk/a+b="]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://graph.microsoft.com/v1.0/me/messages/AAMk%2Fa+b="
        );
    }

    #[test]
    fn test_graph_error_envelope() {
        let err = graph_error(
            404,
            r#"{"error":{"code":"ErrorItemNotFound","message":"The specified object was not found in the store."}}"#,
        );
        assert!(err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Microsoft Graph request failed (404): ErrorItemNotFound: The specified object was not found in the store."
        );
    }

    #[test]
    fn test_graph_error_raw_body() {
        let err = graph_error(502, "Bad Gateway\n");
        match err {
            Error::Graph { status, code, message } => {
                assert_eq!(status, 502);
                assert!(code.is_empty());
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_get_json_sends_auth_and_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/v1.0/me"))
            .and(header("authorization", "Bearer tok"))
            .and(header("accept", "application/json"))
            .and(query_param("$select", "id"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"id": "1"})))
            .mount(&server)
            .await;

        let client = client(&server);
        let url = client.url(&["me"]).unwrap();
        let value: Value = client
            .get_json(url, &[("$select", "id".to_string())], &[])
            .await
            .unwrap();
        assert_eq!(value["id"], "1");
    }

    #[tokio::test]
    async fn test_error_status_becomes_graph_error() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/v1.0/me/events/x"))
            .respond_with(ResponseTemplate::new(403).set_body_json(serde_json::json!({
                "error": {"code": "ErrorAccessDenied", "message": "Access is denied."}
            })))
            .mount(&server)
            .await;

        let client = client(&server);
        let err = client
            .delete(client.url(&["me", "events", "x"]).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Graph { status: 403, ref code, .. } if code == "ErrorAccessDenied"));
    }
}
