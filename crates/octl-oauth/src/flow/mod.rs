//! `OAuth2` authorization flows.

mod device;

pub use device::{DeviceAuthorization, DeviceFlow};

use crate::error::Result;
use crate::provider::Provider;
use crate::token::{ErrorResponse, Token, TokenResponse};
use reqwest::Client;
use std::collections::HashMap;
use tracing::debug;

/// Common `OAuth2` client configuration.
#[derive(Debug, Clone)]
pub struct OAuthClient {
    /// Client ID from provider.
    pub client_id: String,
    /// Client secret (optional for public clients).
    pub client_secret: Option<String>,
    /// Provider configuration.
    pub provider: Provider,
    /// HTTP client.
    http_client: Client,
}

impl OAuthClient {
    /// Creates a new OAuth client.
    #[must_use]
    pub fn new(client_id: impl Into<String>, provider: Provider) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: None,
            provider,
            http_client: Client::new(),
        }
    }

    /// Sets the client secret.
    #[must_use]
    pub fn with_client_secret(mut self, secret: impl Into<String>) -> Self {
        self.client_secret = Some(secret.into());
        self
    }

    /// Replaces the HTTP client (e.g. to apply a request timeout).
    #[must_use]
    pub fn with_http_client(mut self, http_client: Client) -> Self {
        self.http_client = http_client;
        self
    }

    /// Refreshes an access token using a refresh token.
    ///
    /// `scopes` may narrow or restate the scopes; the provider defaults are
    /// used when `None`. The previous refresh token and identity token are
    /// carried over when the server does not return new ones.
    ///
    /// # Errors
    ///
    /// Returns an error if the refresh fails or if the token has no refresh token.
    pub async fn refresh_token(&self, token: &Token, scopes: Option<&[String]>) -> Result<Token> {
        let refresh_token = token.refresh_token()?;
        let scope_str = self.scope_string(scopes);

        let mut params = HashMap::new();
        params.insert("grant_type", "refresh_token");
        params.insert("refresh_token", refresh_token);
        params.insert("client_id", &self.client_id);

        if !scope_str.is_empty() {
            params.insert("scope", &scope_str);
        }

        if let Some(secret) = &self.client_secret {
            params.insert("client_secret", secret);
        }

        debug!(provider = %self.provider.name, "refreshing access token");

        let response = self
            .http_client
            .post(self.provider.token_url.clone())
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let error: ErrorResponse = response.json().await?;
            return Err(error.into_error());
        }

        let token_response: TokenResponse = response.json().await?;
        let mut new_token = Token::from_response(token_response)?;

        // Preserve refresh token if not returned
        if new_token.refresh_token.is_none() {
            new_token.refresh_token.clone_from(&token.refresh_token);
        }
        if new_token.id_token.is_none() {
            new_token.id_token.clone_from(&token.id_token);
        }

        Ok(new_token)
    }

    /// Space-joined scopes, falling back to the provider defaults.
    fn scope_string(&self, scopes: Option<&[String]>) -> String {
        scopes.map_or_else(
            || self.provider.default_scopes.join(" "),
            |s| s.join(" "),
        )
    }
}
