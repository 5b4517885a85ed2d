//! Device Authorization Flow implementation (RFC 8628).

use super::OAuthClient;
use crate::error::{Error, Result};
use crate::token::{ErrorResponse, Token, TokenResponse};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, info};

/// Interval increase mandated by RFC 8628 on `slow_down`.
const SLOW_DOWN_STEP: Duration = Duration::from_secs(5);

/// Device authorization response.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceAuthorization {
    /// Device code for polling.
    pub device_code: String,
    /// User code to display to the user.
    pub user_code: String,
    /// Verification URI where user should go.
    pub verification_uri: String,
    /// Complete verification URI (optional).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_uri_complete: Option<String>,
    /// Expiration time in seconds.
    pub expires_in: u32,
    /// Polling interval in seconds (minimum 5 seconds).
    #[serde(default = "default_interval")]
    pub interval: u32,
    /// Ready-made instructions for the user (Microsoft only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

const fn default_interval() -> u32 {
    5
}

/// Device Authorization Flow for `OAuth2`.
///
/// This flow is suitable for devices with limited input capabilities
/// or no browser (e.g., CLI applications).
#[derive(Debug)]
pub struct DeviceFlow {
    client: OAuthClient,
}

impl DeviceFlow {
    /// Creates a new device flow.
    #[must_use]
    pub const fn new(client: OAuthClient) -> Self {
        Self { client }
    }

    /// Returns the underlying client.
    #[must_use]
    pub const fn client(&self) -> &OAuthClient {
        &self.client
    }

    /// Requests device authorization from the server.
    ///
    /// Returns the device code and user code that should be displayed to the user.
    ///
    /// # Arguments
    ///
    /// * `scopes` - Optional scopes to request (uses provider defaults if None)
    ///
    /// # Errors
    ///
    /// Returns an error if the authorization request fails.
    pub async fn request_device_authorization(
        &self,
        scopes: Option<&[String]>,
    ) -> Result<DeviceAuthorization> {
        let device_auth_url = self
            .client
            .provider
            .device_auth_url
            .as_ref()
            .ok_or_else(|| {
                Error::InvalidConfig(format!(
                    "Provider {} does not support device flow",
                    self.client.provider.name
                ))
            })?;

        let scope_str = self.client.scope_string(scopes);

        let mut params = HashMap::new();
        params.insert("client_id", self.client.client_id.as_str());
        if !scope_str.is_empty() {
            params.insert("scope", &scope_str);
        }

        let response = self
            .client
            .http_client
            .post(device_auth_url.clone())
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let error: ErrorResponse = response.json().await?;
            return Err(error.into_error());
        }

        response.json().await.map_err(Into::into)
    }

    /// Polls for token completion.
    ///
    /// This should be called repeatedly after displaying the user code
    /// until the user completes authorization or the device code expires.
    ///
    /// # Errors
    ///
    /// Returns `Error::AccessDenied` if the user declines and
    /// `Error::TokenExpired` if the device code expired. `authorization_pending`
    /// and `slow_down` are returned as [`Error::OAuth`] and mean "keep polling".
    pub async fn poll_for_token(&self, device_code: &str, interval: Duration) -> Result<Token> {
        tokio::time::sleep(interval).await;

        let mut params = HashMap::new();
        params.insert("grant_type", "urn:ietf:params:oauth:grant-type:device_code");
        params.insert("device_code", device_code);
        params.insert("client_id", &self.client.client_id);

        let response = self
            .client
            .http_client
            .post(self.client.provider.token_url.clone())
            .form(&params)
            .send()
            .await?;

        if !response.status().is_success() {
            let error: ErrorResponse = response.json().await?;

            return match error.error.as_str() {
                "authorization_pending" => Err(Error::oauth_error(
                    "authorization_pending",
                    "User has not yet authorized",
                )),
                "slow_down" => Err(Error::oauth_error(
                    "slow_down",
                    "Polling too frequently, slow down",
                )),
                "access_denied" | "authorization_declined" => Err(Error::AccessDenied),
                "expired_token" => Err(Error::TokenExpired),
                _ => Err(error.into_error()),
            };
        }

        let token_response: TokenResponse = response.json().await?;
        Token::from_response(token_response)
    }

    /// Complete device authorization flow.
    ///
    /// 1. Requests device authorization
    /// 2. Hands the user code and verification URI to `prompt`
    /// 3. Polls for token completion, honouring `slow_down`
    ///
    /// Polling stops at whichever comes first: `timeout` or the device code
    /// expiry reported by the server.
    ///
    /// # Errors
    ///
    /// Returns an error if authorization fails, is denied, or times out.
    pub async fn authorize<F>(
        &self,
        scopes: Option<&[String]>,
        timeout: Duration,
        prompt: F,
    ) -> Result<(DeviceAuthorization, Token)>
    where
        F: FnOnce(&DeviceAuthorization),
    {
        let auth = self.request_device_authorization(scopes).await?;
        prompt(&auth);

        let limit = timeout.min(Duration::from_secs(u64::from(auth.expires_in)));
        let deadline = Instant::now() + limit;
        let mut interval = Duration::from_secs(u64::from(auth.interval));

        loop {
            if Instant::now() + interval > deadline {
                return Err(Error::Timeout(limit.as_secs()));
            }

            match self.poll_for_token(&auth.device_code, interval).await {
                Ok(token) => {
                    info!(provider = %self.client.provider.name, "device authorization complete");
                    return Ok((auth, token));
                }
                Err(Error::OAuth { ref error, .. }) if error == "authorization_pending" => {}
                Err(Error::OAuth { ref error, .. }) if error == "slow_down" => {
                    interval += SLOW_DOWN_STEP;
                    debug!(interval_secs = interval.as_secs(), "device flow asked to slow down");
                }
                Err(e) => return Err(e),
            }
        }
    }
}
