//! `OpenID Connect` identity token claims.
//!
//! The identity token is only used to label the signed-in account, so the
//! payload is decoded without verifying the signature.

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::Deserialize;

use crate::error::{Error, Result};

/// Subset of identity token claims issued by the Microsoft identity platform.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IdTokenClaims {
    /// Sign-in name (usually the email address or UPN).
    #[serde(default)]
    pub preferred_username: Option<String>,
    /// Email address, when the `email` scope was granted.
    #[serde(default)]
    pub email: Option<String>,
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Object ID of the user in the issuing tenant.
    #[serde(default)]
    pub oid: Option<String>,
    /// Tenant ID that issued the token.
    #[serde(default)]
    pub tid: Option<String>,
}

impl IdTokenClaims {
    /// Decodes the claims from a compact JWT.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is not three dot-separated segments or
    /// the payload is not base64url-encoded JSON.
    pub fn decode(id_token: &str) -> Result<Self> {
        let mut parts = id_token.split('.');
        let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(_), Some(payload), Some(_), None) => payload,
            _ => return Err(Error::InvalidResponse("malformed id_token".into())),
        };

        // Some issuers pad the segments even though JWT forbids it.
        let bytes = URL_SAFE_NO_PAD
            .decode(payload.trim_end_matches('='))
            .map_err(|e| Error::InvalidResponse(format!("id_token payload: {e}")))?;

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Best available sign-in name for display.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.preferred_username
            .as_deref()
            .or(self.email.as_deref())
            .or(self.name.as_deref())
            .filter(|s| !s.is_empty())
    }

    /// Account identifier in the `{oid}.{tid}` form used by MSAL caches.
    #[must_use]
    pub fn home_account_id(&self) -> Option<String> {
        match (self.oid.as_deref(), self.tid.as_deref()) {
            (Some(oid), Some(tid)) => Some(format!("{oid}.{tid}")),
            _ => None,
        }
    }
}
