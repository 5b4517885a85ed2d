//! Sign-in lifecycle: device-code login, silent token reuse, status, logout.
//!
//! A successful login leaves two things behind:
//! - the `OAuth2` token in a [`CredentialStore`] (keyring by default)
//! - a non-secret [`AuthRecord`] in `auth_record.json` naming the account
//!
//! Later runs read the record, load the token, and refresh it when it has
//! expired, without user interaction.

pub mod credentials;

use std::fs;
use std::time::Duration;

use chrono::{DateTime, Utc};
use octl_oauth::provider::MICROSOFT_AUTHORITY;
use octl_oauth::{DeviceAuthorization, DeviceFlow, IdTokenClaims, OAuthClient, Provider, Token};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{Config, ConfigStore, CredentialStoreKind, DEFAULT_TENANT};
use crate::error::{Error, Result};
use crate::util;
use credentials::{CredentialStore, FileStore, KeyringStore, SERVICE_NAME};

/// Microsoft Graph permissions requested at sign-in.
pub const SCOPES: &[&str] = &[
    "User.Read",
    "Mail.Read",
    "Mail.ReadWrite",
    "Mail.Send",
    "Calendars.Read",
    "Calendars.ReadWrite",
    "offline_access",
];

/// `OpenID Connect` scopes added so the id token names the account.
const IDENTITY_SCOPES: &[&str] = &["openid", "profile"];

/// Scopes sent with the device authorization and refresh requests.
fn request_scopes() -> Vec<String> {
    SCOPES
        .iter()
        .chain(IDENTITY_SCOPES)
        .map(|s| (*s).to_string())
        .collect()
}

/// Non-secret description of the signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthRecord {
    /// Sign-in name shown to the user.
    pub username: String,
    /// Account identifier (`{oid}.{tid}`).
    pub home_account_id: String,
    /// Tenant that issued the tokens.
    pub tenant_id: String,
    /// App registration the tokens belong to.
    pub client_id: String,
    /// Authority URL used for sign-in.
    pub authority: String,
    /// When the login happened.
    pub created_at: DateTime<Utc>,
}

impl AuthRecord {
    /// Returns the credential store key for this account's token.
    #[must_use]
    pub fn credential_key(&self) -> String {
        format!("{SERVICE_NAME}_token_{}", self.home_account_id)
    }
}

/// Result of [`AuthManager::status`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuthStatus {
    /// A client ID is available.
    pub configured: bool,
    /// A usable access token can be obtained without interaction.
    pub logged_in: bool,
    /// Signed-in account name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Signed-in account identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub home_account_id: Option<String>,
}

/// Drives login, silent token acquisition, status and logout.
#[derive(Debug)]
pub struct AuthManager {
    client_id: Option<String>,
    tenant: String,
    config: ConfigStore,
    store: Box<dyn CredentialStore>,
    provider: Option<Provider>,
    http_client: Option<reqwest::Client>,
}

impl AuthManager {
    /// Creates a manager over an explicit credential store.
    #[must_use]
    pub fn new(config: ConfigStore, store: Box<dyn CredentialStore>) -> Self {
        Self {
            client_id: None,
            tenant: DEFAULT_TENANT.to_string(),
            config,
            store,
            provider: None,
            http_client: None,
        }
    }

    /// Creates a manager with the credential store selected in `settings`.
    #[must_use]
    pub fn from_config(config: ConfigStore, settings: &Config, client_id: Option<String>) -> Self {
        let store: Box<dyn CredentialStore> = match settings.credential_store {
            CredentialStoreKind::Keyring => Box::new(KeyringStore::new()),
            CredentialStoreKind::File => Box::new(FileStore::new(config.dir())),
        };
        let tenant = settings.tenant_or_default().to_string();
        Self::new(config, store)
            .with_client_id(client_id)
            .with_tenant(tenant)
    }

    /// Sets the app registration used for login and refresh.
    #[must_use]
    pub fn with_client_id(mut self, client_id: Option<String>) -> Self {
        self.client_id = client_id.filter(|id| !id.is_empty());
        self
    }

    /// Sets the directory tenant.
    #[must_use]
    pub fn with_tenant(mut self, tenant: impl Into<String>) -> Self {
        self.tenant = tenant.into();
        self
    }

    /// Overrides the identity provider endpoints.
    #[must_use]
    pub fn with_provider(mut self, provider: Provider) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Replaces the HTTP client used for token requests.
    #[must_use]
    pub fn with_http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Returns true if a client ID is available.
    #[must_use]
    pub const fn is_configured(&self) -> bool {
        self.client_id.is_some()
    }

    fn oauth_client(&self, client_id: &str) -> Result<OAuthClient> {
        let provider = match &self.provider {
            Some(p) => p.clone(),
            None => Provider::microsoft_tenant(&self.tenant)?,
        };
        let client = OAuthClient::new(client_id, provider);
        Ok(match &self.http_client {
            Some(http) => client.with_http_client(http.clone()),
            None => client,
        })
    }

    /// Runs the interactive device-code login.
    ///
    /// `prompt` receives the user code and verification URL once. Polling
    /// gives up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] without a client ID, or an error if
    /// the flow fails or the token cannot be stored.
    pub async fn login<F>(&self, timeout: Duration, prompt: F) -> Result<AuthRecord>
    where
        F: FnOnce(&DeviceAuthorization),
    {
        let client_id = self.client_id.as_deref().ok_or(Error::NotConfigured)?;
        let flow = DeviceFlow::new(self.oauth_client(client_id)?);
        let scopes = request_scopes();

        let (_, token) = flow.authorize(Some(&scopes), timeout, prompt).await?;

        let claims = match token.id_token.as_deref() {
            Some(id_token) => IdTokenClaims::decode(id_token)?,
            None => {
                warn!("token response carried no id_token");
                IdTokenClaims::default()
            }
        };

        let record = AuthRecord {
            username: claims.username().unwrap_or_default().to_string(),
            home_account_id: claims
                .home_account_id()
                .unwrap_or_else(|| client_id.to_string()),
            tenant_id: claims.tid.clone().unwrap_or_else(|| self.tenant.clone()),
            client_id: client_id.to_string(),
            authority: format!("{MICROSOFT_AUTHORITY}/{}", self.tenant),
            created_at: Utc::now(),
        };

        self.store.store(&record.credential_key(), &token)?;
        self.save_record(&record)?;
        info!(username = %record.username, "login complete");
        Ok(record)
    }

    fn save_record(&self, record: &AuthRecord) -> Result<()> {
        let json = serde_json::to_string_pretty(record)?;
        util::write_private(&self.config.auth_record_path(), json.as_bytes())?;
        Ok(())
    }

    /// Reads the auth record written by the last login.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoggedIn`] if there is no record, or a parse error
    /// if the file is malformed.
    pub fn load_record(&self) -> Result<AuthRecord> {
        let path = self.config.auth_record_path();
        match fs::read_to_string(&path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(Error::NotLoggedIn),
            Err(e) => Err(e.into()),
        }
    }

    /// Returns a valid access token, refreshing the stored one if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotLoggedIn`] if there is no stored sign-in or the
    /// refresh token was rejected.
    pub async fn access_token(&self) -> Result<String> {
        let record = self.load_record()?;
        let key = record.credential_key();
        let token = self.store.load(&key)?.ok_or(Error::NotLoggedIn)?;

        if token.is_valid() {
            debug!("using stored access token");
            return Ok(token.access_token);
        }

        let refreshed = self.refresh(&record, &token).await?;
        self.store.store(&key, &refreshed)?;
        info!("access token refreshed");
        Ok(refreshed.access_token)
    }

    async fn refresh(&self, record: &AuthRecord, token: &Token) -> Result<Token> {
        let client_id = self.client_id.as_deref().unwrap_or(&record.client_id);
        let scopes = request_scopes();
        match self
            .oauth_client(client_id)?
            .refresh_token(token, Some(&scopes))
            .await
        {
            Ok(token) => Ok(token),
            Err(octl_oauth::Error::NoRefreshToken) => Err(Error::NotLoggedIn),
            Err(e) if e.oauth_code() == Some("invalid_grant") => {
                warn!("refresh token rejected: {e}");
                Err(Error::NotLoggedIn)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Reports whether a client is configured and a sign-in is usable.
    pub async fn status(&self) -> AuthStatus {
        if !self.is_configured() {
            return AuthStatus::default();
        }

        let mut status = AuthStatus {
            configured: true,
            ..AuthStatus::default()
        };

        let record = match self.load_record() {
            Ok(record) => record,
            Err(e) => {
                debug!("no usable auth record: {e}");
                return status;
            }
        };

        match self.access_token().await {
            Ok(_) => {
                status.logged_in = true;
                status.username = Some(record.username);
                status.home_account_id = Some(record.home_account_id);
            }
            Err(e) => debug!("silent token acquisition failed: {e}"),
        }
        status
    }

    /// Removes the stored token and the auth record.
    ///
    /// Missing files and entries are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the credential store or filesystem fails.
    pub fn logout(&self) -> Result<()> {
        match self.load_record() {
            Ok(record) => self.store.delete(&record.credential_key())?,
            Err(Error::NotLoggedIn) => debug!("no auth record to remove"),
            Err(e) => warn!("ignoring unreadable auth record: {e}"),
        }
        util::remove_if_exists(&self.config.auth_record_path())?;
        info!("logged out");
        Ok(())
    }
}
