//! `OAuth2` provider configurations.

use crate::error::{Error, Result};
use url::Url;

/// Microsoft identity platform authority host.
pub const MICROSOFT_AUTHORITY: &str = "https://login.microsoftonline.com";

/// Tenant that accepts both personal and work/school accounts.
pub const COMMON_TENANT: &str = "common";

/// `OAuth2` provider configuration.
#[derive(Debug, Clone)]
pub struct Provider {
    /// Provider name (e.g., "Microsoft").
    pub name: String,
    /// Authorization endpoint URL.
    pub auth_url: Url,
    /// Token endpoint URL.
    pub token_url: Url,
    /// Device authorization endpoint (if supported).
    pub device_auth_url: Option<Url>,
    /// Default scopes.
    pub default_scopes: Vec<String>,
}

impl Provider {
    /// Creates a new provider configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if URLs are invalid.
    pub fn new(
        name: impl Into<String>,
        auth_url: impl AsRef<str>,
        token_url: impl AsRef<str>,
    ) -> Result<Self> {
        Ok(Self {
            name: name.into(),
            auth_url: Url::parse(auth_url.as_ref())?,
            token_url: Url::parse(token_url.as_ref())?,
            device_auth_url: None,
            default_scopes: Vec::new(),
        })
    }

    /// Sets the device authorization URL.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn with_device_auth_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.device_auth_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Sets the default scopes.
    #[must_use]
    pub fn with_default_scopes(mut self, scopes: Vec<String>) -> Self {
        self.default_scopes = scopes;
        self
    }

    /// Microsoft identity platform (v2.0 endpoints) for the `common` tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if URL parsing fails.
    pub fn microsoft() -> Result<Self> {
        Self::microsoft_tenant(COMMON_TENANT)
    }

    /// Microsoft identity platform (v2.0 endpoints) for a specific tenant.
    ///
    /// `tenant` may be `common`, `organizations`, `consumers`, a tenant ID or
    /// a verified domain.
    ///
    /// # Errors
    ///
    /// Returns an error if the tenant is empty or URL parsing fails.
    pub fn microsoft_tenant(tenant: &str) -> Result<Self> {
        let tenant = tenant.trim();
        if tenant.is_empty() || tenant.contains('/') {
            return Err(Error::InvalidConfig(format!("invalid tenant: {tenant:?}")));
        }

        let base = format!("{MICROSOFT_AUTHORITY}/{tenant}/oauth2/v2.0");
        Ok(Self::new(
            "Microsoft",
            format!("{base}/authorize"),
            format!("{base}/token"),
        )?
        .with_device_auth_url(format!("{base}/devicecode"))?)
    }

    /// Validates that required URLs are set.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration is invalid.
    pub fn validate(&self) -> Result<()> {
        if self.auth_url.as_str().is_empty() {
            return Err(Error::InvalidConfig("auth_url is empty".into()));
        }
        if self.token_url.as_str().is_empty() {
            return Err(Error::InvalidConfig("token_url is empty".into()));
        }
        Ok(())
    }
}
