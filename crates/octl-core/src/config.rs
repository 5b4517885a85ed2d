//! Persistent configuration.
//!
//! Settings live in `config.json` inside the octl config directory
//! (`$OCTL_CONFIG_DIR`, else the platform config dir joined with `octl`).
//! The non-secret auth record sits next to it.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Error, Result};
use crate::util;

/// Environment variable that overrides the config directory.
pub const CONFIG_DIR_ENV: &str = "OCTL_CONFIG_DIR";

/// Environment variable that overrides the configured client ID.
pub const CLIENT_ID_ENV: &str = "OCTL_CLIENT_ID";

/// Tenant used when none is configured. Accepts personal and work accounts.
pub const DEFAULT_TENANT: &str = "common";

const CONFIG_FILE: &str = "config.json";
const AUTH_RECORD_FILE: &str = "auth_record.json";

/// Where access and refresh tokens are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialStoreKind {
    /// System keyring (Secret Service, Keychain, Credential Manager).
    #[default]
    Keyring,
    /// Owner-only JSON file in the config directory.
    File,
}

/// User settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Azure app registration (client) ID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    /// Directory tenant; `common` when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<String>,
    /// Token storage backend.
    #[serde(default)]
    pub credential_store: CredentialStoreKind,
}

impl Config {
    /// Returns the configured tenant, or [`DEFAULT_TENANT`].
    #[must_use]
    pub fn tenant_or_default(&self) -> &str {
        self.tenant
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_TENANT)
    }
}

/// Picks the client ID to use.
///
/// A non-empty `env` value (normally `$OCTL_CLIENT_ID`) wins over the
/// config file. Empty strings count as absent.
#[must_use]
pub fn resolve_client_id(env: Option<String>, config: &Config) -> Option<String> {
    env.filter(|id| !id.is_empty())
        .or_else(|| config.client_id.clone().filter(|id| !id.is_empty()))
}

/// Reads and writes files in the config directory.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: PathBuf,
}

impl ConfigStore {
    /// Creates a store rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Finds the config directory from the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if no platform config directory exists.
    pub fn locate() -> Result<Self> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return Ok(Self::new(dir));
        }
        dirs::config_dir()
            .map(|d| Self::new(d.join("octl")))
            .ok_or_else(|| Error::Config("could not determine config directory".to_string()))
    }

    /// Returns the config directory.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the path of `config.json`.
    #[must_use]
    pub fn config_path(&self) -> PathBuf {
        self.dir.join(CONFIG_FILE)
    }

    /// Returns the path of the non-secret auth record.
    #[must_use]
    pub fn auth_record_path(&self) -> PathBuf {
        self.dir.join(AUTH_RECORD_FILE)
    }

    /// Loads the config, or the default when the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid JSON.
    pub fn load(&self) -> Result<Config> {
        let path = self.config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                Error::Config(format!("failed to parse {}: {e}", path.display()))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                Ok(Config::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Writes the config as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub fn save(&self, config: &Config) -> Result<()> {
        let json = serde_json::to_string_pretty(config)?;
        util::write_private(&self.config_path(), json.as_bytes())?;
        debug!(path = %self.config_path().display(), "saved config");
        Ok(())
    }

    /// Stores `client_id` while keeping the other settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be read or written.
    pub fn set_client_id(&self, client_id: &str) -> Result<Config> {
        let mut config = self.load()?;
        config.client_id = Some(client_id.to_string());
        self.save(&config)?;
        Ok(config)
    }
}
