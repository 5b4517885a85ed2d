//! Secure token storage.
//!
//! Tokens are stored as JSON under a key derived from the signed-in account.
//! [`KeyringStore`] uses the platform's native credential storage:
//! - Linux: Secret Service (GNOME Keyring, `KWallet`)
//! - macOS: Keychain
//! - Windows: Credential Manager
//!
//! [`FileStore`] is the fallback for hosts without a keyring daemon.

use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use keyring::Entry;
use octl_oauth::Token;
use tracing::{debug, warn};

use crate::util;

/// Service name used for keyring entries.
pub const SERVICE_NAME: &str = "octl";

/// Error type for credential operations.
#[derive(Debug, thiserror::Error)]
pub enum CredentialError {
    /// Failed to access keyring.
    #[error("Keyring error: {0}")]
    Keyring(#[from] keyring::Error),

    /// Failed to read or write the token file.
    #[error("Token file error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored token could not be (de)serialized.
    #[error("Stored token is invalid: {0}")]
    Format(#[from] serde_json::Error),
}

/// Result type for credential operations.
pub type CredentialResult<T> = std::result::Result<T, CredentialError>;

/// Storage backend for `OAuth2` tokens.
pub trait CredentialStore: Debug + Send + Sync {
    /// Returns the token stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the stored value is corrupt.
    fn load(&self, key: &str) -> CredentialResult<Option<Token>>;

    /// Stores `token` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn store(&self, key: &str, token: &Token) -> CredentialResult<()>;

    /// Removes the token under `key`. A missing entry is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    fn delete(&self, key: &str) -> CredentialResult<()>;
}

/// Tokens in the system keyring.
#[derive(Debug, Clone, Default)]
pub struct KeyringStore;

impl KeyringStore {
    /// Creates a keyring-backed store.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl CredentialStore for KeyringStore {
    fn load(&self, key: &str) -> CredentialResult<Option<Token>> {
        let entry = Entry::new(SERVICE_NAME, key)?;
        match entry.get_password() {
            Ok(token_json) => Ok(Some(serde_json::from_str(&token_json)?)),
            Err(keyring::Error::NoEntry) => {
                debug!("No token found in keyring for {key}");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn store(&self, key: &str, token: &Token) -> CredentialResult<()> {
        let token_json = serde_json::to_string(token)?;
        let entry = Entry::new(SERVICE_NAME, key)?;
        entry.set_password(&token_json)?;
        debug!("Stored token in keyring for {key}");
        Ok(())
    }

    fn delete(&self, key: &str) -> CredentialResult<()> {
        let entry = Entry::new(SERVICE_NAME, key)?;
        match entry.delete_credential() {
            Ok(()) => {
                debug!("Deleted token from keyring for {key}");
                Ok(())
            }
            Err(keyring::Error::NoEntry) => {
                debug!("No token to delete in keyring for {key}");
                Ok(())
            }
            Err(e) => {
                warn!("Failed to delete token from keyring: {e}");
                Err(e.into())
            }
        }
    }
}

/// Tokens in owner-only files (`token_<key>.json`) under a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a file-backed store rooted at `dir`.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Returns the file that holds the token for `key`.
    #[must_use]
    pub fn path_for(&self, key: &str) -> PathBuf {
        let safe: String = key
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        self.dir.join(format!("token_{safe}.json"))
    }

    fn read(path: &Path) -> CredentialResult<Option<Token>> {
        match fs::read_to_string(path) {
            Ok(json) => Ok(Some(serde_json::from_str(&json)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

impl CredentialStore for FileStore {
    fn load(&self, key: &str) -> CredentialResult<Option<Token>> {
        let path = self.path_for(key);
        let token = Self::read(&path)?;
        if token.is_none() {
            debug!(path = %path.display(), "No token file");
        }
        Ok(token)
    }

    fn store(&self, key: &str, token: &Token) -> CredentialResult<()> {
        let path = self.path_for(key);
        let json = serde_json::to_string_pretty(token)?;
        util::write_private(&path, json.as_bytes())?;
        debug!(path = %path.display(), "Stored token file");
        Ok(())
    }

    fn delete(&self, key: &str) -> CredentialResult<()> {
        let path = self.path_for(key);
        if util::remove_if_exists(&path)? {
            debug!(path = %path.display(), "Deleted token file");
        }
        Ok(())
    }
}
