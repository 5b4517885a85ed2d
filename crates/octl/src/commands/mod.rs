//! Command handlers.

mod auth;
mod calendar;
mod mail;

use std::future::Future;
use std::io::{self, Write};
use std::time::Duration;

use anyhow::{Context as _, Result, anyhow};
use octl_core::config::CLIENT_ID_ENV;
use octl_core::{AuthManager, Config, ConfigStore, GraphClient, resolve_client_id};
use tracing::{debug, warn};

use crate::cli::auth::AuthAction;
use crate::cli::{Cli, Commands};
use crate::output::{Format, Formatter};

/// Upper bound for commands that talk to Graph.
pub const DATA_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound for the interactive device-code login.
pub const LOGIN_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Characters of an ID shown in table columns.
const SHORT_ID_LEN: usize = 8;

/// Settings shared by every command.
#[derive(Debug)]
pub struct Context {
    store: ConfigStore,
    config: Config,
}

impl Context {
    /// Reads `config.json` from `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be read or is malformed.
    pub fn open(store: ConfigStore) -> Result<Self> {
        let config = store.load()?;
        debug!(dir = %store.dir().display(), "loaded config");
        Ok(Self { store, config })
    }

    /// Like [`Context::open`], but falls back to the default settings when
    /// `config.json` cannot be read.
    #[must_use]
    pub fn open_lenient(store: ConfigStore) -> Self {
        let config = store.load().unwrap_or_else(|e| {
            warn!("ignoring unreadable config: {e}");
            Config::default()
        });
        Self { store, config }
    }

    /// Client ID from `$OCTL_CLIENT_ID` or the config file.
    fn client_id(&self) -> Option<String> {
        resolve_client_id(std::env::var(CLIENT_ID_ENV).ok(), &self.config)
    }

    fn auth_manager(&self, client_id: Option<String>) -> AuthManager {
        AuthManager::from_config(self.store.clone(), &self.config, client_id)
    }

    /// Builds a Graph client with a silently acquired access token.
    async fn graph(&self) -> Result<GraphClient> {
        let auth = self.auth_manager(self.client_id());
        if !auth.is_configured() {
            return Err(octl_core::Error::NotConfigured.into());
        }
        let token = auth.access_token().await?;
        Ok(GraphClient::new(token)?)
    }
}

fn locate_store() -> Result<ConfigStore> {
    ConfigStore::locate().context("failed to locate config directory")
}

/// Runs `fut`, failing once `limit` has passed.
async fn with_timeout<T>(limit: Duration, fut: impl Future<Output = Result<T>>) -> Result<T> {
    tokio::time::timeout(limit, fut)
        .await
        .map_err(|_| anyhow!("operation timed out after {}s", limit.as_secs()))?
}

/// First characters of an ID followed by `...`; short IDs are kept whole.
pub fn short_id(id: &str) -> String {
    match id.char_indices().nth(SHORT_ID_LEN) {
        Some((idx, _)) => format!("{}...", &id[..idx]),
        None => id.to_string(),
    }
}

/// Dispatches a parsed command line.
///
/// # Errors
///
/// Returns the command's error for `main` to report.
pub async fn run(cli: Cli) -> Result<()> {
    let format = cli.format();
    let store = locate_store()?;
    // Logout must work even when the config file is broken.
    let ctx = match &cli.command {
        Commands::Auth(cmd) if matches!(cmd.action, AuthAction::Logout) => {
            Context::open_lenient(store)
        }
        _ => Context::open(store)?,
    };
    let mut out = Formatter::new(format, io::stdout());

    match cli.command {
        Commands::Auth(cmd) => auth::run(&ctx, cmd.action, &mut out).await,
        Commands::Mail(cmd) => {
            with_timeout(DATA_TIMEOUT, mail::run(&ctx, cmd.action, &mut out)).await
        }
        Commands::Calendar(cmd) => {
            with_timeout(DATA_TIMEOUT, calendar::run(&ctx, cmd.action, &mut out)).await
        }
    }
}

/// Prints `text` in table and plain modes; JSON mode stays silent.
fn notice<W: Write>(out: &mut Formatter<W>, text: &str) -> io::Result<()> {
    if out.format() == Format::Json {
        return Ok(());
    }
    out.line(text)
}
