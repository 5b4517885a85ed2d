//! `octl auth` handlers.

use std::io::Write;

use anyhow::{Result, bail};
use octl_core::config::CLIENT_ID_ENV;
use octl_core::{AuthStatus, Config, ConfigStore, resolve_client_id};
use octl_oauth::DeviceAuthorization;
use tracing::{info, warn};

use super::{Context, DATA_TIMEOUT, LOGIN_TIMEOUT, notice, with_timeout};
use crate::cli::auth::AuthAction;
use crate::output::{Format, Formatter};

const MISSING_CLIENT_ID: &str = "\
client ID required. Provide via --client-id flag, OCTL_CLIENT_ID env var, or config file.

To create an Azure app:
1. Go to https://portal.azure.com, App registrations
2. Create a new registration and enable public client flows
3. Copy the Application (client) ID";

pub async fn run<W: Write>(
    ctx: &Context,
    action: AuthAction,
    out: &mut Formatter<W>,
) -> Result<()> {
    match action {
        AuthAction::Login { client_id, open } => {
            with_timeout(LOGIN_TIMEOUT, login(ctx, client_id, open, out)).await
        }
        AuthAction::Logout => {
            ctx.auth_manager(ctx.client_id()).logout()?;
            out.line("Logged out successfully")?;
            Ok(())
        }
        AuthAction::Status => {
            let auth = ctx.auth_manager(ctx.client_id());
            let status = with_timeout(DATA_TIMEOUT, async { Ok(auth.status().await) }).await?;
            write_status(out, &status)?;
            Ok(())
        }
    }
}

async fn login<W: Write>(
    ctx: &Context,
    flag: Option<String>,
    open: bool,
    out: &mut Formatter<W>,
) -> Result<()> {
    let flag = flag.map(|id| id.trim().to_string()).filter(|id| !id.is_empty());
    let env = std::env::var(CLIENT_ID_ENV).ok();
    let Some(client_id) = login_client_id(flag.clone(), env, &ctx.config) else {
        bail!(MISSING_CLIENT_ID);
    };

    if let Some(id) = &flag {
        save_client_id(&ctx.store, id);
    }

    notice(out, "Starting authentication...")?;
    let auth = ctx.auth_manager(Some(client_id));
    let record = auth
        .login(LOGIN_TIMEOUT, |device| show_device_prompt(device, open))
        .await?;

    if out.format() == Format::Json {
        out.print_value(&record)?;
    } else {
        out.line("")?;
        out.line(format!("Successfully logged in as: {}", record.username))?;
    }
    Ok(())
}

/// Client ID for login: the flag wins, then `env`, then the config file.
fn login_client_id(flag: Option<String>, env: Option<String>, config: &Config) -> Option<String> {
    flag.map(|id| id.trim().to_string())
        .filter(|id| !id.is_empty())
        .or_else(|| resolve_client_id(env, config))
}

/// Persists a client ID given on the command line. Failure only warns.
fn save_client_id(store: &ConfigStore, client_id: &str) -> bool {
    match store.set_client_id(client_id) {
        Ok(_) => {
            info!("client ID saved to config");
            true
        }
        Err(e) => {
            warn!("failed to save client ID: {e}");
            false
        }
    }
}

/// Tells the user where to enter the code; goes to stderr so stdout stays parseable.
fn show_device_prompt(device: &DeviceAuthorization, open: bool) {
    eprintln!();
    eprintln!("To sign in, use a web browser to open the page:");
    eprintln!("  {}", device.verification_uri);
    eprintln!();
    eprintln!("Enter the code: {}", device.user_code);
    eprintln!();
    eprintln!("Waiting for authentication...");

    if open {
        if let Err(e) = opener::open(&device.verification_uri) {
            warn!("failed to open browser: {e}");
        }
    }
}

fn write_status<W: Write>(out: &mut Formatter<W>, status: &AuthStatus) -> std::io::Result<()> {
    if out.format() == Format::Json {
        return out.print_value(status);
    }

    if !status.configured {
        out.line("Status: Not configured")?;
        out.line("")?;
        return out.line(
            "No client ID configured. Run 'octl auth login --client-id <your-id>' to configure.",
        );
    }

    if status.logged_in {
        out.line("Status: Logged in")?;
        if let Some(username) = &status.username {
            out.line(format!("Account: {username}"))?;
        }
        if let Some(id) = &status.home_account_id {
            out.line(format!("Account ID: {id}"))?;
        }
        return Ok(());
    }

    out.line("Status: Not logged in")?;
    out.line("")?;
    out.line("Run 'octl auth login' to authenticate.")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config_with(client_id: &str) -> Config {
        Config {
            client_id: Some(client_id.to_string()),
            ..Config::default()
        }
    }

    #[test]
    fn test_login_client_id_precedence() {
        let config = config_with("from-config");
        let flag = || Some("from-flag".to_string());
        let env = || Some("from-env".to_string());

        assert_eq!(
            login_client_id(flag(), env(), &config).as_deref(),
            Some("from-flag")
        );
        assert_eq!(
            login_client_id(None, env(), &config).as_deref(),
            Some("from-env")
        );
        assert_eq!(
            login_client_id(None, None, &config).as_deref(),
            Some("from-config")
        );
        assert_eq!(
            login_client_id(Some("  ".to_string()), Some(String::new()), &config).as_deref(),
            Some("from-config")
        );
        assert_eq!(login_client_id(None, None, &Config::default()), None);
    }

    #[test]
    fn test_saved_client_id_is_used_next_time() {
        let dir = tempfile::tempdir().unwrap();
        let store = ConfigStore::new(dir.path());
        assert!(save_client_id(&store, "abc-123"));

        let ctx = Context::open(store).unwrap();
        assert_eq!(
            login_client_id(None, None, &ctx.config).as_deref(),
            Some("abc-123")
        );
    }

    #[test]
    fn test_save_client_id_failure_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let not_a_dir = dir.path().join("octl");
        std::fs::write(&not_a_dir, "").unwrap();
        assert!(!save_client_id(&ConfigStore::new(not_a_dir), "abc-123"));
    }

    #[tokio::test]
    async fn test_logout_with_malformed_config() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.json"), "{not json").unwrap();
        std::fs::write(dir.path().join("auth_record.json"), "{}").unwrap();

        let ctx = Context::open_lenient(ConfigStore::new(dir.path()));
        let mut out = Formatter::new(Format::Table, Vec::new());
        run(&ctx, AuthAction::Logout, &mut out).await.unwrap();

        assert_eq!(
            String::from_utf8(out.into_inner()).unwrap(),
            "Logged out successfully\n"
        );
        assert!(!dir.path().join("auth_record.json").exists());
    }

    fn status_output(format: Format, status: &AuthStatus) -> String {
        let mut out = Formatter::new(format, Vec::new());
        write_status(&mut out, status).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn test_status_not_configured() {
        let out = status_output(Format::Table, &AuthStatus::default());
        assert!(out.starts_with("Status: Not configured\n\n"));
        assert!(out.contains("--client-id <your-id>"));
    }

    #[test]
    fn test_status_logged_in() {
        let status = AuthStatus {
            configured: true,
            logged_in: true,
            username: Some("ada@example.com".to_string()),
            home_account_id: Some("oid.tid".to_string()),
        };
        assert_eq!(
            status_output(Format::Table, &status),
            "Status: Logged in\nAccount: ada@example.com\nAccount ID: oid.tid\n"
        );
    }

    #[test]
    fn test_status_not_logged_in() {
        let status = AuthStatus {
            configured: true,
            ..AuthStatus::default()
        };
        assert_eq!(
            status_output(Format::Plain, &status),
            "Status: Not logged in\n\nRun 'octl auth login' to authenticate.\n"
        );
    }

    #[test]
    fn test_status_json() {
        let status = AuthStatus {
            configured: true,
            ..AuthStatus::default()
        };
        let json: serde_json::Value =
            serde_json::from_str(&status_output(Format::Json, &status)).unwrap();
        assert_eq!(json["configured"], true);
        assert_eq!(json["logged_in"], false);
    }
}
