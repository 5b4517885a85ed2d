//! Example: sign in to a Microsoft account with the device code flow.
//!
//! ## Prerequisites
//!
//! Register an application in the Azure portal (App registrations), enable
//! "Allow public client flows", and note the Application (client) ID.
//!
//! ## Running
//!
//! ```bash
//! OCTL_CLIENT_ID="your-client-id" cargo run -p octl-oauth --example device_login
//! ```

use std::env;
use std::time::Duration;

use octl_oauth::{DeviceFlow, IdTokenClaims, OAuthClient, Provider};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let client_id = env::var("OCTL_CLIENT_ID").expect("OCTL_CLIENT_ID environment variable not set");
    let tenant = env::var("OCTL_TENANT").unwrap_or_else(|_| "common".to_string());

    let provider = Provider::microsoft_tenant(&tenant)?;
    println!("Provider: {} ({})", provider.name, provider.token_url);

    let flow = DeviceFlow::new(OAuthClient::new(&client_id, provider));
    let scopes: Vec<String> = ["openid", "profile", "User.Read", "offline_access"]
        .iter()
        .map(ToString::to_string)
        .collect();

    let (_, token) = flow
        .authorize(Some(&scopes), Duration::from_secs(300), |auth| {
            println!("\nOpen {} and enter the code {}", auth.verification_uri, auth.user_code);
            println!("Waiting for authentication...");
        })
        .await?;

    println!("\nSigned in.");
    println!("  Expires at:    {:?}", token.expires_at);
    println!("  Refreshable:   {}", token.refresh_token.is_some());

    if let Some(id_token) = token.id_token.as_deref() {
        let claims = IdTokenClaims::decode(id_token)?;
        println!("  Account:       {}", claims.username().unwrap_or("(unknown)"));
        if let Some(id) = claims.home_account_id() {
            println!("  Account ID:    {id}");
        }
    }

    Ok(())
}
