//! # octl-oauth
//!
//! `OAuth2` device authorization for command-line clients of the Microsoft
//! identity platform.
//!
//! ## Features
//!
//! - **Device Flow** (RFC 8628): request a user code, poll until the user
//!   signs in from any browser
//! - **Token management**: expiry checking with a safety buffer, refresh
//!   grant that keeps the refresh token when the server omits it
//! - **Identity claims**: decode the `id_token` payload to learn who signed in
//!
//! ## Device Flow
//!
//! ```ignore
//! use std::time::Duration;
//! use octl_oauth::{DeviceFlow, OAuthClient, Provider};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = OAuthClient::new("your_client_id", Provider::microsoft()?);
//!     let flow = DeviceFlow::new(client);
//!
//!     let scopes = vec!["User.Read".to_string(), "offline_access".to_string()];
//!     let (_, token) = flow
//!         .authorize(Some(&scopes), Duration::from_secs(300), |auth| {
//!             println!("Visit {} and enter {}", auth.verification_uri, auth.user_code);
//!         })
//!         .await?;
//!
//!     println!("Authorized! Expires at {:?}", token.expires_at);
//!     Ok(())
//! }
//! ```
//!
//! ## Token Refresh
//!
//! ```ignore
//! if token.is_expired() {
//!     let token = client.refresh_token(&token, None).await?;
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod claims;
mod error;
pub mod flow;
pub mod provider;
pub mod token;

pub use claims::IdTokenClaims;
pub use error::{Error, Result};
pub use flow::{DeviceAuthorization, DeviceFlow, OAuthClient};
pub use provider::Provider;
pub use token::Token;
