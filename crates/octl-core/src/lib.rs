//! # octl-core
//!
//! Core logic for `octl`, a terminal client for Outlook mail and calendar.
//!
//! This crate provides:
//! - Configuration persistence (client ID, tenant, credential store)
//! - Sign-in lifecycle: device-code login, silent token reuse, status, logout
//! - Secure token storage (system keyring, or a private file)
//! - A thin Microsoft Graph HTTP client
//! - Mail operations: list, read, search, send, drafts, folders, move
//! - Calendar operations: calendar view, show, create, respond, delete

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod auth;
pub mod calendar;
pub mod config;
mod error;
pub mod graph;
pub mod html;
pub mod mail;
pub(crate) mod util;

pub use auth::credentials::{
    CredentialError, CredentialResult, CredentialStore, FileStore, KeyringStore,
};
pub use auth::{AuthManager, AuthRecord, AuthStatus, SCOPES};
pub use calendar::{CreateEventOptions, Event, Response};
pub use config::{Config, ConfigStore, CredentialStoreKind, resolve_client_id};
pub use error::{Error, Result};
pub use graph::GraphClient;
pub use mail::{BodyType, Folder, ListOptions, Message, SendOptions};
pub use util::truncate;
