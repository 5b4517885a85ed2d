//! # octl
//!
//! Command-line client for Outlook mail and calendar over Microsoft Graph.
//!
//! - [`cli`]: the `clap` command tree
//! - [`commands`]: handlers that call into `octl-core` and print results
//! - [`output`]: table, JSON and tab-separated rendering

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

pub mod cli;
pub mod commands;
pub mod output;
