// ABOUTME: Library root for central-publish - exposes the client, state machine and config.
// ABOUTME: The main binary is in main.rs.

pub mod client;
pub mod config;
pub mod deploy;
pub mod error;
pub mod output;
pub mod types;
