//! Core module - configuration, shared state, server lifecycle
//!
//! # Contents
//!
//! - [`Config`] - environment driven configuration
//! - [`ServerState`] - handles shared by every request
//! - [`Server`] - HTTP + Socket.IO listener
//! - [`ServerError`] - startup / lifecycle errors

pub mod config;
pub mod error;
pub mod server;
pub mod state;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
