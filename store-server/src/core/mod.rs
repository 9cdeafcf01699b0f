//! Core module - server configuration, state and startup errors
//!
//! - [`Config`] - server configuration
//! - [`ServerState`] - shared request state
//! - [`Server`] - HTTP server
//! - [`ServerError`] - startup and serve errors

pub mod config;
pub mod error;
pub mod middleware;
pub mod server;
pub mod state;

pub use config::{CloudinaryConfig, Config, SignatureAlgorithm};
pub use error::{Result, ServerError};
pub use server::{Server, build_router};
pub use state::ServerState;
