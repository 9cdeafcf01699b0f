//! Shared types for the snack store back office
//!
//! Data models exchanged over the HTTP API, the unified error system and
//! small id/time utilities. The server crate enables the `db` feature so
//! row types also derive `sqlx::FromRow`.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
