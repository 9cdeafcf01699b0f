//! Data models
//!
//! Shared between store-server and its API clients.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod item;
pub mod order;
pub mod report;
pub mod user;

// Re-exports
pub use item::*;
pub use order::*;
pub use report::*;
pub use user::*;
