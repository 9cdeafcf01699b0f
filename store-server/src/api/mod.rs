//! API routes
//!
//! - [`health`] - health checks
//! - [`items`] - catalog management (multipart, image uploads)
//! - [`orders`] - order intake and management
//! - [`users`] - users and customers
//! - [`dashboard`] - aggregated report

pub mod dashboard;
pub mod health;
pub mod items;
pub mod orders;
pub mod users;

pub use crate::utils::{AppError, AppResult};

/// Body returned by every delete endpoint
#[derive(Debug, serde::Serialize)]
pub struct DeleteResponse {
    pub ok: bool,
}

impl DeleteResponse {
    pub fn ok() -> axum::Json<Self> {
        axum::Json(Self { ok: true })
    }
}
