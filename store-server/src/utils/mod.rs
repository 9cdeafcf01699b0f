//! Utilities - error re-exports, logging, validation, time and extractors

pub mod extractor;
pub mod logger;
pub mod time;
pub mod validation;

// Unified error types live in the shared crate
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use extractor::AppJson;
