use thiserror::Error;

use crate::utils::AppError;

/// Errors that stop the server from starting or serving
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("Failed to initialize: {0}")]
    Init(#[from] AppError),

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: std::net::SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for server lifecycle operations
pub type Result<T> = std::result::Result<T, ServerError>;
