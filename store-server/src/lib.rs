//! Snack Store Server - back office for a small ice-cream and samosa shop
//!
//! Catalog items with per-variation pricing and stock, customers, and
//! orders that snapshot what was sold. Customers are resolved by name or
//! provisioned during order intake.
//!
//! ```text
//! store-server/src/
//! ├── core/      # config, state, server, middleware
//! ├── api/       # HTTP routes and handlers
//! ├── db/        # SQLite pool and repositories
//! ├── orders/    # intake workflow, totals, stats, dashboard
//! ├── images/    # image host (Cloudinary)
//! └── utils/     # errors, logging, time, validation
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod images;
pub mod orders;
pub mod utils;

pub use crate::core::{Config, Server, ServerState, build_router};
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::init_logger_with_file;

/// Load `.env`, read the configuration and start logging
///
/// Production logs are written as JSON.
pub fn setup_environment() -> Config {
    // A missing .env file is fine
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.is_production()),
        config.log_dir.as_deref(),
    );
    config
}

pub fn print_banner() {
    println!(
        r#"
   _____                  __
  / ___/____  ____ ______/ /__
  \__ \/ __ \/ __ `/ ___/ //_/
 ___/ / / / / /_/ / /__/ ,<
/____/_/ /_/\__,_/\___/_/|_|
    "#
    );
}
