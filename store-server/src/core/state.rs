use std::sync::Arc;

use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::DbService;
use crate::images::{CloudinaryHost, DisabledHost, ImageHost};
use crate::orders::PlaceholderPasswordPolicy;
use crate::utils::AppResult;

/// Server state - shared by every request handler
///
/// Cloning is cheap: the pool and the image host are reference counted.
///
/// | Field | Meaning |
/// |-------|---------|
/// | config | Configuration (immutable) |
/// | pool | SQLite connection pool |
/// | image_host | Image upload backend |
/// | password_policy | Placeholder password for customers created by order intake |
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub pool: SqlitePool,
    pub image_host: Arc<dyn ImageHost>,
    pub password_policy: PlaceholderPasswordPolicy,
}

impl ServerState {
    /// Assemble state from already-built parts
    pub fn new(
        config: Config,
        pool: SqlitePool,
        image_host: Arc<dyn ImageHost>,
        password_policy: PlaceholderPasswordPolicy,
    ) -> Self {
        Self {
            config,
            pool,
            image_host,
            password_policy,
        }
    }

    /// Initialize server state
    ///
    /// 1. Open the database at `config.database_path` and apply migrations
    /// 2. Pick the image host (Cloudinary when credentials are configured)
    /// 3. Pick the placeholder password policy
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_path).await?;

        let image_host: Arc<dyn ImageHost> = match &config.cloudinary {
            Some(account) => {
                tracing::info!(cloud = %account.cloud_name, "Image uploads go to Cloudinary");
                Arc::new(CloudinaryHost::new(account.clone()))
            }
            None => {
                tracing::warn!("Cloudinary credentials not set, image uploads are disabled");
                Arc::new(DisabledHost)
            }
        };

        let password_policy = PlaceholderPasswordPolicy::from_config(config);

        Ok(Self::new(config.clone(), db.pool, image_host, password_policy))
    }

    /// Close the connection pool
    pub async fn close(&self) {
        DbService::from_pool(self.pool.clone()).close().await;
    }
}
