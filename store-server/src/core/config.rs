/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Working directory (database, logs) |
/// | HTTP_PORT | 3000 | HTTP listen port |
/// | DATABASE_PATH | {WORK_DIR}/database/store.db | SQLite file |
/// | ENVIRONMENT | development | Runtime environment |
/// | REQUEST_TIMEOUT_MS | 30000 | Per-request timeout |
/// | LOG_LEVEL | info | Default log level |
/// | LOG_DIR | (unset) | Daily rolling log files when set |
/// | CLOUDINARY_CLOUD_NAME | (unset) | Image host account |
/// | CLOUDINARY_API_KEY | (unset) | Image host key |
/// | CLOUDINARY_API_SECRET | (unset) | Image host secret |
/// | CLOUDINARY_SIGNATURE_ALGORITHM | sha1 | Upload signature digest (sha1, sha256) |
/// | CUSTOMER_DEFAULT_PASSWORD | (unset) | Fixed password for auto-created customers |
///
/// # Example
///
/// ```ignore
/// WORK_DIR=/srv/store HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Working directory for the database and log files
    pub work_dir: String,
    /// HTTP API port
    pub http_port: u16,
    /// SQLite database file
    pub database_path: String,
    /// development | staging | production
    pub environment: String,
    /// Request timeout (milliseconds)
    pub request_timeout_ms: u64,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// Image host credentials, `None` disables uploads
    pub cloudinary: Option<CloudinaryConfig>,
    /// Fixed placeholder password for customers created by order intake
    pub customer_default_password: Option<String>,
}

/// Image host account
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub signature_algorithm: SignatureAlgorithm,
}

/// Digest used to sign uploads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    /// Cloudinary's account default
    #[default]
    Sha1,
    Sha256,
}

impl SignatureAlgorithm {
    /// Parse `sha1` / `sha256` (case-insensitive); anything else is `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "sha1" | "sha-1" => Some(Self::Sha1),
            "sha256" | "sha-256" => Some(Self::Sha256),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        }
    }
}

fn env_nonempty(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to defaults.
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let database_path = env_nonempty("DATABASE_PATH")
            .unwrap_or_else(|| format!("{work_dir}/database/store.db"));

        let cloudinary = match (
            env_nonempty("CLOUDINARY_CLOUD_NAME"),
            env_nonempty("CLOUDINARY_API_KEY"),
            env_nonempty("CLOUDINARY_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(CloudinaryConfig {
                cloud_name,
                api_key,
                api_secret,
                signature_algorithm: env_nonempty("CLOUDINARY_SIGNATURE_ALGORITHM")
                    .and_then(|v| SignatureAlgorithm::parse(&v))
                    .unwrap_or_default(),
            }),
            _ => None,
        };

        Self {
            work_dir,
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            database_path,
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: env_nonempty("LOG_DIR"),
            cloudinary,
            customer_default_password: env_nonempty("CUSTOMER_DEFAULT_PASSWORD"),
        }
    }

    /// Override the working directory, port and database file
    ///
    /// Mostly used by tests.
    pub fn with_overrides(
        work_dir: impl Into<String>,
        http_port: u16,
        database_path: impl Into<String>,
    ) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config.database_path = database_path.into();
        config
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
