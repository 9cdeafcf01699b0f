//! Customer resolve-or-provision
//!
//! Order intake names customers by name. This step finds the existing
//! record (case-insensitive exact match), backfills a missing phone, or
//! creates a new `Customer` user whose password follows the configured
//! [`PlaceholderPasswordPolicy`].

use rand::Rng;
use rand::distributions::Alphanumeric;
use shared::models::{User, UserRole};
use sqlx::SqlitePool;

use crate::core::Config;
use crate::db::repository::user::{self, NewUser};
use crate::utils::{AppError, AppResult};

/// Length of generated placeholder secrets
const RANDOM_SECRET_LEN: usize = 32;

/// Password given to customers created implicitly by order intake
///
/// Whatever the policy, the value is argon2-hashed before it is stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlaceholderPasswordPolicy {
    /// Fresh random secret per customer (nobody knows it)
    #[default]
    Random,
    /// Same known password for every auto-created customer
    Fixed(String),
}

impl PlaceholderPasswordPolicy {
    /// `Fixed` when `CUSTOMER_DEFAULT_PASSWORD` is configured, `Random` otherwise
    pub fn from_config(config: &Config) -> Self {
        match &config.customer_default_password {
            Some(password) => Self::Fixed(password.clone()),
            None => Self::Random,
        }
    }

    /// Plain-text placeholder to hash
    pub fn placeholder(&self) -> String {
        match self {
            Self::Random => rand::thread_rng()
                .sample_iter(&Alphanumeric)
                .take(RANDOM_SECRET_LEN)
                .map(char::from)
                .collect(),
            Self::Fixed(password) => password.clone(),
        }
    }
}

/// Outcome of resolving a customer by name
#[derive(Debug, Clone)]
pub enum CustomerResolution {
    /// Matched, nothing changed
    Existing(User),
    /// Matched and the missing phone was filled in
    PhoneBackfilled(User),
    /// No match, a new customer was created
    Provisioned(User),
}

impl CustomerResolution {
    pub fn user(&self) -> &User {
        match self {
            Self::Existing(u) | Self::PhoneBackfilled(u) | Self::Provisioned(u) => u,
        }
    }

    pub fn into_user(self) -> User {
        match self {
            Self::Existing(u) | Self::PhoneBackfilled(u) | Self::Provisioned(u) => u,
        }
    }

    pub fn is_provisioned(&self) -> bool {
        matches!(self, Self::Provisioned(_))
    }
}

/// Find the customer by name or create one
///
/// A stored phone is never overwritten; only an empty one is filled.
pub async fn resolve_or_provision(
    pool: &SqlitePool,
    name: &str,
    phone: Option<&str>,
    policy: &PlaceholderPasswordPolicy,
) -> AppResult<CustomerResolution> {
    let name = name.trim();
    if name.is_empty() {
        return Err(AppError::validation("Customer name is required"));
    }
    let phone = phone.map(str::trim).filter(|p| !p.is_empty());

    if let Some(existing) = user::find_by_name(pool, name).await? {
        return backfill_phone(pool, existing, phone).await;
    }

    let hash_pass = user::hash_password(&policy.placeholder())
        .map_err(|e| AppError::internal(format!("Failed to hash password: {e}")))?;

    // Another request may have created the customer since the lookup
    let (customer, created) = user::create_if_absent(
        pool,
        NewUser {
            name: name.to_string(),
            phone: phone.map(str::to_string),
            email: None,
            role: UserRole::Customer,
            hash_pass,
        },
    )
    .await?;

    if created {
        tracing::info!(user_id = customer.id, name = %customer.name, "Customer provisioned");
        return Ok(CustomerResolution::Provisioned(customer));
    }
    backfill_phone(pool, customer, phone).await
}

async fn backfill_phone(
    pool: &SqlitePool,
    existing: User,
    phone: Option<&str>,
) -> AppResult<CustomerResolution> {
    if let Some(phone) = phone
        && !existing.has_phone()
        && let Some(updated) = user::fill_missing_phone(pool, existing.id, phone).await?
    {
        tracing::info!(user_id = updated.id, "Customer phone backfilled");
        return Ok(CustomerResolution::PhoneBackfilled(updated));
    }
    Ok(CustomerResolution::Existing(existing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::DbService;
    use argon2::{Argon2, PasswordHash, PasswordVerifier};

    async fn stored_hash(pool: &SqlitePool, id: i64) -> String {
        sqlx::query_scalar("SELECT hash_pass FROM users WHERE id = ?")
            .bind(id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn unseen_name_is_provisioned_once() {
        let db = DbService::in_memory().await.unwrap();
        let policy = PlaceholderPasswordPolicy::Random;

        let first = resolve_or_provision(&db.pool, "Ayesha", Some("0321-5555555"), &policy)
            .await
            .unwrap();
        assert!(first.is_provisioned());
        assert_eq!(first.user().role, UserRole::Customer);
        assert_eq!(first.user().phone.as_deref(), Some("0321-5555555"));

        let second = resolve_or_provision(&db.pool, "ayesha", None, &policy)
            .await
            .unwrap();
        assert!(matches!(second, CustomerResolution::Existing(_)));
        assert_eq!(second.user().id, first.user().id);
        assert_eq!(user::count(&db.pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn missing_phone_is_backfilled_but_never_overwritten() {
        let db = DbService::in_memory().await.unwrap();
        let policy = PlaceholderPasswordPolicy::Random;

        let created = resolve_or_provision(&db.pool, "Hamza", None, &policy)
            .await
            .unwrap()
            .into_user();
        assert!(created.phone.is_none());

        let filled = resolve_or_provision(&db.pool, "HAMZA", Some("0333-1234567"), &policy)
            .await
            .unwrap();
        assert!(matches!(filled, CustomerResolution::PhoneBackfilled(_)));
        assert_eq!(filled.user().phone.as_deref(), Some("0333-1234567"));

        let kept = resolve_or_provision(&db.pool, "Hamza", Some("0300-0000000"), &policy)
            .await
            .unwrap();
        assert!(matches!(kept, CustomerResolution::Existing(_)));
        assert_eq!(kept.user().phone.as_deref(), Some("0333-1234567"));
    }

    #[tokio::test]
    async fn concurrent_intakes_share_one_new_customer() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("customers.db");
        let db = DbService::new(path.to_str().unwrap()).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let pool = db.pool.clone();
            handles.push(tokio::spawn(async move {
                let policy = PlaceholderPasswordPolicy::Random;
                resolve_or_provision(&pool, "Nadia", None, &policy)
                    .await
                    .unwrap()
            }));
        }

        let mut resolutions = Vec::new();
        for handle in handles {
            resolutions.push(handle.await.unwrap());
        }

        assert_eq!(user::count(&db.pool).await.unwrap(), 1);
        let id = resolutions[0].user().id;
        assert!(resolutions.iter().all(|r| r.user().id == id));
        assert_eq!(resolutions.iter().filter(|r| r.is_provisioned()).count(), 1);
    }

    #[tokio::test]
    async fn fixed_policy_is_hashed_at_rest() {
        let db = DbService::in_memory().await.unwrap();
        let policy = PlaceholderPasswordPolicy::Fixed("welcome123".into());

        let user = resolve_or_provision(&db.pool, "Zara", None, &policy)
            .await
            .unwrap()
            .into_user();

        let hash = stored_hash(&db.pool, user.id).await;
        assert_ne!(hash, "welcome123");
        let parsed = PasswordHash::new(&hash).unwrap();
        assert!(
            Argon2::default()
                .verify_password(b"welcome123", &parsed)
                .is_ok()
        );
    }

    #[tokio::test]
    async fn blank_name_is_rejected() {
        let db = DbService::in_memory().await.unwrap();
        let err = resolve_or_provision(&db.pool, "   ", None, &PlaceholderPasswordPolicy::Random)
            .await
            .unwrap_err();
        assert_eq!(err.code, shared::ErrorCode::ValidationFailed);
        assert_eq!(user::count(&db.pool).await.unwrap(), 0);
    }

    #[test]
    fn random_placeholders_differ() {
        let policy = PlaceholderPasswordPolicy::Random;
        let a = policy.placeholder();
        let b = policy.placeholder();
        assert_eq!(a.len(), RANDOM_SECRET_LEN);
        assert_ne!(a, b);
    }
}
