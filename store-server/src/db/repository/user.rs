//! User Repository
//!
//! Passwords arrive here already hashed; see [`hash_password`].

use super::{RepoError, RepoResult};
use shared::models::{User, UserRole};
use shared::util::name_key;
use sqlx::SqlitePool;

const USER_SELECT: &str =
    "SELECT id, name, phone, email, role, hash_pass, created_at, updated_at FROM users";

/// Insert payload with the password already hashed
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub role: UserRole,
    pub hash_pass: String,
}

/// Update payload with the password already hashed
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub hash_pass: Option<String>,
}

/// Hash password using argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} ORDER BY created_at DESC, id DESC");
    let rows = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Case-insensitive exact name lookup; the oldest match wins
pub async fn find_by_name(pool: &SqlitePool, name: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE name_key = ? ORDER BY created_at ASC, id ASC LIMIT 1");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(name_key(name))
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn count(pool: &SqlitePool) -> RepoResult<i64> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(pool)
        .await?;
    Ok(total)
}

pub async fn create(pool: &SqlitePool, data: NewUser) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let name = data.name.trim();
    sqlx::query(
        "INSERT INTO users (id, name, name_key, phone, email, role, hash_pass, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8)",
    )
    .bind(id)
    .bind(name)
    .bind(name_key(name))
    .bind(&data.phone)
    .bind(&data.email)
    .bind(data.role)
    .bind(&data.hash_pass)
    .bind(now)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Insert `data` unless a user with the same name key exists
///
/// The conditional insert is the first statement of the transaction, so the
/// existence check runs under the write lock. Returns the oldest match and
/// whether this call created it.
pub async fn create_if_absent(pool: &SqlitePool, data: NewUser) -> RepoResult<(User, bool)> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let name = data.name.trim();
    let key = name_key(name);
    let mut tx = pool.begin().await?;

    let inserted = sqlx::query(
        "INSERT INTO users (id, name, name_key, phone, email, role, hash_pass, created_at, updated_at) SELECT ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?8 WHERE NOT EXISTS (SELECT 1 FROM users WHERE name_key = ?3)",
    )
    .bind(id)
    .bind(name)
    .bind(&key)
    .bind(&data.phone)
    .bind(&data.email)
    .bind(data.role)
    .bind(&data.hash_pass)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    let sql = format!("{USER_SELECT} WHERE name_key = ? ORDER BY created_at ASC, id ASC LIMIT 1");
    let user = sqlx::query_as::<_, User>(&sql)
        .bind(&key)
        .fetch_one(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok((user, inserted.rows_affected() == 1))
}

pub async fn update(pool: &SqlitePool, id: i64, data: UserChanges) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let name = data.name.as_deref().map(str::trim);
    let rows = sqlx::query(
        "UPDATE users SET name = COALESCE(?1, name), name_key = COALESCE(?2, name_key), phone = COALESCE(?3, phone), email = COALESCE(?4, email), role = COALESCE(?5, role), hash_pass = COALESCE(?6, hash_pass), updated_at = ?7 WHERE id = ?8",
    )
    .bind(name)
    .bind(name.map(name_key))
    .bind(&data.phone)
    .bind(&data.email)
    .bind(data.role)
    .bind(&data.hash_pass)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

/// Set the phone only when none is stored yet
///
/// Returns `None` when the user already had a phone (or does not exist).
pub async fn fill_missing_phone(
    pool: &SqlitePool,
    id: i64,
    phone: &str,
) -> RepoResult<Option<User>> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE users SET phone = ?1, updated_at = ?2 WHERE id = ?3 AND (phone IS NULL OR TRIM(phone) = '')",
    )
    .bind(phone)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Ok(None);
    }
    find_by_id(pool, id).await
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM users WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}
