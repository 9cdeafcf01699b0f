//! User Model (admins and customers)

use serde::{Deserialize, Serialize};

/// User role
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
pub enum UserRole {
    Admin,
    #[default]
    Customer,
}

/// User entity
///
/// The password hash is loaded for verification but never serialized.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub role: UserRole,
    #[serde(skip_serializing, default)]
    pub hash_pass: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl User {
    /// Whether a phone number is on record
    pub fn has_phone(&self) -> bool {
        self.phone.as_deref().is_some_and(|p| !p.trim().is_empty())
    }
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub password: String,
}

/// Update user payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub role: Option<UserRole>,
    pub password: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_never_serialized() {
        let user = User {
            id: 1,
            name: "Ali".into(),
            phone: None,
            email: None,
            role: UserRole::Customer,
            hash_pass: "$argon2id$secret".into(),
            created_at: 0,
            updated_at: 0,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
        assert!(!json.contains("hashPass"));
        assert!(json.contains("\"role\":\"Customer\""));
    }

    #[test]
    fn blank_phone_counts_as_missing() {
        let mut user = User {
            id: 1,
            name: "Ali".into(),
            phone: Some("  ".into()),
            email: None,
            role: UserRole::Customer,
            hash_pass: String::new(),
            created_at: 0,
            updated_at: 0,
        };
        assert!(!user.has_phone());
        user.phone = Some("0300-1234567".into());
        assert!(user.has_phone());
    }

    #[test]
    fn create_payload_defaults_role_to_customer() {
        let data: UserCreate =
            serde_json::from_str(r#"{"name":"Sara","password":"secret1"}"#).unwrap();
        assert_eq!(data.role, UserRole::Customer);
    }
}
