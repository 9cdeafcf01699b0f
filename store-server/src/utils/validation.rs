//! Input validation helpers
//!
//! Centralized text length constants and validation functions used by the
//! CRUD handlers and the order intake workflow.

use std::collections::HashSet;

use shared::models::Variation;

use crate::orders::money::validate_amount;
use crate::utils::{AppError, ErrorCode};

// ── Text length limits ──────────────────────────────────────────────

/// Entity names: items, users, customers
pub const MAX_NAME_LEN: usize = 200;

/// Short identifiers: phone numbers, variation labels
pub const MAX_SHORT_TEXT_LEN: usize = 100;

/// Email addresses (RFC 5321)
pub const MAX_EMAIL_LEN: usize = 254;

/// Passwords (before hashing)
pub const MAX_PASSWORD_LEN: usize = 128;

/// Minimum password length for explicitly created users
pub const MIN_PASSWORD_LEN: usize = 6;

/// Variations per item
pub const MAX_VARIATIONS: usize = 50;

// ── Validation helpers ──────────────────────────────────────────────

/// Validate that a required string is non-empty and within the length limit.
pub fn validate_required_text(value: &str, field: &str, max_len: usize) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::with_message(
            ErrorCode::RequiredField,
            format!("{field} must not be empty"),
        ));
    }
    if value.len() > max_len {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            value.len()
        )));
    }
    Ok(())
}

/// Validate that an optional string, if present, is within the length limit.
pub fn validate_optional_text(
    value: &Option<String>,
    field: &str,
    max_len: usize,
) -> Result<(), AppError> {
    if let Some(v) = value
        && v.len() > max_len
    {
        return Err(AppError::validation(format!(
            "{field} is too long ({} chars, max {max_len})",
            v.len()
        )));
    }
    Ok(())
}

/// Validate a password before hashing
pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }
    if password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password is too long (max {MAX_PASSWORD_LEN})"
        )));
    }
    Ok(())
}

/// Validate an optional email address
pub fn validate_email(email: &Option<String>) -> Result<(), AppError> {
    validate_optional_text(email, "email", MAX_EMAIL_LEN)?;
    if let Some(e) = email
        && !e.trim().is_empty()
    {
        let valid = e
            .split_once('@')
            .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'));
        if !valid {
            return Err(AppError::with_message(
                ErrorCode::InvalidFormat,
                format!("Invalid email address: {e}"),
            ));
        }
    }
    Ok(())
}

/// Validate an item's variation list
///
/// Labels must be non-empty and unique within the item; money and stock
/// must be non-negative.
pub fn validate_variations(variations: &[Variation]) -> Result<(), AppError> {
    if variations.len() > MAX_VARIATIONS {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("Too many variations ({}, max {MAX_VARIATIONS})", variations.len()),
        ));
    }

    let mut seen = HashSet::new();
    for v in variations {
        validate_required_text(&v.label, "variation label", MAX_SHORT_TEXT_LEN)?;
        if !seen.insert(v.label.trim()) {
            return Err(AppError::with_message(
                ErrorCode::DuplicateVariationLabel,
                format!("Duplicate variation label: {}", v.label.trim()),
            )
            .with_detail("label", v.label.trim()));
        }
        validate_amount(v.base_cost, "baseCost")?;
        validate_amount(v.price, "price")?;
        if v.quantity < 0 {
            return Err(AppError::validation(format!(
                "stock quantity must be non-negative, got {}",
                v.quantity
            )));
        }
    }
    Ok(())
}
