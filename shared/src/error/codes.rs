//! Unified error codes for the store back office
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: User errors
//! - 4xxx: Order errors
//! - 6xxx: Catalog errors (65xx: image upload)
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility with the admin frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format (malformed JSON, bad enum value, bad date)
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: User ====================
    /// User not found
    UserNotFound = 1001,
    /// Password shorter than the minimum length
    PasswordTooShort = 1002,

    // ==================== 4xxx: Order ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has no lines
    OrderEmpty = 4002,
    /// Order number already taken
    OrderNoConflict = 4003,

    // ==================== 6xxx: Catalog ====================
    /// Item not found
    ItemNotFound = 6001,
    /// Variation label not found on item
    VariationNotFound = 6002,
    /// Two variations of one item share a label
    DuplicateVariationLabel = 6003,

    // ==================== 65xx: Image Upload ====================
    /// File too large
    FileTooLarge = 6501,
    /// Unsupported file format
    UnsupportedFileFormat = 6502,
    /// Empty file provided
    EmptyFile = 6505,
    /// No filename provided
    NoFilename = 6506,
    /// Image host rejected or failed the upload
    ImageUploadFailed = 6510,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // User
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::PasswordTooShort => "Password must be at least 6 characters",

            // Order
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderEmpty => "Order must contain at least one item",
            ErrorCode::OrderNoConflict => "Order number already taken",

            // Catalog
            ErrorCode::ItemNotFound => "Item not found",
            ErrorCode::VariationNotFound => "Variation not found",
            ErrorCode::DuplicateVariationLabel => "Variation labels must be unique within an item",

            // Image upload
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::UnsupportedFileFormat => "Unsupported file format",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::NoFilename => "No filename provided",
            ErrorCode::ImageUploadFailed => "Image upload failed",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // User
            1001 => Ok(ErrorCode::UserNotFound),
            1002 => Ok(ErrorCode::PasswordTooShort),

            // Order
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderEmpty),
            4003 => Ok(ErrorCode::OrderNoConflict),

            // Catalog
            6001 => Ok(ErrorCode::ItemNotFound),
            6002 => Ok(ErrorCode::VariationNotFound),
            6003 => Ok(ErrorCode::DuplicateVariationLabel),
            6501 => Ok(ErrorCode::FileTooLarge),
            6502 => Ok(ErrorCode::UnsupportedFileFormat),
            6505 => Ok(ErrorCode::EmptyFile),
            6506 => Ok(ErrorCode::NoFilename),
            6510 => Ok(ErrorCode::ImageUploadFailed),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{:04}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: &[ErrorCode] = &[
        ErrorCode::Success,
        ErrorCode::Unknown,
        ErrorCode::ValidationFailed,
        ErrorCode::NotFound,
        ErrorCode::AlreadyExists,
        ErrorCode::InvalidRequest,
        ErrorCode::InvalidFormat,
        ErrorCode::RequiredField,
        ErrorCode::ValueOutOfRange,
        ErrorCode::UserNotFound,
        ErrorCode::PasswordTooShort,
        ErrorCode::OrderNotFound,
        ErrorCode::OrderEmpty,
        ErrorCode::OrderNoConflict,
        ErrorCode::ItemNotFound,
        ErrorCode::VariationNotFound,
        ErrorCode::DuplicateVariationLabel,
        ErrorCode::FileTooLarge,
        ErrorCode::UnsupportedFileFormat,
        ErrorCode::EmptyFile,
        ErrorCode::NoFilename,
        ErrorCode::ImageUploadFailed,
        ErrorCode::InternalError,
        ErrorCode::DatabaseError,
        ErrorCode::ConfigError,
    ];

    #[test]
    fn every_code_converts_back_from_u16() {
        for code in ALL {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(*code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(4242), Err(InvalidErrorCode(4242)));
    }

    #[test]
    fn test_display_format() {
        assert_eq!(ErrorCode::ItemNotFound.to_string(), "E6001");
        assert_eq!(ErrorCode::NotFound.to_string(), "E0003");
    }

    #[test]
    fn test_serde_as_number() {
        let json = serde_json::to_string(&ErrorCode::VariationNotFound).unwrap();
        assert_eq!(json, "6002");
        let code: ErrorCode = serde_json::from_str("4001").unwrap();
        assert_eq!(code, ErrorCode::OrderNotFound);
        assert!(serde_json::from_str::<ErrorCode>("12345").is_err());
    }
}
