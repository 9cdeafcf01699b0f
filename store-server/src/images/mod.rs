//! Image hosting
//!
//! Item images are stored by a third-party host; only the returned URL is
//! kept on the item. [`ImageHost`] is the seam:
//!
//! - [`CloudinaryHost`] - signed uploads to Cloudinary
//! - [`DisabledHost`] - no credentials configured, every upload fails
//! - [`MockImageHost`] - in-memory host for tests

mod cloudinary;
mod mock;

pub use cloudinary::CloudinaryHost;
pub use mock::MockImageHost;

use async_trait::async_trait;
use thiserror::Error;

use crate::utils::{AppError, AppResult, ErrorCode};

/// Maximum file size (5MB)
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
pub const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Folder that item images are uploaded to
pub const ITEM_FOLDER: &str = "items";

/// Image host errors
#[derive(Debug, Error)]
pub enum ImageHostError {
    #[error("Image uploads are disabled (no image host configured)")]
    Disabled,

    #[error("Image host request failed: {0}")]
    Transport(String),

    #[error("Image host rejected the upload ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Image host response has no URL")]
    MissingUrl,
}

impl From<ImageHostError> for AppError {
    fn from(err: ImageHostError) -> Self {
        AppError::with_message(ErrorCode::ImageUploadFailed, err.to_string())
    }
}

/// Remote image storage
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload one file and return its durable URL
    async fn upload(
        &self,
        data: Vec<u8>,
        filename: &str,
        folder: &str,
    ) -> Result<String, ImageHostError>;
}

/// Host used when no credentials are configured
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledHost;

#[async_trait]
impl ImageHost for DisabledHost {
    async fn upload(
        &self,
        _data: Vec<u8>,
        _filename: &str,
        _folder: &str,
    ) -> Result<String, ImageHostError> {
        Err(ImageHostError::Disabled)
    }
}

/// Validate an uploaded image before sending it to the host
///
/// Returns the lower-cased file extension.
pub fn validate_image(data: &[u8], filename: Option<&str>) -> AppResult<String> {
    if data.is_empty() {
        return Err(AppError::new(ErrorCode::EmptyFile));
    }

    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::with_message(
            ErrorCode::FileTooLarge,
            format!(
                "File too large. Maximum size is {} bytes ({}MB)",
                MAX_FILE_SIZE,
                MAX_FILE_SIZE / 1024 / 1024
            ),
        ));
    }

    let filename = filename
        .filter(|f| !f.trim().is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::NoFilename))?;

    let ext = std::path::Path::new(filename)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::with_message(
            ErrorCode::UnsupportedFileFormat,
            format!(
                "Unsupported file format '{}'. Supported: {}",
                ext,
                SUPPORTED_FORMATS.join(", ")
            ),
        ));
    }

    Ok(ext)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_supported_images() {
        assert_eq!(validate_image(b"png", Some("photo.PNG")).unwrap(), "png");
        assert_eq!(validate_image(b"jpg", Some("a.b.jpeg")).unwrap(), "jpeg");
    }

    #[test]
    fn rejects_bad_uploads() {
        assert_eq!(
            validate_image(b"", Some("a.png")).unwrap_err().code,
            ErrorCode::EmptyFile
        );
        assert_eq!(
            validate_image(b"x", None).unwrap_err().code,
            ErrorCode::NoFilename
        );
        assert_eq!(
            validate_image(b"x", Some("notes.txt")).unwrap_err().code,
            ErrorCode::UnsupportedFileFormat
        );

        let big = vec![0u8; MAX_FILE_SIZE + 1];
        assert_eq!(
            validate_image(&big, Some("a.png")).unwrap_err().code,
            ErrorCode::FileTooLarge
        );
    }

    #[tokio::test]
    async fn disabled_host_fails_as_upstream_error() {
        let err = DisabledHost
            .upload(b"x".to_vec(), "a.png", ITEM_FOLDER)
            .await
            .unwrap_err();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::ImageUploadFailed);
        assert_eq!(app.http_status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }
}
