use std::sync::Mutex;

use async_trait::async_trait;

use super::{ImageHost, ImageHostError};

/// In-memory image host for tests
///
/// Records every upload and returns `https://images.test/{folder}/{n}-{filename}`.
/// With `failing()` every upload is rejected.
#[derive(Debug, Default)]
pub struct MockImageHost {
    uploads: Mutex<Vec<(String, String, usize)>>,
    fail: bool,
}

impl MockImageHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// `(folder, filename, size)` of every accepted upload
    pub fn uploads(&self) -> Vec<(String, String, usize)> {
        self.uploads
            .lock()
            .map(|u| u.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl ImageHost for MockImageHost {
    async fn upload(
        &self,
        data: Vec<u8>,
        filename: &str,
        folder: &str,
    ) -> Result<String, ImageHostError> {
        if self.fail {
            return Err(ImageHostError::Rejected {
                status: 503,
                message: "mock host unavailable".into(),
            });
        }
        let mut uploads = self
            .uploads
            .lock()
            .map_err(|e| ImageHostError::Transport(e.to_string()))?;
        uploads.push((folder.to_string(), filename.to_string(), data.len()));
        Ok(format!(
            "https://images.test/{folder}/{}-{filename}",
            uploads.len()
        ))
    }
}
