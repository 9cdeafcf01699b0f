//! Cloudinary upload client
//!
//! Signed upload: digest over the alphabetically sorted parameters followed
//! by the API secret. SHA-1 is the account default; SHA-256 signatures also
//! send `signature_algorithm=sha256`.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use std::time::Duration;

use super::{ImageHost, ImageHostError};
use crate::core::{CloudinaryConfig, SignatureAlgorithm};

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(60);

/// Cloudinary image host
pub struct CloudinaryHost {
    account: CloudinaryConfig,
    client: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: ErrorMessage,
}

#[derive(Deserialize)]
struct ErrorMessage {
    message: String,
}

impl CloudinaryHost {
    pub fn new(account: CloudinaryConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .unwrap_or_default();
        Self {
            account,
            client,
            base_url: "https://api.cloudinary.com".to_string(),
        }
    }

    fn upload_url(&self) -> String {
        format!(
            "{}/v1_1/{}/image/upload",
            self.base_url, self.account.cloud_name
        )
    }
}

/// Hex digest of `folder=..&timestamp=..{secret}`
pub(crate) fn sign(
    folder: &str,
    timestamp: i64,
    api_secret: &str,
    algorithm: SignatureAlgorithm,
) -> String {
    let to_sign = format!("folder={folder}&timestamp={timestamp}{api_secret}");
    match algorithm {
        SignatureAlgorithm::Sha1 => hex::encode(Sha1::digest(to_sign.as_bytes())),
        SignatureAlgorithm::Sha256 => hex::encode(Sha256::digest(to_sign.as_bytes())),
    }
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload(
        &self,
        data: Vec<u8>,
        filename: &str,
        folder: &str,
    ) -> Result<String, ImageHostError> {
        let timestamp = chrono::Utc::now().timestamp();
        let algorithm = self.account.signature_algorithm;
        let signature = sign(folder, timestamp, &self.account.api_secret, algorithm);
        let size = data.len();

        let mut form = Form::new()
            .part("file", Part::bytes(data).file_name(filename.to_string()))
            .text("api_key", self.account.api_key.clone())
            .text("folder", folder.to_string())
            .text("timestamp", timestamp.to_string())
            .text("signature", signature);
        if algorithm != SignatureAlgorithm::Sha1 {
            form = form.text("signature_algorithm", algorithm.as_str());
        }

        let response = self
            .client
            .post(self.upload_url())
            .multipart(form)
            .send()
            .await
            .map_err(|e| ImageHostError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorBody>()
                .await
                .map(|b| b.error.message)
                .unwrap_or_else(|_| status.to_string());
            tracing::error!(status = status.as_u16(), %message, "Cloudinary rejected upload");
            return Err(ImageHostError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let body: UploadResponse = response
            .json()
            .await
            .map_err(|e| ImageHostError::Transport(e.to_string()))?;
        let url = body.secure_url.ok_or(ImageHostError::MissingUrl)?;

        tracing::info!(%filename, size, %url, "Image uploaded to Cloudinary");
        Ok(url)
    }
}
