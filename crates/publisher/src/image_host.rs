//! Image host upload client.
//!
//! Uploads are multipart POSTs carrying a `source` part and an `X-API-Key`
//! header. The host answers with JSON; only a `status_code` of 200 with a
//! nested `image.url` counts as success. Every failure mode degrades to
//! `None` plus a log line, so callers can retry or carry on without the
//! artifact.

use anyhow::{Context, Result};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    status_code: u16,
    #[serde(default)]
    image: Option<UploadedImage>,
}

#[derive(Debug, Deserialize)]
struct UploadedImage {
    url: String,
}

#[derive(Debug, Clone)]
pub struct ImageHostClient {
    client: reqwest::Client,
    upload_url: String,
    api_key: String,
}

impl ImageHostClient {
    pub fn new(upload_url: &str, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(UPLOAD_TIMEOUT)
            .build()
            .context("failed to build upload client")?;

        Ok(Self {
            client,
            upload_url: upload_url.to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Upload a file from disk. Returns the hosted URL, or `None` on any
    /// failure.
    pub async fn upload_file(&self, path: &Path) -> Option<String> {
        let data = match tokio::fs::read(path).await {
            Ok(d) => d,
            Err(e) => {
                warn!(file = %path.display(), error = %e, "failed to read upload source");
                return None;
            }
        };
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "image.jpg".to_string());
        self.upload_bytes(data, &filename).await
    }

    /// Upload in-memory image bytes. Returns the hosted URL, or `None` on
    /// any failure.
    pub async fn upload_bytes(&self, data: Vec<u8>, filename: &str) -> Option<String> {
        match self.try_upload(data, filename).await {
            Ok(url) => {
                debug!(filename = filename, url = %url, "image uploaded");
                Some(url)
            }
            Err(e) => {
                warn!(filename = filename, error = %e, "image upload failed");
                None
            }
        }
    }

    async fn try_upload(&self, data: Vec<u8>, filename: &str) -> Result<String> {
        let part = Part::bytes(data)
            .file_name(filename.to_string())
            .mime_str("image/jpeg")
            .context("invalid upload mime type")?;
        let form = Form::new().part("source", part);

        let response = self
            .client
            .post(&self.upload_url)
            .header("X-API-Key", &self.api_key)
            .multipart(form)
            .send()
            .await
            .context("upload request failed")?;

        let body: UploadResponse = response
            .json()
            .await
            .context("upload response was not valid JSON")?;

        if body.status_code != 200 {
            anyhow::bail!("image host returned status_code {}", body.status_code);
        }

        body.image
            .map(|image| image.url)
            .context("upload response missing image url")
    }
}
