use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Environment-driven configuration for one publisher run.
#[derive(Debug, Clone)]
pub struct PublisherConfig {
    /// Base URL of the media library server.
    pub library_url: String,
    /// API key attached to library requests (may be empty for open servers).
    pub library_api_key: String,
    /// Image host upload endpoint.
    pub image_host_url: String,
    /// Image host API key.
    pub image_host_api_key: String,
    /// JSON file holding the path-mapping table.
    pub path_mappings_file: PathBuf,
}

impl PublisherConfig {
    pub fn from_env() -> Result<Self> {
        let library_url = env::var("LIBRARY_URL").context("LIBRARY_URL must be set")?;
        let library_api_key = env::var("LIBRARY_API_KEY").unwrap_or_default();

        let image_host_url =
            env::var("IMAGE_HOST_URL").context("IMAGE_HOST_URL must be set")?;
        let image_host_api_key =
            env::var("IMAGE_HOST_API_KEY").context("IMAGE_HOST_API_KEY must be set")?;

        let path_mappings_file = env::var("PATH_MAPPINGS_FILE")
            .unwrap_or_else(|_| "path_mappings.json".to_string())
            .into();

        Ok(Self {
            library_url,
            library_api_key,
            image_host_url,
            image_host_api_key,
            path_mappings_file,
        })
    }
}
