//! Media library GraphQL client.
//!
//! Fetches scene metadata and downloads library-hosted images. Metadata
//! lookups are fatal on failure; image downloads degrade to `None` so a
//! missing logo never sinks a pipeline run.

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

use common::scene::{ImageAsset, SceneRecord};

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

const FIND_SCENE_QUERY: &str = r#"
query FindScene($id: ID!) {
  findScene(id: $id) {
    title
    details
    date
    studio {
      name
      image_path
    }
    performers {
      name
      image_path
    }
    tags {
      name
    }
    paths {
      screenshot
    }
    files {
      path
      duration
      width
      height
      frame_rate
      bit_rate
      video_codec
      audio_codec
    }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct GraphqlResponse {
    #[serde(default)]
    data: Option<FindSceneData>,
    #[serde(default)]
    errors: Vec<GraphqlError>,
}

#[derive(Debug, Deserialize)]
struct FindSceneData {
    #[serde(rename = "findScene")]
    find_scene: Option<SceneRecord>,
}

#[derive(Debug, Deserialize)]
struct GraphqlError {
    message: String,
}

#[derive(Debug, Clone)]
pub struct LibraryClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl LibraryClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("failed to build library client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Look up one scene by its numeric identifier.
    ///
    /// GraphQL-level errors surface as `Err` carrying the first message;
    /// an unknown identifier is `Ok(None)`.
    pub async fn find_scene(&self, scene_id: &str) -> Result<Option<SceneRecord>> {
        let payload = json!({
            "query": FIND_SCENE_QUERY,
            "variables": { "id": scene_id },
        });

        debug!(scene = scene_id, "requesting scene metadata");

        let response = self
            .client
            .post(format!("{}/graphql", self.base_url))
            .header("ApiKey", &self.api_key)
            .json(&payload)
            .send()
            .await
            .context("metadata request failed")?;

        let body: GraphqlResponse = response
            .json()
            .await
            .context("metadata response was not valid JSON")?;

        if let Some(first) = body.errors.first() {
            return Err(anyhow!("metadata lookup failed: {}", first.message));
        }

        let Some(mut scene) = body.data.and_then(|d| d.find_scene) else {
            return Ok(None);
        };
        scene.scene_id = Some(scene_id.to_string());

        info!(
            scene = scene_id,
            title = scene.title.as_deref().unwrap_or("<untitled>"),
            files = scene.files.len(),
            "scene metadata loaded"
        );

        Ok(Some(scene))
    }

    /// Absolute URLs pass through; library-relative paths are joined onto
    /// the base URL.
    pub fn image_url(&self, image_path: &str) -> String {
        if image_path.starts_with("http://") || image_path.starts_with("https://") {
            image_path.to_string()
        } else if image_path.starts_with('/') {
            format!("{}{}", self.base_url, image_path)
        } else {
            format!("{}/{}", self.base_url, image_path)
        }
    }

    /// Download an image with the library API key attached. Returns `None`
    /// (and logs) unless the response carries an image content type.
    pub async fn download_image(&self, url: &str) -> Option<Vec<u8>> {
        let response = match self
            .client
            .get(url)
            .header("ApiKey", &self.api_key)
            .send()
            .await
        {
            Ok(r) => r,
            Err(e) => {
                warn!(url = url, error = %e, "image download failed");
                return None;
            }
        };

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !content_type.contains("image") {
            warn!(url = url, content_type = %content_type, "response is not an image");
            return None;
        }

        match response.bytes().await {
            Ok(bytes) => {
                debug!(url = url, size_bytes = bytes.len(), "image downloaded");
                Some(bytes.to_vec())
            }
            Err(e) => {
                warn!(url = url, error = %e, "failed to read image body");
                None
            }
        }
    }

    /// Prefetch the studio logo and performer images referenced by a scene.
    /// Failed downloads degrade to assets without data.
    pub async fn fetch_scene_assets(
        &self,
        scene: &SceneRecord,
    ) -> (Option<ImageAsset>, Vec<ImageAsset>) {
        let studio = match scene.studio.as_ref().and_then(|s| s.image_path.as_deref()) {
            Some(path) => {
                let url = self.image_url(path);
                let data = self.download_image(&url).await;
                Some(ImageAsset::new("studio", Some(url), data))
            }
            None => {
                debug!("scene has no studio image");
                None
            }
        };

        let mut performers = Vec::new();
        for performer in &scene.performers {
            let Some(path) = performer.image_path.as_deref() else {
                debug!(performer = %performer.name, "performer has no image");
                continue;
            };
            let url = self.image_url(path);
            let data = self.download_image(&url).await;
            performers.push(ImageAsset::new(performer.name.clone(), Some(url), data));
        }

        (studio, performers)
    }
}
