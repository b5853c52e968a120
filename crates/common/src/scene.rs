//! Data model for one media-library scene and its attached images.
//!
//! The shapes mirror the GraphQL payload returned by the library's
//! `findScene` query. Every field is defaulted so partial payloads from
//! older library versions still deserialize.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Studio {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Performer {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub image_path: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Tag {
    #[serde(default)]
    pub name: String,
}

/// Technical metadata for one container file backing a scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct VideoFile {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub width: u32,
    #[serde(default)]
    pub height: u32,
    #[serde(default)]
    pub frame_rate: f64,
    #[serde(default)]
    pub bit_rate: u64,
    #[serde(default)]
    pub video_codec: Option<String>,
    #[serde(default)]
    pub audio_codec: Option<String>,
}

impl VideoFile {
    /// `WIDTHxHEIGHT` string for tool arguments and the sheet header.
    pub fn dimensions(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// Server-reported asset locations for a scene.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ScenePaths {
    #[serde(default)]
    pub screenshot: Option<String>,
}

/// One scene's metadata, fetched wholesale by the lookup and enriched in
/// place by the pipeline as uploads complete.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SceneRecord {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub studio: Option<Studio>,
    #[serde(default)]
    pub performers: Vec<Performer>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub files: Vec<VideoFile>,

    // Poster source candidates; older library versions used different keys.
    #[serde(default)]
    pub paths: Option<ScenePaths>,
    #[serde(default)]
    pub screenshot: Option<String>,
    #[serde(default)]
    pub image_path: Option<String>,
    #[serde(default)]
    pub cover_image: Option<String>,

    // Populated by the pipeline, not the lookup.
    #[serde(default)]
    pub scene_id: Option<String>,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub contact_sheet_url: Option<String>,
    #[serde(default)]
    pub screenshot_urls: Vec<String>,
}

impl SceneRecord {
    /// Only `files[0]` is ever consulted for artifact generation.
    pub fn primary_file(&self) -> Option<&VideoFile> {
        self.files.first()
    }
}

/// A studio, performer, or cover image held for the duration of one
/// generate-and-upload call. Freshly downloaded images carry `data`;
/// `url` is rewritten to the hosted location when an upload succeeds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageAsset {
    pub name: String,
    pub url: Option<String>,
    pub data: Option<Vec<u8>>,
}

impl ImageAsset {
    pub fn new(name: impl Into<String>, url: Option<String>, data: Option<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            url,
            data,
        }
    }
}
