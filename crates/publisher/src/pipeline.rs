//! The generate-and-upload pipeline.
//!
//! One strictly sequential pass per scene: resolve the video path, extract
//! artifacts into a scoped temp dir, upload everything, record the hosted
//! URLs on the scene, render BBCode. Only a missing video or an empty file
//! list aborts the run; every external failure after that degrades the one
//! artifact it concerns.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use common::path_map::PathMappings;
use common::scene::{ImageAsset, SceneRecord};

use crate::bbcode;
use crate::contact_sheet::{self, SCREEN_COUNT};
use crate::image_host::ImageHostClient;
use crate::library_client::LibraryClient;
use crate::poster;

/// Run the full artifact pipeline for one scene and return the rendered
/// BBCode lines.
///
/// The scene record is enriched in place as uploads complete; a partially
/// enriched record after a degraded run is an acceptable outcome.
#[allow(clippy::too_many_arguments)]
pub async fn generate_and_upload(
    scene: &mut SceneRecord,
    mut studio_image: Option<&mut ImageAsset>,
    performer_images: &mut [ImageAsset],
    title_override: &str,
    library: &LibraryClient,
    uploader: &ImageHostClient,
    mappings: &PathMappings,
) -> Result<Vec<String>> {
    let video_file = scene
        .primary_file()
        .cloned()
        .context("scene has no video file entry")?;

    let local_path = mappings.resolve(&video_file.path);
    let video_path = Path::new(&local_path);
    if !video_path.exists() {
        anyhow::bail!("video file not found: {}", local_path);
    }

    // Scoped to this invocation; removed on drop on every exit path.
    let work_dir = tempfile::tempdir().context("failed to create working directory")?;
    let sheet_path = work_dir.path().join("contactsheet.jpg");
    let screens_dir = work_dir.path().join("screens");

    let title = if title_override.is_empty() {
        scene.title.clone().unwrap_or_default()
    } else {
        title_override.to_string()
    };

    info!(video = %video_path.display(), "generating contact sheet");
    let sheet_ok = contact_sheet::generate_contact_sheet(
        video_path,
        &sheet_path,
        &title,
        video_file.duration,
        &video_file.dimensions(),
    );

    info!(video = %video_path.display(), "generating individual screens");
    let screen_files = contact_sheet::generate_individual_screens(
        video_path,
        &screens_dir,
        video_file.duration,
        SCREEN_COUNT,
    );

    if let Some(studio) = studio_image.as_deref_mut() {
        if let Some(data) = studio.data.clone() {
            studio.url = uploader.upload_bytes(data, "studio.jpg").await;
            info!(url = ?studio.url, "studio image upload finished");
        }
    }

    for performer in performer_images.iter_mut() {
        let Some(data) = performer.data.clone() else {
            continue;
        };
        performer.url = uploader
            .upload_bytes(data, &format!("{}.jpg", performer.name))
            .await;
        info!(performer = %performer.name, url = ?performer.url, "performer image upload finished");
    }

    scene.poster_url = resolve_poster(scene, library, uploader).await;
    if scene.poster_url.is_none() {
        warn!("no poster uploaded");
    }

    scene.contact_sheet_url = if sheet_ok {
        uploader.upload_file(&sheet_path).await
    } else {
        None
    };

    let mut screenshot_urls = Vec::new();
    for file in &screen_files {
        if let Some(url) = uploader.upload_file(file).await {
            screenshot_urls.push(url);
        }
    }
    scene.screenshot_urls = screenshot_urls;

    info!(
        poster = scene.poster_url.is_some(),
        contact_sheet = scene.contact_sheet_url.is_some(),
        screens = scene.screenshot_urls.len(),
        "scene record urls updated"
    );

    Ok(bbcode::render(
        scene,
        studio_image.as_deref(),
        performer_images,
        title_override,
    ))
}

/// Locate, download, and re-host the poster image. Any failure along the
/// chain skips the poster; it never aborts the pipeline.
async fn resolve_poster(
    scene: &SceneRecord,
    library: &LibraryClient,
    uploader: &ImageHostClient,
) -> Option<String> {
    let Some((source, url)) = poster::locate(scene, library.base_url()) else {
        warn!("no poster source in scene record, skipping poster upload");
        return None;
    };

    info!(source = ?source, url = %url, "downloading poster");
    let data = library.download_image(&url).await?;
    uploader.upload_bytes(data, "poster.jpg").await
}
