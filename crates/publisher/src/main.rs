use anyhow::{Context, Result};
use std::env;
use tracing::info;

use common::path_map::PathMappings;
use publisher::config::PublisherConfig;
use publisher::image_host::ImageHostClient;
use publisher::library_client::LibraryClient;
use publisher::pipeline;

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_with_service("scenepost");

    let scene_id = env::args()
        .nth(1)
        .context("usage: publisher <scene-id>")?;
    if scene_id.is_empty() || !scene_id.chars().all(|c| c.is_ascii_digit()) {
        anyhow::bail!("scene id must be numeric: {}", scene_id);
    }

    let config = PublisherConfig::from_env()?;
    let library = LibraryClient::new(&config.library_url, &config.library_api_key)?;
    let uploader = ImageHostClient::new(&config.image_host_url, &config.image_host_api_key)?;

    let mut scene = library
        .find_scene(&scene_id)
        .await?
        .with_context(|| format!("scene {} not found", scene_id))?;

    let (mut studio_image, mut performer_images) = library.fetch_scene_assets(&scene).await;
    info!(
        studio = studio_image.is_some(),
        performers = performer_images.len(),
        "scene assets prefetched"
    );

    let mappings = PathMappings::load(&config.path_mappings_file);

    let lines = pipeline::generate_and_upload(
        &mut scene,
        studio_image.as_mut(),
        &mut performer_images,
        "",
        &library,
        &uploader,
        &mappings,
    )
    .await?;

    for line in &lines {
        println!("{line}");
    }
    info!(lines = lines.len(), "bbcode generated");

    Ok(())
}
