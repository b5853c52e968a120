//! Poster image source resolution.
//!
//! Library versions have reported the cover screenshot under several
//! different keys. The lookup tries each known location in a fixed priority
//! order and finally derives a URL from the scene identifier.

use common::scene::SceneRecord;
use tracing::debug;

/// Where a poster URL was found on the scene record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterSource {
    ScenePaths,
    Screenshot,
    ImagePath,
    CoverImage,
    SceneId,
}

type Accessor = fn(&SceneRecord) -> Option<String>;

/// Find the highest-priority poster source present on `scene`.
pub fn locate(scene: &SceneRecord, library_base_url: &str) -> Option<(PosterSource, String)> {
    let accessors: [(PosterSource, Accessor); 4] = [
        (PosterSource::ScenePaths, |s| {
            s.paths.as_ref().and_then(|p| p.screenshot.clone())
        }),
        (PosterSource::Screenshot, |s| s.screenshot.clone()),
        (PosterSource::ImagePath, |s| s.image_path.clone()),
        (PosterSource::CoverImage, |s| s.cover_image.clone()),
    ];

    for (source, accessor) in accessors {
        if let Some(url) = accessor(scene).filter(|u| !u.is_empty()) {
            debug!(source = ?source, "poster source selected");
            return Some((source, url));
        }
    }

    scene
        .scene_id
        .as_ref()
        .filter(|id| !id.is_empty())
        .map(|id| {
            let url = format!("{}/scene/{}/screenshot", library_base_url, id);
            debug!(source = ?PosterSource::SceneId, "poster source selected");
            (PosterSource::SceneId, url)
        })
}
