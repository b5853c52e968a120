//! Contact sheet and screenshot generation.
//!
//! The sheet is produced by a dedicated grid tool when one is installed;
//! otherwise a single ffmpeg pass supplies evenly spaced frames and the grid
//! is composited locally. Individual screenshots are extracted one seek per
//! frame at timestamps interleaved with the sheet's sample points.

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{FontVec, PxScale};
use anyhow::{Context, Result};
use image::{imageops, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use tracing::{debug, error, info, warn};

use common::format::{format_duration, format_file_size_gb};
use common::frame_extractor;

pub const SHEET_ROWS: u32 = 5;
pub const SHEET_COLS: u32 = 3;
pub const THUMB_WIDTH: u32 = 267;
pub const THUMB_HEIGHT: u32 = 150;
pub const HEADER_HEIGHT: u32 = 80;

/// Number of individual screenshots per scene.
pub const SCREEN_COUNT: u32 = 10;

const GRID_TOOL: &str = "vcsi";
const SCREEN_SCALE: &str = "1920:-1";

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// How the contact sheet will be produced for this invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetBackend {
    /// Dedicated contact-sheet tool, one invocation.
    GridTool,
    /// One ffmpeg pass for the frames plus local compositing.
    FrameComposite,
}

pub fn select_backend() -> SheetBackend {
    if frame_extractor::grid_tool_available(GRID_TOOL) {
        SheetBackend::GridTool
    } else {
        debug!(tool = GRID_TOOL, "grid tool unavailable, compositing frames locally");
        SheetBackend::FrameComposite
    }
}

/// Sample rate for the one-pass fallback extraction. The denominator is
/// floored at one thumbnail per second so tiny clips still spread their
/// frames out.
pub fn grid_fps(duration_secs: f64) -> f64 {
    let total = (SHEET_ROWS * SHEET_COLS) as f64;
    total / duration_secs.max(total + 1.0)
}

/// Timestamps for individual screenshots: evenly spaced, then offset by half
/// an interval so they land between the sheet's sample points, clamped one
/// second short of the end.
pub fn screen_timestamps(duration_secs: f64, count: u32) -> Vec<f64> {
    let safe_duration = duration_secs.max(count as f64 + 1.0);
    let interval = safe_duration / (count as f64 + 1.0);
    let offset = interval * 0.5;

    (1..=count)
        .map(|i| {
            (interval * i as f64 + offset)
                .min(duration_secs - 1.0)
                .max(0.0)
        })
        .collect()
}

/// Generate the contact sheet for `video_path` into `output_path`.
///
/// Returns whether a sheet was written. A missing video fails immediately
/// with no partial output; tool failures are logged and reported as `false`.
pub fn generate_contact_sheet(
    video_path: &Path,
    output_path: &Path,
    title: &str,
    duration_secs: f64,
    dimensions: &str,
) -> bool {
    if !video_path.exists() {
        warn!(video = %video_path.display(), "video file does not exist");
        return false;
    }

    if select_backend() == SheetBackend::GridTool {
        let grid = format!("{}x{}", SHEET_COLS, SHEET_ROWS);
        match frame_extractor::run_grid_tool(GRID_TOOL, video_path, &grid, output_path) {
            Ok(()) => {
                info!(sheet = %output_path.display(), "contact sheet generated by grid tool");
                return true;
            }
            Err(e) => {
                warn!(error = %e, "grid tool failed, falling back to frame compositing");
            }
        }
    }

    match composite_sheet(video_path, output_path, title, duration_secs, dimensions) {
        Ok(()) => {
            info!(sheet = %output_path.display(), "contact sheet composited");
            true
        }
        Err(e) => {
            error!(video = %video_path.display(), error = %e, "contact sheet generation failed");
            false
        }
    }
}

fn composite_sheet(
    video_path: &Path,
    output_path: &Path,
    title: &str,
    duration_secs: f64,
    dimensions: &str,
) -> Result<()> {
    let total = SHEET_ROWS * SHEET_COLS;
    // Dropped when this function returns on any path; removal failures are
    // swallowed by the drop impl.
    let frame_dir = tempfile::tempdir().context("failed to create frame directory")?;

    let scale = format!(
        "{}:{}:force_original_aspect_ratio=decrease",
        THUMB_WIDTH, THUMB_HEIGHT
    );
    let frames = frame_extractor::extract_frame_sequence(
        video_path,
        grid_fps(duration_secs),
        &scale,
        total,
        frame_dir.path(),
    )?;

    if frames.is_empty() {
        anyhow::bail!("no frames produced for contact sheet");
    }

    let size_bytes = fs::metadata(video_path).map(|m| m.len()).unwrap_or(0);
    let sheet = compose_grid(&frames, title, duration_secs, dimensions, size_bytes);
    sheet
        .save(output_path)
        .context("failed to write contact sheet")?;

    Ok(())
}

/// Paste `frames` onto a black canvas below a white header band. Frames
/// smaller than their cell are centered; at most ROWS*COLS are used.
fn compose_grid(
    frames: &[PathBuf],
    title: &str,
    duration_secs: f64,
    dimensions: &str,
    size_bytes: u64,
) -> RgbImage {
    let width = THUMB_WIDTH * SHEET_COLS;
    let height = THUMB_HEIGHT * SHEET_ROWS + HEADER_HEIGHT;
    let mut canvas = RgbImage::from_pixel(width, height, Rgb([0, 0, 0]));

    draw_filled_rect_mut(
        &mut canvas,
        Rect::at(0, 0).of_size(width, HEADER_HEIGHT),
        Rgb([255, 255, 255]),
    );

    if let Some(font) = load_header_font() {
        let black = Rgb([0, 0, 0]);
        let display_title = if title.is_empty() { "Untitled" } else { title };
        draw_text_mut(
            &mut canvas,
            black,
            10,
            8,
            PxScale::from(22.0),
            &font,
            display_title,
        );
        draw_text_mut(
            &mut canvas,
            black,
            10,
            38,
            PxScale::from(15.0),
            &font,
            &format!(
                "Duration: {}   Size: {}",
                format_duration(duration_secs),
                format_file_size_gb(size_bytes)
            ),
        );
        draw_text_mut(
            &mut canvas,
            black,
            10,
            58,
            PxScale::from(15.0),
            &font,
            &format!("Dimensions: {}", dimensions),
        );
    } else {
        warn!("no usable header font found, leaving header text blank");
    }

    let total = (SHEET_ROWS * SHEET_COLS) as usize;
    for (index, frame_path) in frames.iter().take(total).enumerate() {
        let frame = match image::open(frame_path) {
            Ok(f) => f.to_rgb8(),
            Err(e) => {
                warn!(frame = %frame_path.display(), error = %e, "skipping unreadable frame");
                continue;
            }
        };

        let col = index as u32 % SHEET_COLS;
        let row = index as u32 / SHEET_COLS;
        let x = col * THUMB_WIDTH + THUMB_WIDTH.saturating_sub(frame.width()) / 2;
        let y = HEADER_HEIGHT
            + row * THUMB_HEIGHT
            + THUMB_HEIGHT.saturating_sub(frame.height()) / 2;
        imageops::overlay(&mut canvas, &frame, i64::from(x), i64::from(y));
    }

    canvas
}

fn load_header_font() -> Option<FontVec> {
    for candidate in FONT_CANDIDATES {
        if let Ok(bytes) = fs::read(candidate) {
            if let Ok(font) = FontVec::try_from_vec(bytes) {
                return Some(font);
            }
        }
    }
    None
}

/// Extract `count` full-resolution screenshots into `output_dir`.
///
/// Individual extraction failures are logged and skipped; the returned list
/// holds only the files actually produced.
pub fn generate_individual_screens(
    video_path: &Path,
    output_dir: &Path,
    duration_secs: f64,
    count: u32,
) -> Vec<PathBuf> {
    if !video_path.exists() {
        warn!(video = %video_path.display(), "video file does not exist");
        return Vec::new();
    }
    if let Err(e) = fs::create_dir_all(output_dir) {
        warn!(dir = %output_dir.display(), error = %e, "failed to create screens directory");
        return Vec::new();
    }

    let mut produced = Vec::new();
    for (index, timestamp) in screen_timestamps(duration_secs, count).into_iter().enumerate() {
        let output = output_dir.join(format!("screen_{:02}.jpg", index + 1));
        match frame_extractor::extract_frame(video_path, timestamp, SCREEN_SCALE, &output) {
            Ok(()) => produced.push(output),
            Err(e) => {
                warn!(screen = index + 1, error = %e, "screenshot extraction failed, skipping");
            }
        }
    }

    info!(
        video = %video_path.display(),
        produced = produced.len(),
        requested = count,
        "individual screens generated"
    );
    produced
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_timestamps_are_increasing_and_in_range() {
        let duration = 125.0;
        let timestamps = screen_timestamps(duration, SCREEN_COUNT);

        assert_eq!(timestamps.len(), SCREEN_COUNT as usize);
        for pair in timestamps.windows(2) {
            assert!(pair[0] < pair[1], "timestamps must be strictly increasing");
        }
        for ts in &timestamps {
            assert!(*ts > 0.0 && *ts < duration, "timestamp {ts} out of range");
        }
    }

    #[test]
    fn test_screen_timestamps_interleave_with_sheet_samples() {
        // With a half-interval offset, no screenshot may coincide with an
        // evenly spaced sample point.
        let duration = 1100.0;
        let count = 10;
        let interval = duration / (count as f64 + 1.0);
        for ts in screen_timestamps(duration, count) {
            let phase = (ts / interval).fract();
            assert!((phase - 0.5).abs() < 1e-9);
        }
    }

    #[test]
    fn test_screen_timestamps_clamp_short_of_end() {
        let timestamps = screen_timestamps(12.0, 10);
        for ts in &timestamps {
            assert!(*ts <= 11.0);
            assert!(*ts >= 0.0);
        }
    }

    #[test]
    fn test_grid_fps_spacing_floor() {
        // Tiny clips still get at least a second between samples.
        for duration in [0.0, 1.0, 5.0, 15.0] {
            let fps = grid_fps(duration);
            assert!(fps > 0.0);
            assert!(1.0 / fps >= 1.0);
        }
        // Normal clips spread samples across the whole runtime.
        let fps = grid_fps(125.0);
        assert!((fps - 15.0 / 125.0).abs() < 1e-9);
    }

    #[test]
    fn test_compose_grid_caps_frames_and_sizes_canvas() {
        let dir = tempfile::tempdir().expect("tempdir");

        // More frames than cells, each smaller than its cell.
        let mut frames = Vec::new();
        for i in 0..20 {
            let path = dir.path().join(format!("frame_{:02}.jpg", i + 1));
            let frame = RgbImage::from_pixel(100, 80, Rgb([40, 40, 200]));
            frame.save(&path).expect("save frame");
            frames.push(path);
        }

        let sheet = compose_grid(&frames, "Test", 125.0, "1920x1080", 1_000_000);
        assert_eq!(sheet.width(), THUMB_WIDTH * SHEET_COLS);
        assert_eq!(sheet.height(), THUMB_HEIGHT * SHEET_ROWS + HEADER_HEIGHT);

        // Header band stays white at its corners.
        assert_eq!(sheet.get_pixel(0, 0), &Rgb([255, 255, 255]));
        // A centered 100x80 frame leaves the cell's top-left corner black.
        assert_eq!(
            sheet.get_pixel(0, HEADER_HEIGHT),
            &Rgb([0, 0, 0]),
            "undersized frames must be centered on black"
        );
    }

    #[test]
    fn test_generate_contact_sheet_missing_video() {
        let dir = tempfile::tempdir().expect("tempdir");
        let ok = generate_contact_sheet(
            Path::new("/nonexistent/video.mp4"),
            &dir.path().join("sheet.jpg"),
            "Title",
            125.0,
            "1920x1080",
        );
        assert!(!ok);
        assert!(!dir.path().join("sheet.jpg").exists());
    }

    #[test]
    fn test_generate_individual_screens_missing_video() {
        let dir = tempfile::tempdir().expect("tempdir");
        let screens = generate_individual_screens(
            Path::new("/nonexistent/video.mp4"),
            dir.path(),
            125.0,
            SCREEN_COUNT,
        );
        assert!(screens.is_empty());
    }
}
