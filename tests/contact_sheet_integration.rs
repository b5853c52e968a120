//! Integration tests for contact sheet and screenshot generation
//!
//! Tests that need a real video and ffmpeg are `#[ignore]`d by default,
//! following the same convention as the unit suites: run them with
//! `cargo test -- --ignored` on a machine with ffmpeg installed.

use publisher::contact_sheet::{
    generate_contact_sheet, generate_individual_screens, screen_timestamps, SCREEN_COUNT,
};
use std::path::Path;
use std::process::Command;

#[test]
fn test_missing_video_produces_nothing() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let sheet = dir.path().join("sheet.jpg");

    assert!(!generate_contact_sheet(
        Path::new("/nonexistent/video.mp4"),
        &sheet,
        "Title",
        125.0,
        "1920x1080",
    ));
    assert!(!sheet.exists());

    let screens = generate_individual_screens(
        Path::new("/nonexistent/video.mp4"),
        dir.path(),
        125.0,
        SCREEN_COUNT,
    );
    assert!(screens.is_empty());
}

#[test]
fn test_screen_timestamps_stay_inside_the_video() {
    for duration in [30.0, 125.0, 3661.0] {
        let timestamps = screen_timestamps(duration, SCREEN_COUNT);
        assert_eq!(timestamps.len(), SCREEN_COUNT as usize);
        for pair in timestamps.windows(2) {
            assert!(pair[0] < pair[1]);
        }
        for ts in timestamps {
            assert!(ts > 0.0 && ts < duration);
        }
    }
}

/// Generates a real test video with ffmpeg, then produces the sheet and the
/// screenshots from it. Requires ffmpeg on PATH.
#[test]
#[ignore]
fn test_artifact_generation_with_real_video() {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let video = dir.path().join("test-video.mp4");

    // 30-second test pattern
    let output = Command::new("ffmpeg")
        .args([
            "-f",
            "lavfi",
            "-i",
            "testsrc=duration=30:size=640x480:rate=30",
            "-c:v",
            "libx264",
            "-preset",
            "ultrafast",
            "-y",
            video.to_str().expect("utf-8 path"),
        ])
        .output()
        .expect("failed to run ffmpeg");
    assert!(output.status.success(), "ffmpeg failed to generate test video");

    let sheet = dir.path().join("contactsheet.jpg");
    assert!(generate_contact_sheet(&video, &sheet, "Test Video", 30.0, "640x480"));
    assert!(sheet.exists());

    // Whichever backend produced it, the sheet must decode as an image.
    let decoded = image::open(&sheet).expect("sheet must be a readable image");
    assert!(decoded.width() > 0 && decoded.height() > 0);

    let screens_dir = dir.path().join("screens");
    let screens = generate_individual_screens(&video, &screens_dir, 30.0, SCREEN_COUNT);
    assert_eq!(screens.len(), SCREEN_COUNT as usize);
    for screen in &screens {
        assert!(screen.exists());
        let decoded = image::open(screen).expect("screen must be a readable image");
        assert_eq!(decoded.width(), 1920, "screens are scaled to 1920 wide");
    }
}
