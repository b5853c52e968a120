//! Subprocess wrappers around the external frame-extraction tools.
//!
//! Two tools are involved: a dedicated contact-sheet generator that lays out
//! a whole grid in one invocation, and ffmpeg, which extracts single frames
//! (seeking before decode) or an evenly spaced frame sequence in one pass.
//! Success means exit code 0 and the expected output file(s) on disk.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::{debug, error, warn};

/// Extract a single frame at `timestamp_secs` into `output`.
///
/// The seek happens before the input is opened, so ffmpeg jumps to the
/// nearest keyframe instead of decoding from the start.
pub fn extract_frame(
    video_path: &Path,
    timestamp_secs: f64,
    scale: &str,
    output: &Path,
) -> Result<()> {
    let args = [
        "-y".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-ss".to_string(),
        format!("{:.3}", timestamp_secs),
        "-i".to_string(),
        video_path.to_string_lossy().to_string(),
        "-frames:v".to_string(),
        "1".to_string(),
        "-vf".to_string(),
        format!("scale={}", scale),
        output.to_string_lossy().to_string(),
    ];

    debug!(video = %video_path.display(), timestamp = timestamp_secs, "extracting frame");

    let result = Command::new("ffmpeg")
        .args(&args)
        .stdout(Stdio::null())
        .output()
        .context("failed to execute ffmpeg")?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        anyhow::bail!("ffmpeg exited with {}: {}", result.status, stderr.trim());
    }
    if !output.exists() {
        anyhow::bail!("ffmpeg reported success but produced no frame");
    }

    Ok(())
}

/// Emit up to `max_frames` scaled frames in one pass, sampled at `fps`
/// frames per second, into `output_dir`. Returns the files actually
/// produced, in frame order.
pub fn extract_frame_sequence(
    video_path: &Path,
    fps: f64,
    scale: &str,
    max_frames: u32,
    output_dir: &Path,
) -> Result<Vec<PathBuf>> {
    let pattern = output_dir.join("frame_%02d.jpg");
    let args = [
        "-y".to_string(),
        "-loglevel".to_string(),
        "error".to_string(),
        "-i".to_string(),
        video_path.to_string_lossy().to_string(),
        "-vf".to_string(),
        format!("fps={:.6},scale={}", fps, scale),
        "-frames:v".to_string(),
        max_frames.to_string(),
        pattern.to_string_lossy().to_string(),
    ];

    debug!(
        video = %video_path.display(),
        fps = fps,
        max_frames = max_frames,
        "extracting frame sequence"
    );

    let result = Command::new("ffmpeg")
        .args(&args)
        .stdout(Stdio::null())
        .output()
        .context("failed to execute ffmpeg")?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        error!(
            video = %video_path.display(),
            status = %result.status,
            stderr = %stderr.trim(),
            "frame sequence extraction failed"
        );
        anyhow::bail!("ffmpeg exited with {}", result.status);
    }

    // ffmpeg numbers sequence output from 1.
    let frames: Vec<PathBuf> = (1..=max_frames)
        .map(|i| output_dir.join(format!("frame_{:02}.jpg", i)))
        .take_while(|p| p.exists())
        .collect();

    if frames.is_empty() {
        warn!(video = %video_path.display(), "ffmpeg produced no frames");
    }

    Ok(frames)
}

/// Check whether the dedicated contact-sheet tool is on PATH.
pub fn grid_tool_available(tool: &str) -> bool {
    match Command::new(tool)
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
    {
        Ok(status) => status.success(),
        Err(e) => {
            debug!(tool = tool, error = %e, "grid tool not available");
            false
        }
    }
}

/// Run the dedicated contact-sheet tool with a `COLSxROWS` grid argument.
pub fn run_grid_tool(tool: &str, video_path: &Path, grid: &str, output: &Path) -> Result<()> {
    debug!(tool = tool, video = %video_path.display(), grid = grid, "running grid tool");

    let result = Command::new(tool)
        .arg(video_path)
        .arg("-g")
        .arg(grid)
        .arg("-o")
        .arg(output)
        .stdout(Stdio::null())
        .output()
        .with_context(|| format!("failed to execute {}", tool))?;

    if !result.status.success() {
        let stderr = String::from_utf8_lossy(&result.stderr);
        anyhow::bail!("{} exited with {}: {}", tool, result.status, stderr.trim());
    }
    if !output.exists() {
        anyhow::bail!("{} reported success but produced no sheet", tool);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_extract_frame_missing_video() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = extract_frame(
            &PathBuf::from("/nonexistent/video.mp4"),
            5.0,
            "1920:-1",
            &dir.path().join("out.jpg"),
        );
        // ffmpeg missing and ffmpeg failing on a missing input both land here.
        assert!(result.is_err());
    }

    #[test]
    fn test_grid_tool_available_for_missing_tool() {
        assert!(!grid_tool_available("definitely-not-a-real-tool-name"));
    }

    #[test]
    fn test_run_grid_tool_missing_tool() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = run_grid_tool(
            "definitely-not-a-real-tool-name",
            &PathBuf::from("/nonexistent/video.mp4"),
            "3x5",
            &dir.path().join("sheet.jpg"),
        );
        assert!(result.is_err());
    }
}
