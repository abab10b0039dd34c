//! Voiceover probing through ffprobe.

use slidecut_core::{Result, SlideError};
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// Duration of a media file in seconds, as reported by ffprobe.
pub fn probe_duration(path: &Path) -> Result<f64> {
    if !path.is_file() {
        return Err(SlideError::NotFound(format!(
            "File not found: {}",
            path.display()
        )));
    }

    let ffprobe = ffmpeg_sidecar::ffprobe::ffprobe_path();
    let output = Command::new(&ffprobe)
        .args([
            "-v",
            "error",
            "-show_entries",
            "format=duration",
            "-of",
            "default=noprint_wrappers=1:nokey=1",
        ])
        .arg(path)
        .output()
        .map_err(|e| {
            SlideError::Media(format!(
                "Failed to run {} for {}: {}",
                ffprobe.display(),
                path.display(),
                e
            ))
        })?;

    if !output.status.success() {
        return Err(SlideError::Media(format!(
            "ffprobe failed for {}: {}",
            path.display(),
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    let duration = parse_duration(&String::from_utf8_lossy(&output.stdout))?;
    debug!(file = %path.display(), duration, "probed duration");
    Ok(duration)
}

/// Parse ffprobe's bare `format=duration` output.
pub fn parse_duration(stdout: &str) -> Result<f64> {
    let text = stdout.trim();
    let duration: f64 = text
        .parse()
        .map_err(|_| SlideError::Media(format!("Unparseable duration '{}'", text)))?;
    if !duration.is_finite() || duration <= 0.0 {
        return Err(SlideError::Media(format!("Media has no duration ({})", text)));
    }
    Ok(duration)
}
