//! Batch export queue for created slideshows.
//!
//! Jobs are built from the manifest and handed one at a time to an
//! [`ExportTarget`] (a media encoder queue in practice). Supports presets,
//! progress reporting, and cancellation between jobs.

use serde::{Deserialize, Serialize};
use slidecut_core::{FrameRate, RationalTime, Result};
use slidecut_timeline::{Manifest, ManifestEntry};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{info, warn};

// ── Presets ─────────────────────────────────────────────────────

/// Video codec.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VideoCodec {
    H264,
    H265,
    ProRes422,
}

impl VideoCodec {
    /// File extension for this codec.
    pub fn extension(self) -> &'static str {
        match self {
            Self::H264 | Self::H265 => "mp4",
            Self::ProRes422 => "mov",
        }
    }
}

/// Export preset handed to the encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportPreset {
    /// Preset name as the encoder knows it.
    pub name: String,
    pub video_codec: VideoCodec,
    pub width: u32,
    pub height: u32,
}

impl ExportPreset {
    /// H.264 1080p preset.
    pub fn h264_hd() -> Self {
        Self {
            name: "Match Source - H.264 1080p".to_string(),
            video_codec: VideoCodec::H264,
            width: 1920,
            height: 1080,
        }
    }

    /// H.265 4K preset.
    pub fn h265_4k() -> Self {
        Self {
            name: "H.265 4K".to_string(),
            video_codec: VideoCodec::H265,
            width: 3840,
            height: 2160,
        }
    }

    /// ProRes 422 for mastering.
    pub fn prores_422() -> Self {
        Self {
            name: "Apple ProRes 422".to_string(),
            video_codec: VideoCodec::ProRes422,
            width: 1920,
            height: 1080,
        }
    }

    /// Look up a built-in preset by short name (`h264`, `h265`, `prores`).
    pub fn by_short_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "h264" => Some(Self::h264_hd()),
            "h265" | "hevc" => Some(Self::h265_4k()),
            "prores" => Some(Self::prores_422()),
            _ => None,
        }
    }
}

// ── Export job ───────────────────────────────────────────────────

/// One sequence to export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportJob {
    pub sequence_name: String,
    /// Output file path.
    pub output_path: PathBuf,
    pub preset: ExportPreset,
    pub frame_rate: FrameRate,
    /// Frames in the sequence.
    pub total_frames: i64,
}

impl ExportJob {
    /// Job for a manifest entry, writing into `output_dir`.
    pub fn for_entry(entry: &ManifestEntry, output_dir: &Path, preset: &ExportPreset) -> Self {
        let file_name = format!(
            "{}.{}",
            sanitize_file_stem(&entry.sequence_name),
            preset.video_codec.extension()
        );
        Self {
            sequence_name: entry.sequence_name.clone(),
            output_path: output_dir.join(file_name),
            preset: preset.clone(),
            frame_rate: entry.frame_rate,
            total_frames: entry.frames.iter().sum(),
        }
    }

    /// Length of the exported video.
    pub fn duration(&self) -> RationalTime {
        RationalTime::from_frames(self.total_frames, self.frame_rate)
    }
}

/// Replace characters that are not safe in file names on common platforms.
pub fn sanitize_file_stem(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = cleaned.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        "untitled".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Receives export jobs, e.g. a media encoder's render queue.
pub trait ExportTarget {
    fn submit(&mut self, job: &ExportJob) -> Result<()>;
}

/// Export progress information.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportProgress {
    /// Jobs handled so far.
    pub completed: usize,
    /// Jobs in the queue.
    pub total: usize,
}

impl ExportProgress {
    /// Completion percentage (0.0 to 1.0).
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.completed as f64 / self.total as f64
    }
}

/// Result of dispatching a queue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub submitted: Vec<String>,
    /// Sequence name and error message per failed job.
    pub failed: Vec<(String, String)>,
    pub cancelled: bool,
}

/// Ordered export jobs, at most one per sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportQueue {
    pub jobs: Vec<ExportJob>,
}

impl ExportQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue every manifest entry, or only those named in `only` when it is non-empty.
    pub fn from_manifest(
        manifest: &Manifest,
        output_dir: &Path,
        preset: &ExportPreset,
        only: &[String],
    ) -> Self {
        let mut queue = Self::new();
        for entry in &manifest.entries {
            if only.is_empty() || only.contains(&entry.sequence_name) {
                queue.push(ExportJob::for_entry(entry, output_dir, preset));
            }
        }
        queue
    }

    /// Add a job unless the sequence is already queued. Returns whether it was added.
    ///
    /// Output paths that collide with an earlier job get a numeric suffix.
    pub fn push(&mut self, mut job: ExportJob) -> bool {
        if self.jobs.iter().any(|j| j.sequence_name == job.sequence_name) {
            return false;
        }
        let taken: HashSet<&Path> = self.jobs.iter().map(|j| j.output_path.as_path()).collect();
        if taken.contains(job.output_path.as_path()) {
            let stem = job
                .output_path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let ext = job.preset.video_codec.extension();
            let dir = job.output_path.parent().map(Path::to_path_buf).unwrap_or_default();
            let mut n = 2;
            loop {
                let candidate = dir.join(format!("{} ({}).{}", stem, n, ext));
                if !taken.contains(candidate.as_path()) {
                    job.output_path = candidate;
                    break;
                }
                n += 1;
            }
        }
        self.jobs.push(job);
        true
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Submit every job to `target`. A failed job is recorded and the rest
    /// still run; cancellation stops before the next job.
    pub fn dispatch<T: ExportTarget + ?Sized>(
        &self,
        target: &mut T,
        on_progress: impl Fn(ExportProgress),
        cancel: &ExportCancel,
    ) -> ExportSummary {
        let mut summary = ExportSummary::default();
        let total = self.jobs.len();

        for (i, job) in self.jobs.iter().enumerate() {
            if cancel.is_cancelled() {
                summary.cancelled = true;
                break;
            }
            match target.submit(job) {
                Ok(()) => {
                    info!(sequence = %job.sequence_name, output = %job.output_path.display(), "queued export");
                    summary.submitted.push(job.sequence_name.clone());
                }
                Err(e) => {
                    warn!(sequence = %job.sequence_name, error = %e, "export failed");
                    summary.failed.push((job.sequence_name.clone(), e.to_string()));
                }
            }
            on_progress(ExportProgress {
                completed: i + 1,
                total,
            });
        }

        summary
    }
}

/// Handle for cancelling an in-progress batch.
#[derive(Debug, Clone)]
pub struct ExportCancel(Arc<AtomicBool>);

impl ExportCancel {
    /// Create a new cancel handle.
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(false)))
    }

    /// Signal cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check if cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for ExportCancel {
    fn default() -> Self {
        Self::new()
    }
}
