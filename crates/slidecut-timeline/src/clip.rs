//! Clip types shared by the placer, the gap fixer and timeline hosts.

use serde::{Deserialize, Serialize};
use slidecut_core::{RationalTime, TimeRange};
use std::fmt;
use std::path::PathBuf;
use uuid::Uuid;

/// One of the two video tracks images alternate across.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrackParity {
    /// Even image indices.
    A,
    /// Odd image indices.
    B,
}

impl TrackParity {
    /// Track for the image at `index`.
    #[inline]
    pub fn from_index(index: usize) -> Self {
        if index % 2 == 0 {
            Self::A
        } else {
            Self::B
        }
    }

    /// Zero-based video track index.
    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::A => 0,
            Self::B => 1,
        }
    }
}

impl fmt::Display for TrackParity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "V{}", self.index() + 1)
    }
}

/// Stable identifier of a clip inside a host timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClipId(pub Uuid);

impl ClipId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reference to an imported media file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    /// Path to the media file
    pub path: PathBuf,
    /// Display name (file name by default)
    pub name: String,
}

impl MediaItem {
    /// Create a media item named after its file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        Self { path, name }
    }
}

/// Observed boundaries of a clip already on a host timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipBounds {
    pub clip: ClipId,
    pub track: TrackParity,
    pub start_ticks: i64,
    pub end_ticks: i64,
}

/// A single caption cue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionCue {
    /// When the cue is shown.
    pub range: TimeRange,
    /// Cue text, lines joined with `\n`.
    pub text: String,
}

impl CaptionCue {
    pub fn new(start: RationalTime, end: RationalTime, text: impl Into<String>) -> Self {
        Self {
            range: TimeRange::from_start_end(start, end),
            text: text.into(),
        }
    }

    pub fn start(&self) -> RationalTime {
        self.range.start
    }

    pub fn end(&self) -> RationalTime {
        self.range.end()
    }
}
