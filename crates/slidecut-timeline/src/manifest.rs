//! Manifest of created slideshows, with versioning and migration.
//!
//! Uses JSON with a schema version field. The batch exporter reads it to
//! know which sequences exist.

use serde::{Deserialize, Serialize};
use slidecut_core::{FrameRate, Result, SlideError};
use std::path::{Path, PathBuf};

use crate::assemble::SlideshowReport;

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// One created slideshow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestEntry {
    /// Sequence name, unique within a manifest.
    pub sequence_name: String,
    /// Folder the images came from.
    pub folder: PathBuf,
    /// Voiceover file.
    pub voice: PathBuf,
    pub image_count: usize,
    pub voice_duration_seconds: f64,
    pub frame_rate: FrameRate,
    /// Frames per image as placed.
    pub frames: Vec<i64>,
    /// Creation timestamp (unix seconds).
    pub created_at: u64,
}

impl ManifestEntry {
    /// Entry for a finished run.
    pub fn from_report(
        report: &SlideshowReport,
        folder: impl Into<PathBuf>,
        voice: impl Into<PathBuf>,
        voice_duration_seconds: f64,
        created_at: u64,
    ) -> Self {
        Self {
            sequence_name: report.name.clone(),
            folder: folder.into(),
            voice: voice.into(),
            image_count: report.plan.len(),
            voice_duration_seconds,
            frame_rate: report.frame_rate,
            frames: report.plan.frames.clone(),
            created_at,
        }
    }
}

/// Versioned manifest file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Manifest {
    /// Schema version for migration.
    pub version: u32,
    /// Created slideshows, oldest first.
    pub entries: Vec<ManifestEntry>,
    /// Application version that wrote this file.
    pub app_version: String,
}

impl Default for Manifest {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            entries: Vec::new(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Manifest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location: `<data dir>/slidecut/manifest.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("slidecut").join("manifest.json"))
    }

    /// Record a slideshow, replacing any earlier entry with the same name.
    pub fn record(&mut self, entry: ManifestEntry) {
        self.entries
            .retain(|e| e.sequence_name != entry.sequence_name);
        self.entries.push(entry);
    }

    pub fn find(&self, sequence_name: &str) -> Option<&ManifestEntry> {
        self.entries.iter().find(|e| e.sequence_name == sequence_name)
    }

    /// Serialize to JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| SlideError::Serialization(format!("Failed to serialize manifest: {}", e)))
    }

    /// Deserialize from JSON bytes, applying migrations if needed.
    pub fn from_json(data: &[u8]) -> Result<Self> {
        let raw: serde_json::Value = serde_json::from_slice(data)
            .map_err(|e| SlideError::Serialization(format!("Invalid JSON: {}", e)))?;

        let version = raw.get("version").and_then(|v| v.as_u64()).unwrap_or(0) as u32;

        if version > CURRENT_VERSION {
            return Err(SlideError::Serialization(format!(
                "Manifest version {} is newer than supported version {}",
                version, CURRENT_VERSION
            )));
        }

        let migrated = migrate(raw, version)?;

        serde_json::from_value(migrated)
            .map_err(|e| SlideError::Serialization(format!("Failed to parse manifest: {}", e)))
    }

    /// Save manifest to a file path, creating parent directories.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load manifest from a file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }

    /// Load from `path`, or an empty manifest if the file does not exist yet.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}

/// Apply sequential migrations from `from_version` to CURRENT_VERSION.
fn migrate(mut data: serde_json::Value, from_version: u32) -> Result<serde_json::Value> {
    let mut version = from_version;

    while version < CURRENT_VERSION {
        match version {
            0 => {
                // v0 -> v1: a bare array of entries becomes the wrapped form
                if data.is_array() {
                    data = serde_json::json!({
                        "version": 1,
                        "entries": data,
                        "app_version": "0.0.0",
                    });
                } else {
                    return Err(SlideError::Serialization(
                        "Unversioned manifest is not an entry list".to_string(),
                    ));
                }
                version = 1;
            }
            _ => {
                return Err(SlideError::Serialization(format!(
                    "No migration path from version {}",
                    version
                )));
            }
        }
    }

    Ok(data)
}
