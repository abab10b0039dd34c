//! Assembly settings.
//!
//! Stored as JSON next to the manifest. Missing fields fall back to the
//! panel defaults.

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use slidecut_core::defaults::{FALLBACK_FRAME_RATE, MAX_VARIATION_SECONDS};
use slidecut_core::{FrameRate, Result, SlideError, TickClock};
use std::path::{Path, PathBuf};

/// Settings for one or more assembly runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlideshowConfig {
    /// Maximum random deviation per image, in seconds.
    pub max_variation_seconds: f64,
    /// Used only when the sequence frame rate cannot be read.
    pub fallback_frame_rate: FrameRate,
    /// Host tick resolution.
    pub ticks_per_second: i64,
    /// Fixed seed for reproducible plans; fresh entropy when unset.
    pub seed: Option<u64>,
    /// Image file extensions picked up by the folder scan (lowercase, no dot).
    pub image_extensions: Vec<String>,
    /// Import a caption file when one is supplied.
    pub import_captions: bool,
}

impl Default for SlideshowConfig {
    fn default() -> Self {
        Self {
            max_variation_seconds: MAX_VARIATION_SECONDS,
            fallback_frame_rate: FALLBACK_FRAME_RATE,
            ticks_per_second: TickClock::HOST_TICKS_PER_SECOND,
            seed: None,
            image_extensions: ["jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "psd"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            import_captions: true,
        }
    }
}

impl SlideshowConfig {
    /// Default location: `<config dir>/slidecut/config.json`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("slidecut").join("config.json"))
    }

    pub fn validate(&self) -> Result<()> {
        if !self.max_variation_seconds.is_finite() || self.max_variation_seconds < 0.0 {
            return Err(SlideError::InvalidParameter(format!(
                "max_variation_seconds must be zero or positive, got {}",
                self.max_variation_seconds
            )));
        }
        if !self.fallback_frame_rate.is_valid() {
            return Err(SlideError::InvalidParameter(
                "fallback_frame_rate must be positive".to_string(),
            ));
        }
        if self.ticks_per_second <= 0 {
            return Err(SlideError::InvalidParameter(format!(
                "ticks_per_second must be positive, got {}",
                self.ticks_per_second
            )));
        }
        if self.image_extensions.is_empty() {
            return Err(SlideError::InvalidParameter(
                "image_extensions is empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Random source for an assembly run.
    pub fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }

    /// Load from a JSON file and validate.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let config: Self = serde_json::from_slice(&data)
            .map_err(|e| SlideError::Serialization(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if it exists, otherwise defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_vec_pretty(self)
            .map_err(|e| SlideError::Serialization(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, data)?;
        Ok(())
    }
}
