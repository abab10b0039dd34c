//! Error types for Slidecut.

use thiserror::Error;

/// Main error type for Slidecut operations.
#[derive(Error, Debug)]
pub enum SlideError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Cannot give {image_count} images at least one frame each from {total_frames} frames")]
    InsufficientFrames { total_frames: i64, image_count: usize },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Media error: {0}")]
    Media(String),

    #[error("Caption parse error: {0}")]
    Caption(String),

    #[error("Timeline error: {0}")]
    Timeline(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Result type alias for Slidecut operations.
pub type Result<T> = std::result::Result<T, SlideError>;
