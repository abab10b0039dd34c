//! Slidecut Core - Foundation types for slideshow assembly
//!
//! This crate provides the fundamental types used throughout Slidecut:
//! - Time representation (RationalTime, FrameRate, TickClock, TimeRange)
//! - Integer rounding helpers shared by the allocator and placer
//! - The common error type

pub mod error;
pub mod time;

pub use error::{Result, SlideError};
pub use time::{round_div, seconds_to_frames, FrameRate, RationalTime, TickClock, TimeRange};

/// Defaults threaded in from the panel when nothing better is known.
pub mod defaults {
    use crate::time::FrameRate;

    /// Maximum random deviation per image, in seconds.
    pub const MAX_VARIATION_SECONDS: f64 = 2.0;

    /// Used only when the sequence frame rate cannot be read.
    pub const FALLBACK_FRAME_RATE: FrameRate = FrameRate::FPS_30;

    /// Shortest time any image may be shown once variation is applied.
    pub const MIN_IMAGE_SECONDS: f64 = 0.5;
}
