//! Slidecut Timeline - slideshow allocation and placement
//!
//! Turns a voiceover length and an image count into a frame-exact timeline:
//! - Duration allocation with bounded random variation
//! - Tick-exact placement alternating across two video tracks
//! - Gap closing against the boundaries a host actually stored
//! - The assembly run, its settings and the manifest of created slideshows

pub mod allocate;
pub mod assemble;
pub mod clip;
pub mod config;
pub mod gap_fix;
pub mod host;
pub mod manifest;
pub mod place;
pub mod run_log;
pub mod sequence;

pub use allocate::{allocate, DurationPlan};
pub use assemble::{assemble, SlideshowReport, SlideshowRequest};
pub use clip::{CaptionCue, ClipBounds, ClipId, MediaItem, TrackParity};
pub use config::SlideshowConfig;
pub use gap_fix::{close_gaps, close_gaps_in, plan_gap_fixes, GapFix, GapFixReport};
pub use host::TimelineHost;
pub use manifest::{Manifest, ManifestEntry};
pub use place::{place, PlacedClip, Placement, PlacementPlan};
pub use run_log::{LogLevel, LogLine, RunLog};
pub use sequence::{SlideSequence, TimelineClip, Track, TrackKind};
