//! Slidecut Media - the files around a slideshow
//!
//! This crate handles:
//! - Image folder scanning in natural order
//! - Voiceover duration probing through ffprobe
//! - SRT caption parsing
//! - Batch export queueing

pub mod export;
pub mod probe;
pub mod scan;
pub mod srt;

pub use export::{
    ExportCancel, ExportJob, ExportPreset, ExportProgress, ExportQueue, ExportSummary,
    ExportTarget, VideoCodec,
};
pub use probe::probe_duration;
pub use scan::{natural_cmp, scan_folder};
