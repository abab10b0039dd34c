//! The seam between slideshow assembly and whatever owns the real timeline.

use slidecut_core::{FrameRate, Result};

use crate::clip::{CaptionCue, ClipBounds, ClipId, MediaItem, TrackParity};

/// A timeline that can receive clips and report where they actually landed.
///
/// Hosts take positions in seconds and store ticks, possibly rounding on the
/// way in. After placement the host is the authority on clip boundaries,
/// so the gap fixer reads them back through [`TimelineHost::clip_bounds`].
pub trait TimelineHost {
    /// Frame rate of the target sequence, if it can be read.
    fn frame_rate(&self) -> Option<FrameRate>;

    /// Ticks per frame of the target sequence, if it can be read.
    fn ticks_per_frame(&self) -> Option<i64>;

    /// Put a still image on one of the two video tracks.
    fn insert_still(
        &mut self,
        track: TrackParity,
        media: &MediaItem,
        position_seconds: f64,
        duration_seconds: f64,
    ) -> Result<ClipId>;

    /// Put the voiceover on the audio track.
    fn insert_audio(
        &mut self,
        media: &MediaItem,
        position_seconds: f64,
        duration_seconds: f64,
    ) -> Result<ClipId>;

    /// Replace the caption track with `cues`. Returns the number of cues kept.
    fn insert_captions(&mut self, cues: &[CaptionCue]) -> Result<usize>;

    /// Video clips from both tracks as the host currently stores them.
    fn clip_bounds(&self) -> Result<Vec<ClipBounds>>;

    /// Move the end of `clip` to `end_ticks`.
    fn set_clip_end(&mut self, clip: ClipId, end_ticks: i64) -> Result<()>;
}
