//! Tick-exact placement of allocated images.
//!
//! The cursor only ever advances by whole frames expressed in ticks, so the
//! last clip ends at exactly `total_frames * ticks_per_frame` no matter how
//! many images are placed. Seconds handed to a host are derived from frame
//! numbers, never from tick division.

use serde::{Deserialize, Serialize};
use slidecut_core::{FrameRate, RationalTime, Result, SlideError, TickClock};

use crate::allocate::DurationPlan;
use crate::clip::TrackParity;

/// Where one image goes on the timeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedClip {
    /// Image index in the slideshow
    pub index: usize,
    pub track: TrackParity,
    pub start_ticks: i64,
    pub duration_frames: i64,
    /// `start_ticks + duration_frames * ticks_per_frame`
    pub end_ticks: i64,
}

impl PlacedClip {
    /// Frame the clip starts on.
    #[inline]
    pub fn start_frame(&self, clock: TickClock) -> i64 {
        clock.ticks_to_frames(self.start_ticks)
    }

    /// Start in seconds, exact to the frame.
    pub fn position_seconds(&self, clock: TickClock, rate: FrameRate) -> f64 {
        RationalTime::from_frames(self.start_frame(clock), rate).to_seconds_f64()
    }

    /// Length in seconds, exact to the frame.
    pub fn duration_seconds(&self, rate: FrameRate) -> f64 {
        RationalTime::from_frames(self.duration_frames, rate).to_seconds_f64()
    }
}

/// Instruction for a placement executor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub index: usize,
    pub track: TrackParity,
    pub position_seconds: f64,
    pub duration_seconds: f64,
}

/// All placed clips for one slideshow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacementPlan {
    pub clips: Vec<PlacedClip>,
    /// Cursor after the last clip.
    pub end_ticks: i64,
    pub clock: TickClock,
    pub rate: FrameRate,
}

impl PlacementPlan {
    /// Placements in image order, in the seconds a host expects.
    pub fn placements(&self) -> impl Iterator<Item = Placement> + '_ {
        self.clips.iter().map(move |clip| Placement {
            index: clip.index,
            track: clip.track,
            position_seconds: clip.position_seconds(self.clock, self.rate),
            duration_seconds: clip.duration_seconds(self.rate),
        })
    }

    /// Whole frames covered by the plan.
    pub fn total_frames(&self) -> i64 {
        self.clock.ticks_to_frames(self.end_ticks)
    }
}

/// Lay out `plan` back to back, alternating tracks by index parity.
pub fn place(plan: &DurationPlan, clock: TickClock, rate: FrameRate) -> Result<PlacementPlan> {
    if !clock.is_valid() {
        return Err(SlideError::InvalidParameter(format!(
            "Invalid tick clock: {} ticks/s, {} ticks/frame",
            clock.ticks_per_second, clock.ticks_per_frame
        )));
    }
    if !rate.is_valid() {
        return Err(SlideError::InvalidParameter(format!(
            "Invalid frame rate {}/{}",
            rate.numerator, rate.denominator
        )));
    }

    let mut cursor_ticks: i64 = 0;
    let mut clips = Vec::with_capacity(plan.len());

    for (index, &duration_frames) in plan.frames.iter().enumerate() {
        if duration_frames < 1 {
            return Err(SlideError::InvalidParameter(format!(
                "Image {} has {} frames",
                index, duration_frames
            )));
        }
        let clip_ticks = clock.frames_to_ticks(duration_frames)?;
        let end_ticks = cursor_ticks.checked_add(clip_ticks).ok_or_else(|| {
            SlideError::InvalidParameter(format!(
                "Image {} ends past the timeline range ({} + {} ticks)",
                index, cursor_ticks, clip_ticks
            ))
        })?;
        clips.push(PlacedClip {
            index,
            track: TrackParity::from_index(index),
            start_ticks: cursor_ticks,
            duration_frames,
            end_ticks,
        });
        cursor_ticks = end_ticks;
    }

    // Seconds are derived as frames * denominator / numerator.
    let end_frame = clock.ticks_to_frames(cursor_ticks);
    if end_frame.checked_mul(rate.denominator as i64).is_none() {
        return Err(SlideError::InvalidParameter(format!(
            "{} frames cannot be expressed in seconds at {}",
            end_frame, rate
        )));
    }

    Ok(PlacementPlan {
        clips,
        end_ticks: cursor_ticks,
        clock,
        rate,
    })
}
