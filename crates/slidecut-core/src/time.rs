//! Time representation for frame-accurate slideshow assembly
//!
//! Three clocks meet here: continuous seconds (what media probes report),
//! integer frames (what the allocator reasons in) and integer host ticks
//! (what the timeline stores). Seconds are only ever derived from frames,
//! never accumulated, so placements stay frame-aligned.

use num_rational::Rational64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::error::{Result, SlideError};

/// A rational time value representing a point in time.
/// Uses rational arithmetic to maintain frame-accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RationalTime {
    /// Time value as a rational number (seconds)
    value: Rational64,
}

impl RationalTime {
    /// Create a new RationalTime from numerator and denominator.
    /// The time is `numerator / denominator` seconds.
    #[inline]
    pub fn new(numerator: i64, denominator: i64) -> Self {
        Self {
            value: Rational64::new(numerator, denominator),
        }
    }

    /// Create a RationalTime from a frame number and frame rate.
    #[inline]
    pub fn from_frames(frames: i64, rate: FrameRate) -> Self {
        Self {
            value: Rational64::new(frames * rate.denominator as i64, rate.numerator as i64),
        }
    }

    /// Create a RationalTime from whole milliseconds.
    #[inline]
    pub fn from_millis(millis: i64) -> Self {
        Self::new(millis, 1000)
    }

    /// Convert to seconds as f64.
    #[inline]
    pub fn to_seconds_f64(self) -> f64 {
        *self.value.numer() as f64 / *self.value.denom() as f64
    }

    /// Zero time constant.
    pub const ZERO: Self = Self {
        value: Rational64::new_raw(0, 1),
    };
}

impl Default for RationalTime {
    fn default() -> Self {
        Self::ZERO
    }
}

impl Add for RationalTime {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            value: self.value + rhs.value,
        }
    }
}

impl Sub for RationalTime {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            value: self.value - rhs.value,
        }
    }
}

impl fmt::Display for RationalTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.3}s", self.to_seconds_f64())
    }
}

/// Frame rate as a rational number (e.g., 30000/1001 for 29.97 fps).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FrameRate {
    /// Numerator (e.g., 30000)
    pub numerator: u32,
    /// Denominator (e.g., 1001)
    pub denominator: u32,
}

impl FrameRate {
    /// Create a new frame rate.
    #[inline]
    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Build a frame rate from a float as reported by hosts and media probes.
    ///
    /// NTSC rates (23.976, 29.97, 47.952, 59.94) snap to their exact
    /// `N*1000/1001` form; anything else is kept to millisecond precision.
    pub fn from_fps_f64(fps: f64) -> Result<Self> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(SlideError::InvalidParameter(format!(
                "Frame rate must be positive, got {}",
                fps
            )));
        }

        for nominal in [24u32, 30, 48, 60] {
            let ntsc = nominal as f64 * 1000.0 / 1001.0;
            if (fps - ntsc).abs() < 0.005 {
                return Ok(Self::new(nominal * 1000, 1001));
            }
        }

        let out_of_range =
            || SlideError::InvalidParameter(format!("Frame rate {} is out of range", fps));

        let rate = if (fps - fps.round()).abs() < 1e-6 {
            let whole = fps.round();
            if whole > u32::MAX as f64 {
                return Err(out_of_range());
            }
            Self::new(whole as u32, 1)
        } else {
            let millis = (fps * 1000.0).round();
            if millis > i64::MAX as f64 {
                return Err(out_of_range());
            }
            let ratio = Rational64::new(millis as i64, 1000);
            let numerator = u32::try_from(*ratio.numer()).map_err(|_| out_of_range())?;
            Self::new(numerator, *ratio.denom() as u32)
        };

        if !rate.is_valid() {
            return Err(SlideError::InvalidParameter(format!(
                "Frame rate {} is too small to represent",
                fps
            )));
        }
        Ok(rate)
    }

    /// Both terms are non-zero.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.numerator > 0 && self.denominator > 0
    }

    /// Convert to frames per second as f64.
    #[inline]
    pub fn to_fps_f64(self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Common frame rates
    pub const FPS_23_976: Self = Self::new(24000, 1001);
    pub const FPS_24: Self = Self::new(24, 1);
    pub const FPS_25: Self = Self::new(25, 1);
    pub const FPS_29_97: Self = Self::new(30000, 1001);
    pub const FPS_30: Self = Self::new(30, 1);
    pub const FPS_50: Self = Self::new(50, 1);
    pub const FPS_59_94: Self = Self::new(60000, 1001);
    pub const FPS_60: Self = Self::new(60, 1);
}

impl Default for FrameRate {
    fn default() -> Self {
        Self::FPS_30
    }
}

impl fmt::Display for FrameRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fps = self.to_fps_f64();
        if (fps - fps.round()).abs() < 0.001 {
            write!(f, "{} fps", fps.round() as u32)
        } else {
            write!(f, "{:.3} fps", fps)
        }
    }
}

/// Convert a continuous duration to a whole number of frames.
///
/// Rounds half away from zero, so 7.05 s at 30 fps (211.5 frames) is 212.
#[inline]
pub fn seconds_to_frames(seconds: f64, rate: FrameRate) -> i64 {
    (seconds * rate.to_fps_f64()).round() as i64
}

/// Integer division rounded half away from zero. `den` must be positive.
#[inline]
pub fn round_div(num: i64, den: i64) -> i64 {
    debug_assert!(den > 0);
    let (num, den) = (num as i128, den as i128);
    let q = (2 * num.abs() + den) / (2 * den);
    (if num < 0 { -q } else { q }) as i64
}

/// A host timeline clock: a fixed tick resolution plus the per-sequence
/// number of ticks in one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickClock {
    /// Ticks in one second of host time.
    pub ticks_per_second: i64,
    /// Ticks in one frame of the sequence. Constant for a sequence.
    pub ticks_per_frame: i64,
}

impl TickClock {
    /// Tick resolution used by Premiere-style hosts.
    pub const HOST_TICKS_PER_SECOND: i64 = 254_016_000_000;

    /// Create a clock from explicit tick counts.
    #[inline]
    pub const fn new(ticks_per_second: i64, ticks_per_frame: i64) -> Self {
        Self {
            ticks_per_second,
            ticks_per_frame,
        }
    }

    /// Derive ticks-per-frame for `rate`, rounding to the nearest tick when
    /// the frame duration is not a whole number of ticks.
    pub fn for_rate(rate: FrameRate, ticks_per_second: i64) -> Self {
        let ticks_per_frame = round_div(
            ticks_per_second * rate.denominator as i64,
            rate.numerator as i64,
        );
        Self::new(ticks_per_second, ticks_per_frame)
    }

    /// Both tick counts are positive.
    #[inline]
    pub fn is_valid(self) -> bool {
        self.ticks_per_second > 0 && self.ticks_per_frame > 0
    }

    /// Ticks covered by `frames`. Fails instead of overflowing.
    #[inline]
    pub fn frames_to_ticks(self, frames: i64) -> Result<i64> {
        frames.checked_mul(self.ticks_per_frame).ok_or_else(|| {
            SlideError::InvalidParameter(format!(
                "{} frames at {} ticks per frame exceed the timeline range",
                frames, self.ticks_per_frame
            ))
        })
    }

    /// Whole frames contained in `ticks` (floored).
    #[inline]
    pub fn ticks_to_frames(self, ticks: i64) -> i64 {
        ticks.div_euclid(self.ticks_per_frame)
    }

    #[inline]
    pub fn ticks_to_seconds(self, ticks: i64) -> f64 {
        ticks as f64 / self.ticks_per_second as f64
    }

    /// Whether `ticks` lies exactly on a frame boundary.
    #[inline]
    pub fn is_frame_aligned(self, ticks: i64) -> bool {
        ticks.rem_euclid(self.ticks_per_frame) == 0
    }
}

/// A time range with inclusive start and exclusive end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeRange {
    /// Start time (inclusive)
    pub start: RationalTime,
    /// Duration of the range
    pub duration: RationalTime,
}

impl TimeRange {
    /// Create a time range from start and end times.
    #[inline]
    pub fn from_start_end(start: RationalTime, end: RationalTime) -> Self {
        Self {
            start,
            duration: end - start,
        }
    }

    /// End time (exclusive).
    #[inline]
    pub fn end(self) -> RationalTime {
        self.start + self.duration
    }
}
