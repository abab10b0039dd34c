//! Frame-exact duration allocation.
//!
//! Splits a voiceover's length into one integer frame count per image. The
//! counts always sum to `round(seconds * fps)`; random variation is applied
//! around the even split and any drift from rounding or clamping is absorbed
//! by the final slot.

use rand::Rng;
use serde::{Deserialize, Serialize};
use slidecut_core::defaults::MIN_IMAGE_SECONDS;
use slidecut_core::{round_div, seconds_to_frames, FrameRate, Result, SlideError};
use tracing::debug;

/// Largest frame total `allocate` accepts.
pub const MAX_TOTAL_FRAMES: i64 = i64::MAX / 4;

/// Per-image frame counts for one slideshow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationPlan {
    /// Frame count per image, in image order.
    pub frames: Vec<i64>,
    /// Frames the plan must sum to.
    pub total_frames: i64,
    /// Even-split frame count before remainder and variation.
    pub base_frames: i64,
    /// Variation bound actually used, in frames.
    pub safe_max_var_frames: i64,
}

impl DurationPlan {
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Sum of all slots. Equal to `total_frames` for every plan `allocate` returns.
    pub fn sum(&self) -> i64 {
        self.frames.iter().sum()
    }
}

/// Allocate `total_seconds` across `image_count` images at `rate`.
///
/// With `max_variation_seconds > 0` each image deviates from the even split
/// by at most the variation bound, which is itself capped so no image drops
/// below half a second. Randomness comes from `rng`; seed it for
/// reproducible plans.
pub fn allocate<R: Rng + ?Sized>(
    total_seconds: f64,
    image_count: usize,
    max_variation_seconds: f64,
    rate: FrameRate,
    rng: &mut R,
) -> Result<DurationPlan> {
    if image_count == 0 {
        return Err(SlideError::InvalidParameter(
            "At least one image is required".to_string(),
        ));
    }
    if !rate.is_valid() {
        return Err(SlideError::InvalidParameter(format!(
            "Invalid frame rate {}/{}",
            rate.numerator, rate.denominator
        )));
    }
    if !total_seconds.is_finite() || total_seconds <= 0.0 {
        return Err(SlideError::InvalidParameter(format!(
            "Total duration must be positive, got {}",
            total_seconds
        )));
    }
    if !max_variation_seconds.is_finite() || max_variation_seconds < 0.0 {
        return Err(SlideError::InvalidParameter(format!(
            "Variation must be zero or positive, got {}",
            max_variation_seconds
        )));
    }

    // Slots can reach twice the even split before settling, so keep the
    // total well inside i64 for the sums in `apply_offsets`.
    let exact_frames = total_seconds * rate.to_fps_f64();
    if exact_frames.round() > MAX_TOTAL_FRAMES as f64 {
        return Err(SlideError::InvalidParameter(format!(
            "{} s at {} is more than {} frames",
            total_seconds, rate, MAX_TOTAL_FRAMES
        )));
    }

    let total_frames = seconds_to_frames(total_seconds, rate);
    let count = image_count as i64;
    if total_frames < count {
        return Err(SlideError::InsufficientFrames {
            total_frames,
            image_count,
        });
    }

    let base_frames = total_frames / count;
    let extra_frames = total_frames - base_frames * count;
    let mut frames = vec![base_frames; image_count];
    for slot in frames.iter_mut().take(extra_frames as usize) {
        *slot += 1;
    }

    let fps = rate.to_fps_f64();
    let max_var_frames = (max_variation_seconds * fps).round() as i64;
    let min_frames = ((fps * MIN_IMAGE_SECONDS).round() as i64).max(1);
    let safe_max_var_frames = max_var_frames.min(base_frames - min_frames).max(0);

    debug!(
        total_frames,
        base_frames, extra_frames, max_var_frames, safe_max_var_frames, "allocating frames"
    );

    if safe_max_var_frames > 0 && image_count > 1 {
        let offsets: Vec<i64> = (0..image_count)
            .map(|_| rng.gen_range(-safe_max_var_frames..=safe_max_var_frames))
            .collect();
        apply_offsets(
            &mut frames,
            &offsets,
            Bounds {
                total_frames,
                base_frames,
                safe_max_var_frames,
                min_frames,
            },
        );
    }

    debug_assert_eq!(frames.iter().sum::<i64>(), total_frames);
    Ok(DurationPlan {
        frames,
        total_frames,
        base_frames,
        safe_max_var_frames,
    })
}

#[derive(Debug, Clone, Copy)]
struct Bounds {
    total_frames: i64,
    base_frames: i64,
    safe_max_var_frames: i64,
    min_frames: i64,
}

/// Zero-center `offsets`, apply them, then settle the exact total on the last slot.
fn apply_offsets(frames: &mut [i64], offsets: &[i64], bounds: Bounds) {
    let Bounds {
        total_frames,
        base_frames,
        safe_max_var_frames: safe,
        min_frames,
    } = bounds;

    let mean = round_div(offsets.iter().sum(), offsets.len() as i64);
    let low = (base_frames - safe).max(1);
    let high = base_frames + safe;

    for (slot, offset) in frames.iter_mut().zip(offsets) {
        *slot = (*slot + offset - mean).clamp(low, high).max(1);
    }

    let new_total: i64 = frames.iter().sum();
    let Some((last, rest)) = frames.split_last_mut() else {
        return;
    };
    *last += total_frames - new_total;

    // The residual can be large when many slots hit the band edges. Borrow
    // from the latest slots first, never below their own lower band.
    let mut deficit = min_frames - *last;
    if deficit > 0 {
        debug!(deficit, "final slot under floor, rebalancing");
        for slot in rest.iter_mut().rev() {
            let give = deficit.min(*slot - low);
            if give > 0 {
                *slot -= give;
                deficit -= give;
            }
            if deficit == 0 {
                break;
            }
        }
        *last = min_frames - deficit;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn seeded(seed: u64) -> StdRng {
        StdRng::seed_from_u64(seed)
    }

    #[test]
    fn test_even_split_four_images() {
        let plan = allocate(10.0, 4, 0.0, FrameRate::FPS_30, &mut seeded(1)).unwrap();
        assert_eq!(plan.frames, vec![75, 75, 75, 75]);
        assert_eq!(plan.total_frames, 300);
        assert_eq!(plan.base_frames, 75);
    }

    #[test]
    fn test_even_split_three_images() {
        let plan = allocate(10.0, 3, 0.0, FrameRate::FPS_30, &mut seeded(1)).unwrap();
        assert_eq!(plan.frames, vec![100, 100, 100]);

        let plan = allocate(7.0, 3, 0.0, FrameRate::FPS_30, &mut seeded(1)).unwrap();
        assert_eq!(plan.frames, vec![70, 70, 70]);
    }

    #[test]
    fn test_remainder_goes_to_leading_slots() {
        let plan = allocate(7.05, 3, 0.0, FrameRate::FPS_30, &mut seeded(1)).unwrap();
        assert_eq!(plan.total_frames, 212);
        assert_eq!(plan.frames, vec![71, 71, 70]);
    }

    #[test]
    fn test_single_image_takes_everything() {
        let plan = allocate(12.0, 1, 5.0, FrameRate::FPS_25, &mut seeded(9)).unwrap();
        assert_eq!(plan.frames, vec![300]);
    }

    #[test]
    fn test_zero_variation_ignores_rng() {
        let a = allocate(61.0, 7, 0.0, FrameRate::FPS_29_97, &mut seeded(1)).unwrap();
        let b = allocate(61.0, 7, 0.0, FrameRate::FPS_29_97, &mut seeded(2)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.safe_max_var_frames, 0);
    }

    #[test]
    fn test_same_seed_same_plan() {
        let a = allocate(95.0, 12, 2.0, FrameRate::FPS_30, &mut seeded(42)).unwrap();
        let b = allocate(95.0, 12, 2.0, FrameRate::FPS_30, &mut seeded(42)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.sum(), 2850);
    }

    #[test]
    fn test_variation_capped_by_half_second_floor() {
        // 40 frames per image, 15 frame floor: only 25 frames of room.
        let plan = allocate(40.0, 30, 5.0, FrameRate::FPS_30, &mut seeded(3)).unwrap();
        assert_eq!(plan.base_frames, 40);
        assert_eq!(plan.safe_max_var_frames, 25);
    }

    #[test]
    fn test_short_images_get_no_variation() {
        // 10 frames each is already under the half-second floor.
        let plan = allocate(2.0, 6, 2.0, FrameRate::FPS_30, &mut seeded(3)).unwrap();
        assert_eq!(plan.safe_max_var_frames, 0);
        assert_eq!(plan.frames, vec![10; 6]);
    }

    #[test]
    fn test_fewer_frames_than_images_is_rejected() {
        let err = allocate(0.1, 5, 0.0, FrameRate::FPS_30, &mut seeded(1)).unwrap_err();
        assert!(matches!(
            err,
            SlideError::InsufficientFrames {
                total_frames: 3,
                image_count: 5
            }
        ));
    }

    #[test]
    fn test_invalid_inputs_fail_fast() {
        let rate = FrameRate::FPS_30;
        let rng = &mut seeded(1);
        assert!(allocate(10.0, 0, 0.0, rate, rng).is_err());
        assert!(allocate(0.0, 3, 0.0, rate, rng).is_err());
        assert!(allocate(-4.0, 3, 0.0, rate, rng).is_err());
        assert!(allocate(f64::INFINITY, 3, 0.0, rate, rng).is_err());
        assert!(allocate(10.0, 3, -1.0, rate, rng).is_err());
        assert!(allocate(10.0, 3, 0.0, FrameRate::new(0, 1), rng).is_err());
    }

    #[test]
    fn test_huge_durations_are_rejected_not_overflowed() {
        let rate = FrameRate::FPS_30;
        let result = allocate(1e300, 2, 5.0, rate, &mut seeded(3));
        assert!(matches!(result, Err(SlideError::InvalidParameter(_))));

        let seconds = MAX_TOTAL_FRAMES as f64 / 30.0 * 2.0;
        assert!(allocate(seconds, 3, 2.0, rate, &mut seeded(3)).is_err());

        let plan = allocate(1e15, 2, 5.0, rate, &mut seeded(3)).unwrap();
        assert_eq!(plan.sum(), 30_000_000_000_000_000);
    }

    #[test]
    fn test_adversarial_offsets_keep_total_and_floor() {
        // Every slot pushed to the top edge but one: the mean shift drags the
        // lone low slot far below the band and the residual lands on the end.
        let bounds = Bounds {
            total_frames: 40 * 10,
            base_frames: 40,
            safe_max_var_frames: 25,
            min_frames: 15,
        };
        let mut frames = vec![40; 10];
        let mut offsets = vec![25; 10];
        offsets[3] = -25;
        apply_offsets(&mut frames, &offsets, bounds);

        assert_eq!(frames.iter().sum::<i64>(), 400);
        for slot in &frames[..9] {
            assert!((slot - 40).abs() <= 25, "slot {} out of band", slot);
        }
        assert!(frames[9] >= 15);
    }

    #[test]
    fn test_deficit_is_pulled_from_latest_slots() {
        let bounds = Bounds {
            total_frames: 60,
            base_frames: 20,
            safe_max_var_frames: 5,
            min_frames: 15,
        };
        // Mean is 0, so slots 0 and 1 rise to the top of the band and the
        // last slot would be left with 10 frames.
        let mut frames = vec![20, 20, 20];
        apply_offsets(&mut frames, &[5, 5, -10], bounds);
        assert_eq!(frames.iter().sum::<i64>(), 60);
        assert_eq!(frames, vec![25, 20, 15]);
    }

    fn rate_strategy() -> impl Strategy<Value = FrameRate> {
        prop::sample::select(vec![
            FrameRate::FPS_23_976,
            FrameRate::FPS_24,
            FrameRate::FPS_25,
            FrameRate::FPS_29_97,
            FrameRate::FPS_30,
            FrameRate::FPS_60,
        ])
    }

    proptest! {
        #[test]
        fn plan_sums_exactly(
            image_count in 1usize..=1000,
            seconds in 0.05f64..3600.0,
            variation in 0.0f64..=5.0,
            rate in rate_strategy(),
            seed in any::<u64>(),
        ) {
            let expected = seconds_to_frames(seconds, rate);
            match allocate(seconds, image_count, variation, rate, &mut seeded(seed)) {
                Ok(plan) => {
                    prop_assert_eq!(plan.sum(), expected);
                    prop_assert_eq!(plan.len(), image_count);
                    prop_assert!(plan.frames.iter().all(|&f| f >= 1));
                }
                Err(SlideError::InsufficientFrames { .. }) => {
                    prop_assert!(expected < image_count as i64);
                }
                Err(e) => prop_assert!(false, "unexpected error: {}", e),
            }
        }

        #[test]
        fn variation_stays_in_band(
            image_count in 2usize..=300,
            seconds in 10.0f64..1800.0,
            variation in 0.0f64..=5.0,
            rate in rate_strategy(),
            seed in any::<u64>(),
        ) {
            prop_assume!(seconds_to_frames(seconds, rate) >= image_count as i64);
            let plan = allocate(seconds, image_count, variation, rate, &mut seeded(seed)).unwrap();
            let (_, rest) = plan.frames.split_last().unwrap();
            for &slot in rest {
                prop_assert!((slot - plan.base_frames).abs() <= plan.safe_max_var_frames.max(1));
            }
        }

        #[test]
        fn zero_variation_is_even_split(
            image_count in 1usize..=400,
            seconds in 20.0f64..600.0,
            rate in rate_strategy(),
            seed in any::<u64>(),
        ) {
            let plan = allocate(seconds, image_count, 0.0, rate, &mut seeded(seed)).unwrap();
            let extra = (plan.total_frames % image_count as i64) as usize;
            for (i, &slot) in plan.frames.iter().enumerate() {
                let expected = plan.base_frames + i64::from(i < extra);
                prop_assert_eq!(slot, expected);
            }
        }
    }
}
