//! The "create slideshow" run: allocate, place, insert, close gaps.

use rand::Rng;
use serde::{Deserialize, Serialize};
use slidecut_core::{FrameRate, Result, SlideError, TickClock};

use crate::allocate::{allocate, DurationPlan};
use crate::clip::{CaptionCue, MediaItem};
use crate::config::SlideshowConfig;
use crate::gap_fix::{close_gaps, GapFixReport};
use crate::host::TimelineHost;
use crate::place::{place, PlacementPlan};
use crate::run_log::RunLog;

/// Everything needed to build one slideshow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideshowRequest {
    /// Sequence name
    pub name: String,
    /// Images in display order
    pub images: Vec<MediaItem>,
    /// Voiceover
    pub voice: MediaItem,
    /// Voiceover length as probed
    pub voice_duration_seconds: f64,
    /// Parsed caption cues, if a caption file was supplied
    pub captions: Option<Vec<CaptionCue>>,
}

/// What a run did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideshowReport {
    pub name: String,
    pub frame_rate: FrameRate,
    /// The host could not report a frame rate and the configured fallback was used.
    pub used_fallback_rate: bool,
    pub clock: TickClock,
    pub plan: DurationPlan,
    pub placement: PlacementPlan,
    pub gap_fix: GapFixReport,
    pub captions_imported: usize,
    pub log: RunLog,
}

/// Build a slideshow on `host`.
///
/// The host must reflect every insertion by the time it is asked for clip
/// boundaries; the gap fix trusts what it reads back.
pub fn assemble<H, R>(
    request: &SlideshowRequest,
    config: &SlideshowConfig,
    host: &mut H,
    rng: &mut R,
) -> Result<SlideshowReport>
where
    H: TimelineHost + ?Sized,
    R: Rng + ?Sized,
{
    config.validate()?;
    if request.images.is_empty() {
        return Err(SlideError::InvalidParameter(format!(
            "No images for slideshow {}",
            request.name
        )));
    }

    let mut log = RunLog::new();
    log.info(format!(
        "Creating {} from {} images and {}",
        request.name,
        request.images.len(),
        request.voice.name
    ));

    let (frame_rate, used_fallback_rate) = match host.frame_rate().filter(|r| r.is_valid()) {
        Some(rate) => (rate, false),
        None => {
            log.warn(format!(
                "Sequence frame rate unavailable, using {}",
                config.fallback_frame_rate
            ));
            (config.fallback_frame_rate, true)
        }
    };
    let clock = match host.ticks_per_frame().filter(|&t| t > 0) {
        Some(ticks_per_frame) => TickClock::new(config.ticks_per_second, ticks_per_frame),
        None => TickClock::for_rate(frame_rate, config.ticks_per_second),
    };
    log.debug(format!(
        "Frame rate {}, {} ticks per frame",
        frame_rate, clock.ticks_per_frame
    ));

    let plan = allocate(
        request.voice_duration_seconds,
        request.images.len(),
        config.max_variation_seconds,
        frame_rate,
        rng,
    )?;
    log.info(format!(
        "Voiceover {:.3} s = {} frames, base {} per image, variation up to {} frames",
        request.voice_duration_seconds,
        plan.total_frames,
        plan.base_frames,
        plan.safe_max_var_frames
    ));

    let placement = place(&plan, clock, frame_rate)?;
    for (slot, image) in placement.placements().zip(&request.images) {
        host.insert_still(slot.track, image, slot.position_seconds, slot.duration_seconds)?;
        log.debug(format!(
            "{} on {} at {:.4} s for {:.4} s",
            image.name, slot.track, slot.position_seconds, slot.duration_seconds
        ));
    }

    host.insert_audio(&request.voice, 0.0, request.voice_duration_seconds)?;
    log.debug(format!(
        "Voiceover placed on A1, images end at {:.4} s",
        clock.ticks_to_seconds(placement.end_ticks)
    ));

    let captions_imported = match (&request.captions, config.import_captions) {
        (Some(cues), true) => {
            let count = host.insert_captions(cues)?;
            log.info(format!("Imported {} caption cues", count));
            count
        }
        (Some(_), false) => {
            log.info("Caption import disabled, skipping captions");
            0
        }
        (None, _) => 0,
    };

    let gap_fix = close_gaps(host)?;
    if gap_fix.gaps_closed() > 0 {
        log.info(format!(
            "Closed {} gaps ({} ticks)",
            gap_fix.gaps_closed(),
            gap_fix.ticks_added()
        ));
    }
    if gap_fix.overlaps > 0 {
        log.warn(format!("{} overlapping clip pairs left to the host", gap_fix.overlaps));
    }

    log.info(format!(
        "{} complete: {} clips, {} frames",
        request.name,
        placement.clips.len(),
        placement.total_frames()
    ));

    Ok(SlideshowReport {
        name: request.name.clone(),
        frame_rate,
        used_fallback_rate,
        clock,
        plan,
        placement,
        gap_fix,
        captions_imported,
        log,
    })
}
