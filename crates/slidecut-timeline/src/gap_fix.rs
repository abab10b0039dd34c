//! Post-placement gap closing.
//!
//! Hosts convert incoming seconds to ticks and may round, leaving a tick or
//! two between neighbours. This pass sorts the observed clips of both video
//! tracks by start and grows each clip to meet the next one. Overlaps are
//! left alone; the host trims those itself.

use serde::{Deserialize, Serialize};
use slidecut_core::Result;
use tracing::{debug, info};

use crate::clip::{ClipBounds, ClipId, TrackParity};
use crate::host::TimelineHost;

/// One clip end that needs to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapFix {
    pub clip: ClipId,
    pub track: TrackParity,
    pub old_end_ticks: i64,
    pub new_end_ticks: i64,
}

impl GapFix {
    #[inline]
    pub fn gap_ticks(&self) -> i64 {
        self.new_end_ticks - self.old_end_ticks
    }
}

/// Outcome of a gap-fix pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapFixReport {
    pub fixes: Vec<GapFix>,
    /// Adjacent pairs that overlap and were left untouched.
    pub overlaps: usize,
}

impl GapFixReport {
    pub fn gaps_closed(&self) -> usize {
        self.fixes.len()
    }

    pub fn ticks_added(&self) -> i64 {
        self.fixes.iter().map(GapFix::gap_ticks).sum()
    }
}

fn sort_by_start(clips: &mut [ClipBounds]) {
    clips.sort_by_key(|c| (c.start_ticks, c.end_ticks));
}

/// Work out which clip ends must move, without touching anything.
pub fn plan_gap_fixes(clips: &[ClipBounds]) -> GapFixReport {
    let mut sorted = clips.to_vec();
    close_gaps_in(&mut sorted)
}

/// Close gaps in `clips` in place. `clips` ends up sorted by start.
pub fn close_gaps_in(clips: &mut [ClipBounds]) -> GapFixReport {
    sort_by_start(clips);

    let mut report = GapFixReport::default();
    for i in 1..clips.len() {
        let next_start = clips[i].start_ticks;
        let this = &mut clips[i - 1];
        let gap = next_start - this.end_ticks;
        if gap > 0 {
            report.fixes.push(GapFix {
                clip: this.clip,
                track: this.track,
                old_end_ticks: this.end_ticks,
                new_end_ticks: next_start,
            });
            this.end_ticks = next_start;
        } else if gap < 0 {
            report.overlaps += 1;
        }
    }
    report
}

/// Read clip boundaries back from `host` and extend clips across any gaps.
pub fn close_gaps<H: TimelineHost + ?Sized>(host: &mut H) -> Result<GapFixReport> {
    let clips = host.clip_bounds()?;
    let report = plan_gap_fixes(&clips);

    for fix in &report.fixes {
        debug!(
            clip = %fix.clip,
            track = %fix.track,
            gap = fix.gap_ticks(),
            "extending clip end"
        );
        host.set_clip_end(fix.clip, fix.new_end_ticks)?;
    }

    info!(
        clips = clips.len(),
        gaps_closed = report.gaps_closed(),
        overlaps = report.overlaps,
        "gap fix complete"
    );
    Ok(report)
}
