//! In-memory sequence that behaves like a host timeline.
//!
//! Two video tracks, one audio track and a caption track. Incoming seconds
//! are converted to ticks the way a host does it, including an optional
//! coarser resolution so rounding gaps show up between neighbours.

use serde::{Deserialize, Serialize};
use slidecut_core::{FrameRate, Result, SlideError, TickClock};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::clip::{CaptionCue, ClipBounds, ClipId, MediaItem, TrackParity};
use crate::host::TimelineHost;

/// Kind of track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackKind {
    Video,
    Audio,
}

/// A clip as stored on a track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineClip {
    pub id: ClipId,
    /// Clip name (displayed in UI)
    pub name: String,
    /// Source media path
    pub media: PathBuf,
    pub start_ticks: i64,
    pub end_ticks: i64,
}

/// A track holding clips ordered by start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Track {
    /// Unique track ID
    pub id: Uuid,
    /// Track name
    pub name: String,
    /// Track kind
    pub kind: TrackKind,
    /// Clips sorted by start tick
    pub clips: Vec<TimelineClip>,
    /// Is track locked (prevent edits)
    pub locked: bool,
}

impl Track {
    /// Create a new video track.
    pub fn new_video(name: impl Into<String>) -> Self {
        Self::new(name, TrackKind::Video)
    }

    /// Create a new audio track.
    pub fn new_audio(name: impl Into<String>) -> Self {
        Self::new(name, TrackKind::Audio)
    }

    fn new(name: impl Into<String>, kind: TrackKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            kind,
            clips: Vec::new(),
            locked: false,
        }
    }

    /// End of the last clip, in ticks.
    pub fn end_ticks(&self) -> i64 {
        self.clips.iter().map(|c| c.end_ticks).max().unwrap_or(0)
    }

    /// Insert a clip keeping start order.
    pub fn insert_clip(&mut self, clip: TimelineClip) -> Result<ClipId> {
        if self.locked {
            return Err(SlideError::Timeline(format!("Track {} is locked", self.name)));
        }
        let id = clip.id;
        let index = self
            .clips
            .partition_point(|c| c.start_ticks <= clip.start_ticks);
        self.clips.insert(index, clip);
        Ok(id)
    }

    /// Find a clip mutably by ID.
    pub fn find_clip_mut(&mut self, id: ClipId) -> Option<&mut TimelineClip> {
        self.clips.iter_mut().find(|c| c.id == id)
    }

    /// Number of clips in this track.
    pub fn clip_count(&self) -> usize {
        self.clips.len()
    }
}

/// A sequence built by the slideshow assembler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideSequence {
    /// Unique sequence ID
    pub id: Uuid,
    /// Sequence name
    pub name: String,
    /// Frame rate, `None` when it cannot be read back
    pub frame_rate: Option<FrameRate>,
    /// Host tick resolution
    pub ticks_per_second: i64,
    /// Incoming times are floored to a multiple of this many ticks
    pub quantum_ticks: i64,
    /// Video tracks V1 and V2
    pub video_tracks: [Track; 2],
    /// Voiceover track
    pub audio_track: Track,
    /// Caption cues
    pub captions: Vec<CaptionCue>,
}

impl SlideSequence {
    /// Create a new sequence that stores times at full tick resolution.
    pub fn new(name: impl Into<String>, frame_rate: FrameRate, ticks_per_second: i64) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            frame_rate: Some(frame_rate),
            ticks_per_second,
            quantum_ticks: 1,
            video_tracks: [Track::new_video("V1"), Track::new_video("V2")],
            audio_track: Track::new_audio("A1"),
            captions: Vec::new(),
        }
    }

    /// Store incoming times at a coarser resolution.
    pub fn with_quantum(mut self, quantum_ticks: i64) -> Self {
        self.quantum_ticks = quantum_ticks.max(1);
        self
    }

    /// Hide the frame rate, as a host does for a sequence it cannot inspect.
    pub fn without_frame_rate(mut self) -> Self {
        self.frame_rate = None;
        self
    }

    /// Clock of this sequence, if its frame rate is known.
    pub fn clock(&self) -> Option<TickClock> {
        self.frame_rate
            .map(|rate| TickClock::for_rate(rate, self.ticks_per_second))
    }

    /// End of the longest track, in ticks.
    pub fn duration_ticks(&self) -> i64 {
        self.video_tracks
            .iter()
            .chain(std::iter::once(&self.audio_track))
            .map(Track::end_ticks)
            .max()
            .unwrap_or(0)
    }

    pub fn video_clip_count(&self) -> usize {
        self.video_tracks.iter().map(Track::clip_count).sum()
    }

    fn to_host_ticks(&self, seconds: f64) -> i64 {
        let quantum = self.quantum_ticks.max(1);
        let ticks = (seconds * self.ticks_per_second as f64).round() as i64;
        ticks.div_euclid(quantum) * quantum
    }

    fn make_clip(
        &self,
        media: &MediaItem,
        position_seconds: f64,
        duration_seconds: f64,
    ) -> Result<TimelineClip> {
        if !position_seconds.is_finite() || position_seconds < 0.0 {
            return Err(SlideError::InvalidParameter(format!(
                "Invalid clip position {}",
                position_seconds
            )));
        }
        let start_ticks = self.to_host_ticks(position_seconds);
        let duration_ticks = self.to_host_ticks(duration_seconds);
        if duration_ticks <= 0 {
            return Err(SlideError::InvalidParameter(format!(
                "Clip {} would be empty ({} s)",
                media.name, duration_seconds
            )));
        }
        Ok(TimelineClip {
            id: ClipId::new(),
            name: media.name.clone(),
            media: media.path.clone(),
            start_ticks,
            end_ticks: start_ticks + duration_ticks,
        })
    }

    /// Serialize to pretty JSON bytes.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| SlideError::Serialization(format!("Failed to serialize sequence: {}", e)))
    }

    /// Save the sequence to a file path.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load a sequence from a file path.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let data = std::fs::read(path)?;
        let sequence: Self = serde_json::from_slice(&data)
            .map_err(|e| SlideError::Serialization(format!("Failed to parse sequence: {}", e)))?;
        if sequence.ticks_per_second <= 0 || sequence.quantum_ticks < 1 {
            return Err(SlideError::Serialization(format!(
                "Sequence {} has {} ticks/s and a {} tick quantum",
                sequence.name, sequence.ticks_per_second, sequence.quantum_ticks
            )));
        }
        Ok(sequence)
    }
}

impl TimelineHost for SlideSequence {
    fn frame_rate(&self) -> Option<FrameRate> {
        self.frame_rate
    }

    fn ticks_per_frame(&self) -> Option<i64> {
        self.clock().map(|c| c.ticks_per_frame)
    }

    fn insert_still(
        &mut self,
        track: TrackParity,
        media: &MediaItem,
        position_seconds: f64,
        duration_seconds: f64,
    ) -> Result<ClipId> {
        let clip = self.make_clip(media, position_seconds, duration_seconds)?;
        self.video_tracks[track.index()].insert_clip(clip)
    }

    fn insert_audio(
        &mut self,
        media: &MediaItem,
        position_seconds: f64,
        duration_seconds: f64,
    ) -> Result<ClipId> {
        let clip = self.make_clip(media, position_seconds, duration_seconds)?;
        self.audio_track.insert_clip(clip)
    }

    fn insert_captions(&mut self, cues: &[CaptionCue]) -> Result<usize> {
        self.captions = cues
            .iter()
            .filter(|cue| cue.end() > cue.start())
            .cloned()
            .collect();
        self.captions.sort_by_key(|cue| cue.start());
        Ok(self.captions.len())
    }

    fn clip_bounds(&self) -> Result<Vec<ClipBounds>> {
        let parities = [TrackParity::A, TrackParity::B];
        Ok(self
            .video_tracks
            .iter()
            .zip(parities)
            .flat_map(|(track, parity)| {
                track.clips.iter().map(move |clip| ClipBounds {
                    clip: clip.id,
                    track: parity,
                    start_ticks: clip.start_ticks,
                    end_ticks: clip.end_ticks,
                })
            })
            .collect())
    }

    fn set_clip_end(&mut self, clip: ClipId, end_ticks: i64) -> Result<()> {
        for track in &mut self.video_tracks {
            let locked = track.locked;
            let name = track.name.clone();
            if let Some(found) = track.find_clip_mut(clip) {
                if locked {
                    return Err(SlideError::Timeline(format!("Track {} is locked", name)));
                }
                if end_ticks <= found.start_ticks {
                    return Err(SlideError::InvalidParameter(format!(
                        "End {} is not after start {} for clip {}",
                        end_ticks, found.start_ticks, clip
                    )));
                }
                found.end_ticks = end_ticks;
                return Ok(());
            }
        }
        Err(SlideError::NotFound(format!("Clip {}", clip)))
    }
}

impl Default for SlideSequence {
    fn default() -> Self {
        Self::new("Slideshow", FrameRate::FPS_30, TickClock::HOST_TICKS_PER_SECOND)
    }
}
