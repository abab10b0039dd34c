//! Integration tests for the slideshow workflow.
//!
//! Exercises a folder of images and a voiceover going through
//! slidecut-media scanning and slidecut-timeline assembly.

use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use slidecut_core::{seconds_to_frames, FrameRate, TickClock};
use slidecut_media::{scan_folder, srt};
use slidecut_timeline::{
    assemble, ClipBounds, MediaItem, SlideSequence, SlideshowConfig, SlideshowReport,
    SlideshowRequest, TimelineHost, TrackParity,
};
use std::path::Path;
use tempfile::TempDir;

// ── Helpers ────────────────────────────────────────────────────

fn photo_folder(count: usize) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for i in (1..=count).rev() {
        std::fs::write(dir.path().join(format!("img{}.jpg", i)), b"jpeg").unwrap();
    }
    std::fs::write(dir.path().join("notes.txt"), b"not an image").unwrap();
    dir
}

fn request(folder: &Path, seconds: f64) -> SlideshowRequest {
    let config = SlideshowConfig::default();
    SlideshowRequest {
        name: "Holiday".to_string(),
        images: scan_folder(folder, &config.image_extensions).unwrap(),
        voice: MediaItem::new(folder.join("voice.wav")),
        voice_duration_seconds: seconds,
        captions: None,
    }
}

fn sorted_bounds(seq: &SlideSequence) -> Vec<ClipBounds> {
    let mut bounds = seq.clip_bounds().unwrap();
    bounds.sort_by_key(|b| (b.start_ticks, b.end_ticks));
    bounds
}

fn assert_contiguous(bounds: &[ClipBounds]) {
    assert_eq!(bounds.first().map(|b| b.start_ticks), Some(0));
    for pair in bounds.windows(2) {
        assert_eq!(
            pair[0].end_ticks, pair[1].start_ticks,
            "gap or overlap between {:?} and {:?}",
            pair[0], pair[1]
        );
    }
}

fn run(seq: &mut SlideSequence, req: &SlideshowRequest, seed: u64) -> SlideshowReport {
    let config = SlideshowConfig::default();
    assemble(req, &config, seq, &mut StdRng::seed_from_u64(seed)).unwrap()
}

// ── Folder to timeline ─────────────────────────────────────────

#[test]
fn folder_images_alternate_tracks_in_natural_order() {
    let dir = photo_folder(12);
    let mut seq = SlideSequence::new("Holiday", FrameRate::FPS_25, TickClock::HOST_TICKS_PER_SECOND);
    let report = run(&mut seq, &request(dir.path(), 60.0), 3);

    assert_eq!(report.plan.len(), 12);
    assert_eq!(seq.video_clip_count(), 12);

    let names = |parity: TrackParity| -> Vec<String> {
        seq.video_tracks[parity.index()]
            .clips
            .iter()
            .map(|c| c.name.clone())
            .collect()
    };
    assert_eq!(names(TrackParity::A)[..3], ["img1.jpg", "img3.jpg", "img5.jpg"]);
    assert_eq!(names(TrackParity::B)[..3], ["img2.jpg", "img4.jpg", "img6.jpg"]);
}

#[test]
fn frames_cover_the_voiceover_exactly() {
    let dir = photo_folder(7);
    let mut seq = SlideSequence::new("Holiday", FrameRate::FPS_29_97, TickClock::HOST_TICKS_PER_SECOND);
    let report = run(&mut seq, &request(dir.path(), 93.4), 11);

    let expected = seconds_to_frames(93.4, FrameRate::FPS_29_97);
    assert_eq!(report.plan.sum(), expected);
    assert_eq!(report.placement.total_frames(), expected);
    let video_end = sorted_bounds(&seq).last().map(|b| b.end_ticks);
    assert_eq!(video_end, Some(expected * report.clock.ticks_per_frame));
}

#[test]
fn exact_host_needs_no_gap_fix() {
    let dir = photo_folder(9);
    let mut seq = SlideSequence::new("Holiday", FrameRate::FPS_30, TickClock::HOST_TICKS_PER_SECOND);
    let report = run(&mut seq, &request(dir.path(), 47.0), 1);

    assert_eq!(report.gap_fix.gaps_closed(), 0);
    assert_eq!(report.gap_fix.overlaps, 0);
    assert_contiguous(&sorted_bounds(&seq));
}

#[test]
fn rounding_host_is_made_contiguous() {
    let dir = photo_folder(10);
    let mut seq = SlideSequence::new("Holiday", FrameRate::FPS_29_97, TickClock::HOST_TICKS_PER_SECOND)
        .with_quantum(1_000_003);
    let report = run(&mut seq, &request(dir.path(), 41.3), 8);

    for fix in &report.gap_fix.fixes {
        assert!(fix.gap_ticks() > 0 && fix.gap_ticks() < 1_000_003);
    }
    assert_eq!(report.gap_fix.overlaps, 0);
    assert_contiguous(&sorted_bounds(&seq));
}

#[test]
fn same_seed_same_durations() {
    let dir = photo_folder(6);
    let req = request(dir.path(), 40.0);

    let mut a = SlideSequence::default();
    let mut b = SlideSequence::default();
    let first = run(&mut a, &req, 42);
    let second = run(&mut b, &req, 42);

    assert_eq!(first.plan.frames, second.plan.frames);
    assert_eq!(sorted_bounds(&a).len(), sorted_bounds(&b).len());
}

#[test]
fn missing_frame_rate_uses_configured_fallback() {
    let dir = photo_folder(4);
    let mut seq = SlideSequence::default().without_frame_rate();
    let config = SlideshowConfig {
        fallback_frame_rate: FrameRate::FPS_24,
        max_variation_seconds: 0.0,
        ..Default::default()
    };
    let report = assemble(
        &request(dir.path(), 10.0),
        &config,
        &mut seq,
        &mut StdRng::seed_from_u64(0),
    )
    .unwrap();

    assert!(report.used_fallback_rate);
    assert_eq!(report.plan.frames, vec![60, 60, 60, 60]);
}

// ── Captions and persistence ───────────────────────────────────

#[test]
fn srt_captions_land_on_the_sequence() {
    let dir = photo_folder(3);
    let srt_path = dir.path().join("voice.srt");
    std::fs::write(
        &srt_path,
        "1\r\n00:00:00,500 --> 00:00:02,000\r\nWelcome\r\n\r\n2\r\n00:00:02,500 --> 00:00:04,000\r\nto the coast\r\n",
    )
    .unwrap();

    let mut req = request(dir.path(), 12.0);
    req.captions = Some(srt::parse_file(&srt_path).unwrap());

    let mut seq = SlideSequence::default();
    let report = run(&mut seq, &req, 2);

    assert_eq!(report.captions_imported, 2);
    assert_eq!(seq.captions.len(), 2);
    assert_eq!(seq.captions[1].text, "to the coast");
}

#[test]
fn sequence_survives_a_save_and_load() {
    let dir = photo_folder(5);
    let mut seq = SlideSequence::default().with_quantum(7);
    run(&mut seq, &request(dir.path(), 20.0), 9);

    let path = dir.path().join("Holiday.json");
    seq.save_to_file(&path).unwrap();
    let loaded = SlideSequence::load_from_file(&path).unwrap();

    assert_eq!(loaded.name, seq.name);
    assert_eq!(sorted_bounds(&loaded), sorted_bounds(&seq));
    assert_eq!(loaded.audio_track.clip_count(), 1);
}

// ── Properties ─────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn assembled_timeline_is_gapless(
        count in 1usize..40,
        extra_seconds in 0.0f64..120.0,
        quantum in 1i64..5_000_000,
        seed in any::<u64>(),
    ) {
        let images: Vec<MediaItem> = (0..count)
            .map(|i| MediaItem::new(format!("/photos/{}.jpg", i)))
            .collect();
        let seconds = count as f64 + extra_seconds;
        let req = SlideshowRequest {
            name: "Prop".to_string(),
            images,
            voice: MediaItem::new("/audio/voice.wav"),
            voice_duration_seconds: seconds,
            captions: None,
        };
        let mut seq = SlideSequence::new("Prop", FrameRate::FPS_25, TickClock::HOST_TICKS_PER_SECOND)
            .with_quantum(quantum);
        let report = run(&mut seq, &req, seed);

        prop_assert_eq!(report.plan.sum(), seconds_to_frames(seconds, FrameRate::FPS_25));
        prop_assert!(report.plan.frames.iter().all(|&f| f >= 1));

        let bounds = sorted_bounds(&seq);
        prop_assert_eq!(bounds.len(), count);
        prop_assert_eq!(bounds[0].start_ticks, 0);
        for pair in bounds.windows(2) {
            prop_assert_eq!(pair[0].end_ticks, pair[1].start_ticks);
        }
    }
}
