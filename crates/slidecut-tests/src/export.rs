//! Integration tests for the manifest and the batch export queue.

use rand::rngs::StdRng;
use rand::SeedableRng;
use slidecut_core::{FrameRate, RationalTime, Result};
use slidecut_media::{ExportCancel, ExportJob, ExportPreset, ExportQueue, ExportTarget};
use slidecut_timeline::{
    assemble, Manifest, ManifestEntry, MediaItem, SlideSequence, SlideshowConfig,
    SlideshowRequest,
};
use std::path::{Path, PathBuf};

fn create(manifest: &mut Manifest, name: &str, count: usize, seconds: f64) {
    let request = SlideshowRequest {
        name: name.to_string(),
        images: (0..count)
            .map(|i| MediaItem::new(format!("/photos/{}/{}.jpg", name, i)))
            .collect(),
        voice: MediaItem::new(format!("/audio/{}.wav", name)),
        voice_duration_seconds: seconds,
        captions: None,
    };
    let mut seq = SlideSequence::new(name, FrameRate::FPS_25, 254_016_000_000);
    let report = assemble(
        &request,
        &SlideshowConfig::default(),
        &mut seq,
        &mut StdRng::seed_from_u64(7),
    )
    .unwrap();
    manifest.record(ManifestEntry::from_report(
        &report,
        format!("/photos/{}", name),
        format!("/audio/{}.wav", name),
        seconds,
        1_700_000_000,
    ));
}

#[derive(Default)]
struct RenderQueue {
    rendered: Vec<(String, PathBuf)>,
}

impl ExportTarget for RenderQueue {
    fn submit(&mut self, job: &ExportJob) -> Result<()> {
        self.rendered
            .push((job.sequence_name.clone(), job.output_path.clone()));
        Ok(())
    }
}

#[test]
fn manifest_round_trip_feeds_the_export_queue() {
    let dir = tempfile::tempdir().unwrap();
    let manifest_path = dir.path().join("state").join("manifest.json");

    let mut manifest = Manifest::new();
    create(&mut manifest, "Spring", 8, 32.0);
    create(&mut manifest, "Summer", 5, 20.0);
    manifest.save_to_file(&manifest_path).unwrap();

    let loaded = Manifest::load_from_file(&manifest_path).unwrap();
    assert_eq!(loaded, manifest);

    let queue = ExportQueue::from_manifest(&loaded, Path::new("/renders"), &ExportPreset::h264_hd(), &[]);
    assert_eq!(queue.len(), 2);
    assert_eq!(queue.jobs[0].output_path, PathBuf::from("/renders/Spring.mp4"));
    assert_eq!(queue.jobs[0].duration(), RationalTime::new(32, 1));
    assert_eq!(queue.jobs[1].duration(), RationalTime::new(20, 1));

    let mut target = RenderQueue::default();
    let summary = queue.dispatch(&mut target, |_| {}, &ExportCancel::new());
    assert_eq!(summary.submitted, vec!["Spring".to_string(), "Summer".to_string()]);
    assert_eq!(target.rendered.len(), 2);
}

#[test]
fn recreating_a_slideshow_replaces_its_entry() {
    let mut manifest = Manifest::new();
    create(&mut manifest, "Autumn", 4, 16.0);
    create(&mut manifest, "Autumn", 6, 30.0);

    assert_eq!(manifest.entries.len(), 1);
    let entry = manifest.find("Autumn").unwrap();
    assert_eq!(entry.image_count, 6);
    assert_eq!(entry.frames.iter().sum::<i64>(), 750);

    let queue = ExportQueue::from_manifest(&manifest, Path::new("/renders"), &ExportPreset::prores_422(), &[]);
    assert_eq!(queue.len(), 1);
    assert!(queue.jobs[0].output_path.ends_with("Autumn.mov"));
}
