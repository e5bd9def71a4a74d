//! Animated GIF export tests.
//!
//! These tests only run when the `gif` feature is enabled:
//!
//! ```bash
//! cargo test --features gif --test gif_export
//! ```

#![cfg(feature = "gif")]

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use gifatlas::gif::{export_gif, export_gif_to_memory};
use gifatlas::{
    AtlasError, EffectParameters, FrameSequence, GifOptions, OperationType, ProgressCallback,
    ProgressInfo,
};
use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage, Rgba, RgbaImage};

fn frames(count: usize, width: u32, height: u32) -> FrameSequence {
    FrameSequence::from_frames(
        (0..count)
            .map(|index| {
                let shade = (index * 60) as u8;
                DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                    width,
                    height,
                    Rgba([shade, 255 - shade, 0, 255]),
                ))
            })
            .collect(),
    )
}

fn decode(bytes: &[u8]) -> Vec<image::Frame> {
    GifDecoder::new(Cursor::new(bytes))
        .unwrap()
        .into_frames()
        .collect_frames()
        .unwrap()
}

// ── GifOptions ───────────────────────────────────────────────────

#[test]
fn options_defaults() {
    let options = GifOptions::new();
    assert_eq!(options.width, None);
    assert_eq!(options.height, None);
    assert_eq!(options.frame_delay, 10);
    assert_eq!(options.repeat, None);
    assert_eq!(options.effects, EffectParameters::new());
}

#[test]
fn frame_delay_from_duration_rounds_to_hundredths() {
    let options = GifOptions::new().frame_delay_duration(Duration::from_millis(44));
    assert_eq!(options.frame_delay, 4);
    let options = GifOptions::new().frame_delay_duration(Duration::from_millis(46));
    assert_eq!(options.frame_delay, 5);
}

// ── Encoding ─────────────────────────────────────────────────────

#[test]
fn export_keeps_every_frame() {
    let bytes = export_gif_to_memory(&frames(3, 12, 8), &GifOptions::new()).unwrap();
    assert!(bytes.starts_with(b"GIF89a"));

    let decoded = decode(&bytes);
    assert_eq!(decoded.len(), 3);
    for frame in &decoded {
        assert_eq!(frame.buffer().dimensions(), (12, 8));
        assert_eq!(Duration::from(frame.delay()), Duration::from_millis(100));
    }
}

#[test]
fn export_resamples_to_requested_size() {
    let options = GifOptions::new().size(20, 10).frame_delay(5);
    let bytes = export_gif_to_memory(&frames(2, 12, 8), &options).unwrap();

    let decoded = decode(&bytes);
    assert_eq!(decoded.len(), 2);
    for frame in &decoded {
        assert_eq!(frame.buffer().dimensions(), (20, 10));
        assert_eq!(Duration::from(frame.delay()), Duration::from_millis(50));
    }
}

#[test]
fn export_applies_effects() {
    let options = GifOptions::new().effects(EffectParameters::new().with_color_intensity(0.0));
    let bytes = export_gif_to_memory(&frames(2, 6, 6), &options).unwrap();

    for frame in decode(&bytes) {
        assert!(frame.buffer().pixels().all(|pixel| pixel.0 == [255, 255, 255, 255]));
    }
}

#[test]
fn export_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.gif");
    export_gif(&path, &frames(4, 8, 8), &GifOptions::new()).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert_eq!(decode(&bytes).len(), 4);
}

// ── Errors ───────────────────────────────────────────────────────

#[test]
fn export_rejects_empty_sequence() {
    match export_gif_to_memory(&FrameSequence::new(), &GifOptions::new()) {
        Err(AtlasError::EmptyFrameSequence) => {}
        other => panic!("Expected EmptyFrameSequence, got: {other:?}"),
    }
}

#[test]
fn export_rejects_oversized_dimensions() {
    let options = GifOptions::new().size(70_000, 10);
    match export_gif_to_memory(&frames(1, 4, 4), &options) {
        Err(AtlasError::InvalidDimension { name, value }) => {
            assert_eq!(name, "GIF width");
            assert_eq!(value, 70_000);
        }
        other => panic!("Expected InvalidDimension, got: {other:?}"),
    }
}

#[test]
fn export_rejects_zero_size() {
    let options = GifOptions::new().size(0, 10);
    assert!(matches!(
        export_gif_to_memory(&frames(1, 4, 4), &options),
        Err(AtlasError::InvalidDimension { .. })
    ));
}

#[test]
fn failed_export_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.gif");
    assert!(export_gif(&path, &FrameSequence::new(), &GifOptions::new()).is_err());
    assert!(!path.exists());
}

#[test]
fn failed_write_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.gif");
    std::fs::create_dir(&path).unwrap();

    match export_gif(&path, &frames(2, 4, 4), &GifOptions::new()) {
        Err(AtlasError::EncodeFailure(message)) => assert!(message.contains("out.gif")),
        other => panic!("Expected EncodeFailure, got: {other:?}"),
    }
    assert!(path.is_dir());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}

// ── Progress ─────────────────────────────────────────────────────

struct CountingProgress {
    count: AtomicUsize,
}

impl ProgressCallback for CountingProgress {
    fn on_progress(&self, info: &ProgressInfo) {
        assert_eq!(info.operation, OperationType::GifExport);
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn progress_reports_every_frame() {
    let counter = Arc::new(CountingProgress {
        count: AtomicUsize::new(0),
    });
    let options = GifOptions::new().progress(counter.clone());
    export_gif_to_memory(&frames(4, 6, 6), &options).unwrap();
    assert_eq!(counter.count.load(Ordering::SeqCst), 4);
}
