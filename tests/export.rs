//! Raster export tests.

use gifatlas::export::{encode_texture, save_atlas, save_texture};
use gifatlas::{AtlasError, AtlasOptions, FrameSequence, RasterFormat};
use image::{ColorType, DynamicImage, Rgba, RgbaImage};

fn half_transparent() -> RgbaImage {
    RgbaImage::from_fn(8, 6, |x, _| {
        if x < 4 {
            Rgba([200, 100, 50, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    })
}

// ── RasterFormat ─────────────────────────────────────────────────

#[test]
fn format_extensions() {
    assert_eq!(RasterFormat::default(), RasterFormat::Png);
    assert_eq!(RasterFormat::Png.extension(), "png");
    assert_eq!(RasterFormat::Jpeg.extension(), "jpg");
    assert_eq!(RasterFormat::Bmp.to_string(), "bmp");
}

#[test]
fn format_lookup() {
    assert_eq!(RasterFormat::from_extension("JPEG"), Some(RasterFormat::Jpeg));
    assert_eq!(RasterFormat::from_extension(".bmp"), Some(RasterFormat::Bmp));
    assert_eq!(RasterFormat::from_extension("tga"), None);
    assert_eq!(RasterFormat::from_path("out/atlas.jpg"), RasterFormat::Jpeg);
    assert_eq!(RasterFormat::from_path("out/atlas"), RasterFormat::Png);
    assert!(!RasterFormat::Jpeg.supports_alpha());
    assert!(RasterFormat::Png.supports_alpha());
}

// ── Encoding ─────────────────────────────────────────────────────

#[test]
fn png_keeps_alpha_losslessly() {
    let image = half_transparent();
    let bytes = encode_texture(&image, RasterFormat::Png).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.to_rgba8(), image);
}

#[test]
fn jpeg_is_flattened_to_rgb() {
    let bytes = encode_texture(&half_transparent(), RasterFormat::Jpeg).unwrap();
    assert!(bytes.starts_with(&[0xFF, 0xD8]), "JPEG magic");
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.color(), ColorType::Rgb8);
    assert_eq!((decoded.width(), decoded.height()), (8, 6));
}

#[test]
fn bmp_round_trips_dimensions() {
    let bytes = encode_texture(&half_transparent(), RasterFormat::Bmp).unwrap();
    assert!(bytes.starts_with(b"BM"));
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (8, 6));
}

// ── Saving ───────────────────────────────────────────────────────

#[test]
fn save_atlas_uses_texture_naming() {
    let tile = DynamicImage::ImageRgba8(RgbaImage::from_pixel(10, 10, Rgba([0, 128, 255, 255])));
    let frames = FrameSequence::from_frames(vec![tile; 10]);
    let atlas = gifatlas::compose(&frames, &AtlasOptions::new().with_canvas_size(40, 30)).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = save_atlas(&atlas, dir.path(), "anim", 10.0, RasterFormat::Png).unwrap();

    assert_eq!(path.file_name().unwrap(), "anim;4;3;10;0.png");
    let saved = image::open(&path).unwrap();
    assert_eq!((saved.width(), saved.height()), (40, 30));
}

#[test]
fn save_texture_reports_write_failures() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing").join("atlas.png");
    match save_texture(&half_transparent(), &path, RasterFormat::Png) {
        Err(AtlasError::EncodeFailure(message)) => assert!(message.contains("atlas.png")),
        other => panic!("Expected EncodeFailure, got: {other:?}"),
    }
    assert!(!path.exists());
}

#[test]
fn failed_save_leaves_nothing_behind() {
    let dir = tempfile::tempdir().unwrap();
    // A directory squatting on the target name makes the final rename fail
    // after the bytes were staged.
    let path = dir.path().join("anim;4;3;10;0.png");
    std::fs::create_dir(&path).unwrap();

    match save_texture(&half_transparent(), &path, RasterFormat::Png) {
        Err(AtlasError::EncodeFailure(message)) => assert!(message.contains("anim;4;3;10;0.png")),
        other => panic!("Expected EncodeFailure, got: {other:?}"),
    }
    assert!(path.is_dir());
    let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "Staged temporary file should be removed");
}

#[test]
fn save_replaces_an_existing_texture_whole() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("atlas.png");
    save_texture(&RgbaImage::new(64, 64), &path, RasterFormat::Png).unwrap();
    save_texture(&half_transparent(), &path, RasterFormat::Png).unwrap();

    let saved = image::open(&path).unwrap();
    assert_eq!(saved.to_rgba8(), half_transparent());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
}
