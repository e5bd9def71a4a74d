//! Benchmarks for atlas composition, tile effects, and export.
//!
//! Run with: cargo bench
//! Run with all features: cargo bench --all-features
//!
//! Frames are synthesized in memory, so no fixtures are needed.

use std::hint::black_box;

use criterion::Criterion;
use gifatlas::{AtlasOptions, EffectParameters, FrameSequence, RasterFormat, effects};
use image::{DynamicImage, Rgba, RgbaImage};

#[cfg(feature = "gif")]
use gifatlas::GifOptions;

fn synthetic_frames(count: usize, width: u32, height: u32) -> FrameSequence {
    FrameSequence::from_frames(
        (0..count)
            .map(|index| {
                DynamicImage::ImageRgba8(RgbaImage::from_fn(width, height, |x, y| {
                    Rgba([
                        ((x + index as u32 * 7) % 256) as u8,
                        ((y * 3) % 256) as u8,
                        ((x ^ y) % 256) as u8,
                        if (x + y) % 11 == 0 { 0 } else { 255 },
                    ])
                }))
            })
            .collect(),
    )
}

fn benchmark_composition(criterion: &mut Criterion) {
    let frames = synthetic_frames(16, 128, 128);

    criterion.bench_function("compose 16 frames (512x512)", |bencher| {
        let options = AtlasOptions::new().with_canvas_size(512, 512);
        bencher.iter(|| {
            let _atlas = gifatlas::compose(black_box(&frames), &options).unwrap();
        });
    });

    criterion.bench_function("compose 16 frames (borderless)", |bencher| {
        let options = AtlasOptions::new()
            .with_canvas_size(512, 512)
            .with_borderless(true);
        bencher.iter(|| {
            let _atlas = gifatlas::compose(black_box(&frames), &options).unwrap();
        });
    });

    criterion.bench_function("compose 16 frames (all effects)", |bencher| {
        let effects = EffectParameters::new()
            .with_grayscale(true)
            .with_sharpen(2.5)
            .with_blur(1.0)
            .with_transparency(0.8)
            .with_color_intensity(0.7);
        let options = AtlasOptions::new()
            .with_canvas_size(512, 512)
            .with_effects(effects);
        bencher.iter(|| {
            let _atlas = gifatlas::compose(black_box(&frames), &options).unwrap();
        });
    });
}

fn benchmark_effects(criterion: &mut Criterion) {
    let frames = synthetic_frames(1, 256, 256);
    let frame = &frames.frames()[0];

    let mut group = criterion.benchmark_group("effects (256x256)");
    let cases = [
        ("grayscale", EffectParameters::new().with_grayscale(true)),
        ("sharpen", EffectParameters::new().with_sharpen(2.5)),
        ("blur", EffectParameters::new().with_blur(2.0)),
        ("transparency", EffectParameters::new().with_transparency(0.5)),
        ("color intensity", EffectParameters::new().with_color_intensity(0.9)),
    ];
    for (name, params) in cases {
        group.bench_function(name, |bencher| {
            bencher.iter(|| {
                let _tile = effects::apply(black_box(frame), &params);
            });
        });
    }
    group.finish();
}

fn benchmark_export(criterion: &mut Criterion) {
    let frames = synthetic_frames(9, 64, 64);
    let atlas = gifatlas::compose(&frames, &AtlasOptions::new().with_canvas_size(384, 384)).unwrap();

    let mut group = criterion.benchmark_group("encode atlas (384x384)");
    for format in [RasterFormat::Png, RasterFormat::Jpeg, RasterFormat::Bmp] {
        group.bench_function(format.to_string(), |bencher| {
            bencher.iter(|| {
                let _bytes = gifatlas::export::encode_texture(black_box(&atlas.image), format).unwrap();
            });
        });
    }
    group.finish();
}

#[cfg(feature = "gif")]
fn benchmark_gif_export(criterion: &mut Criterion) {
    let frames = synthetic_frames(8, 64, 64);

    criterion.bench_function("export 8-frame GIF", |bencher| {
        let options = GifOptions::new();
        bencher.iter(|| {
            let _bytes = gifatlas::gif::export_gif_to_memory(black_box(&frames), &options).unwrap();
        });
    });
}

#[cfg(not(feature = "gif"))]
fn benchmark_gif_export(_criterion: &mut Criterion) {}

criterion::criterion_group!(
    benches,
    benchmark_composition,
    benchmark_effects,
    benchmark_export,
    benchmark_gif_export,
);
criterion::criterion_main!(benches);
