//! Atlas composition.
//!
//! [`compose`] lays every frame of a [`FrameSequence`] onto one canvas:
//! frames are resampled to the tile size, run through the tile effects, and
//! pasted in row-major order. With border trimming enabled the finished
//! canvas is cropped to its non-transparent content.
//!
//! # Example
//!
//! ```no_run
//! use gifatlas::{AtlasError, AtlasOptions, FrameSequence};
//!
//! let frames = FrameSequence::open("input.gif")?;
//! let atlas = gifatlas::compose(&frames, &AtlasOptions::new().with_canvas_size(1024, 1024))?;
//! println!("{}x{} tiles of {}x{}", atlas.grid.columns, atlas.grid.rows, atlas.tile_width, atlas.tile_height);
//! atlas.image.save("atlas.png")?;
//! # Ok::<(), AtlasError>(())
//! ```

use image::{DynamicImage, RgbaImage, imageops, imageops::FilterType};

use crate::config::AtlasOptions;
use crate::effects::{self, EffectParameters};
use crate::error::AtlasError;
use crate::frames::FrameSequence;
use crate::layout::{GridSpec, compute_grid, compute_tile_size};
use crate::progress::{OperationType, ProgressCallback, ProgressTracker};

/// Preview edge length used when the requested preview size is zero.
pub const DEFAULT_PREVIEW_SIZE: u32 = 256;

/// Resampling filter for tiles and previews.
pub(crate) const RESAMPLE_FILTER: FilterType = FilterType::Lanczos3;

/// A composed texture atlas.
#[derive(Debug, Clone)]
pub struct Atlas {
    /// The composited (and possibly cropped) pixels.
    pub image: RgbaImage,
    /// Grid the frames were laid out on.
    pub grid: GridSpec,
    /// Width of one tile in pixels.
    pub tile_width: u32,
    /// Height of one tile in pixels.
    pub tile_height: u32,
    /// Whether border trimming cropped the canvas.
    pub trimmed: bool,
}

impl Atlas {
    /// Final `(width, height)` of the atlas image.
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Consume the atlas and return the image.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }
}

/// Compose every frame of `frames` into one atlas.
///
/// # Errors
///
/// Returns [`AtlasError::EmptyFrameSequence`] when there are no frames,
/// [`AtlasError::InvalidDimension`] when the canvas cannot be resolved or is
/// too small to give every tile at least one pixel, and
/// [`AtlasError::InvalidParameter`] when the tile effects are out of range.
pub fn compose(frames: &FrameSequence, options: &AtlasOptions) -> Result<Atlas, AtlasError> {
    if frames.is_empty() {
        return Err(AtlasError::EmptyFrameSequence);
    }
    options.effects.validate()?;

    let grid = compute_grid(frames.len())?;
    let (canvas_width, canvas_height) = options.resolve_canvas_size()?;
    let (tile_width, tile_height) = compute_tile_size(canvas_width, canvas_height, grid);
    check_tile_size(tile_width, tile_height)?;

    log::debug!(
        "Composing {} frames into {}x{} canvas ({}x{} grid, tile {}x{}, borderless={})",
        frames.len(),
        canvas_width,
        canvas_height,
        grid.columns,
        grid.rows,
        tile_width,
        tile_height,
        options.borderless,
    );

    // The fill is complete before any tile is pasted.
    let mut canvas = RgbaImage::from_pixel(canvas_width, canvas_height, options.background);

    let tiles = render_frames(
        frames.frames(),
        tile_width,
        tile_height,
        &options.effects,
        options.progress.clone(),
        OperationType::Composition,
    );

    for (index, tile) in tiles.iter().enumerate() {
        let (x, y) = grid.tile_origin(index, tile_width, tile_height);
        imageops::replace(&mut canvas, tile, i64::from(x), i64::from(y));
    }

    let mut trimmed = false;
    if options.borderless {
        if let Some((x, y, width, height)) = opaque_bounds(&canvas) {
            if (width, height) != canvas.dimensions() {
                let cropped = imageops::crop_imm(&canvas, x, y, width, height).to_image();
                canvas = cropped;
                trimmed = true;
                log::debug!("Trimmed atlas to {width}x{height} at ({x}, {y})");
            }
        } else {
            log::debug!("Atlas is fully transparent, leaving it uncropped");
        }
    }

    Ok(Atlas {
        image: canvas,
        grid,
        tile_width,
        tile_height,
        trimmed,
    })
}

/// Render a single frame the way the preview pane shows it.
///
/// The frame is resampled to `width × height` (either dimension `0` falls
/// back to [`DEFAULT_PREVIEW_SIZE`]) and run through `effects`.
///
/// # Errors
///
/// Returns [`AtlasError::IndexOutOfRange`] for a bad `index`, or
/// [`AtlasError::InvalidParameter`] for out-of-range effects.
pub fn render_preview(
    frames: &FrameSequence,
    index: usize,
    width: u32,
    height: u32,
    effects: &EffectParameters,
) -> Result<RgbaImage, AtlasError> {
    effects.validate()?;
    let frame = frames.get(index)?;
    let width = if width == 0 { DEFAULT_PREVIEW_SIZE } else { width };
    let height = if height == 0 { DEFAULT_PREVIEW_SIZE } else { height };
    Ok(render_tile(frame, width, height, effects))
}

/// Tight bounding box `(x, y, width, height)` of all pixels whose alpha is
/// not zero. `None` for a fully transparent image.
///
/// Only opacity counts: a transparent gap between tiles is trimmed exactly
/// like a transparent margin inside a tile.
pub fn opaque_bounds(image: &RgbaImage) -> Option<(u32, u32, u32, u32)> {
    let mut bounds: Option<(u32, u32, u32, u32)> = None;
    for (x, y, pixel) in image.enumerate_pixels() {
        if pixel[3] == 0 {
            continue;
        }
        bounds = Some(match bounds {
            None => (x, y, x, y),
            Some((left, top, right, bottom)) => {
                (left.min(x), top.min(y), right.max(x), bottom.max(y))
            }
        });
    }
    bounds.map(|(left, top, right, bottom)| (left, top, right - left + 1, bottom - top + 1))
}

pub(crate) fn check_tile_size(tile_width: u32, tile_height: u32) -> Result<(), AtlasError> {
    if tile_width == 0 {
        return Err(AtlasError::InvalidDimension {
            name: "tile width",
            value: 0,
        });
    }
    if tile_height == 0 {
        return Err(AtlasError::InvalidDimension {
            name: "tile height",
            value: 0,
        });
    }
    Ok(())
}

/// Resample one frame and apply effects to it.
pub(crate) fn render_tile(
    frame: &DynamicImage,
    width: u32,
    height: u32,
    effects: &EffectParameters,
) -> RgbaImage {
    let resized = if (frame.width(), frame.height()) == (width, height) {
        frame.to_rgba8()
    } else {
        frame.resize_exact(width, height, RESAMPLE_FILTER).to_rgba8()
    };
    effects::apply_rgba(resized, effects)
}

/// Resample and filter every frame, returning tiles in frame order.
#[cfg(not(feature = "rayon"))]
pub(crate) fn render_frames(
    frames: &[DynamicImage],
    width: u32,
    height: u32,
    effects: &EffectParameters,
    progress: std::sync::Arc<dyn ProgressCallback>,
    operation: OperationType,
) -> Vec<RgbaImage> {
    let mut tracker = ProgressTracker::new(progress, operation, Some(frames.len() as u64));
    frames
        .iter()
        .enumerate()
        .map(|(index, frame)| {
            let tile = render_tile(frame, width, height, effects);
            tracker.advance(Some(index));
            tile
        })
        .collect()
}

/// Resample and filter every frame, returning tiles in frame order.
#[cfg(feature = "rayon")]
pub(crate) fn render_frames(
    frames: &[DynamicImage],
    width: u32,
    height: u32,
    effects: &EffectParameters,
    progress: std::sync::Arc<dyn ProgressCallback>,
    operation: OperationType,
) -> Vec<RgbaImage> {
    let tracker = ProgressTracker::new(progress, operation, Some(frames.len() as u64));
    crate::rayon::render_frames_parallel(frames, width, height, effects, tracker)
}
