//! Parallel tile rendering.
//!
//! Resampling and effects are independent per frame, so with the `rayon`
//! feature they run on the rayon thread pool. Tiles come back in frame
//! order and are pasted sequentially by the caller, so the atlas is
//! identical to the one the sequential path produces.

use std::sync::Mutex;

use ::rayon::iter::{IndexedParallelIterator, IntoParallelRefIterator, ParallelIterator};
use image::{DynamicImage, RgbaImage};

use crate::compose::render_tile;
use crate::effects::EffectParameters;
use crate::progress::ProgressTracker;

/// Render every frame on the rayon pool.
///
/// `collect` on an indexed parallel iterator keeps input order regardless of
/// which worker finishes first.
pub(crate) fn render_frames_parallel(
    frames: &[DynamicImage],
    width: u32,
    height: u32,
    effects: &EffectParameters,
    tracker: ProgressTracker,
) -> Vec<RgbaImage> {
    let tracker = Mutex::new(tracker);

    frames
        .par_iter()
        .enumerate()
        .map(|(index, frame)| {
            let tile = render_tile(frame, width, height, effects);
            if let Ok(mut tracker) = tracker.lock() {
                tracker.advance(Some(index));
            }
            tile
        })
        .collect()
}
