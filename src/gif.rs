//! Animated GIF export.
//!
//! This module provides [`GifOptions`] for configuring animated GIF output
//! and [`export_gif`] / [`export_gif_to_memory`], which resample every frame
//! to one uniform size, apply the preview effects, and encode the result as
//! an endlessly looping GIF.
//!
//! # Example
//!
//! ```no_run
//! use gifatlas::{AtlasError, EffectParameters, FrameSequence, GifOptions};
//!
//! let frames = FrameSequence::open("input.gif")?;
//! let options = GifOptions::new()
//!     .size(256, 256)
//!     .effects(EffectParameters::new().with_grayscale(true));
//!
//! gifatlas::gif::export_gif("gray.gif", &frames, &options)?;
//! # Ok::<(), AtlasError>(())
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use gif::{Encoder, Frame, Repeat};

use crate::compose::{check_tile_size, render_frames};
use crate::effects::EffectParameters;
use crate::error::AtlasError;
use crate::export::write_atomically;
use crate::frames::FrameSequence;
use crate::progress::{NoOpProgress, OperationType, ProgressCallback};

/// Configuration for animated GIF export.
///
/// Controls output dimensions, frame delay, repeat behaviour, and effects.
#[derive(Clone)]
#[must_use]
pub struct GifOptions {
    /// Target width in pixels. `None` keeps the first frame's width.
    pub width: Option<u32>,
    /// Target height in pixels. `None` keeps the first frame's height.
    pub height: Option<u32>,
    /// Delay between frames in hundredths of a second (default: 10 = 100 ms).
    pub frame_delay: u16,
    /// How many times the GIF should repeat. `None` means loop forever.
    pub repeat: Option<u16>,
    /// Effects applied to every frame after resampling.
    pub effects: EffectParameters,
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

impl std::fmt::Debug for GifOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GifOptions")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("frame_delay", &self.frame_delay)
            .field("repeat", &self.repeat)
            .field("effects", &self.effects)
            .finish()
    }
}

impl Default for GifOptions {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            frame_delay: 10,
            repeat: None,
            effects: EffectParameters::default(),
            progress: Arc::new(NoOpProgress),
        }
    }
}

impl GifOptions {
    /// Create a new [`GifOptions`] with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resample every frame to exactly `width × height`.
    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    /// Set the delay between frames in hundredths of a second.
    ///
    /// For example, `10` = 100 ms between frames ≈ 10 fps.
    pub fn frame_delay(mut self, delay: u16) -> Self {
        self.frame_delay = delay;
        self
    }

    /// Set the frame delay from a [`Duration`], rounded to the nearest
    /// hundredth of a second.
    pub fn frame_delay_duration(self, delay: Duration) -> Self {
        let hundredths = (delay.as_secs_f64() * 100.0).round();
        self.frame_delay(hundredths.clamp(0.0, f64::from(u16::MAX)) as u16)
    }

    /// Set the repeat count. `None` means loop forever.
    pub fn repeat(mut self, repeat: Option<u16>) -> Self {
        self.repeat = repeat;
        self
    }

    /// Set the effects applied to every frame.
    pub fn effects(mut self, effects: EffectParameters) -> Self {
        self.effects = effects;
        self
    }

    /// Attach a progress callback, invoked once per rendered frame.
    pub fn progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }
}

/// Encode the sequence as an animated GIF at `path`.
///
/// # Errors
///
/// Returns [`AtlasError::EmptyFrameSequence`] for an empty sequence,
/// [`AtlasError::InvalidDimension`] for a size GIF cannot represent, and
/// [`AtlasError::EncodeFailure`] if encoding or writing fails.
pub fn export_gif<P: AsRef<Path>>(
    path: P,
    frames: &FrameSequence,
    options: &GifOptions,
) -> Result<(), AtlasError> {
    let bytes = export_gif_to_memory(frames, options)?;
    write_atomically(path.as_ref(), &bytes)
}

/// Encode the sequence as an animated GIF into memory.
///
/// Returns the raw GIF bytes.
pub fn export_gif_to_memory(
    frames: &FrameSequence,
    options: &GifOptions,
) -> Result<Vec<u8>, AtlasError> {
    if frames.is_empty() {
        return Err(AtlasError::EmptyFrameSequence);
    }
    options.effects.validate()?;

    let first = &frames.frames()[0];
    let width = options.width.unwrap_or(first.width());
    let height = options.height.unwrap_or(first.height());
    check_tile_size(width, height)?;
    let gif_width = gif_dimension("GIF width", width)?;
    let gif_height = gif_dimension("GIF height", height)?;

    log::debug!(
        "Encoding {} frames to GIF ({}x{}, delay={})",
        frames.len(),
        width,
        height,
        options.frame_delay,
    );

    let rendered = render_frames(
        frames.frames(),
        width,
        height,
        &options.effects,
        options.progress.clone(),
        OperationType::GifExport,
    );

    let mut buffer = Vec::new();
    {
        let mut encoder = Encoder::new(&mut buffer, gif_width, gif_height, &[])
            .map_err(|e| AtlasError::EncodeFailure(format!("Failed to create GIF encoder: {e}")))?;

        let repeat = match options.repeat {
            None => Repeat::Infinite,
            Some(n) => Repeat::Finite(n),
        };
        encoder
            .set_repeat(repeat)
            .map_err(|e| AtlasError::EncodeFailure(format!("Failed to set GIF repeat: {e}")))?;

        for image in rendered {
            let mut pixels = image.into_raw();

            let mut gif_frame = Frame::from_rgba_speed(gif_width, gif_height, &mut pixels, 10);
            gif_frame.delay = options.frame_delay;

            encoder.write_frame(&gif_frame).map_err(|e| {
                AtlasError::EncodeFailure(format!("Failed to write GIF frame: {e}"))
            })?;
        }
    }

    Ok(buffer)
}

fn gif_dimension(name: &'static str, value: u32) -> Result<u16, AtlasError> {
    u16::try_from(value).map_err(|_| AtlasError::InvalidDimension {
        name,
        value: i64::from(value),
    })
}
