//! Atlas configuration.
//!
//! [`AtlasOptions`] is a builder that carries everything a composition needs
//! (canvas size, background, border trimming, tile effects, and an optional
//! progress callback) as one immutable value.
//!
//! # Example
//!
//! ```
//! use gifatlas::{AtlasOptions, EffectParameters};
//! use image::Rgba;
//!
//! let options = AtlasOptions::new()
//!     .with_canvas_size(1024, 1024)
//!     .with_background(Rgba([0, 0, 0, 255]))
//!     .with_borderless(true)
//!     .with_effects(EffectParameters::new().with_sharpen(2.5));
//!
//! assert_eq!(options.resolve_canvas_size().unwrap(), (1024, 1024));
//! ```

use std::fmt::{Debug, Formatter, Result as FmtResult};
use std::sync::Arc;

use image::Rgba;

use crate::effects::EffectParameters;
use crate::error::AtlasError;
use crate::progress::{NoOpProgress, ProgressCallback};

/// Canvas edge length used when a requested dimension is not positive.
pub const DEFAULT_CANVAS_SIZE: u32 = 2048;

/// Fully transparent black, the default atlas background.
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Configuration for atlas composition.
///
/// All fields have defaults: a 2048×2048 transparent canvas, no border
/// trimming, no tile effects, no progress reporting.
#[derive(Clone)]
#[must_use]
pub struct AtlasOptions {
    /// Requested canvas width. Non-positive means [`DEFAULT_CANVAS_SIZE`].
    pub(crate) canvas_width: i64,
    /// Requested canvas height. Non-positive means [`DEFAULT_CANVAS_SIZE`].
    pub(crate) canvas_height: i64,
    /// Fill color for pixels no tile covers.
    pub(crate) background: Rgba<u8>,
    /// Crop fully transparent margins after composition.
    pub(crate) borderless: bool,
    /// Effects applied to each tile after resampling.
    pub(crate) effects: EffectParameters,
    /// Reject non-positive dimensions instead of substituting the default.
    pub(crate) strict_dimensions: bool,
    /// Progress callback. Defaults to a no-op.
    pub(crate) progress: Arc<dyn ProgressCallback>,
}

impl Debug for AtlasOptions {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("AtlasOptions")
            .field("canvas_width", &self.canvas_width)
            .field("canvas_height", &self.canvas_height)
            .field("background", &self.background)
            .field("borderless", &self.borderless)
            .field("effects", &self.effects)
            .field("strict_dimensions", &self.strict_dimensions)
            .finish()
    }
}

impl Default for AtlasOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl AtlasOptions {
    /// Create options with default settings.
    pub fn new() -> Self {
        Self {
            canvas_width: i64::from(DEFAULT_CANVAS_SIZE),
            canvas_height: i64::from(DEFAULT_CANVAS_SIZE),
            background: TRANSPARENT,
            borderless: false,
            effects: EffectParameters::default(),
            strict_dimensions: false,
            progress: Arc::new(NoOpProgress),
        }
    }

    /// Set the requested canvas size.
    ///
    /// Values of zero or below fall back to [`DEFAULT_CANVAS_SIZE`] unless
    /// [`with_strict_dimensions`](AtlasOptions::with_strict_dimensions) is set.
    pub fn with_canvas_size(mut self, width: i64, height: i64) -> Self {
        self.canvas_width = width;
        self.canvas_height = height;
        self
    }

    /// Set the background color. Defaults to fully transparent.
    pub fn with_background(mut self, color: Rgba<u8>) -> Self {
        self.background = color;
        self
    }

    /// Crop fully transparent margins from the finished atlas.
    pub fn with_borderless(mut self, borderless: bool) -> Self {
        self.borderless = borderless;
        self
    }

    /// Set the effects applied to every tile.
    pub fn with_effects(mut self, effects: EffectParameters) -> Self {
        self.effects = effects;
        self
    }

    /// Reject non-positive canvas dimensions with
    /// [`AtlasError::InvalidDimension`] instead of substituting the default.
    pub fn with_strict_dimensions(mut self, strict: bool) -> Self {
        self.strict_dimensions = strict;
        self
    }

    /// Attach a progress callback, invoked once per composed tile.
    pub fn with_progress(mut self, callback: Arc<dyn ProgressCallback>) -> Self {
        self.progress = callback;
        self
    }

    /// Background color.
    pub fn background(&self) -> Rgba<u8> {
        self.background
    }

    /// Whether transparent margins are cropped.
    pub fn borderless(&self) -> bool {
        self.borderless
    }

    /// Tile effects.
    pub fn effects(&self) -> &EffectParameters {
        &self.effects
    }

    /// Resolve the canvas size actually used for composition.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::InvalidDimension`] for a dimension that does not
    /// fit in a `u32`, or for a non-positive one under strict validation.
    pub fn resolve_canvas_size(&self) -> Result<(u32, u32), AtlasError> {
        Ok((
            resolve_dimension("canvas width", self.canvas_width, self.strict_dimensions)?,
            resolve_dimension("canvas height", self.canvas_height, self.strict_dimensions)?,
        ))
    }
}

fn resolve_dimension(name: &'static str, value: i64, strict: bool) -> Result<u32, AtlasError> {
    if value <= 0 {
        if strict {
            return Err(AtlasError::InvalidDimension { name, value });
        }
        log::warn!("{name} {value} is not positive, using {DEFAULT_CANVAS_SIZE}");
        return Ok(DEFAULT_CANVAS_SIZE);
    }
    u32::try_from(value).map_err(|_| AtlasError::InvalidDimension { name, value })
}
