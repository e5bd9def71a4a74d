//! Per-frame visual effects.
//!
//! [`apply`] runs a frame through a fixed, ordered pipeline of independently
//! toggleable adjustments:
//!
//! 1. grayscale
//! 2. sharpen
//! 3. Gaussian blur
//! 4. transparency (alpha scaling)
//! 5. color intensity (wash toward white below 0.5, saturate above it)
//!
//! The order is part of the contract. Every step works on RGBA8 and returns a
//! new buffer; the source frame is never touched. A disabled step leaves the
//! pixels alone no matter what its amount is set to.
//!
//! # Example
//!
//! ```
//! use gifatlas::{EffectParameters, effects};
//! use image::{DynamicImage, Rgba, RgbaImage};
//!
//! let frame = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([200, 40, 40, 255])));
//! let params = EffectParameters::new().with_grayscale(true).with_transparency(0.5);
//! params.validate()?;
//!
//! let out = effects::apply(&frame, &params);
//! assert_eq!(out.get_pixel(0, 0)[3], 127);
//! # Ok::<(), gifatlas::AtlasError>(())
//! ```

use image::{DynamicImage, Rgba, RgbaImage, imageops};

use crate::error::AtlasError;

/// Accepted range for [`EffectParameters::sharpen_amount`].
pub const SHARPEN_RANGE: (f32, f32) = (0.0, 10.0);
/// Accepted range for [`EffectParameters::blur_radius`].
pub const BLUR_RANGE: (f32, f32) = (0.0, 10.0);
/// Accepted range for [`EffectParameters::transparency_factor`].
pub const TRANSPARENCY_RANGE: (f32, f32) = (0.0, 1.0);
/// Accepted range for [`EffectParameters::color_intensity_level`].
pub const COLOR_INTENSITY_RANGE: (f32, f32) = (0.0, 1.0);
/// Color intensity level that leaves colors unchanged.
pub const NEUTRAL_COLOR_INTENSITY: f32 = 0.5;

/// Settings for one effect target.
///
/// Each effect has an on/off toggle and, where it makes sense, an amount.
/// The amounts keep their values while the toggle is off so a UI can flip
/// effects without losing the slider position.
#[derive(Debug, Clone, Copy, PartialEq)]
#[must_use]
pub struct EffectParameters {
    /// Collapse colors to luminance.
    pub grayscale: bool,
    /// Enable sharpening.
    pub sharpen: bool,
    /// Sharpening strength. `1.0` is the identity, larger values sharpen,
    /// smaller values soften.
    pub sharpen_amount: f32,
    /// Enable Gaussian blur.
    pub blur: bool,
    /// Blur radius in pixels. `0.0` disables the blur even when enabled.
    pub blur_radius: f32,
    /// Enable alpha scaling.
    pub transparency: bool,
    /// Alpha multiplier: `0.0` is fully transparent, `1.0` leaves alpha alone.
    pub transparency_factor: f32,
    /// Enable the color-intensity adjustment.
    pub color_intensity: bool,
    /// Color intensity: below `0.5` fades toward white, above `0.5` boosts
    /// saturation, `0.5` is neutral.
    pub color_intensity_level: f32,
}

impl Default for EffectParameters {
    fn default() -> Self {
        Self {
            grayscale: false,
            sharpen: false,
            sharpen_amount: 2.5,
            blur: false,
            blur_radius: 1.0,
            transparency: false,
            transparency_factor: 0.5,
            color_intensity: false,
            color_intensity_level: NEUTRAL_COLOR_INTENSITY,
        }
    }
}

impl EffectParameters {
    /// Create parameters with every effect disabled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle grayscale conversion.
    pub fn with_grayscale(mut self, enabled: bool) -> Self {
        self.grayscale = enabled;
        self
    }

    /// Enable sharpening with the given amount.
    pub fn with_sharpen(mut self, amount: f32) -> Self {
        self.sharpen = true;
        self.sharpen_amount = amount;
        self
    }

    /// Enable Gaussian blur with the given radius in pixels.
    pub fn with_blur(mut self, radius: f32) -> Self {
        self.blur = true;
        self.blur_radius = radius;
        self
    }

    /// Enable alpha scaling with the given factor.
    pub fn with_transparency(mut self, factor: f32) -> Self {
        self.transparency = true;
        self.transparency_factor = factor;
        self
    }

    /// Enable the color-intensity adjustment at the given level.
    pub fn with_color_intensity(mut self, level: f32) -> Self {
        self.color_intensity = true;
        self.color_intensity_level = level;
        self
    }

    /// `true` when no enabled effect would change any pixel.
    pub fn is_identity(&self) -> bool {
        !self.grayscale
            && !(self.sharpen && self.sharpen_amount != 1.0)
            && !(self.blur && self.blur_radius > 0.0)
            && !(self.transparency && self.transparency_factor != 1.0)
            && !(self.color_intensity && self.color_intensity_level != NEUTRAL_COLOR_INTENSITY)
    }

    /// Check every amount against its accepted range.
    ///
    /// Amounts are checked even when their toggle is off, so a configuration
    /// that validates once stays valid whichever effects are switched on.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::InvalidParameter`] naming the first value that
    /// is out of range or not a number.
    pub fn validate(&self) -> Result<(), AtlasError> {
        check_range("sharpen amount", self.sharpen_amount, SHARPEN_RANGE)?;
        check_range("blur radius", self.blur_radius, BLUR_RANGE)?;
        check_range(
            "transparency factor",
            self.transparency_factor,
            TRANSPARENCY_RANGE,
        )?;
        check_range(
            "color intensity level",
            self.color_intensity_level,
            COLOR_INTENSITY_RANGE,
        )
    }
}

fn check_range(name: &'static str, value: f32, (min, max): (f32, f32)) -> Result<(), AtlasError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(AtlasError::InvalidParameter {
            name,
            value,
            min,
            max,
        })
    }
}

/// The two independent effect targets: single-frame preview and atlas tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[must_use]
pub struct EffectProfiles {
    /// Applied to single-frame previews and animated GIF export.
    pub preview: EffectParameters,
    /// Applied to every tile of the atlas.
    pub atlas: EffectParameters,
}

impl EffectProfiles {
    /// Create profiles with every effect disabled on both targets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the preview profile.
    pub fn with_preview(mut self, params: EffectParameters) -> Self {
        self.preview = params;
        self
    }

    /// Replace the atlas profile.
    pub fn with_atlas(mut self, params: EffectParameters) -> Self {
        self.atlas = params;
        self
    }

    /// Validate both profiles.
    pub fn validate(&self) -> Result<(), AtlasError> {
        self.preview.validate()?;
        self.atlas.validate()
    }
}

/// Run `frame` through the effect pipeline.
///
/// The frame is first normalized to RGBA8; the returned buffer is always a
/// fresh allocation.
pub fn apply(frame: &DynamicImage, params: &EffectParameters) -> RgbaImage {
    apply_rgba(frame.to_rgba8(), params)
}

/// Run an already-normalized RGBA8 buffer through the effect pipeline.
pub fn apply_rgba(mut image: RgbaImage, params: &EffectParameters) -> RgbaImage {
    if params.grayscale {
        grayscale(&mut image);
    }
    if params.sharpen {
        image = sharpen(&image, params.sharpen_amount);
    }
    if params.blur && params.blur_radius > 0.0 {
        image = imageops::blur(&image, params.blur_radius);
    }
    if params.transparency {
        scale_alpha(&mut image, params.transparency_factor);
    }
    if params.color_intensity && params.color_intensity_level != NEUTRAL_COLOR_INTENSITY {
        adjust_color_intensity(&mut image, params.color_intensity_level);
    }
    image
}

/// ITU-R 601-2 luma, rounded.
fn luma(pixel: &Rgba<u8>) -> u8 {
    let [red, green, blue, _] = pixel.0;
    ((u32::from(red) * 299 + u32::from(green) * 587 + u32::from(blue) * 114 + 500) / 1000) as u8
}

fn grayscale(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let value = luma(pixel);
        pixel.0 = [value, value, value, pixel[3]];
    }
}

/// Blend between a smoothed copy of the image and the image itself.
///
/// `amount = 0` gives the smoothed copy, `1` the original, anything above
/// extrapolates away from the smoothed copy. Alpha is left as is.
fn sharpen(image: &RgbaImage, amount: f32) -> RgbaImage {
    let smoothed = smooth(image);
    let mut output = image.clone();
    for (out, soft) in output.pixels_mut().zip(smoothed.pixels()) {
        for channel in 0..3 {
            out[channel] = blend(soft[channel], out[channel], amount);
        }
    }
    output
}

/// 3×3 smoothing kernel with a heavy center weight:
///
/// ```text
/// 1 1 1
/// 1 5 1
/// 1 1 1   / 13
/// ```
///
/// Border pixels are copied unchanged.
fn smooth(image: &RgbaImage) -> RgbaImage {
    let (width, height) = image.dimensions();
    let mut output = image.clone();
    if width < 3 || height < 3 {
        return output;
    }

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let mut sums = [0u32; 3];
            for dy in 0..3 {
                for dx in 0..3 {
                    let weight = if dx == 1 && dy == 1 { 5 } else { 1 };
                    let sample = image.get_pixel(x + dx - 1, y + dy - 1);
                    for (channel, sum) in sums.iter_mut().enumerate() {
                        *sum += weight * u32::from(sample[channel]);
                    }
                }
            }
            let pixel = output.get_pixel_mut(x, y);
            for (channel, sum) in sums.iter().enumerate() {
                pixel[channel] = ((sum + 6) / 13) as u8;
            }
        }
    }
    output
}

/// `from + factor * (to - from)`, rounded and clamped to a channel value.
fn blend(from: u8, to: u8, factor: f32) -> u8 {
    let from = f32::from(from);
    let value = from + factor * (f32::from(to) - from);
    value.round().clamp(0.0, 255.0) as u8
}

fn scale_alpha(image: &mut RgbaImage, factor: f32) {
    let factor = f64::from(factor);
    for pixel in image.pixels_mut() {
        pixel[3] = (f64::from(pixel[3]) * factor).floor().clamp(0.0, 255.0) as u8;
    }
}

fn adjust_color_intensity(image: &mut RgbaImage, level: f32) {
    if level < NEUTRAL_COLOR_INTENSITY {
        // Interpolate toward white: t = 1 keeps the color, t = 0 is white.
        let weight = level * 2.0;
        for pixel in image.pixels_mut() {
            for channel in 0..3 {
                pixel[channel] = blend(255, pixel[channel], weight);
            }
        }
    } else {
        let factor = 1.0 + (level - NEUTRAL_COLOR_INTENSITY) * 2.0;
        for pixel in image.pixels_mut() {
            let gray = luma(pixel);
            for channel in 0..3 {
                pixel[channel] = blend(gray, pixel[channel], factor);
            }
        }
    }
}
