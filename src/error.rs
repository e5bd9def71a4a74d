//! Error types for the `gifatlas` crate.
//!
//! This module defines [`AtlasError`], the unified error type returned by all
//! fallible operations in the crate. Errors carry enough context to explain
//! the failure to a user without extra logging at the call site: frame
//! indices, parameter names and values, and upstream encoder messages.

use std::io::Error as IoError;

use image::ImageError;
use thiserror::Error;

/// The unified error type for all `gifatlas` operations.
///
/// Every public method that can fail returns `Result<T, AtlasError>`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AtlasError {
    /// Composition, export, or script emission was attempted with zero frames.
    #[error("Frame sequence is empty")]
    EmptyFrameSequence,

    /// A grid was requested for a non-positive number of frames.
    #[error("Invalid frame count: {0} (must be at least 1)")]
    InvalidFrameCount(i64),

    /// A canvas or tile dimension is unusable.
    ///
    /// Only raised when strict dimension validation is enabled, or when the
    /// canvas is too small to give every tile at least one pixel.
    #[error("Invalid {name}: {value}")]
    InvalidDimension {
        /// Which dimension was rejected (`"canvas width"`, `"tile height"`, ...).
        name: &'static str,
        /// The rejected value.
        value: i64,
    },

    /// A frame index outside `[0, frame_count)` was requested.
    #[error("Frame {index} is out of range (sequence has {frame_count} frames)")]
    IndexOutOfRange {
        /// The index that was requested.
        index: usize,
        /// The number of frames in the sequence.
        frame_count: usize,
    },

    /// A capacity-checked append would grow the sequence past its cap.
    #[error("Frame sequence is full ({capacity} frames maximum)")]
    CapacityExceeded {
        /// The caller-imposed maximum frame count.
        capacity: usize,
    },

    /// An effect parameter lies outside its accepted range.
    #[error("Effect parameter {name} = {value} is outside {min}..={max}")]
    InvalidParameter {
        /// Parameter name (`"blur radius"`, `"transparency factor"`, ...).
        name: &'static str,
        /// The rejected value.
        value: f32,
        /// Inclusive lower bound.
        min: f32,
        /// Inclusive upper bound.
        max: f32,
    },

    /// A texture name does not follow the `name;columns;rows;speed` layout.
    #[error("Malformed texture name {name:?}: {reason}")]
    MalformedName {
        /// The name that failed to parse.
        name: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The animated image could not be decoded into frames.
    #[error("Failed to decode animation: {0}")]
    DecodeError(String),

    /// Writing a raster, animation, or script artifact failed.
    #[error("Encoding failed: {0}")]
    EncodeFailure(String),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    IoError(#[from] IoError),

    /// An error from the `image` crate during pixel conversion.
    #[error("Image processing error: {0}")]
    ImageError(#[from] ImageError),
}
