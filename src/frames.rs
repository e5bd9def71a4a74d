//! Decoded frame sequences.
//!
//! [`FrameSequence`] owns the ordered frames of an animation together with
//! their display delays. It is the input to every atlas, preview, and export
//! operation.
//!
//! # Example
//!
//! ```no_run
//! use gifatlas::{AtlasError, FrameSequence};
//!
//! let mut frames = FrameSequence::open("dance.gif")?;
//! println!("{} frames, base name {}", frames.len(), frames.base_name());
//!
//! // Hold the first pose for one extra frame at the end of the loop.
//! frames.push_duplicate(0)?;
//! # Ok::<(), AtlasError>(())
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, Seek};
use std::path::Path;
use std::time::Duration;

use image::codecs::gif::GifDecoder;
use image::{AnimationDecoder, DynamicImage};

use crate::error::AtlasError;
use crate::layout::{GridSpec, compute_grid};
use crate::naming::base_name_from_path;

/// Delay used for frames that carry no timing of their own.
pub const DEFAULT_FRAME_DELAY: Duration = Duration::from_millis(100);

/// Base name used when a sequence was not loaded from a named file.
pub const DEFAULT_BASE_NAME: &str = "texture";

/// An ordered, indexable list of decoded frames.
///
/// Frames are never modified in place. Effects and resampling always
/// produce new buffers, and [`get`](FrameSequence::get) hands out shared
/// references only. The sequence itself can grow (by duplicating an
/// existing frame) or shrink (by dropping trailing frames).
#[derive(Debug, Clone, Default)]
pub struct FrameSequence {
    frames: Vec<DynamicImage>,
    delays: Vec<Duration>,
    base_name: Option<String>,
}

impl FrameSequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a sequence from already-decoded frames.
    ///
    /// Every frame gets [`DEFAULT_FRAME_DELAY`].
    pub fn from_frames(frames: Vec<DynamicImage>) -> Self {
        let delays = vec![DEFAULT_FRAME_DELAY; frames.len()];
        Self {
            frames,
            delays,
            base_name: None,
        }
    }

    /// Decode an animated GIF from disk.
    ///
    /// The file stem becomes the sequence's [`base_name`](FrameSequence::base_name).
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::IoError`] if the file cannot be opened, or
    /// [`AtlasError::DecodeError`] if it is not a readable GIF.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, AtlasError> {
        let path = path.as_ref();
        log::debug!("Opening animation {}", path.display());
        let file = File::open(path)?;
        let mut sequence = Self::from_reader(BufReader::new(file))?;
        sequence.base_name = Some(base_name_from_path(path));
        Ok(sequence)
    }

    /// Decode an animated GIF from any buffered, seekable reader.
    ///
    /// Each frame is fully composited onto the logical screen, so frames
    /// that only update part of the image come out complete.
    pub fn from_reader<R: BufRead + Seek>(reader: R) -> Result<Self, AtlasError> {
        let decoder =
            GifDecoder::new(reader).map_err(|error| AtlasError::DecodeError(error.to_string()))?;
        let decoded = decoder
            .into_frames()
            .collect_frames()
            .map_err(|error| AtlasError::DecodeError(error.to_string()))?;

        let mut sequence = Self::new();
        for frame in decoded {
            let delay = Duration::from(frame.delay());
            let delay = if delay.is_zero() {
                DEFAULT_FRAME_DELAY
            } else {
                delay
            };
            sequence.push(DynamicImage::ImageRgba8(frame.into_buffer()), delay);
        }

        log::debug!("Decoded {} frames", sequence.len());
        Ok(sequence)
    }

    /// Set the base name used for output files and scripts.
    #[must_use]
    pub fn with_base_name(mut self, name: impl Into<String>) -> Self {
        self.base_name = Some(name.into());
        self
    }

    /// Base name for derived artifacts: the source file stem, or
    /// [`DEFAULT_BASE_NAME`] when the frames did not come from a file.
    pub fn base_name(&self) -> &str {
        self.base_name.as_deref().unwrap_or(DEFAULT_BASE_NAME)
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// `true` if the sequence holds no frames.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// All frames, in order.
    pub fn frames(&self) -> &[DynamicImage] {
        &self.frames
    }

    /// Per-frame display delays, parallel to [`frames`](FrameSequence::frames).
    pub fn delays(&self) -> &[Duration] {
        &self.delays
    }

    /// The frame at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::IndexOutOfRange`] if `index >= len()`.
    pub fn get(&self, index: usize) -> Result<&DynamicImage, AtlasError> {
        self.frames.get(index).ok_or(AtlasError::IndexOutOfRange {
            index,
            frame_count: self.frames.len(),
        })
    }

    /// Display delay of the frame at `index`.
    pub fn delay(&self, index: usize) -> Result<Duration, AtlasError> {
        self.delays
            .get(index)
            .copied()
            .ok_or(AtlasError::IndexOutOfRange {
                index,
                frame_count: self.frames.len(),
            })
    }

    /// Delay of the first frame, used as the playback rate of the whole
    /// animation. [`DEFAULT_FRAME_DELAY`] for an empty sequence.
    pub fn frame_delay(&self) -> Duration {
        self.delays.first().copied().unwrap_or(DEFAULT_FRAME_DELAY)
    }

    /// Append a frame with the given delay.
    pub fn push(&mut self, frame: DynamicImage, delay: Duration) {
        self.frames.push(frame);
        self.delays.push(delay);
    }

    /// Append a copy of the frame at `index` and return the new frame's index.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::IndexOutOfRange`] if `index >= len()`; the
    /// sequence is left unchanged.
    pub fn push_duplicate(&mut self, index: usize) -> Result<usize, AtlasError> {
        let frame = self.get(index)?.clone();
        let delay = self.delays[index];
        self.push(frame, delay);
        log::debug!("Duplicated frame {index}; sequence now has {} frames", self.len());
        Ok(self.len() - 1)
    }

    /// Like [`push_duplicate`](FrameSequence::push_duplicate), but refuses to
    /// grow the sequence beyond `capacity` frames.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::CapacityExceeded`] when the sequence already
    /// holds `capacity` or more frames, or [`AtlasError::IndexOutOfRange`]
    /// for a bad index. Neither leaves a partial change behind.
    pub fn push_duplicate_within(
        &mut self,
        index: usize,
        capacity: usize,
    ) -> Result<usize, AtlasError> {
        if self.len() >= capacity {
            return Err(AtlasError::CapacityExceeded { capacity });
        }
        self.push_duplicate(index)
    }

    /// Drop every frame from `len` onward. No-op if the sequence is shorter.
    pub fn truncate(&mut self, len: usize) {
        self.frames.truncate(len);
        self.delays.truncate(len);
    }

    /// Remove all frames. The base name is kept.
    pub fn clear(&mut self) {
        self.frames.clear();
        self.delays.clear();
    }

    /// Atlas grid for the current frame count.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::EmptyFrameSequence`] for an empty sequence.
    pub fn grid(&self) -> Result<GridSpec, AtlasError> {
        if self.is_empty() {
            return Err(AtlasError::EmptyFrameSequence);
        }
        compute_grid(self.len())
    }
}

impl From<Vec<DynamicImage>> for FrameSequence {
    fn from(frames: Vec<DynamicImage>) -> Self {
        Self::from_frames(frames)
    }
}
