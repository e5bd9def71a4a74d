//! Raster persistence for finished atlases.
//!
//! Atlases are encoded fully in memory, written to a temporary file next to
//! the destination, and renamed over it only once every byte is on disk. A
//! failed encode or write never leaves a truncated texture under the final
//! name. Formats without an alpha channel (JPEG) get the alpha dropped before
//! encoding.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbaImage};
use tempfile::NamedTempFile;

use crate::compose::Atlas;
use crate::error::AtlasError;
use crate::naming::texture_file_name;

/// Raster formats a texture can be saved as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RasterFormat {
    /// Lossless with alpha. The default.
    #[default]
    Png,
    /// Lossy, opaque. Alpha is discarded.
    Jpeg,
    /// Uncompressed bitmap with alpha.
    Bmp,
}

impl RasterFormat {
    /// Canonical file extension without the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            RasterFormat::Png => "png",
            RasterFormat::Jpeg => "jpg",
            RasterFormat::Bmp => "bmp",
        }
    }

    /// Look a format up by extension (`png`, `jpg`, `jpeg`, `bmp`, any case,
    /// leading dot allowed).
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "png" => Some(RasterFormat::Png),
            "jpg" | "jpeg" => Some(RasterFormat::Jpeg),
            "bmp" => Some(RasterFormat::Bmp),
            _ => None,
        }
    }

    /// Format implied by a path's extension, PNG when it is missing or
    /// unknown.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        path.as_ref()
            .extension()
            .and_then(|extension| Self::from_extension(&extension.to_string_lossy()))
            .unwrap_or_default()
    }

    /// Whether the format stores an alpha channel.
    pub fn supports_alpha(self) -> bool {
        !matches!(self, RasterFormat::Jpeg)
    }

    fn image_format(self) -> ImageFormat {
        match self {
            RasterFormat::Png => ImageFormat::Png,
            RasterFormat::Jpeg => ImageFormat::Jpeg,
            RasterFormat::Bmp => ImageFormat::Bmp,
        }
    }
}

impl Display for RasterFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.extension())
    }
}

/// Encode `image` in `format` into memory.
///
/// # Errors
///
/// Returns [`AtlasError::EncodeFailure`] with the encoder's message.
pub fn encode_texture(image: &RgbaImage, format: RasterFormat) -> Result<Vec<u8>, AtlasError> {
    log::debug!(
        "Encoding {}x{} texture as {format}",
        image.width(),
        image.height()
    );
    let image = DynamicImage::ImageRgba8(image.clone());
    let image = if format.supports_alpha() {
        image
    } else {
        DynamicImage::ImageRgb8(image.to_rgb8())
    };

    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, format.image_format())
        .map_err(|error| AtlasError::EncodeFailure(format!("Failed to encode {format}: {error}")))?;
    Ok(buffer.into_inner())
}

/// Encode `image` in `format` and write it to `path`.
///
/// # Errors
///
/// Returns [`AtlasError::EncodeFailure`] if encoding or the write fails.
pub fn save_texture<P: AsRef<Path>>(
    image: &RgbaImage,
    path: P,
    format: RasterFormat,
) -> Result<(), AtlasError> {
    let path = path.as_ref();
    let bytes = encode_texture(image, format)?;
    write_atomically(path, &bytes)?;
    log::debug!("Saved texture to {}", path.display());
    Ok(())
}

/// Write `bytes` to a temporary file in `path`'s directory, then rename it
/// onto `path`. The temporary file is removed on any failure.
pub(crate) fn write_atomically(path: &Path, bytes: &[u8]) -> Result<(), AtlasError> {
    let failure = |error: &dyn Display| {
        AtlasError::EncodeFailure(format!("Failed to write {}: {error}", path.display()))
    };

    let directory = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut staged = NamedTempFile::new_in(directory).map_err(|error| failure(&error))?;
    staged
        .write_all(bytes)
        .and_then(|()| staged.as_file().sync_all())
        .map_err(|error| failure(&error))?;
    staged.persist(path).map_err(|error| failure(&error.error))?;
    Ok(())
}

/// Save an atlas into `directory` under its conventional texture name
/// (`{base};{columns};{rows};{speed}.{ext}`) and return the full path.
///
/// # Errors
///
/// Same as [`save_texture`].
pub fn save_atlas<P: AsRef<Path>>(
    atlas: &Atlas,
    directory: P,
    base: &str,
    speed: f64,
    format: RasterFormat,
) -> Result<PathBuf, AtlasError> {
    let file_name = texture_file_name(base, atlas.grid, speed, format.extension());
    let path = directory.as_ref().join(file_name);
    save_texture(&atlas.image, &path, format)?;
    Ok(path)
}
