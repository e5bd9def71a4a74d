//! Texture naming convention.
//!
//! In-world scripts cannot be handed parameters directly, so the grid and
//! playback speed travel inside the texture's name:
//!
//! ```text
//! {base};{columns};{rows};{speed}
//! ```
//!
//! The host does not allow a literal `.` in that position, so the speed's
//! decimal point is written as `;` too: a speed of `10.0` becomes `10;0`
//! and the full file name reads `anim;4;3;10;0.png`. The runtime reads
//! fields 1, 2 and 3 and ignores anything after.
//!
//! # Example
//!
//! ```
//! use gifatlas::{AnimationMetadata, GridSpec, naming};
//!
//! let grid = GridSpec::new(4, 3);
//! assert_eq!(naming::build_name("anim", grid, "10;0"), "anim;4;3;10;0");
//!
//! let metadata = AnimationMetadata::parse("anim;4;3;10;0.png")?;
//! assert_eq!(metadata.grid(), grid);
//! assert_eq!(metadata.speed, 10.0);
//! # Ok::<(), gifatlas::AtlasError>(())
//! ```

use std::path::Path;

use crate::error::AtlasError;
use crate::frames::DEFAULT_BASE_NAME;
use crate::layout::GridSpec;

/// Speed written into texture names and scripts, in frames per second.
pub const DEFAULT_SPEED: f64 = 10.0;

/// Join a base name, grid, and pre-encoded speed into a texture name stem.
pub fn build_name(base: &str, grid: GridSpec, speed_repr: &str) -> String {
    format!("{base};{};{};{speed_repr}", grid.columns, grid.rows)
}

/// Format a speed the way it appears in scripts: always with a fractional
/// part, so `10.0` stays `10.0` rather than `10`.
pub fn format_speed(speed: f64) -> String {
    if speed.is_finite() && speed.fract() == 0.0 {
        format!("{speed:.1}")
    } else {
        format!("{speed}")
    }
}

/// Encode a speed for a texture name, with `;` as the decimal separator.
pub fn encode_speed(speed: f64) -> String {
    format_speed(speed).replace('.', ";")
}

/// Full texture file name: `{base};{columns};{rows};{speed}.{extension}`
/// with the speed `;`-encoded.
pub fn texture_file_name(base: &str, grid: GridSpec, speed: f64, extension: &str) -> String {
    format!(
        "{}.{}",
        build_name(base, grid, &encode_speed(speed)),
        extension.trim_start_matches('.')
    )
}

/// Base name for artifacts derived from `path`: its file stem, or
/// `"texture"` when it has none.
pub fn base_name_from_path<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .filter(|stem| !stem.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_NAME.to_string())
}

/// Animation parameters shared by the texture name and the script.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationMetadata {
    /// Base name of the texture.
    pub name: String,
    /// Tiles per row.
    pub columns: u32,
    /// Tile rows.
    pub rows: u32,
    /// Playback speed in frames per second.
    pub speed: f64,
}

impl AnimationMetadata {
    /// Bundle a name, grid, and speed.
    pub fn new(name: impl Into<String>, grid: GridSpec, speed: f64) -> Self {
        Self {
            name: name.into(),
            columns: grid.columns,
            rows: grid.rows,
            speed,
        }
    }

    /// The grid these parameters describe.
    pub fn grid(&self) -> GridSpec {
        GridSpec::new(self.columns, self.rows)
    }

    /// Texture name stem, e.g. `anim;4;3;10;0`.
    pub fn texture_stem(&self) -> String {
        build_name(&self.name, self.grid(), &encode_speed(self.speed))
    }

    /// Texture file name with the given extension, e.g. `anim;4;3;10;0.png`.
    pub fn texture_file_name(&self, extension: &str) -> String {
        texture_file_name(&self.name, self.grid(), self.speed, extension)
    }

    /// Human-readable label used in script headers, e.g. `anim;4;3;10.0`.
    pub fn label(&self) -> String {
        build_name(&self.name, self.grid(), &format_speed(self.speed))
    }

    /// Parse a texture name the same way the in-world runtime does.
    ///
    /// A trailing file extension is ignored. Field 0 is the name, fields
    /// 1 and 2 the grid, field 3 the speed; anything after field 3 (the
    /// fractional half of a `;`-encoded speed) is dropped, exactly as the
    /// runtime drops it.
    ///
    /// # Errors
    ///
    /// Returns [`AtlasError::MalformedName`] when fewer than four fields are
    /// present or a numeric field does not parse.
    pub fn parse(text: &str) -> Result<Self, AtlasError> {
        let stem = strip_extension(text);
        let fields: Vec<&str> = stem.split(';').collect();
        if fields.len() < 4 {
            return Err(malformed(text, "expected name;columns;rows;speed"));
        }

        let columns = fields[1]
            .trim()
            .parse::<u32>()
            .map_err(|_| malformed(text, "columns is not an integer"))?;
        let rows = fields[2]
            .trim()
            .parse::<u32>()
            .map_err(|_| malformed(text, "rows is not an integer"))?;
        let speed = fields[3]
            .trim()
            .parse::<f64>()
            .map_err(|_| malformed(text, "speed is not a number"))?;

        Ok(Self {
            name: fields[0].to_string(),
            columns,
            rows,
            speed,
        })
    }
}

fn malformed(text: &str, reason: &str) -> AtlasError {
    AtlasError::MalformedName {
        name: text.to_string(),
        reason: reason.to_string(),
    }
}

/// Drop a trailing `.ext` whose extension is purely alphabetic, so the
/// `10.0` in a script label is not mistaken for one.
fn strip_extension(text: &str) -> &str {
    match text.rsplit_once('.') {
        Some((stem, extension))
            if !extension.is_empty() && extension.chars().all(|c| c.is_ascii_alphabetic()) =>
        {
            stem
        }
        _ => text,
    }
}
