//! Atlas grid layout.
//!
//! The tiling law is fixed: for `n` frames the atlas has
//! `columns = ceil(sqrt(n))` and `rows = ceil(n / columns)`. In-world scripts
//! parse these two numbers back out of texture names, so every producer must
//! agree on them exactly. [`compute_grid`] uses integer arithmetic only.
//!
//! # Example
//!
//! ```
//! use gifatlas::{GridSpec, compute_grid, compute_tile_size};
//!
//! let grid = compute_grid(10)?;
//! assert_eq!(grid, GridSpec::new(4, 3));
//! assert_eq!(compute_tile_size(2048, 2048, grid), (512, 682));
//! # Ok::<(), gifatlas::AtlasError>(())
//! ```

use crate::error::AtlasError;

/// Column and row count of an atlas grid.
///
/// Frames are laid out in row-major order: frame `i` lands in column
/// `i % columns`, row `i / columns`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSpec {
    /// Number of tiles per row.
    pub columns: u32,
    /// Number of tile rows.
    pub rows: u32,
}

impl GridSpec {
    /// Create a grid with explicit dimensions.
    pub fn new(columns: u32, rows: u32) -> Self {
        Self { columns, rows }
    }

    /// Derive the grid for `frame_count` frames.
    ///
    /// Equivalent to [`compute_grid`].
    pub fn for_frames(frame_count: usize) -> Result<Self, AtlasError> {
        compute_grid(frame_count)
    }

    /// Total number of tiles the grid can hold.
    pub fn capacity(&self) -> u64 {
        u64::from(self.columns) * u64::from(self.rows)
    }

    /// Grid cell `(column, row)` of the frame at `index`.
    pub fn cell(&self, index: usize) -> (u32, u32) {
        let columns = self.columns.max(1) as usize;
        ((index % columns) as u32, (index / columns) as u32)
    }

    /// Pixel offset of the tile holding frame `index`.
    pub fn tile_origin(&self, index: usize, tile_width: u32, tile_height: u32) -> (u32, u32) {
        let (column, row) = self.cell(index);
        (column * tile_width, row * tile_height)
    }
}

/// Compute the tile grid for `frame_count` frames.
///
/// # Errors
///
/// Returns [`AtlasError::InvalidFrameCount`] when `frame_count` is zero or
/// too large for a `u32` column count.
pub fn compute_grid(frame_count: usize) -> Result<GridSpec, AtlasError> {
    if frame_count == 0 {
        return Err(AtlasError::InvalidFrameCount(0));
    }

    let columns = ceil_sqrt(frame_count);
    let rows = frame_count.div_ceil(columns);

    let columns = u32::try_from(columns)
        .map_err(|_| AtlasError::InvalidFrameCount(frame_count as i64))?;
    let rows =
        u32::try_from(rows).map_err(|_| AtlasError::InvalidFrameCount(frame_count as i64))?;

    Ok(GridSpec { columns, rows })
}

/// Per-tile pixel size for a canvas of `canvas_width × canvas_height`.
///
/// Plain floor division: `columns * tile_width` may fall short of the canvas
/// width, in which case the trailing pixels stay background. A canvas smaller
/// than the grid yields a zero dimension; callers that paste tiles must
/// reject that.
pub fn compute_tile_size(canvas_width: u32, canvas_height: u32, grid: GridSpec) -> (u32, u32) {
    (
        canvas_width / grid.columns.max(1),
        canvas_height / grid.rows.max(1),
    )
}

/// Smallest `root` with `root * root >= value`.
fn ceil_sqrt(value: usize) -> usize {
    // Float estimate, then correct for rounding in either direction.
    let mut root = (value as f64).sqrt() as usize;
    while root.saturating_mul(root) < value {
        root += 1;
    }
    while root > 1 && (root - 1) * (root - 1) >= value {
        root -= 1;
    }
    root
}
