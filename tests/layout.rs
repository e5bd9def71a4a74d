//! Grid layout tests.

use gifatlas::{AtlasError, GridSpec, compute_grid, compute_tile_size};

// ── compute_grid ─────────────────────────────────────────────────

#[test]
fn grid_for_known_frame_counts() {
    assert_eq!(compute_grid(1).unwrap(), GridSpec::new(1, 1));
    assert_eq!(compute_grid(2).unwrap(), GridSpec::new(2, 1));
    assert_eq!(compute_grid(3).unwrap(), GridSpec::new(2, 2));
    assert_eq!(compute_grid(5).unwrap(), GridSpec::new(3, 2));
    assert_eq!(compute_grid(10).unwrap(), GridSpec::new(4, 3));
    assert_eq!(compute_grid(16).unwrap(), GridSpec::new(4, 4));
    assert_eq!(compute_grid(17).unwrap(), GridSpec::new(5, 4));
    assert_eq!(compute_grid(100).unwrap(), GridSpec::new(10, 10));
}

#[test]
fn grid_always_holds_every_frame() {
    for frame_count in 1..=2_000usize {
        let grid = compute_grid(frame_count).unwrap();
        assert!(
            grid.capacity() >= frame_count as u64,
            "{frame_count} frames do not fit a {}x{} grid",
            grid.columns,
            grid.rows,
        );
        let columns = grid.columns as usize;
        assert!(columns * columns >= frame_count);
        assert!((columns - 1) * (columns - 1) < frame_count);
        assert_eq!(grid.rows as usize, frame_count.div_ceil(columns));
    }
}

#[test]
fn grid_rejects_zero_frames() {
    match compute_grid(0) {
        Err(AtlasError::InvalidFrameCount(0)) => {}
        other => panic!("Expected InvalidFrameCount, got: {other:?}"),
    }
}

#[test]
fn grid_for_frames_matches_compute_grid() {
    assert_eq!(GridSpec::for_frames(10).unwrap(), compute_grid(10).unwrap());
}

// ── Cells and offsets ────────────────────────────────────────────

#[test]
fn cells_are_row_major() {
    let grid = GridSpec::new(4, 3);
    assert_eq!(grid.cell(0), (0, 0));
    assert_eq!(grid.cell(3), (3, 0));
    assert_eq!(grid.cell(4), (0, 1));
    assert_eq!(grid.cell(9), (1, 2));
}

#[test]
fn tile_origin_scales_cells() {
    let grid = GridSpec::new(4, 3);
    assert_eq!(grid.tile_origin(9, 512, 682), (512, 1364));
}

// ── compute_tile_size ────────────────────────────────────────────

#[test]
fn tile_size_is_floor_division() {
    let grid = GridSpec::new(4, 3);
    // 3 * 682 = 2046: the two trailing rows of pixels stay background.
    assert_eq!(compute_tile_size(2048, 2048, grid), (512, 682));
    assert_eq!(compute_tile_size(1000, 10, GridSpec::new(3, 3)), (333, 3));
}

#[test]
fn tile_size_can_be_zero_for_tiny_canvases() {
    assert_eq!(compute_tile_size(3, 3, GridSpec::new(4, 4)), (0, 0));
}
