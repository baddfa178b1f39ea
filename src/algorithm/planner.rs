//! Tile size and grid layout planning

use crate::io::configuration::{MIN_TILE_SIDE, PRIMARY_COVERAGE, RELAXED_COVERAGE};
use crate::spatial::{GridPlan, TileSize};

/// Derive the output height from the desired width and the base aspect ratio
pub fn output_height(output_width: u32, aspect_ratio: f64) -> u32 {
    if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
        (f64::from(output_width) / aspect_ratio) as u32
    } else {
        output_width
    }
}

/// Pick a square tile side so that the pool covers the canvas
///
/// Each tile should cover about `1 / (0.9 * N)` of the canvas. When that drops below
/// [`MIN_TILE_SIDE`] the looser `0.8` fraction is tried and the result clamped to the
/// minimum, trading granularity for fewer, larger tiles.
pub fn tile_side(candidate_count: usize, output_width: u32, output_height: u32) -> u32 {
    let area = f64::from(output_width) * f64::from(output_height);
    let count = candidate_count.max(1) as f64;

    let side = (area / (PRIMARY_COVERAGE * count)).sqrt() as u32;
    if side >= MIN_TILE_SIDE {
        return side;
    }

    ((area / (RELAXED_COVERAGE * count)).sqrt() as u32).max(MIN_TILE_SIDE)
}

/// Plan tile size and grid dimensions for a run
///
/// A grid axis that would hold zero cells is raised to one so the canvas is never empty.
pub fn plan_grid(candidate_count: usize, output_width: u32, aspect_ratio: f64) -> GridPlan {
    let output_height = output_height(output_width, aspect_ratio);
    let side = tile_side(candidate_count, output_width, output_height);

    GridPlan {
        tile: TileSize::square(side),
        cols: (output_width / side).max(1),
        rows: (output_height / side).max(1),
        output_width,
        output_height,
    }
}
