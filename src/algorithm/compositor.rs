//! Mosaic assembly from a base image and a tile pool

use crate::algorithm::assignment::{AssignmentPlan, TileAssigner};
use crate::algorithm::blend::{alpha_composite, build_overlay};
use crate::analysis::color::block_average;
use crate::io::configuration::RESIZE_FILTER;
use crate::io::error::{MosaicError, Result};
use crate::spatial::{GridCell, GridPlan, TileRecord, TileSize};
use image::{DynamicImage, RgbaImage, imageops};
use rand::Rng;
use tracing::info;

/// Result of a composition run
pub struct Composition {
    /// Final canvas with the overlay applied
    pub mosaic: RgbaImage,
    /// Which tile went where
    pub plan: AssignmentPlan,
    /// Tiles available after filtering
    pub pool_size: usize,
}

/// Builds the mosaic for one grid plan
pub struct Compositor {
    grid: GridPlan,
    opacity: f64,
}

impl Compositor {
    /// Create a compositor for the given grid and overlay opacity
    pub const fn new(grid: GridPlan, opacity: f64) -> Self {
        Self { grid, opacity }
    }

    /// Run the full composition
    ///
    /// # Errors
    ///
    /// Returns an error if no tile in `pool` has the planned tile size
    pub fn compose<R: Rng + ?Sized>(
        &self,
        base: &DynamicImage,
        pool: Vec<TileRecord>,
        rng: &mut R,
    ) -> Result<Composition> {
        let resized = resize_base(base, &self.grid);
        let cells = cell_targets(&resized, &self.grid);
        let pool = filter_pool(pool, self.grid.tile)?;

        let colors: Vec<[f64; 3]> = pool.iter().map(TileRecord::rgb).collect();
        let plan = TileAssigner::new(&colors)
            .assign(&cells, rng)
            .ok_or(MosaicError::NoValidTiles {
                tile_size: self.grid.tile,
                loaded: 0,
            })?;

        let mut mosaic = assemble(&self.grid, &pool, &plan);
        let overlay = build_overlay(&resized, self.opacity);
        alpha_composite(&mut mosaic, &overlay)?;

        Ok(Composition {
            mosaic,
            plan,
            pool_size: pool.len(),
        })
    }
}

/// Resize the base image to the exact canvas size
pub fn resize_base(base: &DynamicImage, grid: &GridPlan) -> RgbaImage {
    let (width, height) = grid.canvas_dimensions();
    base.resize_exact(width, height, RESIZE_FILTER).to_rgba8()
}

/// Mean color of every cell in row-major order
pub fn cell_targets(resized: &RgbaImage, grid: &GridPlan) -> Vec<GridCell> {
    let averages = block_average(resized, grid.tile);
    let mut cells = Vec::with_capacity(grid.cell_count());

    for row in 0..grid.rows {
        for col in 0..grid.cols {
            let channel = |c: usize| {
                averages
                    .get((row as usize, col as usize, c))
                    .copied()
                    .unwrap_or(0.0)
            };
            cells.push(GridCell {
                row,
                col,
                target: [channel(0), channel(1), channel(2)],
            });
        }
    }

    cells
}

/// Drop records whose image is not exactly `tile_size`
///
/// # Errors
///
/// Returns [`MosaicError::NoValidTiles`] if nothing survives
pub fn filter_pool(pool: Vec<TileRecord>, tile_size: TileSize) -> Result<Vec<TileRecord>> {
    let loaded = pool.len();
    let filtered: Vec<TileRecord> = pool
        .into_iter()
        .filter(|record| tile_size.matches(&record.image))
        .collect();

    if filtered.is_empty() {
        return Err(MosaicError::NoValidTiles { tile_size, loaded });
    }
    if filtered.len() < loaded {
        info!(
            discarded = loaded - filtered.len(),
            "Discarded tiles with unexpected dimensions"
        );
    }
    Ok(filtered)
}

/// Paste each assigned tile at its cell position
pub fn assemble(grid: &GridPlan, pool: &[TileRecord], plan: &AssignmentPlan) -> RgbaImage {
    let (width, height) = grid.canvas_dimensions();
    let mut canvas = RgbaImage::new(width, height);

    for assignment in &plan.assignments {
        if let Some(record) = pool.get(assignment.tile_index) {
            let (x, y) = grid.cell_origin(assignment.cell.row, assignment.cell.col);
            imageops::replace(&mut canvas, &record.image, i64::from(x), i64::from(y));
        }
    }

    canvas
}
