//! Grid geometry for the mosaic canvas

use crate::spatial::tiles::TileSize;

/// Tile size and cell layout chosen for one run
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct GridPlan {
    /// Side length of every tile
    pub tile: TileSize,
    /// Number of cell columns
    pub cols: u32,
    /// Number of cell rows
    pub rows: u32,
    /// Requested output width
    pub output_width: u32,
    /// Output height derived from the base aspect ratio
    pub output_height: u32,
}

impl GridPlan {
    /// Total number of cells
    pub const fn cell_count(&self) -> usize {
        self.cols as usize * self.rows as usize
    }

    /// Canvas dimensions, an exact multiple of the tile size
    pub const fn canvas_dimensions(&self) -> (u32, u32) {
        (self.cols * self.tile.width, self.rows * self.tile.height)
    }

    /// Top-left pixel of a cell on the canvas
    pub const fn cell_origin(&self, row: u32, col: u32) -> (u32, u32) {
        (col * self.tile.width, row * self.tile.height)
    }
}

/// One grid cell and the mean color of the base image region it covers
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridCell {
    /// Row index
    pub row: u32,
    /// Column index
    pub col: u32,
    /// Mean RGB of the covered block
    pub target: [f64; 3],
}
