//! Spatial data structures
//!
//! This module contains:
//! - Grid geometry for the output canvas
//! - Tile dimensions and loaded tile records

/// Grid plan and cell definitions
pub mod grid;
/// Tile size and tile records
pub mod tiles;

pub use grid::{GridCell, GridPlan};
pub use tiles::{TileRecord, TileSize};
