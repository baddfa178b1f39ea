//! Photo-mosaic generation from a folder of tile images
//!
//! The pipeline plans a tile size from the pool size and output width, normalizes every
//! candidate tile into a resolution-keyed cache, loads the cache into a shuffled pool and
//! greedily assigns the closest unused tile to each grid cell before blending the
//! original image back over the result.

#![forbid(unsafe_code)]

/// Tile planning, assignment and compositing
pub mod algorithm;
/// Color statistics for tiles and image regions
pub mod analysis;
/// Input/output operations, configuration and error handling
pub mod io;
/// Grid geometry and tile records
pub mod spatial;

pub use io::error::{MosaicError, Result};
