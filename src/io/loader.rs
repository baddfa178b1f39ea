//! Loads cached tiles for one resolution into a shuffled pool

use crate::io::cache::TileCache;
use crate::io::error::{MosaicError, Result};
use crate::spatial::{TileRecord, TileSize};
use rand::Rng;
use rand::seq::SliceRandom;
use std::path::Path;
use tracing::warn;

/// Load one cache entry as RGBA and compute its mean color
///
/// # Errors
///
/// Returns an error if the file cannot be decoded
pub fn load_record(path: &Path) -> Result<TileRecord> {
    let image = image::open(path).map_err(|source| MosaicError::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(TileRecord::new(image.to_rgba8()))
}

/// Load every cache entry for `tile_size` and shuffle the pool
///
/// The shuffle keeps the enumeration order of the cache directory from deciding
/// distance ties during assignment. Unreadable entries are logged and left out.
///
/// # Errors
///
/// Returns [`MosaicError::EmptyPool`] if no entry could be loaded
pub fn load_pool<R: Rng + ?Sized>(
    cache: &TileCache,
    tile_size: TileSize,
    rng: &mut R,
) -> Result<Vec<TileRecord>> {
    let mut pool: Vec<TileRecord> = cache
        .entries_for(tile_size)
        .iter()
        .filter_map(|path| match load_record(path) {
            Ok(record) => Some(record),
            Err(error) => {
                warn!(%error, "Failed to load cached tile");
                None
            }
        })
        .collect();

    if pool.is_empty() {
        return Err(MosaicError::EmptyPool { tile_size });
    }

    pool.shuffle(rng);
    Ok(pool)
}
