//! Pipeline constants and the per-run configuration

use image::imageops::FilterType;
use std::path::PathBuf;

// Tile planning
/// Smallest tile side the planner will produce
pub const MIN_TILE_SIDE: u32 = 100;
/// Fraction of the canvas the pool should cover on the first attempt
pub const PRIMARY_COVERAGE: f64 = 0.9;
/// Looser coverage fraction used when tiles come out too small
pub const RELAXED_COVERAGE: f64 = 0.8;

// Defaults for configurable parameters
/// Output width when none or an invalid one is given
pub const DEFAULT_WIDTH: u32 = 1920;
/// Overlay opacity when none or an invalid one is given
pub const DEFAULT_OPACITY: f64 = 0.3;
/// Lossy quality for cached tiles and final outputs
pub const DEFAULT_QUALITY: u8 = 90;
/// Source tile tree
pub const DEFAULT_TILES_DIR: &str = "path_to_tiles";
/// Normalized tile cache
pub const DEFAULT_CACHE_DIR: &str = "processed_tiles";
/// Final mosaic destination
pub const DEFAULT_OUTPUT_DIR: &str = "output_mosaics";

/// Extensions accepted as tile sources (lowercase)
pub const VALID_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "heic"];
/// Extension of cache entries
pub const CACHE_EXTENSION: &str = "jpg";

// Output settings
/// Prefix of final mosaic file names
pub const OUTPUT_PREFIX: &str = "mosaic_";
/// Resampling filter for tiles and the base image
pub const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Everything a run needs, built once at startup and passed by reference
#[derive(Clone, Debug, PartialEq)]
pub struct MosaicConfig {
    /// Image to reconstruct
    pub base_image: PathBuf,
    /// Requested canvas width before snapping to the tile grid
    pub output_width: u32,
    /// Overlay opacity in `[0, 1]`
    pub opacity: f64,
    /// Source tile tree, walked recursively
    pub tiles_dir: PathBuf,
    /// Normalized tile cache
    pub cache_dir: PathBuf,
    /// Destination for final mosaics
    pub output_dir: PathBuf,
    /// Shuffle and fallback seed; OS entropy when absent
    pub seed: Option<u64>,
    /// Preprocessing worker count; rayon's default when absent
    pub threads: Option<usize>,
    /// Lossy encoder quality, 1 to 100
    pub quality: u8,
    /// Hide the progress bar
    pub quiet: bool,
}

impl MosaicConfig {
    /// Configuration with defaults for everything but the base image
    pub fn new(base_image: impl Into<PathBuf>) -> Self {
        Self {
            base_image: base_image.into(),
            output_width: DEFAULT_WIDTH,
            opacity: DEFAULT_OPACITY,
            tiles_dir: PathBuf::from(DEFAULT_TILES_DIR),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            seed: None,
            threads: None,
            quality: DEFAULT_QUALITY,
            quiet: false,
        }
    }
}
