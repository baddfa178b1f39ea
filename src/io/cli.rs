//! Command-line interface and the end-to-end mosaic pipeline

use crate::algorithm::compositor::Compositor;
use crate::algorithm::planner::plan_grid;
use crate::io::cache::TileCache;
use crate::io::configuration::{
    DEFAULT_CACHE_DIR, DEFAULT_OPACITY, DEFAULT_OUTPUT_DIR, DEFAULT_QUALITY, DEFAULT_TILES_DIR,
    DEFAULT_WIDTH, MosaicConfig, OUTPUT_PREFIX,
};
use crate::io::error::{Result, invalid_parameter};
use crate::io::image::{ExportedMosaic, export_mosaic, load_oriented};
use crate::io::loader::load_pool;
use crate::io::preprocess::{PreprocessReport, TilePreprocessor, collect_sources, is_supported};
use crate::io::progress::ProgressManager;
use crate::spatial::GridPlan;
use clap::Parser;
use image::{DynamicImage, GenericImageView};
use rand::{SeedableRng, rngs::StdRng};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tilemosaic")]
#[command(
    author,
    version,
    about = "Rebuild an image as a mosaic of photos from a tile folder"
)]
/// Command-line arguments for the mosaic tool
pub struct Cli {
    /// Image to reconstruct
    #[arg(value_name = "BASE_IMAGE")]
    pub base_image: PathBuf,

    /// Output width in pixels; invalid values fall back to the default
    #[arg(value_name = "WIDTH", allow_hyphen_values = true)]
    pub width: Option<String>,

    /// Overlay opacity in [0, 1]; invalid values fall back to the default
    #[arg(value_name = "OPACITY", allow_hyphen_values = true)]
    pub opacity: Option<String>,

    /// Directory of source tile images, searched recursively
    #[arg(long, default_value = DEFAULT_TILES_DIR)]
    pub tiles_dir: PathBuf,

    /// Directory for normalized tiles
    #[arg(long, default_value = DEFAULT_CACHE_DIR)]
    pub cache_dir: PathBuf,

    /// Directory for finished mosaics
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Random seed for the tile shuffle and fallback picks
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Worker threads for tile preprocessing
    #[arg(short = 'j', long)]
    pub threads: Option<usize>,

    /// Lossy quality for cached tiles and outputs
    #[arg(long, default_value_t = DEFAULT_QUALITY, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub quality: u8,

    /// Suppress progress output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Cli {
    /// Resolve lenient arguments into a run configuration
    pub fn into_config(self) -> MosaicConfig {
        MosaicConfig {
            output_width: parse_width(self.width.as_deref()),
            base_image: self.base_image,
            opacity: parse_opacity(self.opacity.as_deref()),
            tiles_dir: self.tiles_dir,
            cache_dir: self.cache_dir,
            output_dir: self.output_dir,
            seed: self.seed,
            threads: self.threads,
            quality: self.quality,
            quiet: self.quiet,
        }
    }
}

/// Parse the output width, substituting the default for anything but a positive integer
pub fn parse_width(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return DEFAULT_WIDTH;
    };
    match raw.trim().parse::<u32>() {
        Ok(width) if width > 0 => width,
        _ => {
            warn!(
                value = raw,
                default = DEFAULT_WIDTH,
                "Invalid output width; using default"
            );
            DEFAULT_WIDTH
        }
    }
}

/// Parse the overlay opacity, substituting the default outside `[0, 1]`
pub fn parse_opacity(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return DEFAULT_OPACITY;
    };
    match raw.trim().parse::<f64>() {
        Ok(opacity) if (0.0..=1.0).contains(&opacity) => opacity,
        _ => {
            warn!(
                value = raw,
                default = DEFAULT_OPACITY,
                "Opacity must be a number in [0, 1]; using default"
            );
            DEFAULT_OPACITY
        }
    }
}

/// Install the global log subscriber
///
/// `RUST_LOG` wins over the quiet flag. Calling this more than once is harmless.
pub fn init_logging(quiet: bool) {
    let default_level = if quiet { "warn" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// `mosaic_<unix seconds>`
pub fn output_stem(time: SystemTime) -> String {
    let seconds = time
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_secs())
        .unwrap_or_default();
    format!("{OUTPUT_PREFIX}{seconds}")
}

/// What a finished run produced
#[derive(Debug)]
pub struct RunSummary {
    /// Tile size and grid used
    pub grid: GridPlan,
    /// Per-file preprocessing outcomes
    pub preprocess: PreprocessReport,
    /// Tiles available for assignment
    pub pool_size: usize,
    /// Cells filled by a unique closest match
    pub matched: usize,
    /// Cells filled by random reuse
    pub fallbacks: usize,
    /// Written files
    pub exported: ExportedMosaic,
}

/// Runs plan, preprocess, load, compose and export for one configuration
pub struct MosaicRunner {
    config: MosaicConfig,
    progress: ProgressManager,
}

impl MosaicRunner {
    /// Create a runner; the progress bar is hidden in quiet mode
    pub fn new(config: MosaicConfig) -> Self {
        let progress = if config.quiet {
            ProgressManager::hidden()
        } else {
            ProgressManager::new()
        };
        Self { config, progress }
    }

    /// Configuration the runner was built with
    pub const fn config(&self) -> &MosaicConfig {
        &self.config
    }

    /// Run the whole pipeline
    ///
    /// # Errors
    ///
    /// Returns an error if the base image cannot be loaded, no usable tiles remain, or the
    /// output cannot be written. Individual tile failures only show up in the report.
    pub fn run(&self) -> Result<RunSummary> {
        let config = &self.config;
        let base = load_oriented(&config.base_image)?;
        let (base_width, base_height) = base.dimensions();
        let aspect_ratio = f64::from(base_width) / f64::from(base_height.max(1));

        let sources = collect_sources(&config.tiles_dir);
        let candidates = sources.iter().filter(|path| is_supported(path)).count();
        let grid = plan_grid(candidates, config.output_width, aspect_ratio);
        info!(tile_size = %grid.tile, "Tile size planned");
        info!(
            cols = grid.cols,
            rows = grid.rows,
            cells = grid.cell_count(),
            "Grid planned"
        );

        let cache = TileCache::open(&config.cache_dir)?;
        info!(files = sources.len(), "Processing tiles");
        let preprocess = self.preprocess(&cache, &grid, &sources)?;
        info!(
            converted = preprocess.converted(),
            cached = preprocess.cached(),
            skipped = preprocess.skipped(),
            "Tile processing finished"
        );

        let mut rng = config
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        let pool = load_pool(&cache, grid.tile, &mut rng)?;
        info!(available = pool.len(), "Tiles loaded");

        let composition =
            Compositor::new(grid, config.opacity).compose(&base, pool, &mut rng)?;
        let matched = composition.plan.matched_count();
        let fallbacks = composition.plan.fallback_count();

        let exported = export_mosaic(
            &DynamicImage::ImageRgba8(composition.mosaic),
            &config.output_dir,
            &output_stem(SystemTime::now()),
            config.quality,
        )?;
        info!(
            path = %exported.jpeg.display(),
            used = matched,
            available = composition.pool_size,
            fallbacks,
            "Mosaic written"
        );
        info!(path = %exported.webp.display(), "WebP mosaic written");

        Ok(RunSummary {
            grid,
            preprocess,
            pool_size: composition.pool_size,
            matched,
            fallbacks,
            exported,
        })
    }

    fn preprocess(
        &self,
        cache: &TileCache,
        grid: &GridPlan,
        sources: &[PathBuf],
    ) -> Result<PreprocessReport> {
        let preprocessor = TilePreprocessor::new(cache, grid.tile, self.config.quality);
        self.progress.initialize(sources.len());

        let report = match self.config.threads {
            Some(threads) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(threads)
                    .build()
                    .map_err(|error| invalid_parameter("threads", &threads, &error))?;
                pool.install(|| preprocessor.run(sources, &self.progress))
            }
            None => preprocessor.run(sources, &self.progress),
        };

        self.progress.finish();
        Ok(report)
    }
}
