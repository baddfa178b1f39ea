//! Tile normalization into the cache with per-file outcomes

use crate::io::cache::{CacheKey, TileCache};
use crate::io::configuration::{RESIZE_FILTER, VALID_EXTENSIONS};
use crate::io::error::{MosaicError, Result};
use crate::io::image::load_oriented;
use crate::io::progress::ProgressManager;
use crate::spatial::TileSize;
use image::error::{ParameterError, ParameterErrorKind};
use image::{DynamicImage, ImageError, RgbImage, imageops};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// What happened to one source file
#[derive(Debug)]
pub enum FileOutcome {
    /// Decoded, normalized and written to the cache
    Converted(PathBuf),
    /// Cache entry already present; nothing decoded
    Cached(PathBuf),
    /// Left out of the pool
    Skipped(MosaicError),
}

impl FileOutcome {
    /// Whether the file ended up with a usable cache entry
    pub const fn is_processed(&self) -> bool {
        matches!(self, Self::Converted(_) | Self::Cached(_))
    }
}

/// Outcome for one source path
#[derive(Debug)]
pub struct FileReport {
    /// Source file
    pub source: PathBuf,
    /// Result of preprocessing it
    pub outcome: FileOutcome,
}

/// Outcomes for a whole preprocessing batch, in source order
#[derive(Debug, Default)]
pub struct PreprocessReport {
    /// One entry per visited file
    pub files: Vec<FileReport>,
}

impl PreprocessReport {
    /// Files visited
    pub fn total(&self) -> usize {
        self.files.len()
    }

    /// Files normalized during this run
    pub fn converted(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Converted(_)))
    }

    /// Files served from the cache
    pub fn cached(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Cached(_)))
    }

    /// Files left out
    pub fn skipped(&self) -> usize {
        self.count(|outcome| matches!(outcome, FileOutcome::Skipped(_)))
    }

    /// Files with a usable cache entry
    pub fn processed(&self) -> usize {
        self.count(FileOutcome::is_processed)
    }

    fn count(&self, predicate: impl Fn(&FileOutcome) -> bool) -> usize {
        self.files.iter().filter(|f| predicate(&f.outcome)).count()
    }
}

/// Whether the extension is in the allow-list, ignoring case
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| {
            VALID_EXTENSIONS
                .iter()
                .any(|valid| ext.eq_ignore_ascii_case(valid))
        })
}

/// Every file under `dir`, recursively, sorted by name within each directory
pub fn collect_sources(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => entry.file_type().is_file().then(|| entry.into_path()),
            Err(error) => {
                warn!(%error, "Skipping unreadable tile source");
                None
            }
        })
        .collect()
}

/// Center-crop to the tile aspect ratio and resize to the exact tile size
///
/// `source` only labels the error.
///
/// # Errors
///
/// Returns an error if the image collapses to zero pixels along either axis
pub fn normalize(image: &DynamicImage, tile_size: TileSize, source: &Path) -> Result<RgbImage> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let target_ratio = tile_size.aspect_ratio();
    let image_ratio = f64::from(width) / f64::from(height.max(1));

    let (x, y, crop_width, crop_height) = if image_ratio > target_ratio {
        let new_width = (target_ratio * f64::from(height)) as u32;
        ((width.saturating_sub(new_width)) / 2, 0, new_width, height)
    } else {
        let new_height = (f64::from(width) / target_ratio) as u32;
        (0, (height.saturating_sub(new_height)) / 2, width, new_height)
    };

    if crop_width == 0 || crop_height == 0 {
        return Err(MosaicError::ImageLoad {
            path: source.to_path_buf(),
            source: ImageError::Parameter(ParameterError::from_kind(
                ParameterErrorKind::DimensionMismatch,
            )),
        });
    }

    let cropped = imageops::crop_imm(&rgb, x, y, crop_width, crop_height).to_image();
    Ok(imageops::resize(
        &cropped,
        tile_size.width,
        tile_size.height,
        RESIZE_FILTER,
    ))
}

/// Normalizes source tiles into a [`TileCache`] for one resolution
pub struct TilePreprocessor<'a> {
    cache: &'a TileCache,
    tile_size: TileSize,
    quality: u8,
}

impl<'a> TilePreprocessor<'a> {
    /// Create a preprocessor writing `tile_size` entries at `quality`
    pub const fn new(cache: &'a TileCache, tile_size: TileSize, quality: u8) -> Self {
        Self {
            cache,
            tile_size,
            quality,
        }
    }

    /// Preprocess a single file; never fails, errors become [`FileOutcome::Skipped`]
    pub fn process_file(&self, source: &Path) -> FileOutcome {
        if !is_supported(source) {
            return FileOutcome::Skipped(MosaicError::UnsupportedExtension {
                path: source.to_path_buf(),
            });
        }

        let key = CacheKey::for_source(source, self.tile_size);
        if self.cache.contains(&key) {
            return FileOutcome::Cached(self.cache.path_for(&key));
        }

        match self.convert(source, &key) {
            Ok(path) => FileOutcome::Converted(path),
            Err(error) => FileOutcome::Skipped(error),
        }
    }

    fn convert(&self, source: &Path, key: &CacheKey) -> Result<PathBuf> {
        let image = load_oriented(source)?;
        let tile = normalize(&image, self.tile_size, source)?;
        self.cache.store(key, &tile, self.quality)
    }

    /// Preprocess every source in parallel, reporting progress after each file
    ///
    /// Each file owns its cache key, so workers never touch the same entry.
    pub fn run(&self, sources: &[PathBuf], progress: &ProgressManager) -> PreprocessReport {
        let files = sources
            .par_iter()
            .map(|source| {
                let outcome = self.process_file(source);
                match &outcome {
                    FileOutcome::Converted(path) => {
                        debug!(source = %source.display(), cache = %path.display(), "Tile processed");
                    }
                    FileOutcome::Cached(path) => {
                        debug!(cache = %path.display(), "Tile already processed");
                    }
                    FileOutcome::Skipped(error) => {
                        warn!(path = %source.display(), %error, "Tile skipped");
                    }
                }
                progress.record(outcome.is_processed());
                FileReport {
                    source: source.clone(),
                    outcome,
                }
            })
            .collect();

        PreprocessReport { files }
    }
}
