//! Persistent cache of normalized tiles keyed by path fingerprint and resolution

use crate::io::configuration::CACHE_EXTENSION;
use crate::io::error::{Result, file_system};
use crate::io::image::encode_jpeg;
use crate::spatial::TileSize;
use image::RgbImage;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::WalkDir;

/// Identity of one cached tile: `md5(source path)` plus target resolution
///
/// Only the path is hashed, so editing a source file in place keeps serving the old
/// entry until the cache file is removed.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct CacheKey {
    fingerprint: String,
    tile_size: TileSize,
}

impl CacheKey {
    /// Key for a source file at a tile resolution
    pub fn for_source(source: &Path, tile_size: TileSize) -> Self {
        let digest = md5::compute(source.to_string_lossy().as_bytes());
        Self {
            fingerprint: format!("{digest:x}"),
            tile_size,
        }
    }

    /// Lowercase hex MD5 of the source path
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Resolution encoded in the key
    pub const fn tile_size(&self) -> TileSize {
        self.tile_size
    }

    /// `<fingerprint>_<width>x<height>.jpg`
    pub fn file_name(&self) -> String {
        format!("{}{}", self.fingerprint, resolution_suffix(self.tile_size))
    }
}

/// File name suffix shared by every cache entry of a resolution
pub fn resolution_suffix(tile_size: TileSize) -> String {
    format!("_{tile_size}.{CACHE_EXTENSION}")
}

/// Directory of normalized tiles
#[derive(Clone, Debug)]
pub struct TileCache {
    dir: PathBuf,
}

impl TileCache {
    /// Open the cache, creating the directory if needed
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(file_system(&dir, "create cache directory"))?;
        Ok(Self { dir })
    }

    /// Cache root
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Where the entry for `key` lives
    pub fn path_for(&self, key: &CacheKey) -> PathBuf {
        self.dir.join(key.file_name())
    }

    /// Whether an entry for `key` has been written
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.path_for(key).is_file()
    }

    /// Persist a normalized tile under `key`
    ///
    /// The image is written beside the final path and renamed into place, so a crash
    /// mid-write never leaves a truncated entry that later runs would treat as done. A
    /// failed write removes its partial file.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding, writing or renaming fails
    pub fn store(&self, key: &CacheKey, tile: &RgbImage, quality: u8) -> Result<PathBuf> {
        let path = self.path_for(key);
        let partial = self.dir.join(format!("{}.partial", key.file_name()));

        let written = encode_jpeg(tile, &partial, quality).and_then(|()| {
            std::fs::rename(&partial, &path).map_err(file_system(&path, "finalize cache entry"))
        });
        if let Err(error) = written {
            let _ = std::fs::remove_file(&partial);
            return Err(error);
        }
        Ok(path)
    }

    /// Every entry for a resolution, sorted by file name
    pub fn entries_for(&self, tile_size: TileSize) -> Vec<PathBuf> {
        let suffix = resolution_suffix(tile_size);
        let mut entries = Vec::new();

        for entry in WalkDir::new(&self.dir).sort_by_file_name() {
            match entry {
                Ok(entry) => {
                    let matches = entry.file_type().is_file()
                        && entry.file_name().to_string_lossy().ends_with(&suffix);
                    if matches {
                        entries.push(entry.into_path());
                    }
                }
                Err(error) => warn!(%error, "Skipping unreadable cache entry"),
            }
        }

        entries
    }
}
