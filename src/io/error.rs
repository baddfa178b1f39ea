//! Error types for tile preprocessing, loading and mosaic composition

use crate::spatial::tiles::TileSize;
use std::fmt;
use std::path::PathBuf;

/// Main error type for all mosaic operations
#[derive(Debug)]
pub enum MosaicError {
    /// Failed to open or decode an image
    ImageLoad {
        /// Path to the image file
        path: PathBuf,
        /// Underlying image loading error
        source: image::ImageError,
    },

    /// Failed to encode or write an image to disk
    ImageExport {
        /// Path where export was attempted
        path: PathBuf,
        /// Underlying image export error
        source: image::ImageError,
    },

    /// General file system operation failure
    FileSystem {
        /// Path involved in the operation
        path: PathBuf,
        /// Description of the operation that failed
        operation: &'static str,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Candidate tile has an extension outside the allow-list
    UnsupportedExtension {
        /// Path of the rejected file
        path: PathBuf,
    },

    /// No cached tile matches the active resolution
    EmptyPool {
        /// Resolution the loader searched for
        tile_size: TileSize,
    },

    /// Every loaded tile was discarded by the dimension filter
    NoValidTiles {
        /// Resolution tiles were required to have
        tile_size: TileSize,
        /// Number of records that were loaded before filtering
        loaded: usize,
    },

    /// Parameter validation failed
    InvalidParameter {
        /// Name of the invalid parameter
        parameter: &'static str,
        /// Provided value that failed validation
        value: String,
        /// Explanation of why the value is invalid
        reason: String,
    },

    /// Encoder outside the `image` crate rejected the data
    Encoding {
        /// Target format name
        format: &'static str,
        /// Path where export was attempted
        path: PathBuf,
        /// Description of the failure
        reason: String,
    },
}

impl MosaicError {
    /// Whether a per-file preprocessing run may log this error and move on
    ///
    /// Pool-level failures and bad parameters abort the run; everything tied to a
    /// single file only costs that file.
    pub const fn is_skippable(&self) -> bool {
        matches!(
            self,
            Self::ImageLoad { .. }
                | Self::ImageExport { .. }
                | Self::FileSystem { .. }
                | Self::UnsupportedExtension { .. }
                | Self::Encoding { .. }
        )
    }
}

impl fmt::Display for MosaicError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageLoad { path, source } => {
                write!(f, "Failed to load image '{}': {source}", path.display())
            }
            Self::ImageExport { path, source } => {
                write!(
                    f,
                    "Failed to export image to '{}': {source}",
                    path.display()
                )
            }
            Self::FileSystem {
                path,
                operation,
                source,
            } => {
                write!(
                    f,
                    "File system error during {operation} on '{}': {source}",
                    path.display()
                )
            }
            Self::UnsupportedExtension { path } => {
                write!(f, "Unsupported file ignored: '{}'", path.display())
            }
            Self::EmptyPool { tile_size } => {
                write!(
                    f,
                    "No tiles match the computed resolution {tile_size}; check the tiles directory"
                )
            }
            Self::NoValidTiles { tile_size, loaded } => {
                write!(
                    f,
                    "None of the {loaded} loaded tiles has the expected resolution {tile_size}"
                )
            }
            Self::InvalidParameter {
                parameter,
                value,
                reason,
            } => {
                write!(f, "Invalid parameter '{parameter}' = '{value}': {reason}")
            }
            Self::Encoding {
                format,
                path,
                reason,
            } => {
                write!(
                    f,
                    "Failed to encode {format} to '{}': {reason}",
                    path.display()
                )
            }
        }
    }
}

impl std::error::Error for MosaicError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ImageLoad { source, .. } | Self::ImageExport { source, .. } => Some(source),
            Self::FileSystem { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Convenience type alias for mosaic results
pub type Result<T> = std::result::Result<T, MosaicError>;

/// Attach a path and operation to an I/O error
pub fn file_system(
    path: impl Into<PathBuf>,
    operation: &'static str,
) -> impl FnOnce(std::io::Error) -> MosaicError {
    let path = path.into();
    move |source| MosaicError::FileSystem {
        path,
        operation,
        source,
    }
}

/// Create an invalid parameter error
pub fn invalid_parameter(
    parameter: &'static str,
    value: &impl ToString,
    reason: &impl ToString,
) -> MosaicError {
    MosaicError::InvalidParameter {
        parameter,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
