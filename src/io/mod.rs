/// Normalized tile cache
pub mod cache;
/// Command-line interface and pipeline driver
pub mod cli;
/// Constants and run configuration
pub mod configuration;
/// Error types
pub mod error;
/// Image loading and export
pub mod image;
/// Cached tile loading
pub mod loader;
/// Tile preprocessing
pub mod preprocess;
/// Progress display
pub mod progress;
