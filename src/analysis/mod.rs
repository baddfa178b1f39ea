//! Color analysis for tiles and base image regions

/// Mean colors, block averaging and distance
pub mod color;
