//! Tile dimensions and in-memory tile records

use crate::analysis::color::{MeanColor, mean_color};
use image::RgbaImage;
use std::fmt;

/// Pixel dimensions of a single tile
///
/// The planner only ever produces squares, but cropping and resizing work for any shape.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct TileSize {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl TileSize {
    /// Square tile with the given side length
    pub const fn square(side: u32) -> Self {
        Self {
            width: side,
            height: side,
        }
    }

    /// Width over height
    pub fn aspect_ratio(self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Whether an image has exactly these dimensions
    pub fn matches(self, image: &RgbaImage) -> bool {
        image.dimensions() == (self.width, self.height)
    }
}

impl fmt::Display for TileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// A loaded cached tile together with its mean color
#[derive(Clone, Debug)]
pub struct TileRecord {
    /// Normalized tile pixels
    pub image: RgbaImage,
    /// Mean over all four channels
    pub mean: MeanColor,
}

impl TileRecord {
    /// Wrap an image, computing its mean color
    pub fn new(image: RgbaImage) -> Self {
        let mean = mean_color(&image);
        Self { image, mean }
    }

    /// Mean RGB used for distance comparisons
    pub const fn rgb(&self) -> [f64; 3] {
        self.mean.rgb()
    }
}
