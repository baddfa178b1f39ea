//! Mean colors, block averages and RGB distance

use crate::spatial::tiles::TileSize;
use image::RgbaImage;
use ndarray::Array3;

/// Per-channel mean of an RGBA image
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeanColor {
    channels: [f64; 4],
}

impl MeanColor {
    /// Construct from explicit channel means
    pub const fn new(channels: [f64; 4]) -> Self {
        Self { channels }
    }

    /// Red, green and blue means
    pub const fn rgb(&self) -> [f64; 3] {
        let [r, g, b, _] = self.channels;
        [r, g, b]
    }

    /// Alpha mean
    pub const fn alpha(&self) -> f64 {
        self.channels[3]
    }
}

/// Mean over every pixel for each of the four channels
///
/// An empty image yields all zeros.
pub fn mean_color(image: &RgbaImage) -> MeanColor {
    let pixel_count = u64::from(image.width()) * u64::from(image.height());
    if pixel_count == 0 {
        return MeanColor::default();
    }

    let mut sums = [0u64; 4];
    for pixel in image.pixels() {
        for (sum, &value) in sums.iter_mut().zip(pixel.0.iter()) {
            *sum += u64::from(value);
        }
    }

    MeanColor::new(sums.map(|sum| sum as f64 / pixel_count as f64))
}

/// Average RGB of each `tile.height x tile.width` block
///
/// Returns an array shaped `(rows, cols, 3)` where `rows = height / tile.height` and
/// `cols = width / tile.width`. Pixels beyond the last full block are ignored; alpha never
/// contributes.
pub fn block_average(image: &RgbaImage, tile: TileSize) -> Array3<f64> {
    let rows = (image.height() / tile.height.max(1)) as usize;
    let cols = (image.width() / tile.width.max(1)) as usize;
    let mut sums = Array3::<f64>::zeros((rows, cols, 3));

    for (x, y, pixel) in image.enumerate_pixels() {
        let row = (y / tile.height.max(1)) as usize;
        let col = (x / tile.width.max(1)) as usize;
        for (channel, &value) in pixel.0.iter().take(3).enumerate() {
            // Out-of-range positions fall in the trailing partial block
            if let Some(sum) = sums.get_mut((row, col, channel)) {
                *sum += f64::from(value);
            }
        }
    }

    let block_pixels = f64::from(tile.width) * f64::from(tile.height);
    if block_pixels > 0.0 {
        sums.mapv_inplace(|sum| sum / block_pixels);
    }
    sums
}

/// Euclidean distance between two RGB triples
pub fn rgb_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y) * (x - y))
        .sum::<f64>()
        .sqrt()
}
