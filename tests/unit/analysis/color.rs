//! Tests for mean colors, block averaging and RGB distance

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use tilemosaic::analysis::color::{MeanColor, block_average, mean_color, rgb_distance};
    use tilemosaic::spatial::TileSize;

    // Tests a uniform tile reports exactly its color
    // Verified by dividing by the pixel count minus one
    #[test]
    fn test_mean_color_uniform_is_exact() {
        let image = RgbaImage::from_pixel(17, 9, Rgba([12, 200, 77, 255]));
        let mean = mean_color(&image);

        assert_eq!(mean.rgb(), [12.0, 200.0, 77.0]);
        assert!((mean.alpha() - 255.0).abs() < f64::EPSILON);
    }

    // Tests the mean of a two-color split
    // Verified by averaging only the first row
    #[test]
    fn test_mean_color_split() {
        let image = RgbaImage::from_fn(4, 2, |x, _| {
            if x < 2 {
                Rgba([0, 100, 200, 255])
            } else {
                Rgba([100, 200, 0, 255])
            }
        });

        assert_eq!(mean_color(&image).rgb(), [50.0, 150.0, 100.0]);
    }

    // Tests an empty image does not divide by zero
    // Verified by removing the empty guard
    #[test]
    fn test_mean_color_empty() {
        assert_eq!(mean_color(&RgbaImage::new(0, 0)), MeanColor::default());
    }

    // Tests block averaging ignores alpha and keeps block layout
    // Verified by including alpha in the channel loop
    #[test]
    fn test_block_average_blocks() {
        let image = RgbaImage::from_fn(4, 2, |x, y| {
            let alpha = if y == 0 { 10 } else { 250 };
            if x < 2 {
                Rgba([10, 20, 30, alpha])
            } else {
                Rgba([x as u8 * 10, 0, 0, alpha])
            }
        });

        let averages = block_average(&image, TileSize::square(2));

        assert_eq!(averages.dim(), (1, 2, 3));
        assert_eq!(averages.get((0, 0, 0)).copied(), Some(10.0));
        assert_eq!(averages.get((0, 0, 2)).copied(), Some(30.0));
        assert_eq!(averages.get((0, 1, 0)).copied(), Some(25.0));
        assert_eq!(averages.get((0, 1, 1)).copied(), Some(0.0));
    }

    // Tests trailing partial blocks are dropped
    // Verified by rounding the block count up
    #[test]
    fn test_block_average_ignores_remainder() {
        let image = RgbaImage::from_pixel(5, 3, Rgba([9, 9, 9, 255]));
        let averages = block_average(&image, TileSize::square(2));

        assert_eq!(averages.dim(), (1, 2, 3));
        assert!(averages.iter().all(|&v| (v - 9.0).abs() < f64::EPSILON));
    }

    // Tests Euclidean distance on a 3-4-5 triangle
    // Verified by dropping the square root
    #[test]
    fn test_rgb_distance() {
        assert!((rgb_distance([0.0, 0.0, 0.0], [3.0, 4.0, 0.0]) - 5.0).abs() < 1e-12);
        assert!(rgb_distance([1.0, 2.0, 3.0], [1.0, 2.0, 3.0]).abs() < f64::EPSILON);
    }
}
