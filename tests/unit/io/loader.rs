//! Tests for loading cached tiles into a shuffled pool

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage};
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::path::Path;
    use tilemosaic::MosaicError;
    use tilemosaic::io::cache::{CacheKey, TileCache};
    use tilemosaic::io::loader::{load_pool, load_record};
    use tilemosaic::spatial::TileSize;

    const SIZE: TileSize = TileSize::square(8);

    fn filled_cache(root: &Path, count: u8) -> Option<TileCache> {
        let cache = TileCache::open(root).ok()?;
        for i in 0..count {
            let tile = RgbImage::from_pixel(8, 8, Rgb([i * 20, 100, 255 - i * 20]));
            let key = CacheKey::for_source(Path::new(&format!("tile{i}.jpg")), SIZE);
            cache.store(&key, &tile, 95).ok()?;
        }
        Some(cache)
    }

    // Tests an empty cache is a fatal empty-pool error
    // Verified by returning an empty pool
    #[test]
    fn test_empty_cache_is_error() {
        let Ok(root) = tempfile::tempdir() else {
            return;
        };
        let Some(cache) = filled_cache(root.path(), 0) else {
            return;
        };
        let mut rng = StdRng::seed_from_u64(1);

        let result = load_pool(&cache, SIZE, &mut rng);

        assert!(matches!(result, Err(MosaicError::EmptyPool { tile_size }) if tile_size == SIZE));
    }

    // Tests only the active resolution is loaded
    // Verified by ignoring the suffix filter
    #[test]
    fn test_loads_matching_resolution_only() {
        let Ok(root) = tempfile::tempdir() else {
            return;
        };
        let Some(cache) = filled_cache(root.path(), 5) else {
            return;
        };
        let other = CacheKey::for_source(Path::new("big.jpg"), TileSize::square(12));
        assert!(
            cache
                .store(&other, &RgbImage::from_pixel(12, 12, Rgb([0, 0, 0])), 90)
                .is_ok()
        );
        let mut rng = StdRng::seed_from_u64(2);

        let pool = load_pool(&cache, SIZE, &mut rng).unwrap_or_default();

        assert_eq!(pool.len(), 5);
        assert!(pool.iter().all(|record| SIZE.matches(&record.image)));
    }

    // Tests corrupt entries are skipped
    // Verified by propagating the load error
    #[test]
    fn test_corrupt_entry_skipped() {
        let Ok(root) = tempfile::tempdir() else {
            return;
        };
        let Some(cache) = filled_cache(root.path(), 2) else {
            return;
        };
        assert!(std::fs::write(root.path().join("broken_8x8.jpg"), b"garbage").is_ok());
        let mut rng = StdRng::seed_from_u64(3);

        let pool = load_pool(&cache, SIZE, &mut rng).unwrap_or_default();

        assert_eq!(pool.len(), 2);
    }

    // Tests the shuffle is driven by the supplied generator
    // Verified by shuffling with a fresh unseeded generator
    #[test]
    fn test_shuffle_reproducible_with_seed() {
        let Ok(root) = tempfile::tempdir() else {
            return;
        };
        let Some(cache) = filled_cache(root.path(), 10) else {
            return;
        };

        let order = |seed: u64| -> Vec<[f64; 3]> {
            let mut rng = StdRng::seed_from_u64(seed);
            load_pool(&cache, SIZE, &mut rng)
                .unwrap_or_default()
                .iter()
                .map(|record| record.rgb())
                .collect()
        };

        assert_eq!(order(99), order(99));
        assert_eq!(order(99).len(), 10);
    }

    // Tests a single record's mean approximates its solid color
    // Verified by computing the mean before decoding
    #[test]
    fn test_load_record_mean() {
        let Ok(root) = tempfile::tempdir() else {
            return;
        };
        let path = root.path().join("solid.png");
        assert!(RgbImage::from_pixel(6, 6, Rgb([40, 80, 160])).save(&path).is_ok());

        let Ok(record) = load_record(&path) else {
            unreachable!("record should load");
        };

        assert_eq!(record.rgb(), [40.0, 80.0, 160.0]);
        assert!((record.mean.alpha() - 255.0).abs() < f64::EPSILON);
    }
}
