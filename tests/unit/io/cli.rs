//! Tests for command-line parsing, lenient value recovery and run setup

#[cfg(test)]
mod tests {
    use clap::Parser;
    use std::path::PathBuf;
    use std::time::{Duration, UNIX_EPOCH};
    use tilemosaic::io::cli::{
        Cli, MosaicRunner, init_logging, output_stem, parse_opacity, parse_width,
    };
    use tilemosaic::io::configuration::{
        DEFAULT_CACHE_DIR, DEFAULT_OPACITY, DEFAULT_OUTPUT_DIR, DEFAULT_QUALITY,
        DEFAULT_TILES_DIR, DEFAULT_WIDTH,
    };

    // Tests CLI parsing with only the base image
    // Verified by changing default values to ensure defaults are used
    #[test]
    fn test_cli_parse_minimal_args() {
        let cli = Cli::parse_from(["program", "base.png"]);

        assert_eq!(cli.base_image, PathBuf::from("base.png"));
        assert_eq!(cli.width, None);
        assert_eq!(cli.opacity, None);
        assert_eq!(cli.tiles_dir, PathBuf::from(DEFAULT_TILES_DIR));
        assert_eq!(cli.cache_dir, PathBuf::from(DEFAULT_CACHE_DIR));
        assert_eq!(cli.output_dir, PathBuf::from(DEFAULT_OUTPUT_DIR));
        assert_eq!(cli.quality, DEFAULT_QUALITY);
        assert!(!cli.quiet);

        let config = cli.into_config();
        assert_eq!(config.output_width, DEFAULT_WIDTH);
        assert!((config.opacity - DEFAULT_OPACITY).abs() < f64::EPSILON);
    }

    // Tests CLI parsing with all available arguments
    // Verified by dropping fields in the config conversion
    #[test]
    fn test_cli_parse_all_args() {
        let cli = Cli::parse_from([
            "program",
            "base.jpg",
            "2560",
            "0.45",
            "--tiles-dir",
            "photos",
            "--cache-dir",
            "cache",
            "--output-dir",
            "out",
            "--seed",
            "17",
            "--threads",
            "3",
            "--quality",
            "80",
            "--quiet",
        ]);
        let config = cli.into_config();

        assert_eq!(config.base_image, PathBuf::from("base.jpg"));
        assert_eq!(config.output_width, 2560);
        assert!((config.opacity - 0.45).abs() < f64::EPSILON);
        assert_eq!(config.tiles_dir, PathBuf::from("photos"));
        assert_eq!(config.cache_dir, PathBuf::from("cache"));
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.seed, Some(17));
        assert_eq!(config.threads, Some(3));
        assert_eq!(config.quality, 80);
        assert!(config.quiet);
    }

    // Tests invalid positional values fall back instead of failing
    // Verified by typing the positionals as numbers
    #[test]
    fn test_cli_invalid_values_recover() {
        let config = Cli::parse_from(["program", "base.png", "wide", "1.5"]).into_config();

        assert_eq!(config.output_width, DEFAULT_WIDTH);
        assert!((config.opacity - DEFAULT_OPACITY).abs() < f64::EPSILON);
    }

    // Tests quality outside 1..=100 is rejected by the parser
    // Verified by removing the range on the value parser
    #[test]
    fn test_cli_quality_range() {
        assert!(Cli::try_parse_from(["program", "base.png", "--quality", "0"]).is_err());
        assert!(Cli::try_parse_from(["program", "base.png", "--quality", "101"]).is_err());
    }

    // Tests width parsing edge cases
    // Verified by accepting zero
    #[test]
    fn test_parse_width() {
        assert_eq!(parse_width(None), DEFAULT_WIDTH);
        assert_eq!(parse_width(Some("800")), 800);
        assert_eq!(parse_width(Some(" 640 ")), 640);
        assert_eq!(parse_width(Some("0")), DEFAULT_WIDTH);
        assert_eq!(parse_width(Some("-5")), DEFAULT_WIDTH);
        assert_eq!(parse_width(Some("12.5")), DEFAULT_WIDTH);
    }

    // Tests opacity parsing keeps the closed unit interval
    // Verified by using an exclusive upper bound
    #[test]
    fn test_parse_opacity() {
        assert!((parse_opacity(None) - DEFAULT_OPACITY).abs() < f64::EPSILON);
        assert!(parse_opacity(Some("0")).abs() < f64::EPSILON);
        assert!((parse_opacity(Some("1")) - 1.0).abs() < f64::EPSILON);
        assert!((parse_opacity(Some("0.75")) - 0.75).abs() < f64::EPSILON);
        assert!((parse_opacity(Some("-0.2")) - DEFAULT_OPACITY).abs() < f64::EPSILON);
        assert!((parse_opacity(Some("NaN")) - DEFAULT_OPACITY).abs() < f64::EPSILON);
        assert!((parse_opacity(Some("half")) - DEFAULT_OPACITY).abs() < f64::EPSILON);
    }

    // Tests output names carry the unix timestamp
    // Verified by formatting milliseconds
    #[test]
    fn test_output_stem() {
        let time = UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        assert_eq!(output_stem(time), "mosaic_1700000000");
    }

    // Tests repeated logging setup does not panic
    // Verified by calling init instead of try_init
    #[test]
    fn test_init_logging_twice() {
        init_logging(true);
        init_logging(false);
    }

    // Tests the runner keeps its configuration
    // Verified by rebuilding the config with defaults
    #[test]
    fn test_runner_keeps_config() {
        let config = Cli::parse_from(["program", "base.png", "1024", "--quiet"]).into_config();
        let runner = MosaicRunner::new(config.clone());

        assert_eq!(runner.config(), &config);
    }
}
