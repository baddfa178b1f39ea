//! CLI entry point for the photo-mosaic generator

use clap::Parser;
use std::process::ExitCode;
use tilemosaic::io::cli::{Cli, MosaicRunner, init_logging};
use tracing::error;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.quiet);

    match MosaicRunner::new(cli.into_config()).run() {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
