//! Command-line interface for seed_classifier
//!
//! Runs every search on the two input tables and prints the best
//! configuration of each.

use clap::Parser;
use seed_classifier::{run_searches, SearchConfig};
use std::{path::PathBuf, process};
use tracing::Level;

#[derive(Parser)]
#[command(name = "seed_classifier")]
#[command(about = "Train the seed classifier, choose the best parameters")]
struct Cli {
    /// Tsv file containing images' filenames with colors
    #[arg(long = "photo-info")]
    photo_info: PathBuf,

    /// Tsv file containing seed pixels
    #[arg(long = "seed-data")]
    seed_data: PathBuf,
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging();

    let config = SearchConfig::new(cli.photo_info, cli.seed_data);
    let result = run_searches(&config, |case, report| {
        println!("{}", case);
        println!("{}", report);
    });

    if let Err(error) = result {
        eprintln!("Search failed: {}", error);
        if error.is_data_error() {
            eprintln!("Check the photo info and seed data tables.");
        }
        process::exit(1);
    }
}
