//! Archaeological Artifact Identifier
//!
//! A machine learning-based tool for identifying archaeological
//! artifacts from photographs and assembling enriched analysis reports.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use config::Config;
use tracing_subscriber::EnvFilter;

mod commands;

/// Archaeological Artifact Identifier
#[derive(Parser)]
#[command(name = "artifact-scan")]
#[command(about = "ML-based identification and reporting for archaeological artifacts")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify an artifact photograph
    Classify {
        /// Path to the image file
        #[arg(short, long)]
        image: PathBuf,

        /// Number of ranked predictions to keep (defaults to TOP_K)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Measured C-14 decay percentage, in (0, 100]
        #[arg(long)]
        decay_percent: Option<f64>,

        /// Observer latitude in decimal degrees (requires --lon)
        #[arg(long)]
        lat: Option<f64>,

        /// Observer longitude in decimal degrees (requires --lat)
        #[arg(long)]
        lon: Option<f64>,

        /// Print the full structured outcome as JSON
        #[arg(long)]
        json: bool,
    },

    /// Classify an artifact photograph and write a PDF report
    Report {
        /// Path to the image file
        #[arg(short, long)]
        image: PathBuf,

        /// Number of ranked predictions to keep (defaults to TOP_K)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,

        /// Measured C-14 decay percentage, in (0, 100]
        #[arg(long)]
        decay_percent: Option<f64>,

        /// Observer latitude in decimal degrees (requires --lon)
        #[arg(long)]
        lat: Option<f64>,

        /// Observer longitude in decimal degrees (requires --lat)
        #[arg(long)]
        lon: Option<f64>,

        /// Where to write the PDF (defaults to the output directory)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Estimate a sample's age from its C-14 decay percentage
    Date {
        /// Remaining C-14 percentage, in (0, 100]
        #[arg(short, long)]
        percentage: f64,
    },

    /// List reference excavation sites, ranked by distance if a location is given
    Sites {
        /// Observer latitude in decimal degrees (requires --lon)
        #[arg(long)]
        lat: Option<f64>,

        /// Observer longitude in decimal degrees (requires --lat)
        #[arg(long)]
        lon: Option<f64>,
    },

    /// Show the archaeological era timeline
    Timeline,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing subscriber
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = Config::from_env()?;

    match cli.command {
        Commands::Classify {
            image,
            top_k,
            decay_percent,
            lat,
            lon,
            json,
        } => {
            commands::classify::run(&config, &image, top_k, decay_percent, lat, lon, json)?;
        }
        Commands::Report {
            image,
            top_k,
            decay_percent,
            lat,
            lon,
            output,
        } => {
            commands::report::run(
                &config,
                &image,
                top_k,
                decay_percent,
                lat,
                lon,
                output.as_deref(),
            )?;
        }
        Commands::Date { percentage } => {
            commands::date::run(percentage)?;
        }
        Commands::Sites { lat, lon } => {
            commands::sites::run(lat, lon)?;
        }
        Commands::Timeline => {
            commands::timeline::run();
        }
    }

    Ok(())
}
