pub mod report;

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Command-line arguments for suvmap
#[derive(Parser, Debug)]
#[command(name = "suvmap")]
#[command(about = "Discover DICOM Real World Value Mapping objects and their referenced series")]
#[command(version)]
pub struct Cli {
    /// Directory containing DICOM files
    #[arg(value_name = "DIRECTORY")]
    pub directory: PathBuf,

    /// Output format
    #[arg(short, long, default_value = "text")]
    pub format: OutputFormat,

    /// Abort on referenced instances missing from the scanned directory
    #[arg(short, long)]
    pub strict: bool,

    /// Verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Output format options
#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format
    Text,
    /// JSON format
    Json,
}
