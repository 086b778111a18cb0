//! CLI argument parsing for Testigo

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the analysis report
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text report (default)
    Text,
    /// JSON document for machine parsing
    Json,
    /// Combined annotated trial table as CSV
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "testigo")]
#[command(version)]
#[command(about = "Signal-detection scoring for two-alternative forced-choice experiments", long_about = None)]
pub struct Cli {
    /// Folder to scan for per-participant CSV files
    #[arg(value_name = "FOLDER", default_value = ".")]
    pub folder: PathBuf,

    /// Output format (text, json, or csv)
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Path for the combined-table audit export
    #[arg(
        long = "export",
        value_name = "PATH",
        default_value = "eyewitnesstotal.csv"
    )]
    pub export: PathBuf,

    /// Skip writing the combined-table export
    #[arg(long = "no-export")]
    pub no_export: bool,

    /// Enable debug logging to stderr
    #[arg(long)]
    pub debug: bool,
}
