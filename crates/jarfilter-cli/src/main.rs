//! jarfilter CLI tool.
//!
//! Usage:
//! ```bash
//! jarfilter filter --out-dir <DIR> <ARCHIVES>...
//! jarfilter plan <ARCHIVE>
//! jarfilter check
//! jarfilter init
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod filter_file;

/// Strip unused entries (e.g. foreign native libraries) out of jar archives
#[derive(Parser)]
#[command(name = "jarfilter")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output (logs every entry decision)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter archives into an output directory
    Filter {
        /// Archives to filter
        #[arg(required = true)]
        archives: Vec<PathBuf>,

        /// Directory receiving the filtered archives
        #[arg(short, long)]
        out_dir: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show what filtering an archive would keep and exclude
    Plan {
        /// Archive to inspect
        archive: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Validate the configuration file
    Check,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

/// Output format for filter reports.
#[derive(Clone, Copy, Debug, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-entry compact format.
    Compact,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cwd = std::env::current_dir()?;

    let config = cli.config.as_deref();
    match cli.command {
        Commands::Filter {
            archives,
            out_dir,
            format,
        } => {
            let file = filter_file::load(&cwd, config)?;
            commands::filter::run(&archives, &out_dir, format, &file.filters, &cwd)
        }
        Commands::Plan { archive, format } => {
            let file = filter_file::load(&cwd, config)?;
            commands::plan::run(&archive, format, &file.filters, &cwd)
        }
        Commands::Check => commands::check::run(&filter_file::load(&cwd, config)?),
        Commands::Init { force } => commands::init::run(&cwd, force),
    }
}
