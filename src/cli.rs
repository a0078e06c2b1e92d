//! Command-line interface components.

use crate::quantity::QuantityKind;
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "subgrade-quantity")]
#[command(about = "Export subgrade treatment quantities from road cross sections")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// JSON survey file holding the section snapshots and their curves
    #[arg(value_name = "SURVEY")]
    pub survey_path: PathBuf,

    /// Quantity type to export
    #[arg(short = 'k', long, value_enum)]
    pub quantity: QuantityKind,

    /// JSON engine configuration (defaults apply when omitted)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output CSV file (defaults to `<sheet>.csv` next to the survey)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Only evaluate these stations, e.g. "K0+110,K0+120" or "110,120"
    #[arg(short, long)]
    pub stations: Option<String>,

    /// Fractional digits in station strings, overriding the config
    #[arg(short, long)]
    pub digits: Option<usize>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

impl Args {
    /// Determine the log level from the verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Output directory used when no output file is given
    pub fn default_output_dir(&self) -> PathBuf {
        self.survey_path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default()
    }
}

/// Set up structured logging on stderr
pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("subgrade_quantity={}", log_level)));

    if args.quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
