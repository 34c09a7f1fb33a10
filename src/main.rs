//! `tubeinfo` CLI - Inspect player responses as playback descriptors

mod cmd;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::Level;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use tubeinfo::{EngineConfig, FormatKind};

#[derive(Parser)]
#[command(name = "tubeinfo")]
#[command(about = "Turn a video player response into a playback descriptor")]
#[command(version)]
struct Cli {
    /// Engine config file (default: ~/.config/tubeinfo/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Log classification details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Summarize the descriptor assembled from a player response
    Inspect {
        /// Player response JSON file
        file: PathBuf,

        /// Live timing JSON to merge before printing
        #[arg(short, long)]
        timing: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// List classified formats
    Formats {
        /// Player response JSON file
        file: PathBuf,

        /// Only show formats of this kind
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
    },

    /// List caption tracks, including synthesized translations
    Captions {
        /// Player response JSON file
        file: PathBuf,
    },

    /// Print progressive playback URLs, one per line
    Urls {
        /// Player response JSON file
        file: PathBuf,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum KindArg {
    Adaptive,
    Regular,
    Restricted,
}

impl From<KindArg> for FormatKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Adaptive => Self::Adaptive,
            KindArg::Regular => Self::Regular,
            KindArg::Restricted => Self::Restricted,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; RUST_LOG wins over --verbose
    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = match &cli.config {
        Some(path) => EngineConfig::load_from(path),
        None => EngineConfig::load(),
    }
    .context("Failed to load engine config")?;

    match cli.command {
        Commands::Inspect { file, timing, format } => {
            cmd::inspect::cmd_inspect(&file, timing.as_deref(), format, &config).await?;
        }
        Commands::Formats { file, kind } => {
            cmd::formats::cmd_formats(&file, kind.map(FormatKind::from), &config).await?;
        }
        Commands::Captions { file } => {
            cmd::captions::cmd_captions(&file, &config).await?;
        }
        Commands::Urls { file } => {
            cmd::urls::cmd_urls(&file, &config).await?;
        }
    }

    Ok(())
}
