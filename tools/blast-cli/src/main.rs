//! Blastbeat CLI - store images in OneMotion drum-machine projects
//!
//! # Commands
//!
//! - `blastbeat encode` - Encode an image and share it, printing the project code
//! - `blastbeat decode` - Fetch a project by code and write the stored file
//! - `blastbeat pack` - Encode an image into a payload JSON file (offline)
//! - `blastbeat unpack` - Decode a payload JSON file (offline)
//!
//! # Usage
//!
//! ```bash
//! # Store an image, prints the share code
//! blastbeat encode atom.png
//!
//! # Get it back
//! blastbeat decode rbOc15290 -o decoded.png
//!
//! # Inspect the payload without touching the network
//! blastbeat pack atom.png -o atom.json
//! blastbeat unpack atom.json -o atom-copy.png
//! ```
//!
//! # Configuration (config.toml)
//!
//! ```toml
//! [service]
//! base_url = "https://www.onemotion.com"
//! timeout_secs = 30
//!
//! [image]
//! format = "png"
//! ```

mod config;
mod decode;
mod encode;
mod image_format;
mod pack;
mod service;
mod unpack;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Blastbeat CLI - store images in OneMotion drum-machine projects
#[derive(Parser)]
#[command(name = "blastbeat")]
#[command(about = "Store images in OneMotion drum-machine step sequencer cells")]
#[command(version)]
struct Cli {
    /// Configuration file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a file into a drum-machine project and share it
    Encode(encode::EncodeArgs),

    /// Fetch a shared project and decode the stored file
    Decode(decode::DecodeArgs),

    /// Encode a file into a payload JSON file without sharing it
    Pack(pack::PackArgs),

    /// Decode a payload JSON file
    Unpack(unpack::UnpackArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let config = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Encode(args) => encode::execute(args, &config),
        Commands::Decode(args) => decode::execute(args, &config),
        Commands::Pack(args) => pack::execute(args, &config),
        Commands::Unpack(args) => unpack::execute(args),
    }
}
