//! Pack command - encode a file into a payload JSON file (offline)

use anyhow::{Context, Result};
use blast_codec::EncodedProject;
use clap::Args;
use std::path::{Path, PathBuf};

use crate::config::Config;
use crate::image_format::{self, StorageFormat};

/// Arguments for the pack command
#[derive(Args)]
pub struct PackArgs {
    /// File to encode (normally an image)
    pub input: PathBuf,

    /// Where to write the payload JSON
    #[arg(short, long)]
    pub output: PathBuf,

    /// Storage format (defaults to `image.format` from the config)
    #[arg(short, long, value_enum)]
    pub format: Option<StorageFormat>,
}

/// Execute the pack command
pub fn execute(args: PackArgs, config: &Config) -> Result<()> {
    let format = args.format.unwrap_or(config.image.format);
    let project = encode_file(&args.input, format)?;
    write_payload(&args.output, &project)?;
    println!("  Payload: {}", args.output.display());
    Ok(())
}

/// Normalize and encode a file
pub fn encode_file(input: &Path, format: StorageFormat) -> Result<EncodedProject> {
    let bytes = image_format::normalize(input, format)?;
    println!("Encoding {} ({} bytes)...", input.display(), bytes.len());
    Ok(blast_codec::encode(&bytes))
}

/// Write a project as pretty-printed JSON
pub fn write_payload(path: &Path, project: &EncodedProject) -> Result<()> {
    let json = serde_json::to_string_pretty(project).context("Failed to serialize payload")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write payload: {}", path.display()))?;
    Ok(())
}
