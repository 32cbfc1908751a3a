//! Unpack command - decode a payload JSON file (offline)
//!
//! Accepts both the files written by `blastbeat pack` (tracks at the top
//! level) and saved lookup responses (tracks under `content`).

use anyhow::{Context, Result};
use blast_codec::{StoredProject, StoredTrack};
use clap::Args;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::image_format::{self, StorageFormat};

/// Arguments for the unpack command
#[derive(Args)]
pub struct UnpackArgs {
    /// Payload JSON file
    pub payload: PathBuf,

    /// Where to write the decoded file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Re-encode the decoded image before writing
    #[arg(short, long, value_enum, default_value = "raw")]
    pub convert: StorageFormat,
}

/// The two payload layouts understood by unpack
#[derive(Deserialize)]
#[serde(untagged)]
enum PayloadFile {
    Stored(StoredProject),
    Packed { tracks: Vec<StoredTrack> },
}

impl PayloadFile {
    fn into_tracks(self) -> Vec<StoredTrack> {
        match self {
            PayloadFile::Stored(project) => project.content.tracks,
            PayloadFile::Packed { tracks } => tracks,
        }
    }
}

/// Execute the unpack command
pub fn execute(args: UnpackArgs) -> Result<()> {
    let content = std::fs::read_to_string(&args.payload)
        .with_context(|| format!("Failed to read payload: {}", args.payload.display()))?;
    let payload: PayloadFile = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse payload: {}", args.payload.display()))?;

    println!("Decoding {}...", args.payload.display());
    let bytes = blast_codec::decode(&payload.into_tracks())?;
    write_output(&args.output, bytes, args.convert)
}

/// Convert (if asked) and write decoded bytes
pub fn write_output(path: &Path, bytes: Vec<u8>, convert: StorageFormat) -> Result<()> {
    image_format::describe(&bytes);
    let bytes = image_format::convert(bytes, convert)?;
    std::fs::write(path, &bytes)
        .with_context(|| format!("Failed to write output: {}", path.display()))?;
    println!("  Output: {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}
