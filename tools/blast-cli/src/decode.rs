//! Decode command - fetch a shared project and restore the stored file

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::config::Config;
use crate::image_format::StorageFormat;
use crate::service::DrumMachineClient;
use crate::unpack;

/// Arguments for the decode command
#[derive(Args)]
pub struct DecodeArgs {
    /// Project code printed by `blastbeat encode`
    pub code: String,

    /// Where to write the decoded file
    #[arg(short, long)]
    pub output: PathBuf,

    /// Re-encode the decoded image before writing
    #[arg(short, long, value_enum, default_value = "raw")]
    pub convert: StorageFormat,
}

/// Execute the decode command
pub fn execute(args: DecodeArgs, config: &Config) -> Result<()> {
    let client = DrumMachineClient::new(&config.service)?;
    let project = client
        .fetch(&args.code)
        .with_context(|| format!("Failed to fetch project {}", args.code))?;

    println!("Decoding project {}...", args.code);
    let bytes = blast_codec::decode_project(&project)?;
    unpack::write_output(&args.output, bytes, args.convert)
}
