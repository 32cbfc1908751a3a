//! Encode command - store a file in a shared drum-machine project
//!
//! Normalizes the image, encodes it into a project and shares it through
//! the drum-machine service. The returned code is what `blastbeat decode`
//! needs to get the file back.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::config::Config;
use crate::image_format::StorageFormat;
use crate::pack;
use crate::service::DrumMachineClient;

/// Arguments for the encode command
#[derive(Args)]
pub struct EncodeArgs {
    /// File to store (normally an image)
    pub input: PathBuf,

    /// Storage format (defaults to `image.format` from the config)
    #[arg(short, long, value_enum)]
    pub format: Option<StorageFormat>,

    /// Also write the shared payload as JSON
    #[arg(long)]
    pub payload_out: Option<PathBuf>,
}

/// Execute the encode command
pub fn execute(args: EncodeArgs, config: &Config) -> Result<()> {
    let format = args.format.unwrap_or(config.image.format);
    let project = pack::encode_file(&args.input, format)?;

    if let Some(path) = &args.payload_out {
        pack::write_payload(path, &project)?;
        println!("  Payload: {}", path.display());
    }

    let client = DrumMachineClient::new(&config.service)?;
    let code = client
        .share(&project)
        .context("Failed to share project")?;

    println!("  Code: {}", code);
    Ok(())
}
