//! Image format normalization before encoding and after decoding.

use anyhow::{Context, Result};
use clap::ValueEnum;
use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;

/// How a file is stored in (or restored from) a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StorageFormat {
    /// Re-encode as PNG
    #[default]
    Png,
    /// Re-encode as JPEG (alpha is dropped)
    Jpeg,
    /// Keep the file bytes untouched
    Raw,
}

impl StorageFormat {
    fn image_format(self) -> Option<ImageFormat> {
        match self {
            StorageFormat::Png => Some(ImageFormat::Png),
            StorageFormat::Jpeg => Some(ImageFormat::Jpeg),
            StorageFormat::Raw => None,
        }
    }
}

/// Read a file and re-encode it in the requested format.
pub fn normalize(path: &Path, format: StorageFormat) -> Result<Vec<u8>> {
    let Some(target) = format.image_format() else {
        return std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()));
    };

    let img =
        image::open(path).with_context(|| format!("Failed to load image: {}", path.display()))?;
    tracing::debug!(
        width = img.width(),
        height = img.height(),
        "Re-encoding {} as {:?}",
        path.display(),
        target
    );
    encode_image(&img, target)
}

/// Re-encode decoded bytes in the requested format.
///
/// Bytes that are not a recognized image are returned unchanged with a warning.
pub fn convert(bytes: Vec<u8>, format: StorageFormat) -> Result<Vec<u8>> {
    let Some(target) = format.image_format() else {
        return Ok(bytes);
    };

    match image::load_from_memory(&bytes) {
        Ok(img) => encode_image(&img, target),
        Err(e) => {
            tracing::warn!("Decoded data is not a readable image ({}), keeping raw bytes", e);
            Ok(bytes)
        }
    }
}

/// Log what kind of file came out of a project.
pub fn describe(bytes: &[u8]) {
    match image::guess_format(bytes) {
        Ok(format) => tracing::info!("Decoded {} bytes ({:?} image)", bytes.len(), format),
        Err(_) => tracing::warn!(
            "Decoded {} bytes, but they do not look like an image",
            bytes.len()
        ),
    }
}

fn encode_image(img: &DynamicImage, format: ImageFormat) -> Result<Vec<u8>> {
    let mut out = Cursor::new(Vec::new());
    let written = match format {
        // JPEG has no alpha channel
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()).write_to(&mut out, format),
        _ => img.write_to(&mut out, format),
    };
    written.with_context(|| format!("Failed to encode image as {:?}", format))?;
    Ok(out.into_inner())
}
