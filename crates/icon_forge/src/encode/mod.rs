//! Platform container encoders
//!
//! Each encoder takes the complete variant set for its platform and produces
//! one artifact. Variant sets are checked against the size table first.

mod icns;
mod ico;
mod png;

pub use self::icns::*;
pub use self::ico::*;
pub use self::png::*;

use crate::{sizes, ConvertOptions, IconForgeError, Platform, PlatformArtifact, RasterVariant};
use image::ImageFormat;
use std::io::Cursor;

/// Builds one platform's artifact from its variants
pub trait ContainerEncoder: Send + Sync {
    fn platform(&self) -> Platform;

    fn encode(
        &self,
        variants: &[RasterVariant],
        base_name: &str,
    ) -> Result<PlatformArtifact, IconForgeError>;
}

/// Encoder for a platform, configured from run options
pub fn encoder_for(platform: Platform, options: &ConvertOptions) -> Box<dyn ContainerEncoder> {
    match platform {
        Platform::MacOs => Box::new(IcnsEncoder {
            retina_aliases: options.icns_retina_aliases,
        }),
        Platform::Windows => Box::new(IcoEncoder),
        Platform::Linux => Box::new(PngEncoder),
    }
}

/// Order `variants` by the platform's size table
///
/// Fails unless there is exactly one variant per required size and each
/// variant's buffer matches its declared size.
pub fn check_size_set(
    platform: Platform,
    variants: &[RasterVariant],
) -> Result<Vec<&RasterVariant>, IconForgeError> {
    let expected = sizes::sizes_for(platform);
    let declared: Vec<u32> = variants.iter().map(|v| v.size).collect();

    if variants.len() != expected.len() {
        return Err(IconForgeError::incomplete_size_set(format!(
            "{} needs sizes {:?}, got {:?}",
            platform, expected, declared
        )));
    }

    let mut ordered = Vec::with_capacity(expected.len());
    for &size in expected {
        let mut matching = variants.iter().filter(|v| v.size == size);
        let variant = match (matching.next(), matching.next()) {
            (Some(variant), None) => variant,
            _ => {
                return Err(IconForgeError::incomplete_size_set(format!(
                    "{} needs exactly one {}px variant, got {:?}",
                    platform, size, declared
                )));
            }
        };

        if variant.pixels.dimensions() != (size, size) {
            let (width, height) = variant.pixels.dimensions();
            return Err(IconForgeError::incomplete_size_set(format!(
                "{}px variant holds a {}x{} buffer",
                size, width, height
            )));
        }
        ordered.push(variant);
    }

    Ok(ordered)
}

/// Encode a variant as PNG bytes
pub fn encode_png(variant: &RasterVariant) -> Result<Vec<u8>, IconForgeError> {
    let mut buffer = Vec::new();
    variant
        .pixels
        .write_to(&mut Cursor::new(&mut buffer), ImageFormat::Png)
        .map_err(|e| {
            IconForgeError::encoding_error(format!(
                "Failed to encode {}px PNG: {}",
                variant.size, e
            ))
        })?;
    Ok(buffer)
}
