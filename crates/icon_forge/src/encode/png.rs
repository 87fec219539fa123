//! Linux icon: a bare PNG at the single table size

use super::{check_size_set, encode_png, ContainerEncoder};
use crate::{IconForgeError, Platform, PlatformArtifact, RasterVariant};
use tracing::debug;

/// Linux encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct PngEncoder;

impl ContainerEncoder for PngEncoder {
    fn platform(&self) -> Platform {
        Platform::Linux
    }

    fn encode(
        &self,
        variants: &[RasterVariant],
        base_name: &str,
    ) -> Result<PlatformArtifact, IconForgeError> {
        let ordered = check_size_set(Platform::Linux, variants)?;
        let variant = ordered
            .first()
            .ok_or_else(|| IconForgeError::incomplete_size_set("linux has no sizes"))?;

        let bytes = encode_png(variant)?;
        debug!(size = variant.size, len = bytes.len(), "icon_forge.encode_png");

        Ok(PlatformArtifact {
            platform: Platform::Linux,
            file_name: Platform::Linux.file_name(base_name),
            bytes,
        })
    }
}
