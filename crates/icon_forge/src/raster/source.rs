//! Decoded source image

use crate::IconForgeError;
use image::{DynamicImage, GenericImageView, ImageFormat};
use tracing::debug;

/// Raster formats accepted as a source
const SUPPORTED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Decoded pixel buffer, immutable once loaded
#[derive(Debug, Clone)]
pub struct SourceImage {
    image: DynamicImage,
    format: ImageFormat,
}

impl SourceImage {
    /// Decode JPEG, PNG, GIF or WebP bytes
    pub fn decode(data: &[u8]) -> Result<Self, IconForgeError> {
        let format = image::guess_format(data).map_err(|e| {
            IconForgeError::decode_error(format!("Unrecognized image format: {}", e))
        })?;

        if !SUPPORTED_FORMATS.contains(&format) {
            return Err(IconForgeError::decode_error(format!(
                "Unsupported image format: {:?}",
                format
            )));
        }

        let image = image::load_from_memory_with_format(data, format)
            .map_err(|e| IconForgeError::decode_error(format!("Failed to load image: {}", e)))?;

        if image.width() == 0 || image.height() == 0 {
            return Err(IconForgeError::decode_error("Image has zero dimensions"));
        }

        debug!(
            width = image.width(),
            height = image.height(),
            ?format,
            "icon_forge.decode"
        );
        Ok(Self { image, format })
    }

    /// Decode on the blocking pool so the calling task can suspend
    pub async fn decode_async(data: Vec<u8>) -> Result<Self, IconForgeError> {
        tokio::task::spawn_blocking(move || Self::decode(&data))
            .await
            .map_err(|e| IconForgeError::decode_error(format!("Decode task failed: {}", e)))?
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Container format the source was decoded from
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    pub(crate) fn image(&self) -> &DynamicImage {
        &self.image
    }
}
