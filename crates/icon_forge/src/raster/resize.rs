//! Square resizing

use crate::{FilterType as IconFilterType, IconForgeError, SourceImage};
use image::{imageops::FilterType, RgbaImage};
use tracing::debug;

/// One resized square RGBA buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterVariant {
    pub size: u32,
    pub pixels: RgbaImage,
}

impl RasterVariant {
    /// Wrap an existing square buffer
    pub fn from_rgba(pixels: RgbaImage) -> Result<Self, IconForgeError> {
        let (width, height) = pixels.dimensions();
        if width != height || width == 0 {
            return Err(IconForgeError::invalid_input(format!(
                "Raster variants must be square and non-empty, got {}x{}",
                width, height
            )));
        }
        Ok(Self {
            size: width,
            pixels,
        })
    }
}

/// Stretch the source into a `size`x`size` canvas
///
/// Aspect ratio is not preserved. A source that already has the target
/// dimensions is copied without resampling.
pub fn resize(
    source: &SourceImage,
    size: u32,
    filter: IconFilterType,
) -> Result<RasterVariant, IconForgeError> {
    if size == 0 {
        return Err(IconForgeError::invalid_input("Target size must be positive"));
    }

    debug!(size = size, ?filter, "icon_forge.resize");

    let image = source.image();
    let pixels = if source.dimensions() == (size, size) {
        image.to_rgba8()
    } else {
        let filter_type = match filter {
            IconFilterType::Nearest => FilterType::Nearest,
            IconFilterType::Bilinear => FilterType::Triangle,
        };
        image.resize_exact(size, size, filter_type).to_rgba8()
    };

    Ok(RasterVariant { size, pixels })
}

/// Resize at every size in order
pub fn resize_all(
    source: &SourceImage,
    sizes: &[u32],
    filter: IconFilterType,
) -> Result<Vec<RasterVariant>, IconForgeError> {
    sizes.iter().map(|&size| resize(source, size, filter)).collect()
}
