//! Required icon sizes per platform
//!
//! Every other module asks this table; sizes are never repeated elsewhere.

use crate::Platform;

/// macOS `.icns` sizes
const MACOS_SIZES: &[u32] = &[16, 32, 64, 128, 256, 512, 1024];
/// Windows `.ico` sizes
const WINDOWS_SIZES: &[u32] = &[16, 24, 32, 48, 64, 128, 256];
/// Linux single PNG size
const LINUX_SIZES: &[u32] = &[256];

/// Ordered, strictly increasing sizes for a platform
pub fn sizes_for(platform: Platform) -> &'static [u32] {
    match platform {
        Platform::MacOs => MACOS_SIZES,
        Platform::Windows => WINDOWS_SIZES,
        Platform::Linux => LINUX_SIZES,
    }
}

/// Largest size a platform needs
pub fn max_size(platform: Platform) -> u32 {
    sizes_for(platform).last().copied().unwrap_or(0)
}
