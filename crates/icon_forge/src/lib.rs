//! icon_forge - Platform icon generation and bundling
//!
//! Turns one source raster into the icon assets each desktop platform expects:
//! - macOS: `.icns` container (PNG-encoded chunks, 16 through 1024)
//! - Windows: `.ico` container (PNG-encoded entries, 16 through 256)
//! - Linux: a single 256x256 PNG
//!
//! Artifacts can be downloaded individually or bundled into a zip archive
//! with one folder per platform.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::debug;

// Submodules (file-based)
pub mod archive;
pub mod convert;
pub mod encode;
pub mod inspect;
pub mod naming;
pub mod raster;
pub mod sizes;

// Test fixtures
#[cfg(test)]
pub mod fixtures;

pub use convert::{ConversionRun, ConversionSession, PlatformOutcome};
pub use raster::{RasterVariant, SourceImage};

// ============================================================================
// Error Types
// ============================================================================

/// Error code range: 9200-9299
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum IconForgeErrorCode {
    /// Source bytes could not be decoded
    DecodeError = 9200,
    /// Platform identifier not in the size table
    UnknownPlatform = 9201,
    /// Encoder received the wrong set of variants
    IncompleteSizeSet = 9202,
    /// Run requested with an empty platform set
    NoPlatformSelected = 9203,
    /// Container construction failed
    EncodingError = 9204,
    /// Archive compression failed
    ArchiveError = 9205,
    /// Invalid input
    InvalidInput = 9206,
    /// A newer run replaced this one
    SupersededRun = 9207,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum IconForgeError {
    #[error("[{code}] Decode error: {message}")]
    Decode { code: u32, message: String },

    #[error("[{code}] Unknown platform: {message}")]
    UnknownPlatform { code: u32, message: String },

    #[error("[{code}] Incomplete size set: {message}")]
    IncompleteSizeSet { code: u32, message: String },

    #[error("[{code}] No platform selected: {message}")]
    NoPlatformSelected { code: u32, message: String },

    #[error("[{code}] Encoding error: {message}")]
    Encoding { code: u32, message: String },

    #[error("[{code}] Archive error: {message}")]
    Archive { code: u32, message: String },

    #[error("[{code}] Invalid input: {message}")]
    InvalidInput { code: u32, message: String },

    #[error("[{code}] Superseded run: {message}")]
    SupersededRun { code: u32, message: String },
}

impl IconForgeError {
    pub fn decode_error(message: impl Into<String>) -> Self {
        Self::Decode {
            code: IconForgeErrorCode::DecodeError as u32,
            message: message.into(),
        }
    }

    pub fn unknown_platform(message: impl Into<String>) -> Self {
        Self::UnknownPlatform {
            code: IconForgeErrorCode::UnknownPlatform as u32,
            message: message.into(),
        }
    }

    pub fn incomplete_size_set(message: impl Into<String>) -> Self {
        Self::IncompleteSizeSet {
            code: IconForgeErrorCode::IncompleteSizeSet as u32,
            message: message.into(),
        }
    }

    pub fn no_platform_selected(message: impl Into<String>) -> Self {
        Self::NoPlatformSelected {
            code: IconForgeErrorCode::NoPlatformSelected as u32,
            message: message.into(),
        }
    }

    pub fn encoding_error(message: impl Into<String>) -> Self {
        Self::Encoding {
            code: IconForgeErrorCode::EncodingError as u32,
            message: message.into(),
        }
    }

    pub fn archive_error(message: impl Into<String>) -> Self {
        Self::Archive {
            code: IconForgeErrorCode::ArchiveError as u32,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            code: IconForgeErrorCode::InvalidInput as u32,
            message: message.into(),
        }
    }

    pub fn superseded_run(message: impl Into<String>) -> Self {
        Self::SupersededRun {
            code: IconForgeErrorCode::SupersededRun as u32,
            message: message.into(),
        }
    }

    /// Numeric error code
    pub fn code(&self) -> u32 {
        match self {
            Self::Decode { code, .. }
            | Self::UnknownPlatform { code, .. }
            | Self::IncompleteSizeSet { code, .. }
            | Self::NoPlatformSelected { code, .. }
            | Self::Encoding { code, .. }
            | Self::Archive { code, .. }
            | Self::InvalidInput { code, .. }
            | Self::SupersededRun { code, .. } => *code,
        }
    }

    /// Whether the error aborts a whole run rather than a single platform
    pub fn is_run_fatal(&self) -> bool {
        matches!(
            self,
            Self::Decode { .. } | Self::UnknownPlatform { .. } | Self::NoPlatformSelected { .. }
        )
    }
}

pub type Result<T, E = IconForgeError> = std::result::Result<T, E>;

// ============================================================================
// Types
// ============================================================================

/// Target desktop platform
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Platform {
    #[serde(rename = "macOS")]
    MacOs,
    #[serde(rename = "windows")]
    Windows,
    #[serde(rename = "linux")]
    Linux,
}

impl Platform {
    pub const ALL: [Platform; 3] = [Platform::MacOs, Platform::Windows, Platform::Linux];

    /// Identifier used for archive folders and configuration
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::MacOs => "macOS",
            Platform::Windows => "windows",
            Platform::Linux => "linux",
        }
    }

    /// File extension of the platform's artifact
    pub fn extension(&self) -> &'static str {
        match self {
            Platform::MacOs => "icns",
            Platform::Windows => "ico",
            Platform::Linux => "png",
        }
    }

    /// Artifact file name for a base name
    pub fn file_name(&self, base_name: &str) -> String {
        format!("{}.{}", base_name, self.extension())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = IconForgeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "macos" => Ok(Platform::MacOs),
            "windows" => Ok(Platform::Windows),
            "linux" => Ok(Platform::Linux),
            other => Err(IconForgeError::unknown_platform(format!(
                "'{}' (expected macOS, windows or linux)",
                other
            ))),
        }
    }
}

/// Final encoded binary for one platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlatformArtifact {
    pub platform: Platform,
    pub file_name: String,
    #[serde(with = "serde_bytes")]
    pub bytes: Vec<u8>,
}

impl PlatformArtifact {
    pub fn byte_length(&self) -> usize {
        self.bytes.len()
    }
}

/// Compressed bundle ready for download
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArchiveArtifact {
    pub file_name: String,
    #[serde(with = "serde_bytes")]
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FilterType {
    /// Fastest, blocky when upscaling
    Nearest,
    /// Smooth interpolation
    #[default]
    Bilinear,
}

/// Options shared by every platform in a run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConvertOptions {
    /// Resampling filter used by the rasterizer
    pub filter: FilterType,
    /// Also emit the ICNS double-density tags (ic11-ic14)
    pub icns_retina_aliases: bool,
}

// ============================================================================
// Entry points
// ============================================================================

/// Required pixel sizes for a platform identifier such as `"macOS"`
pub fn sizes_for(platform: &str) -> Result<&'static [u32]> {
    debug!(platform = %platform, "icon_forge.sizes_for");
    let platform: Platform = platform.parse()?;
    Ok(sizes::sizes_for(platform))
}

/// Decode source bytes and produce one artifact per requested platform
///
/// Run-level failures (empty platform set, unreadable source) abort before any
/// resizing; platform failures are reported inside the returned run.
pub async fn convert_bytes(
    data: Vec<u8>,
    platforms: &[Platform],
    base_name: &str,
    options: &ConvertOptions,
) -> Result<ConversionRun> {
    debug!(len = data.len(), count = platforms.len(), "icon_forge.convert_bytes");
    convert::plan(platforms)?;
    let source = SourceImage::decode_async(data).await?;
    convert::convert(std::sync::Arc::new(source), platforms, base_name, options).await
}

// ============================================================================
// Tests
// ============================================================================
