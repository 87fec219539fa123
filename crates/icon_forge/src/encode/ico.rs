//! Windows icon (`.ico`) container
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! ICONDIR       reserved u16 = 0 | type u16 = 1 | count u16
//! ICONDIRENTRY  width u8 | height u8 | colors u8 | reserved u8 | planes u16 | bpp u16 | size u32 | offset u32
//! payloads      PNG data in entry order
//! ```

use super::{check_size_set, encode_png, ContainerEncoder};
use crate::{IconForgeError, Platform, PlatformArtifact, RasterVariant};
use tracing::debug;

/// ICONDIR length
pub const ICO_HEADER_LEN: usize = 6;
/// ICONDIRENTRY length
pub const ICO_ENTRY_LEN: usize = 16;
/// Resource type for icons (cursors use 2)
const ICO_TYPE_ICON: u16 = 1;
/// Largest dimension an entry can describe
const ICO_MAX_SIZE: u32 = 256;

/// Windows encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct IcoEncoder;

impl ContainerEncoder for IcoEncoder {
    fn platform(&self) -> Platform {
        Platform::Windows
    }

    fn encode(
        &self,
        variants: &[RasterVariant],
        base_name: &str,
    ) -> Result<PlatformArtifact, IconForgeError> {
        let ordered = check_size_set(Platform::Windows, variants)?;

        let mut images = Vec::with_capacity(ordered.len());
        for variant in &ordered {
            images.push((variant.size, encode_png(variant)?));
        }

        let bytes = write_ico(&images)?;
        debug!(
            count = images.len(),
            len = bytes.len(),
            "icon_forge.encode_ico"
        );

        Ok(PlatformArtifact {
            platform: Platform::Windows,
            file_name: Platform::Windows.file_name(base_name),
            bytes,
        })
    }
}

/// Serialize `(size, png)` pairs as an icon directory
fn write_ico(images: &[(u32, Vec<u8>)]) -> Result<Vec<u8>, IconForgeError> {
    let count = u16::try_from(images.len())
        .map_err(|_| IconForgeError::encoding_error("Too many images for one ICO"))?;

    let directory_len = ICO_HEADER_LEN + ICO_ENTRY_LEN * images.len();
    let payload_len: usize = images.iter().map(|(_, png)| png.len()).sum();

    let mut out = Vec::with_capacity(directory_len + payload_len);
    out.extend_from_slice(&0u16.to_le_bytes());
    out.extend_from_slice(&ICO_TYPE_ICON.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());

    let mut offset = directory_len;
    for (size, png) in images {
        if *size == 0 || *size > ICO_MAX_SIZE {
            return Err(IconForgeError::encoding_error(format!(
                "ICO entries must be 1-{}px, got {}px",
                ICO_MAX_SIZE, size
            )));
        }
        // 256 is stored as 0
        let dimension = if *size == ICO_MAX_SIZE { 0 } else { *size as u8 };
        let data_len = u32::try_from(png.len())
            .map_err(|_| IconForgeError::encoding_error("ICO image exceeds 4 GiB"))?;
        let data_offset = u32::try_from(offset)
            .map_err(|_| IconForgeError::encoding_error("ICO file exceeds 4 GiB"))?;

        out.push(dimension); // width
        out.push(dimension); // height
        out.push(0); // palette colors
        out.push(0); // reserved
        out.extend_from_slice(&1u16.to_le_bytes()); // color planes
        out.extend_from_slice(&32u16.to_le_bytes()); // bits per pixel
        out.extend_from_slice(&data_len.to_le_bytes());
        out.extend_from_slice(&data_offset.to_le_bytes());

        offset += png.len();
    }

    for (_, png) in images {
        out.extend_from_slice(png);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::sizes;
    use std::io::Cursor;

    fn read_u16_le(bytes: &[u8], at: usize) -> u16 {
        u16::from_le_bytes([bytes[at], bytes[at + 1]])
    }

    fn read_u32_le(bytes: &[u8], at: usize) -> u32 {
        u32::from_le_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    #[test]
    fn test_ico_header() {
        let artifact = IcoEncoder
            .encode(&variants_for(Platform::Windows), "app")
            .unwrap();
        let bytes = &artifact.bytes;

        assert_eq!(artifact.file_name, "app.ico");
        assert_eq!(&bytes[0..4], &[0, 0, 1, 0]);
        assert_eq!(read_u16_le(bytes, 4), 7);
    }

    #[test]
    fn test_ico_directory_offsets() {
        let artifact = IcoEncoder
            .encode(&variants_for(Platform::Windows), "app")
            .unwrap();
        let bytes = &artifact.bytes;

        let mut expected_offset = (ICO_HEADER_LEN + ICO_ENTRY_LEN * 7) as u32;
        for (i, &size) in sizes::sizes_for(Platform::Windows).iter().enumerate() {
            let entry = ICO_HEADER_LEN + i * ICO_ENTRY_LEN;
            let stored = if size == 256 { 0 } else { size as u8 };
            assert_eq!(bytes[entry], stored);
            assert_eq!(bytes[entry + 1], stored);
            assert_eq!(bytes[entry + 2], 0);
            assert_eq!(read_u16_le(bytes, entry + 4), 1);
            assert_eq!(read_u16_le(bytes, entry + 6), 32);

            let len = read_u32_le(bytes, entry + 8);
            let offset = read_u32_le(bytes, entry + 12);
            assert_eq!(offset, expected_offset);
            assert_eq!(&bytes[offset as usize + 1..offset as usize + 4], b"PNG");
            expected_offset += len;
        }
        assert_eq!(expected_offset as usize, bytes.len());
    }

    #[test]
    fn test_ico_round_trip_with_reader() {
        let artifact = IcoEncoder
            .encode(&variants_for(Platform::Windows), "app")
            .unwrap();

        let icon_dir = ico::IconDir::read(Cursor::new(&artifact.bytes)).unwrap();
        assert_eq!(icon_dir.resource_type(), ico::ResourceType::Icon);

        let dims: Vec<(u32, u32)> = icon_dir
            .entries()
            .iter()
            .map(|entry| (entry.width(), entry.height()))
            .collect();
        let expected: Vec<(u32, u32)> = sizes::sizes_for(Platform::Windows)
            .iter()
            .map(|&s| (s, s))
            .collect();
        assert_eq!(dims, expected);

        for entry in icon_dir.entries() {
            assert!(entry.is_png());
            let image = entry.decode().unwrap();
            assert_eq!(image.width(), entry.width());
        }
    }

    #[test]
    fn test_ico_rejects_oversized_entry() {
        let err = write_ico(&[(512, vec![0u8; 4])]).unwrap_err();
        assert!(matches!(err, IconForgeError::Encoding { .. }));
    }

    #[test]
    fn test_ico_incomplete_set() {
        let variants = variants_of(&[16, 24, 32, 48, 64, 128]);
        let err = IcoEncoder.encode(&variants, "app").unwrap_err();
        assert!(matches!(err, IconForgeError::IncompleteSizeSet { .. }));
    }
}
