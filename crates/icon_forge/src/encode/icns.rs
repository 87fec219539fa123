//! Apple Icon Image (`.icns`) container
//!
//! Layout, all integers big-endian:
//!
//! ```text
//! "icns" | u32 file length
//! then per element: OSType (4 bytes) | u32 element length (incl. 8-byte header) | PNG data
//! ```

use super::{check_size_set, encode_png, ContainerEncoder};
use crate::{IconForgeError, Platform, PlatformArtifact, RasterVariant};
use tracing::debug;

pub const ICNS_MAGIC: [u8; 4] = *b"icns";
/// Size of the file header and of each element header
pub const ICNS_HEADER_LEN: usize = 8;

/// PNG element types by pixel size
const ICNS_TAGS: &[(u32, [u8; 4])] = &[
    (16, *b"icp4"),
    (32, *b"icp5"),
    (64, *b"icp6"),
    (128, *b"ic07"),
    (256, *b"ic08"),
    (512, *b"ic09"),
    (1024, *b"ic10"), // 512x512@2x
];

/// Double-density element types, keyed by their pixel size
const ICNS_RETINA_TAGS: &[(u32, [u8; 4])] = &[
    (32, *b"ic11"),  // 16x16@2x
    (64, *b"ic12"),  // 32x32@2x
    (256, *b"ic13"), // 128x128@2x
    (512, *b"ic14"), // 256x256@2x
];

/// Element type for a single-density image of `size` pixels
pub fn icns_tag(size: u32) -> Option<[u8; 4]> {
    ICNS_TAGS
        .iter()
        .find(|(s, _)| *s == size)
        .map(|(_, tag)| *tag)
}

/// Pixel size stored under an element type, for either density
pub fn icns_tag_size(tag: [u8; 4]) -> Option<u32> {
    ICNS_TAGS
        .iter()
        .chain(ICNS_RETINA_TAGS)
        .find(|(_, t)| *t == tag)
        .map(|(size, _)| *size)
}

/// macOS encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct IcnsEncoder {
    /// Also write ic11-ic14 from the matching pixel sizes
    pub retina_aliases: bool,
}

impl ContainerEncoder for IcnsEncoder {
    fn platform(&self) -> Platform {
        Platform::MacOs
    }

    fn encode(
        &self,
        variants: &[RasterVariant],
        base_name: &str,
    ) -> Result<PlatformArtifact, IconForgeError> {
        let ordered = check_size_set(Platform::MacOs, variants)?;

        let mut elements: Vec<([u8; 4], Vec<u8>)> = Vec::with_capacity(ordered.len());
        for variant in &ordered {
            let tag = icns_tag(variant.size).ok_or_else(|| {
                IconForgeError::encoding_error(format!("No ICNS type for {}px", variant.size))
            })?;
            elements.push((tag, encode_png(variant)?));
        }

        if self.retina_aliases {
            for (size, tag) in ICNS_RETINA_TAGS {
                let base = elements
                    .iter()
                    .find(|(t, _)| icns_tag(*size) == Some(*t))
                    .map(|(_, data)| data.clone());
                if let Some(data) = base {
                    elements.push((*tag, data));
                }
            }
        }

        let bytes = write_icns(&elements)?;
        debug!(
            elements = elements.len(),
            len = bytes.len(),
            "icon_forge.encode_icns"
        );

        Ok(PlatformArtifact {
            platform: Platform::MacOs,
            file_name: Platform::MacOs.file_name(base_name),
            bytes,
        })
    }
}

/// Serialize elements behind the `icns` header
fn write_icns(elements: &[([u8; 4], Vec<u8>)]) -> Result<Vec<u8>, IconForgeError> {
    let total = ICNS_HEADER_LEN
        + elements
            .iter()
            .map(|(_, data)| ICNS_HEADER_LEN + data.len())
            .sum::<usize>();
    let total_len = u32::try_from(total)
        .map_err(|_| IconForgeError::encoding_error("ICNS file exceeds 4 GiB"))?;

    let mut out = Vec::with_capacity(total);
    out.extend_from_slice(&ICNS_MAGIC);
    out.extend_from_slice(&total_len.to_be_bytes());

    for (tag, data) in elements {
        // Bounded by total_len above
        let element_len = (ICNS_HEADER_LEN + data.len()) as u32;
        out.extend_from_slice(tag);
        out.extend_from_slice(&element_len.to_be_bytes());
        out.extend_from_slice(data);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::*;
    use crate::sizes;
    use std::io::Cursor;

    fn read_u32_be(bytes: &[u8], at: usize) -> u32 {
        u32::from_be_bytes([bytes[at], bytes[at + 1], bytes[at + 2], bytes[at + 3]])
    }

    #[test]
    fn test_icns_header() {
        let artifact = IcnsEncoder::default()
            .encode(&variants_for(Platform::MacOs), "app")
            .unwrap();
        let bytes = &artifact.bytes;

        assert_eq!(artifact.file_name, "app.icns");
        assert_eq!(&bytes[0..4], b"icns");
        assert_eq!(read_u32_be(bytes, 4) as usize, bytes.len());
    }

    #[test]
    fn test_icns_element_layout() {
        let artifact = IcnsEncoder::default()
            .encode(&variants_for(Platform::MacOs), "app")
            .unwrap();
        let bytes = &artifact.bytes;

        let mut offset = ICNS_HEADER_LEN;
        let mut tags = Vec::new();
        while offset < bytes.len() {
            let tag = [
                bytes[offset],
                bytes[offset + 1],
                bytes[offset + 2],
                bytes[offset + 3],
            ];
            let len = read_u32_be(bytes, offset + 4) as usize;
            // Every element holds a PNG
            assert_eq!(
                &bytes[offset + 8..offset + 16],
                &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]
            );
            tags.push(tag);
            offset += len;
        }

        assert_eq!(offset, bytes.len());
        assert_eq!(
            tags,
            vec![*b"icp4", *b"icp5", *b"icp6", *b"ic07", *b"ic08", *b"ic09", *b"ic10"]
        );
    }

    #[test]
    fn test_icns_retina_aliases() {
        let artifact = IcnsEncoder {
            retina_aliases: true,
        }
        .encode(&variants_for(Platform::MacOs), "app")
        .unwrap();

        let family = icns::IconFamily::read(Cursor::new(&artifact.bytes)).unwrap();
        assert_eq!(family.elements.len(), 11);

        let retina = family
            .get_icon_with_type(icns::IconType::RGBA32_256x256_2x)
            .unwrap();
        assert_eq!(retina.width(), 512);
    }

    #[test]
    fn test_icns_round_trip_with_reader() {
        let artifact = IcnsEncoder::default()
            .encode(&variants_for(Platform::MacOs), "app")
            .unwrap();

        let family = icns::IconFamily::read(Cursor::new(&artifact.bytes)).unwrap();
        let mut sizes: Vec<u32> = family
            .available_icons()
            .into_iter()
            .map(|icon_type| icon_type.pixel_width())
            .collect();
        sizes.sort_unstable();
        assert_eq!(sizes, sizes::sizes_for(Platform::MacOs));

        for icon_type in family.available_icons() {
            let image = family.get_icon_with_type(icon_type).unwrap();
            assert_eq!(image.width(), icon_type.pixel_width());
            assert_eq!(image.height(), icon_type.pixel_height());
        }
    }

    #[test]
    fn test_icns_tag_sizes() {
        for &size in sizes::sizes_for(Platform::MacOs) {
            let tag = icns_tag(size).unwrap();
            assert_eq!(icns_tag_size(tag), Some(size));
        }
        assert_eq!(icns_tag_size(*b"ic13"), Some(256));
        assert_eq!(icns_tag(48), None);
        assert_eq!(icns_tag_size(*b"TOC "), None);
    }

    #[test]
    fn test_icns_incomplete_set() {
        let variants = variants_of(&[16, 32, 64]);
        let err = IcnsEncoder::default().encode(&variants, "app").unwrap_err();
        assert!(matches!(err, IconForgeError::IncompleteSizeSet { .. }));
    }
}
