//! Read-side summaries of produced containers

use crate::encode::{icns_tag_size, ICNS_HEADER_LEN, ICNS_MAGIC};
use crate::IconForgeError;
use serde::Serialize;
use std::io::Cursor;
use tracing::debug;

/// One ICO directory entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IcoEntryInfo {
    pub width: u32,
    pub height: u32,
    pub is_png: bool,
}

/// One ICNS element
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IcnsChunkInfo {
    /// Four-character element type, e.g. `ic08`
    pub tag: String,
    /// Pixel size for image elements, `None` for TOC/version/unknown types
    pub size: Option<u32>,
    pub data_len: usize,
}

/// List the entries of an `.ico` file
pub fn inspect_ico(data: &[u8]) -> Result<Vec<IcoEntryInfo>, IconForgeError> {
    let icon_dir = ico::IconDir::read(Cursor::new(data))
        .map_err(|e| IconForgeError::decode_error(format!("Failed to read ICO: {}", e)))?;

    let entries: Vec<IcoEntryInfo> = icon_dir
        .entries()
        .iter()
        .map(|entry| IcoEntryInfo {
            width: entry.width(),
            height: entry.height(),
            is_png: entry.is_png(),
        })
        .collect();

    debug!(count = entries.len(), "icon_forge.inspect_ico");
    Ok(entries)
}

/// List the elements of an `.icns` file
pub fn inspect_icns(data: &[u8]) -> Result<Vec<IcnsChunkInfo>, IconForgeError> {
    if data.len() < ICNS_HEADER_LEN || data[0..4] != ICNS_MAGIC {
        return Err(IconForgeError::decode_error("Missing 'icns' header"));
    }

    let declared = read_u32_be(data, 4) as usize;
    if declared != data.len() {
        return Err(IconForgeError::decode_error(format!(
            "ICNS header declares {} bytes, file has {}",
            declared,
            data.len()
        )));
    }

    let mut chunks = Vec::new();
    let mut offset = ICNS_HEADER_LEN;
    while offset < data.len() {
        if data.len() - offset < ICNS_HEADER_LEN {
            return Err(IconForgeError::decode_error(format!(
                "Truncated element header at byte {}",
                offset
            )));
        }

        let tag = [
            data[offset],
            data[offset + 1],
            data[offset + 2],
            data[offset + 3],
        ];
        let len = read_u32_be(data, offset + 4) as usize;
        if len < ICNS_HEADER_LEN || len > data.len() - offset {
            return Err(IconForgeError::decode_error(format!(
                "Element '{}' has invalid length {}",
                String::from_utf8_lossy(&tag),
                len
            )));
        }

        chunks.push(IcnsChunkInfo {
            tag: String::from_utf8_lossy(&tag).into_owned(),
            size: icns_tag_size(tag),
            data_len: len - ICNS_HEADER_LEN,
        });
        offset += len;
    }

    debug!(count = chunks.len(), "icon_forge.inspect_icns");
    Ok(chunks)
}

fn read_u32_be(data: &[u8], at: usize) -> u32 {
    u32::from_be_bytes([data[at], data[at + 1], data[at + 2], data[at + 3]])
}
