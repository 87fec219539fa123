//! Deflate-compressed zip archives
//!
//! Two layouts:
//! - flat: every file at the archive root
//! - by platform: one top-level folder per platform holding its artifact

use crate::{IconForgeError, Platform, PlatformArtifact};
use std::collections::BTreeMap;
use std::io::{Cursor, Write};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

fn file_options() -> SimpleFileOptions {
    SimpleFileOptions::default()
        .compression_method(CompressionMethod::Deflated)
        .unix_permissions(0o644)
}

fn archive_error(e: impl std::fmt::Display) -> IconForgeError {
    IconForgeError::archive_error(format!("Failed to write archive: {}", e))
}

/// Bundle `(name, bytes)` pairs at the archive root, in order
pub fn bundle(files: &[(String, Vec<u8>)]) -> Result<Vec<u8>, IconForgeError> {
    debug!(count = files.len(), "icon_forge.bundle");

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = file_options();

    for (name, data) in files {
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err(IconForgeError::invalid_input(format!(
                "Archive entry name must be a plain file name, got '{}'",
                name
            )));
        }
        zip.start_file(name.as_str(), options).map_err(archive_error)?;
        zip.write_all(data).map_err(archive_error)?;
    }

    let cursor = zip.finish().map_err(archive_error)?;
    Ok(cursor.into_inner())
}

/// Bundle artifacts as `<platform>/<file_name>`
pub fn bundle_by_platform(
    artifacts: &BTreeMap<Platform, PlatformArtifact>,
) -> Result<Vec<u8>, IconForgeError> {
    debug!(count = artifacts.len(), "icon_forge.bundle_by_platform");

    if artifacts.is_empty() {
        return Err(IconForgeError::invalid_input("No artifacts to bundle"));
    }

    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = file_options();

    for (platform, artifact) in artifacts {
        zip.add_directory(format!("{}/", platform), options)
            .map_err(archive_error)?;
        zip.start_file(format!("{}/{}", platform, artifact.file_name), options)
            .map_err(archive_error)?;
        zip.write_all(&artifact.bytes).map_err(archive_error)?;
    }

    let cursor = zip.finish().map_err(archive_error)?;
    Ok(cursor.into_inner())
}

/// [`bundle`] on the blocking pool
pub async fn bundle_async(files: Vec<(String, Vec<u8>)>) -> Result<Vec<u8>, IconForgeError> {
    tokio::task::spawn_blocking(move || bundle(&files))
        .await
        .map_err(|e| IconForgeError::archive_error(format!("Archive task failed: {}", e)))?
}

/// [`bundle_by_platform`] on the blocking pool
pub async fn bundle_by_platform_async(
    artifacts: BTreeMap<Platform, PlatformArtifact>,
) -> Result<Vec<u8>, IconForgeError> {
    tokio::task::spawn_blocking(move || bundle_by_platform(&artifacts))
        .await
        .map_err(|e| IconForgeError::archive_error(format!("Archive task failed: {}", e)))?
}
