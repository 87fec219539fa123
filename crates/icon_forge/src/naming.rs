//! Output file naming

use crate::Platform;
use tracing::debug;

/// Used when neither a custom name nor a usable file name is available
pub const DEFAULT_BASE_NAME: &str = "app_icon";

/// Pick the base name for a run's artifacts
///
/// A non-empty custom name wins; otherwise the source file name up to its
/// first `.`; otherwise [`DEFAULT_BASE_NAME`].
pub fn resolve_base_name(custom: Option<&str>, source_file_name: Option<&str>) -> String {
    let from_custom = custom.map(str::trim).filter(|name| !name.is_empty());
    let from_file = source_file_name
        .map(|name| name.rsplit(['/', '\\']).next().unwrap_or(name))
        .and_then(|name| name.split('.').next())
        .map(str::trim)
        .filter(|stem| !stem.is_empty());

    let name = from_custom
        .or(from_file)
        .map(sanitize_name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_BASE_NAME.to_string());

    debug!(name = %name, "icon_forge.resolve_base_name");
    name
}

/// Replace path separators and control characters so the name is a single
/// archive entry
pub fn sanitize_name(name: &str) -> String {
    let replaced: String = name
        .chars()
        .map(|c| {
            if c == '/' || c == '\\' || c.is_control() {
                '-'
            } else {
                c
            }
        })
        .collect();

    // Never a hidden file or ".."
    replaced.trim_start_matches('.').to_string()
}

/// Name of one loose PNG, e.g. `app_32x32.png`
pub fn loose_png_name(base_name: &str, size: u32) -> String {
    format!("{}_{}x{}.png", base_name, size, size)
}

/// Name of a single platform's loose PNG archive, e.g. `app_windows.zip`
pub fn platform_archive_name(base_name: &str, platform: Platform) -> String {
    format!("{}_{}.zip", base_name, platform)
}

/// Name of the multi-platform archive
pub fn all_icons_archive_name(base_name: &str) -> String {
    format!("{}_all_icons.zip", base_name)
}
