//! `icon-forge.toml` loading and flag merging

use crate::args::CliArgs;
use anyhow::{Context, Result};
use icon_forge::{ConvertOptions, Platform};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "icon-forge.toml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub output: OutputConfig,
    pub convert: ConvertOptions,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub name: Option<String>,
    pub platforms: Option<Vec<String>>,
    pub dir: Option<PathBuf>,
    pub bundle: Option<bool>,
    pub loose: Option<bool>,
}

/// Settings for one invocation after merging file and flags
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub input: PathBuf,
    pub name: Option<String>,
    pub platforms: Vec<Platform>,
    pub out_dir: PathBuf,
    pub bundle: bool,
    pub loose: bool,
    pub json: bool,
    pub options: ConvertOptions,
}

pub fn parse_config(content: &str) -> Result<FileConfig> {
    toml::from_str(content).context("parsing icon-forge config")
}

/// Read the explicit config, or the default file if it exists
pub async fn load_config(path: Option<&Path>) -> Result<FileConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            if !tokio::fs::try_exists(&default).await.unwrap_or(false) {
                return Ok(FileConfig::default());
            }
            default
        }
    };

    let content = tokio::fs::read_to_string(&path)
        .await
        .with_context(|| format!("reading config at {}", path.display()))?;
    tracing::debug!(path = %path.display(), "loaded config");
    parse_config(&content)
}

/// Flags override file values; unset platforms mean all three
pub fn merge(args: CliArgs, file: FileConfig) -> Result<Settings> {
    let input = args.input.context("missing INPUT image path")?;

    let platform_names = if args.platforms.is_empty() {
        file.output.platforms.unwrap_or_default()
    } else {
        args.platforms
    };
    let platforms = if platform_names.is_empty() {
        Platform::ALL.to_vec()
    } else {
        platform_names
            .iter()
            .map(|name| name.parse::<Platform>())
            .collect::<Result<Vec<_>, _>>()?
    };

    let mut options = file.convert;
    if let Some(filter) = args.filter {
        options.filter = filter;
    }
    if args.retina {
        options.icns_retina_aliases = true;
    }

    Ok(Settings {
        input,
        name: args.name.or(file.output.name),
        platforms,
        out_dir: args
            .out_dir
            .or(file.output.dir)
            .unwrap_or_else(|| PathBuf::from(".")),
        bundle: args.bundle || file.output.bundle.unwrap_or(false),
        loose: args.loose || file.output.loose.unwrap_or(false),
        json: args.json,
        options,
    })
}
