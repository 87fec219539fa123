//! icon-forge - generate macOS, Windows and Linux icons from one image

mod args;
mod config;

use anyhow::{bail, Context, Result};
use icon_forge::inspect::{inspect_icns, inspect_ico};
use icon_forge::naming::resolve_base_name;
use icon_forge::{convert, ConversionSession, Platform, SourceImage};
use serde::Serialize;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Serialize)]
struct PlatformReport {
    platform: Platform,
    file: Option<String>,
    bytes: Option<usize>,
    error: Option<String>,
}

#[derive(Debug, Serialize)]
struct RunReport {
    base_name: String,
    platforms: Vec<PlatformReport>,
    archives: Vec<String>,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // ICON_FORGE_LOG controls the log level, default "info"
    let filter =
        EnvFilter::try_from_env("ICON_FORGE_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = args::parse_args(std::env::args().skip(1))?;
    if args.help {
        println!("{}", args::USAGE);
        return Ok(());
    }

    if let Some(path) = args.inspect.clone() {
        return inspect(&path).await;
    }

    let file_config = config::load_config(args.config.as_deref()).await?;
    let settings = config::merge(args, file_config)?;

    let data = tokio::fs::read(&settings.input)
        .await
        .with_context(|| format!("reading {}", settings.input.display()))?;
    let file_name = settings
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned());
    let base_name = resolve_base_name(settings.name.as_deref(), file_name.as_deref());

    tracing::info!(
        input = %settings.input.display(),
        base_name = %base_name,
        platforms = ?settings.platforms,
        "converting"
    );

    let source = Arc::new(SourceImage::decode_async(data).await?);
    let session = ConversionSession::new();
    let run = session
        .convert(
            Arc::clone(&source),
            &settings.platforms,
            &base_name,
            &settings.options,
        )
        .await?;

    tokio::fs::create_dir_all(&settings.out_dir)
        .await
        .with_context(|| format!("creating {}", settings.out_dir.display()))?;

    let mut report = RunReport {
        base_name: run.base_name().to_string(),
        platforms: Vec::new(),
        archives: Vec::new(),
    };

    let bundle_all = settings.bundle && run.artifacts().len() > 1;
    for (platform, outcome) in run.outcomes() {
        match outcome {
            Ok(artifact) => {
                if !bundle_all {
                    write_file(&settings.out_dir, &artifact.file_name, &artifact.bytes).await?;
                }
                report.platforms.push(PlatformReport {
                    platform: *platform,
                    file: Some(artifact.file_name.clone()),
                    bytes: Some(artifact.byte_length()),
                    error: None,
                });
            }
            Err(e) => {
                tracing::error!(platform = %platform, error = %e, "platform failed");
                report.platforms.push(PlatformReport {
                    platform: *platform,
                    file: None,
                    bytes: None,
                    error: Some(e.to_string()),
                });
            }
        }
    }

    if bundle_all {
        let archive = run.download_all().await?;
        write_file(&settings.out_dir, &archive.file_name, &archive.bytes).await?;
        report.archives.push(archive.file_name);
    }

    if settings.loose {
        for platform in run.outcomes().keys() {
            let archive = convert::platform_archive(
                Arc::clone(&source),
                *platform,
                run.base_name(),
                settings.options.filter,
            )
            .await?;
            write_file(&settings.out_dir, &archive.file_name, &archive.bytes).await?;
            report.archives.push(archive.file_name);
        }
    }

    if settings.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for entry in &report.platforms {
            match (&entry.file, &entry.error) {
                (Some(file), _) => println!(
                    "{:<8} {} ({} bytes)",
                    entry.platform,
                    file,
                    entry.bytes.unwrap_or(0)
                ),
                (None, Some(error)) => println!("{:<8} FAILED: {}", entry.platform, error),
                (None, None) => {}
            }
        }
        for archive in &report.archives {
            println!("archive  {}", archive);
        }
    }

    if !run.is_complete() {
        bail!("one or more platforms failed");
    }
    Ok(())
}

async fn write_file(dir: &Path, name: &str, bytes: &[u8]) -> Result<()> {
    let path = dir.join(name);
    tokio::fs::write(&path, bytes)
        .await
        .with_context(|| format!("writing {}", path.display()))?;
    tracing::debug!(path = %path.display(), len = bytes.len(), "wrote file");
    Ok(())
}

async fn inspect(path: &Path) -> Result<()> {
    let data = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading {}", path.display()))?;

    let extension = path
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default();
    let summary = match extension.as_str() {
        "ico" => serde_json::to_string_pretty(&inspect_ico(&data)?)?,
        "icns" => serde_json::to_string_pretty(&inspect_icns(&data)?)?,
        other => bail!("cannot inspect '.{}' files (expected .ico or .icns)", other),
    };
    println!("{}", summary);
    Ok(())
}
