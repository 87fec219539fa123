//! Conversion orchestration
//!
//! A run resizes the source at every size a platform needs, hands the variant
//! set to that platform's encoder, and gathers one outcome per platform.
//! Platforms run concurrently on the blocking pool and fail independently.

use crate::archive::{bundle_async, bundle_by_platform_async};
use crate::encode::{encode_png, encoder_for};
use crate::{
    naming, raster, sizes, ArchiveArtifact, ConvertOptions, FilterType, IconForgeError, Platform,
    PlatformArtifact, SourceImage,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Result of one platform within a run
pub type PlatformOutcome = Result<PlatformArtifact, IconForgeError>;

/// Everything one run produced, keyed by platform
#[derive(Debug, Clone)]
pub struct ConversionRun {
    id: u64,
    base_name: String,
    outcomes: BTreeMap<Platform, PlatformOutcome>,
}

impl ConversionRun {
    /// Identity of the run within its session (0 outside a session)
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn base_name(&self) -> &str {
        &self.base_name
    }

    /// Every requested platform, with its artifact or error
    pub fn outcomes(&self) -> &BTreeMap<Platform, PlatformOutcome> {
        &self.outcomes
    }

    pub fn artifact(&self, platform: Platform) -> Option<&PlatformArtifact> {
        self.outcomes.get(&platform).and_then(|o| o.as_ref().ok())
    }

    pub fn error(&self, platform: Platform) -> Option<&IconForgeError> {
        self.outcomes.get(&platform).and_then(|o| o.as_ref().err())
    }

    /// Successful artifacts only
    pub fn artifacts(&self) -> BTreeMap<Platform, PlatformArtifact> {
        self.outcomes
            .iter()
            .filter_map(|(platform, outcome)| {
                outcome
                    .as_ref()
                    .ok()
                    .map(|artifact| (*platform, artifact.clone()))
            })
            .collect()
    }

    /// True when every requested platform produced an artifact
    pub fn is_complete(&self) -> bool {
        self.outcomes.values().all(Result::is_ok)
    }

    /// Artifact for an individual download
    pub fn download(&self, platform: Platform) -> Result<&PlatformArtifact, IconForgeError> {
        match self.outcomes.get(&platform) {
            Some(Ok(artifact)) => Ok(artifact),
            Some(Err(e)) => Err(e.clone()),
            None => Err(IconForgeError::invalid_input(format!(
                "{} was not part of this run",
                platform
            ))),
        }
    }

    /// `{base}_all_icons.zip` with one folder per successful platform
    pub async fn download_all(&self) -> Result<ArchiveArtifact, IconForgeError> {
        let artifacts = self.artifacts();
        debug!(run_id = self.id, count = artifacts.len(), "icon_forge.download_all");

        let bytes = bundle_by_platform_async(artifacts).await?;
        Ok(ArchiveArtifact {
            file_name: naming::all_icons_archive_name(&self.base_name),
            bytes,
        })
    }
}

/// Deduplicate and order the requested platforms
pub fn plan(platforms: &[Platform]) -> Result<Vec<Platform>, IconForgeError> {
    let mut planned = platforms.to_vec();
    planned.sort_unstable();
    planned.dedup();

    if planned.is_empty() {
        return Err(IconForgeError::no_platform_selected(
            "Select at least one platform",
        ));
    }
    Ok(planned)
}

/// Convert a decoded source for the given platforms
pub async fn convert(
    source: Arc<SourceImage>,
    platforms: &[Platform],
    base_name: &str,
    options: &ConvertOptions,
) -> Result<ConversionRun, IconForgeError> {
    run(0, source, platforms, base_name, options).await
}

async fn run(
    id: u64,
    source: Arc<SourceImage>,
    platforms: &[Platform],
    base_name: &str,
    options: &ConvertOptions,
) -> Result<ConversionRun, IconForgeError> {
    let platforms = plan(platforms)?;
    let base_name = naming::sanitize_name(base_name.trim());
    if base_name.is_empty() {
        return Err(IconForgeError::invalid_input("Base name must not be empty"));
    }

    debug!(
        run_id = id,
        count = platforms.len(),
        base_name = %base_name,
        "icon_forge.convert"
    );

    let mut handles = Vec::with_capacity(platforms.len());
    for platform in platforms {
        let source = Arc::clone(&source);
        let base_name = base_name.clone();
        let options = options.clone();
        let handle = tokio::task::spawn_blocking(move || {
            convert_platform(&source, platform, &base_name, &options)
        });
        handles.push((platform, handle));
    }

    // No artifact is exposed until every platform task has finished
    let mut outcomes = BTreeMap::new();
    for (platform, handle) in handles {
        let outcome = handle.await.unwrap_or_else(|e| {
            Err(IconForgeError::encoding_error(format!(
                "{} task failed: {}",
                platform, e
            )))
        });
        if let Err(e) = &outcome {
            warn!(run_id = id, platform = %platform, error = %e, "platform conversion failed");
        }
        outcomes.insert(platform, outcome);
    }

    let failed = outcomes.values().filter(|o| o.is_err()).count();
    info!(
        run_id = id,
        ok = outcomes.len() - failed,
        failed = failed,
        "conversion run complete"
    );

    Ok(ConversionRun {
        id,
        base_name,
        outcomes,
    })
}

/// Resize at every table size and encode one platform
pub fn convert_platform(
    source: &SourceImage,
    platform: Platform,
    base_name: &str,
    options: &ConvertOptions,
) -> PlatformOutcome {
    let (width, height) = source.dimensions();
    if width.max(height) < sizes::max_size(platform) {
        debug!(
            platform = %platform,
            width = width,
            height = height,
            "source smaller than largest icon, upscaling"
        );
    }

    let variants = raster::resize_all(source, sizes::sizes_for(platform), options.filter)?;
    encoder_for(platform, options).encode(&variants, base_name)
}

/// Every table size for a platform as `{base}_{size}x{size}.png`
pub fn loose_pngs(
    source: &SourceImage,
    platform: Platform,
    base_name: &str,
    filter: FilterType,
) -> Result<Vec<(String, Vec<u8>)>, IconForgeError> {
    debug!(platform = %platform, "icon_forge.loose_pngs");
    raster::resize_all(source, sizes::sizes_for(platform), filter)?
        .iter()
        .map(|variant| {
            encode_png(variant).map(|png| (naming::loose_png_name(base_name, variant.size), png))
        })
        .collect()
}

/// `{base}_{platform}.zip` holding the platform's loose PNGs
pub async fn platform_archive(
    source: Arc<SourceImage>,
    platform: Platform,
    base_name: &str,
    filter: FilterType,
) -> Result<ArchiveArtifact, IconForgeError> {
    let name = base_name.to_string();
    let files = tokio::task::spawn_blocking(move || loose_pngs(&source, platform, &name, filter))
        .await
        .map_err(|e| IconForgeError::encoding_error(format!("Resize task failed: {}", e)))??;

    Ok(ArchiveArtifact {
        file_name: naming::platform_archive_name(base_name, platform),
        bytes: bundle_async(files).await?,
    })
}

// ============================================================================
// Session
// ============================================================================

/// Caller-owned holder of the latest run
///
/// Each `convert` takes a fresh run id. Only the run whose id is still the
/// latest when it finishes is installed; earlier runs get `SupersededRun`.
#[derive(Debug, Default)]
pub struct ConversionSession {
    latest: AtomicU64,
    current: RwLock<Option<Arc<ConversionRun>>>,
}

impl ConversionSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest installed run, if any
    pub async fn current(&self) -> Option<Arc<ConversionRun>> {
        self.current.read().await.clone()
    }

    /// Drop results and abandon any in-flight run
    pub async fn reset(&self) {
        let mut current = self.current.write().await;
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(run_id = id, "icon_forge.session_reset");
        *current = None;
    }

    /// Start a run from raw source bytes
    ///
    /// The run takes its id and clears the previous results before decoding,
    /// so a slow decode cannot outrank a run started after it.
    pub async fn convert_bytes(
        &self,
        data: Vec<u8>,
        platforms: &[Platform],
        base_name: &str,
        options: &ConvertOptions,
    ) -> Result<Arc<ConversionRun>, IconForgeError> {
        plan(platforms)?;
        let id = self.begin().await;
        let result = match SourceImage::decode_async(data).await {
            Ok(source) => run(id, Arc::new(source), platforms, base_name, options).await,
            Err(e) => Err(e),
        };
        self.install(id, result).await
    }

    /// Start a run, replacing whatever the session held
    pub async fn convert(
        &self,
        source: Arc<SourceImage>,
        platforms: &[Platform],
        base_name: &str,
        options: &ConvertOptions,
    ) -> Result<Arc<ConversionRun>, IconForgeError> {
        let id = self.begin().await;
        let result = run(id, source, platforms, base_name, options).await;
        self.install(id, result).await
    }

    /// Take a new run id and drop the previous results
    async fn begin(&self) -> u64 {
        let id = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        let mut current = self.current.write().await;
        // A newer run may already have started
        if self.latest.load(Ordering::SeqCst) == id {
            *current = None;
        }
        id
    }

    async fn install(
        &self,
        id: u64,
        result: Result<ConversionRun, IconForgeError>,
    ) -> Result<Arc<ConversionRun>, IconForgeError> {
        let run = Arc::new(result?);

        let mut current = self.current.write().await;
        if self.latest.load(Ordering::SeqCst) != id {
            warn!(run_id = id, "conversion run superseded, discarding results");
            return Err(IconForgeError::superseded_run(format!(
                "Run {} finished after a newer run started",
                id
            )));
        }
        *current = Some(Arc::clone(&run));
        Ok(run)
    }

    /// Bundle the current run's artifacts
    pub async fn download_all(&self) -> Result<ArchiveArtifact, IconForgeError> {
        match self.current().await {
            Some(run) => run.download_all().await,
            None => Err(IconForgeError::invalid_input("No conversion results")),
        }
    }
}
