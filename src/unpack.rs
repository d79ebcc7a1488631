//! Unpack step - extracts `jszip` dependencies into a staging directory.
//!
//! The working set is every resolved dependency that is declared directly,
//! has the configured scope, and has the configured type. Artifacts are
//! extracted in `group:artifact:version` order, so when two archives carry the
//! same entry the one sorting last wins.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::archive::{ArchiveError, ExtractSummary, IncludeExcludeSelector, ZipUnArchiver};
use crate::core::output;
use crate::filter::{FilterChain, FilterError, ProjectTransitivityFilter, ScopeFilter, TypeFilter};
use crate::project::{Artifact, Project};

/// Scope unpacked by default.
pub const DEFAULT_SCOPE: &str = "runtime";

#[derive(Error, Debug)]
pub enum UnpackError {
    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error("invalid include/exclude configuration")]
    Selector(#[source] ArchiveError),

    #[error("artifact {artifact} has not been resolved to a file")]
    Unresolved { artifact: String },

    #[error("Error unpacking file: {} to: {}", file.display(), location.display())]
    Extract {
        file: PathBuf,
        location: PathBuf,
        #[source]
        source: ArchiveError,
    },
}

/// Unpack step configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackConfig {
    pub target_directory: PathBuf,
    pub scope: String,
    pub packaging_type: String,
    /// Keep only dependencies the project declares directly
    pub exclude_transitive: bool,
    /// Comma-separated glob patterns
    pub includes: Option<String>,
    /// Comma-separated glob patterns
    pub excludes: Option<String>,
}

impl UnpackConfig {
    /// Defaults for `project`: `<build.directory>/<build.final_name>`, scope
    /// `runtime`, type `jszip`, direct dependencies only, no patterns.
    pub fn for_project(project: &Project) -> Self {
        Self {
            target_directory: project.build.directory.join(&project.build.final_name),
            scope: DEFAULT_SCOPE.to_string(),
            packaging_type: crate::JSZIP_TYPE.to_string(),
            exclude_transitive: true,
            includes: None,
            excludes: None,
        }
    }
}

/// What the unpack step did.
#[derive(Debug, Clone, Default)]
pub struct UnpackReport {
    /// Unpacked artifacts, in processing order
    pub artifacts: Vec<Artifact>,
    /// Entries written across all artifacts
    pub extracted: usize,
}

/// Build the filter chain from `config` and apply it to the project's
/// resolved dependencies, sorted into processing order.
pub fn select_artifacts<'a>(
    project: &'a Project,
    config: &UnpackConfig,
) -> Result<Vec<&'a Artifact>, FilterError> {
    let mut chain = FilterChain::new();
    chain.add(ProjectTransitivityFilter::new(
        project.dependency_artifacts(),
        config.exclude_transitive,
    ));
    chain.add(ScopeFilter::new(&config.scope)?);
    chain.add(TypeFilter::new(&config.packaging_type)?);

    let mut selected = chain.filter(project.artifacts());
    selected.sort_by_cached_key(|a| a.coordinates.sort_key());
    Ok(selected)
}

/// Run the unpack step.
pub fn unpack(project: &Project, config: &UnpackConfig) -> Result<UnpackReport, UnpackError> {
    let selected = select_artifacts(project, config)?;
    let selector = IncludeExcludeSelector::from_lists(
        config.includes.as_deref(),
        config.excludes.as_deref(),
    )
    .map_err(UnpackError::Selector)?;

    let mut report = UnpackReport::default();
    let total = selected.len();

    for (i, artifact) in selected.into_iter().enumerate() {
        output::action_numbered(i + 1, total, &artifact.to_string());

        let file = artifact.file.as_deref().ok_or_else(|| UnpackError::Unresolved {
            artifact: artifact.to_string(),
        })?;
        let summary = unpack_file(file, &config.target_directory, selector.clone())?;

        report.extracted += summary.extracted;
        report.artifacts.push(artifact.clone());
    }

    let names: Vec<String> = report.artifacts.iter().map(ToString::to_string).collect();
    output::info(&format!("Artifacts = [{}]", names.join(", ")));

    Ok(report)
}

/// Extract one archive into `location`, creating it first.
pub fn unpack_file(
    file: &Path,
    location: &Path,
    selector: Option<IncludeExcludeSelector>,
) -> Result<ExtractSummary, UnpackError> {
    let extract_err = |source| UnpackError::Extract {
        file: file.to_path_buf(),
        location: location.to_path_buf(),
        source,
    };

    std::fs::create_dir_all(location).map_err(|source| {
        extract_err(ArchiveError::CreateDir {
            path: location.to_path_buf(),
            source,
        })
    })?;

    let filename = file
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "archive".to_string());

    let pb = output::spinner(&format!("extracting {}", filename));
    let result = ZipUnArchiver::new(file, location)
        .with_selector(selector)
        .extract();
    output::progress_done(pb);

    let summary = result.map_err(extract_err)?;
    output::detail(&format!(
        "extracted {} entries from {} to {}",
        summary.extracted,
        filename,
        location.display()
    ));
    Ok(summary)
}
