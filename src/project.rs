//! Project model: coordinates, scopes, artifacts and the project itself.
//!
//! The model is read-only apart from two mutations made by the package step:
//! the snapshot version fix-up and artifact registration.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Suffix marking a version that has not been pinned to a build.
pub const SNAPSHOT_SUFFIX: &str = "SNAPSHOT";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProjectError {
    #[error("unknown scope: {0}")]
    UnknownScope(String),
}

/// Dependency scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    #[default]
    Compile,
    Provided,
    Runtime,
    Test,
    System,
    Import,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Compile => "compile",
            Scope::Provided => "provided",
            Scope::Runtime => "runtime",
            Scope::Test => "test",
            Scope::System => "system",
            Scope::Import => "import",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Scope {
    type Err = ProjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "compile" => Ok(Scope::Compile),
            "provided" => Ok(Scope::Provided),
            "runtime" => Ok(Scope::Runtime),
            "test" => Ok(Scope::Test),
            "system" => Ok(Scope::System),
            "import" => Ok(Scope::Import),
            other => Err(ProjectError::UnknownScope(other.to_string())),
        }
    }
}

/// Artifact coordinates.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Coordinates {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub type_: String,
    pub classifier: Option<String>,
}

impl Coordinates {
    pub fn new(group_id: &str, artifact_id: &str, version: &str, type_: &str) -> Self {
        Self {
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            type_: type_.to_string(),
            classifier: None,
        }
    }

    pub fn with_classifier(mut self, classifier: &str) -> Self {
        self.classifier = Some(classifier.to_string());
        self
    }

    /// `group:artifact:type[:classifier]`, the identity used to match a
    /// resolved artifact against the project's declared dependencies.
    pub fn dependency_key(&self) -> String {
        let mut key = format!("{}:{}:{}", self.group_id, self.artifact_id, self.type_);
        if let Some(classifier) = self.classifier.as_deref().filter(|c| !c.is_empty()) {
            key.push(':');
            key.push_str(classifier);
        }
        key
    }

    /// `group:artifact:version[:classifier]`, the unpack processing order.
    pub fn sort_key(&self) -> String {
        let mut key = format!("{}:{}:{}", self.group_id, self.artifact_id, self.version);
        if let Some(classifier) = self.classifier.as_deref().filter(|c| !c.is_empty()) {
            key.push(':');
            key.push_str(classifier);
        }
        key
    }

    /// True for `1.0-SNAPSHOT` and for timestamped snapshots such as
    /// `1.0-20261019.101500-3`.
    pub fn is_snapshot(&self) -> bool {
        self.version.ends_with(SNAPSHOT_SUFFIX) || is_timestamped_snapshot(&self.version)
    }
}

/// Matches `<base>-yyyyMMdd.HHmmss-<buildNumber>`.
fn is_timestamped_snapshot(version: &str) -> bool {
    let mut parts = version.rsplitn(3, '-');
    let (Some(build), Some(stamp), Some(base)) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };
    let Some((date, time)) = stamp.split_once('.') else {
        return false;
    };
    !base.is_empty()
        && !build.is_empty()
        && build.bytes().all(|b| b.is_ascii_digit())
        && date.len() == 8
        && date.bytes().all(|b| b.is_ascii_digit())
        && time.len() == 6
        && time.bytes().all(|b| b.is_ascii_digit())
}

impl fmt::Display for Coordinates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.type_)?;
        if let Some(classifier) = self.classifier.as_deref().filter(|c| !c.is_empty()) {
            write!(f, ":{}", classifier)?;
        }
        write!(f, ":{}", self.version)
    }
}

/// A resolved artifact: coordinates, scope and (once resolved) its file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub coordinates: Coordinates,
    pub scope: Scope,
    pub file: Option<PathBuf>,
}

impl Artifact {
    pub fn new(coordinates: Coordinates, scope: Scope) -> Self {
        Self {
            coordinates,
            scope,
            file: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.coordinates, self.scope)
    }
}

/// Build output settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSettings {
    /// Build output directory (`target` by default)
    pub directory: PathBuf,
    /// Base name for build outputs
    pub final_name: String,
}

/// The project being built.
#[derive(Debug, Clone)]
pub struct Project {
    pub basedir: PathBuf,
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub packaging: String,
    /// Project descriptor copied into packaged archives
    pub descriptor: PathBuf,
    pub build: BuildSettings,
    /// The project's own artifact
    pub artifact: Artifact,
    /// Artifacts attached alongside the main one (classified outputs)
    pub attached: Vec<Artifact>,
    artifacts: Vec<Artifact>,
    dependency_artifacts: Vec<Artifact>,
}

impl Project {
    /// Create a project rooted at `basedir` with conventional defaults:
    /// packaging `jszip`, descriptor `pom.xml`, build directory `target`,
    /// final name `<artifact_id>-<version>`.
    pub fn new(basedir: &Path, group_id: &str, artifact_id: &str, version: &str) -> Self {
        let packaging = crate::JSZIP_TYPE.to_string();
        Self {
            basedir: basedir.to_path_buf(),
            group_id: group_id.to_string(),
            artifact_id: artifact_id.to_string(),
            version: version.to_string(),
            descriptor: basedir.join("pom.xml"),
            build: BuildSettings {
                directory: basedir.join("target"),
                final_name: format!("{}-{}", artifact_id, version),
            },
            artifact: Artifact::new(
                Coordinates::new(group_id, artifact_id, version, &packaging),
                Scope::Compile,
            ),
            packaging,
            attached: Vec::new(),
            artifacts: Vec::new(),
            dependency_artifacts: Vec::new(),
        }
    }

    /// Record a resolved dependency. Direct dependencies are also part of
    /// [`Project::dependency_artifacts`].
    pub fn add_dependency(&mut self, artifact: Artifact, transitive: bool) {
        if !transitive {
            self.dependency_artifacts.push(artifact.clone());
        }
        self.artifacts.push(artifact);
    }

    /// Every resolved dependency, direct and transitive.
    pub fn artifacts(&self) -> &[Artifact] {
        &self.artifacts
    }

    /// Dependencies declared directly by the project.
    pub fn dependency_artifacts(&self) -> &[Artifact] {
        &self.dependency_artifacts
    }

    /// Replace a snapshot project version with the artifact's resolved one.
    ///
    /// Returns true if the version changed.
    pub fn resolve_snapshot_version(&mut self) -> bool {
        if self.artifact.coordinates.is_snapshot() && self.version != self.artifact.coordinates.version {
            self.version = self.artifact.coordinates.version.clone();
            return true;
        }
        false
    }

    /// Attach a classified output next to the main artifact.
    pub fn attach(&mut self, type_: &str, classifier: &str, file: PathBuf) {
        let mut coordinates = self.artifact.coordinates.clone();
        coordinates.type_ = type_.to_string();
        coordinates.classifier = Some(classifier.to_string());
        self.attached
            .push(Artifact::new(coordinates, self.artifact.scope).with_file(file));
    }

    /// Resolve a configured path against the project's base directory.
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.basedir.join(path)
        }
    }
}
