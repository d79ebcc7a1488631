//! `jszip.toml` manifest support
//!
//! The manifest describes the project (coordinates, descriptor, build
//! settings), its resolved dependencies, and optional settings for the unpack
//! and package steps. Relative paths are resolved against the directory the
//! manifest lives in.
//!
//! ## Format
//!
//! ```toml
//! [project]
//! group_id = "com.example"
//! artifact_id = "widgets"
//! version = "1.0-SNAPSHOT"
//!
//! [[dependency]]
//! group_id = "org.example"
//! artifact_id = "lib"
//! version = "2.1"
//! type = "jszip"
//! scope = "runtime"
//! file = "repo/lib-2.1.zip"
//!
//! [package]
//! classifier = "min"
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::package::PackageConfig;
use crate::project::{Artifact, Coordinates, Project, Scope};
use crate::unpack::UnpackConfig;

/// Manifest file name looked up in the working directory.
pub const MANIFEST_NAME: &str = "jszip.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    pub project: ProjectSection,
    #[serde(default)]
    pub build: BuildSection,
    #[serde(default, rename = "dependency")]
    pub dependencies: Vec<DependencySection>,
    #[serde(default)]
    pub unpack: UnpackSection,
    #[serde(default)]
    pub package: PackageSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProjectSection {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    /// Concrete version a snapshot resolved to
    pub resolved_version: Option<String>,
    pub packaging: Option<String>,
    pub descriptor: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuildSection {
    pub directory: Option<PathBuf>,
    pub final_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DependencySection {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    #[serde(rename = "type", default = "default_dependency_type")]
    pub type_: String,
    #[serde(default)]
    pub scope: Scope,
    pub classifier: Option<String>,
    pub file: Option<PathBuf>,
    #[serde(default)]
    pub transitive: bool,
}

fn default_dependency_type() -> String {
    "jar".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnpackSection {
    pub target_directory: Option<PathBuf>,
    /// Kept as text so a bad value surfaces as a filter error
    pub scope: Option<String>,
    #[serde(rename = "type")]
    pub packaging_type: Option<String>,
    pub exclude_transitive: Option<bool>,
    pub includes: Option<String>,
    pub excludes: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSection {
    pub content_directory: Option<PathBuf>,
    pub output_directory: Option<PathBuf>,
    pub final_name: Option<String>,
    pub classifier: Option<String>,
    pub include_empty_dirs: Option<bool>,
    pub force_creation: Option<bool>,
    pub add_maven_descriptor: Option<bool>,
}

impl Manifest {
    /// Read a manifest from `path`
    pub fn read(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read manifest: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("Failed to parse manifest: {}", path.display()))
    }

    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Build the project model, resolving paths against `basedir`.
    pub fn to_project(&self, basedir: &Path) -> Project {
        let p = &self.project;
        let mut project = Project::new(basedir, &p.group_id, &p.artifact_id, &p.version);

        if let Some(packaging) = &p.packaging {
            project.packaging = packaging.clone();
            project.artifact.coordinates.type_ = packaging.clone();
        }
        if let Some(resolved) = &p.resolved_version {
            project.artifact.coordinates.version = resolved.clone();
        }
        if let Some(descriptor) = &p.descriptor {
            project.descriptor = project.resolve_path(descriptor);
        }
        if let Some(directory) = &self.build.directory {
            project.build.directory = project.resolve_path(directory);
        }
        if let Some(final_name) = &self.build.final_name {
            project.build.final_name = final_name.clone();
        }

        for dep in &self.dependencies {
            let mut coordinates =
                Coordinates::new(&dep.group_id, &dep.artifact_id, &dep.version, &dep.type_);
            coordinates.classifier = dep.classifier.clone();
            let mut artifact = Artifact::new(coordinates, dep.scope);
            artifact.file = dep.file.as_deref().map(|f| project.resolve_path(f));
            project.add_dependency(artifact, dep.transitive);
        }

        project
    }

    /// Unpack settings: manifest values over [`UnpackConfig::for_project`].
    pub fn unpack_config(&self, project: &Project) -> UnpackConfig {
        let section = &self.unpack;
        let mut config = UnpackConfig::for_project(project);
        if let Some(dir) = &section.target_directory {
            config.target_directory = project.resolve_path(dir);
        }
        if let Some(scope) = &section.scope {
            config.scope = scope.clone();
        }
        if let Some(type_) = &section.packaging_type {
            config.packaging_type = type_.clone();
        }
        if let Some(exclude) = section.exclude_transitive {
            config.exclude_transitive = exclude;
        }
        config.includes = section.includes.clone();
        config.excludes = section.excludes.clone();
        config
    }

    /// Package settings: manifest values over [`PackageConfig::for_project`].
    pub fn package_config(&self, project: &Project) -> PackageConfig {
        let section = &self.package;
        let mut config = PackageConfig::for_project(project);
        if let Some(dir) = &section.content_directory {
            config.content_directory = project.resolve_path(dir);
        }
        if let Some(dir) = &section.output_directory {
            config.output_directory = project.resolve_path(dir);
        }
        if let Some(name) = &section.final_name {
            config.final_name = name.clone();
        }
        config.classifier = section.classifier.clone();
        config.include_empty_dirs = section.include_empty_dirs.unwrap_or(config.include_empty_dirs);
        config.force_creation = section.force_creation.unwrap_or(config.force_creation);
        config.add_maven_descriptor = section
            .add_maven_descriptor
            .unwrap_or(config.add_maven_descriptor);
        config
    }
}

/// Read the manifest at `path` and build its project, rooted at the
/// manifest's directory.
pub fn load(path: &Path) -> Result<(Manifest, Project)> {
    let manifest = Manifest::read(path)?;
    let basedir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let project = manifest.to_project(&basedir);
    Ok((manifest, project))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL: &str = r#"
[project]
group_id = "com.example"
artifact_id = "widgets"
version = "1.0-SNAPSHOT"
resolved_version = "1.0-20261019.101500-3"
descriptor = "build/pom.xml"

[build]
directory = "out"
final_name = "widgets"

[[dependency]]
group_id = "org.example"
artifact_id = "lib"
version = "2.1"
type = "jszip"
scope = "runtime"
file = "repo/lib-2.1.zip"

[[dependency]]
group_id = "org.example"
artifact_id = "base"
version = "1.0"
transitive = true

[unpack]
includes = "**/*.js"

[package]
classifier = "min"
force_creation = true
"#;

    #[test]
    fn test_full_manifest() {
        let manifest = Manifest::parse(FULL).unwrap();
        let project = manifest.to_project(Path::new("/work"));

        assert_eq!(project.version, "1.0-SNAPSHOT");
        assert_eq!(project.artifact.coordinates.version, "1.0-20261019.101500-3");
        assert_eq!(project.descriptor, PathBuf::from("/work/build/pom.xml"));
        assert_eq!(project.build.directory, PathBuf::from("/work/out"));
        assert_eq!(project.artifacts().len(), 2);
        assert_eq!(project.dependency_artifacts().len(), 1);

        let lib = &project.artifacts()[0];
        assert_eq!(lib.scope, Scope::Runtime);
        assert_eq!(lib.file, Some(PathBuf::from("/work/repo/lib-2.1.zip")));

        let base = &project.artifacts()[1];
        assert_eq!(base.coordinates.type_, "jar");
        assert_eq!(base.scope, Scope::Compile);
        assert_eq!(base.file, None);

        let unpack = manifest.unpack_config(&project);
        assert_eq!(unpack.target_directory, PathBuf::from("/work/out/widgets"));
        assert_eq!(unpack.includes.as_deref(), Some("**/*.js"));
        assert_eq!(unpack.excludes, None);

        let package = manifest.package_config(&project);
        assert_eq!(package.classifier.as_deref(), Some("min"));
        assert!(package.force_creation);
        assert!(package.add_maven_descriptor);
        assert_eq!(package.output_directory, PathBuf::from("/work/out"));
    }

    #[test]
    fn test_minimal_manifest_defaults() {
        let manifest = Manifest::parse(
            r#"
[project]
group_id = "g"
artifact_id = "a"
version = "1.0"
"#,
        )
        .unwrap();
        let project = manifest.to_project(Path::new("/work"));

        assert_eq!(project.packaging, "jszip");
        assert_eq!(project.build.final_name, "a-1.0");
        assert!(project.artifacts().is_empty());
        assert_eq!(manifest.unpack_config(&project), UnpackConfig::for_project(&project));
        assert_eq!(manifest.package_config(&project), PackageConfig::for_project(&project));
    }

    #[test]
    fn test_unknown_keys_and_scopes_are_rejected() {
        let unknown_key = "[project]\ngroup_id = \"g\"\nartifact_id = \"a\"\nversion = \"1\"\ncolour = \"red\"\n";
        assert!(Manifest::parse(unknown_key).is_err());

        let bad_scope = r#"
[project]
group_id = "g"
artifact_id = "a"
version = "1"

[[dependency]]
group_id = "g"
artifact_id = "b"
version = "1"
scope = "everywhere"
"#;
        assert!(Manifest::parse(bad_scope).is_err());
    }

    #[test]
    fn test_load_roots_paths_at_manifest_dir() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(MANIFEST_NAME);
        std::fs::write(&path, "[project]\ngroup_id = \"g\"\nartifact_id = \"a\"\nversion = \"1\"\n").unwrap();

        let (_, project) = load(&path).unwrap();
        assert_eq!(project.basedir, dir.path());
        assert_eq!(project.descriptor, dir.path().join("pom.xml"));
    }

    #[test]
    fn test_read_missing_manifest_names_path() {
        let err = Manifest::read(Path::new("/nonexistent/jszip.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/jszip.toml"));
    }
}
