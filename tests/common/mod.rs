//! Shared helpers for integration tests.

#![allow(dead_code)]

use jszip::{Artifact, Coordinates, Project, Scope};
use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Minimal descriptor written as the project's pom.xml.
pub const POM_XML: &str = r#"<project>
  <modelVersion>4.0.0</modelVersion>
  <groupId>com.example</groupId>
  <artifactId>widgets</artifactId>
  <version>1.0</version>
  <packaging>jszip</packaging>
</project>
"#;

/// Create a project rooted in a fresh temp dir, with a descriptor on disk.
pub fn create_project(version: &str) -> (TempDir, Project) {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("pom.xml"), POM_XML).unwrap();
    let project = Project::new(dir.path(), "com.example", "widgets", version);
    (dir, project)
}

/// Write a zip with the given (name, content) entries. Names ending in `/`
/// become directory entries.
pub fn write_zip(path: &Path, entries: &[(&str, &str)]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    let file = File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = zip::write::SimpleFileOptions::default();
    for (name, content) in entries {
        if name.ends_with('/') {
            zip.add_directory(*name, options).unwrap();
        } else {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
    }
    zip.finish().unwrap();
}

/// A resolved dependency whose archive lives under `<root>/repo`.
pub fn jszip_dependency(
    root: &Path,
    artifact_id: &str,
    version: &str,
    scope: Scope,
    entries: &[(&str, &str)],
) -> Artifact {
    let file = root
        .join("repo")
        .join(format!("{}-{}.zip", artifact_id, version));
    write_zip(&file, entries);
    Artifact::new(
        Coordinates::new("org.example", artifact_id, version, "jszip"),
        scope,
    )
    .with_file(file)
}

/// Sorted entry names of a zip file.
pub fn zip_entries(path: &Path) -> Vec<String> {
    let archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut names: Vec<String> = archive.file_names().map(String::from).collect();
    names.sort();
    names
}

/// Text content of one zip entry.
pub fn zip_entry(path: &Path, name: &str) -> String {
    let mut archive = zip::ZipArchive::new(File::open(path).unwrap()).unwrap();
    let mut entry = archive.by_name(name).unwrap();
    let mut out = String::new();
    entry.read_to_string(&mut out).unwrap();
    out
}

/// Parse `key=value` lines, ignoring `#` comments.
pub fn parse_properties(text: &str) -> Vec<(String, String)> {
    text.lines()
        .filter(|l| !l.starts_with('#') && !l.trim().is_empty())
        .filter_map(|l| l.split_once('='))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Write a file, creating parent directories.
pub fn write_file(path: &Path, content: &str) -> PathBuf {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
    path.to_path_buf()
}
