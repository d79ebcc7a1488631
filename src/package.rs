//! Package step - zips a content directory together with descriptor metadata.
//!
//! The archive lands at `<output_directory>/<final_name>[-<classifier>].zip`.
//! With the descriptor enabled it also carries
//! `META-INF/maven/<group>/<artifact>/pom.xml` (the descriptor, verbatim) and
//! `pom.properties` next to it, generated in memory.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::archive::{ArchiveError, ArchiveStatus, BytesResource, ZipArchiver};
use crate::core::output;
use crate::project::Project;

/// Comment written on the first line of `pom.properties`.
pub const GENERATED_BY: &str = "Generated by Maven";

/// Content directory used when none is configured.
pub const DEFAULT_CONTENT_DIRECTORY: &str = "src/main/js";

#[derive(Error, Debug)]
#[error("Error assembling ZIP")]
pub struct PackageError(#[from] ArchiveError);

impl PackageError {
    pub fn cause(&self) -> &ArchiveError {
        &self.0
    }
}

/// Package step configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageConfig {
    pub content_directory: PathBuf,
    pub output_directory: PathBuf,
    pub final_name: String,
    pub classifier: Option<String>,
    pub include_empty_dirs: bool,
    pub force_creation: bool,
    /// Add `pom.xml` and `pom.properties` under `META-INF/maven`
    pub add_maven_descriptor: bool,
}

impl PackageConfig {
    /// Defaults for `project`: content from `src/main/js`, output into the
    /// build directory under the build's final name, descriptor included.
    pub fn for_project(project: &Project) -> Self {
        Self {
            content_directory: project.basedir.join(DEFAULT_CONTENT_DIRECTORY),
            output_directory: project.build.directory.clone(),
            final_name: project.build.final_name.clone(),
            classifier: None,
            include_empty_dirs: false,
            force_creation: false,
            add_maven_descriptor: true,
        }
    }
}

/// What the package step produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReport {
    pub file: PathBuf,
    pub status: ArchiveStatus,
    /// Set when the archive was attached as a classified artifact
    pub classifier: Option<String>,
}

/// `<basedir>/<final_name>[-<classifier>].zip`
///
/// A blank classifier adds nothing; a classifier already starting with `-`
/// is used as is.
pub fn zip_file(basedir: &Path, final_name: &str, classifier: Option<&str>) -> PathBuf {
    let suffix = match classifier {
        Some(c) if !c.trim().is_empty() && !c.starts_with('-') => format!("-{}", c),
        Some(c) if !c.trim().is_empty() => c.to_string(),
        _ => String::new(),
    };
    basedir.join(format!("{}{}.zip", final_name, suffix))
}

/// `META-INF/maven/<group>/<artifact>`
pub fn descriptor_dir(project: &Project) -> String {
    format!("META-INF/maven/{}/{}", project.group_id, project.artifact_id)
}

/// Render `pom.properties` in `java.util.Properties` text form.
pub fn render_pom_properties(
    group_id: &str,
    artifact_id: &str,
    version: &str,
    generated: DateTime<Utc>,
) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "#{}", GENERATED_BY);
    let _ = writeln!(out, "#{}", generated.format("%a %b %d %H:%M:%S UTC %Y"));
    for (key, value) in [
        ("groupId", group_id),
        ("artifactId", artifact_id),
        ("version", version),
    ] {
        let _ = writeln!(out, "{}={}", escape(key, true), escape(value, false));
    }
    out
}

fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());
    for (i, ch) in text.chars().enumerate() {
        match ch {
            ' ' if i == 0 || is_key => out.push_str("\\ "),
            '\\' => out.push_str("\\\\"),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\x0c' => out.push_str("\\f"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(ch);
            }
            c if (c as u32) < 0x20 || (c as u32) > 0x7e => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    let _ = write!(out, "\\u{:04X}", unit);
                }
            }
            c => out.push(c),
        }
    }
    out
}

/// The in-memory `pom.properties` resource. Its timestamp is the
/// descriptor's modification time.
pub fn pom_properties(project: &Project) -> Result<BytesResource, ArchiveError> {
    let last_modified = std::fs::metadata(&project.descriptor)
        .and_then(|md| md.modified())
        .map_err(|source| ArchiveError::Resource {
            name: project.descriptor.display().to_string(),
            source,
        })?;
    let text = render_pom_properties(
        &project.group_id,
        &project.artifact_id,
        &project.version,
        Utc::now(),
    );
    Ok(BytesResource::new("pom.properties", text.into_bytes(), last_modified))
}

/// Run the package step and register the result against `project`.
pub fn package(project: &mut Project, config: &PackageConfig) -> Result<PackageReport, PackageError> {
    let file = zip_file(
        &config.output_directory,
        &config.final_name,
        config.classifier.as_deref(),
    );
    output::action(&format!("Building zip: {}", file.display()));

    let mut archiver = ZipArchiver::new(&file)
        .include_empty_dirs(config.include_empty_dirs)
        .compress(true)
        .forced(config.force_creation);

    if config.add_maven_descriptor {
        if project.resolve_snapshot_version() {
            output::detail(&format!("resolved snapshot version {}", project.version));
        }

        let dir = descriptor_dir(project);
        archiver.add_file(&project.descriptor, &format!("{}/pom.xml", dir))?;
        archiver.add_resource(pom_properties(project)?, &format!("{}/pom.properties", dir))?;
        output::sub_action(&format!("{}/pom.xml", dir));
        output::sub_action(&format!("{}/pom.properties", dir));
    }

    if config.content_directory.is_dir() {
        archiver.add_directory(&config.content_directory)?;
    } else {
        output::detail(&format!(
            "no content directory at {}",
            config.content_directory.display()
        ));
    }

    let pb = output::spinner(&format!("writing {}", file.display()));
    let result = archiver.create_archive();
    output::progress_done(pb);

    let status = result?;
    match status {
        ArchiveStatus::Created { entries } => {
            output::success(&format!("{} ({} entries)", file.display(), entries));
        }
        ArchiveStatus::UpToDate => {
            output::skip(&format!("{} is up to date, skipping", file.display()));
        }
    }

    let classifier = config
        .classifier
        .as_deref()
        .map(|c| c.trim().trim_start_matches('-'))
        .filter(|c| !c.is_empty())
        .map(str::to_string);

    match &classifier {
        None => project.artifact.file = Some(file.clone()),
        Some(c) => {
            let type_ = project.packaging.clone();
            project.attach(&type_, c, file.clone());
        }
    }

    Ok(PackageReport {
        file,
        status,
        classifier,
    })
}
