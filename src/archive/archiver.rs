//! Zip assembly.
//!
//! Entries are collected first and written in one pass by
//! [`ZipArchiver::create_archive`]. The zip is built in a temporary file next
//! to the destination and renamed into place only once it is complete, so a
//! failed run never leaves a truncated archive behind.

use std::path::{Path, PathBuf};
use std::time::SystemTime;

use ::zip::write::SimpleFileOptions;
use ::zip::{CompressionMethod, ZipWriter};
use chrono::{Datelike, Local, Timelike};
use indexmap::IndexMap;
use std::collections::HashSet;
use walkdir::WalkDir;

use super::{ArchiveError, FileResource, Resource};
use crate::core::fs;

/// Result of [`ZipArchiver::create_archive`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArchiveStatus {
    /// The archive was (re)written with this many entries
    Created { entries: usize },
    /// The destination was newer than every source and was left alone
    UpToDate,
}

enum Entry {
    Directory { last_modified: Option<SystemTime> },
    File(Box<dyn Resource>),
}

/// Collects entries and writes them into a single zip file.
pub struct ZipArchiver {
    dest: PathBuf,
    include_empty_dirs: bool,
    compress: bool,
    forced: bool,
    entries: IndexMap<String, Entry>,
}

impl ZipArchiver {
    /// New archiver writing to `dest`. Compression and forced recreation are
    /// on, empty directories are included.
    pub fn new(dest: impl Into<PathBuf>) -> Self {
        Self {
            dest: dest.into(),
            include_empty_dirs: true,
            compress: true,
            forced: true,
            entries: IndexMap::new(),
        }
    }

    pub fn include_empty_dirs(mut self, include: bool) -> Self {
        self.include_empty_dirs = include;
        self
    }

    pub fn compress(mut self, compress: bool) -> Self {
        self.compress = compress;
        self
    }

    /// When false, [`ZipArchiver::create_archive`] skips rewriting a
    /// destination that is newer than all of its sources.
    pub fn forced(mut self, forced: bool) -> Self {
        self.forced = forced;
        self
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Entry names in the order they will be written, directories included.
    pub fn entry_names(&self) -> Vec<&str> {
        self.entries.keys().map(String::as_str).collect()
    }

    /// Add an on-disk file under `name`.
    pub fn add_file(&mut self, path: &Path, name: &str) -> Result<(), ArchiveError> {
        let resource = FileResource::new(path);
        if !resource.exists() {
            return Err(ArchiveError::MissingSource {
                name: path.display().to_string(),
            });
        }
        self.add_resource(resource, name)
    }

    /// Add any resource under `name`. A later entry with the same name
    /// replaces the earlier one in place.
    pub fn add_resource(
        &mut self,
        resource: impl Resource + 'static,
        name: &str,
    ) -> Result<(), ArchiveError> {
        let name = validate_name(name)?;
        self.entries
            .insert(name.to_string(), Entry::File(Box::new(resource)));
        Ok(())
    }

    /// Mirror the tree below `dir` into the archive root, walking in
    /// file-name order.
    pub fn add_directory(&mut self, dir: &Path) -> Result<(), ArchiveError> {
        if !dir.is_dir() {
            return Err(ArchiveError::NotADirectory {
                path: dir.to_path_buf(),
            });
        }

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry.map_err(|source| ArchiveError::Walk {
                path: dir.to_path_buf(),
                source,
            })?;
            let relative = entry
                .path()
                .strip_prefix(dir)
                .map_err(|_| ArchiveError::InvalidEntryName(entry.path().display().to_string()))?;
            let name = fs::entry_name(relative);

            if entry.file_type().is_dir() {
                let last_modified = entry.metadata().ok().and_then(|md| md.modified().ok());
                self.entries
                    .insert(format!("{}/", name), Entry::Directory { last_modified });
            } else if entry.file_type().is_file() {
                self.add_resource(FileResource::new(entry.path()), &name)?;
            }
        }

        Ok(())
    }

    /// True if the destination exists and no source is newer than it.
    pub fn is_up_to_date(&self) -> Result<bool, ArchiveError> {
        let dest_modified = match std::fs::metadata(&self.dest).and_then(|md| md.modified()) {
            Ok(modified) => modified,
            Err(_) => return Ok(false),
        };

        for entry in self.entries.values() {
            if let Entry::File(resource) = entry {
                let modified = resource
                    .last_modified()
                    .map_err(|source| ArchiveError::Resource {
                        name: resource.description(),
                        source,
                    })?;
                if modified > dest_modified {
                    return Ok(false);
                }
            }
        }

        Ok(true)
    }

    /// Write the archive.
    pub fn create_archive(&self) -> Result<ArchiveStatus, ArchiveError> {
        if !self.forced && self.is_up_to_date()? {
            return Ok(ArchiveStatus::UpToDate);
        }

        let parent = match self.dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&parent).map_err(|source| ArchiveError::CreateDir {
            path: parent.clone(),
            source,
        })?;

        let mut staged = tempfile::NamedTempFile::new_in(&parent).map_err(|source| ArchiveError::Io {
            path: parent.clone(),
            source,
        })?;

        let written = self.write_entries(staged.as_file_mut())?;

        // Temporary files are created 0600.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(staged.path(), std::fs::Permissions::from_mode(0o644)).map_err(
                |source| ArchiveError::Io {
                    path: staged.path().to_path_buf(),
                    source,
                },
            )?;
        }

        staged
            .persist(&self.dest)
            .map_err(|e| ArchiveError::Io {
                path: self.dest.clone(),
                source: e.error,
            })?;

        Ok(ArchiveStatus::Created { entries: written })
    }

    fn write_entries(&self, file: &mut std::fs::File) -> Result<usize, ArchiveError> {
        let zip_err = |source: ::zip::result::ZipError| ArchiveError::Write {
            path: self.dest.clone(),
            source,
        };

        // Directories that must exist because a file lives below them.
        let parents: HashSet<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| matches!(entry, Entry::File(_)))
            .flat_map(|(name, _)| fs::parent_entries(name))
            .collect();

        let mut writer = ZipWriter::new(file);
        let mut written_dirs: HashSet<String> = HashSet::new();
        let mut count = 0;

        for (name, entry) in &self.entries {
            match entry {
                Entry::Directory { last_modified } => {
                    if written_dirs.contains(name)
                        || !(self.include_empty_dirs || parents.contains(name))
                    {
                        continue;
                    }
                    writer
                        .add_directory(name.as_str(), self.options(*last_modified, None))
                        .map_err(zip_err)?;
                    written_dirs.insert(name.clone());
                    count += 1;
                }
                Entry::File(resource) => {
                    let modified = resource.last_modified().ok();

                    for parent in fs::parent_entries(name) {
                        if written_dirs.insert(parent.clone()) {
                            writer
                                .add_directory(parent.as_str(), self.options(modified, None))
                                .map_err(zip_err)?;
                            count += 1;
                        }
                    }

                    let mut reader = resource.contents().map_err(|source| ArchiveError::Resource {
                        name: resource.description(),
                        source,
                    })?;
                    writer
                        .start_file(name.as_str(), self.options(modified, resource.unix_mode()))
                        .map_err(zip_err)?;
                    std::io::copy(&mut reader, &mut writer).map_err(|source| ArchiveError::Io {
                        path: self.dest.clone(),
                        source,
                    })?;
                    count += 1;
                }
            }
        }

        writer.finish().map_err(zip_err)?;
        Ok(count)
    }

    fn options(&self, modified: Option<SystemTime>, mode: Option<u32>) -> SimpleFileOptions {
        let method = if self.compress {
            CompressionMethod::Deflated
        } else {
            CompressionMethod::Stored
        };
        let mut options = SimpleFileOptions::default()
            .compression_method(method)
            .last_modified_time(dos_time(modified.unwrap_or_else(SystemTime::now)));
        if let Some(mode) = mode {
            options = options.unix_permissions(mode);
        }
        options
    }
}

/// Zip timestamps are local DOS times; anything outside 1980..=2107 falls
/// back to the DOS epoch.
fn dos_time(time: SystemTime) -> ::zip::DateTime {
    let local: chrono::DateTime<Local> = time.into();
    u16::try_from(local.year())
        .ok()
        .and_then(|year| {
            ::zip::DateTime::from_date_and_time(
                year,
                local.month() as u8,
                local.day() as u8,
                local.hour() as u8,
                local.minute() as u8,
                local.second() as u8,
            )
            .ok()
        })
        .unwrap_or_default()
}

fn validate_name(name: &str) -> Result<&str, ArchiveError> {
    let trimmed = name.trim_start_matches("./");
    if trimmed.is_empty() || trimmed.ends_with('/') || !fs::is_safe_path(Path::new(trimmed)) {
        return Err(ArchiveError::InvalidEntryName(name.to_string()));
    }
    Ok(trimmed)
}
