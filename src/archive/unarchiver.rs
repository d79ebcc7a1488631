//! Zip extraction.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use filetime::FileTime;

use super::{ArchiveError, IncludeExcludeSelector};
use crate::core::{fs, output};

/// What an extraction wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractSummary {
    /// Files and directories written
    pub extracted: usize,
    /// Entries left out by the selector
    pub filtered: usize,
    /// Entries refused because their names escape the destination
    pub unsafe_entries: Vec<String>,
}

/// Extracts one zip file into a destination directory.
///
/// Existing files in the destination are only ever overwritten by entries of
/// the same name; nothing is deleted.
pub struct ZipUnArchiver {
    source: PathBuf,
    dest: PathBuf,
    selector: Option<IncludeExcludeSelector>,
}

impl ZipUnArchiver {
    pub fn new(source: impl Into<PathBuf>, dest: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            dest: dest.into(),
            selector: None,
        }
    }

    pub fn with_selector(mut self, selector: Option<IncludeExcludeSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn dest(&self) -> &Path {
        &self.dest
    }

    pub fn extract(&self) -> Result<ExtractSummary, ArchiveError> {
        let file = File::open(&self.source).map_err(|source| ArchiveError::Open {
            path: self.source.clone(),
            source,
        })?;

        let mut archive = ::zip::ZipArchive::new(file).map_err(|source| ArchiveError::Read {
            path: self.source.clone(),
            source,
        })?;

        std::fs::create_dir_all(&self.dest).map_err(|source| ArchiveError::CreateDir {
            path: self.dest.clone(),
            source,
        })?;

        let mut summary = ExtractSummary::default();

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|source| ArchiveError::Read {
                path: self.source.clone(),
                source,
            })?;

            let relative = match entry.enclosed_name() {
                Some(path) if fs::is_safe_path(&path) => path,
                _ => {
                    output::warning(&format!(
                        "skipping unsafe entry {} in {}",
                        entry.name(),
                        self.source.display()
                    ));
                    summary.unsafe_entries.push(entry.name().to_string());
                    continue;
                }
            };

            if let Some(selector) = &self.selector {
                if !selector.is_selected(&fs::entry_name(&relative)) {
                    summary.filtered += 1;
                    continue;
                }
            }

            let outpath = self.dest.join(&relative);

            if entry.is_dir() {
                std::fs::create_dir_all(&outpath).map_err(|source| ArchiveError::CreateDir {
                    path: outpath.clone(),
                    source,
                })?;
            } else {
                fs::ensure_parent_dir(&outpath).map_err(|source| ArchiveError::CreateDir {
                    path: outpath.parent().unwrap_or(self.dest.as_path()).to_path_buf(),
                    source,
                })?;

                let mut outfile = File::create(&outpath).map_err(|source| ArchiveError::Io {
                    path: outpath.clone(),
                    source,
                })?;
                std::io::copy(&mut entry, &mut outfile).map_err(|source| ArchiveError::Io {
                    path: outpath.clone(),
                    source,
                })?;
                drop(outfile);

                #[cfg(unix)]
                {
                    use std::os::unix::fs::PermissionsExt;
                    if let Some(mode) = entry.unix_mode() {
                        std::fs::set_permissions(&outpath, std::fs::Permissions::from_mode(mode & 0o7777))
                            .map_err(|source| ArchiveError::Io {
                                path: outpath.clone(),
                                source,
                            })?;
                    }
                }

                if let Some(mtime) = entry.last_modified().and_then(file_time) {
                    filetime::set_file_mtime(&outpath, mtime).map_err(|source| ArchiveError::Io {
                        path: outpath.clone(),
                        source,
                    })?;
                }
            }

            summary.extracted += 1;
        }

        Ok(summary)
    }
}

/// Zip entry times are local DOS times.
fn file_time(time: ::zip::DateTime) -> Option<FileTime> {
    let local = NaiveDate::from_ymd_opt(time.year().into(), time.month().into(), time.day().into())?
        .and_hms_opt(time.hour().into(), time.minute().into(), time.second().into())?
        .and_local_timezone(Local)
        .earliest()?;
    Some(FileTime::from_unix_time(local.timestamp(), 0))
}
