//! Zip archiving and unarchiving.
//!
//! [`ZipArchiver`] assembles entries from [`Resource`]s and directory trees
//! into one zip file; [`ZipUnArchiver`] extracts a zip into a directory,
//! optionally through an [`IncludeExcludeSelector`].

mod archiver;
pub mod resource;
pub mod selector;
mod unarchiver;

pub use archiver::{ArchiveStatus, ZipArchiver};
pub use resource::{BytesResource, FileResource, Resource};
pub use selector::IncludeExcludeSelector;
pub use unarchiver::{ExtractSummary, ZipUnArchiver};

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while reading or writing archives.
#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("cannot open {}: {source}", path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("zip read error in {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: ::zip::result::ZipError,
    },

    #[error("zip write error for {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: ::zip::result::ZipError,
    },

    #[error("cannot create directory {}: {source}", path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("cannot write {}: {source}", path.display())]
    Io { path: PathBuf, source: io::Error },

    #[error("cannot read {name}: {source}")]
    Resource { name: String, source: io::Error },

    #[error("{name} does not exist or is not a file")]
    MissingSource { name: String },

    #[error("{} is not a directory", path.display())]
    NotADirectory { path: PathBuf },

    #[error("cannot walk {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        source: walkdir::Error,
    },

    #[error("invalid entry name: {0}")]
    InvalidEntryName(String),

    #[error("invalid selector pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
}
