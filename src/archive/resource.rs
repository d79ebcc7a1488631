//! Archive entry sources.
//!
//! A [`Resource`] is anything the archiver can copy into an entry: an on-disk
//! file, or a byte blob held in memory that never touches the disk.

use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub trait Resource {
    /// Human-readable origin, used in error messages.
    fn description(&self) -> String;

    fn exists(&self) -> bool;

    fn size(&self) -> io::Result<u64>;

    fn last_modified(&self) -> io::Result<SystemTime>;

    fn contents(&self) -> io::Result<Box<dyn Read + '_>>;

    /// Unix permission bits to store with the entry, if any.
    fn unix_mode(&self) -> Option<u32> {
        None
    }
}

/// A regular file on disk.
#[derive(Debug, Clone)]
pub struct FileResource {
    path: PathBuf,
}

impl FileResource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Resource for FileResource {
    fn description(&self) -> String {
        self.path.display().to_string()
    }

    fn exists(&self) -> bool {
        self.path.is_file()
    }

    fn size(&self) -> io::Result<u64> {
        Ok(std::fs::metadata(&self.path)?.len())
    }

    fn last_modified(&self) -> io::Result<SystemTime> {
        std::fs::metadata(&self.path)?.modified()
    }

    fn contents(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(File::open(&self.path)?))
    }

    #[cfg(unix)]
    fn unix_mode(&self) -> Option<u32> {
        use std::os::unix::fs::PermissionsExt;
        std::fs::metadata(&self.path)
            .ok()
            .map(|md| md.permissions().mode() & 0o7777)
    }
}

/// Bytes fixed at construction time, with a caller-supplied timestamp.
#[derive(Debug, Clone)]
pub struct BytesResource {
    description: String,
    bytes: Vec<u8>,
    last_modified: SystemTime,
}

impl BytesResource {
    pub fn new(description: impl Into<String>, bytes: Vec<u8>, last_modified: SystemTime) -> Self {
        Self {
            description: description.into(),
            bytes,
            last_modified,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Resource for BytesResource {
    fn description(&self) -> String {
        self.description.clone()
    }

    fn exists(&self) -> bool {
        true
    }

    fn size(&self) -> io::Result<u64> {
        Ok(self.bytes.len() as u64)
    }

    fn last_modified(&self) -> io::Result<SystemTime> {
        Ok(self.last_modified)
    }

    fn contents(&self) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(Cursor::new(self.bytes.as_slice())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_bytes_resource_reports_its_own_size() {
        let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        let res = BytesResource::new("pom.properties", b"version=1.0\n".to_vec(), stamp);

        assert!(res.exists());
        assert_eq!(res.size().unwrap(), 12);
        assert_eq!(res.last_modified().unwrap(), stamp);

        let mut out = String::new();
        res.contents().unwrap().read_to_string(&mut out).unwrap();
        assert_eq!(out, "version=1.0\n");
    }

    #[test]
    fn test_file_resource() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.js");
        std::fs::write(&path, "var a = 1;").unwrap();

        let res = FileResource::new(&path);
        assert!(res.exists());
        assert_eq!(res.size().unwrap(), 10);

        let mut out = String::new();
        res.contents().unwrap().read_to_string(&mut out).unwrap();
        assert_eq!(out, "var a = 1;");

        assert!(!FileResource::new(dir.path().join("missing.js")).exists());
        assert!(!FileResource::new(dir.path()).exists());
    }
}
