//! File-backed key-value store.
//!
//! The durable local storage analog of the browser's localStorage:
//! each key maps to one JSON file inside a root directory.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::KeyValueStore;

/// Error type for the file store.
#[derive(Debug, thiserror::Error)]
pub enum FileStoreError {
    /// Underlying filesystem failure.
    #[error("file store i/o error: {0}")]
    Io(#[from] io::Error),
    /// No user data directory could be determined for the default location.
    #[error("no user data directory available")]
    NoDataDir,
}

/// Key-value store persisting each key as a file under a root directory.
///
/// Writes go through a temp file followed by a rename, so a reader
/// never observes a partially written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    root: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `root`. The directory is created lazily
    /// on first write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Create a store in the platform's user data directory, under a
    /// `chw-survey` subdirectory.
    pub fn in_user_data_dir() -> Result<Self, FileStoreError> {
        let base = dirs::data_dir().ok_or(FileStoreError::NoDataDir)?;
        Ok(Self::new(base.join("chw-survey")))
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }
}

impl KeyValueStore for FileStore {
    type Error = FileStoreError;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&mut self, key: &str, value: &str) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.root)?;
        let path = self.path_for(key);
        let tmp = self.root.join(format!("{key}.json.tmp"));
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), Self::Error> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
