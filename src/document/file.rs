//! Single JSON file document backend.

use super::DocumentStore;
use crate::error::{Result, StoreError};
use crate::types::Document;
use fs2::FileExt;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Stores the document as one JSON file.
///
/// Each save goes to its own uniquely named temporary file next to the
/// target, which is synced and then renamed over it. Readers and concurrent
/// writers only ever see a complete document.
pub struct FileDocumentStore {
    /// Path to the JSON document.
    path: PathBuf,

    /// Indent the written JSON.
    pretty: bool,

    /// Lock file for exclusive access, if requested.
    _lock_file: Option<File>,
}

impl FileDocumentStore {
    /// Open the document at `path` without taking a lock.
    ///
    /// The file itself does not need to exist yet.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            pretty: true,
            _lock_file: None,
        }
    }

    /// Open the document and hold an exclusive lock on `<path>.lock` until
    /// the store is dropped.
    pub fn locked(path: impl AsRef<Path>) -> Result<Self> {
        let mut store = Self::new(path);
        store._lock_file = Some(Self::acquire_lock(&store.path)?);
        Ok(store)
    }

    /// Choose between indented and compact output.
    pub fn with_pretty(mut self, pretty: bool) -> Self {
        self.pretty = pretty;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn acquire_lock(path: &Path) -> Result<File> {
        if let Some(parent) = non_empty_parent(path) {
            fs::create_dir_all(parent)?;
        }

        let lock_file = File::create(sibling(path, ".lock"))?;
        lock_file
            .try_lock_exclusive()
            .map_err(|_| StoreError::Locked)?;

        Ok(lock_file)
    }

    fn encode(&self, document: &Document) -> Result<Vec<u8>> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(document)?
        } else {
            serde_json::to_vec(document)?
        };
        Ok(bytes)
    }

    fn write_replace(&self, bytes: &[u8]) -> io::Result<()> {
        let dir = match non_empty_parent(&self.path) {
            Some(parent) => {
                fs::create_dir_all(parent)?;
                parent
            }
            None => Path::new("."),
        };

        // Dropped unpersisted on any error, which removes it
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;
        Ok(())
    }
}

impl DocumentStore for FileDocumentStore {
    fn load(&self) -> Result<Document> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %self.path.display(), "document missing, starting empty");
                return Ok(Document::new());
            }
            Err(e) => return Err(StoreError::Persistence(e)),
        };

        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "loaded document");

        Document::parse(&bytes).map_err(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "refusing corrupted document");
            e
        })
    }

    fn save(&self, document: &Document) -> Result<()> {
        let bytes = self.encode(document)?;
        self.write_replace(&bytes)?;

        tracing::debug!(path = %self.path.display(), bytes = bytes.len(), "saved document");
        Ok(())
    }
}

/// `path` with `suffix` appended to its file name.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}
