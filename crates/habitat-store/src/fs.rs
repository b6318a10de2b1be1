//! Filesystem backend.
//!
//! Every key maps to a file below the data directory and every key prefix
//! to a directory, so a subtree delete is a single `remove_dir_all`.
//! Values are written to a temporary file in the target directory and then
//! renamed into place, which keeps each single-key write atomic.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::backend::{validate_key, KvBackend};
use crate::error::KvError;

/// Directory-tree backend rooted at a data directory.
#[derive(Debug)]
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    /// Open (or create) a backend rooted at `root`.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, KvError> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        debug!(root = %root.display(), "opened filesystem backend");
        Ok(Self { root })
    }

    /// The data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, KvError> {
        validate_key(key)?;
        Ok(key.split('/').fold(self.root.clone(), |path, seg| path.join(seg)))
    }
}

impl KvBackend for FsBackend {
    fn get(&self, key: &str) -> Result<Vec<u8>, KvError> {
        let path = self.path_for(key)?;
        if path.is_dir() {
            return Err(KvError::KeyNotFound(key.to_string()));
        }
        match fs::read(&path) {
            Ok(data) => Ok(data),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(KvError::KeyNotFound(key.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), KvError> {
        let path = self.path_for(key)?;
        if path.is_dir() {
            return Err(KvError::InvalidKey {
                key: key.to_string(),
                reason: "key names an existing subtree".into(),
            });
        }
        let parent = path.parent().unwrap_or(&self.root);
        fs::create_dir_all(parent)?;

        let mut tmp = NamedTempFile::new_in(parent)?;
        tmp.write_all(value)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&path).map_err(|e| KvError::Io(e.error))?;
        Ok(())
    }

    fn delete_tree(&self, prefix: &str) -> Result<(), KvError> {
        let path = self.path_for(prefix)?;
        if path.is_dir() {
            fs::remove_dir_all(&path)?;
        } else if path.is_file() {
            fs::remove_file(&path)?;
        } else {
            return Err(KvError::KeyNotFound(prefix.to_string()));
        }
        Ok(())
    }
}
