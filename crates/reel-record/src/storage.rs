//! Filesystem-backed demo storage.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use reel_core::DemoStorage;

/// [`DemoStorage`] over the local filesystem.
///
/// Relative demo names resolve against `root` when one is set, and
/// against the working directory otherwise.
#[derive(Clone, Debug, Default)]
pub struct FsStorage {
    root: Option<PathBuf>,
}

impl FsStorage {
    /// Storage rooted at the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage rooted at `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(dir.into()),
        }
    }

    /// Where `path` lands on disk.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => path.to_path_buf(),
        }
    }
}

impl DemoStorage for FsStorage {
    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }

    fn write(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        let target = self.resolve(path);
        log::debug!("writing {} demo bytes to {}", bytes.len(), target.display());
        fs::write(target, bytes)
    }
}
