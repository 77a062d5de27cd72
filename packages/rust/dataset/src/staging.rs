//! Scoped staging area for per-run segment extracts.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use landeval_shared::{LandEvalError, Result};

/// Extension of managed extract files. `clear` touches nothing else.
const EXTRACT_EXTENSION: &str = "csv";

/// A working directory holding one run's extracts.
///
/// Acquisition creates the directory structure; a pre-existing directory
/// is not an error. The directory itself is never deleted — only the
/// managed extract files inside it.
#[derive(Debug, Clone)]
pub struct StagingArea {
    root: PathBuf,
}

impl StagingArea {
    /// Acquire the staging area at `root`, creating it if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root).map_err(|e| LandEvalError::io(&root, e))?;
        Ok(Self { root })
    }

    /// Root directory of the staging area.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path where the named extract file lives. Deterministic, so
    /// re-running the same listing overwrites the same file.
    pub fn path_for(&self, file_name: &str) -> PathBuf {
        self.root.join(file_name)
    }

    /// Remove all managed extract files, returning how many were deleted.
    ///
    /// Safe to call on an empty or missing directory, and safe to call
    /// twice. Filesystem errors are logged and swallowed so cleanup can
    /// never block report delivery.
    pub fn clear(&self) -> usize {
        let entries = match std::fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return 0,
            Err(e) => {
                warn!(path = %self.root.display(), error = %e, "could not read staging dir");
                return 0;
            }
        };

        let mut deleted = 0;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some(EXTRACT_EXTENSION) {
                continue;
            }
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    info!(path = %path.display(), "deleted extract");
                    deleted += 1;
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "failed to delete extract");
                }
            }
        }

        info!(deleted, path = %self.root.display(), "staging cleanup complete");
        deleted
    }
}
