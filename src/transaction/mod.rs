//! Transaction support for component reinstalls
//!
//! A forced reinstall moves the installed directory aside before new files
//! arrive. The transaction owns those stashed directories and every
//! directory created on its behalf, so the pipeline is never left without
//! a component that a failed reinstall was meant to replace.
//!
//! ## Usage
//!
//! ```ignore
//! let mut transaction = Transaction::new();
//! transaction.stash_dir(&installed_dir)?;
//!
//! // Materialize new files...
//! transaction.track_dir_created(&installed_dir);
//!
//! // On success:
//! transaction.commit();
//!
//! // On error (automatic via Drop if not committed):
//! // the stashed directory is moved back
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;
use tracing::{debug, warn};

use crate::error::{Result, fs as fs_error};

/// Prefix of backup directories created next to stashed components
pub const BACKUP_PREFIX: &str = ".graft-backup-";

/// A directory moved out of the way, waiting to be discarded or restored
#[derive(Debug)]
struct StashedDir {
    /// Where the directory lived
    original: PathBuf,
    /// Holds the moved directory as its only entry
    backup: TempDir,
}

impl StashedDir {
    fn stashed_path(&self) -> PathBuf {
        self.backup.path().join("stashed")
    }
}

#[derive(Debug, Default)]
pub struct Transaction {
    /// Directories moved aside during this transaction
    stashed: Vec<StashedDir>,

    /// Directories created during this transaction
    created_dirs: Vec<PathBuf>,

    /// Whether the transaction has been committed
    committed: bool,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move `path` into a backup next to it.
    ///
    /// The backup sits in the same parent directory so the move is a rename.
    pub fn stash_dir(&mut self, path: &Path) -> Result<()> {
        let removal_error = |e: &dyn std::fmt::Display| {
            fs_error::removal_failed(path.display().to_string(), e.to_string())
        };

        let parent = path
            .parent()
            .ok_or_else(|| removal_error(&"path has no parent directory"))?;
        let backup = tempfile::Builder::new()
            .prefix(BACKUP_PREFIX)
            .tempdir_in(parent)
            .map_err(|e| removal_error(&e))?;

        let stash = StashedDir {
            original: path.to_path_buf(),
            backup,
        };
        fs::rename(path, stash.stashed_path()).map_err(|e| removal_error(&e))?;

        debug!("Stashed {}", path.display());
        self.stashed.push(stash);
        Ok(())
    }

    /// Track a directory that was created during this transaction
    pub fn track_dir_created(&mut self, path: impl Into<PathBuf>) {
        self.created_dirs.push(path.into());
    }

    /// Commit the transaction: keep new files, discard backups
    pub fn commit(mut self) {
        self.committed = true;
    }

    /// Remove created directories and move stashed ones back
    pub fn rollback(&mut self) -> Result<()> {
        if self.committed {
            return Ok(());
        }

        // Deepest first
        self.created_dirs
            .sort_by_key(|dir| std::cmp::Reverse(dir.components().count()));
        for dir in self.created_dirs.drain(..) {
            if dir.exists() {
                fs::remove_dir_all(&dir)?;
            }
        }

        // Latest stash first, so nested stashes unwind in order
        while let Some(stash) = self.stashed.pop() {
            if stash.original.exists() {
                fs::remove_dir_all(&stash.original)?;
            }
            fs::rename(stash.stashed_path(), &stash.original)?;
            debug!("Restored {}", stash.original.display());
        }

        Ok(())
    }
}

impl Drop for Transaction {
    fn drop(&mut self) {
        if !self.committed {
            if let Err(e) = self.rollback() {
                warn!("Rollback failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests;
