//! Pipeline project management for Graft
//!
//! This module handles:
//! - Locating and validating the pipeline root
//! - The lockfile store (buffered `modules.json` with consistency repair)
//!
//! ## Pipeline Structure
//!
//! ```text
//! <pipeline>/
//! ├── modules.json                       # Installed components and referrers
//! ├── modules/<repo_path>/<name>/        # Installed modules
//! └── subworkflows/<repo_path>/<name>/   # Installed subworkflows
//! ```

pub mod consistency;
pub mod store;

use std::path::{Path, PathBuf};

use normpath::PathExt;

use crate::config::lockfile::LOCKFILE_NAME;
use crate::error::{Result, workspace as workspace_error};

pub use store::LockfileStore;

/// Directory for pipeline-local components, never tracked in the lockfile
pub const LOCAL_COMPONENTS_DIR: &str = "local";

/// A pipeline project that components are installed into
#[derive(Debug, Clone)]
pub struct Pipeline {
    /// Root directory of the pipeline
    pub root: PathBuf,
}

impl Pipeline {
    /// Open a pipeline directory.
    ///
    /// Only checks that the directory exists; no marker file is required.
    pub fn open(dir: &Path) -> Result<Self> {
        if !dir.is_dir() {
            return Err(workspace_error::invalid_root(dir.display().to_string()));
        }

        let root = dir
            .normalize()
            .map(normpath::BasePathBuf::into_path_buf)
            .unwrap_or_else(|_| dir.to_path_buf());

        Ok(Self { root })
    }

    /// Path to `modules.json`
    pub fn lockfile_path(&self) -> PathBuf {
        self.root.join(LOCKFILE_NAME)
    }

    /// Name written to a freshly created lockfile
    pub fn name(&self) -> String {
        self.root
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("pipeline")
            .to_string()
    }
}
