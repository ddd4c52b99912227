//! File installation for components
//!
//! This module handles:
//! - Materializing a component's files for one revision into the pipeline
//! - Moving installed files aside before a forced reinstall
//! - Discovering what a component includes ([`extract`])

pub mod extract;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::domain::{ComponentRef, Revision};
use crate::error::{GraftError, Result, registry as registry_error};
use crate::registry::{FileTree, Registry};
use crate::transaction::Transaction;

pub use extract::{DependencyExtractor, IncludeScanner};

/// Prefix of staging directories created next to install targets
const STAGING_PREFIX: &str = ".graft-staging-";

/// Writes and removes component directories
#[derive(Debug, Default, Clone, Copy)]
pub struct InstallExecutor;

impl InstallExecutor {
    /// Fetch `component` at `version` and place it at `target_dir`.
    ///
    /// Files are written to a staging directory beside the target and moved
    /// into place in one rename, so `target_dir` never holds a partial
    /// tree. On success the new directory is tracked by `transaction`.
    pub fn materialize(
        &self,
        registry: &dyn Registry,
        component: &ComponentRef,
        version: &Revision,
        target_dir: &Path,
        transaction: &mut Transaction,
    ) -> Result<usize> {
        let fetch_error = |reason: String| {
            registry_error::fetch_failed(
                &component.name,
                version.as_str(),
                registry.remote_url(),
                target_dir.display().to_string(),
                reason,
            )
        };

        let files = registry
            .fetch_files(component, version)
            .map_err(|e| fetch_error(e.to_string()))?;
        if files.is_empty() {
            return Err(fetch_error("no files at this revision".to_string()));
        }

        let count = files.len();
        write_staged(&files, target_dir).map_err(|e| fetch_error(e.to_string()))?;
        transaction.track_dir_created(target_dir);

        debug!(
            "Wrote {} files for '{}' into {}",
            count,
            component.name,
            target_dir.display()
        );
        Ok(count)
    }

    /// Move an installed component out of the way for the rest of `transaction`
    pub fn remove(&self, target_dir: &Path, transaction: &mut Transaction) -> Result<()> {
        transaction.stash_dir(target_dir)
    }
}

fn write_staged(files: &FileTree, target_dir: &Path) -> Result<()> {
    let parent = target_dir.parent().ok_or_else(|| GraftError::IoError {
        message: format!("{} has no parent directory", target_dir.display()),
    })?;
    fs::create_dir_all(parent)?;

    let staging = tempfile::Builder::new()
        .prefix(STAGING_PREFIX)
        .tempdir_in(parent)?;
    let staged: PathBuf = staging.path().join("component");

    for file in files {
        let path = staged.join(&file.path);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&path, &file.content)?;
        if file.executable {
            make_executable(&path)?;
        }
    }

    if target_dir.exists() {
        return Err(GraftError::IoError {
            message: format!("{} already exists", target_dir.display()),
        });
    }
    fs::rename(&staged, target_dir)?;
    Ok(())
}

#[cfg(unix)]
fn make_executable(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;

    let mut permissions = fs::metadata(path)?.permissions();
    permissions.set_mode(permissions.mode() | 0o111);
    fs::set_permissions(path, permissions)?;
    Ok(())
}

#[cfg(not(unix))]
fn make_executable(_path: &Path) -> Result<()> {
    Ok(())
}
