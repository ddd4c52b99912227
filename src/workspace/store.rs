//! Lockfile store
//!
//! Owns the in-memory `modules.json` for one run. Mutations are buffered and
//! written at explicit checkpoints with [`LockfileStore::flush`].

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Lockfile;
use crate::domain::{ComponentRef, Revision};
use crate::error::{Result, fs as fs_error, lockfile as lockfile_error};
use crate::workspace::Pipeline;
use crate::workspace::consistency::{self, ConsistencyReport};

#[derive(Debug)]
pub struct LockfileStore {
    root: PathBuf,
    path: PathBuf,
    lockfile: Lockfile,
    dirty: bool,
}

impl LockfileStore {
    /// Load `modules.json`, or start an empty one named after the pipeline
    pub fn load(pipeline: &Pipeline) -> Result<Self> {
        let path = pipeline.lockfile_path();

        let (lockfile, dirty) = if path.exists() {
            let content = fs::read_to_string(&path)
                .map_err(|e| fs_error::read_failed(path.display().to_string(), e.to_string()))?;
            let lockfile = Lockfile::from_json(&content).map_err(|e| match e {
                crate::error::GraftError::LockfileParseFailed { reason, .. } => {
                    lockfile_error::parse_failed(path.display().to_string(), reason)
                }
                other => other,
            })?;
            (lockfile, false)
        } else {
            debug!("No lockfile at {}, starting a new one", path.display());
            (Lockfile::new(pipeline.name()), true)
        };

        Ok(Self {
            root: pipeline.root.clone(),
            path,
            lockfile,
            dirty,
        })
    }

    pub fn lockfile(&self) -> &Lockfile {
        &self.lockfile
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reconcile the lockfile with the files on disk.
    ///
    /// Entries whose directories are gone are dropped; untracked component
    /// directories are reported. Never fails on drift, only on I/O while
    /// persisting the repair.
    pub fn check_consistency(&mut self) -> Result<ConsistencyReport> {
        let report = consistency::reconcile(&self.root, &mut self.lockfile);
        if !report.dropped.is_empty() {
            self.dirty = true;
        }
        self.flush()?;
        Ok(report)
    }

    /// Currently recorded version, if the component was ever installed
    pub fn get_version(&self, component: &ComponentRef) -> Option<Revision> {
        self.lockfile
            .get(component)
            .filter(|entry| !entry.git_sha.is_empty())
            .map(|entry| Revision::new(entry.git_sha.clone()))
    }

    /// Current referrer set of a component
    pub fn installers(&self, component: &ComponentRef) -> Option<BTreeSet<String>> {
        self.lockfile
            .get(component)
            .map(|entry| entry.installed_by.clone())
    }

    /// Record `version` for `component` and add referrers.
    ///
    /// `install_track` carries referrers salvaged before a forced reinstall;
    /// they are merged with `installed_by`. Existing referrers are kept.
    pub fn update_entry(
        &mut self,
        component: &ComponentRef,
        branch: &str,
        version: &Revision,
        installed_by: &str,
        install_track: Option<&BTreeSet<String>>,
    ) {
        let entry = self.lockfile.entry_mut(component, branch);
        entry.branch = branch.to_string();
        entry.git_sha = version.as_str().to_string();
        entry.add_installers([installed_by]);
        if let Some(track) = install_track {
            entry.add_installers(track.iter().cloned());
        }
        self.dirty = true;
    }

    /// Add a referrer to an existing entry, leaving its version alone.
    ///
    /// Returns false when the component has no entry.
    pub fn add_installer(&mut self, component: &ComponentRef, installed_by: &str) -> bool {
        if self.lockfile.get(component).is_none() {
            return false;
        }
        let entry = self.lockfile.entry_mut(component, "");
        if !entry.installed_by.contains(installed_by) {
            entry.add_installers([installed_by]);
            self.dirty = true;
        }
        true
    }

    /// Write pending changes to disk atomically
    pub fn flush(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }

        let content = self.lockfile.to_json()?;
        let write_error = |e: &dyn std::fmt::Display| {
            lockfile_error::write_failed(self.path.display().to_string(), e.to_string())
        };

        let mut temp = tempfile::NamedTempFile::new_in(&self.root).map_err(|e| write_error(&e))?;
        temp.write_all(content.as_bytes())
            .map_err(|e| write_error(&e))?;
        temp.persist(&self.path).map_err(|e| write_error(&e.error))?;

        debug!("Wrote {}", self.path.display());
        self.dirty = false;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ComponentKind;

    const REMOTE: &str = "https://github.com/nf-core/modules.git";

    fn setup() -> (tempfile::TempDir, Pipeline) {
        let temp = crate::test_fixtures::create_temp_dir();
        let pipeline = Pipeline::open(temp.path()).unwrap();
        (temp, pipeline)
    }

    fn fastqc() -> ComponentRef {
        ComponentRef::new(ComponentKind::Module, "fastqc", "nf-core", REMOTE)
    }

    #[test]
    fn test_load_missing_creates_named_lockfile() {
        let (_temp, pipeline) = setup();
        let mut store = LockfileStore::load(&pipeline).unwrap();
        assert_eq!(store.lockfile().name, pipeline.name());

        store.flush().unwrap();
        assert!(pipeline.lockfile_path().exists());
    }

    #[test]
    fn test_load_reports_path_on_parse_error() {
        let (_temp, pipeline) = setup();
        fs::write(pipeline.lockfile_path(), "{ broken").unwrap();
        let err = LockfileStore::load(&pipeline).unwrap_err();
        assert!(err.to_string().contains("modules.json"));
    }

    #[test]
    fn test_update_entry_accumulates_referrers() {
        let (_temp, pipeline) = setup();
        let mut store = LockfileStore::load(&pipeline).unwrap();
        let version = Revision::new("abc");

        store.update_entry(&fastqc(), "master", &version, "A", None);
        store.update_entry(&fastqc(), "master", &version, "B", None);

        assert_eq!(
            store.installers(&fastqc()).unwrap(),
            BTreeSet::from(["A".to_string(), "B".to_string()])
        );
        assert_eq!(store.get_version(&fastqc()), Some(version));
    }

    #[test]
    fn test_update_entry_merges_install_track() {
        let (_temp, pipeline) = setup();
        let mut store = LockfileStore::load(&pipeline).unwrap();
        let track = BTreeSet::from(["A".to_string(), "B".to_string()]);

        store.update_entry(&fastqc(), "master", &Revision::new("new"), "A", Some(&track));

        assert_eq!(store.installers(&fastqc()).unwrap(), track);
        assert_eq!(store.get_version(&fastqc()), Some(Revision::new("new")));
    }

    #[test]
    fn test_add_installer_keeps_version() {
        let (_temp, pipeline) = setup();
        let mut store = LockfileStore::load(&pipeline).unwrap();
        assert!(!store.add_installer(&fastqc(), "A"));

        store.update_entry(&fastqc(), "master", &Revision::new("abc"), "modules", None);
        assert!(store.add_installer(&fastqc(), "A"));

        assert_eq!(store.get_version(&fastqc()), Some(Revision::new("abc")));
        assert_eq!(
            store.installers(&fastqc()).unwrap(),
            BTreeSet::from(["A".to_string(), "modules".to_string()])
        );
    }

    #[test]
    fn test_flush_persists_and_reloads() {
        let (_temp, pipeline) = setup();
        let mut store = LockfileStore::load(&pipeline).unwrap();
        store.update_entry(&fastqc(), "master", &Revision::new("abc"), "modules", None);
        store.flush().unwrap();

        let reloaded = LockfileStore::load(&pipeline).unwrap();
        assert_eq!(reloaded.get_version(&fastqc()), Some(Revision::new("abc")));
    }

    #[test]
    fn test_get_version_absent() {
        let (_temp, pipeline) = setup();
        let store = LockfileStore::load(&pipeline).unwrap();
        assert_eq!(store.get_version(&fastqc()), None);
        assert_eq!(store.installers(&fastqc()), None);
    }
}
