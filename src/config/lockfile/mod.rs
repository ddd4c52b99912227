//! Lockfile (modules.json) main module
//!
//! Records, per registry remote, every installed module and subworkflow with
//! the revision on disk and the set of components that required it.
//!
//! ```text
//! repos
//!  └─ <remote_url>
//!      ├─ modules      └─ <repo_path> └─ <name> -> InstalledEntry
//!      └─ subworkflows └─ <repo_path> └─ <name> -> InstalledEntry
//! ```

pub mod entry;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{ComponentKind, ComponentRef};
use crate::error::{Result, lockfile as lockfile_error};

pub use entry::InstalledEntry;

/// Lockfile filename, relative to the pipeline root
pub const LOCKFILE_NAME: &str = "modules.json";

type ComponentTable = BTreeMap<String, BTreeMap<String, InstalledEntry>>;

/// Installed components of one registry remote
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepoEntry {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub modules: ComponentTable,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub subworkflows: ComponentTable,
}

impl RepoEntry {
    fn table(&self, kind: ComponentKind) -> &ComponentTable {
        match kind {
            ComponentKind::Module => &self.modules,
            ComponentKind::Subworkflow => &self.subworkflows,
        }
    }

    fn table_mut(&mut self, kind: ComponentKind) -> &mut ComponentTable {
        match kind {
            ComponentKind::Module => &mut self.modules,
            ComponentKind::Subworkflow => &mut self.subworkflows,
        }
    }

    fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.subworkflows.is_empty()
    }
}

/// Lockfile structure (modules.json)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Lockfile {
    /// Pipeline name
    #[serde(default)]
    pub name: String,

    /// Pipeline homepage
    #[serde(rename = "homePage", default)]
    pub home_page: String,

    /// Installed components keyed by registry remote URL
    #[serde(default)]
    pub repos: BTreeMap<String, RepoEntry>,
}

impl Lockfile {
    /// Create a new empty lockfile
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            home_page: String::new(),
            repos: BTreeMap::new(),
        }
    }

    /// Parse lockfile from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| lockfile_error::parse_failed(LOCKFILE_NAME, e.to_string()))
    }

    /// Serialize lockfile to JSON string (pretty-printed, trailing newline)
    pub fn to_json(&self) -> Result<String> {
        let mut json = serde_json::to_string_pretty(self)
            .map_err(|e| lockfile_error::write_failed(LOCKFILE_NAME, e.to_string()))?;
        json.push('\n');
        Ok(json)
    }

    /// Find the entry for a component
    pub fn get(&self, component: &ComponentRef) -> Option<&InstalledEntry> {
        self.repos
            .get(&component.remote_url)?
            .table(component.kind)
            .get(&component.repo_path)?
            .get(&component.name)
    }

    /// Find the entry for a component, creating it (with an empty referrer set) if absent
    pub fn entry_mut(&mut self, component: &ComponentRef, branch: &str) -> &mut InstalledEntry {
        self.repos
            .entry(component.remote_url.clone())
            .or_default()
            .table_mut(component.kind)
            .entry(component.repo_path.clone())
            .or_default()
            .entry(component.name.clone())
            .or_insert_with(|| InstalledEntry::new(branch, ""))
    }

    /// Remove a component's entry, pruning maps left empty
    pub fn remove(&mut self, component: &ComponentRef) -> Option<InstalledEntry> {
        let repo = self.repos.get_mut(&component.remote_url)?;
        let table = repo.table_mut(component.kind);
        let names = table.get_mut(&component.repo_path)?;
        let removed = names.remove(&component.name);

        if names.is_empty() {
            table.remove(&component.repo_path);
        }
        if repo.is_empty() {
            self.repos.remove(&component.remote_url);
        }
        removed
    }

    /// Every tracked component, in deterministic order
    pub fn components(&self) -> Vec<ComponentRef> {
        let mut components = Vec::new();
        for (remote_url, repo) in &self.repos {
            for kind in [ComponentKind::Module, ComponentKind::Subworkflow] {
                for (repo_path, names) in repo.table(kind) {
                    for name in names.keys() {
                        components.push(ComponentRef::new(
                            kind,
                            name.clone(),
                            repo_path.clone(),
                            remote_url.clone(),
                        ));
                    }
                }
            }
        }
        components
    }
}
