//! `InstalledEntry` struct for lockfile
//!
//! One installed component: the revision on disk and who asked for it.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

/// An installed component in the lockfile
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstalledEntry {
    /// Registry branch the revision was taken from
    pub branch: String,

    /// Installed revision
    pub git_sha: String,

    /// Every parent component or top-level caller that caused this install
    #[serde(default)]
    pub installed_by: BTreeSet<String>,

    /// Fields written by other tools (e.g. `patch`), kept verbatim
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl InstalledEntry {
    pub fn new(branch: impl Into<String>, git_sha: impl Into<String>) -> Self {
        Self {
            branch: branch.into(),
            git_sha: git_sha.into(),
            installed_by: BTreeSet::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Record referrers; existing ones are never removed
    pub fn add_installers<I, S>(&mut self, installers: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.installed_by
            .extend(installers.into_iter().map(Into::into));
    }
}
