//! Component registries
//!
//! A registry publishes components under `<kind>/<repo_path>/<name>/` on
//! one branch. [`Registry`] is the seam between the install engine and
//! where component files come from; [`git::GitRegistry`] is the only
//! production implementation.

pub mod git;
pub mod paths;

use crate::domain::{ComponentKind, ComponentRef, Revision};
use crate::error::Result;

pub use crate::git::TreeFile;
pub use git::{GitRegistry, RegistrySettings};

/// Default registry remote
pub const DEFAULT_REMOTE: &str = "https://github.com/nf-core/modules.git";

/// Files of one component at one revision, paths relative to the component directory
pub type FileTree = Vec<TreeFile>;

/// A revision that changed a component, as listed in the version picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionInfo {
    pub revision: Revision,
    pub summary: String,
    /// Commit time, seconds since the epoch
    pub time: i64,
}

pub trait Registry {
    fn remote_url(&self) -> &str;

    /// Organisation directory components live under
    fn repo_path(&self) -> &str;

    fn branch(&self) -> &str;

    /// Names of every component of `kind` on the branch tip, sorted
    fn available_components(&self, kind: ComponentKind) -> Result<Vec<String>>;

    /// Most recent revision on the branch that changed the component
    fn resolve_latest(&self, component: &ComponentRef) -> Result<Revision>;

    /// Revisions that changed the component, newest first
    fn component_versions(&self, component: &ComponentRef) -> Result<Vec<RevisionInfo>>;

    /// Pin `revision` to a full commit SHA.
    ///
    /// `None` unless it names a commit (full or abbreviated SHA) that is on
    /// the configured branch and contains the component.
    fn resolve_revision(
        &self,
        component: &ComponentRef,
        revision: &Revision,
    ) -> Result<Option<Revision>>;

    fn fetch_files(&self, component: &ComponentRef, revision: &Revision) -> Result<FileTree>;

    /// Reference to a component of this registry
    fn component(&self, kind: ComponentKind, name: &str) -> ComponentRef {
        ComponentRef::new(kind, name, self.repo_path(), self.remote_url())
    }
}

/// Registry-relative directory of a component, always `/`-separated
pub fn component_tree_path(component: &ComponentRef) -> String {
    format!(
        "{}/{}/{}",
        component.kind.dir_name(),
        component.repo_path,
        component.name
    )
}
