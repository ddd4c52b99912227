//! Test fixtures and utilities for reducing test setup duplication.
//!
//! This module provides helper functions to create common test environments
//! (temp directories, git repos, component registries) with a single call.
//!
//! # Usage
//!
//! ```ignore
//! use crate::test_fixtures::{create_temp_dir, RegistryFixture};
//!
//! #[test]
//! fn my_test() {
//!     let pipeline = create_temp_dir();
//!     let registry = RegistryFixture::new();
//!     registry.add_module("fastqc").commit("add fastqc");
//! }
//! ```

use std::path::{Path, PathBuf};

use git2::{IndexAddOption, Oid, Repository, Signature};
use tempfile::TempDir;

/// Repo path the fixture registry publishes in `.nf-core.yml`
pub const FIXTURE_ORG: &str = "nf-core";

/// Absolute base for test temp dirs, so a relative `TMPDIR` never puts
/// fixtures under the current working directory
fn temp_base() -> PathBuf {
    let base = std::env::temp_dir();
    if base.is_absolute() {
        base
    } else {
        PathBuf::from("/tmp")
    }
}

/// Create a temp directory in the system temp location.
///
/// # Panics
///
/// Panics if the temp directory cannot be created.
#[must_use]
pub fn create_temp_dir() -> TempDir {
    TempDir::new_in(temp_base()).expect("Failed to create temp directory")
}

/// Create a temp directory with a git repository initialized.
///
/// Returns the `TempDir` (which cleans up on drop) and the path to the repo.
///
/// # Panics
///
/// Panics if the temp directory or git repository cannot be created.
#[must_use]
pub fn create_git_repo() -> (TempDir, PathBuf) {
    let temp = create_temp_dir();
    let path = temp.path().to_path_buf();
    git2::Repository::init(&path).expect("Failed to init git repository");
    (temp, path)
}

/// Write `files` into the work tree at `repo_path` and commit everything.
///
/// Deleted files are staged too, so the commit mirrors the work tree.
///
/// # Panics
///
/// Panics if any git or filesystem step fails.
pub fn commit_files(repo_path: &Path, files: &[(&str, &str)], message: &str) -> Oid {
    for (path, content) in files {
        let full_path = repo_path.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&full_path, content).expect("Failed to write test file");
    }

    let repo = Repository::open(repo_path).expect("Failed to open repository");
    let mut index = repo.index().expect("Failed to open index");
    index
        .add_all(["*"], IndexAddOption::DEFAULT, None)
        .expect("Failed to stage files");
    index.update_all(["*"], None).expect("Failed to stage deletions");
    index.write().expect("Failed to write index");

    let tree_id = index.write_tree().expect("Failed to write tree");
    let tree = repo.find_tree(tree_id).expect("Failed to find tree");
    let signature = Signature::now("Graft Test", "test@example.com").expect("Failed to sign");
    let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
    let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();

    repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
        .expect("Failed to commit")
}

/// `main.nf` of a module
#[must_use]
pub fn module_source(name: &str) -> String {
    let symbol = name.replace('/', "_").to_uppercase();
    format!("process {symbol} {{\n    script:\n    \"\"\"\n    echo {name}\n    \"\"\"\n}}\n")
}

/// `main.nf` of a subworkflow including the given modules and subworkflows
#[must_use]
pub fn subworkflow_source(name: &str, modules: &[&str], subworkflows: &[&str]) -> String {
    let mut source = String::new();
    for module in modules {
        let symbol = module.replace('/', "_").to_uppercase();
        source.push_str(&format!(
            "include {{ {symbol} }} from '../../../modules/{FIXTURE_ORG}/{module}/main'\n"
        ));
    }
    for subworkflow in subworkflows {
        let symbol = subworkflow.to_uppercase();
        source.push_str(&format!(
            "include {{ {symbol} }} from '../{subworkflow}/main'\n"
        ));
    }
    source.push_str(&format!(
        "\nworkflow {} {{\n    main:\n    ch_versions = Channel.empty()\n}}\n",
        name.to_uppercase()
    ));
    source
}

/// A local git repository laid out like a component registry
pub struct RegistryFixture {
    temp: TempDir,
    pending: Vec<(String, String)>,
}

impl RegistryFixture {
    /// Create a registry with only its `.nf-core.yml`, committed
    ///
    /// # Panics
    ///
    /// Panics if the repository cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let (temp, path) = create_git_repo();
        commit_files(
            &path,
            &[(
                ".nf-core.yml",
                &format!("repository_type: modules\norg_path: {FIXTURE_ORG}\n"),
            )],
            "Initial commit",
        );
        Self {
            temp,
            pending: Vec::new(),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// URL to pass as the registry remote
    ///
    /// # Panics
    ///
    /// Panics if the temp path is not valid UTF-8.
    #[must_use]
    pub fn url(&self) -> String {
        self.path().to_str().expect("temp path is utf-8").to_string()
    }

    /// Stage a file relative to the registry root
    pub fn file(&mut self, path: &str, content: &str) -> &mut Self {
        self.pending.push((path.to_string(), content.to_string()));
        self
    }

    /// Stage a module with a `main.nf` and a `meta.yml`
    pub fn add_module(&mut self, name: &str) -> &mut Self {
        let dir = format!("modules/{FIXTURE_ORG}/{name}");
        self.file(&format!("{dir}/main.nf"), &module_source(name))
            .file(&format!("{dir}/meta.yml"), &format!("name: {name}\n"))
    }

    /// Stage a subworkflow including the given components
    pub fn add_subworkflow(
        &mut self,
        name: &str,
        modules: &[&str],
        subworkflows: &[&str],
    ) -> &mut Self {
        let dir = format!("subworkflows/{FIXTURE_ORG}/{name}");
        self.file(
            &format!("{dir}/main.nf"),
            &subworkflow_source(name, modules, subworkflows),
        )
        .file(&format!("{dir}/meta.yml"), &format!("name: {name}\n"))
    }

    /// Commit everything staged so far
    ///
    /// # Panics
    ///
    /// Panics if the commit fails.
    pub fn commit(&mut self, message: &str) -> Oid {
        let files: Vec<(&str, &str)> = self
            .pending
            .iter()
            .map(|(path, content)| (path.as_str(), content.as_str()))
            .collect();
        let oid = commit_files(self.temp.path(), &files, message);
        self.pending.clear();
        oid
    }
}

impl RegistryFixture {
    /// Commit the current tip's tree onto `branch`, leaving HEAD where it is
    ///
    /// # Panics
    ///
    /// Panics if the commit fails.
    pub fn commit_on_branch(&self, branch: &str, message: &str) -> Oid {
        let repo = Repository::open(self.path()).expect("Failed to open repository");
        let head = repo
            .head()
            .and_then(|head| head.peel_to_commit())
            .expect("Failed to read HEAD");
        let tree = head.tree().expect("Failed to read tree");
        let signature = Signature::now("Graft Test", "test@example.com").expect("Failed to sign");
        repo.commit(
            Some(&format!("refs/heads/{branch}")),
            &signature,
            &signature,
            message,
            &tree,
            &[&head],
        )
        .expect("Failed to commit on branch")
    }
}

impl Default for RegistryFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Open a [`GitRegistry`](crate::registry::GitRegistry) on `fixture` with its clone under `cache`
///
/// # Panics
///
/// Panics if the registry cannot be opened.
#[must_use]
pub fn open_registry(fixture: &RegistryFixture, cache: &Path) -> crate::registry::GitRegistry {
    let settings = crate::registry::RegistrySettings {
        remote_url: fixture.url(),
        branch: None,
        no_pull: false,
    };
    crate::registry::GitRegistry::open_at(&settings, &cache.join("clone"))
        .expect("Failed to open fixture registry")
}

/// Registry wrapper whose `fetch_files` fails for the named components
pub struct FailingFetch<'a> {
    pub inner: &'a dyn crate::registry::Registry,
    pub failing: Vec<String>,
}

impl crate::registry::Registry for FailingFetch<'_> {
    fn remote_url(&self) -> &str {
        self.inner.remote_url()
    }

    fn repo_path(&self) -> &str {
        self.inner.repo_path()
    }

    fn branch(&self) -> &str {
        self.inner.branch()
    }

    fn available_components(
        &self,
        kind: crate::domain::ComponentKind,
    ) -> crate::error::Result<Vec<String>> {
        self.inner.available_components(kind)
    }

    fn resolve_latest(
        &self,
        component: &crate::domain::ComponentRef,
    ) -> crate::error::Result<crate::domain::Revision> {
        self.inner.resolve_latest(component)
    }

    fn component_versions(
        &self,
        component: &crate::domain::ComponentRef,
    ) -> crate::error::Result<Vec<crate::registry::RevisionInfo>> {
        self.inner.component_versions(component)
    }

    fn resolve_revision(
        &self,
        component: &crate::domain::ComponentRef,
        revision: &crate::domain::Revision,
    ) -> crate::error::Result<Option<crate::domain::Revision>> {
        self.inner.resolve_revision(component, revision)
    }

    fn fetch_files(
        &self,
        component: &crate::domain::ComponentRef,
        revision: &crate::domain::Revision,
    ) -> crate::error::Result<crate::registry::FileTree> {
        if self.failing.contains(&component.name) {
            return Err(crate::error::GraftError::GitOperationFailed {
                message: "object not found".to_string(),
            });
        }
        self.inner.fetch_files(component, revision)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_create_temp_dir() {
        let temp = create_temp_dir();
        assert!(temp.path().exists());
    }

    #[test]
    fn test_create_git_repo() {
        let (temp, path) = create_git_repo();
        assert!(path.join(".git").exists());
        assert!(temp.path().exists());
    }

    #[test]
    fn test_registry_fixture_commits_components() {
        let mut registry = RegistryFixture::new();
        registry
            .add_module("samtools/sort")
            .add_subworkflow("bam_sort", &["samtools/sort"], &[])
            .commit("add components");

        assert!(registry.path().join(".nf-core.yml").exists());
        assert!(registry
            .path()
            .join("modules/nf-core/samtools/sort/main.nf")
            .exists());

        let source = std::fs::read_to_string(
            registry.path().join("subworkflows/nf-core/bam_sort/main.nf"),
        )
        .expect("Failed to read");
        assert!(source.contains("include { SAMTOOLS_SORT } from '../../../modules/nf-core/samtools/sort/main'"));
    }
}
