//! Git-backed registry
//!
//! Keeps one bare clone per remote in the cache directory and reads
//! component trees directly from its object database; nothing is checked
//! out.

use std::fs;
use std::path::{Path, PathBuf};

use git2::{Commit, Repository};
use tracing::{debug, info};

use super::{FileTree, Registry, RevisionInfo, component_tree_path, paths};
use crate::config::RegistryConfig;
use crate::config::registry::{REGISTRY_CONFIG_FILE, org_path_from_url};
use crate::domain::{ComponentKind, ComponentRef, Revision};
use crate::error::{GraftError, Result, registry as registry_error};
use crate::git::{self, history};
use crate::progress::Spinner;
use crate::workspace::consistency::MAIN_SCRIPT;

/// How to reach a registry
#[derive(Debug, Clone)]
pub struct RegistrySettings {
    pub remote_url: String,
    /// Branch to install from; the remote's default branch when unset
    pub branch: Option<String>,
    /// Use the cached clone as is
    pub no_pull: bool,
}

pub struct GitRegistry {
    remote_url: String,
    repo_path: String,
    branch: String,
    repo: Repository,
}

impl GitRegistry {
    /// Open the registry through its clone in the cache directory
    pub fn open(settings: &RegistrySettings) -> Result<Self> {
        let clone_path = paths::registry_clone_path(&settings.remote_url)?;
        Self::open_at(settings, &clone_path)
    }

    /// Open the registry through a clone at `clone_path`, cloning it first if needed
    pub fn open_at(settings: &RegistrySettings, clone_path: &Path) -> Result<Self> {
        let url = settings.remote_url.as_str();

        let repo = if clone_path.exists() {
            let repo = git::open(clone_path)?;
            if settings.no_pull {
                debug!("Using cached registry at {} without fetching", clone_path.display());
            } else {
                let branch = match &settings.branch {
                    Some(branch) => branch.clone(),
                    None => git::default_branch(&repo)?,
                };
                let spinner = Spinner::start(format!("Fetching {url}"));
                git::fetch_branch(&repo, url, &branch)?;
                spinner.finish();
            }
            repo
        } else {
            clone_into(url, clone_path)?
        };

        let branch = match &settings.branch {
            Some(branch) => branch.clone(),
            None => git::default_branch(&repo)?,
        };

        let repo_path = {
            let tip = git::resolve_reference(&repo, &branch)?;
            read_repo_path(&repo, &tip, url)?
        };
        debug!("Registry {} on branch {} publishes under {}", url, branch, repo_path);

        Ok(Self {
            remote_url: url.to_string(),
            repo_path,
            branch,
            repo,
        })
    }

    fn tip(&self) -> Result<Commit<'_>> {
        git::resolve_reference(&self.repo, &self.branch)
    }
}

/// Clone into a staging directory next to `clone_path`, then move it into place
fn clone_into(url: &str, clone_path: &Path) -> Result<Repository> {
    let cache_error = |e: std::io::Error| GraftError::CacheOperationFailed {
        message: format!("Failed to prepare {}: {}", clone_path.display(), e),
    };

    let parent = clone_path.parent().unwrap_or(clone_path);
    fs::create_dir_all(parent).map_err(cache_error)?;
    let staging = tempfile::TempDir::new_in(parent).map_err(cache_error)?;
    let staged_repo: PathBuf = staging.path().join("repo");

    info!("Cloning registry {}", url);
    let spinner = Spinner::start(format!("Cloning {url}"));
    drop(git::clone_bare(url, &staged_repo)?);
    spinner.finish();

    fs::rename(&staged_repo, clone_path).map_err(cache_error)?;
    git::open(clone_path)
}

/// `org_path` from the registry's `.nf-core.yml`, else the URL owner
fn read_repo_path(repo: &Repository, tip: &Commit<'_>, url: &str) -> Result<String> {
    let config = match history::read_text(repo, tip, Path::new(REGISTRY_CONFIG_FILE))? {
        Some(yaml) => RegistryConfig::from_yaml(&yaml)?,
        None => RegistryConfig::default(),
    };
    Ok(config
        .org_path
        .filter(|org| !org.is_empty())
        .unwrap_or_else(|| org_path_from_url(url)))
}

impl Registry for GitRegistry {
    fn remote_url(&self) -> &str {
        &self.remote_url
    }

    fn repo_path(&self) -> &str {
        &self.repo_path
    }

    fn branch(&self) -> &str {
        &self.branch
    }

    fn available_components(&self, kind: ComponentKind) -> Result<Vec<String>> {
        let tip = self.tip()?;
        let base = format!("{}/{}", kind.dir_name(), self.repo_path);

        let mut dirs: Vec<String> = history::list_files(&self.repo, &tip, Path::new(&base))?
            .into_iter()
            .filter(|path| path.file_name().is_some_and(|name| name == MAIN_SCRIPT))
            .filter_map(|path| {
                let dir = path.parent()?;
                let segments: Vec<String> = dir
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect();
                (!segments.is_empty()).then(|| segments.join("/"))
            })
            .collect();
        dirs.sort();

        let mut names: Vec<String> = Vec::new();
        for dir in dirs {
            let nested = names
                .iter()
                .any(|outer| dir.starts_with(&format!("{outer}/")));
            if !nested {
                names.push(dir);
            }
        }
        Ok(names)
    }

    fn resolve_latest(&self, component: &ComponentRef) -> Result<Revision> {
        self.component_versions(component)?
            .into_iter()
            .next()
            .map(|info| info.revision)
            .ok_or_else(|| {
                registry_error::name_resolution(
                    component.kind.label(),
                    &component.name,
                    &self.remote_url,
                )
            })
    }

    fn component_versions(&self, component: &ComponentRef) -> Result<Vec<RevisionInfo>> {
        let tip = self.tip()?;
        let path = component_tree_path(component);
        Ok(history::commits_touching(&self.repo, &tip, Path::new(&path))?
            .into_iter()
            .map(|commit| RevisionInfo {
                revision: Revision::new(commit.sha),
                summary: commit.summary,
                time: commit.time,
            })
            .collect())
    }

    fn resolve_revision(
        &self,
        component: &ComponentRef,
        revision: &Revision,
    ) -> Result<Option<Revision>> {
        let Some(commit) = git::find_commit_by_sha(&self.repo, revision.as_str()) else {
            debug!("'{}' does not name a commit in {}", revision, self.remote_url);
            return Ok(None);
        };
        let tip = self.tip()?;
        if !git::is_on_branch(&self.repo, &tip, &commit)? {
            debug!("Commit {} is not on branch {}", commit.id(), self.branch);
            return Ok(None);
        }
        let path = component_tree_path(component);
        Ok(history::path_id(&commit, Path::new(&path))
            .map(|_| Revision::new(commit.id().to_string())))
    }

    fn fetch_files(&self, component: &ComponentRef, revision: &Revision) -> Result<FileTree> {
        let commit = git::resolve_reference(&self.repo, revision.as_str())?;
        let path = component_tree_path(component);
        history::read_tree(&self.repo, &commit, Path::new(&path))
    }
}
