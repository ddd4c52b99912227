//! Git operations for the registry cache
//!
//! This module handles:
//! - Cloning registries (HTTPS, SSH and local paths) as bare repositories
//! - Fetching a branch to keep the cached clone current
//! - Resolving branches and SHAs to commits
//! - Reading component trees and history from the object database
//!
//! Authentication is delegated entirely to git's native system:
//! - SSH keys from ~/.ssh/
//! - Git credential helpers
//! - Environment variables (GIT_SSH_COMMAND, etc.)

pub mod auth;
pub mod history;
pub mod url;

use std::path::Path;

use git2::{ErrorClass, FetchOptions, Oid, RemoteCallbacks, Repository, build::RepoBuilder};
use tracing::debug;

use crate::error::{GraftError, Result, git as git_error};

pub use history::TreeFile;

/// Interpret a git2 error and provide a more user-friendly message
fn interpret_git_error(err: &git2::Error) -> String {
    let class = err.class();
    let message = err.message().to_lowercase();

    // More specific patterns first
    if message.contains("not found")
        || message.contains("404")
        || message.contains("too many redirects")
        || message.contains("authentication replays")
    {
        "Repository not found".to_string()
    } else if message.contains("authentication") || message.contains("credentials") {
        "Authentication failed".to_string()
    } else if message.contains("permission denied") || message.contains("access denied") {
        "Permission denied".to_string()
    } else if message.contains("connection")
        || message.contains("network")
        || message.contains("timeout")
        || message.contains("timed out")
    {
        "Network error".to_string()
    } else if class == ErrorClass::Http {
        format!("HTTP error: {}", err.message())
    } else if class == ErrorClass::Ssh {
        format!("SSH error: {}", err.message())
    } else {
        err.message().to_string()
    }
}

fn fetch_options<'a>() -> FetchOptions<'a> {
    let mut callbacks = RemoteCallbacks::new();
    auth::setup_auth_callbacks(&mut callbacks);

    let mut options = FetchOptions::new();
    options.remote_callbacks(callbacks);
    options
}

/// Clone a registry into `target` as a bare repository.
///
/// Full history is fetched: version listing walks the commit log.
pub fn clone_bare(url: &str, target: &Path) -> Result<Repository> {
    let mut builder = RepoBuilder::new();
    builder.bare(true);
    builder.fetch_options(fetch_options());

    let url_to_clone = url::normalize_ssh_url(url);
    debug!("Cloning {} into {}", url_to_clone, target.display());
    builder
        .clone(url_to_clone.as_ref(), target)
        .map_err(|e| git_error::clone_failed(url, interpret_git_error(&e)))
}

/// Fetch `branch` from `origin` into `refs/remotes/origin/<branch>`
pub fn fetch_branch(repo: &Repository, url: &str, branch: &str) -> Result<()> {
    let mut remote = repo
        .find_remote("origin")
        .or_else(|_| repo.remote_anonymous(&url::normalize_ssh_url(url)))
        .map_err(|e| git_error::fetch_failed(url, interpret_git_error(&e)))?;

    let refspec = format!("+refs/heads/{branch}:refs/remotes/origin/{branch}");
    let mut options = fetch_options();
    options.download_tags(git2::AutotagOption::None);

    remote
        .fetch(&[refspec.as_str()], Some(&mut options), None)
        .map_err(|e| git_error::fetch_failed(url, interpret_git_error(&e)))
}

/// Open an existing repository
pub fn open(path: &Path) -> Result<Repository> {
    Repository::open(path).map_err(|e| GraftError::GitOpenFailed {
        path: path.display().to_string(),
        reason: e.message().to_string(),
    })
}

/// Branch the remote's HEAD points at, falling back to the local HEAD
pub fn default_branch(repo: &Repository) -> Result<String> {
    if let Ok(reference) = repo.find_reference("refs/remotes/origin/HEAD") {
        if let Some(target) = reference.symbolic_target() {
            if let Some(branch) = target.strip_prefix("refs/remotes/origin/") {
                return Ok(branch.to_string());
            }
        }
    }

    let head = repo
        .find_reference("HEAD")
        .map_err(|e| git_error::ref_resolve_failed("HEAD", e.message()))?;
    head.symbolic_target()
        .and_then(|target| target.strip_prefix("refs/heads/"))
        .map(str::to_string)
        .ok_or_else(|| git_error::ref_resolve_failed("HEAD", "HEAD is not a branch"))
}

/// Shortest abbreviated SHA accepted, as in git
const MIN_SHA_LEN: usize = 4;

/// Commit named by a full or abbreviated SHA.
///
/// Only hex object ids match; branch names, tags and revspecs never do.
/// An ambiguous prefix matches nothing.
pub fn find_commit_by_sha<'a>(repo: &'a Repository, sha: &str) -> Option<git2::Commit<'a>> {
    let sha = sha.trim().to_ascii_lowercase();
    let is_hex = sha.chars().all(|c| c.is_ascii_hexdigit());
    if !is_hex || sha.len() < MIN_SHA_LEN || sha.len() > 40 {
        return None;
    }
    repo.find_commit_by_prefix(&sha).ok()
}

/// Whether `commit` is `tip` itself or reachable from it
pub fn is_on_branch(
    repo: &Repository,
    tip: &git2::Commit<'_>,
    commit: &git2::Commit<'_>,
) -> Result<bool> {
    if tip.id() == commit.id() {
        return Ok(true);
    }
    Ok(repo.graph_descendant_of(tip.id(), commit.id())?)
}

/// Resolve a branch name, full SHA or revspec to a commit
pub fn resolve_reference<'a>(repo: &'a Repository, refname: &str) -> Result<git2::Commit<'a>> {
    let ref_candidates = [
        format!("refs/remotes/origin/{refname}"),
        format!("refs/heads/{refname}"),
        format!("refs/tags/{refname}"),
    ];

    for candidate in &ref_candidates {
        if let Ok(reference) = repo.find_reference(candidate) {
            if let Ok(commit) = reference.peel_to_commit() {
                return Ok(commit);
            }
        }
    }

    if let Ok(oid) = Oid::from_str(refname) {
        if let Ok(commit) = repo.find_commit(oid) {
            return Ok(commit);
        }
    }

    if let Ok(obj) = repo.revparse_single(refname) {
        if let Ok(commit) = obj.peel_to_commit() {
            return Ok(commit);
        }
    }

    Err(git_error::ref_resolve_failed(
        refname,
        "Could not resolve reference",
    ))
}
