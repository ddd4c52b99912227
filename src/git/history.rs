//! Reading component trees and history straight from the object database

use std::path::{Path, PathBuf};

use git2::{Commit, ObjectType, Oid, Repository, Sort, TreeWalkMode, TreeWalkResult};

use crate::error::{GraftError, Result};

const EXECUTABLE_MODE: i32 = 0o100_755;

/// A commit that changed a given path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    pub sha: String,
    pub summary: String,
    /// Seconds since the epoch
    pub time: i64,
}

/// A file read out of a tree, path relative to the tree it was read from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeFile {
    pub path: PathBuf,
    pub content: Vec<u8>,
    pub executable: bool,
}

/// Object id of `path` in `commit`, if present
pub fn path_id(commit: &Commit<'_>, path: &Path) -> Option<Oid> {
    commit.tree().ok()?.get_path(path).ok().map(|entry| entry.id())
}

/// Commits on the first-parent chain from `tip` that changed `path`, newest first.
///
/// A commit counts when the object at `path` differs from its first
/// parent's, which includes the commit that added it. Commits that
/// delete the path are skipped.
pub fn commits_touching(repo: &Repository, tip: &Commit<'_>, path: &Path) -> Result<Vec<CommitInfo>> {
    let mut walk = repo.revwalk()?;
    walk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
    walk.simplify_first_parent()?;
    walk.push(tip.id())?;

    let mut touching = Vec::new();
    for oid in walk {
        let commit = repo.find_commit(oid?)?;
        let Some(current) = path_id(&commit, path) else {
            continue;
        };
        let previous = commit.parent(0).ok().and_then(|p| path_id(&p, path));
        if previous != Some(current) {
            touching.push(CommitInfo {
                sha: commit.id().to_string(),
                summary: commit.summary().unwrap_or_default().to_string(),
                time: commit.time().seconds(),
            });
        }
    }
    Ok(touching)
}

/// All files below `path` in `commit`, with contents
pub fn read_tree(repo: &Repository, commit: &Commit<'_>, path: &Path) -> Result<Vec<TreeFile>> {
    let entry = commit.tree()?.get_path(path)?;
    let subtree = entry.to_object(repo)?.peel_to_tree()?;

    let mut files = Vec::new();
    let mut failure: Option<GraftError> = None;
    subtree.walk(TreeWalkMode::PreOrder, |dir, entry| {
        if entry.kind() != Some(ObjectType::Blob) {
            return TreeWalkResult::Ok;
        }
        let name = entry.name().unwrap_or_default();
        match repo.find_blob(entry.id()) {
            Ok(blob) => {
                files.push(TreeFile {
                    path: Path::new(dir).join(name),
                    content: blob.content().to_vec(),
                    executable: entry.filemode() == EXECUTABLE_MODE,
                });
                TreeWalkResult::Ok
            }
            Err(e) => {
                failure = Some(e.into());
                TreeWalkResult::Abort
            }
        }
    })?;

    match failure {
        Some(err) => Err(err),
        None => Ok(files),
    }
}

/// Paths of all files below `path` in `commit`, relative to `path`.
///
/// Returns an empty list when `path` does not exist.
pub fn list_files(repo: &Repository, commit: &Commit<'_>, path: &Path) -> Result<Vec<PathBuf>> {
    let entry = match commit.tree()?.get_path(path) {
        Ok(entry) if entry.kind() == Some(ObjectType::Tree) => entry,
        _ => return Ok(Vec::new()),
    };
    let subtree = entry.to_object(repo)?.peel_to_tree()?;

    let mut paths = Vec::new();
    subtree.walk(TreeWalkMode::PreOrder, |dir, entry| {
        if entry.kind() == Some(ObjectType::Blob) {
            paths.push(Path::new(dir).join(entry.name().unwrap_or_default()));
        }
        TreeWalkResult::Ok
    })?;
    Ok(paths)
}

/// Text content of the file at `path` in `commit`, if it exists
pub fn read_text(repo: &Repository, commit: &Commit<'_>, path: &Path) -> Result<Option<String>> {
    let Ok(entry) = commit.tree()?.get_path(path) else {
        return Ok(None);
    };
    let blob = repo.find_blob(entry.id())?;
    Ok(Some(String::from_utf8_lossy(blob.content()).into_owned()))
}
