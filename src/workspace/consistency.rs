//! Lockfile / filesystem reconciliation

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::warn;
use walkdir::WalkDir;

use crate::config::Lockfile;
use crate::domain::{ComponentKind, ComponentRef};
use crate::workspace::LOCAL_COMPONENTS_DIR;

/// Component entry script; a directory holding one is a component
pub const MAIN_SCRIPT: &str = "main.nf";

/// What reconciliation found
#[derive(Debug, Default)]
pub struct ConsistencyReport {
    /// Entries removed because their files are gone
    pub dropped: Vec<ComponentRef>,
    /// Component directories on disk with no lockfile entry
    pub untracked: Vec<PathBuf>,
}

impl ConsistencyReport {
    pub fn is_clean(&self) -> bool {
        self.dropped.is_empty() && self.untracked.is_empty()
    }
}

/// Drop entries without files and report untracked directories
pub fn reconcile(root: &Path, lockfile: &mut Lockfile) -> ConsistencyReport {
    let mut report = ConsistencyReport::default();

    for component in lockfile.components() {
        let dir = component.install_dir(root);
        if dir.is_dir() {
            continue;
        }
        warn!(
            "{} '{}' is in modules.json but {} is missing; removing its entry",
            component.kind.label(),
            component,
            dir.display()
        );
        lockfile.remove(&component);
        report.dropped.push(component);
    }

    let tracked: BTreeSet<PathBuf> = lockfile
        .components()
        .iter()
        .map(ComponentRef::relative_dir)
        .collect();

    for kind in [ComponentKind::Module, ComponentKind::Subworkflow] {
        for dir in component_dirs(root, kind) {
            let relative = dir.strip_prefix(root).unwrap_or(&dir).to_path_buf();
            if tracked.contains(&relative) {
                continue;
            }
            warn!(
                "{} directory {} is not tracked in modules.json",
                kind.label(),
                relative.display()
            );
            report.untracked.push(relative);
        }
    }

    report
}

/// Outermost directories under `<root>/<kind>/<repo_path>/` that contain a main script
fn component_dirs(root: &Path, kind: ComponentKind) -> Vec<PathBuf> {
    let base = root.join(kind.dir_name());
    let Ok(repos) = std::fs::read_dir(&base) else {
        return Vec::new();
    };

    let mut found = Vec::new();
    for repo in repos.filter_map(std::result::Result::ok) {
        if !repo.path().is_dir() || repo.file_name() == LOCAL_COMPONENTS_DIR {
            continue;
        }
        let mut dirs: Vec<PathBuf> = WalkDir::new(repo.path())
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_type().is_file() && e.file_name() == MAIN_SCRIPT)
            .filter_map(|e| e.path().parent().map(Path::to_path_buf))
            .collect();
        dirs.sort();
        for dir in dirs {
            if !found.iter().any(|outer: &PathBuf| dir.starts_with(outer)) {
                found.push(dir);
            }
        }
    }
    found
}
