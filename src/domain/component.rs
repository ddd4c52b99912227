//! Component identity types
//!
//! A component is either a module (a leaf wrapping one tool) or a subworkflow
//! (which includes modules and other subworkflows).

use std::fmt;
use std::path::{Path, PathBuf};

/// The two kinds of installable components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ComponentKind {
    Module,
    Subworkflow,
}

impl ComponentKind {
    /// Directory name used both in the registry and in the pipeline (`modules`, `subworkflows`)
    pub fn dir_name(self) -> &'static str {
        match self {
            ComponentKind::Module => "modules",
            ComponentKind::Subworkflow => "subworkflows",
        }
    }

    /// Singular, capitalized label for messages
    pub fn label(self) -> &'static str {
        match self {
            ComponentKind::Module => "Module",
            ComponentKind::Subworkflow => "Subworkflow",
        }
    }

    /// Modules never include other components
    pub fn is_leaf(self) -> bool {
        matches!(self, ComponentKind::Module)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// A pinned version of a component's files (a git commit SHA)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Revision(String);

impl Revision {
    pub fn new(sha: impl Into<String>) -> Self {
        Self(sha.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// First seven characters, as shown in prompts and logs
    pub fn short(&self) -> &str {
        self.0.get(..7).unwrap_or(&self.0)
    }
}

impl fmt::Display for Revision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Revision {
    fn from(sha: &str) -> Self {
        Self(sha.to_string())
    }
}

/// Identifies a component uniquely within a registry.
///
/// Identity is the full `(remote_url, repo_path, kind, name)` tuple so that
/// components with the same name from different registries never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentRef {
    pub kind: ComponentKind,
    pub name: String,
    pub repo_path: String,
    pub remote_url: String,
}

impl ComponentRef {
    pub fn new(
        kind: ComponentKind,
        name: impl Into<String>,
        repo_path: impl Into<String>,
        remote_url: impl Into<String>,
    ) -> Self {
        Self {
            kind,
            name: name.into(),
            repo_path: repo_path.into(),
            remote_url: remote_url.into(),
        }
    }

    /// Path of the component relative to a registry or pipeline root,
    /// e.g. `modules/nf-core/samtools/flagstat`
    pub fn relative_dir(&self) -> PathBuf {
        let mut path = PathBuf::from(self.kind.dir_name());
        path.push(&self.repo_path);
        for segment in self.name.split('/') {
            path.push(segment);
        }
        path
    }

    /// Directory the component occupies inside a pipeline
    pub fn install_dir(&self, pipeline_root: &Path) -> PathBuf {
        pipeline_root.join(self.relative_dir())
    }

    /// Same registry, different component
    pub fn sibling(&self, kind: ComponentKind, name: impl Into<String>) -> Self {
        Self::new(kind, name, self.repo_path.clone(), self.remote_url.clone())
    }

    /// Include symbol used in pipeline sources, e.g. `SAMTOOLS_FLAGSTAT`
    pub fn include_symbol(&self) -> String {
        self.name.replace('/', "_").to_uppercase()
    }
}

impl fmt::Display for ComponentRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.repo_path, self.name)
    }
}
