//! Install request and outcome types

use super::component::{ComponentKind, ComponentRef, Revision};

/// Caller-facing options for an install
#[derive(Debug, Clone, Default)]
pub struct InstallOptions {
    /// Remove and reinstall even when already installed
    pub force: bool,
    /// Allow prompts for revision choice and reinstall confirmation
    pub interactive: bool,
    /// Pin a revision instead of installing the latest one
    pub revision: Option<Revision>,
    /// Referrer recorded in the lockfile; defaults to the component type
    pub installed_by: Option<String>,
}

/// One install of one component.
///
/// Built per call, top-level or recursive. `installed_by` is fixed for the
/// lifetime of the request.
#[derive(Debug, Clone)]
pub struct InstallRequest {
    pub kind: ComponentKind,
    pub name: Option<String>,
    pub explicit_revision: Option<Revision>,
    pub force: bool,
    pub interactive: bool,
    pub installed_by: String,
}

impl InstallRequest {
    pub fn top_level(kind: ComponentKind, name: Option<&str>, options: &InstallOptions) -> Self {
        Self {
            kind,
            name: name.map(str::to_string),
            explicit_revision: options.revision.clone(),
            force: options.force,
            interactive: options.interactive,
            installed_by: options
                .installed_by
                .clone()
                .unwrap_or_else(|| kind.dir_name().to_string()),
        }
    }

    /// Request for a dependency discovered in `parent`'s sources
    pub fn dependency(&self, kind: ComponentKind, name: &str, parent: &ComponentRef) -> Self {
        Self {
            kind,
            name: Some(name.to_string()),
            explicit_revision: self.explicit_revision.clone(),
            force: self.force,
            interactive: self.interactive,
            installed_by: parent.name.clone(),
        }
    }
}

/// Result of a completed install request
#[derive(Debug, Clone)]
pub enum InstallOutcome {
    /// Files were materialized (fresh install or forced reinstall)
    Installed(InstallSummary),
    /// Already present and not forced; only the referrer was recorded
    AlreadyInstalled(ComponentRef),
}

impl InstallOutcome {
    pub fn component(&self) -> &ComponentRef {
        match self {
            InstallOutcome::Installed(summary) => &summary.component,
            InstallOutcome::AlreadyInstalled(component) => component,
        }
    }

    /// Failures collected anywhere below this component
    pub fn dependency_failures(&self) -> &[DependencyFailure] {
        match self {
            InstallOutcome::Installed(summary) => &summary.dependency_failures,
            InstallOutcome::AlreadyInstalled(_) => &[],
        }
    }
}

#[derive(Debug, Clone)]
pub struct InstallSummary {
    pub component: ComponentRef,
    pub version: Revision,
    pub reinstalled: bool,
    pub dependency_failures: Vec<DependencyFailure>,
}

/// A dependency that could not be installed; its parent was still installed
#[derive(Debug, Clone)]
pub struct DependencyFailure {
    pub kind: ComponentKind,
    pub name: String,
    pub required_by: String,
    pub reason: String,
}

/// Components referenced by one component's include statements
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DependencyList {
    pub modules: Vec<String>,
    pub subworkflows: Vec<String>,
}

impl DependencyList {
    /// Add a dependency unless already listed, keeping first-seen order
    pub fn push(&mut self, kind: ComponentKind, name: String) {
        let list = match kind {
            ComponentKind::Module => &mut self.modules,
            ComponentKind::Subworkflow => &mut self.subworkflows,
        };
        if !list.contains(&name) {
            list.push(name);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty() && self.subworkflows.is_empty()
    }
}
