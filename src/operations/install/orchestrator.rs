//! Main orchestrator for install operation
//! Drives one component install, recursing through its includes

use std::collections::{BTreeMap, BTreeSet};

use tracing::{debug, info, warn};

use super::display;
use crate::domain::{
    ComponentKind, ComponentRef, DependencyFailure, DependencyList, InstallOptions,
    InstallOutcome, InstallRequest, InstallSummary,
};
use crate::error::{GraftError, Result, registry as registry_error, workspace as workspace_error};
use crate::installer::{DependencyExtractor, InstallExecutor};
use crate::registry::Registry;
use crate::resolver::{Prompt, VersionResolver};
use crate::transaction::Transaction;
use crate::workspace::{LockfileStore, Pipeline};

/// Main orchestrator for install operation
pub struct InstallOperation<'a> {
    pipeline: Pipeline,
    store: LockfileStore,
    registry: &'a dyn Registry,
    prompt: &'a dyn Prompt,
    extractor: &'a dyn DependencyExtractor,
    executor: InstallExecutor,

    /// Components whose install is in progress, outermost first
    chain: Vec<ComponentRef>,
    /// Components whose files were written during this run
    materialized: BTreeSet<ComponentRef>,
    /// Registry listings, fetched once per kind
    available: BTreeMap<ComponentKind, Vec<String>>,
}

impl<'a> InstallOperation<'a> {
    /// Prepare an install into `pipeline`, loading its lockfile
    pub fn new(
        pipeline: Pipeline,
        registry: &'a dyn Registry,
        prompt: &'a dyn Prompt,
        extractor: &'a dyn DependencyExtractor,
    ) -> Result<Self> {
        let store = LockfileStore::load(&pipeline)?;
        Ok(Self {
            pipeline,
            store,
            registry,
            prompt,
            extractor,
            executor: InstallExecutor,
            chain: Vec::new(),
            materialized: BTreeSet::new(),
            available: BTreeMap::new(),
        })
    }

    pub fn store(&self) -> &LockfileStore {
        &self.store
    }

    /// Install a component and everything it includes.
    ///
    /// Repairs the lockfile first, then prints include guidance for the
    /// requested component once everything is in place.
    pub fn install(
        &mut self,
        kind: ComponentKind,
        name: Option<&str>,
        options: &InstallOptions,
    ) -> Result<InstallOutcome> {
        if !self.pipeline.root.is_dir() {
            return Err(workspace_error::invalid_root(
                self.pipeline.root.display().to_string(),
            ));
        }

        let report = self.store.check_consistency()?;
        if !report.is_clean() {
            info!(
                "Repaired modules.json: {} stale entries removed, {} untracked components found",
                report.dropped.len(),
                report.untracked.len()
            );
        }

        let request = InstallRequest::top_level(kind, name, options);
        let outcome = self.install_component(&request)?;

        if let InstallOutcome::Installed(summary) = &outcome {
            display::print_include_guidance(summary, &self.pipeline.root);
            display::print_dependency_failures(&summary.dependency_failures);
        }
        Ok(outcome)
    }

    fn install_component(&mut self, request: &InstallRequest) -> Result<InstallOutcome> {
        let name = self.verify_name(request)?;
        let component = self.registry.component(request.kind, &name);

        if self.chain.contains(&component) {
            let chain: Vec<&str> = self
                .chain
                .iter()
                .map(|c| c.name.as_str())
                .chain([component.name.as_str()])
                .collect();
            return Err(GraftError::CircularDependency {
                chain: chain.join(" -> "),
            });
        }

        let current = self.store.get_version(&component);
        let install_dir = component.install_dir(&self.pipeline.root);

        let version = VersionResolver::new(self.registry, self.prompt).resolve(
            &component,
            request.explicit_revision.as_ref(),
            current.as_ref(),
            request.interactive,
        )?;

        let installed = install_dir.is_dir() && current.is_some();
        let mut force = request.force && !self.materialized.contains(&component);
        if installed && !force {
            force = request.interactive
                && !self.materialized.contains(&component)
                && self.prompt.confirm_reinstall(&component)?;
        }

        if installed && !force {
            info!("{}", display::already_installed_hint(&component));
            debug!(
                "Adding '{}' as an installer of '{}' without reinstalling",
                request.installed_by, component
            );
            self.store.add_installer(&component, &request.installed_by);
            self.store.flush()?;
            return Ok(InstallOutcome::AlreadyInstalled(component));
        }

        let mut transaction = Transaction::new();
        let install_track = if installed {
            self.store.installers(&component)
        } else {
            None
        };
        if install_dir.exists() {
            info!("Removing installed version of '{}'", component);
            self.executor.remove(&install_dir, &mut transaction)?;
        }

        info!(
            "{}nstalling '{}'",
            if installed { "Rei" } else { "I" },
            component.name
        );
        debug!(
            "Installing {} '{}' at {} from {}",
            component.kind.label().to_lowercase(),
            component.name,
            version,
            self.registry.remote_url()
        );
        self.executor.materialize(
            self.registry,
            &component,
            &version,
            &install_dir,
            &mut transaction,
        )?;
        self.materialized.insert(component.clone());

        let dependency_failures = if component.kind.is_leaf() {
            Vec::new()
        } else {
            let dependencies = self.extractor.extract(&install_dir)?;
            self.chain.push(component.clone());
            let failures = self.install_dependencies(request, &component, &dependencies);
            self.chain.pop();
            failures
        };

        self.store.update_entry(
            &component,
            self.registry.branch(),
            &version,
            &request.installed_by,
            install_track.as_ref(),
        );
        self.store.flush()?;
        transaction.commit();

        Ok(InstallOutcome::Installed(InstallSummary {
            component,
            version,
            reinstalled: installed,
            dependency_failures,
        }))
    }

    /// Install every dependency on its own; failures are collected, never propagated
    fn install_dependencies(
        &mut self,
        request: &InstallRequest,
        parent: &ComponentRef,
        dependencies: &DependencyList,
    ) -> Vec<DependencyFailure> {
        let ordered = dependencies
            .subworkflows
            .iter()
            .map(|name| (ComponentKind::Subworkflow, name))
            .chain(
                dependencies
                    .modules
                    .iter()
                    .map(|name| (ComponentKind::Module, name)),
            );

        let mut failures = Vec::new();
        for (kind, name) in ordered {
            let dependency = request.dependency(kind, name, parent);
            match self.install_component(&dependency) {
                Ok(outcome) => failures.extend_from_slice(outcome.dependency_failures()),
                Err(e) => {
                    warn!(
                        "Could not install {} '{}' required by '{}': {}",
                        kind.label().to_lowercase(),
                        name,
                        parent.name,
                        e
                    );
                    failures.push(DependencyFailure {
                        kind,
                        name: name.clone(),
                        required_by: parent.name.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        failures
    }

    /// Normalize the requested name and check the registry publishes it
    fn verify_name(&mut self, request: &InstallRequest) -> Result<String> {
        let remote = self.registry.remote_url().to_string();
        if !self.available.contains_key(&request.kind) {
            let listed = self.registry.available_components(request.kind)?;
            self.available.insert(request.kind, listed);
        }
        let available: &[String] = self
            .available
            .get(&request.kind)
            .map_or(&[], Vec::as_slice);

        let name = match request.name.as_deref() {
            Some(name) => name.trim().trim_matches('/').to_string(),
            None => self
                .prompt
                .choose_component(request.kind, &remote, available)?,
        };

        if available.iter().any(|known| *known == name) {
            Ok(name)
        } else {
            Err(registry_error::name_resolution(
                request.kind.label(),
                name,
                remote,
            ))
        }
    }
}
