//! Version resolution
//!
//! Decides which revision of a component to install: an explicit pin when
//! given, a picked one when the run is interactive and there is a real
//! choice, and the latest revision that touched the component otherwise.

pub mod prompt;

use tracing::debug;

use crate::domain::{ComponentRef, Revision};
use crate::error::{Result, registry as registry_error};
use crate::registry::Registry;

pub use prompt::{InquirePrompt, NonInteractive, Prompt};

pub struct VersionResolver<'a> {
    registry: &'a dyn Registry,
    prompt: &'a dyn Prompt,
}

impl<'a> VersionResolver<'a> {
    pub fn new(registry: &'a dyn Registry, prompt: &'a dyn Prompt) -> Self {
        Self { registry, prompt }
    }

    /// Resolve the revision to install for `component`
    pub fn resolve(
        &self,
        component: &ComponentRef,
        explicit: Option<&Revision>,
        current: Option<&Revision>,
        interactive: bool,
    ) -> Result<Revision> {
        if let Some(revision) = explicit {
            return match self.registry.resolve_revision(component, revision)? {
                Some(pinned) => {
                    debug!("Pinned '{}' to {}", component.name, pinned);
                    Ok(pinned)
                }
                None => Err(registry_error::invalid_revision(
                    &component.name,
                    revision.as_str(),
                    self.registry.remote_url(),
                )),
            };
        }

        let versions = self.registry.component_versions(component)?;
        let Some(latest) = versions.first() else {
            return Err(registry_error::name_resolution(
                component.kind.label(),
                &component.name,
                self.registry.remote_url(),
            ));
        };

        if interactive && versions.len() > 1 && current != Some(&latest.revision) {
            return self.prompt.choose_revision(component, &versions, current);
        }

        debug!("Latest revision of '{}' is {}", component.name, latest.revision);
        Ok(latest.revision.clone())
    }
}
