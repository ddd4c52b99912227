//! Interactive choices made during an install
//!
//! Prompts sit behind [`Prompt`] so the install engine never talks to the
//! terminal directly. [`NonInteractive`] answers every question by failing
//! or declining.

use std::fmt;

use inquire::{Confirm, Select};

use crate::domain::{ComponentKind, ComponentRef, Revision};
use crate::error::{GraftError, Result, registry as registry_error};
use crate::registry::RevisionInfo;

pub trait Prompt {
    /// Pick one of `versions` (newest first) for `component`
    fn choose_revision(
        &self,
        component: &ComponentRef,
        versions: &[RevisionInfo],
        current: Option<&Revision>,
    ) -> Result<Revision>;

    /// Ask whether an already installed component should be reinstalled
    fn confirm_reinstall(&self, component: &ComponentRef) -> Result<bool>;

    /// Pick a component when none was named
    fn choose_component(
        &self,
        kind: ComponentKind,
        remote: &str,
        available: &[String],
    ) -> Result<String>;
}

/// Terminal prompts via `inquire`
#[derive(Debug, Default, Clone, Copy)]
pub struct InquirePrompt;

/// One row of the revision picker
struct RevisionChoice<'a> {
    info: &'a RevisionInfo,
    installed: bool,
}

impl fmt::Display for RevisionChoice<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}  {}", self.info.revision.short(), self.info.summary)?;
        if self.installed {
            write!(f, "  (installed)")?;
        }
        Ok(())
    }
}

impl Prompt for InquirePrompt {
    fn choose_revision(
        &self,
        component: &ComponentRef,
        versions: &[RevisionInfo],
        current: Option<&Revision>,
    ) -> Result<Revision> {
        let choices: Vec<RevisionChoice<'_>> = versions
            .iter()
            .map(|info| RevisionChoice {
                info,
                installed: current == Some(&info.revision),
            })
            .collect();

        let Some(choice) = Select::new(
            &format!("Select a version of '{}'", component.name),
            choices,
        )
        .with_starting_cursor(0)
        .with_page_size(10)
        .with_help_message("↑↓ to move, ENTER to select, ESC to cancel")
        .prompt_skippable()?
        else {
            return Err(GraftError::Cancelled);
        };

        Ok(choice.info.revision.clone())
    }

    fn confirm_reinstall(&self, component: &ComponentRef) -> Result<bool> {
        Ok(Confirm::new(&format!(
            "{} '{}' is already installed. Reinstall it?",
            component.kind.label(),
            component.name
        ))
        .with_default(false)
        .with_help_message("Reinstalling replaces the installed files")
        .prompt()?)
    }

    fn choose_component(
        &self,
        kind: ComponentKind,
        _remote: &str,
        available: &[String],
    ) -> Result<String> {
        let Some(name) = Select::new(
            &format!("{} name:", kind.label()),
            available.to_vec(),
        )
        .with_page_size(10)
        .with_help_message("Type to filter, ENTER to select, ESC to cancel")
        .prompt_skippable()?
        else {
            return Err(GraftError::Cancelled);
        };
        Ok(name)
    }
}

/// Answers for runs without a terminal
#[derive(Debug, Default, Clone, Copy)]
pub struct NonInteractive;

impl Prompt for NonInteractive {
    fn choose_revision(
        &self,
        component: &ComponentRef,
        _versions: &[RevisionInfo],
        _current: Option<&Revision>,
    ) -> Result<Revision> {
        Err(GraftError::AmbiguousRevision {
            name: component.name.clone(),
        })
    }

    fn confirm_reinstall(&self, _component: &ComponentRef) -> Result<bool> {
        Ok(false)
    }

    fn choose_component(
        &self,
        kind: ComponentKind,
        remote: &str,
        _available: &[String],
    ) -> Result<String> {
        Err(registry_error::name_resolution(kind.label(), "", remote))
    }
}
