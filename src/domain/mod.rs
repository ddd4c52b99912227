//! Domain models for Graft
//!
//! This module contains pure domain objects representing core business entities.
//! These types are free of I/O and carry the identity rules for components.

pub mod component;
pub mod install;

pub use component::{ComponentKind, ComponentRef, Revision};
pub use install::{
    DependencyFailure, DependencyList, InstallOptions, InstallOutcome, InstallRequest,
    InstallSummary,
};
