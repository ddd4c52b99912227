//! Operations module for installing components
//!
//! This module provides high-level operations that coordinate:
//! - InstallOperation: Complete installation workflow
//!
//! The operations coordinate with:
//! - Registry: Component listings, versions and files (from registry module)
//! - Resolver: Version choice (from resolver module)
//! - Installer: File materialization and include scanning (from installer module)
//! - Workspace: Lockfile store (from workspace module)
//! - Transaction: Rollback on error (from transaction module)

pub mod install;

pub use install::InstallOperation;
