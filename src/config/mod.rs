//! Configuration file handling for Graft
//!
//! This module contains data structures for:
//! - `modules.json` - Lockfile with installed component versions and referrers
//! - `.nf-core.yml` - Registry-side configuration (repository organisation path)

pub mod lockfile;
pub mod registry;

// Re-export commonly used types
pub use lockfile::Lockfile;
pub use registry::RegistryConfig;
