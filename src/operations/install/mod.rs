//! Install operation submodules
//!
//! - [`orchestrator`]: the recursive install of one component
//! - [`display`]: include guidance and failure reporting

pub mod display;
pub mod orchestrator;

pub use orchestrator::InstallOperation;
