//! Cache path utilities for registry clones

use std::path::PathBuf;

use crate::error::{GraftError, Result};

/// Default cache directory name under user's cache directory
const CACHE_DIR: &str = "graft";

/// Registries subdirectory within cache
pub const REGISTRIES_DIR: &str = "registries";

/// Characters replaced with hyphens when a URL becomes a directory name
const PATH_UNSAFE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|', '@'];

/// Get the cache directory path
///
/// Uses the platform's standard cache location with a `graft` subdirectory.
/// Can be overridden with the `GRAFT_CACHE_DIR` environment variable.
pub fn cache_dir() -> Result<PathBuf> {
    if let Ok(cache_dir) = std::env::var("GRAFT_CACHE_DIR") {
        return Ok(PathBuf::from(cache_dir));
    }

    let base = dirs::cache_dir().ok_or_else(|| GraftError::CacheOperationFailed {
        message: "Could not determine cache directory".to_string(),
    })?;

    Ok(base.join(CACHE_DIR))
}

/// Where the bare clone of `url` lives (`<cache>/registries/<key>`)
pub fn registry_clone_path(url: &str) -> Result<PathBuf> {
    Ok(cache_dir()?.join(REGISTRIES_DIR).join(cache_key(url)))
}

/// Make a registry URL safe for use as one directory name.
///
/// Unsafe characters become hyphens, runs of hyphens collapse, and the
/// scheme separator and `.git` suffix are dropped. Returns "unknown" if
/// nothing is left.
pub fn cache_key(url: &str) -> String {
    let trimmed = url.trim_end_matches('/').trim_end_matches(".git");
    let trimmed = trimmed.split_once("://").map_or(trimmed, |(_, rest)| rest);

    let key: String = trimmed
        .chars()
        .map(|c| if PATH_UNSAFE_CHARS.contains(&c) { '-' } else { c })
        .collect();
    let key = key
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if key.is_empty() {
        "unknown".to_string()
    } else {
        key
    }
}
