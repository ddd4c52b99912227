//! Registry configuration (`.nf-core.yml` at the registry root)

use serde::{Deserialize, Serialize};

use crate::error::{GraftError, Result};

/// Registry configuration filename
pub const REGISTRY_CONFIG_FILE: &str = ".nf-core.yml";

/// Settings a registry publishes about itself
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RegistryConfig {
    /// Organisation directory under `modules/` and `subworkflows/`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub org_path: Option<String>,

    /// `modules` for a component registry, `pipeline` for a pipeline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub repository_type: Option<String>,
}

impl RegistryConfig {
    /// Parse registry config from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| GraftError::ConfigParseFailed {
            path: REGISTRY_CONFIG_FILE.to_string(),
            reason: e.to_string(),
        })
    }
}

/// Derive the organisation path from a registry URL
/// (e.g. `https://github.com/nf-core/modules.git` -> `nf-core`)
pub fn org_path_from_url(url: &str) -> String {
    let url_clean = url.trim_end_matches('/').trim_end_matches(".git");
    let repo_path = match url_clean.find("://") {
        Some(idx) => &url_clean[idx + 3..],
        None => match url_clean.find(':') {
            Some(idx) if url_clean.starts_with("git@") => &url_clean[idx + 1..],
            _ => url_clean,
        },
    };
    let parts: Vec<&str> = repo_path.split(['/', '\\']).filter(|s| !s.is_empty()).collect();
    if parts.len() >= 2 {
        parts[parts.len() - 2].to_string()
    } else {
        "local".to_string()
    }
}
