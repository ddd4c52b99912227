//! Dependency discovery from include statements
//!
//! A component's `main.nf` names what it depends on through lines like
//!
//! ```text
//! include { SAMTOOLS_STATS } from '../../../modules/nf-core/samtools/stats/main'
//! include { BAM_STATS      } from '../bam_stats/main'
//! ```
//!
//! Paths three levels up point at modules, anything else relative at
//! sibling subworkflows.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use regex::Regex;

use crate::domain::{ComponentKind, DependencyList};
use crate::error::{GraftError, Result, fs as fs_error};
use crate::workspace::consistency::MAIN_SCRIPT;

const INCLUDE_PATTERN: &str = r#"^\s*include\s*\{\s*([A-Za-z_0-9]+)(?:\s+as\s+[A-Za-z_0-9]+)?\s*\}\s*from\s*['"]([^'"]*)['"]"#;

const MODULE_PREFIX: &str = "../../../";
const SUBWORKFLOW_PREFIX: &str = "../";

pub trait DependencyExtractor {
    /// Components included by the `main.nf` in `source_dir`
    fn extract(&self, source_dir: &Path) -> Result<DependencyList>;
}

/// Line-by-line regex scan of include statements
#[derive(Debug, Clone)]
pub struct IncludeScanner {
    pattern: Regex,
}

impl IncludeScanner {
    pub fn new() -> Result<Self> {
        let pattern = Regex::new(INCLUDE_PATTERN).map_err(|e| GraftError::ScanFailed {
            path: MAIN_SCRIPT.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { pattern })
    }

    /// Scan source text; lines that are not well-formed includes are ignored
    pub fn scan(&self, source: &str) -> DependencyList {
        let mut dependencies = DependencyList::default();
        for line in source.lines() {
            let Some(captures) = self.pattern.captures(line) else {
                continue;
            };
            let (Some(symbol), Some(path)) = (captures.get(1), captures.get(2)) else {
                continue;
            };
            if let Some((kind, name)) = classify(symbol.as_str(), path.as_str()) {
                dependencies.push(kind, name);
            }
        }
        dependencies
    }
}

impl DependencyExtractor for IncludeScanner {
    fn extract(&self, source_dir: &Path) -> Result<DependencyList> {
        let main_script = source_dir.join(MAIN_SCRIPT);
        match fs::read_to_string(&main_script) {
            Ok(source) => Ok(self.scan(&source)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(DependencyList::default()),
            Err(e) => Err(fs_error::read_failed(
                main_script.display().to_string(),
                e.to_string(),
            )),
        }
    }
}

/// Map an included symbol and its path to a dependency
fn classify(symbol: &str, path: &str) -> Option<(ComponentKind, String)> {
    let symbol = symbol.to_lowercase();

    if let Some(rest) = path.strip_prefix(MODULE_PREFIX) {
        if !rest.starts_with("..") {
            let name = symbol
                .split('_')
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
                .join("/");
            return (!name.is_empty()).then_some((ComponentKind::Module, name));
        }
    }

    path.starts_with(SUBWORKFLOW_PREFIX)
        .then_some((ComponentKind::Subworkflow, symbol))
}
