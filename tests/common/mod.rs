//! Common test utilities for Graft integration tests

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use git2::{IndexAddOption, Oid, Repository, Signature};
use tempfile::TempDir;

/// Repo path published by every test registry
pub const ORG: &str = "nf-core";

/// A pipeline directory to install into
#[allow(dead_code)]
pub struct TestPipeline {
    pub temp: TempDir,
    /// Path to pipeline root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestPipeline {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Self { temp, path }
    }

    /// Write a file in the pipeline
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from the pipeline
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// Parsed `modules.json`
    pub fn lockfile(&self) -> serde_json::Value {
        serde_json::from_str(&self.read_file("modules.json")).expect("modules.json is valid JSON")
    }

    /// Lockfile entry of a component installed from `remote`
    pub fn entry(&self, remote: &str, kind: &str, name: &str) -> Option<serde_json::Value> {
        self.lockfile()
            .get("repos")?
            .get(remote)?
            .get(kind)?
            .get(ORG)?
            .get(name)
            .cloned()
    }

    /// Sorted `installed_by` of a lockfile entry
    pub fn installed_by(&self, remote: &str, kind: &str, name: &str) -> Vec<String> {
        let mut installers: Vec<String> = self
            .entry(remote, kind, name)
            .and_then(|entry| entry.get("installed_by").cloned())
            .and_then(|value| serde_json::from_value(value).ok())
            .unwrap_or_default();
        installers.sort();
        installers
    }

    pub fn git_sha(&self, remote: &str, kind: &str, name: &str) -> Option<String> {
        self.entry(remote, kind, name)?
            .get("git_sha")?
            .as_str()
            .map(str::to_string)
    }
}

/// A local git repository laid out as a component registry
#[allow(dead_code)]
pub struct TestRegistry {
    pub temp: TempDir,
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestRegistry {
    /// Create a registry with its `.nf-core.yml` committed
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = temp.path().to_path_buf();
        Repository::init(&path).expect("Failed to init registry");
        let registry = Self { temp, path };
        registry.commit(
            &[(
                ".nf-core.yml",
                &format!("repository_type: modules\norg_path: {ORG}\n"),
            )],
            "Initial commit",
        );
        registry
    }

    /// Remote URL to pass with `--git-remote`
    pub fn url(&self) -> String {
        self.path.to_str().expect("temp path is utf-8").to_string()
    }

    /// Write `files` and commit them
    pub fn commit(&self, files: &[(&str, &str)], message: &str) -> Oid {
        for (path, content) in files {
            let full_path = self.path.join(path);
            if let Some(parent) = full_path.parent() {
                std::fs::create_dir_all(parent).expect("Failed to create parent directory");
            }
            std::fs::write(&full_path, content).expect("Failed to write registry file");
        }

        let repo = Repository::open(&self.path).expect("Failed to open registry");
        let mut index = repo.index().expect("Failed to open index");
        index
            .add_all(["*"], IndexAddOption::DEFAULT, None)
            .expect("Failed to stage files");
        index.write().expect("Failed to write index");
        let tree = repo
            .find_tree(index.write_tree().expect("Failed to write tree"))
            .expect("Failed to find tree");
        let signature = Signature::now("Graft Test", "test@example.com").expect("Failed to sign");
        let parent = repo.head().ok().and_then(|head| head.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .expect("Failed to commit")
    }

    pub fn add_module(&self, name: &str) -> Oid {
        let symbol = name.replace('/', "_").to_uppercase();
        let dir = format!("modules/{ORG}/{name}");
        self.commit(
            &[
                (
                    &format!("{dir}/main.nf"),
                    &format!("process {symbol} {{\n    script:\n    \"echo {name}\"\n}}\n"),
                ),
                (&format!("{dir}/meta.yml"), &format!("name: {name}\n")),
            ],
            &format!("add module {name}"),
        )
    }

    pub fn add_subworkflow(&self, name: &str, modules: &[&str], subworkflows: &[&str]) -> Oid {
        let mut source = String::new();
        for module in modules {
            let symbol = module.replace('/', "_").to_uppercase();
            source.push_str(&format!(
                "include {{ {symbol} }} from '../../../modules/{ORG}/{module}/main'\n"
            ));
        }
        for subworkflow in subworkflows {
            source.push_str(&format!(
                "include {{ {} }} from '../{subworkflow}/main'\n",
                subworkflow.to_uppercase()
            ));
        }
        source.push_str(&format!("\nworkflow {} {{\n}}\n", name.to_uppercase()));

        let dir = format!("subworkflows/{ORG}/{name}");
        self.commit(
            &[
                (&format!("{dir}/main.nf"), &source),
                (&format!("{dir}/meta.yml"), &format!("name: {name}\n")),
            ],
            &format!("add subworkflow {name}"),
        )
    }

    /// Registry with `bam_stats_samtools` and its three samtools modules
    pub fn bam_stats() -> Self {
        let registry = Self::new();
        for module in ["samtools/stats", "samtools/idxstats", "samtools/flagstat"] {
            registry.add_module(module);
        }
        registry.add_subworkflow(
            "bam_stats_samtools",
            &["samtools/stats", "samtools/idxstats", "samtools/flagstat"],
            &[],
        );
        registry
    }
}

/// `graft` against `registry` with an isolated cache, run inside `pipeline`
#[allow(deprecated)]
pub fn graft_cmd(pipeline: &Path, registry: &TestRegistry, cache: &Path) -> Command {
    let mut cmd = Command::cargo_bin("graft").expect("graft binary is built");
    // Ignore any developer overrides
    for var in ["GRAFT_DIR", "GRAFT_REMOTE", "GRAFT_BRANCH", "RUST_LOG"] {
        cmd.env_remove(var);
    }
    cmd.env("GRAFT_CACHE_DIR", cache)
        .current_dir(pipeline)
        .args(["--git-remote", &registry.url()]);
    cmd
}
