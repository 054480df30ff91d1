//! `serialorch.toml` — the configuration driving the CLI front-end.
//!
//! This is the concrete, loadable shape behind the directories Core's
//! `Layout` derives paths from, and the path to the Appfile graph the
//! external parser (stood in, for this crate, by a TOML loader) produces.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

fn d_data_dir() -> PathBuf {
    PathBuf::from(".orch/data")
}

fn d_local_dir() -> PathBuf {
    PathBuf::from(".orch/local")
}

fn d_compile_dir() -> PathBuf {
    PathBuf::from(".orch/compile")
}

fn d_appfile() -> PathBuf {
    PathBuf::from("Appfile.toml")
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Root of the workspace; directories below default relative to it.
    #[serde(default = "d_appfile")]
    pub appfile: PathBuf,
    #[serde(default = "d_data_dir")]
    pub data_dir: PathBuf,
    #[serde(default = "d_local_dir")]
    pub local_dir: PathBuf,
    #[serde(default = "d_compile_dir")]
    pub compile_dir: PathBuf,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            appfile: d_appfile(),
            data_dir: d_data_dir(),
            local_dir: d_local_dir(),
            compile_dir: d_compile_dir(),
        }
    }
}

/// A single diagnostic issue surfaced by `config validate` / `doctor`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    pub severity: ConfigSeverity,
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSeverity {
    Warning,
    Error,
}

impl std::fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let tag = match self.severity {
            ConfigSeverity::Warning => "warning",
            ConfigSeverity::Error => "error",
        };
        write!(f, "[{tag}] {}", self.message)
    }
}

impl WorkspaceConfig {
    /// Sanity-check the configuration without touching disk beyond what the
    /// caller already loaded.
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();
        if self.data_dir == self.compile_dir {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Error,
                message: "data_dir and compile_dir must not be the same path \
                          (compile_dir is fully erased on every Compile)"
                    .to_string(),
            });
        }
        if self.local_dir == self.compile_dir {
            issues.push(ConfigIssue {
                severity: ConfigSeverity::Error,
                message: "local_dir and compile_dir must not be the same path".to_string(),
            });
        }
        issues
    }
}
