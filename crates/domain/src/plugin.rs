//! The contracts every app and infrastructure implementation must honor.
//!
//! App and infra implementations are modeled as capability sets — trait
//! objects satisfying a small fixed interface — discovered through explicit
//! factory maps keyed by [`Tuple`] or infra type name (see `orch-core`'s
//! `Registry`), never through reflection or a global registry.

use crate::error::Result;
use crate::graph::{Appfile, Application, InfrastructureConfig, Tuple};
use crate::ui::Ui;
use crate::dirbackend::DirectoryBackend;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Services shared across every per-vertex context: the opaque directory
/// backend and the UI. Passed explicitly — no ambient singletons.
#[derive(Clone)]
pub struct Shared {
    pub directory: Arc<dyn DirectoryBackend>,
    pub ui: Arc<dyn Ui>,
}

/// Per-vertex context handed to an app implementation.
///
/// Constructed fresh for every task; `dev_dep_fragments` is populated only
/// for the root vertex during `Compile`, after all dependencies finish.
#[derive(Clone)]
pub struct AppContext {
    pub dir: PathBuf,
    pub cache_dir: PathBuf,
    pub tuple: Tuple,
    pub appfile: Arc<Appfile>,
    pub application: Arc<Application>,
    pub action: Option<String>,
    pub action_args: Vec<String>,
    pub dev_dep_fragments: Vec<String>,
    pub shared: Shared,
}

/// Context handed to an infrastructure implementation.
#[derive(Clone)]
pub struct InfraContext {
    pub dir: PathBuf,
    pub infra: InfrastructureConfig,
    pub shared: Shared,
    pub action: Option<String>,
    pub action_args: Vec<String>,
    pub infra_creds: HashMap<String, String>,
}

/// The result of an app's or infra's `Compile` call.
#[derive(Debug, Clone, Default)]
pub struct CompileResult {
    /// Path to a provisioning-script fragment this vertex contributes to the
    /// root's dev environment, if any.
    pub dev_dep_fragment_path: Option<String>,
}

/// A prebuilt artifact associated with a dependency vertex, cached on disk
/// and consumed by the root when composing the dev environment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct DevDep {
    pub files: Vec<PathBuf>,
}

impl DevDep {
    /// Rewrite `files` to be relative to `cache_dir`, failing if any entry
    /// isn't actually rooted under it.
    pub fn rel_files(&self, cache_dir: &Path) -> Result<DevDep> {
        let mut files = Vec::with_capacity(self.files.len());
        for f in &self.files {
            let rel = if f.is_absolute() {
                f.strip_prefix(cache_dir).map_err(|_| {
                    crate::error::Error::Other(format!(
                        "dev-dep file '{}' is not under cache dir '{}'",
                        f.display(),
                        cache_dir.display()
                    ))
                })?
            } else {
                f.as_path()
            };
            files.push(rel.to_path_buf());
        }
        Ok(DevDep { files })
    }

    pub fn write_dev_dep(&self, cache_dir: &Path) -> Result<()> {
        let path = cache_dir.join("dev-dep.json");
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn read_dev_dep(cache_dir: &Path) -> Result<DevDep> {
        let path = cache_dir.join("dev-dep.json");
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Capability set an application implementation must provide.
pub trait App: Send + Sync {
    fn compile(&self, ctx: &AppContext) -> Result<CompileResult>;
    fn build(&self, ctx: &AppContext) -> Result<()>;
    fn dev(&self, ctx: &AppContext) -> Result<()>;
    fn dev_dep(&self, root_ctx: &AppContext, dep_ctx: &AppContext) -> Result<DevDep>;
}

/// Capability set an infrastructure implementation must provide.
pub trait Infra: Send + Sync {
    fn compile(&self, ctx: &InfraContext) -> Result<CompileResult>;
    fn execute(&self, ctx: &InfraContext) -> Result<()>;
    fn creds(&self, ctx: &InfraContext) -> Result<HashMap<String, String>>;
}

/// Constructs a fresh `App` instance for one tuple. Factory failure is
/// surfaced by the registry as `AppStartFailed`.
pub type AppFactory = Arc<dyn Fn() -> Result<Arc<dyn App>> + Send + Sync>;

/// Constructs a fresh `Infra` instance for one infra type.
pub type InfraFactory = Arc<dyn Fn() -> Result<Arc<dyn Infra>> + Send + Sync>;

/// The lifecycle task `Execute` dispatches on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecuteTask {
    Dev,
    Infra,
    /// A target name the caller asked for that isn't `dev` or `infra`.
    /// Carries the offending name so `Core::execute` can surface
    /// `Error::UnknownTask` instead of silently refusing to dispatch.
    Unknown(String),
}

/// Options for `Execute`.
#[derive(Debug, Clone)]
pub struct ExecuteOpts {
    pub task: ExecuteTask,
    pub action: String,
    pub args: Vec<String>,
}
