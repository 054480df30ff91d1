//! Top-level orchestrator: `Compile`, `Build`, `Dev`, `Execute` (§4.6).

use crate::context::ContextBuilder;
use crate::creds::CredentialStore;
use crate::layout::Layout;
use crate::registry::Registry;
use crate::walker::GraphWalker;
use orch_domain::error::{Error, Result};
use orch_domain::graph::{Appfile, CompiledGraph};
use orch_domain::plugin::{DevDep, ExecuteOpts, ExecuteTask, Shared};
use orch_domain::trace::TraceEvent;
use parking_lot::Mutex;

/// Owns a compiled Appfile graph for the duration of one session and
/// coordinates layout, credentials, plugin resolution, and graph traversal
/// against it. Immutable after construction.
pub struct Core {
    graph: CompiledGraph,
    registry: Registry,
    layout: Layout,
    contexts: ContextBuilder,
    shared: Shared,
}

impl Core {
    pub fn new(graph: CompiledGraph, registry: Registry, layout: Layout, shared: Shared) -> Self {
        let contexts = ContextBuilder::new(layout.clone(), shared.clone());
        Self {
            graph,
            registry,
            layout,
            contexts,
            shared,
        }
    }

    fn root(&self) -> Result<&Appfile> {
        self.graph.root().ok_or(Error::RootNotFound)
    }

    /// Erase `compileDir`, run the infrastructure's `Compile`, then walk the
    /// graph compiling every dependency before the root. The root sees every
    /// dependency's non-empty fragment path, sorted by vertex id.
    pub fn compile(&self) -> Result<()> {
        let root_file = self.root()?;
        let infra = self.registry.resolve_infra(&root_file.project.infrastructure)?;
        let infra_ctx = self.contexts.build_infra_context(root_file)?;

        self.layout.clear_compile_dir()?;
        TraceEvent::CompileDirCleared {
            path: self.layout.compile_dir.display().to_string(),
        }
        .emit();

        infra.compile(&infra_ctx)?;

        let fragments: Mutex<Vec<(String, String)>> = Mutex::new(Vec::new());
        let walker = GraphWalker::new(&self.graph, &self.registry, &self.contexts);

        walker.walk(&|app, ctx, is_root| {
            if is_root {
                self.shared.ui.message("Compiling main application...");
            } else {
                self.shared
                    .ui
                    .message(&format!("Compiling dependency '{}'...", ctx.appfile.id()));
            }

            let mut ctx = ctx.clone();
            if is_root {
                let mut snapshot: Vec<(String, String)> = fragments.lock().clone();
                snapshot.sort_by(|a, b| a.0.cmp(&b.0));
                ctx.dev_dep_fragments = snapshot.into_iter().map(|(_, path)| path).collect();
            }

            let result = app.compile(&ctx)?;
            if let Some(path) = &result.dev_dep_fragment_path {
                fragments.lock().push((ctx.appfile.id().to_string(), path.clone()));
            }

            TraceEvent::VertexCompiled {
                id: ctx.appfile.id().to_string(),
                is_root,
                fragment_path: result.dev_dep_fragment_path.clone(),
            }
            .emit();

            Ok(())
        })
    }

    /// Resolve the root app and call `Build`. Assumes `Compile` has already
    /// populated `compileDir` — does not re-walk dependencies.
    pub fn build(&self) -> Result<()> {
        let root_file = self.root()?;
        let infra = self.registry.resolve_infra(&root_file.project.infrastructure)?;
        let mut infra_ctx = self.contexts.build_infra_context(root_file)?;

        CredentialStore::ensure(
            &self.layout.creds_path(),
            &self.layout.local_dir,
            infra.as_ref(),
            &mut infra_ctx,
            self.shared.ui.as_ref(),
        )?;

        let root_ctx = self.contexts.build_app_context(root_file, true)?;
        let app = self.registry.resolve_app(&root_ctx.tuple)?;
        app.build(&root_ctx)
    }

    /// Walk dependencies producing/caching each one's dev-dep artifact, then
    /// bring up the root's dev environment.
    pub fn dev(&self) -> Result<()> {
        let root_file = self.root()?;
        let root_ctx = self.contexts.build_app_context(root_file, true)?;
        let root_app = self.registry.resolve_app(&root_ctx.tuple)?;

        let walker = GraphWalker::new(&self.graph, &self.registry, &self.contexts);
        walker.walk(&|app, ctx, is_root| {
            if is_root {
                return Ok(());
            }

            let id = ctx.appfile.id().to_string();
            if DevDep::read_dev_dep(&ctx.cache_dir).is_ok() {
                TraceEvent::DevDepCacheHit { id }.emit();
                return Ok(());
            }

            let dep = app
                .dev_dep(&root_ctx, ctx)
                .map_err(|e| Error::DevDepBuildFailed {
                    name: id.clone(),
                    message: e.to_string(),
                })?;

            if !dep.files.is_empty() {
                let rel = dep
                    .rel_files(&ctx.cache_dir)
                    .map_err(|e| Error::DevDepBuildFailed {
                        name: id.clone(),
                        message: e.to_string(),
                    })?;
                rel.write_dev_dep(&ctx.cache_dir)
                    .map_err(|e| Error::DevDepBuildFailed {
                        name: id.clone(),
                        message: e.to_string(),
                    })?;
                TraceEvent::DevDepBuilt {
                    id,
                    file_count: rel.files.len(),
                }
                .emit();
            }

            Ok(())
        })?;

        root_app.dev(&root_ctx)
    }

    /// Dispatch a lifecycle action against either the root app or the infra.
    pub fn execute(&self, opts: ExecuteOpts) -> Result<()> {
        let root_file = self.root()?;
        match opts.task {
            ExecuteTask::Dev => {
                let mut ctx = self.contexts.build_app_context(root_file, true)?;
                ctx.action = Some(opts.action);
                ctx.action_args = opts.args;
                let app = self.registry.resolve_app(&ctx.tuple)?;
                app.dev(&ctx)
            }
            ExecuteTask::Infra => {
                let infra = self.registry.resolve_infra(&root_file.project.infrastructure)?;
                let mut ctx = self.contexts.build_infra_context(root_file)?;
                ctx.action = Some(opts.action);
                ctx.action_args = opts.args;
                infra.execute(&ctx)
            }
            ExecuteTask::Unknown(name) => Err(Error::UnknownTask(name)),
        }
    }
}
