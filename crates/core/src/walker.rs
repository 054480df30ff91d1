//! Fail-fast parallel traversal of the compiled Appfile graph (§4.5, §5).
//!
//! Vertices are processed in topological layers (everything whose
//! dependencies have already completed), with `rayon` fanning out within a
//! layer. A single `AtomicBool` stop flag and `parking_lot::Mutex`-guarded
//! first error implement the fail-fast contract: once any vertex's callback
//! errors, later callbacks on concurrent branches observe the flag and
//! return immediately instead of doing work.

use crate::context::ContextBuilder;
use crate::registry::Registry;
use orch_domain::error::{Error, Result};
use orch_domain::graph::CompiledGraph;
use orch_domain::plugin::App;
use orch_domain::trace::TraceEvent;
use parking_lot::Mutex;
use rayon::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Callback invoked once per vertex, in dependency order. `is_root` is true
/// exactly for the graph's root vertex, which is always visited last.
pub type VertexCallback<'a> =
    dyn Fn(Arc<dyn App>, &orch_domain::plugin::AppContext, bool) -> Result<()> + Sync + 'a;

pub struct GraphWalker<'a> {
    graph: &'a CompiledGraph,
    registry: &'a Registry,
    contexts: &'a ContextBuilder,
}

impl<'a> GraphWalker<'a> {
    pub fn new(graph: &'a CompiledGraph, registry: &'a Registry, contexts: &'a ContextBuilder) -> Self {
        Self {
            graph,
            registry,
            contexts,
        }
    }

    /// Walk the graph, invoking `callback` for each vertex once its
    /// dependencies have completed. Returns the first error raised by any
    /// callback, if any.
    pub fn walk(&self, callback: &VertexCallback<'_>) -> Result<()> {
        if self.graph.root().is_none() {
            return Err(Error::RootNotFound);
        }
        let root_id = self.graph.root_id().to_string();

        let mut remaining: HashMap<String, usize> = HashMap::new();
        let mut dependents: HashMap<String, Vec<String>> = HashMap::new();
        for id in self.graph.vertex_ids() {
            let deps = self.graph.dependencies_of(id);
            remaining.insert(id.clone(), deps.len());
            for dep in deps {
                dependents.entry(dep.clone()).or_default().push(id.clone());
            }
        }

        let stopped = AtomicBool::new(false);
        let first_error: Mutex<Option<Error>> = Mutex::new(None);

        let mut layer: Vec<String> = remaining
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(id, _)| id.clone())
            .collect();

        while !layer.is_empty() {
            layer.par_iter().for_each(|id| {
                if stopped.load(Ordering::SeqCst) {
                    return;
                }
                let is_root = *id == root_id;
                if let Err(e) = self.visit(id, is_root, callback) {
                    stopped.store(true, Ordering::SeqCst);
                    TraceEvent::WalkFailed {
                        id: id.clone(),
                        message: e.to_string(),
                    }
                    .emit();
                    let mut slot = first_error.lock();
                    if slot.is_none() {
                        *slot = Some(e);
                    }
                }
            });

            let mut next_layer = Vec::new();
            for id in &layer {
                if let Some(deps) = dependents.get(id) {
                    for dependent in deps {
                        if let Some(count) = remaining.get_mut(dependent) {
                            *count -= 1;
                            if *count == 0 {
                                next_layer.push(dependent.clone());
                            }
                        }
                    }
                }
            }
            layer = next_layer;
        }

        match first_error.into_inner() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    fn visit(&self, id: &str, is_root: bool, callback: &VertexCallback<'_>) -> Result<()> {
        let file = self
            .graph
            .get(id)
            .ok_or_else(|| Error::Other(format!("vertex '{id}' vanished mid-walk")))?;

        let ctx = self
            .contexts
            .build_app_context(file, is_root)
            .map_err(|e| Error::VertexContext {
                name: id.to_string(),
                message: e.to_string(),
            })?;

        let app = self
            .registry
            .resolve_app(&ctx.tuple)
            .map_err(|e| Error::VertexResolve {
                name: id.to_string(),
                message: e.to_string(),
            })?;

        callback(app, &ctx, is_root)
    }
}
