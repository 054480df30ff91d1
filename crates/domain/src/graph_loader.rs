//! TOML-based loader feeding the external graph builder a concrete
//! `CompiledGraph` (§3's "AppfileCompiled").
//!
//! The real Appfile parser and dependency-graph builder are external
//! collaborators per the spec's scope; this module is the loadable shape a
//! standalone crate needs to be runnable and testable without one. Each
//! Appfile is a TOML file naming its own `dependencies` as paths (relative
//! to the file itself) to other Appfile TOML files; the loader follows
//! those paths, dedupes by vertex id, and assembles a `CompiledGraph`
//! rooted at the file passed in.

use crate::error::{Error, Result};
use crate::graph::{Appfile, Application, CompiledGraph, Project};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Deserialize)]
struct Manifest {
    id: String,
    application: Application,
    project: Project,
    #[serde(default)]
    dependencies: Vec<PathBuf>,
}

fn read_manifest(path: &Path) -> Result<Manifest> {
    let raw = std::fs::read_to_string(path)?;
    toml::from_str(&raw).map_err(|e| {
        Error::Other(format!("parsing Appfile '{}': {e}", path.display()))
    })
}

/// Load the Appfile at `root_path` and every Appfile it transitively
/// depends on (resolved relative to each file's own directory), returning
/// the assembled `CompiledGraph` rooted at `root_path`.
pub fn load_compiled_graph(root_path: &Path) -> Result<CompiledGraph> {
    let mut appfiles: HashMap<String, Appfile> = HashMap::new();
    let mut deps_of: HashMap<String, Vec<String>> = HashMap::new();

    let root_manifest = read_manifest(root_path)?;
    let root_id = root_manifest.id.clone();

    let mut queue: Vec<(PathBuf, Manifest)> = vec![(root_path.to_path_buf(), root_manifest)];
    while let Some((path, manifest)) = queue.pop() {
        if appfiles.contains_key(&manifest.id) {
            continue;
        }
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut dep_ids = Vec::with_capacity(manifest.dependencies.len());
        for dep_rel in &manifest.dependencies {
            let dep_path = dir.join(dep_rel);
            let dep_manifest = read_manifest(&dep_path)?;
            dep_ids.push(dep_manifest.id.clone());
            if !appfiles.contains_key(&dep_manifest.id) {
                queue.push((dep_path, dep_manifest));
            }
        }
        deps_of.insert(manifest.id.clone(), dep_ids);
        appfiles.insert(
            manifest.id.clone(),
            Appfile {
                id: manifest.id,
                application: manifest.application,
                project: manifest.project,
            },
        );
    }

    let root_file = appfiles
        .get(&root_id)
        .expect("root was just inserted above")
        .clone();
    let mut graph = CompiledGraph::new(root_file.clone());

    for (id, file) in &appfiles {
        if *id == root_id {
            continue;
        }
        graph.add_dependency(file.clone(), deps_of.get(id).cloned().unwrap_or_default());
    }
    // Re-assert the root's own dependency edges (`CompiledGraph::new` only
    // registers the vertex, not its edges).
    graph.add_dependency(root_file, deps_of.get(&root_id).cloned().unwrap_or_default());

    Ok(graph)
}
