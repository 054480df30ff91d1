//! The compiled Appfile dependency graph.
//!
//! This module owns the data Core treats as "external": the parsed Appfile
//! values and the rooted DAG connecting them. The real parser and
//! topological-scheduling algorithm live outside this crate (a project's
//! graph-builder); what's here is the concrete shape Core compiles against,
//! loaded directly from TOML for the CLI and for tests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// `(application-type, infrastructure-type, infrastructure-flavor)` — the
/// registry key selecting an app implementation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tuple {
    pub app_type: String,
    pub infra_type: String,
    pub infra_flavor: String,
}

impl Tuple {
    pub fn new(
        app_type: impl Into<String>,
        infra_type: impl Into<String>,
        infra_flavor: impl Into<String>,
    ) -> Self {
        Self {
            app_type: app_type.into(),
            infra_type: infra_type.into(),
            infra_flavor: infra_flavor.into(),
        }
    }
}

/// The active infrastructure configuration for one Appfile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InfrastructureConfig {
    pub flavor: String,
    #[serde(default)]
    pub config: HashMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Application {
    pub name: String,
    #[serde(rename = "type")]
    pub app_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub infrastructure: String,
    /// Flavor-keyed infrastructure configs; `active` names which one is live.
    #[serde(default)]
    pub infrastructures: HashMap<String, InfrastructureConfig>,
    #[serde(default)]
    pub active: Option<String>,
}

/// A single vertex's project description.
///
/// Two Appfiles are "the same vertex" iff their `id` matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appfile {
    pub id: String,
    pub application: Application,
    pub project: Project,
}

impl Appfile {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The active infrastructure config, or `None` if the project names no
    /// active flavor (or names one that isn't present in `infrastructures`).
    pub fn active_infrastructure(&self) -> Option<&InfrastructureConfig> {
        let key = self.project.active.as_ref()?;
        self.project.infrastructures.get(key)
    }
}

/// A rooted DAG of [`Appfile`]s, with dependency edges pointing from a
/// vertex to the vertices it depends on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompiledGraph {
    root_id: String,
    vertices: HashMap<String, Appfile>,
    /// vertex id -> ids of vertices it depends on.
    edges: HashMap<String, Vec<String>>,
}

impl CompiledGraph {
    pub fn new(root: Appfile) -> Self {
        let root_id = root.id.clone();
        let mut vertices = HashMap::new();
        vertices.insert(root_id.clone(), root);
        Self {
            root_id,
            vertices,
            edges: HashMap::new(),
        }
    }

    /// Add a dependency vertex. `depends_on` names the vertex ids (already
    /// present in the graph) that `file` depends on — empty for a leaf.
    pub fn add_dependency(&mut self, file: Appfile, depends_on: Vec<String>) {
        let id = file.id.clone();
        self.vertices.insert(id.clone(), file);
        self.edges.insert(id, depends_on);
    }

    pub fn root_id(&self) -> &str {
        &self.root_id
    }

    pub fn root(&self) -> Option<&Appfile> {
        self.vertices.get(&self.root_id)
    }

    pub fn get(&self, id: &str) -> Option<&Appfile> {
        self.vertices.get(id)
    }

    pub fn is_root(&self, id: &str) -> bool {
        id == self.root_id
    }

    pub fn vertex_ids(&self) -> impl Iterator<Item = &String> {
        self.vertices.keys()
    }

    pub fn dependencies_of(&self, id: &str) -> &[String] {
        self.edges.get(id).map(|v| v.as_slice()).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.vertices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}
