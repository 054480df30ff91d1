//! Per-vertex context assembly (§4.4).

use crate::layout::Layout;
use orch_domain::error::{Error, Result};
use orch_domain::graph::{Appfile, Tuple};
use orch_domain::plugin::{AppContext, InfraContext, Shared};
use std::sync::Arc;

pub struct ContextBuilder {
    layout: Layout,
    shared: Shared,
}

impl ContextBuilder {
    pub fn new(layout: Layout, shared: Shared) -> Self {
        Self { layout, shared }
    }

    /// Build `file`'s `AppContext`. `is_root` distinguishes the root
    /// vertex's output directory (`<compileDir>/app`) from a dependency's
    /// (`<compileDir>/dep-<id>`).
    pub fn build_app_context(&self, file: &Appfile, is_root: bool) -> Result<AppContext> {
        let config = file
            .active_infrastructure()
            .ok_or_else(|| Error::InfraNotConfigured(file.project.infrastructure.clone()))?;

        let tuple = Tuple::new(
            file.application.app_type.clone(),
            file.project.infrastructure.clone(),
            config.flavor.clone(),
        );

        let dir = self.layout.app_dir(is_root, file.id());
        let cache_dir = self.layout.ensure_cache_dir(file.id())?;

        Ok(AppContext {
            dir,
            cache_dir,
            tuple,
            appfile: Arc::new(file.clone()),
            application: Arc::new(file.application.clone()),
            action: None,
            action_args: Vec::new(),
            dev_dep_fragments: Vec::new(),
            shared: self.shared.clone(),
        })
    }

    /// Build the root Appfile's `InfraContext`.
    pub fn build_infra_context(&self, root: &Appfile) -> Result<InfraContext> {
        let config = root
            .active_infrastructure()
            .ok_or_else(|| Error::InfraNotConfigured(root.project.infrastructure.clone()))?;

        let dir = self.layout.infra_dir(&root.project.infrastructure);

        Ok(InfraContext {
            dir,
            infra: config.clone(),
            shared: self.shared.clone(),
            action: None,
            action_args: Vec::new(),
            infra_creds: std::collections::HashMap::new(),
        })
    }
}
