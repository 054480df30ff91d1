//! Plugin discovery (§4.3).
//!
//! Apps are looked up by `(app_type, infra_type, infra_flavor)` tuple,
//! infrastructures by type name. Both maps are built once, explicitly, at
//! startup — there is no implicit global registry and no reflection.

use orch_domain::error::{Error, Result};
use orch_domain::graph::Tuple;
use orch_domain::plugin::{App, AppFactory, Infra, InfraFactory};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Default)]
pub struct RegistryBuilder {
    apps: HashMap<Tuple, AppFactory>,
    infras: HashMap<String, InfraFactory>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register_app(mut self, tuple: Tuple, factory: AppFactory) -> Self {
        self.apps.insert(tuple, factory);
        self
    }

    pub fn register_infra(mut self, infra_type: impl Into<String>, factory: InfraFactory) -> Self {
        self.infras.insert(infra_type.into(), factory);
        self
    }

    pub fn build(self) -> Registry {
        Registry {
            apps: self.apps,
            infras: self.infras,
        }
    }
}

/// Resolves a compiled graph's tuples and infra types to concrete plugin
/// instances.
pub struct Registry {
    apps: HashMap<Tuple, AppFactory>,
    infras: HashMap<String, InfraFactory>,
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    /// Resolve and construct an `App` for `tuple`. `UnknownAppTuple` if no
    /// factory is registered; `AppStartFailed` if the factory itself fails.
    pub fn resolve_app(&self, tuple: &Tuple) -> Result<Arc<dyn App>> {
        let factory = self
            .apps
            .get(tuple)
            .ok_or_else(|| Error::UnknownAppTuple(tuple.clone()))?;
        factory().map_err(|e| Error::AppStartFailed {
            tuple: tuple.clone(),
            message: e.to_string(),
        })
    }

    /// Resolve and construct an `Infra` for `infra_type`. `UnknownInfraType`
    /// if no factory is registered; `InfraStartFailed` if construction fails.
    pub fn resolve_infra(&self, infra_type: &str) -> Result<Arc<dyn Infra>> {
        let factory = self
            .infras
            .get(infra_type)
            .ok_or_else(|| Error::UnknownInfraType(infra_type.to_string()))?;
        factory().map_err(|e| Error::InfraStartFailed {
            infra_type: infra_type.to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orch_domain::plugin::{AppContext, CompileResult, DevDep, InfraContext};
    use std::collections::HashMap as Map;

    struct NullApp;
    impl App for NullApp {
        fn compile(&self, _ctx: &AppContext) -> Result<CompileResult> {
            Ok(CompileResult::default())
        }
        fn build(&self, _ctx: &AppContext) -> Result<()> {
            Ok(())
        }
        fn dev(&self, _ctx: &AppContext) -> Result<()> {
            Ok(())
        }
        fn dev_dep(&self, _root: &AppContext, _dep: &AppContext) -> Result<DevDep> {
            Ok(DevDep::default())
        }
    }

    struct NullInfra;
    impl Infra for NullInfra {
        fn compile(&self, _ctx: &InfraContext) -> Result<CompileResult> {
            Ok(CompileResult::default())
        }
        fn execute(&self, _ctx: &InfraContext) -> Result<()> {
            Ok(())
        }
        fn creds(&self, _ctx: &InfraContext) -> Result<Map<String, String>> {
            Ok(Map::new())
        }
    }

    fn tuple() -> Tuple {
        Tuple::new("ruby", "aws", "default")
    }

    #[test]
    fn resolves_registered_app() {
        let registry = Registry::builder()
            .register_app(tuple(), Arc::new(|| Ok(Arc::new(NullApp) as Arc<dyn App>)))
            .build();
        assert!(registry.resolve_app(&tuple()).is_ok());
    }

    #[test]
    fn unregistered_app_tuple_errors() {
        let registry = Registry::builder().build();
        let err = registry.resolve_app(&tuple()).unwrap_err();
        assert!(matches!(err, Error::UnknownAppTuple(_)));
    }

    #[test]
    fn resolves_registered_infra() {
        let registry = Registry::builder()
            .register_infra("aws", Arc::new(|| Ok(Arc::new(NullInfra) as Arc<dyn Infra>)))
            .build();
        assert!(registry.resolve_infra("aws").is_ok());
    }

    #[test]
    fn unregistered_infra_type_errors() {
        let registry = Registry::builder().build();
        let err = registry.resolve_infra("gcp").unwrap_err();
        assert!(matches!(err, Error::UnknownInfraType(_)));
    }

    #[test]
    fn failing_app_factory_surfaces_app_start_failed() {
        let registry = Registry::builder()
            .register_app(
                tuple(),
                Arc::new(|| Err(Error::Other("boom".into()))),
            )
            .build();
        let err = registry.resolve_app(&tuple()).unwrap_err();
        assert!(matches!(err, Error::AppStartFailed { .. }));
    }
}
