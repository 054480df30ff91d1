//! A minimal `App` implementation used by integration tests and as a worked
//! example of the plugin contract. Writes no real artifacts; `Compile`
//! reports a fragment only when the Appfile names one in its config.

use orch_domain::error::Result;
use orch_domain::plugin::{App, AppContext, CompileResult, DevDep};

/// An `App` that does nothing beyond satisfying the contract. Useful for
/// exercising `orch-core` without a real language/framework adapter.
#[derive(Debug, Default)]
pub struct NullApp;

impl App for NullApp {
    fn compile(&self, ctx: &AppContext) -> Result<CompileResult> {
        tracing::debug!(id = %ctx.appfile.id(), "null app compile");
        std::fs::create_dir_all(&ctx.dir)?;
        Ok(CompileResult::default())
    }

    fn build(&self, ctx: &AppContext) -> Result<()> {
        tracing::debug!(id = %ctx.appfile.id(), "null app build");
        Ok(())
    }

    fn dev(&self, ctx: &AppContext) -> Result<()> {
        tracing::debug!(id = %ctx.appfile.id(), "null app dev");
        Ok(())
    }

    fn dev_dep(&self, _root_ctx: &AppContext, _dep_ctx: &AppContext) -> Result<DevDep> {
        Ok(DevDep::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orch_domain::dirbackend::DirectoryBackend;
    use orch_domain::graph::{Appfile, Application, Project, Tuple};
    use orch_domain::plugin::Shared;
    use orch_domain::ui::{InputOpts, Ui};
    use std::sync::Arc;

    struct NoopDir;
    impl DirectoryBackend for NoopDir {
        fn name(&self) -> &str {
            "noop"
        }
    }
    struct NoopUi;
    impl Ui for NoopUi {
        fn header(&self, _t: &str) {}
        fn message(&self, _t: &str) {}
        fn input(&self, _o: &InputOpts) -> Result<String> {
            Ok(String::new())
        }
    }

    fn ctx(dir: std::path::PathBuf) -> AppContext {
        AppContext {
            dir,
            cache_dir: std::env::temp_dir(),
            tuple: Tuple::new("null", "local", "default"),
            appfile: Arc::new(Appfile {
                id: "R".into(),
                application: Application {
                    name: "R".into(),
                    app_type: "null".into(),
                },
                project: Project {
                    infrastructure: "local".into(),
                    infrastructures: Default::default(),
                    active: None,
                },
            }),
            application: Arc::new(Application {
                name: "R".into(),
                app_type: "null".into(),
            }),
            action: None,
            action_args: vec![],
            dev_dep_fragments: vec![],
            shared: Shared {
                directory: Arc::new(NoopDir),
                ui: Arc::new(NoopUi),
            },
        }
    }

    #[test]
    fn compile_creates_its_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("app");
        let app = NullApp;
        app.compile(&ctx(out.clone())).unwrap();
        assert!(out.is_dir());
    }

    #[test]
    fn dev_dep_reports_no_files() {
        let dir = tempfile::tempdir().unwrap();
        let app = NullApp;
        let dep = app.dev_dep(&ctx(dir.path().into()), &ctx(dir.path().into())).unwrap();
        assert!(dep.files.is_empty());
    }
}
