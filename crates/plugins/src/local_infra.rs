//! A minimal `Infra` implementation targeting the local filesystem — no
//! cloud API calls. Credentials are a single opaque token read from its
//! Appfile config (falling back to a placeholder), which is enough to
//! exercise `CredentialStore::ensure` end to end without real secrets.

use orch_domain::error::Result;
use orch_domain::plugin::{CompileResult, Infra, InfraContext};
use std::collections::HashMap;

#[derive(Debug, Default)]
pub struct LocalInfra;

impl Infra for LocalInfra {
    fn compile(&self, ctx: &InfraContext) -> Result<CompileResult> {
        tracing::debug!(flavor = %ctx.infra.flavor, "local infra compile");
        std::fs::create_dir_all(&ctx.dir)?;
        Ok(CompileResult::default())
    }

    fn execute(&self, ctx: &InfraContext) -> Result<()> {
        tracing::debug!(action = ?ctx.action, "local infra execute");
        Ok(())
    }

    fn creds(&self, ctx: &InfraContext) -> Result<HashMap<String, String>> {
        let token = ctx
            .infra
            .config
            .get("token")
            .cloned()
            .unwrap_or_else(|| "local-dev-token".to_string());
        let mut creds = HashMap::new();
        creds.insert("LOCAL_TOKEN".to_string(), token);
        Ok(creds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orch_domain::dirbackend::DirectoryBackend;
    use orch_domain::graph::InfrastructureConfig;
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

    fn ctx(config: HashMap<String, String>) -> InfraContext {
        InfraContext {
            dir: std::env::temp_dir(),
            infra: InfrastructureConfig {
                flavor: "default".into(),
                config,
            },
            shared: Shared {
                directory: Arc::new(NoopDir),
                ui: Arc::new(NoopUi),
            },
            action: None,
            action_args: vec![],
            infra_creds: HashMap::new(),
        }
    }

    #[test]
    fn creds_falls_back_to_placeholder_token() {
        let infra = LocalInfra;
        let creds = infra.creds(&ctx(HashMap::new())).unwrap();
        assert_eq!(creds.get("LOCAL_TOKEN").map(String::as_str), Some("local-dev-token"));
    }

    #[test]
    fn creds_uses_configured_token() {
        let mut config = HashMap::new();
        config.insert("token".to_string(), "abc123".to_string());
        let infra = LocalInfra;
        let creds = infra.creds(&ctx(config)).unwrap();
        assert_eq!(creds.get("LOCAL_TOKEN").map(String::as_str), Some("abc123"));
    }
}
