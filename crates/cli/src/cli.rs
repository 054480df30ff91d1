//! `serialorch`'s subcommand definitions and config-loading helper,
//! mirroring the teacher's `sa_gateway::cli::{Cli, Command, load_config}`
//! split (clap-derived surface, config loading kept separate from `main`).

use clap::{Parser, Subcommand};
use orch_domain::config::WorkspaceConfig;

/// serialorch — a development-environment and deployment orchestrator.
#[derive(Debug, Parser)]
#[command(name = "serialorch", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Compile every vertex of the Appfile graph into `compile_dir`.
    Compile,
    /// Build the root application from a previously compiled `compile_dir`.
    Build,
    /// Bring up the dev environment, caching each dependency's dev-dep.
    Dev,
    /// Execute an arbitrary lifecycle action against the root app or infra.
    Exec {
        /// Which side to dispatch the action to: `dev` or `infra`. Anything
        /// else is passed through and surfaces as `Error::UnknownTask` once
        /// `Core::execute` sees it, rather than being rejected at parse time.
        target: String,
        action: String,
        #[arg(trailing_var_arg = true)]
        args: Vec<String>,
    },
    /// Credential diagnostics.
    #[command(subcommand)]
    Creds(CredsCommand),
}

#[derive(Debug, Subcommand)]
pub enum CredsCommand {
    /// Resolve (prompting as needed) and print the cached credential key
    /// names — never their values.
    Show,
}

/// Load `WorkspaceConfig` from the path named by `SERIALORCH_CONFIG`,
/// `serialorch.toml` in the current directory, or `~/.config/serialorch.toml`
/// (in that order). Missing files fall back to defaults, the way
/// `sa_gateway::cli::load_config` does for `config.toml`.
pub fn load_config() -> anyhow::Result<(WorkspaceConfig, String)> {
    let config_path = std::env::var("SERIALORCH_CONFIG").ok().or_else(|| {
        let cwd = "serialorch.toml";
        if std::path::Path::new(cwd).exists() {
            return Some(cwd.to_string());
        }
        dirs::home_dir()
            .map(|h| h.join(".config").join("serialorch.toml"))
            .filter(|p| p.exists())
            .map(|p| p.display().to_string())
    });

    let config_path = config_path.unwrap_or_else(|| "serialorch.toml".to_string());

    let config = if std::path::Path::new(&config_path).exists() {
        let raw = std::fs::read_to_string(&config_path)
            .map_err(|e| anyhow::anyhow!("reading {config_path}: {e}"))?;
        toml::from_str(&raw).map_err(|e| anyhow::anyhow!("parsing {config_path}: {e}"))?
    } else {
        WorkspaceConfig::default()
    };

    Ok((config, config_path))
}
