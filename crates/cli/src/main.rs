//! `serialorch` — the CLI front-end driving `orch-core` end to end (§4.7).
//!
//! Modeled on `sa_gateway::main`: parse `Cli`, load the workspace config,
//! initialize tracing, and dispatch to a subcommand handler that converts
//! `orch_domain::error::Error` into `anyhow::Error` at the boundary.

mod cli;
mod dirbackend;
mod ui;

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use orch_core::{Core, CredentialStore, Layout, Registry};
use orch_domain::graph::{CompiledGraph, Tuple};
use orch_domain::graph_loader::load_compiled_graph;
use orch_domain::plugin::{App, ExecuteOpts, ExecuteTask, Infra, Shared};
use orch_domain::ui::Ui;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command, CredsCommand};
use crate::dirbackend::LocalDirectoryBackend;
use crate::ui::TerminalUi;

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let (config, config_path) =
        cli::load_config().with_context(|| "loading workspace config".to_string())?;
    tracing::debug!(config_path = %config_path, "loaded workspace config");

    let core = build_core(&config)?;

    match cli.command {
        Command::Compile => core.compile().map_err(Into::into),
        Command::Build => core.build().map_err(Into::into),
        Command::Dev => core.dev().map_err(Into::into),
        Command::Exec {
            target,
            action,
            args,
        } => {
            let task = match target.as_str() {
                "dev" => ExecuteTask::Dev,
                "infra" => ExecuteTask::Infra,
                other => ExecuteTask::Unknown(other.to_string()),
            };
            core.execute(ExecuteOpts { task, action, args })
                .map_err(Into::into)
        }
        Command::Creds(CredsCommand::Show) => show_creds(&config),
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,serialorch=debug")),
        )
        .init();
}

/// Load the Appfile graph, register the in-tree sample plugins for every
/// tuple and infra type the graph actually names, and assemble `Core`.
///
/// `orch-plugins`'s `NullApp`/`LocalInfra` stand in for the real
/// language/framework and cloud-target implementations the spec treats as
/// external collaborators — wiring them here is what makes this crate
/// runnable standalone.
fn build_core(config: &orch_domain::config::WorkspaceConfig) -> anyhow::Result<Core> {
    let issues = config.validate();
    for issue in &issues {
        tracing::warn!(%issue, "workspace config issue");
    }
    if issues
        .iter()
        .any(|i| i.severity == orch_domain::config::ConfigSeverity::Error)
    {
        anyhow::bail!("workspace config failed validation: {issues:?}");
    }

    let graph = load_compiled_graph(&config.appfile)
        .with_context(|| format!("loading Appfile graph from {}", config.appfile.display()))?;

    let layout = Layout::new(
        config.data_dir.clone(),
        config.local_dir.clone(),
        config.compile_dir.clone(),
    );
    let shared = Shared {
        directory: Arc::new(LocalDirectoryBackend::new(layout.clone())),
        ui: Arc::new(TerminalUi),
    };

    let registry = registry_for(&graph);
    Ok(Core::new(graph, registry, layout, shared))
}

fn registry_for(graph: &CompiledGraph) -> Registry {
    let mut tuples: HashSet<Tuple> = HashSet::new();
    let mut infra_types: HashSet<String> = HashSet::new();
    for id in graph.vertex_ids() {
        if let Some(file) = graph.get(id) {
            infra_types.insert(file.project.infrastructure.clone());
            if let Some(active) = file.active_infrastructure() {
                tuples.insert(Tuple::new(
                    file.application.app_type.clone(),
                    file.project.infrastructure.clone(),
                    active.flavor.clone(),
                ));
            }
        }
    }

    let mut builder = Registry::builder();
    for tuple in tuples {
        builder = builder.register_app(
            tuple,
            Arc::new(|| Ok(Arc::new(orch_plugins::NullApp) as Arc<dyn App>)),
        );
    }
    for infra_type in infra_types {
        builder = builder.register_infra(
            infra_type,
            Arc::new(|| Ok(Arc::new(orch_plugins::LocalInfra) as Arc<dyn Infra>)),
        );
    }
    builder.build()
}

fn show_creds(config: &orch_domain::config::WorkspaceConfig) -> anyhow::Result<()> {
    let creds_path = config.local_dir.join("creds");
    if !creds_path.exists() {
        println!("no cached credentials at {}", creds_path.display());
        return Ok(());
    }
    let ui = TerminalUi;
    let password = ui.input(&orch_domain::ui::InputOpts::new(
        "creds_password",
        "Encrypted Credentials Password",
        "Password used when these credentials were last saved.",
    ))?;
    let creds = CredentialStore::load(&creds_path, &password)?;
    let mut names: Vec<&String> = creds.keys().collect();
    names.sort();
    println!("cached credential keys ({}):", creds_path.display());
    for name in names {
        println!("  {name}");
    }
    Ok(())
}
