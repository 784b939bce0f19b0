//! Implementation of the `grit-interview serve` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::build_collaborators;
use crate::adapters::http::InterviewHttpServer;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{CollaboratorBackend, Config};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::{LogConfig, LoggerImpl};
use crate::services::{SessionGateway, TurnController, TurnControllerConfig};

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Configuration file (defaults to the .grit-interview hierarchy)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Host to bind to (overrides configuration)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides configuration)
    #[arg(short, long)]
    pub port: Option<u16>,
}

#[derive(Debug, Serialize)]
pub struct ServeOutput {
    pub address: String,
    pub backend: CollaboratorBackend,
    pub max_turns: usize,
    pub stopped: bool,
}

impl CommandOutput for ServeOutput {
    fn to_human(&self) -> String {
        if self.stopped {
            format!("Interview server on {} stopped", self.address)
        } else {
            format!(
                "Interview server listening on http://{} ({:?} collaborators, {} questions)",
                self.address, self.backend, self.max_turns
            )
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Apply command-line overrides and re-validate.
fn resolve_config(args: &ServeArgs) -> Result<Config> {
    let mut config = super::load_config(args.config.as_deref())?;
    if let Some(host) = &args.host {
        config.server.host.clone_from(host);
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    ConfigLoader::validate(&config)?;
    Ok(config)
}

pub async fn execute(args: ServeArgs, json_mode: bool) -> Result<()> {
    let config = resolve_config(&args)?;

    let log_config = LogConfig::try_from(&config.logging)?;
    let _logger = LoggerImpl::init(&log_config).context("Failed to initialize logging")?;

    let collaborators = build_collaborators(&config.collaborators)?;
    let controller = TurnController::new(collaborators, TurnControllerConfig::from(&config));
    let gateway = Arc::new(SessionGateway::new(controller));

    let mut summary = ServeOutput {
        address: format!("{}:{}", config.server.host, config.server.port),
        backend: config.collaborators.backend,
        max_turns: config.interview.max_turns,
        stopped: false,
    };
    output(&summary, json_mode);

    InterviewHttpServer::new(gateway, config.server.clone())
        .serve_with_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %e, "failed to listen for shutdown signal");
            }
        })
        .await?;

    summary.stopped = true;
    output(&summary, json_mode);
    Ok(())
}
