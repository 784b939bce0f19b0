//! Implementation of the `grit-interview config` command.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Configuration file (defaults to the .grit-interview hierarchy)
    #[arg(short, long)]
    pub config: Option<PathBuf>,
}

#[derive(Debug, Serialize)]
pub struct ConfigOutput {
    pub config: Config,
    #[serde(skip)]
    rendered: String,
}

impl CommandOutput for ConfigOutput {
    fn to_human(&self) -> String {
        self.rendered.clone()
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(&self.config).unwrap_or_default()
    }
}

pub async fn execute(args: ConfigArgs, json_mode: bool) -> Result<()> {
    let config = super::load_config(args.config.as_deref())?;
    let rendered = serde_yaml::to_string(&config).context("Failed to render configuration")?;

    output(&ConfigOutput { config, rendered }, json_mode);
    Ok(())
}
