//! Configured targets

use crate::error::CliResult;
use crate::output::{print_output, OutputFormat};
use babel_sources::{TargetsConfig, DEFAULT_TARGET};
use serde::Serialize;
use tabled::Tabled;

#[derive(Debug, Serialize, Tabled)]
pub struct TargetRow {
    #[tabled(rename = "Name")]
    pub name: String,
    #[tabled(rename = "NodeNorm")]
    pub nodenorm_url: String,
    #[tabled(rename = "NameRes")]
    pub nameres_url: String,
    #[tabled(rename = "Default")]
    pub default: bool,
}

pub fn rows(config: &TargetsConfig) -> Vec<TargetRow> {
    config
        .targets
        .iter()
        .map(|(name, target)| TargetRow {
            name: name.clone(),
            nodenorm_url: target.nodenorm_url.clone(),
            nameres_url: target.nameres_url.clone(),
            default: name == DEFAULT_TARGET,
        })
        .collect()
}

pub fn execute(config: &TargetsConfig, format: OutputFormat) -> CliResult<bool> {
    print_output(rows(config), format)?;
    Ok(true)
}
