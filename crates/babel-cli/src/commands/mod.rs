//! CLI command implementations

pub mod body;
pub mod check;
pub mod docs;
pub mod issues;
pub mod sheet;
pub mod targets;

use crate::error::CliResult;
use crate::output::{print_report, print_warning, OutputFormat};
use crate::runner::{Planned, Runner};
use babel_assertions::{Evaluator, DEFAULT_PASS_IF_FOUND_IN_TOP};
use babel_services::{ClientRegistry, DEFAULT_TIMEOUT};
use babel_sources::TargetsConfig;
use clap::Args;
use std::time::Duration;

/// Options shared by every command
#[derive(Debug, Args)]
pub struct GlobalArgs {
    /// Target to test; repeat for several, or use `all` (default: dev)
    #[arg(short, long = "target", global = true)]
    pub targets: Vec<String>,

    /// TOML file with additional or overriding targets
    #[arg(long, env = "BABEL_TARGETS_FILE", global = true)]
    pub targets_file: Option<String>,

    /// Expected CURIE must appear at this 0-based NameRes index or earlier
    #[arg(long, default_value_t = DEFAULT_PASS_IF_FOUND_IN_TOP, global = true)]
    pub pass_if_found_in_top: usize,

    /// Timeout for each NodeNorm or NameRes request
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs(), global = true)]
    pub timeout_secs: u64,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table", global = true)]
    pub output: OutputFormat,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "warn", global = true)]
    pub log_level: String,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,
}

impl GlobalArgs {
    pub fn targets_config(&self) -> CliResult<TargetsConfig> {
        Ok(TargetsConfig::load(self.targets_file.as_deref())?)
    }
}

/// Evaluate `planned` against the selected targets and print the report.
/// Returns whether the run succeeded.
pub async fn validate(global: &GlobalArgs, planned: Vec<Planned>) -> CliResult<bool> {
    let targets = global.targets_config()?.select(&global.targets)?;

    if planned.is_empty() {
        print_warning("No test cases found");
    }

    let clients = ClientRegistry::new(Duration::from_secs(global.timeout_secs))?;
    let evaluator = Evaluator::default().with_pass_if_found_in_top(global.pass_if_found_in_top);
    let runner = Runner::new(clients, evaluator, targets);

    let report = runner.run(&planned).await;
    print_report(&report, global.output)?;
    Ok(report.is_success())
}
