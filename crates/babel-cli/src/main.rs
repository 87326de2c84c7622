//! Babel Validation CLI
//!
//! Runs BabelTest assertions against NodeNorm and NameRes deployments:
//! - ad hoc assertions from the command line
//! - declarations in an issue body on disk
//! - declarations in GitHub issues, where open issues are expected to fail
//! - curated rows in the Babel test Google Sheet
//!
//! Exits 0 when every check passed, 1 when a check failed and 2 when the run
//! itself could not complete.

use clap::{Parser, Subcommand};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;
mod error;
mod output;
mod report;
mod runner;

use babel_assertions::AssertionRegistry;
use commands::{body, check, docs, issues, sheet, targets, GlobalArgs};
use error::CliResult;

/// Babel Validation CLI application
#[derive(Parser)]
#[command(name = "babel-validate")]
#[command(about = "Validate Babel cliques through NodeNorm and NameRes", long_about = None)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand)]
enum Commands {
    /// Run one assertion with a single parameter set
    Check(check::CheckArgs),

    /// Run the test declarations in an issue body
    Body(body::BodyArgs),

    /// Run the test declarations in GitHub issues
    Issues(issues::IssuesArgs),

    /// Run the curated test rows in the Google Sheet
    Sheet(sheet::SheetArgs),

    /// Generate the assertion type documentation
    Docs(docs::DocsArgs),

    /// List configured targets
    Targets,
}

fn init_tracing(global: &GlobalArgs) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&global.log_level));

    let json = global.log_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
    });
    let text = (!global.log_json).then(|| {
        tracing_subscriber::fmt::layer()
            .without_time()
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(json)
        .with(text)
        .init();
}

async fn run(cli: Cli) -> CliResult<bool> {
    let global = cli.global;
    match cli.command {
        Commands::Check(args) => commands::validate(&global, check::plan(args)).await,
        Commands::Body(args) => commands::validate(&global, body::plan(args)?).await,
        Commands::Issues(args) => {
            let planned = issues::plan(args).await?;
            commands::validate(&global, planned).await
        }
        Commands::Sheet(args) => {
            let rows = sheet::load(&args).await?;
            if args.list_categories {
                sheet::list_categories(&rows, global.output)
            } else {
                commands::validate(&global, sheet::planned_for(&args, &rows)).await
            }
        }
        Commands::Docs(args) => docs::execute(args, &AssertionRegistry::builtin()),
        Commands::Targets => targets::execute(&global.targets_config()?, global.output),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(&cli.global);

    match run(cli).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            output::print_error(&e.to_string());
            ExitCode::from(2)
        }
    }
}
