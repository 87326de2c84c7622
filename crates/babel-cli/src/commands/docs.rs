//! Assertion type documentation

use crate::error::{CliError, CliResult};
use crate::output::print_success;
use babel_assertions::docs::generate_readme;
use babel_assertions::AssertionRegistry;
use clap::Args;
use std::path::PathBuf;

/// Arguments for `docs`
#[derive(Debug, Args)]
pub struct DocsArgs {
    /// Write the docs here instead of stdout
    #[arg(long)]
    pub path: Option<PathBuf>,

    /// Fail if the file at --path differs from the generated docs
    #[arg(long, requires = "path")]
    pub check: bool,
}

pub fn execute(args: DocsArgs, registry: &AssertionRegistry) -> CliResult<bool> {
    let readme = generate_readme(registry);

    let Some(path) = args.path else {
        print!("{}", readme);
        return Ok(true);
    };

    if args.check {
        let current = match std::fs::read_to_string(&path) {
            Ok(current) => current,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(e.into()),
        };
        if current != readme {
            return Err(CliError::DocsOutOfDate(path.display().to_string()));
        }
        print_success(&format!("{} is up to date", path.display()));
    } else {
        std::fs::write(&path, &readme)?;
        print_success(&format!("Wrote {}", path.display()));
    }
    Ok(true)
}
