//! Test declarations from an issue body on disk or stdin

use crate::error::CliResult;
use crate::runner::Planned;
use babel_sources::extract_test_cases;
use clap::Args;
use std::io::Read;

/// Arguments for `body`
#[derive(Debug, Args)]
pub struct BodyArgs {
    /// File holding the issue body, or `-` for stdin
    pub path: String,
}

pub fn plan(args: BodyArgs) -> CliResult<Vec<Planned>> {
    let body = if args.path == "-" {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body)?;
        body
    } else {
        std::fs::read_to_string(&args.path)?
    };

    let origin = if args.path == "-" { "stdin" } else { args.path.as_str() };
    let cases = extract_test_cases(&body, origin)?;
    Ok(cases.into_iter().map(Planned::case).collect())
}
