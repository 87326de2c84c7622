//! Ad hoc assertions from the command line

use crate::runner::Planned;
use babel_assertions::TestCase;
use clap::Args;

/// Arguments for `check`
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Assertion type, e.g. ResolvesWith (case-insensitive)
    pub assertion: String,

    /// Parameters for a single parameter set
    pub params: Vec<String>,
}

pub fn plan(args: CheckArgs) -> Vec<Planned> {
    let param_sets = if args.params.is_empty() {
        Vec::new()
    } else {
        vec![args.params]
    };
    let case = TestCase::new(args.assertion, param_sets).with_source("command line");
    vec![Planned::case(case)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plan_single_param_set() {
        let planned = plan(CheckArgs {
            assertion: "ResolvesWith".into(),
            params: vec!["MONDO:0005015".into(), "DOID:9351".into()],
        });
        let cases = planned[0].cases.as_ref().unwrap();
        assert_eq!(cases[0].param_sets.len(), 1);
        assert_eq!(
            planned[0].name,
            "command line: ResolvesWith(1 param sets: [[\"MONDO:0005015\",\"DOID:9351\"]])"
        );
    }

    #[test]
    fn test_plan_without_params() {
        let planned = plan(CheckArgs {
            assertion: "Needed".into(),
            params: Vec::new(),
        });
        assert!(planned[0].cases.as_ref().unwrap()[0].param_sets.is_empty());
    }
}
