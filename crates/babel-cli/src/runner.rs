//! Runs planned test cases against every selected target.

use crate::report::{CaseReport, Expectation, ReportEntry, TargetInfo, ValidationReport};
use babel_assertions::{Evaluator, TestCase};
use babel_services::{ClientRegistry, NameResClient, NodeNormClient};
use babel_sources::Target;
use std::time::Instant;
use tracing::{info, warn};

/// Test cases that are judged together: one issue, or one ad hoc case.
#[derive(Debug, Clone)]
pub struct Planned {
    pub name: String,
    pub expectation: Expectation,
    pub is_issue: bool,
    /// Unexpected passes fail the run.
    pub strict: bool,
    /// Declarations that could not be extracted are reported as errored.
    pub cases: Result<Vec<TestCase>, String>,
}

impl Planned {
    /// An ad hoc test case that must pass.
    pub fn case(case: TestCase) -> Self {
        Self {
            name: case.label(),
            expectation: Expectation::Pass,
            is_issue: false,
            strict: false,
            cases: Ok(vec![case]),
        }
    }
}

pub struct Runner {
    clients: ClientRegistry,
    evaluator: Evaluator,
    targets: Vec<(String, Target)>,
}

impl Runner {
    pub fn new(clients: ClientRegistry, evaluator: Evaluator, targets: Vec<(String, Target)>) -> Self {
        Self {
            clients,
            evaluator,
            targets,
        }
    }

    pub async fn run(&self, planned: &[Planned]) -> ValidationReport {
        let started = Instant::now();
        let mut report = ValidationReport::new(
            self.targets
                .iter()
                .map(|(name, target)| TargetInfo::new(name, target))
                .collect(),
        );

        for (name, target) in &self.targets {
            info!(target = %name, "Testing target: {}", target);
            let nodenorm = self.clients.nodenorm(&target.nodenorm_url);
            let nameres = self.clients.nameres(&target.nameres_url);

            for entry in planned {
                report.push(evaluate_planned(&self.evaluator, name, entry, &nodenorm, &nameres).await);
            }
        }

        report.finalize(started.elapsed().as_millis() as u64);
        report
    }
}

/// Evaluate every case of `planned` on one target.
pub async fn evaluate_planned(
    evaluator: &Evaluator,
    target: &str,
    planned: &Planned,
    nodenorm: &NodeNormClient,
    nameres: &NameResClient,
) -> ReportEntry {
    let cases = match &planned.cases {
        Ok(cases) => {
            let mut reports = Vec::with_capacity(cases.len());
            for case in cases {
                let report = match evaluator.evaluate(case, nodenorm, nameres).await {
                    Ok(results) => CaseReport {
                        case: case.label(),
                        results,
                        error: None,
                    },
                    Err(e) => {
                        warn!(case = %case, error = %e, "Test case errored");
                        CaseReport {
                            case: case.label(),
                            results: Vec::new(),
                            error: Some(e.to_string()),
                        }
                    }
                };
                reports.push(report);
            }
            reports
        }
        Err(error) => vec![CaseReport {
            case: planned.name.clone(),
            results: Vec::new(),
            error: Some(error.clone()),
        }],
    };

    let entry = ReportEntry::new(target, planned.name.clone(), planned.expectation, cases)
        .with_strict(planned.strict);
    let entry = if planned.is_issue {
        entry.with_issue_note()
    } else {
        entry
    };
    info!(target, name = %entry.name, outcome = %entry.outcome, "Evaluated");
    entry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Outcome;
    use babel_assertions::testing::{hit, nameres_client, node, nodenorm_client, StaticNameRes, StaticNodeNorm};
    use babel_services::ServiceError;
    use std::sync::Arc;

    fn clients() -> (NodeNormClient, NameResClient) {
        let nodenorm = nodenorm_client(Arc::new(
            StaticNodeNorm::new()
                .with("MONDO:0005015", node("MONDO:0005015", "diabetes mellitus", &["biolink:Disease"])),
        ));
        let nameres = nameres_client(Arc::new(
            StaticNameRes::new().with("diabetes", vec![hit("MONDO:0005015", "diabetes mellitus")]),
        ));
        (nodenorm, nameres)
    }

    fn issue(expectation: Expectation, cases: Vec<TestCase>) -> Planned {
        Planned {
            name: "NCATSTranslator/Babel#7".into(),
            expectation,
            is_issue: true,
            strict: false,
            cases: Ok(cases),
        }
    }

    fn resolves(curie: &str) -> TestCase {
        TestCase::new("Resolves", vec![vec![curie.to_string()]]).with_source("NCATSTranslator/Babel#7")
    }

    #[tokio::test]
    async fn test_closed_issue_passes() {
        let (nodenorm, nameres) = clients();
        let entry = evaluate_planned(
            &Evaluator::default(),
            "dev",
            &issue(Expectation::Pass, vec![resolves("MONDO:0005015")]),
            &nodenorm,
            &nameres,
        )
        .await;
        assert_eq!(entry.outcome, Outcome::Passed);
        assert!(entry.note.is_none());
    }

    #[tokio::test]
    async fn test_open_issue_failing_is_expected() {
        let (nodenorm, nameres) = clients();
        let entry = evaluate_planned(
            &Evaluator::default(),
            "dev",
            &issue(
                Expectation::Fail,
                vec![resolves("MONDO:0005015"), resolves("NOPE:1")],
            ),
            &nodenorm,
            &nameres,
        )
        .await;
        assert_eq!(entry.outcome, Outcome::ExpectedFailure);
        assert_eq!(entry.cases.len(), 2);
        assert!(!entry.is_failure());
    }

    #[tokio::test]
    async fn test_open_issue_passing_suggests_closing() {
        let (nodenorm, nameres) = clients();
        let entry = evaluate_planned(
            &Evaluator::default(),
            "dev",
            &issue(Expectation::Fail, vec![resolves("MONDO:0005015")]),
            &nodenorm,
            &nameres,
        )
        .await;
        assert_eq!(entry.outcome, Outcome::UnexpectedPass);
        assert!(entry.note.unwrap().contains("consider closing"));
    }

    #[tokio::test]
    async fn test_unknown_assertion_is_errored_not_failed() {
        let (nodenorm, nameres) = clients();
        let case = TestCase::new("ResolvesTo", vec![vec!["MONDO:0005015".into()]]);
        let entry = evaluate_planned(
            &Evaluator::default(),
            "dev",
            &Planned::case(case),
            &nodenorm,
            &nameres,
        )
        .await;
        assert_eq!(entry.outcome, Outcome::Errored);
        assert!(entry.cases[0]
            .error
            .as_deref()
            .unwrap()
            .starts_with("unknown assertion type 'ResolvesTo'"));
        assert!(entry.is_failure());
    }

    #[tokio::test]
    async fn test_backend_failure_is_errored() {
        let nodenorm = nodenorm_client(Arc::new(StaticNodeNorm::failing(500)));
        let nameres = nameres_client(Arc::new(StaticNameRes::new()));
        let entry = evaluate_planned(
            &Evaluator::default(),
            "dev",
            &issue(Expectation::Pass, vec![resolves("MONDO:0005015")]),
            &nodenorm,
            &nameres,
        )
        .await;
        assert_eq!(entry.outcome, Outcome::Errored);
        let expected = ServiceError::RequestFailed {
            service: "NodeNorm",
            url: "http://nodenorm.test/get_normalized_nodes".into(),
            status: 500,
            body: String::new(),
        }
        .to_string();
        assert_eq!(entry.cases[0].error.as_deref(), Some(expected.as_str()));
    }

    #[tokio::test]
    async fn test_extraction_error_is_errored() {
        let (nodenorm, nameres) = clients();
        let planned = Planned {
            name: "NCATSTranslator/Babel#8".into(),
            expectation: Expectation::Fail,
            is_issue: true,
            strict: false,
            cases: Err("invalid babel_tests YAML".into()),
        };
        let entry = evaluate_planned(&Evaluator::default(), "dev", &planned, &nodenorm, &nameres).await;
        assert_eq!(entry.outcome, Outcome::Errored);
        assert!(!entry.is_failure());
    }
}
