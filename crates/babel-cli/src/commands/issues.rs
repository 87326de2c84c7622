//! Test declarations from GitHub issues

use crate::error::{CliError, CliResult};
use crate::report::Expectation;
use crate::runner::Planned;
use babel_sources::github::GITHUB_API_URL;
use babel_sources::{GitHubIssues, Issue, IssueSelector, DEFAULT_REPOSITORIES};
use clap::Args;
use tracing::info;

/// Arguments for `issues`
#[derive(Debug, Args)]
pub struct IssuesArgs {
    /// Issue to test: `org/repo#N`, `repo#N` or `N`. Repeatable.
    /// Without this, every issue with test declarations is tested.
    #[arg(short, long = "issue")]
    pub issues: Vec<String>,

    /// Repository to search, as `org/repo`. Repeatable.
    #[arg(short, long = "repository")]
    pub repositories: Vec<String>,

    /// GitHub token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub github_token: Option<String>,

    /// GitHub API base URL
    #[arg(long, default_value = GITHUB_API_URL, hide = true)]
    pub github_api_url: String,
}

impl IssuesArgs {
    fn client(&self) -> CliResult<GitHubIssues> {
        let token = self.github_token.as_deref().unwrap_or_default();
        let repositories = if self.repositories.is_empty() {
            DEFAULT_REPOSITORIES.iter().map(|r| r.to_string()).collect()
        } else {
            self.repositories.clone()
        };
        Ok(GitHubIssues::new(token)?
            .with_api_url(&self.github_api_url)
            .with_repositories(repositories))
    }

    fn selectors(&self) -> CliResult<Vec<IssueSelector>> {
        self.issues
            .iter()
            .map(|s| IssueSelector::parse(s).map_err(CliError::from))
            .collect()
    }
}

/// Open issues document known problems, so their tests are expected to fail.
pub fn plan_issue(issue: &Issue) -> Planned {
    Planned {
        name: issue.id(),
        expectation: if issue.is_open() {
            Expectation::Fail
        } else {
            Expectation::Pass
        },
        is_issue: true,
        strict: false,
        cases: issue.test_cases().map_err(|e| e.to_string()),
    }
}

pub async fn plan(args: IssuesArgs) -> CliResult<Vec<Planned>> {
    let selectors = args.selectors()?;
    let github = args.client()?;

    let issues = if selectors.is_empty() {
        let issues: Vec<Issue> = github
            .all_issues()
            .await?
            .into_iter()
            .filter(Issue::has_tests)
            .collect();
        info!(count = issues.len(), "Found issues with test declarations");
        issues
    } else {
        github.issues_for(&selectors).await?
    };

    Ok(issues.iter().map(plan_issue).collect())
}
