//! GitHub issues as a source of test cases.

use crate::error::{SourceError, SourceResult};
use crate::extract::{extract_test_cases, has_test_declarations};
use babel_assertions::TestCase;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use reqwest::{Client, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};

pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Repositories whose issues carry test declarations.
pub const DEFAULT_REPOSITORIES: &[&str] = &[
    "NCATSTranslator/Babel",
    "NCATSTranslator/NodeNormalization",
    "NCATSTranslator/NameResolution",
    "TranslatorSRI/babel-validation",
];

const PER_PAGE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Open,
    Closed,
}

impl fmt::Display for IssueState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueState::Open => write!(f, "open"),
            IssueState::Closed => write!(f, "closed"),
        }
    }
}

/// The parts of a GitHub issue the runner needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub number: u64,
    pub title: String,
    pub state: IssueState,
    #[serde(default)]
    pub body: Option<String>,
    pub html_url: String,
}

impl Issue {
    /// `org/repo`, taken from `html_url` rather than another API call.
    pub fn repository(&self) -> Option<String> {
        let parts: Vec<&str> = self.html_url.split('/').collect();
        match (parts.get(3), parts.get(4)) {
            (Some(org), Some(repo)) if !org.is_empty() && !repo.is_empty() => {
                Some(format!("{}/{}", org, repo))
            }
            _ => None,
        }
    }

    /// `org/repo#123`.
    pub fn id(&self) -> String {
        match self.repository() {
            Some(repository) => format!("{}#{}", repository, self.number),
            None => format!("#{}", self.number),
        }
    }

    pub fn is_open(&self) -> bool {
        self.state == IssueState::Open
    }

    pub fn has_tests(&self) -> bool {
        self.body.as_deref().is_some_and(has_test_declarations)
    }

    /// Test cases declared in the issue body, labelled with the issue id.
    pub fn test_cases(&self) -> SourceResult<Vec<TestCase>> {
        let id = self.id();
        debug!(issue = %id, title = %self.title, state = %self.state, "Looking for tests");
        extract_test_cases(self.body.as_deref().unwrap_or_default(), &id)
    }
}

/// How an issue is named on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueSelector {
    /// `org/repo#110`
    Qualified { repository: String, number: u64 },
    /// `repo#110`, matched against the configured repositories.
    Repo { name: String, number: u64 },
    /// `110`, looked up in every configured repository.
    Number(u64),
}

impl IssueSelector {
    pub fn parse(selector: &str) -> SourceResult<Self> {
        let invalid = || SourceError::InvalidSelector(selector.to_string());
        let selector = selector.trim();

        let Some((repo, number)) = selector.split_once('#') else {
            return selector.parse().map(IssueSelector::Number).map_err(|_| invalid());
        };
        let number: u64 = number.parse().map_err(|_| invalid())?;

        match repo.split_once('/') {
            Some((org, name)) if !org.is_empty() && !name.is_empty() && !name.contains('/') => {
                Ok(IssueSelector::Qualified {
                    repository: repo.to_string(),
                    number,
                })
            }
            None if !repo.is_empty() => Ok(IssueSelector::Repo {
                name: repo.to_string(),
                number,
            }),
            _ => Err(invalid()),
        }
    }
}

impl FromStr for IssueSelector {
    type Err = SourceError;

    fn from_str(s: &str) -> SourceResult<Self> {
        Self::parse(s)
    }
}

/// Read-only client for the GitHub issues REST API.
pub struct GitHubIssues {
    client: Client,
    api_url: String,
    repositories: Vec<String>,
}

impl GitHubIssues {
    /// Client for the default repositories. An empty token is rejected.
    pub fn new(token: &str) -> SourceResult<Self> {
        let token = token.trim();
        if token.is_empty() {
            return Err(SourceError::MissingToken);
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| SourceError::MissingToken)?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        headers.insert(USER_AGENT, HeaderValue::from_static("babel-validate"));

        let client = Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_secs(30))
            .build()?;

        info!("Set up GitHub client for {}", GITHUB_API_URL);
        Ok(Self {
            client,
            api_url: GITHUB_API_URL.to_string(),
            repositories: DEFAULT_REPOSITORIES.iter().map(|r| r.to_string()).collect(),
        })
    }

    pub fn with_api_url(mut self, api_url: &str) -> Self {
        self.api_url = api_url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_repositories(mut self, repositories: Vec<String>) -> Self {
        self.repositories = repositories;
        self
    }

    pub fn repositories(&self) -> &[String] {
        &self.repositories
    }

    /// Every issue in `repository`, most recently updated first.
    pub async fn list_issues(&self, repository: &str) -> SourceResult<Vec<Issue>> {
        info!(repository, "Looking up issues in GitHub repository");
        let url = format!("{}/repos/{}/issues", self.api_url, repository);
        let per_page = PER_PAGE.to_string();

        let mut issues = Vec::new();
        for page in 1.. {
            let page = page.to_string();
            let request = self.client.get(&url).query(&[
                ("state", "all"),
                ("sort", "updated"),
                ("per_page", per_page.as_str()),
                ("page", page.as_str()),
            ]);
            let batch: Vec<Issue> = self.send(request, &url).await?;
            let done = batch.len() < PER_PAGE;
            issues.extend(batch);
            if done {
                break;
            }
        }

        info!(repository, count = issues.len(), "Found issues in GitHub repository");
        Ok(issues)
    }

    /// Issues from every configured repository, in repository order.
    pub async fn all_issues(&self) -> SourceResult<Vec<Issue>> {
        let mut issues = Vec::new();
        for repository in &self.repositories {
            issues.extend(self.list_issues(repository).await?);
        }
        Ok(issues)
    }

    pub async fn get_issue(&self, repository: &str, number: u64) -> SourceResult<Issue> {
        let url = format!("{}/repos/{}/issues/{}", self.api_url, repository, number);
        match self.send(self.client.get(&url), &url).await {
            Err(SourceError::GitHub { status: 404, .. }) => Err(SourceError::IssueNotFound {
                repository: repository.to_string(),
                number,
            }),
            other => other,
        }
    }

    /// Resolve selectors to issues. A bare number matches that issue in every
    /// configured repository where it exists.
    pub async fn issues_for(&self, selectors: &[IssueSelector]) -> SourceResult<Vec<Issue>> {
        let mut issues = Vec::new();
        for selector in selectors {
            match selector {
                IssueSelector::Qualified { repository, number } => {
                    issues.push(self.get_issue(repository, *number).await?);
                }
                IssueSelector::Repo { name, number } => {
                    let repository = self
                        .repositories
                        .iter()
                        .find(|r| {
                            r.rsplit('/')
                                .next()
                                .is_some_and(|n| n.eq_ignore_ascii_case(name))
                        })
                        .ok_or_else(|| SourceError::UnknownRepository(name.clone()))?;
                    issues.push(self.get_issue(repository, *number).await?);
                }
                IssueSelector::Number(number) => {
                    let before = issues.len();
                    for repository in &self.repositories {
                        match self.get_issue(repository, *number).await {
                            Ok(issue) => issues.push(issue),
                            Err(SourceError::IssueNotFound { .. }) => {}
                            Err(e) => return Err(e),
                        }
                    }
                    if issues.len() == before {
                        return Err(SourceError::IssueNotFound {
                            repository: self.repositories.join(","),
                            number: *number,
                        });
                    }
                }
            }
        }
        Ok(issues)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
    ) -> SourceResult<T> {
        let response = request.send().await?;
        let status = response.status();

        if status.is_success() {
            Ok(response.json().await?)
        } else {
            let message = response.text().await.unwrap_or_default();
            if status != StatusCode::NOT_FOUND {
                debug!(%status, url, "GitHub request failed");
            }
            Err(SourceError::GitHub {
                status: status.as_u16(),
                url: url.to_string(),
                message,
            })
        }
    }
}
