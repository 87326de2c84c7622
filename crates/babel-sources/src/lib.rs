//! Babel Validation sources
//!
//! Where test cases and deployments come from:
//!
//! - **extract**: wiki and YAML test declarations in issue bodies
//! - **github**: issues fetched from the GitHub REST API
//! - **sheet**: curated test rows from a Google Sheet
//! - **targets**: named NodeNorm/NameRes deployment pairs

#![deny(unsafe_code)]

pub mod error;
pub mod extract;
pub mod github;
pub mod sheet;
pub mod targets;

pub use error::{SourceError, SourceResult};
pub use extract::{extract_test_cases, has_test_declarations};
pub use github::{GitHubIssues, Issue, IssueSelector, IssueState, DEFAULT_REPOSITORIES};
pub use sheet::{categories, parse_test_rows, GoogleSheet, TestRow, DEFAULT_SHEET_ID};
pub use targets::{Target, TargetsConfig, ALL_TARGETS, DEFAULT_TARGET};
