use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::path::Path;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn babel_validate() -> Command {
    let mut cmd = Command::cargo_bin("babel-validate").expect("bin");
    cmd.env("NO_COLOR", "1")
        .env_remove("BABEL_TARGETS_FILE")
        .env_remove("GITHUB_TOKEN")
        .env_remove("RUST_LOG");
    cmd
}

fn write_targets(dir: &Path, uri: &str) -> String {
    let file = dir.join("targets.toml");
    std::fs::write(
        &file,
        format!(
            "[targets.mock]\nnodenorm_url = \"{uri}/\"\nnameres_url = \"{uri}/\"\n"
        ),
    )
    .expect("write targets");
    file.display().to_string()
}

async fn mock_nodenorm() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get_normalized_nodes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "MONDO:0005015": {
                "id": {"identifier": "MONDO:0005015", "label": "diabetes mellitus"},
                "equivalent_identifiers": [{"identifier": "MONDO:0005015"}],
                "type": ["biolink:Disease"]
            }
        })))
        .mount(&server)
        .await;
    server
}

/// Run `check` against the mock target and return the exit code and the
/// JSON report.
async fn run_check(server: &MockServer, args: &[&str]) -> (Option<i32>, Value) {
    let dir = tempfile::tempdir().expect("tempdir");
    let targets = write_targets(dir.path(), &server.uri());

    let mut cmd = babel_validate();
    cmd.args(["--targets-file", &targets, "--target", "mock", "--output", "json", "check"])
        .args(args);

    let output = tokio::task::spawn_blocking(move || cmd.output().expect("run"))
        .await
        .expect("join");
    let report = serde_json::from_slice(&output.stdout).expect("json report");
    (output.status.code(), report)
}

#[test]
fn help_lists_commands() {
    babel_validate()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("check"))
        .stdout(predicate::str::contains("issues"))
        .stdout(predicate::str::contains("sheet"))
        .stdout(predicate::str::contains("docs"));
}

#[test]
fn targets_lists_builtin_deployments() {
    babel_validate()
        .args(["--output", "json", "targets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("https://nodenorm.transltr.io/"))
        .stdout(predicate::str::contains("\"name\": \"dev\""));
}

#[test]
fn targets_file_adds_targets() {
    let dir = tempfile::tempdir().expect("tempdir");
    let targets = write_targets(dir.path(), "http://localhost:9999");

    babel_validate()
        .args(["--targets-file", &targets, "--output", "json", "targets"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"mock\""))
        .stdout(predicate::str::contains("\"name\": \"prod\""));
}

#[test]
fn unknown_target_is_an_error() {
    babel_validate()
        .args(["--target", "staging", "check", "Resolves", "MONDO:0005015"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown target 'staging'"));
}

#[test]
fn docs_prints_readme() {
    babel_validate()
        .arg("docs")
        .assert()
        .success()
        .stdout(predicate::str::contains("# BabelTest Assertion Types"))
        .stdout(predicate::str::contains("SearchByName"));
}

#[test]
fn docs_check_rejects_stale_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let readme = dir.path().join("README.md");
    std::fs::write(&readme, "stale\n").expect("write");

    babel_validate()
        .args(["docs", "--check", "--path"])
        .arg(&readme)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("is out of date"));
}

#[test]
fn issues_requires_token() {
    babel_validate()
        .args(["issues", "--issue", "NCATSTranslator/Babel#1"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no GitHub authentication token"));
}

#[tokio::test(flavor = "multi_thread")]
async fn check_passes_against_mock_target() {
    let server = mock_nodenorm().await;
    let (code, report) = run_check(&server, &["Resolves", "MONDO:0005015"]).await;

    assert_eq!(code, Some(0));
    assert_eq!(report["summary"]["passed"], 1);
    assert_eq!(report["targets"][0]["name"], "mock");
    assert_eq!(report["entries"][0]["outcome"], "passed");
}

#[tokio::test(flavor = "multi_thread")]
async fn failing_check_exits_with_one() {
    let server = mock_nodenorm().await;
    let (code, report) = run_check(&server, &["DoesNotResolve", "MONDO:0005015"]).await;

    assert_eq!(code, Some(1));
    assert_eq!(report["summary"]["failed"], 1);
    assert_eq!(report["summary"]["success"], false);
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_assertion_is_reported_as_errored() {
    let server = mock_nodenorm().await;
    let (code, report) = run_check(&server, &["ResolvesTo", "MONDO:0005015"]).await;

    assert_eq!(code, Some(1));
    assert_eq!(report["entries"][0]["outcome"], "errored");
}

async fn mount_sheet(server: &MockServer, csv: &str) {
    Mock::given(method("GET"))
        .and(path("/sheet-1/gviz/tq"))
        .and(query_param("tqx", "out:csv"))
        .respond_with(ResponseTemplate::new(200).set_body_string(csv))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn sheet_lists_categories() {
    let server = MockServer::start().await;
    mount_sheet(
        &server,
        "Category,Query ID\nUnit Tests,MONDO:0005015\nUnit Tests,DOID:9351\nDrugs,CHEBI:15365\n",
    )
    .await;

    let mut cmd = babel_validate();
    cmd.args(["--output", "json", "sheet", "--sheet-id", "sheet-1", "--list-categories", "--sheet-url"])
        .arg(server.uri());
    let output = tokio::task::spawn_blocking(move || cmd.output().expect("run"))
        .await
        .expect("join");

    assert_eq!(output.status.code(), Some(0));
    let listed: Value = serde_json::from_slice(&output.stdout).expect("json");
    assert_eq!(listed[0]["category"], "Drugs");
    assert_eq!(listed[1]["category"], "Unit Tests");
    assert_eq!(listed[1]["rows"], 2);
}

#[tokio::test(flavor = "multi_thread")]
async fn sheet_row_passing_unexpectedly_fails_the_run() {
    let server = mock_nodenorm().await;
    mount_sheet(
        &server,
        "Category,Passes in NodeNorm,Query ID,Preferred ID\nSmoke,n,MONDO:0005015,MONDO:0005015\n",
    )
    .await;
    let dir = tempfile::tempdir().expect("tempdir");
    let targets = write_targets(dir.path(), &server.uri());

    let mut cmd = babel_validate();
    cmd.args(["--targets-file", &targets, "--target", "mock", "--output", "json"])
        .args(["sheet", "--sheet-id", "sheet-1", "--service", "nodenorm", "--sheet-url"])
        .arg(server.uri());
    let output = tokio::task::spawn_blocking(move || cmd.output().expect("run"))
        .await
        .expect("join");
    let report: Value = serde_json::from_slice(&output.stdout).expect("json report");

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(report["entries"][0]["name"], "Tests:row=2 NodeNorm");
    assert_eq!(report["entries"][0]["outcome"], "unexpected_pass");
    assert_eq!(report["entries"][0]["strict"], true);
    assert_eq!(report["summary"]["unexpected_passes"], 1);
}
