use babel_sources::{categories, GoogleSheet, SourceError, DEFAULT_SHEET_ID};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CSV: &str = "\
\"Category\",\"Passes in NodeNorm\",\"Passes in NameRes\",\"Flags\",\"Query Label\",\"Query ID\",\"Preferred ID\",\"Additional IDs\",\"Preferred Label\",\"Additional Labels\",\"Conflations\",\"Biolink Classes\",\"Prefixes\",\"Source\",\"Source URL\",\"Notes\"
\"Unit Tests\",\"y\",\"y\",\"\",\"diabetes\",\"DOID:9351\",\"MONDO:0005015\",\"\",\"diabetes mellitus\",\"\",\"\",\"biolink:Disease\",\"\",\"\",\"\",\"\"
\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\"
\"Unit Tests\",\"n\",\"y\",\"negative\",\"\",\"NOTAREALPREFIX:1\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\",\"\"
\"Drugs\",\"y\",\"n\",\"\",\"aspirin\",\"DRUGBANK:DB00945\",\"CHEBI:15365\",\"\",\"aspirin\",\"\",\"drug_chemical\",\"\",\"\",\"\",\"\",\"\"
";

fn sheet(server: &MockServer) -> GoogleSheet {
    GoogleSheet::new(DEFAULT_SHEET_ID)
        .unwrap()
        .with_base_url(&server.uri())
}

#[tokio::test]
async fn downloads_csv_export() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("/{}/gviz/tq", DEFAULT_SHEET_ID)))
        .and(query_param("tqx", "out:csv"))
        .and(query_param("sheet", "Tests"))
        .respond_with(ResponseTemplate::new(200).set_body_string(CSV))
        .expect(1)
        .mount(&server)
        .await;

    let rows = sheet(&server).test_rows().await.unwrap();
    let ids: Vec<&str> = rows.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["Tests:row=2", "Tests:row=4", "Tests:row=5"]);

    assert_eq!(rows[0].nodenorm_cases().unwrap()[0].assertion, "ResolvesWith");
    assert_eq!(rows[1].nodenorm_cases().unwrap()[0].assertion, "DoesNotResolve");
    assert_eq!(rows[2].nodenorm_cases().unwrap()[0].assertion, "Resolves");
    assert!(!rows[1].expect_pass_in_nodenorm);

    let counts = categories(&rows);
    assert_eq!(counts.get("Unit Tests"), Some(&2));
    assert_eq!(counts.get("Drugs"), Some(&1));
}

#[tokio::test]
async fn other_tabs_can_be_read() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/sheet-123/gviz/tq"))
        .and(query_param("sheet", "Regressions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("Category,Query ID\nSmoke,MONDO:0005015\n"))
        .expect(1)
        .mount(&server)
        .await;

    let rows = GoogleSheet::new("sheet-123")
        .unwrap()
        .with_base_url(&server.uri())
        .with_sheet_name("Regressions")
        .test_rows()
        .await
        .unwrap();
    assert_eq!(rows[0].id, "Regressions:row=2");
}

#[tokio::test]
async fn http_errors_are_reported() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Sheet not found"))
        .mount(&server)
        .await;

    let err = sheet(&server).fetch_csv().await.unwrap_err();
    match err {
        SourceError::Sheet { status, message, .. } => {
            assert_eq!(status, 404);
            assert_eq!(message, "Sheet not found");
        }
        other => panic!("unexpected error: {other}"),
    }
}
