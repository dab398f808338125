use compose_lint::config::lint::LintSettings;
use compose_lint::utils::error::{ErrorCategory, LintError};
use compose_lint::{source_for, Checker, ComposeManifest, ManifestSource};
use httpmock::prelude::*;
use std::time::Duration;

const DEV_STACK: &str = include_str!("../configs/dev-stack.yml");

#[tokio::test]
async fn test_fetch_and_check_remote_manifest() {
    let server = MockServer::start();
    let manifest_mock = server.mock(|when, then| {
        when.method(GET).path("/stacks/dev-stack.yml");
        then.status(200)
            .header("Content-Type", "application/yaml")
            .body(DEV_STACK);
    });

    let source = source_for(
        &server.url("/stacks/dev-stack.yml"),
        Duration::from_secs(5),
    )
    .unwrap();

    let content = source.fetch().await.unwrap();
    manifest_mock.assert();

    let manifest = ComposeManifest::from_yaml_str(&content).unwrap();
    let report = Checker::new(LintSettings::default()).run(&manifest);

    assert!(report.is_clean());
    assert_eq!(report.services_checked, 5);
}

#[tokio::test]
async fn test_remote_server_error_is_surfaced() {
    let server = MockServer::start();
    let failing_mock = server.mock(|when, then| {
        when.method(GET).path("/stacks/missing.yml");
        then.status(404);
    });

    let source = source_for(&server.url("/stacks/missing.yml"), Duration::from_secs(5)).unwrap();
    let err = source.fetch().await.unwrap_err();
    failing_mock.assert();

    match &err {
        LintError::RemoteFetchError { status, .. } => assert_eq!(*status, 404),
        other => panic!("expected RemoteFetchError, got {:?}", other),
    }
    assert_eq!(err.category(), ErrorCategory::Network);
}

#[tokio::test]
async fn test_remote_manifest_with_broken_yaml() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/stacks/broken.yml");
        then.status(200).body("services: [not: valid: yaml");
    });

    let source = source_for(&server.url("/stacks/broken.yml"), Duration::from_secs(5)).unwrap();
    let content = source.fetch().await.unwrap();

    let err = ComposeManifest::from_yaml_str(&content).unwrap_err();
    assert!(matches!(err, LintError::YamlError(_)));
}

#[tokio::test]
async fn test_origin_reports_the_url() {
    let server = MockServer::start();
    let url = server.url("/stacks/dev-stack.yml");
    let source = source_for(&url, Duration::from_secs(5)).unwrap();
    assert_eq!(source.origin(), url);
}
