//! Library-level batch flow against a mock GitHub API

use super::common::{mount_app_and_repo, APP_KEY_PATH};
use repo_sync::config::Config;
use repo_sync::core::SyncError;
use repo_sync::di::ServiceContainer;
use repo_sync::sync::{BatchRequest, BatchSyncOrchestrator, CommitStatus, FileChange};
use serde_json::json;
use std::path::PathBuf;
use wiremock::matchers::{body_partial_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn orchestrator(server: &MockServer) -> BatchSyncOrchestrator {
    let config = Config {
        api_url: server.uri(),
        web_url: "https://github.com".to_string(),
        app_id: Some(4242),
        private_key_path: Some(PathBuf::from(APP_KEY_PATH)),
        ..Config::default()
    };
    BatchSyncOrchestrator::new(ServiceContainer::from_config(config).unwrap())
}

fn request(files: Vec<FileChange>) -> BatchRequest {
    BatchRequest {
        installation_id: 7,
        repository: "acme/site".to_string(),
        files,
        ..BatchRequest::default()
    }
}

#[tokio::test]
async fn test_batch_creates_and_updates_with_partial_failure() {
    let server = MockServer::start().await;
    mount_app_and_repo(&server, 7).await;

    // README.md exists, new.txt does not, broken.txt is rejected on write
    Mock::given(method("GET"))
        .and(path("/repos/acme/site/contents/README.md"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sha": "readme-sha", "path": "README.md", "type": "file"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path_regex(r"^/repos/acme/site/contents/(new|broken)\.txt$"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/repos/acme/site/contents/README.md"))
        .and(header("authorization", "Bearer ghs_integration"))
        .and(body_partial_json(json!({
            "message": "Update README.md",
            "branch": "main",
            "sha": "readme-sha"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "commit": { "sha": "c1" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/repos/acme/site/contents/new.txt"))
        .and(body_partial_json(json!({ "message": "Add new.txt", "branch": "main" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "commit": { "sha": "c2" }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/repos/acme/site/contents/broken.txt"))
        .respond_with(
            ResponseTemplate::new(422).set_body_json(json!({ "message": "Invalid request" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let result = orchestrator(&server)
        .run(request(vec![
            FileChange::new("README.md", "# Site"),
            FileChange::new("broken.txt", "x"),
            FileChange::new("new.txt", "hello"),
            FileChange::new("empty.txt", ""),
        ]))
        .await
        .unwrap();

    assert!(result.ok);
    assert_eq!(result.pushed_count, 2);
    assert_eq!(result.target_branch, "main");
    assert_eq!(result.repository_url, "https://github.com/acme/site");
    assert_eq!(result.errors.len(), 1);
    assert!(result.errors[0].starts_with("broken.txt: "));
    assert!(result.errors[0].contains("422"));

    let statuses: Vec<CommitStatus> = result.outcomes.iter().map(|o| o.status).collect();
    assert_eq!(
        statuses,
        vec![CommitStatus::Updated, CommitStatus::Failed, CommitStatus::Created]
    );
}

#[tokio::test]
async fn test_branch_override_skips_default_branch_lookup() {
    let server = MockServer::start().await;
    mount_app_and_repo(&server, 7).await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/site/contents/a.txt"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/repos/acme/site/contents/a.txt"))
        .and(body_partial_json(json!({ "branch": "preview" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "commit": { "sha": "c1" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut batch = request(vec![FileChange::new("a.txt", "x")]);
    batch.branch = Some("preview".to_string());
    let result = orchestrator(&server).run(batch).await.unwrap();

    assert_eq!(result.target_branch, "preview");
    let requests = server.received_requests().await.unwrap();
    assert!(!requests
        .iter()
        .any(|r| r.method.as_str() == "GET" && r.url.path() == "/repos/acme/site"));
}

#[tokio::test]
async fn test_rejected_token_attempts_no_file() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/app/installations/7/access_tokens"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "A JSON web token could not be decoded"
        })))
        .mount(&server)
        .await;

    let err = orchestrator(&server)
        .run(request(vec![FileChange::new("a.txt", "x")]))
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::Auth(_)));
    assert!(err.to_string().contains("401"));

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_missing_repository_is_not_found() {
    let server = MockServer::start().await;
    mount_app_and_repo(&server, 7).await;

    let mut batch = request(vec![FileChange::new("a.txt", "x")]);
    batch.repository = "acme/missing".to_string();

    Mock::given(method("GET"))
        .and(path("/repos/acme/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let err = orchestrator(&server).run(batch).await.unwrap_err();
    assert!(matches!(err, SyncError::NotFound(_)));
    assert_eq!(err.http_status(), 404);
}
