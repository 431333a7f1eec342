//! Common utilities for integration tests

use serde_json::json;
use std::process::Command;
use std::path::Path;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const APP_KEY_PATH: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/app_key.pem");

pub fn repo_sync_command() -> Command {
    Command::new(env!("CARGO_BIN_EXE_repo-sync"))
}

/// A command whose config directory lives under `home` and whose app
/// credentials point at the test fixture
pub fn isolated_command(home: &Path, api_url: &str) -> Command {
    let mut cmd = repo_sync_command();
    cmd.env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join(".config"))
        .env("GITHUB_APP_ID", "4242")
        .env("GITHUB_APP_PRIVATE_KEY_PATH", APP_KEY_PATH)
        .env_remove("GITHUB_APP_PRIVATE_KEY")
        .env("REPO_SYNC_API_URL", api_url)
        .env("RUST_LOG", "off");
    cmd
}

/// Token exchange plus a repository whose default branch is `main`
pub async fn mount_app_and_repo(server: &MockServer, installation_id: u64) {
    Mock::given(method("POST"))
        .and(path(format!(
            "/app/installations/{}/access_tokens",
            installation_id
        )))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "token": "ghs_integration",
            "expires_at": "2099-01-01T00:00:00Z",
            "permissions": { "contents": "write" },
            "repository_selection": "selected"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/acme/site"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "site",
            "full_name": "acme/site",
            "default_branch": "main",
            "html_url": "https://github.com/acme/site",
            "private": true
        })))
        .mount(server)
        .await;
}

/// Every contents probe answers 404 and every write succeeds
pub async fn mount_empty_contents(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path_regex(r"^/repos/acme/site/contents/.+$"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .mount(server)
        .await;

    Mock::given(method("PUT"))
        .and(path_regex(r"^/repos/acme/site/contents/.+$"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "content": { "sha": "blob1", "path": "x", "type": "file" },
            "commit": { "sha": "commit1", "html_url": "https://github.com/acme/site/commit/commit1" }
        })))
        .mount(server)
        .await;
}
