//! Tests for `repo-sync push`

use super::common::{isolated_command, mount_app_and_repo, mount_empty_contents};
use std::fs;
use tempfile::TempDir;
use wiremock::MockServer;

fn project_dir() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::create_dir_all(temp.path().join("src")).unwrap();
    fs::write(temp.path().join("index.html"), "<html></html>").unwrap();
    fs::write(temp.path().join("src/app.js"), "run()").unwrap();
    temp
}

#[test]
fn test_push_invalid_repository_is_validation_failure() {
    let home = TempDir::new().unwrap();
    let project = project_dir();

    let output = isolated_command(home.path(), "http://127.0.0.1:9")
        .arg("push")
        .arg(project.path())
        .args(["--repo", "acme", "--installation-id", "7"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("owner/name"));
}

#[test]
fn test_push_missing_directory_is_validation_failure() {
    let home = TempDir::new().unwrap();

    let output = isolated_command(home.path(), "http://127.0.0.1:9")
        .arg("push")
        .arg(home.path().join("does-not-exist"))
        .args(["--repo", "acme/site", "--installation-id", "7"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_push_without_app_id_is_config_failure() {
    let home = TempDir::new().unwrap();
    let project = project_dir();

    let output = isolated_command(home.path(), "http://127.0.0.1:9")
        .env_remove("GITHUB_APP_ID")
        .arg("push")
        .arg(project.path())
        .args(["--repo", "acme/site", "--installation-id", "7"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("GITHUB_APP_ID"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_push_directory_end_to_end() {
    let server = MockServer::start().await;
    mount_app_and_repo(&server, 7).await;
    mount_empty_contents(&server).await;

    let home = TempDir::new().unwrap();
    let project = project_dir();
    let mut cmd = isolated_command(home.path(), &server.uri());
    cmd.arg("push")
        .arg(project.path())
        .args(["--repo", "acme/site", "--installation-id", "7", "--dest", "apps/demo"]);

    let output = tokio::task::spawn_blocking(move || cmd.output().unwrap())
        .await
        .unwrap();

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Pushed 2 file(s)"));
    assert!(stdout.contains("apps/demo/src/app.js"));

    let requests = server.received_requests().await.unwrap();
    let writes: Vec<_> = requests
        .iter()
        .filter(|r| r.method.as_str() == "PUT")
        .map(|r| r.url.path().to_string())
        .collect();
    assert_eq!(
        writes,
        vec![
            "/repos/acme/site/contents/apps/demo/index.html",
            "/repos/acme/site/contents/apps/demo/src/app.js",
        ]
    );
}
