//! Mock implementations of service traits for testing

use super::traits::{ConfigProvider, GitHubApi};
use crate::auth::{AssertionToken, InstallationToken};
use crate::core::{SyncError, SyncResult};
use crate::github::types::{
    CommitRef, ContentMetadata, ExistingBlobRef, InstallationTokenResponse, PutContentRequest,
    PutContentResponse, RepositoryInfo,
};
use crate::sync::TargetRepository;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Mock configuration provider for testing
///
/// # Example
///
/// ```
/// use repo_sync::di::mocks::MockConfigProvider;
/// use repo_sync::di::ConfigProvider;
///
/// let mut config = MockConfigProvider::default();
/// config.max_concurrency = 4;
///
/// assert_eq!(config.max_concurrency(), 4);
/// ```
#[derive(Clone)]
pub struct MockConfigProvider {
    pub api_url: String,
    pub web_url: String,
    pub projects_root: String,
    pub commit_message_prefix: Option<String>,
    pub max_concurrency: usize,
    pub request_timeout: Duration,
    pub user_agent: String,
}

impl Default for MockConfigProvider {
    fn default() -> Self {
        Self {
            api_url: "https://api.github.test".to_string(),
            web_url: "https://github.test".to_string(),
            projects_root: "projects".to_string(),
            commit_message_prefix: None,
            max_concurrency: 1,
            request_timeout: Duration::from_secs(5),
            user_agent: "repo-sync-test".to_string(),
        }
    }
}

impl ConfigProvider for MockConfigProvider {
    fn api_url(&self) -> &str {
        &self.api_url
    }

    fn web_url(&self) -> &str {
        &self.web_url
    }

    fn projects_root(&self) -> &str {
        &self.projects_root
    }

    fn commit_message_prefix(&self) -> Option<&str> {
        self.commit_message_prefix.as_deref()
    }

    fn max_concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }

    fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }
}

/// A write recorded by [`MockGitHub`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommit {
    pub repository: String,
    pub branch: String,
    pub path: String,
    pub message: String,
    pub prior_sha: Option<String>,
    pub content: Vec<u8>,
}

#[derive(Default)]
struct MockState {
    /// full name -> default branch
    repositories: HashMap<String, String>,
    /// (full name, branch, path) -> (blob sha, content)
    files: HashMap<(String, String, String), (String, Vec<u8>)>,
    failing_probes: HashMap<String, u16>,
    failing_writes: HashMap<String, u16>,
    token_rejection: Option<u16>,
    commits: Vec<RecordedCommit>,
    next_sha: u64,
}

/// In-memory GitHub for testing
///
/// Behaves like the contents API: a write to an existing path must carry
/// the current blob hash, and every call is counted.
///
/// # Example
///
/// ```
/// use repo_sync::di::mocks::MockGitHub;
///
/// let github = MockGitHub::new();
/// github.add_repository("acme/site", "main");
/// github.add_file("acme/site", "main", "README.md", b"hello");
///
/// assert_eq!(github.call_count(), 0);
/// ```
#[derive(Clone)]
pub struct MockGitHub {
    state: Arc<Mutex<MockState>>,
    calls: Arc<AtomicUsize>,
}

impl MockGitHub {
    /// Create a new mock GitHub with no repositories
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Register a repository and its default branch
    pub fn add_repository(&self, full_name: &str, default_branch: &str) {
        self.state
            .lock()
            .unwrap()
            .repositories
            .insert(full_name.to_string(), default_branch.to_string());
    }

    /// Seed an existing file
    pub fn add_file(&self, full_name: &str, branch: &str, path: &str, content: &[u8]) {
        let mut state = self.state.lock().unwrap();
        let sha = next_sha(&mut state);
        state.files.insert(
            (full_name.to_string(), branch.to_string(), path.to_string()),
            (sha, content.to_vec()),
        );
    }

    /// Make the existence probe for `path` fail with `status`
    pub fn fail_probe(&self, path: &str, status: u16) {
        self.state
            .lock()
            .unwrap()
            .failing_probes
            .insert(path.to_string(), status);
    }

    /// Make the write for `path` fail with `status`
    pub fn fail_write(&self, path: &str, status: u16) {
        self.state
            .lock()
            .unwrap()
            .failing_writes
            .insert(path.to_string(), status);
    }

    /// Reject installation token requests with `status`
    pub fn reject_token(&self, status: u16) {
        self.state.lock().unwrap().token_rejection = Some(status);
    }

    /// Total number of API calls made
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// All successful writes, in order
    pub fn commits(&self) -> Vec<RecordedCommit> {
        self.state.lock().unwrap().commits.clone()
    }

    /// Current content of a file, if present
    pub fn file_content(&self, full_name: &str, branch: &str, path: &str) -> Option<Vec<u8>> {
        self.state
            .lock()
            .unwrap()
            .files
            .get(&(full_name.to_string(), branch.to_string(), path.to_string()))
            .map(|(_, content)| content.clone())
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

impl Default for MockGitHub {
    fn default() -> Self {
        Self::new()
    }
}

fn next_sha(state: &mut MockState) -> String {
    state.next_sha += 1;
    format!("blob{:04}", state.next_sha)
}

#[async_trait]
impl GitHubApi for MockGitHub {
    async fn create_installation_token(
        &self,
        _assertion: &AssertionToken,
        installation_id: u64,
    ) -> SyncResult<InstallationTokenResponse> {
        self.record_call();
        if let Some(status) = self.state.lock().unwrap().token_rejection {
            return Err(SyncError::Auth(format!(
                "Installation token exchange for installation {} rejected: HTTP {}",
                installation_id, status
            )));
        }

        Ok(InstallationTokenResponse {
            token: format!("ghs_mock_{}", installation_id),
            expires_at: Utc::now() + ChronoDuration::hours(1),
            permissions: HashMap::new(),
            repository_selection: None,
        })
    }

    async fn get_repository(
        &self,
        _token: &InstallationToken,
        owner: &str,
        name: &str,
    ) -> SyncResult<RepositoryInfo> {
        self.record_call();
        let full_name = format!("{}/{}", owner, name);
        let state = self.state.lock().unwrap();
        match state.repositories.get(&full_name) {
            Some(default_branch) => Ok(RepositoryInfo {
                name: name.to_string(),
                full_name,
                default_branch: default_branch.clone(),
                html_url: None,
                private: true,
            }),
            None => Err(SyncError::NotFound(format!(
                "Repository {} not found or not accessible to this installation",
                full_name
            ))),
        }
    }

    async fn get_content(
        &self,
        _token: &InstallationToken,
        repo: &TargetRepository,
        path: &str,
    ) -> SyncResult<ExistingBlobRef> {
        self.record_call();
        let state = self.state.lock().unwrap();
        if let Some(status) = state.failing_probes.get(path) {
            return Err(SyncError::Transient(format!(
                "Content lookup failed: HTTP {}",
                status
            )));
        }

        let key = (repo.full_name(), repo.branch.clone(), path.to_string());
        Ok(match state.files.get(&key) {
            Some((sha, _)) => ExistingBlobRef::present(sha.clone()),
            None => ExistingBlobRef::absent(),
        })
    }

    async fn put_content(
        &self,
        _token: &InstallationToken,
        repo: &TargetRepository,
        path: &str,
        body: &PutContentRequest,
    ) -> SyncResult<PutContentResponse> {
        self.record_call();
        let mut state = self.state.lock().unwrap();
        if let Some(status) = state.failing_writes.get(path) {
            return Err(SyncError::Transient(format!(
                "Content write failed: HTTP {}",
                status
            )));
        }

        let key = (repo.full_name(), repo.branch.clone(), path.to_string());
        let current = state.files.get(&key).map(|(sha, _)| sha.clone());
        match (&current, &body.sha) {
            (Some(_), None) => {
                return Err(SyncError::Transient(format!(
                    "Content write failed: HTTP 422: \"sha\" wasn't supplied for {}",
                    path
                )))
            }
            (current, Some(prior)) if current.as_ref() != Some(prior) => {
                return Err(SyncError::Transient(format!(
                    "Content write failed: HTTP 409: {} does not match {}",
                    path, prior
                )))
            }
            _ => {}
        }

        let content = body
            .decoded_content()
            .ok_or_else(|| SyncError::Transient("Content is not valid base64".to_string()))?;
        let sha = next_sha(&mut state);
        state.files.insert(key, (sha.clone(), content.clone()));
        state.commits.push(RecordedCommit {
            repository: repo.full_name(),
            branch: repo.branch.clone(),
            path: path.to_string(),
            message: body.message.clone(),
            prior_sha: body.sha.clone(),
            content,
        });
        let commit_sha = format!("commit{:04}", state.commits.len());

        Ok(PutContentResponse {
            content: Some(ContentMetadata {
                sha,
                path: path.to_string(),
                kind: Some("file".to_string()),
            }),
            commit: CommitRef {
                sha: commit_sha,
                html_url: None,
            },
        })
    }
}
