//! Per-file create-or-update

use crate::auth::InstallationToken;
use crate::di::traits::GitHubApi;
use crate::github::types::PutContentRequest;
use crate::sync::files::FileChange;
use crate::sync::resolver::TargetRepository;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitStatus {
    Created,
    Updated,
    Failed,
}

impl std::fmt::Display for CommitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommitStatus::Created => write!(f, "created"),
            CommitStatus::Updated => write!(f, "updated"),
            CommitStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Result of one file's upsert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitOutcome {
    pub path: String,
    pub status: CommitStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_sha: Option<String>,
}

impl CommitOutcome {
    pub fn failed(path: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            status: CommitStatus::Failed,
            error: Some(error.into()),
            commit_sha: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status, CommitStatus::Created | CommitStatus::Updated)
    }
}

/// Probes a path for its current blob hash, then creates or updates it
#[derive(Clone)]
pub struct ContentUpserter {
    github: Arc<dyn GitHubApi>,
    commit_message_prefix: Option<String>,
}

impl ContentUpserter {
    pub fn new(github: Arc<dyn GitHubApi>, commit_message_prefix: Option<String>) -> Self {
        Self {
            github,
            commit_message_prefix,
        }
    }

    /// Upsert one file. Never fails as a whole: errors become a `Failed` outcome.
    ///
    /// Only a confirmed 404 from the probe counts as "absent"; any other probe
    /// error fails the file without attempting a write.
    pub async fn upsert(
        &self,
        file: &FileChange,
        repo: &TargetRepository,
        token: &InstallationToken,
    ) -> CommitOutcome {
        if token.is_expired() {
            return CommitOutcome::failed(&file.path, "installation token expired");
        }

        let existing = match self.github.get_content(token, repo, &file.path).await {
            Ok(existing) => existing,
            Err(e) => {
                warn!(path = %file.path, error = %e, "Existence probe failed, skipping write");
                return CommitOutcome::failed(&file.path, e.to_string());
            }
        };

        let (status, verb) = match existing.sha {
            Some(_) => (CommitStatus::Updated, "Update"),
            None => (CommitStatus::Created, "Add"),
        };
        let body = PutContentRequest::new(
            self.commit_message(verb, &file.path),
            &file.content,
            &repo.branch,
            existing.sha,
        );

        if token.is_expired() {
            return CommitOutcome::failed(&file.path, "installation token expired");
        }

        match self.github.put_content(token, repo, &file.path, &body).await {
            Ok(response) => {
                debug!(path = %file.path, %status, commit = %response.commit.sha, "File written");
                CommitOutcome {
                    path: file.path.clone(),
                    status,
                    error: None,
                    commit_sha: Some(response.commit.sha),
                }
            }
            Err(e) => {
                warn!(path = %file.path, error = %e, "Write failed");
                CommitOutcome::failed(&file.path, e.to_string())
            }
        }
    }

    fn commit_message(&self, verb: &str, path: &str) -> String {
        match self.commit_message_prefix.as_deref() {
            Some(prefix) if !prefix.trim().is_empty() => {
                format!("{} {} {}", prefix.trim(), verb, path)
            }
            _ => format!("{} {}", verb, path),
        }
    }
}
