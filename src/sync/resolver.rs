//! Target repository and branch resolution

use crate::auth::InstallationToken;
use crate::core::{SyncError, SyncResult};
use crate::di::traits::GitHubApi;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Repository and branch every file of a batch is written to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetRepository {
    pub owner: String,
    pub name: String,
    pub branch: String,
}

impl TargetRepository {
    pub fn new(owner: impl Into<String>, name: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            branch: branch.into(),
        }
    }

    /// `owner/name`
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Browser URL of the repository under `web_url`
    pub fn html_url(&self, web_url: &str) -> String {
        format!("{}/{}/{}", web_url.trim_end_matches('/'), self.owner, self.name)
    }
}

/// Split an `owner/name` identifier.
///
/// Exactly two non-empty segments are required. Surrounding whitespace and a
/// trailing `.git` are tolerated.
pub fn parse_repository_identifier(identifier: &str) -> SyncResult<(String, String)> {
    let trimmed = identifier.trim();
    let trimmed = trimmed.strip_suffix(".git").unwrap_or(trimmed);

    let segments: Vec<&str> = trimmed.split('/').collect();
    match segments.as_slice() {
        [owner, name] if !owner.trim().is_empty() && !name.trim().is_empty() => {
            Ok((owner.trim().to_string(), name.trim().to_string()))
        }
        _ => Err(SyncError::Validation(format!(
            "Invalid repository '{}': expected 'owner/name'",
            identifier
        ))),
    }
}

/// Resolves the branch a batch writes to
#[derive(Clone)]
pub struct RepositoryResolver {
    github: Arc<dyn GitHubApi>,
}

impl RepositoryResolver {
    pub fn new(github: Arc<dyn GitHubApi>) -> Self {
        Self { github }
    }

    /// Resolve `identifier` to a target repository.
    ///
    /// A non-empty `branch_override` is used verbatim without checking that
    /// the branch exists. Otherwise the repository's default branch is looked
    /// up; a missing repository is `NotFound`.
    pub async fn resolve(
        &self,
        identifier: &str,
        branch_override: Option<&str>,
        token: &InstallationToken,
    ) -> SyncResult<TargetRepository> {
        let (owner, name) = parse_repository_identifier(identifier)?;

        if let Some(branch) = branch_override.map(str::trim).filter(|b| !b.is_empty()) {
            debug!(repository = %identifier, branch, "Using branch override");
            return Ok(TargetRepository::new(owner, name, branch));
        }

        let info = self.github.get_repository(token, &owner, &name).await?;
        debug!(
            repository = %info.full_name,
            branch = %info.default_branch,
            private = info.private,
            url = info.html_url.as_deref().unwrap_or(""),
            "Resolved default branch"
        );
        Ok(TargetRepository::new(owner, name, info.default_branch))
    }
}
