//! Batch synchronization entry point

use crate::auth::InstallationTokenExchanger;
use crate::core::path::{join_repo_path, normalize_repo_path};
use crate::core::{SyncError, SyncResult};
use crate::di::ServiceContainer;
use crate::sync::files::FileChange;
use crate::sync::resolver::{parse_repository_identifier, RepositoryResolver};
use crate::sync::upserter::{CommitOutcome, ContentUpserter};
use futures::stream::{self, StreamExt};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Everything one batch needs from its caller
#[derive(Debug, Clone, Default)]
pub struct BatchRequest {
    pub installation_id: u64,
    /// `owner/name`
    pub repository: String,
    pub files: Vec<FileChange>,
    pub destination_dir: Option<String>,
    pub branch: Option<String>,
    /// Used for the default destination `<projects_root>/<project_id>`
    pub project_id: Option<String>,
}

/// Aggregate result of one batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    pub ok: bool,
    pub pushed_count: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    pub repository_url: String,
    pub target_branch: String,
    pub project_path: String,
    #[serde(skip)]
    pub outcomes: Vec<CommitOutcome>,
}

impl BatchResult {
    /// True when no file was attempted (every entry had empty content)
    pub fn nothing_attempted(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// True when files were attempted and all of them failed
    pub fn all_failed(&self) -> bool {
        self.pushed_count == 0 && !self.errors.is_empty()
    }

    /// HTTP status for the push endpoint: 500 when every attempted file failed
    pub fn http_status(&self) -> u16 {
        if self.all_failed() {
            500
        } else {
            200
        }
    }
}

/// Drives token exchange, branch resolution, and per-file upserts
#[derive(Clone)]
pub struct BatchSyncOrchestrator {
    container: ServiceContainer,
    exchanger: InstallationTokenExchanger,
    resolver: RepositoryResolver,
    upserter: ContentUpserter,
}

impl BatchSyncOrchestrator {
    pub fn new(container: ServiceContainer) -> Self {
        let exchanger =
            InstallationTokenExchanger::new(container.signer.clone(), container.github.clone());
        let resolver = RepositoryResolver::new(container.github.clone());
        let upserter = ContentUpserter::new(
            container.github.clone(),
            container
                .config()
                .commit_message_prefix()
                .map(str::to_string),
        );

        Self {
            container,
            exchanger,
            resolver,
            upserter,
        }
    }

    /// Push a file set into the target repository.
    ///
    /// Setup failures (validation, token exchange, repository resolution)
    /// return `Err` before any file is attempted. Per-file failures are
    /// recorded in the result and never abort sibling files. Files already
    /// pushed stay committed.
    pub async fn run(&self, request: BatchRequest) -> SyncResult<BatchResult> {
        validate(&request)?;

        let project_path = self.project_path(&request);
        let (changes, skipped) = plan_changes(request.files, &project_path);

        let token = self.exchanger.exchange(request.installation_id).await?;
        let target = self
            .resolver
            .resolve(&request.repository, request.branch.as_deref(), &token)
            .await?;

        info!(
            repository = %target.full_name(),
            branch = %target.branch,
            files = changes.len(),
            skipped,
            "Starting batch"
        );

        // Each path appears once in `changes`, so its probe and write stay paired.
        let jobs = changes.into_iter().map(|change| {
            let upserter = self.upserter.clone();
            let target = target.clone();
            let token = token.clone();
            async move { upserter.upsert(&change, &target, &token).await }
        });
        let outcomes: Vec<CommitOutcome> = stream::iter(jobs)
            .buffered(self.container.config().max_concurrency())
            .collect()
            .await;

        let pushed_count = outcomes.iter().filter(|o| o.is_success()).count();
        let errors: Vec<String> = outcomes
            .iter()
            .filter(|o| !o.is_success())
            .map(|o| {
                format!(
                    "{}: {}",
                    o.path,
                    o.error.as_deref().unwrap_or("unknown error")
                )
            })
            .collect();

        if errors.is_empty() {
            info!(pushed = pushed_count, "Batch complete");
        } else {
            warn!(pushed = pushed_count, failed = errors.len(), "Batch finished with failures");
        }

        Ok(BatchResult {
            ok: pushed_count > 0,
            pushed_count,
            errors,
            repository_url: target.html_url(self.container.config().web_url()),
            target_branch: target.branch.clone(),
            project_path,
            outcomes,
        })
    }

    /// Destination prefix: explicit directory, else the project directory,
    /// else the repository root
    fn project_path(&self, request: &BatchRequest) -> String {
        let destination = request
            .destination_dir
            .as_deref()
            .map(normalize_repo_path)
            .filter(|dir| !dir.is_empty());

        match (destination, request.project_id.as_deref()) {
            (Some(dir), _) => dir,
            (None, Some(project)) if !project.trim().is_empty() => {
                join_repo_path(self.container.config().projects_root(), project.trim())
            }
            _ => String::new(),
        }
    }
}

fn validate(request: &BatchRequest) -> SyncResult<()> {
    if request.installation_id == 0 {
        return Err(SyncError::Validation(
            "GitHub App installation id is required".to_string(),
        ));
    }
    if request.repository.trim().is_empty() {
        return Err(SyncError::Validation("Repository is required".to_string()));
    }
    parse_repository_identifier(&request.repository)?;

    if request.files.is_empty() {
        return Err(SyncError::Validation("No files to push".to_string()));
    }
    // Empty entries are skipped later, whatever their path
    if let Some(file) = request
        .files
        .iter()
        .find(|f| f.path.is_empty() && !f.is_empty())
    {
        return Err(SyncError::Validation(format!(
            "File path must not be empty ({} bytes of content)",
            file.content.len()
        )));
    }
    Ok(())
}

/// Drop empty files and prefix paths. Duplicate effective paths keep the
/// first position with the last content, so a path has one writer per batch.
fn plan_changes(files: Vec<FileChange>, project_path: &str) -> (Vec<FileChange>, usize) {
    let mut planned: Vec<FileChange> = Vec::with_capacity(files.len());
    let mut positions: HashMap<String, usize> = HashMap::new();
    let mut skipped = 0;

    for file in files {
        if file.is_empty() {
            info!(path = %file.path, "Skipping empty file");
            skipped += 1;
            continue;
        }

        let path = join_repo_path(project_path, &file.path);
        match positions.get(&path) {
            Some(&index) => {
                debug!(path = %path, "Duplicate path in batch, last entry wins");
                planned[index].content = file.content;
            }
            None => {
                positions.insert(path.clone(), planned.len());
                planned.push(FileChange {
                    path,
                    content: file.content,
                });
            }
        }
    }

    (planned, skipped)
}
