//! Trait definitions for dependency injection

use crate::auth::{AssertionToken, InstallationToken};
use crate::core::SyncResult;
use crate::github::types::{
    ExistingBlobRef, InstallationTokenResponse, PutContentRequest, PutContentResponse,
    RepositoryInfo,
};
use crate::sync::TargetRepository;
use async_trait::async_trait;
use std::time::Duration;

/// Trait for configuration access
///
/// Provides read-only access to application configuration.
/// Implementations should be thread-safe (Send + Sync).
pub trait ConfigProvider: Send + Sync {
    /// GitHub REST API base URL
    fn api_url(&self) -> &str;

    /// GitHub web base URL, used for repository links
    fn web_url(&self) -> &str;

    /// Root for project-scoped destination directories
    fn projects_root(&self) -> &str;

    /// Optional commit message prefix
    fn commit_message_prefix(&self) -> Option<&str>;

    /// Files upserted concurrently per batch (at least 1)
    fn max_concurrency(&self) -> usize;

    /// Per-request HTTP timeout
    fn request_timeout(&self) -> Duration;

    /// User-Agent header value
    fn user_agent(&self) -> &str;
}

/// Trait for the GitHub REST operations the sync pipeline needs
///
/// Status classification happens behind this seam:
/// - `create_installation_token`: non-2xx is `Auth`
/// - `get_repository`: 404 is `NotFound`, other non-2xx `Transient`
/// - `get_content`: 404 is an absent blob, other non-2xx `Transient`
/// - `put_content`: non-2xx is `Transient` with the provider detail
///
/// Transport failures are `Network` everywhere.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Mint an installation token from a signed app assertion
    async fn create_installation_token(
        &self,
        assertion: &AssertionToken,
        installation_id: u64,
    ) -> SyncResult<InstallationTokenResponse>;

    /// Fetch repository metadata
    async fn get_repository(
        &self,
        token: &InstallationToken,
        owner: &str,
        name: &str,
    ) -> SyncResult<RepositoryInfo>;

    /// Look up the current blob hash at a path on the target branch
    async fn get_content(
        &self,
        token: &InstallationToken,
        repo: &TargetRepository,
        path: &str,
    ) -> SyncResult<ExistingBlobRef>;

    /// Create or update a file on the target branch
    async fn put_content(
        &self,
        token: &InstallationToken,
        repo: &TargetRepository,
        path: &str,
        body: &PutContentRequest,
    ) -> SyncResult<PutContentResponse>;
}
