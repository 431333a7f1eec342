//! GitHub API client implementation

use crate::auth::{AssertionToken, InstallationToken};
use crate::core::{SyncError, SyncResult};
use crate::di::traits::{ConfigProvider, GitHubApi};
use crate::github::types::{
    ContentMetadata, ExistingBlobRef, InstallationTokenResponse, PutContentRequest,
    PutContentResponse, RateLimit, RepositoryInfo,
};
use crate::sync::TargetRepository;
use async_trait::async_trait;
use reqwest::{header, Client as HttpClient, RequestBuilder, Response, StatusCode};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use tokio::sync::Mutex;
use tracing::debug;

const GITHUB_API_VERSION: &str = "2022-11-28";

/// GitHub API client
pub struct GitHubClient {
    http_client: HttpClient,
    api_url: String,
    rate_limiter: Arc<RateLimiter>,
}

/// Rate limiter for GitHub API
struct RateLimiter {
    remaining: Mutex<u64>,
    reset_time: Mutex<SystemTime>,
}

impl GitHubClient {
    /// Create a new GitHub client
    pub fn new(config: &dyn ConfigProvider) -> SyncResult<Self> {
        let mut headers = header::HeaderMap::new();
        headers.insert(
            header::USER_AGENT,
            header::HeaderValue::from_str(config.user_agent())
                .map_err(|e| SyncError::Config(format!("Invalid user agent: {}", e)))?,
        );
        headers.insert(
            header::ACCEPT,
            header::HeaderValue::from_static("application/vnd.github+json"),
        );
        headers.insert(
            "x-github-api-version",
            header::HeaderValue::from_static(GITHUB_API_VERSION),
        );

        let http_client = HttpClient::builder()
            .default_headers(headers)
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| SyncError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_url: config.api_url().trim_end_matches('/').to_string(),
            rate_limiter: Arc::new(RateLimiter {
                remaining: Mutex::new(5000),
                reset_time: Mutex::new(SystemTime::now() + Duration::from_secs(3600)),
            }),
        })
    }

    /// Mint an installation access token from a signed app assertion
    pub async fn create_installation_token(
        &self,
        assertion: &AssertionToken,
        installation_id: u64,
    ) -> SyncResult<InstallationTokenResponse> {
        let url = format!(
            "{}/app/installations/{}/access_tokens",
            self.api_url, installation_id
        );

        let request = self
            .http_client
            .post(&url)
            .bearer_auth(assertion.value())
            .header(header::CACHE_CONTROL, "no-cache")
            .header(header::PRAGMA, "no-cache");
        let response = self.send(request, &url).await?;

        if !response.status().is_success() {
            let detail = error_detail(response).await;
            return Err(SyncError::Auth(format!(
                "Installation token exchange for installation {} rejected: {}",
                installation_id, detail
            )));
        }

        Ok(response.json().await?)
    }

    /// Get repository information
    pub async fn get_repository(
        &self,
        token: &InstallationToken,
        owner: &str,
        name: &str,
    ) -> SyncResult<RepositoryInfo> {
        let url = format!(
            "{}/repos/{}/{}",
            self.api_url,
            urlencoding::encode(owner),
            urlencoding::encode(name)
        );

        let request = self.http_client.get(&url).bearer_auth(token.value());
        let response = self.send(request, &url).await?;

        match response.status() {
            status if status.is_success() => Ok(response.json().await?),
            StatusCode::NOT_FOUND => Err(SyncError::NotFound(format!(
                "Repository {}/{} not found or not accessible to this installation",
                owner, name
            ))),
            _ => {
                let detail = error_detail(response).await;
                Err(SyncError::Transient(format!(
                    "Failed to fetch repository {}/{}: {}",
                    owner, name, detail
                )))
            }
        }
    }

    /// Look up the current blob hash at a path on the target branch.
    ///
    /// A 404 means the path does not exist yet. Any other non-2xx status is
    /// an error, never "absent".
    pub async fn get_content(
        &self,
        token: &InstallationToken,
        repo: &TargetRepository,
        path: &str,
    ) -> SyncResult<ExistingBlobRef> {
        let url = self.contents_url(repo, path);

        let request = self
            .http_client
            .get(&url)
            .bearer_auth(token.value())
            .query(&[("ref", repo.branch.as_str())]);
        let response = self.send(request, &url).await?;

        match response.status() {
            status if status.is_success() => {
                let metadata: ContentMetadata = response.json().await.map_err(|e| {
                    SyncError::Transient(format!(
                        "Unexpected content metadata at {} (is it a directory?): {}",
                        path, e
                    ))
                })?;
                Ok(ExistingBlobRef::present(metadata.sha))
            }
            StatusCode::NOT_FOUND => Ok(ExistingBlobRef::absent()),
            _ => {
                let detail = error_detail(response).await;
                Err(SyncError::Transient(format!(
                    "Content lookup failed: {}",
                    detail
                )))
            }
        }
    }

    /// Create or update a file on the target branch
    pub async fn put_content(
        &self,
        token: &InstallationToken,
        repo: &TargetRepository,
        path: &str,
        body: &PutContentRequest,
    ) -> SyncResult<PutContentResponse> {
        let url = self.contents_url(repo, path);

        let request = self
            .http_client
            .put(&url)
            .bearer_auth(token.value())
            .json(body);
        let response = self.send(request, &url).await?;

        if !response.status().is_success() {
            let detail = error_detail(response).await;
            return Err(SyncError::Transient(format!("Content write failed: {}", detail)));
        }

        Ok(response.json().await?)
    }

    /// Current rate limit bookkeeping
    pub async fn rate_limit(&self) -> RateLimit {
        let remaining = *self.rate_limiter.remaining.lock().await;
        let reset_time = *self.rate_limiter.reset_time.lock().await;
        RateLimit {
            remaining,
            reset: reset_time
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        }
    }

    fn contents_url(&self, repo: &TargetRepository, path: &str) -> String {
        let encoded_path = path
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.api_url,
            urlencoding::encode(&repo.owner),
            urlencoding::encode(&repo.name),
            encoded_path
        )
    }

    /// Send a request, enforcing and updating the rate limit
    async fn send(&self, request: RequestBuilder, url: &str) -> SyncResult<Response> {
        self.check_rate_limit().await?;

        debug!(url, "GitHub API request");
        let response = request
            .send()
            .await
            .map_err(|e| SyncError::Network(format!("GitHub API request failed: {}", e)))?;
        debug!(url, status = %response.status(), "GitHub API response");

        self.update_rate_limit(&response).await;
        Ok(response)
    }

    /// Check if we're within rate limits
    async fn check_rate_limit(&self) -> SyncResult<()> {
        let remaining = *self.rate_limiter.remaining.lock().await;
        let reset_time = *self.rate_limiter.reset_time.lock().await;

        if remaining == 0 {
            let now = SystemTime::now();
            if now < reset_time {
                let wait_duration = reset_time.duration_since(now).unwrap_or(Duration::ZERO);
                return Err(SyncError::Transient(format!(
                    "GitHub API rate limit exceeded. Reset in {} seconds.",
                    wait_duration.as_secs()
                )));
            }
        }

        Ok(())
    }

    /// Update rate limit from response headers
    async fn update_rate_limit(&self, response: &Response) {
        if let Some(remaining) = response
            .headers()
            .get("x-ratelimit-remaining")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
        {
            *self.rate_limiter.remaining.lock().await = remaining;
        }

        if let Some(reset) = response
            .headers()
            .get("x-ratelimit-reset")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
        {
            *self.rate_limiter.reset_time.lock().await =
                SystemTime::UNIX_EPOCH + Duration::from_secs(reset);
        }
    }
}

/// "HTTP <status>: <body>" with the provider's body kept verbatim
async fn error_detail(response: Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    if body.trim().is_empty() {
        format!("HTTP {}", status)
    } else {
        format!("HTTP {}: {}", status, body.trim())
    }
}

#[async_trait]
impl GitHubApi for GitHubClient {
    async fn create_installation_token(
        &self,
        assertion: &AssertionToken,
        installation_id: u64,
    ) -> SyncResult<InstallationTokenResponse> {
        Self::create_installation_token(self, assertion, installation_id).await
    }

    async fn get_repository(
        &self,
        token: &InstallationToken,
        owner: &str,
        name: &str,
    ) -> SyncResult<RepositoryInfo> {
        Self::get_repository(self, token, owner, name).await
    }

    async fn get_content(
        &self,
        token: &InstallationToken,
        repo: &TargetRepository,
        path: &str,
    ) -> SyncResult<ExistingBlobRef> {
        Self::get_content(self, token, repo, path).await
    }

    async fn put_content(
        &self,
        token: &InstallationToken,
        repo: &TargetRepository,
        path: &str,
        body: &PutContentRequest,
    ) -> SyncResult<PutContentResponse> {
        Self::put_content(self, token, repo, path, body).await
    }
}
