//! Service container for dependency injection

use super::traits::{ConfigProvider, GitHubApi};
use crate::auth::AppTokenSigner;
use crate::config::Config;
use crate::core::SyncResult;
use crate::github::GitHubClient;
use std::sync::Arc;

/// Service container for dependency injection
///
/// Holds the configuration, the GitHub API implementation, and the app
/// assertion signer behind `Arc`s so a container can be cloned cheaply into
/// request handlers.
///
/// # Example (Production)
///
/// ```no_run
/// use repo_sync::di::ServiceContainer;
///
/// # fn example() -> repo_sync::SyncResult<()> {
/// let container = ServiceContainer::new()?;
/// println!("API: {}", container.config().api_url());
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct ServiceContainer {
    pub config: Arc<dyn ConfigProvider>,
    pub github: Arc<dyn GitHubApi>,
    pub signer: Arc<AppTokenSigner>,
}

impl ServiceContainer {
    /// Create a new service container with production implementations
    ///
    /// - Loads config from disk plus environment overrides
    /// - Reads the GitHub App credential
    /// - Initializes the HTTP client for the GitHub API
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Config file cannot be loaded or created
    /// - App id or private key are not configured
    /// - The HTTP client cannot be built
    pub fn new() -> SyncResult<Self> {
        let config = Config::load()?;
        Self::from_config(config)
    }

    /// Create a service container from an already-loaded config
    pub fn from_config(config: Config) -> SyncResult<Self> {
        let credential = config.app_credential()?;
        let github = GitHubClient::new(&config)?;

        Ok(Self {
            config: Arc::new(config),
            github: Arc::new(github),
            signer: Arc::new(AppTokenSigner::new(credential)),
        })
    }

    /// Create a service container with custom provider implementations
    ///
    /// This is primarily useful for testing, where you can inject mock
    /// implementations of each service.
    pub fn with_providers(
        config: Arc<dyn ConfigProvider>,
        github: Arc<dyn GitHubApi>,
        signer: Arc<AppTokenSigner>,
    ) -> Self {
        Self {
            config,
            github,
            signer,
        }
    }

    /// Get the configuration provider
    pub fn config(&self) -> &dyn ConfigProvider {
        self.config.as_ref()
    }

    /// Get the app assertion signer
    pub fn signer(&self) -> &AppTokenSigner {
        self.signer.as_ref()
    }
}
