//! Dependency injection infrastructure for repo-sync
//!
//! This module provides trait-based dependency injection so the sync
//! pipeline can run against the real GitHub API or an in-memory double.
//!
//! # Example (Production)
//! ```no_run
//! use repo_sync::di::ServiceContainer;
//!
//! # fn example() -> repo_sync::SyncResult<()> {
//! let container = ServiceContainer::new()?;
//! # Ok(())
//! # }
//! ```
//!
//! # Example (Testing)
//! ```
//! use repo_sync::auth::{AppCredential, AppTokenSigner};
//! use repo_sync::di::{ServiceContainer, mocks::*};
//! use std::sync::Arc;
//!
//! let config = Arc::new(MockConfigProvider::default());
//! let github = Arc::new(MockGitHub::new());
//! let signer = Arc::new(AppTokenSigner::new(AppCredential::new(1, "pem")));
//!
//! let container = ServiceContainer::with_providers(config, github, signer);
//! ```

pub mod container;
pub mod mocks;
pub mod traits;

// Re-export key types
pub use container::ServiceContainer;
pub use traits::{ConfigProvider, GitHubApi};
