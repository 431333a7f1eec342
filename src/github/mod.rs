//! GitHub integration for repository synchronization
//!
//! This module provides the REST client used to:
//! - Mint installation access tokens from a signed app assertion
//! - Fetch repository metadata (default branch)
//! - Read content metadata at a path and branch
//! - Create or update file contents

pub mod client;
pub mod types;

pub use client::GitHubClient;
pub use types::{
    ExistingBlobRef, InstallationTokenResponse, PutContentRequest, PutContentResponse,
    RepositoryInfo,
};
