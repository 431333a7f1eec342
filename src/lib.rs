//! repo-sync: push generated project files into GitHub repositories
//!
//! This crate authenticates as a GitHub App, exchanges the app identity for
//! an installation token, resolves the target branch, and upserts a batch of
//! files with per-file failure isolation. Core error and path utilities are
//! re-exported from `sync-core`.

pub use sync_core::{CredentialStore, SyncError, SyncResult};

/// Core module re-exported from sync-core.
pub mod core {
    pub use sync_core::core::*;
    pub use sync_core::*;
}

/// Configuration management.
pub mod config;

/// Dependency injection infrastructure.
pub mod di;

/// GitHub REST API client and wire types.
pub mod github;

/// GitHub App authentication (assertion signing, installation tokens).
pub mod auth;

/// Repository resolution and batch file synchronization.
pub mod sync;

/// HTTP endpoint exposing batch synchronization.
pub mod server;
