//! Core utilities shared by the repo-sync binary and library
//!
//! Holds the error taxonomy, platform path helpers, and the OS keychain
//! credential store.

pub mod core;

pub use core::credentials::CredentialStore;
pub use core::error::{SyncError, SyncResult};
