//! GitHub App authentication
//!
//! - [`AppTokenSigner`] signs short-lived app assertions (JWT) from the
//!   injected [`AppCredential`].
//! - [`InstallationTokenExchanger`] trades an assertion for an
//!   [`InstallationToken`] scoped to one installation.
//!
//! Neither component caches tokens: every batch mints its own.

pub mod exchanger;
pub mod signer;

pub use exchanger::{InstallationToken, InstallationTokenExchanger};
pub use signer::{AppClaims, AppCredential, AppTokenSigner, AssertionToken};
