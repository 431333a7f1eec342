//! Installation access token exchange

use crate::auth::signer::AppTokenSigner;
use crate::core::{SyncError, SyncResult};
use crate::di::traits::GitHubApi;
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Bearer token scoped to one installation.
///
/// Owned by the batch that requested it; never shared or persisted, and never
/// used past `expires_at`.
#[derive(Clone)]
pub struct InstallationToken {
    value: String,
    expires_at: DateTime<Utc>,
    installation_id: u64,
}

impl InstallationToken {
    pub fn new(value: impl Into<String>, expires_at: DateTime<Utc>, installation_id: u64) -> Self {
        Self {
            value: value.into(),
            expires_at,
            installation_id,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn installation_id(&self) -> u64 {
        self.installation_id
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl fmt::Debug for InstallationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstallationToken")
            .field("value", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .field("installation_id", &self.installation_id)
            .finish()
    }
}

/// Trades a freshly signed app assertion for an installation token
#[derive(Clone)]
pub struct InstallationTokenExchanger {
    signer: Arc<AppTokenSigner>,
    github: Arc<dyn GitHubApi>,
}

impl InstallationTokenExchanger {
    pub fn new(signer: Arc<AppTokenSigner>, github: Arc<dyn GitHubApi>) -> Self {
        Self { signer, github }
    }

    /// Exchange the app identity for an installation token.
    ///
    /// Every call signs a new assertion and performs one uncached request.
    /// There are no retries. The validity window comes from the provider.
    pub async fn exchange(&self, installation_id: u64) -> SyncResult<InstallationToken> {
        let assertion = self.signer.sign(Utc::now())?;

        let response = self
            .github
            .create_installation_token(&assertion, installation_id)
            .await?;

        let token = InstallationToken::new(response.token, response.expires_at, installation_id);
        if token.is_expired() {
            return Err(SyncError::Auth(format!(
                "Installation token for installation {} expired at {}",
                installation_id, response.expires_at
            )));
        }

        debug!(
            installation_id,
            expires_at = %token.expires_at(),
            permissions = ?response.permissions,
            repository_selection = response.repository_selection.as_deref().unwrap_or("unknown"),
            "Obtained installation token"
        );
        Ok(token)
    }
}
