//! GitHub App assertion signing

use crate::core::{SyncError, SyncResult};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Backdating applied to `iat` to tolerate clock skew with the provider
pub const ISSUED_AT_SKEW_SECS: i64 = 60;

/// Assertion lifetime; GitHub rejects anything longer than 10 minutes
pub const ASSERTION_LIFETIME_SECS: i64 = 540;

/// Static GitHub App identity: app id plus PEM private key.
///
/// Supplied once at process start and never mutated. The key is never
/// serialized and is redacted from `Debug` output.
#[derive(Clone)]
pub struct AppCredential {
    app_id: u64,
    private_key: Vec<u8>,
}

impl AppCredential {
    pub fn new(app_id: u64, private_key: impl Into<Vec<u8>>) -> Self {
        Self {
            app_id,
            private_key: private_key.into(),
        }
    }

    pub fn app_id(&self) -> u64 {
        self.app_id
    }
}

impl fmt::Debug for AppCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppCredential")
            .field("app_id", &self.app_id)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Claims embedded in the app assertion
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppClaims {
    pub iat: i64,
    pub exp: i64,
    pub iss: String,
}

/// Short-lived signed JWT proving the app's identity
#[derive(Clone)]
pub struct AssertionToken {
    value: String,
    issued_at: DateTime<Utc>,
    expires_at: DateTime<Utc>,
}

impl AssertionToken {
    pub fn new(
        value: impl Into<String>,
        issued_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            value: value.into(),
            issued_at,
            expires_at,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.issued_at
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

impl fmt::Debug for AssertionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AssertionToken")
            .field("value", &"<redacted>")
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Signs app assertions with the injected credential
#[derive(Debug, Clone)]
pub struct AppTokenSigner {
    credential: AppCredential,
}

impl AppTokenSigner {
    pub fn new(credential: AppCredential) -> Self {
        Self { credential }
    }

    pub fn app_id(&self) -> u64 {
        self.credential.app_id()
    }

    /// Mint a fresh assertion valid from `now - 60s` to `now + 540s`.
    ///
    /// Malformed key material is an `Auth` error and is never retried.
    pub fn sign(&self, now: DateTime<Utc>) -> SyncResult<AssertionToken> {
        let issued_at = now - Duration::seconds(ISSUED_AT_SKEW_SECS);
        let expires_at = now + Duration::seconds(ASSERTION_LIFETIME_SECS);

        let claims = AppClaims {
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.credential.app_id.to_string(),
        };

        let (algorithm, key) = encoding_key(&self.credential.private_key)?;
        let value = jsonwebtoken::encode(&Header::new(algorithm), &claims, &key)
            .map_err(|e| SyncError::Auth(format!("Failed to sign app assertion: {}", e)))?;

        Ok(AssertionToken::new(value, issued_at, expires_at))
    }
}

/// Pick the signing algorithm from the key type: RSA keys use RS256, EC keys ES256.
fn encoding_key(pem: &[u8]) -> SyncResult<(Algorithm, EncodingKey)> {
    if let Ok(key) = EncodingKey::from_rsa_pem(pem) {
        return Ok((Algorithm::RS256, key));
    }
    if let Ok(key) = EncodingKey::from_ec_pem(pem) {
        return Ok((Algorithm::ES256, key));
    }
    Err(SyncError::Auth(
        "GitHub App private key is not a valid RSA or EC PEM key".to_string(),
    ))
}
