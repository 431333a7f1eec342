use crate::core::{SyncError, SyncResult};
use keyring::Entry;

/// Service name for keyring entries
const KEYRING_SERVICE: &str = "repo-sync";

/// Keychain key under which `repo-sync login` stores the installation id
pub const INSTALLATION_ID_KEY: &str = "github_installation_id";

/// Manages credential storage using OS keychain
///
/// Platform support:
/// - macOS: Keychain
/// - Windows: Credential Manager
/// - Linux: Secret Service (libsecret)
pub struct CredentialStore;

impl CredentialStore {
    /// Store a credential in the OS keychain
    pub fn store(key: &str, value: &str) -> SyncResult<()> {
        let entry = Entry::new(KEYRING_SERVICE, key)
            .map_err(|e| SyncError::Credential(format!("Failed to create keyring entry: {}", e)))?;

        entry.set_password(value).map_err(|e| {
            SyncError::Credential(format!("Failed to store credential in keychain: {}", e))
        })?;

        Ok(())
    }

    /// Retrieve a credential from the OS keychain
    pub fn retrieve(key: &str) -> SyncResult<String> {
        let entry = Entry::new(KEYRING_SERVICE, key)
            .map_err(|e| SyncError::Credential(format!("Failed to create keyring entry: {}", e)))?;

        entry.get_password().map_err(|e| {
            SyncError::Credential(format!(
                "Failed to retrieve credential from keychain: {}",
                e
            ))
        })
    }

    /// Delete a credential from the OS keychain
    pub fn delete(key: &str) -> SyncResult<()> {
        let entry = Entry::new(KEYRING_SERVICE, key)
            .map_err(|e| SyncError::Credential(format!("Failed to create keyring entry: {}", e)))?;

        entry.delete_credential().map_err(|e| {
            SyncError::Credential(format!("Failed to delete credential from keychain: {}", e))
        })?;

        Ok(())
    }

    /// Check if a credential exists in the keychain
    pub fn exists(key: &str) -> bool {
        Self::retrieve(key).is_ok()
    }

    /// Store the GitHub App installation id for later `push` runs
    pub fn store_installation_id(installation_id: u64) -> SyncResult<()> {
        Self::store(INSTALLATION_ID_KEY, &installation_id.to_string())
    }

    /// Retrieve the stored installation id
    pub fn installation_id() -> SyncResult<u64> {
        let raw = Self::retrieve(INSTALLATION_ID_KEY)?;
        raw.trim().parse::<u64>().map_err(|e| {
            SyncError::Credential(format!("Stored installation id '{}' is invalid: {}", raw, e))
        })
    }
}
