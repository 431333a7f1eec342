//! GitHub API type definitions

use base64::Engine;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Response of `POST /app/installations/{id}/access_tokens`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallationTokenResponse {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub permissions: HashMap<String, String>,
    #[serde(default)]
    pub repository_selection: Option<String>,
}

/// GitHub repository information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepositoryInfo {
    pub name: String,
    pub full_name: String,
    pub default_branch: String,
    #[serde(default)]
    pub html_url: Option<String>,
    #[serde(default)]
    pub private: bool,
}

/// Content metadata returned by the contents API for a single file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentMetadata {
    pub sha: String,
    pub path: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// Current blob hash at a path, or `None` when the path does not exist yet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingBlobRef {
    pub sha: Option<String>,
}

impl ExistingBlobRef {
    pub fn absent() -> Self {
        Self { sha: None }
    }

    pub fn present(sha: impl Into<String>) -> Self {
        Self {
            sha: Some(sha.into()),
        }
    }

    pub fn is_absent(&self) -> bool {
        self.sha.is_none()
    }
}

/// Body of `PUT /repos/{owner}/{repo}/contents/{path}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PutContentRequest {
    pub message: String,
    /// Base64-encoded file content
    pub content: String,
    pub branch: String,
    /// Prior blob hash, required when updating an existing file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

impl PutContentRequest {
    pub fn new(message: String, content: &[u8], branch: &str, sha: Option<String>) -> Self {
        Self {
            message,
            content: base64::engine::general_purpose::STANDARD.encode(content),
            branch: branch.to_string(),
            sha,
        }
    }

    /// Decode the transfer-encoded content back to bytes
    pub fn decoded_content(&self) -> Option<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(&self.content)
            .ok()
    }
}

/// Commit reference in a contents write response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommitRef {
    pub sha: String,
    #[serde(default)]
    pub html_url: Option<String>,
}

/// Response of a successful contents write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PutContentResponse {
    #[serde(default)]
    pub content: Option<ContentMetadata>,
    pub commit: CommitRef,
}

/// GitHub API rate limit snapshot taken from response headers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub remaining: u64,
    pub reset: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_put_request_encodes_base64_and_omits_missing_sha() {
        let request = PutContentRequest::new("Add a.txt".into(), b"hello", "main", None);
        assert_eq!(request.content, "aGVsbG8=");

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["branch"], "main");
        assert!(json.get("sha").is_none());
    }

    #[test]
    fn test_put_request_includes_sha_on_update() {
        let request =
            PutContentRequest::new("Update a.txt".into(), b"hi", "main", Some("abc".into()));
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["sha"], "abc");
        assert_eq!(request.decoded_content().unwrap(), b"hi");
    }

    #[test]
    fn test_token_response_parses_provider_timestamp() {
        let response: InstallationTokenResponse = serde_json::from_value(serde_json::json!({
            "token": "ghs_abc",
            "expires_at": "2026-10-19T13:00:00Z",
            "permissions": { "contents": "write" }
        }))
        .unwrap();
        assert_eq!(response.token, "ghs_abc");
        assert_eq!(response.expires_at.to_rfc3339(), "2026-10-19T13:00:00+00:00");
        assert_eq!(response.permissions["contents"], "write");
    }
}
