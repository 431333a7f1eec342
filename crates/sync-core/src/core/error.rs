use thiserror::Error;

pub type SyncResult<T> = Result<T, SyncError>;

#[derive(Error, Debug)]
pub enum SyncError {
    /// Malformed or missing input. Raised before any I/O happens.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Signing failure or a rejected token exchange.
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The target repository does not exist (or is not visible to the installation).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Non-2xx response from the provider that is not a confirmed 404.
    #[error("Request failed: {0}")]
    Transient(String),

    /// Transport-level failure (connect, timeout, TLS).
    #[error("Network error: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Credential error: {0}")]
    Credential(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("WalkDir error: {0}")]
    WalkDir(#[from] walkdir::Error),
}

impl From<reqwest::Error> for SyncError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SyncError::Transient(format!("Failed to decode response: {}", err))
        } else {
            SyncError::Network(err.to_string())
        }
    }
}

impl SyncError {
    /// HTTP status code class reported to callers of the push endpoint.
    pub fn http_status(&self) -> u16 {
        match self {
            SyncError::Validation(_) => 400,
            SyncError::NotFound(_) => 404,
            _ => 500,
        }
    }

    /// True for input errors that can be fixed by the caller.
    pub fn is_validation(&self) -> bool {
        matches!(self, SyncError::Validation(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_classes() {
        assert_eq!(SyncError::Validation("x".into()).http_status(), 400);
        assert_eq!(SyncError::NotFound("x".into()).http_status(), 404);
        assert_eq!(SyncError::Auth("x".into()).http_status(), 500);
        assert_eq!(SyncError::Network("x".into()).http_status(), 500);
        assert_eq!(SyncError::Transient("x".into()).http_status(), 500);
    }

    #[test]
    fn test_display_includes_detail() {
        let err = SyncError::Auth("HTTP 401: bad credentials".into());
        assert_eq!(
            err.to_string(),
            "Authentication error: HTTP 401: bad credentials"
        );
    }
}
