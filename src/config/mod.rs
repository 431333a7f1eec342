use crate::auth::AppCredential;
use crate::core::path::{config_file, ensure_dir};
use crate::core::{SyncError, SyncResult};
use crate::di::ConfigProvider;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable overriding `api_url`
pub const ENV_API_URL: &str = "REPO_SYNC_API_URL";
/// Environment variable overriding `app_id`
pub const ENV_APP_ID: &str = "GITHUB_APP_ID";
/// Environment variable holding the PEM private key inline
pub const ENV_PRIVATE_KEY: &str = "GITHUB_APP_PRIVATE_KEY";
/// Environment variable overriding `private_key_path`
pub const ENV_PRIVATE_KEY_PATH: &str = "GITHUB_APP_PRIVATE_KEY_PATH";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GitHub REST API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// GitHub web base URL, used to build repository links
    #[serde(default = "default_web_url")]
    pub web_url: String,

    /// GitHub App id (the JWT issuer)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_id: Option<u64>,

    /// Path to the GitHub App private key (PEM)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key_path: Option<PathBuf>,

    /// Root directory for project-scoped destinations
    /// Files of project `demo` land under `<projects_root>/demo` unless a
    /// destination directory is given.
    #[serde(default = "default_projects_root")]
    pub projects_root: String,

    /// Optional prefix for generated commit messages, e.g. "[repo-sync]"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commit_message_prefix: Option<String>,

    /// Number of files upserted concurrently within one batch (1 = sequential)
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Per-request timeout in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// User-Agent header sent to GitHub
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_web_url() -> String {
    "https://github.com".to_string()
}

fn default_projects_root() -> String {
    "projects".to_string()
}

fn default_max_concurrency() -> usize {
    1
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    "repo-sync".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            web_url: default_web_url(),
            app_id: None,
            private_key_path: None,
            projects_root: default_projects_root(),
            commit_message_prefix: None,
            max_concurrency: default_max_concurrency(),
            request_timeout_secs: default_request_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl Config {
    /// Load config from the platform-specific config directory, creating a
    /// default file if it doesn't exist, then apply environment overrides.
    ///
    /// Config locations:
    /// - Windows: %APPDATA%\repo-sync\config.yaml
    /// - Linux: ~/.config/repo-sync/config.yaml
    /// - macOS: ~/Library/Application Support/repo-sync/config.yaml
    pub fn load() -> SyncResult<Self> {
        let config_path = config_file()?;

        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            let config = Self::default();
            config.save_to(&config_path)?;
            config
        };

        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Load config from an explicit file without environment overrides
    pub fn load_from(path: &Path) -> SyncResult<Self> {
        let content = fs::read_to_string(path)?;
        serde_yaml::from_str(&content)
            .map_err(|e| SyncError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Save config to an explicit file, creating parent directories
    pub fn save_to(&self, path: &Path) -> SyncResult<()> {
        let config_dir = path
            .parent()
            .ok_or_else(|| SyncError::Path("Invalid config path".to_string()))?;
        ensure_dir(config_dir)?;

        let content = serde_yaml::to_string(self)
            .map_err(|e| SyncError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(path, content)?;
        Ok(())
    }

    /// Overlay values taken from the environment
    pub fn apply_env_overrides(&mut self) -> SyncResult<()> {
        if let Ok(url) = std::env::var(ENV_API_URL) {
            if !url.trim().is_empty() {
                self.api_url = url.trim().to_string();
            }
        }

        if let Ok(raw) = std::env::var(ENV_APP_ID) {
            let app_id = raw.trim().parse::<u64>().map_err(|e| {
                SyncError::Config(format!("{} must be a positive integer: {}", ENV_APP_ID, e))
            })?;
            self.app_id = Some(app_id);
        }

        if let Ok(path) = std::env::var(ENV_PRIVATE_KEY_PATH) {
            if !path.trim().is_empty() {
                self.private_key_path = Some(PathBuf::from(path.trim()));
            }
        }

        if self.max_concurrency == 0 {
            self.max_concurrency = 1;
        }

        Ok(())
    }

    /// Build the GitHub App credential from config and environment.
    ///
    /// An inline key in `GITHUB_APP_PRIVATE_KEY` wins over `private_key_path`.
    /// Escaped `\n` sequences in the inline key are expanded.
    pub fn app_credential(&self) -> SyncResult<AppCredential> {
        let app_id = self.app_id.ok_or_else(|| {
            SyncError::Config(format!(
                "GitHub App id is not configured (set app_id or {})",
                ENV_APP_ID
            ))
        })?;

        let private_key = match std::env::var(ENV_PRIVATE_KEY) {
            Ok(inline) if !inline.trim().is_empty() => inline.replace("\\n", "\n").into_bytes(),
            _ => {
                let path = self.private_key_path.as_ref().ok_or_else(|| {
                    SyncError::Config(format!(
                        "GitHub App private key is not configured (set private_key_path, {} or {})",
                        ENV_PRIVATE_KEY_PATH, ENV_PRIVATE_KEY
                    ))
                })?;
                fs::read(path).map_err(|e| {
                    SyncError::Config(format!(
                        "Failed to read private key {}: {}",
                        path.display(),
                        e
                    ))
                })?
            }
        };

        Ok(AppCredential::new(app_id, private_key))
    }
}

impl ConfigProvider for Config {
    fn api_url(&self) -> &str {
        &self.api_url
    }

    fn web_url(&self) -> &str {
        &self.web_url
    }

    fn projects_root(&self) -> &str {
        &self.projects_root
    }

    fn commit_message_prefix(&self) -> Option<&str> {
        self.commit_message_prefix.as_deref()
    }

    fn max_concurrency(&self) -> usize {
        self.max_concurrency.max(1)
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }
}
