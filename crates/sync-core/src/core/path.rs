use crate::core::error::{SyncError, SyncResult};
use std::path::Path;
use std::path::PathBuf;

/// Get the repo-sync home directory
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\repo-sync
/// - Linux: ~/.config/repo-sync
/// - macOS: ~/Library/Application Support/repo-sync
pub fn sync_home() -> SyncResult<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or_else(|| SyncError::Path("Could not determine config directory".to_string()))?;
    Ok(config_dir.join("repo-sync"))
}

/// Get the config file path
///
/// Platform-specific locations:
/// - Windows: %APPDATA%\repo-sync\config.yaml
/// - Linux: ~/.config/repo-sync/config.yaml
/// - macOS: ~/Library/Application Support/repo-sync/config.yaml
pub fn config_file() -> SyncResult<PathBuf> {
    Ok(sync_home()?.join("config.yaml"))
}

/// Ensure a directory exists, creating it if necessary
pub fn ensure_dir(path: &Path) -> SyncResult<()> {
    if !path.exists() {
        std::fs::create_dir_all(path)?;
    }
    Ok(())
}

/// Normalize a repository-relative path.
///
/// Backslashes become forward slashes, leading slashes are stripped, and
/// empty or `.` segments are dropped, so `/src//./main.rs` becomes
/// `src/main.rs`.
pub fn normalize_repo_path(path: &str) -> String {
    path.replace('\\', "/")
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect::<Vec<_>>()
        .join("/")
}

/// Join a destination directory prefix with a file path, both normalized.
///
/// An empty prefix leaves the path at the repository root.
pub fn join_repo_path(prefix: &str, path: &str) -> String {
    let prefix = normalize_repo_path(prefix);
    let path = normalize_repo_path(path);
    match (prefix.is_empty(), path.is_empty()) {
        (true, _) => path,
        (false, true) => prefix,
        (false, false) => format!("{}/{}", prefix, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_ensure_dir() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("test_dir");

        ensure_dir(&dir).unwrap();
        assert!(dir.exists());
        assert!(dir.is_dir());
    }

    #[test]
    fn test_normalize_strips_leading_slashes() {
        assert_eq!(normalize_repo_path("///src/main.rs"), "src/main.rs");
        assert_eq!(normalize_repo_path("src//./lib.rs"), "src/lib.rs");
        assert_eq!(normalize_repo_path("src\\app\\page.tsx"), "src/app/page.tsx");
        assert_eq!(normalize_repo_path("/"), "");
    }

    #[test]
    fn test_join_repo_path() {
        assert_eq!(join_repo_path("projects/demo", "/index.html"), "projects/demo/index.html");
        assert_eq!(join_repo_path("/out/", "a.txt"), "out/a.txt");
        assert_eq!(join_repo_path("", "/a.txt"), "a.txt");
        assert_eq!(join_repo_path("out", ""), "out");
    }

    #[test]
    fn test_config_file_is_under_home() {
        if let (Ok(home), Ok(file)) = (sync_home(), config_file()) {
            assert!(file.starts_with(home));
            assert!(file.ends_with("config.yaml"));
        }
    }
}
