use repo_sync::core::{CredentialStore, SyncError, SyncResult};
use repo_sync::di::ServiceContainer;
use repo_sync::sync::{BatchRequest, BatchSyncOrchestrator, CommitStatus, FileChange};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub struct PushOptions {
    pub dir: PathBuf,
    pub repo: String,
    pub dest: Option<String>,
    pub branch: Option<String>,
    pub project: Option<String>,
    pub installation_id: Option<u64>,
}

pub async fn run(options: PushOptions) -> SyncResult<()> {
    let installation_id =
        resolve_installation_id(options.installation_id, CredentialStore::installation_id)?;

    let files = collect_files(&options.dir)?;
    println!(
        "Pushing {} file(s) from {} to {}...",
        files.len(),
        options.dir.display(),
        options.repo
    );

    let orchestrator = BatchSyncOrchestrator::new(ServiceContainer::new()?);
    let result = orchestrator
        .run(BatchRequest {
            installation_id,
            repository: options.repo.clone(),
            files,
            destination_dir: options.dest,
            branch: options.branch,
            project_id: options.project,
        })
        .await?;

    for outcome in &result.outcomes {
        match outcome.status {
            CommitStatus::Created => println!("  + {}", outcome.path),
            CommitStatus::Updated => println!("  ~ {}", outcome.path),
            CommitStatus::Failed => {}
        }
    }
    for error in &result.errors {
        eprintln!("  ✗ {}", error);
    }

    if result.nothing_attempted() {
        println!("Nothing to push: every file was empty.");
        return Ok(());
    }

    if !result.ok {
        return Err(SyncError::Transient(format!(
            "All {} file(s) failed to push to {}",
            result.errors.len(),
            result.repository_url
        )));
    }

    println!(
        "✓ Pushed {} file(s) to {} ({})",
        result.pushed_count, result.repository_url, result.target_branch
    );
    if !result.errors.is_empty() {
        println!("  {} file(s) failed", result.errors.len());
    }

    Ok(())
}

/// The explicit id wins; otherwise fall back to the one stored by `login`
fn resolve_installation_id(
    explicit: Option<u64>,
    stored: impl FnOnce() -> SyncResult<u64>,
) -> SyncResult<u64> {
    match explicit {
        Some(id) => Ok(id),
        None => stored().map_err(|e| {
            SyncError::Validation(format!(
                "No usable installation id ({}). Pass --installation-id or run 'repo-sync login' first.",
                e
            ))
        }),
    }
}

/// Collect every regular file under `dir`, skipping `.git`, with paths
/// relative to `dir`
fn collect_files(dir: &Path) -> SyncResult<Vec<FileChange>> {
    if !dir.is_dir() {
        return Err(SyncError::Validation(format!(
            "{} is not a directory",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| entry.file_name() != ".git");

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(dir)
            .map_err(|e| SyncError::Path(format!("{}: {}", entry.path().display(), e)))?;
        let path = relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");

        files.push(FileChange::new(path, fs::read(entry.path())?));
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_collect_files_relative_paths() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("src/components")).unwrap();
        fs::create_dir_all(temp.path().join(".git")).unwrap();
        fs::write(temp.path().join("index.html"), "<html>").unwrap();
        fs::write(temp.path().join("src/components/App.tsx"), "export {}").unwrap();
        fs::write(temp.path().join(".git/HEAD"), "ref").unwrap();

        let files = collect_files(temp.path()).unwrap();
        let paths: Vec<&str> = files.iter().map(|f| f.path.as_str()).collect();

        assert_eq!(paths, vec!["index.html", "src/components/App.tsx"]);
    }

    #[test]
    fn test_explicit_installation_id_skips_keychain() {
        let id = resolve_installation_id(Some(7), || panic!("keychain should not be read")).unwrap();
        assert_eq!(id, 7);
    }

    #[test]
    fn test_stored_installation_id_error_is_reported() {
        let err = resolve_installation_id(None, || {
            Err(SyncError::Credential(
                "Stored installation id 'abc' is invalid".to_string(),
            ))
        })
        .unwrap_err();

        assert!(err.is_validation());
        assert!(err.to_string().contains("Stored installation id 'abc' is invalid"));
    }

    #[test]
    fn test_collect_files_requires_directory() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("a.txt");
        fs::write(&file, "x").unwrap();

        assert!(matches!(
            collect_files(&file),
            Err(SyncError::Validation(_))
        ));
    }
}
