//! File set input types

use crate::core::path::normalize_repo_path;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// File content as supplied by collaborators: plain text, or an object with
/// a `code` or `content` field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FileContent {
    Text(String),
    Code { code: String },
    Content { content: String },
}

impl FileContent {
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            FileContent::Text(text) => text.into_bytes(),
            FileContent::Code { code } => code.into_bytes(),
            FileContent::Content { content } => content.into_bytes(),
        }
    }
}

/// One logical file to push: normalized repository path plus raw bytes
#[derive(Clone, PartialEq, Eq)]
pub struct FileChange {
    pub path: String,
    pub content: Vec<u8>,
}

impl FileChange {
    /// Create a change; the path is normalized (leading slashes stripped)
    pub fn new(path: impl AsRef<str>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            path: normalize_repo_path(path.as_ref()),
            content: content.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Resolve a path -> content mapping into file changes, once, at batch entry
    pub fn from_map(files: BTreeMap<String, FileContent>) -> Vec<FileChange> {
        files
            .into_iter()
            .map(|(path, content)| FileChange::new(path, content.into_bytes()))
            .collect()
    }
}

impl fmt::Debug for FileChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileChange")
            .field("path", &self.path)
            .field("bytes", &self.content.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_content_accepts_all_shapes() {
        let files: BTreeMap<String, FileContent> = serde_json::from_value(serde_json::json!({
            "a.txt": "plain",
            "b.js": { "code": "console.log(1)" },
            "c.md": { "content": "# Title" }
        }))
        .unwrap();

        assert_eq!(files["a.txt"], FileContent::Text("plain".into()));
        assert_eq!(files["b.js"], FileContent::Code { code: "console.log(1)".into() });
        assert_eq!(files["c.md"], FileContent::Content { content: "# Title".into() });
    }

    #[test]
    fn test_code_wins_when_both_fields_present() {
        let content: FileContent =
            serde_json::from_value(serde_json::json!({ "code": "x", "content": "y" })).unwrap();
        assert_eq!(content.into_bytes(), b"x");
    }

    #[test]
    fn test_from_map_normalizes_paths() {
        let mut files = BTreeMap::new();
        files.insert("/src/index.ts".to_string(), FileContent::Text("export {}".into()));
        files.insert("empty.txt".to_string(), FileContent::Text(String::new()));

        let changes = FileChange::from_map(files);
        assert_eq!(changes.len(), 2);
        assert!(changes.iter().any(|c| c.path == "src/index.ts" && !c.is_empty()));
        assert!(changes.iter().any(|c| c.path == "empty.txt" && c.is_empty()));
    }

    #[test]
    fn test_debug_hides_content() {
        let change = FileChange::new("a.txt", "secret body");
        let rendered = format!("{:?}", change);
        assert!(rendered.contains("a.txt"));
        assert!(!rendered.contains("secret body"));
    }
}
