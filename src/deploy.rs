//! Upload manifests for the build/deploy service
//!
//! Flattens a tree into `{projectId}/{relativePath}` object keys. The service
//! performs the upload, build and hosting; this module only decides the keys.

use crate::error::ApiError;
use crate::tree::FileTree;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of generated project ids in hex characters
const GENERATED_ID_LEN: usize = 12;

/// Identifier grouping one deployment's objects
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectId(String);

impl ProjectId {
    /// Validate a caller-supplied id: non-empty, no separators, no surrounding whitespace.
    pub fn parse(id: &str) -> Result<Self, ApiError> {
        if id.is_empty() || id.trim() != id {
            return Err(ApiError::Deploy(format!("Invalid project id: {:?}", id)));
        }
        if id.contains('/') || id.contains('\\') || id == "." || id == ".." {
            return Err(ApiError::Deploy(format!(
                "Project id cannot contain path separators: {:?}",
                id
            )));
        }
        Ok(Self(id.to_string()))
    }

    /// Derive a short id from the tree digest and the current time.
    pub fn generate(tree: &FileTree) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&tree.digest());
        let now = chrono::Utc::now();
        hasher.update(&now.timestamp_nanos_opt().unwrap_or_default().to_le_bytes());
        let encoded = hex::encode(hasher.finalize().as_bytes());
        Self(encoded[..GENERATED_ID_LEN].to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One object to upload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadEntry {
    /// Object key: `{projectId}/{path}`
    pub key: String,
    /// Path relative to the tree root, `/`-separated
    pub path: String,
    pub content: String,
}

/// Every object a deployment uploads
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadManifest {
    pub project_id: ProjectId,
    pub entries: Vec<UploadEntry>,
}

impl UploadManifest {
    /// List the tree's files in depth-first insertion order. Empty files are not uploaded.
    pub fn from_tree(project_id: ProjectId, tree: &FileTree) -> Self {
        let entries = tree
            .files()
            .into_iter()
            .filter(|file| !file.content.is_empty())
            .map(|file| UploadEntry {
                key: format!("{}/{}", project_id, file.path),
                path: file.path.clone(),
                content: file.content.clone(),
            })
            .collect();
        Self {
            project_id,
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_bytes(&self) -> usize {
        self.entries.iter().map(|e| e.content.len()).sum()
    }
}
