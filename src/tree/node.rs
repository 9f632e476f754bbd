//! File tree node types

use serde::{Deserialize, Serialize};

/// File node representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileNode {
    pub id: String,
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub content: String,
}

/// Folder node representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FolderNode {
    pub id: String,
    pub name: String,
    pub path: String,
    pub children: Vec<FileSystemNode>, // insertion order
}

/// File tree node type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum FileSystemNode {
    File(FileNode),
    Folder(FolderNode),
}

impl FileNode {
    pub fn new(name: &str, path: &str, content: &str) -> Self {
        Self {
            id: format!("file-{}", path),
            name: name.to_string(),
            path: path.to_string(),
            content: content.to_string(),
        }
    }
}

impl FolderNode {
    pub fn new(name: &str, path: &str) -> Self {
        Self {
            id: format!("folder-{}", path),
            name: name.to_string(),
            path: path.to_string(),
            children: Vec::new(),
        }
    }

    /// Root folder: path `/`, id `root`.
    pub fn root(name: &str) -> Self {
        Self {
            id: "root".to_string(),
            name: name.to_string(),
            path: "/".to_string(),
            children: Vec::new(),
        }
    }

    pub fn child(&self, name: &str) -> Option<&FileSystemNode> {
        self.children.iter().find(|c| c.name() == name)
    }

    pub(crate) fn child_index(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|c| c.name() == name)
    }

    /// Path a child named `name` gets under this folder.
    pub(crate) fn child_path(&self, name: &str) -> String {
        if self.path == "/" || self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}/{}", self.path, name)
        }
    }
}

impl FileSystemNode {
    pub fn name(&self) -> &str {
        match self {
            FileSystemNode::File(f) => &f.name,
            FileSystemNode::Folder(d) => &d.name,
        }
    }

    pub fn path(&self) -> &str {
        match self {
            FileSystemNode::File(f) => &f.path,
            FileSystemNode::Folder(d) => &d.path,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            FileSystemNode::File(f) => &f.id,
            FileSystemNode::Folder(d) => &d.id,
        }
    }

    pub fn is_file(&self) -> bool {
        matches!(self, FileSystemNode::File(_))
    }

    pub fn as_file(&self) -> Option<&FileNode> {
        match self {
            FileSystemNode::File(f) => Some(f),
            FileSystemNode::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&FolderNode> {
        match self {
            FileSystemNode::Folder(d) => Some(d),
            FileSystemNode::File(_) => None,
        }
    }
}
