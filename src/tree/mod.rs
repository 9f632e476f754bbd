//! Project File Tree
//!
//! Single-rooted tree of folders and files built from parsed actions. Children
//! keep insertion order and names are unique within a folder, so a path maps
//! to at most one node.

pub mod builder;
pub mod hasher;
pub mod language;
pub mod mount;
pub mod node;
pub mod path;

pub use builder::{ApplyOutcome, BatchReport, Conflict};
pub use node::{FileNode, FileSystemNode, FolderNode};
pub use path::{ResolvedPath, Separators};

use crate::types::Digest;
use serde::Serialize;

/// Conventional root name for session trees
pub const DEFAULT_ROOT_NAME: &str = "root";

/// Owned file tree
///
/// Only built through the builder, so it is serialized but never deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FileTree {
    root: FolderNode,
}

impl FileTree {
    pub fn new(root_name: &str) -> Self {
        Self {
            root: FolderNode::root(root_name),
        }
    }

    pub fn root(&self) -> &FolderNode {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut FolderNode {
        &mut self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.children.is_empty()
    }

    /// Look up a node by virtual path.
    pub fn find(&self, path: &str) -> Option<&FileSystemNode> {
        let resolved = ResolvedPath::parse(path, Separators::Slash).ok()?;
        let mut folder = &self.root;
        for segment in resolved.parents() {
            folder = folder.child(segment)?.as_folder()?;
        }
        folder.child(resolved.leaf())
    }

    pub fn find_file(&self, path: &str) -> Option<&FileNode> {
        self.find(path).and_then(FileSystemNode::as_file)
    }

    /// Every file, depth-first in insertion order.
    pub fn files(&self) -> Vec<&FileNode> {
        let mut files = Vec::new();
        collect_files(&self.root, &mut files);
        files
    }

    pub fn file_count(&self) -> usize {
        self.files().len()
    }

    /// Deterministic digest over names, kinds, content and child order.
    pub fn digest(&self) -> Digest {
        hasher::compute_tree_digest(&self.root)
    }
}

impl Default for FileTree {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_NAME)
    }
}

fn collect_files<'a>(folder: &'a FolderNode, out: &mut Vec<&'a FileNode>) {
    for child in &folder.children {
        match child {
            FileSystemNode::File(file) => out.push(file),
            FileSystemNode::Folder(sub) => collect_files(sub, out),
        }
    }
}

/// Render the tree as an indented listing, folders suffixed with `/`.
pub fn render_tree(tree: &FileTree) -> String {
    let mut out = format!("{}/\n", tree.root().name);
    render_folder(tree.root(), 1, &mut out);
    out
}

fn render_folder(folder: &FolderNode, depth: usize, out: &mut String) {
    for child in &folder.children {
        let indent = "  ".repeat(depth);
        match child {
            FileSystemNode::File(file) => {
                out.push_str(&format!("{}{} ({} bytes)\n", indent, file.name, file.content.len()));
            }
            FileSystemNode::Folder(sub) => {
                out.push_str(&format!("{}{}/\n", indent, sub.name));
                render_folder(sub, depth + 1, out);
            }
        }
    }
}
