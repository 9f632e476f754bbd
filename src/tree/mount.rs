//! Runtime mount format
//!
//! The preview runtime takes a nested description keyed by entry name:
//! `{name: {"file": {"contents": ...}}}` or `{name: {"directory": {...}}}`.

use super::node::{FileNode, FileSystemNode, FolderNode};
use super::FileTree;
use crate::error::TreeError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Directory listing in runtime format, ordered by name
pub type MountTree = BTreeMap<String, MountEntry>;

/// One runtime entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MountEntry {
    File { contents: String },
    Directory(MountTree),
}

/// Convert a tree into runtime format.
pub fn to_mount(tree: &FileTree) -> MountTree {
    folder_to_mount(tree.root())
}

fn folder_to_mount(folder: &FolderNode) -> MountTree {
    folder
        .children
        .iter()
        .map(|child| {
            let entry = match child {
                FileSystemNode::File(file) => MountEntry::File {
                    contents: file.content.clone(),
                },
                FileSystemNode::Folder(sub) => MountEntry::Directory(folder_to_mount(sub)),
            };
            (child.name().to_string(), entry)
        })
        .collect()
}

/// Rebuild a tree from runtime format.
///
/// Children come back in name order. Entry names must be single, non-empty segments.
pub fn from_mount(root_name: &str, mount: &MountTree) -> Result<FileTree, TreeError> {
    let mut tree = FileTree::new(root_name);
    fill_folder(tree.root_mut(), mount)?;
    Ok(tree)
}

fn fill_folder(folder: &mut FolderNode, mount: &MountTree) -> Result<(), TreeError> {
    for (name, entry) in mount {
        let single_name = !matches!(name.as_str(), "" | "." | "..")
            && !name.contains(|c: char| c == '/' || c == '\\');
        if !single_name {
            return Err(TreeError::InvalidSegment {
                path: folder.path.clone(),
                segment: name.clone(),
            });
        }
        let path = folder.child_path(name);
        let node = match entry {
            MountEntry::File { contents } => {
                FileSystemNode::File(FileNode::new(name, &path, contents))
            }
            MountEntry::Directory(children) => {
                let mut sub = FolderNode::new(name, &path);
                fill_folder(&mut sub, children)?;
                FileSystemNode::Folder(sub)
            }
        };
        folder.children.push(node);
    }
    Ok(())
}
