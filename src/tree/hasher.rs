//! Deterministic digest of a file tree

use super::node::{FileSystemNode, FolderNode};
use crate::types::Digest;

const FILE_TAG: u8 = 0x01;
const FOLDER_TAG: u8 = 0x02;

/// Compute the digest of a folder and everything beneath it
///
/// Hashes kind, name, content and child order. Two trees built from the same
/// action sequence always hash equal; any reordering or content change does not.
pub fn compute_tree_digest(root: &FolderNode) -> Digest {
    let mut hasher = blake3::Hasher::new();
    hash_folder(&mut hasher, root);
    *hasher.finalize().as_bytes()
}

fn hash_folder(hasher: &mut blake3::Hasher, folder: &FolderNode) {
    hasher.update(&[FOLDER_TAG]);
    hash_bytes(hasher, folder.name.as_bytes());
    hasher.update(&(folder.children.len() as u64).to_le_bytes());
    for child in &folder.children {
        match child {
            FileSystemNode::File(file) => {
                hasher.update(&[FILE_TAG]);
                hash_bytes(hasher, file.name.as_bytes());
                hash_bytes(hasher, file.content.as_bytes());
            }
            FileSystemNode::Folder(sub) => hash_folder(hasher, sub),
        }
    }
}

fn hash_bytes(hasher: &mut blake3::Hasher, bytes: &[u8]) {
    hasher.update(&(bytes.len() as u64).to_le_bytes());
    hasher.update(bytes);
}
