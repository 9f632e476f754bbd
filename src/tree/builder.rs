//! Tree builder and merger
//!
//! Applies parsed actions to a [`FileTree`]. Intermediate folders are created
//! on demand, repeated writes to one path merge into the existing file node,
//! and file/folder collisions fail only the offending action.

use super::node::{FileNode, FileSystemNode, FolderNode};
use super::path::{ResolvedPath, Separators};
use super::FileTree;
use crate::action::{Action, ComponentDesign};
use crate::error::TreeError;
use serde::Serialize;
use tracing::{debug, warn};

/// What applying one action did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// A new file node was added
    Created,
    /// An existing file node's content was replaced
    Updated,
    /// Shell command to forward to the runtime; the tree is untouched
    Command(String),
    /// Design alternatives to surface; the tree is untouched
    Designs(Vec<ComponentDesign>),
}

/// A file write that could not be applied
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conflict {
    pub path: String,
    pub reason: String,
}

/// Summary of one applied batch
///
/// Created and updated paths are canonical node paths.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BatchReport {
    pub created: Vec<String>,
    pub updated: Vec<String>,
    pub commands: Vec<String>,
    pub designs: Vec<ComponentDesign>,
    /// File/folder collisions
    pub conflicts: Vec<Conflict>,
    /// Writes whose path could not be resolved
    pub rejected: Vec<Conflict>,
}

impl BatchReport {
    /// Fold the result of applying `action` into the report.
    pub fn record(&mut self, action: &Action, result: Result<ApplyOutcome, TreeError>) {
        match result {
            Ok(ApplyOutcome::Created) => self.created.extend(action.path().map(str::to_string)),
            Ok(ApplyOutcome::Updated) => self.updated.extend(action.path().map(str::to_string)),
            Ok(ApplyOutcome::Command(command)) => self.commands.push(command),
            Ok(ApplyOutcome::Designs(components)) => self.designs.extend(components),
            Err(e) => {
                let path = action.path().unwrap_or_default().to_string();
                warn!(path = %path, error = %e, "Action not applied");
                let entry = Conflict {
                    path,
                    reason: e.to_string(),
                };
                if e.is_conflict() {
                    self.conflicts.push(entry);
                } else {
                    self.rejected.push(entry);
                }
            }
        }
    }

    pub fn merge(&mut self, other: BatchReport) {
        self.created.extend(other.created);
        self.updated.extend(other.updated);
        self.commands.extend(other.commands);
        self.designs.extend(other.designs);
        self.conflicts.extend(other.conflicts);
        self.rejected.extend(other.rejected);
    }

    pub fn is_clean(&self) -> bool {
        self.conflicts.is_empty() && self.rejected.is_empty()
    }
}

impl FileTree {
    /// Write `content` at a `/`-separated path, creating folders as needed.
    pub fn write_file(&mut self, path: &str, content: &str) -> Result<ApplyOutcome, TreeError> {
        let resolved = ResolvedPath::parse(path, Separators::Slash)?;
        self.write_resolved(&resolved, content)
    }

    pub(crate) fn write_resolved(
        &mut self,
        resolved: &ResolvedPath,
        content: &str,
    ) -> Result<ApplyOutcome, TreeError> {
        let full_path = resolved.joined();
        let mut folder: &mut FolderNode = self.root_mut();

        for segment in resolved.parents() {
            let index = match folder.child_index(segment) {
                Some(index) => index,
                None => {
                    let path = folder.child_path(segment);
                    debug!(path = %path, "Creating folder");
                    folder
                        .children
                        .push(FileSystemNode::Folder(FolderNode::new(segment, &path)));
                    folder.children.len() - 1
                }
            };
            folder = match &mut folder.children[index] {
                FileSystemNode::Folder(next) => next,
                FileSystemNode::File(_) => {
                    return Err(TreeError::FileAsFolder {
                        path: full_path,
                        segment: segment.clone(),
                    })
                }
            };
        }

        let leaf = resolved.leaf();
        match folder.child_index(leaf) {
            Some(index) => match &mut folder.children[index] {
                FileSystemNode::File(file) => {
                    file.content = content.to_string();
                    Ok(ApplyOutcome::Updated)
                }
                FileSystemNode::Folder(_) => Err(TreeError::FolderAsFile { path: full_path }),
            },
            None => {
                let path = folder.child_path(leaf);
                folder
                    .children
                    .push(FileSystemNode::File(FileNode::new(leaf, &path, content)));
                Ok(ApplyOutcome::Created)
            }
        }
    }

    /// Apply one action, retagging file writes to what actually happened.
    ///
    /// A resolvable write path is rewritten to its canonical form first.
    pub fn apply(&mut self, action: &mut Action) -> Result<ApplyOutcome, TreeError> {
        let outcome = match action {
            Action::CreateFile { path, code } | Action::UpdateFile { path, code } => {
                let resolved = ResolvedPath::parse(path, Separators::Slash)?;
                *path = resolved.joined();
                self.write_resolved(&resolved, code)?
            }
            Action::Shell { command } => return Ok(ApplyOutcome::Command(command.clone())),
            Action::Designs { components } => {
                return Ok(ApplyOutcome::Designs(components.clone()))
            }
        };
        action.retag(outcome == ApplyOutcome::Updated);
        Ok(outcome)
    }

    /// Apply actions in order. Failed actions are reported and skipped.
    pub fn apply_all(&mut self, actions: &mut [Action]) -> BatchReport {
        let mut report = BatchReport::default();
        for action in actions.iter_mut() {
            let result = self.apply(action);
            report.record(action, result);
        }
        report
    }

    /// Replace the content of an existing file, as the editor does.
    pub fn set_content(&mut self, path: &str, content: &str) -> Result<(), TreeError> {
        let resolved = ResolvedPath::parse(path, Separators::Slash)?;
        let not_found = || TreeError::NotFound {
            path: path.to_string(),
        };

        let mut folder: &mut FolderNode = self.root_mut();
        for segment in resolved.parents() {
            let index = folder.child_index(segment).ok_or_else(not_found)?;
            folder = match &mut folder.children[index] {
                FileSystemNode::Folder(next) => next,
                FileSystemNode::File(_) => return Err(not_found()),
            };
        }

        let index = folder.child_index(resolved.leaf()).ok_or_else(not_found)?;
        match &mut folder.children[index] {
            FileSystemNode::File(file) => {
                file.content = content.to_string();
                Ok(())
            }
            FileSystemNode::Folder(_) => Err(TreeError::NotAFile {
                path: path.to_string(),
            }),
        }
    }
}
