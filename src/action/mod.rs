//! Actions
//!
//! Typed instructions extracted from model output: file writes, shell commands
//! and design proposals. Each parsed action travels inside a [`Step`] that
//! records whether a session has already applied it.

pub mod scanner;
pub mod strict;
pub mod vocabulary;

use serde::{Deserialize, Serialize};

pub use scanner::ActionScanner;
pub use vocabulary::TagVocabulary;

/// One alternative set of implementations for a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDesign {
    pub name: String,
    pub path: String,
    #[serde(default)]
    pub variations: Vec<String>,
}

/// Display name of a design variation: last path segment without its extension.
pub fn design_name(variation_path: &str) -> &str {
    let leaf = variation_path
        .rsplit('/')
        .next()
        .unwrap_or(variation_path);
    match leaf.rfind('.') {
        Some(dot) if dot > 0 => &leaf[..dot],
        _ => leaf,
    }
}

/// Parsed action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Action {
    CreateFile { path: String, code: String },
    UpdateFile { path: String, code: String },
    Shell { command: String },
    Designs { components: Vec<ComponentDesign> },
}

impl Action {
    /// Target path for file writes.
    pub fn path(&self) -> Option<&str> {
        match self {
            Action::CreateFile { path, .. } | Action::UpdateFile { path, .. } => Some(path),
            Action::Shell { .. } | Action::Designs { .. } => None,
        }
    }

    /// File content for file writes.
    pub fn code(&self) -> Option<&str> {
        match self {
            Action::CreateFile { code, .. } | Action::UpdateFile { code, .. } => Some(code),
            Action::Shell { .. } | Action::Designs { .. } => None,
        }
    }

    pub fn is_file_write(&self) -> bool {
        matches!(self, Action::CreateFile { .. } | Action::UpdateFile { .. })
    }

    /// Stable variant name, as shown in step lists and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Action::CreateFile { .. } => "CreateFile",
            Action::UpdateFile { .. } => "UpdateFile",
            Action::Shell { .. } => "Shell",
            Action::Designs { .. } => "Designs",
        }
    }

    /// Retag a file write to match what the tree builder actually did.
    ///
    /// `existed` selects `UpdateFile`, otherwise `CreateFile`. Non-file actions are untouched.
    pub fn retag(&mut self, existed: bool) {
        let (path, code) = match self {
            Action::CreateFile { path, code } | Action::UpdateFile { path, code } => {
                (std::mem::take(path), std::mem::take(code))
            }
            Action::Shell { .. } | Action::Designs { .. } => return,
        };
        *self = if existed {
            Action::UpdateFile { path, code }
        } else {
            Action::CreateFile { path, code }
        };
    }
}

/// Whether a session has applied an action yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionStatus {
    Pending,
    Completed,
}

/// An action plus its application status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub action: Action,
    pub status: ActionStatus,
}

impl Step {
    pub fn pending(action: Action) -> Self {
        Self {
            action,
            status: ActionStatus::Pending,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ActionStatus::Pending
    }

    pub fn complete(&mut self) {
        self.status = ActionStatus::Completed;
    }

    /// Heading for a progress list entry.
    pub fn title(&self) -> &'static str {
        match self.action {
            Action::CreateFile { .. } => "Create File",
            Action::UpdateFile { .. } => "Update File",
            Action::Shell { .. } => "Run Command",
            Action::Designs { .. } => "Designs",
        }
    }

    /// Secondary line for a progress list entry: the path, command or component names.
    pub fn detail(&self) -> String {
        match &self.action {
            Action::CreateFile { path, .. } | Action::UpdateFile { path, .. } => path.clone(),
            Action::Shell { command } => command.clone(),
            Action::Designs { components } => components
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

impl From<Action> for Step {
    fn from(action: Action) -> Self {
        Step::pending(action)
    }
}
