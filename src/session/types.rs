//! Session snapshot and supporting types.

use crate::action::{Action, ComponentDesign, Step};
use crate::tree::{BatchReport, FileTree};
use crate::types::{SessionId, Ticket};
use serde::{Deserialize, Serialize};

/// Where generation currently stands
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", content = "message", rename_all = "lowercase")]
pub enum GenerationStatus {
    #[default]
    Idle,
    Loading,
    Streaming,
    Complete,
    Error(String),
}

/// Chat participant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One chat message
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Chosen variation for a component
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesignSelection {
    pub component_path: String,
    pub variation_path: String,
}

/// Identity of an outstanding model request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchRequest {
    pub session_id: SessionId,
    pub ticket: Ticket,
}

/// What happened to a submitted batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchDisposition {
    /// Applied, together with any earlier-held batches it released
    Applied(BatchReport),
    /// Waiting for an earlier request to finish
    Held,
    /// Requested under a session that has since been reset
    Discarded {
        batch_session: SessionId,
        current_session: SessionId,
    },
}

/// Published, immutable view of a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub session_id: SessionId,
    /// Increments on every publish within and across sessions
    pub revision: u64,
    pub tree: FileTree,
    pub steps: Vec<Step>,
    pub selected_file: Option<String>,
    pub status: GenerationStatus,
    pub messages: Vec<Message>,
    pub design_selections: Vec<DesignSelection>,
}

impl SessionSnapshot {
    pub fn selected_file_content(&self) -> Option<&str> {
        let path = self.selected_file.as_deref()?;
        self.tree.find_file(path).map(|f| f.content.as_str())
    }

    /// Components announced by design steps, in announcement order.
    pub fn designs(&self) -> Vec<&ComponentDesign> {
        self.steps
            .iter()
            .filter_map(|step| match &step.action {
                Action::Designs { components } => Some(components.iter()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn pending_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.is_pending()).count()
    }
}
