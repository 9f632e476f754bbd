//! Incremental Session State
//!
//! Owns the file tree and step history across the batches of one generation
//! session. Writers are serialized by a lock; every change is published as a
//! whole [`SessionSnapshot`] so observers never see a half-applied batch.
//!
//! A reset bumps the [`SessionId`]. Batches tagged with an older id are
//! discarded when they arrive.

pub mod sequencer;
pub mod types;

pub use sequencer::BatchSequencer;
pub use types::{
    BatchDisposition, BatchRequest, DesignSelection, GenerationStatus, Message, Role,
    SessionSnapshot,
};

use crate::action::{Action, ActionScanner, Step};
use crate::config::SessionConfig;
use crate::error::{ApiError, TreeError};
use crate::tree::{BatchReport, FileTree};
use crate::types::SessionId;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

struct SessionState {
    id: SessionId,
    revision: u64,
    tree: FileTree,
    steps: Vec<Step>,
    selected_file: Option<String>,
    status: GenerationStatus,
    messages: Vec<Message>,
    design_selections: Vec<DesignSelection>,
    sequencer: BatchSequencer<Vec<Action>>,
}

impl SessionState {
    fn new(id: SessionId, revision: u64, root_name: &str) -> Self {
        Self {
            id,
            revision,
            tree: FileTree::new(root_name),
            steps: Vec::new(),
            selected_file: None,
            status: GenerationStatus::Idle,
            messages: Vec::new(),
            design_selections: Vec::new(),
            sequencer: BatchSequencer::new(),
        }
    }

    fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.id,
            revision: self.revision,
            tree: self.tree.clone(),
            steps: self.steps.clone(),
            selected_file: self.selected_file.clone(),
            status: self.status.clone(),
            messages: self.messages.clone(),
            design_selections: self.design_selections.clone(),
        }
    }
}

/// Generation session
pub struct Session {
    config: SessionConfig,
    state: Mutex<SessionState>,
    publisher: watch::Sender<Arc<SessionSnapshot>>,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        let state = SessionState::new(0, 0, &config.root_name);
        let (publisher, _) = watch::channel(Arc::new(state.snapshot()));
        Self {
            config,
            state: Mutex::new(state),
            publisher,
        }
    }

    pub fn current_id(&self) -> SessionId {
        self.state.lock().id
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> Arc<SessionSnapshot> {
        self.publisher.borrow().clone()
    }

    /// Observe every future publish.
    pub fn subscribe(&self) -> watch::Receiver<Arc<SessionSnapshot>> {
        self.publisher.subscribe()
    }

    /// Start a new session: tree, steps, selection and chat history clear together.
    pub fn reset(&self) -> SessionId {
        let mut state = self.state.lock();
        let id = state.id + 1;
        let revision = state.revision;
        *state = SessionState::new(id, revision, &self.config.root_name);
        info!(session_id = id, "Session reset");
        self.publish(&mut state);
        id
    }

    /// Reserve a place in the batch order for a request about to be sent.
    pub fn begin_request(&self) -> BatchRequest {
        let mut state = self.state.lock();
        BatchRequest {
            session_id: state.id,
            ticket: state.sequencer.issue(),
        }
    }

    /// Submit the actions answering `request`; applied once every earlier request is settled.
    pub fn submit_batch(&self, request: BatchRequest, actions: Vec<Action>) -> BatchDisposition {
        let mut state = self.state.lock();
        if let Some(discarded) = Self::check_current(&state, request.session_id) {
            return discarded;
        }
        let released = state.sequencer.submit(request.ticket, actions);
        self.apply_released(&mut state, released)
    }

    /// Settle `request` without actions, unblocking batches queued behind it.
    pub fn abandon_request(&self, request: BatchRequest) -> BatchDisposition {
        let mut state = self.state.lock();
        if let Some(discarded) = Self::check_current(&state, request.session_id) {
            return discarded;
        }
        debug!(ticket = request.ticket, "Abandoning batch request");
        let released = state.sequencer.abandon(request.ticket);
        self.apply_released(&mut state, released)
    }

    /// Scan a model response and submit its actions for `request`.
    pub fn ingest_response(
        &self,
        request: BatchRequest,
        scanner: &ActionScanner,
        text: &str,
    ) -> BatchDisposition {
        self.submit_batch(request, scanner.scan(text))
    }

    /// Apply a batch immediately, for callers that already serialize their batches.
    pub fn apply_batch(&self, session_id: SessionId, actions: Vec<Action>) -> BatchDisposition {
        let mut state = self.state.lock();
        if let Some(discarded) = Self::check_current(&state, session_id) {
            return discarded;
        }
        let report = self.apply_actions(&mut state, actions);
        self.publish(&mut state);
        BatchDisposition::Applied(report)
    }

    /// Append a user/assistant exchange to the chat history. False when stale.
    pub fn record_exchange(
        &self,
        session_id: SessionId,
        user: impl Into<String>,
        assistant: impl Into<String>,
    ) -> bool {
        let mut state = self.state.lock();
        if Self::check_current(&state, session_id).is_some() {
            return false;
        }
        state.messages.push(Message::user(user));
        state.messages.push(Message::assistant(assistant));
        self.publish(&mut state);
        true
    }

    /// Update generation status. False when stale.
    pub fn set_status(&self, session_id: SessionId, status: GenerationStatus) -> bool {
        let mut state = self.state.lock();
        if Self::check_current(&state, session_id).is_some() {
            return false;
        }
        state.status = status;
        self.publish(&mut state);
        true
    }

    /// Replace a file's content from the editor.
    pub fn edit_file(&self, path: &str, content: &str) -> Result<(), TreeError> {
        let mut state = self.state.lock();
        state.tree.set_content(path, content)?;
        self.publish(&mut state);
        Ok(())
    }

    /// Select an existing file for viewing.
    pub fn select_file(&self, path: &str) -> Result<(), TreeError> {
        let mut state = self.state.lock();
        let file_path = match state.tree.find(path) {
            Some(node) if node.is_file() => node.path().to_string(),
            Some(_) => {
                return Err(TreeError::NotAFile {
                    path: path.to_string(),
                })
            }
            None => {
                return Err(TreeError::NotFound {
                    path: path.to_string(),
                })
            }
        };
        state.selected_file = Some(file_path);
        self.publish(&mut state);
        Ok(())
    }

    /// Content of the selected file in the latest snapshot.
    pub fn selected_file_content(&self) -> Option<String> {
        self.snapshot().selected_file_content().map(str::to_string)
    }

    /// Use `variation_path` as the implementation of the component at `component_path`.
    ///
    /// The component must have been announced by a design step and list the
    /// variation. The variation file's content is written to the component path.
    pub fn select_design(&self, component_path: &str, variation_path: &str) -> Result<(), ApiError> {
        let mut state = self.state.lock();
        let state = &mut *state;

        let component = state
            .steps
            .iter()
            .filter_map(|step| match &step.action {
                Action::Designs { components } => Some(components.iter()),
                _ => None,
            })
            .flatten()
            .find(|c| c.path == component_path)
            .ok_or_else(|| {
                ApiError::Session(format!("Unknown design component: {}", component_path))
            })?;
        if !component.variations.iter().any(|v| v == variation_path) {
            return Err(ApiError::Session(format!(
                "'{}' is not a variation of {}",
                variation_path, component_path
            )));
        }

        let content = state
            .tree
            .find_file(variation_path)
            .map(|f| f.content.clone())
            .ok_or_else(|| TreeError::NotFound {
                path: variation_path.to_string(),
            })?;
        state.tree.write_file(component_path, &content)?;

        let selection = DesignSelection {
            component_path: component_path.to_string(),
            variation_path: variation_path.to_string(),
        };
        match state
            .design_selections
            .iter_mut()
            .find(|s| s.component_path == component_path)
        {
            Some(existing) => *existing = selection,
            None => state.design_selections.push(selection),
        }
        info!(component = component_path, variation = variation_path, "Design selected");
        self.publish(state);
        Ok(())
    }

    fn check_current(state: &SessionState, session_id: SessionId) -> Option<BatchDisposition> {
        if session_id == state.id {
            return None;
        }
        info!(
            batch_session = session_id,
            current_session = state.id,
            "Discarding batch from a previous session"
        );
        Some(BatchDisposition::Discarded {
            batch_session: session_id,
            current_session: state.id,
        })
    }

    fn apply_released(
        &self,
        state: &mut SessionState,
        released: Vec<Vec<Action>>,
    ) -> BatchDisposition {
        if released.is_empty() {
            return BatchDisposition::Held;
        }
        let mut report = BatchReport::default();
        for actions in released {
            report.merge(self.apply_actions(state, actions));
        }
        self.publish(state);
        BatchDisposition::Applied(report)
    }

    fn apply_actions(&self, state: &mut SessionState, actions: Vec<Action>) -> BatchReport {
        state.steps.extend(actions.into_iter().map(Step::pending));

        let mut report = BatchReport::default();
        for step in state.steps.iter_mut().filter(|s| s.is_pending()) {
            let result = state.tree.apply(&mut step.action);
            report.record(&step.action, result);
            step.complete();
        }

        if self.config.select_first_file && state.selected_file.is_none() {
            state.selected_file = report.created.first().cloned();
        }
        debug!(
            created = report.created.len(),
            updated = report.updated.len(),
            commands = report.commands.len(),
            conflicts = report.conflicts.len(),
            rejected = report.rejected.len(),
            "Batch applied"
        );
        report
    }

    fn publish(&self, state: &mut SessionState) {
        state.revision += 1;
        self.publisher.send_replace(Arc::new(state.snapshot()));
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
