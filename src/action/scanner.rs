//! Permissive action scanner
//!
//! Best-effort extraction of action tags from arbitrary text. Model output may
//! wrap tags in prose, omit attributes or stop mid-tag; anything that does not
//! form a complete, recognizable action is skipped. Scanning never fails.

use super::vocabulary::TagVocabulary;
use super::{Action, ComponentDesign, Step};
use regex::Regex;
use serde::Deserialize;
use tracing::{debug, warn};

/// Body of a `designs` action
#[derive(Debug, Deserialize)]
struct DesignsPayload {
    components: Vec<ComponentDesign>,
}

/// Tag scanner bound to one vocabulary
#[derive(Debug, Clone)]
pub struct ActionScanner {
    vocabulary: TagVocabulary,
    action_re: Regex,
    attribute_re: Regex,
}

impl ActionScanner {
    pub fn new(vocabulary: TagVocabulary) -> Self {
        let tag = regex::escape(vocabulary.action_tag());
        let action_re = Regex::new(&format!(r"(?s)<{tag}\s+([^>]*)>(.*?)</{tag}\s*>"))
            .expect("escaped tag name forms a valid pattern");
        let attribute_re =
            Regex::new(r#"(?:^|\s)([A-Za-z_:][-A-Za-z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
                .expect("valid attribute pattern");
        Self {
            vocabulary,
            action_re,
            attribute_re,
        }
    }

    pub fn vocabulary(&self) -> &TagVocabulary {
        &self.vocabulary
    }

    /// Extract every complete action tag in `text`, in order of appearance.
    pub fn scan(&self, text: &str) -> Vec<Action> {
        let mut actions = Vec::new();
        for captures in self.action_re.captures_iter(text) {
            let attributes = captures.get(1).map_or("", |m| m.as_str());
            let body = captures.get(2).map_or("", |m| m.as_str());
            if let Some(action) = self.interpret(attributes, body) {
                actions.push(action);
            }
        }
        debug!(count = actions.len(), "Scanned actions");
        actions
    }

    /// Scan and wrap every action as a pending step.
    pub fn scan_steps(&self, text: &str) -> Vec<Step> {
        self.scan(text).into_iter().map(Step::pending).collect()
    }

    fn interpret(&self, attributes: &str, body: &str) -> Option<Action> {
        let action_type = self.attribute(attributes, "type");
        match action_type.as_deref() {
            Some("file") => {
                let path = self
                    .attribute(attributes, "filePath")
                    .map(|p| p.trim().to_string())
                    .filter(|p| !p.is_empty());
                match path {
                    Some(path) => Some(Action::CreateFile {
                        path,
                        code: trim_blank_lines(body).to_string(),
                    }),
                    None => {
                        debug!("Skipping file action without filePath");
                        None
                    }
                }
            }
            Some("shell") => Some(Action::Shell {
                command: body.trim().to_string(),
            }),
            Some("designs") => match serde_json::from_str::<DesignsPayload>(body.trim()) {
                Ok(payload) => Some(Action::Designs {
                    components: payload.components,
                }),
                Err(e) => {
                    warn!(error = %e, "Dropping designs action with malformed JSON body");
                    None
                }
            },
            other => {
                debug!(action_type = ?other, "Skipping action with unrecognized type");
                None
            }
        }
    }

    fn attribute(&self, attributes: &str, name: &str) -> Option<String> {
        self.attribute_re
            .captures_iter(attributes)
            .find(|c| c.get(1).map_or(false, |m| m.as_str() == name))
            .and_then(|c| c.get(2).or_else(|| c.get(3)))
            .map(|m| m.as_str().to_string())
    }
}

impl Default for ActionScanner {
    fn default() -> Self {
        Self::new(TagVocabulary::default())
    }
}

/// Drop blank lines around a body while keeping the first line's indentation.
pub(crate) fn trim_blank_lines(body: &str) -> &str {
    let first = match body.find(|c: char| !c.is_whitespace()) {
        Some(index) => index,
        None => return "",
    };
    let start = body[..first].rfind('\n').map_or(0, |newline| newline + 1);
    body[start..].trim_end()
}
