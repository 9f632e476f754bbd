//! Strict XML ingestion
//!
//! Parses a well-formed artifact document and builds a file tree directly.
//! Unlike the scanner, malformed markup is an error for the whole call.
//!
//! Tolerated variations:
//! - the artifact wrapper may be missing (the document is wrapped automatically)
//! - `type` and `filePath` may be attributes (optionally namespace-prefixed) or child elements
//! - content may be the action's text, or the text of its other child elements joined by newlines

use super::scanner::trim_blank_lines;
use super::vocabulary::TagVocabulary;
use super::Action;
use crate::error::ParseError;
use crate::tree::{BatchReport, FileTree, ResolvedPath, Separators};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};

/// Root name for trees built by strict ingestion
pub const PROJECT_ROOT_NAME: &str = "Project Root";

/// Root name when the artifact holds no actions
pub const EMPTY_PROJECT_NAME: &str = "Empty Project";

const FIELD_TYPE: &str = "type";
const FIELD_FILE_PATH: &str = "filePath";

/// Minimal element tree of a parsed document
#[derive(Debug, Default)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn from_start(start: &BytesStart<'_>, position: usize) -> Result<Self, ParseError> {
        let name = utf8(start.name().as_ref(), position)?;
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr.map_err(|e| xml_error(position, e))?;
            let key = utf8(attr.key.local_name().as_ref(), position)?;
            let value = attr
                .unescape_value()
                .map_err(|e| xml_error(position, e))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            ..Self::default()
        })
    }

    fn local_name(&self) -> &str {
        self.name.rsplit(':').next().unwrap_or(&self.name)
    }

    fn append_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push('\n');
        }
        self.text.push_str(text);
    }

    /// Own text followed by descendants' text.
    fn text_content(&self) -> String {
        let mut parts = Vec::new();
        if !self.text.is_empty() {
            parts.push(self.text.clone());
        }
        for child in &self.children {
            let text = child.text_content();
            if !text.is_empty() {
                parts.push(text);
            }
        }
        parts.join("\n")
    }

    /// Attribute value, falling back to a child element of the same name.
    fn field(&self, name: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.clone())
            .or_else(|| {
                self.children
                    .iter()
                    .find(|c| c.local_name() == name)
                    .map(Element::text_content)
            })
    }

    fn content(&self) -> String {
        if !self.text.trim().is_empty() {
            return trim_blank_lines(&self.text).to_string();
        }
        let joined = self
            .children
            .iter()
            .filter(|c| c.local_name() != FIELD_TYPE && c.local_name() != FIELD_FILE_PATH)
            .map(Element::text_content)
            .collect::<Vec<_>>()
            .join("\n");
        trim_blank_lines(&joined).to_string()
    }

    fn collect_named<'a>(&'a self, name: &str, out: &mut Vec<&'a Element>) {
        for child in &self.children {
            if child.local_name() == name {
                out.push(child);
            } else {
                child.collect_named(name, out);
            }
        }
    }

    fn collect_file_actions<'a>(&'a self, out: &mut Vec<&'a Element>) {
        for child in &self.children {
            let is_file = child.field(FIELD_TYPE).as_deref() == Some("file");
            if is_file && child.field(FIELD_FILE_PATH).is_some() {
                out.push(child);
            } else {
                child.collect_file_actions(out);
            }
        }
    }
}

/// Strict ingestion bound to one vocabulary
#[derive(Debug, Clone, Default)]
pub struct StrictIngestor {
    vocabulary: TagVocabulary,
}

impl StrictIngestor {
    pub fn new(vocabulary: TagVocabulary) -> Self {
        Self { vocabulary }
    }

    /// Parse `xml` and build its file tree.
    pub fn ingest(&self, xml: &str) -> Result<FileTree, ParseError> {
        self.ingest_with_report(xml).map(|(tree, _)| tree)
    }

    /// Parse `xml`, build its file tree, and report what each action did.
    pub fn ingest_with_report(&self, xml: &str) -> Result<(FileTree, BatchReport), ParseError> {
        let artifact_tag = self.vocabulary.artifact_tag();
        let action_tag = self.vocabulary.action_tag();

        let trimmed = xml.trim();
        let document = if trimmed.starts_with("<?xml")
            || trimmed.starts_with(&format!("<{}", artifact_tag))
        {
            parse_document(xml)?
        } else {
            parse_document(&format!("<{0}>{1}</{0}>", artifact_tag, xml))?
        };

        let artifact = document
            .children
            .iter()
            .find(|e| e.local_name() == artifact_tag)
            .or_else(|| {
                document
                    .children
                    .iter()
                    .find(|e| e.local_name() == "root")
                    .and_then(|root| root.children.iter().find(|e| e.local_name() == artifact_tag))
            });

        let actions: Vec<&Element> = match artifact {
            Some(artifact) => {
                let actions: Vec<&Element> = artifact
                    .children
                    .iter()
                    .filter(|e| e.local_name() == action_tag)
                    .collect();
                if actions.is_empty() {
                    warn!(artifact_tag, action_tag, "Artifact contains no actions");
                    return Ok((FileTree::new(EMPTY_PROJECT_NAME), BatchReport::default()));
                }
                actions
            }
            None => {
                warn!(artifact_tag, "No artifact wrapper found, searching document for actions");
                let mut actions = Vec::new();
                document.collect_named(action_tag, &mut actions);
                if actions.is_empty() {
                    document.collect_file_actions(&mut actions);
                }
                if actions.is_empty() {
                    return Err(ParseError::NoActions);
                }
                actions
            }
        };

        Ok(build_tree(&actions))
    }
}

fn build_tree(actions: &[&Element]) -> (FileTree, BatchReport) {
    let mut tree = FileTree::new(PROJECT_ROOT_NAME);
    let mut report = BatchReport::default();

    for element in actions {
        let action_type = element.field(FIELD_TYPE);
        let raw_path = element
            .field(FIELD_FILE_PATH)
            .map(|p| p.trim().to_string())
            .unwrap_or_default();
        if action_type.as_deref() != Some("file") || raw_path.is_empty() {
            debug!(action_type = ?action_type, path = %raw_path, "Skipping action");
            continue;
        }

        let code = element.content();
        match ResolvedPath::parse(&raw_path, Separators::SlashOrBackslash) {
            Ok(resolved) => {
                let mut action = Action::CreateFile {
                    path: resolved.joined(),
                    code,
                };
                let result = tree.apply(&mut action);
                report.record(&action, result);
            }
            Err(e) => {
                let action = Action::CreateFile {
                    path: raw_path,
                    code,
                };
                report.record(&action, Err(e));
            }
        }
    }

    (tree, report)
}

fn parse_document(xml: &str) -> Result<Element, ParseError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(true);

    let mut stack = vec![Element::default()];
    loop {
        let position = reader.buffer_position();
        match reader.read_event().map_err(|e| xml_error(position, e))? {
            Event::Start(start) => stack.push(Element::from_start(&start, position)?),
            Event::Empty(start) => {
                let element = Element::from_start(&start, position)?;
                current(&mut stack).children.push(element);
            }
            Event::End(_) => {
                if stack.len() < 2 {
                    return Err(ParseError::Xml {
                        position,
                        message: "closing tag without matching opening tag".to_string(),
                    });
                }
                let element = stack.pop().unwrap_or_default();
                current(&mut stack).children.push(element);
            }
            Event::Text(text) => {
                let text = text.unescape().map_err(|e| xml_error(position, e))?;
                current(&mut stack).append_text(&text);
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data).into_owned();
                current(&mut stack).append_text(&text);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if stack.len() != 1 {
        let open = stack.last().map(|e| e.name.clone()).unwrap_or_default();
        return Err(ParseError::Xml {
            position: xml.len(),
            message: format!("unclosed element <{}>", open),
        });
    }
    Ok(stack.pop().unwrap_or_default())
}

fn current(stack: &mut [Element]) -> &mut Element {
    let last = stack.len() - 1;
    &mut stack[last]
}

fn utf8(bytes: &[u8], position: usize) -> Result<String, ParseError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| xml_error(position, e))
}

fn xml_error(position: usize, error: impl std::fmt::Display) -> ParseError {
    ParseError::Xml {
        position,
        message: error.to_string(),
    }
}
