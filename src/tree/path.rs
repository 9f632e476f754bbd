//! Virtual path resolution
//!
//! Splits a slash-delimited path into its non-empty segments. The last segment
//! names the leaf; the rest name folders that must exist or be created.

use crate::error::TreeError;

/// Which characters separate segments
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separators {
    /// `/` only
    Slash,
    /// `/` and `\`
    SlashOrBackslash,
}

impl Separators {
    fn is_separator(self, c: char) -> bool {
        match self {
            Separators::Slash => c == '/',
            Separators::SlashOrBackslash => c == '/' || c == '\\',
        }
    }
}

/// A path split into segments, with at least one segment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPath {
    segments: Vec<String>,
}

impl ResolvedPath {
    /// Resolve `path`; leading, trailing and repeated separators and `.` segments are dropped.
    ///
    /// `..` is rejected: a tree path never climbs above the root.
    pub fn parse(path: &str, separators: Separators) -> Result<Self, TreeError> {
        let mut segments: Vec<String> = Vec::new();
        for segment in path.split(|c| separators.is_separator(c)) {
            match segment {
                "" | "." => continue,
                ".." => {
                    return Err(TreeError::InvalidSegment {
                        path: path.to_string(),
                        segment: segment.to_string(),
                    })
                }
                _ => segments.push(segment.to_string()),
            }
        }
        if segments.is_empty() {
            return Err(TreeError::EmptyPath {
                path: path.to_string(),
            });
        }
        Ok(Self { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Folder segments leading to the leaf.
    pub fn parents(&self) -> &[String] {
        &self.segments[..self.segments.len() - 1]
    }

    pub fn leaf(&self) -> &str {
        &self.segments[self.segments.len() - 1]
    }

    /// Canonical form: segments joined by `/`, no leading slash.
    pub fn joined(&self) -> String {
        self.segments.join("/")
    }
}
