//! Error types.
//!
//! Two families live here:
//!
//! - Hard failures (`ParseError`, `DomError`): returned through `Result`.
//!   A `ParseError` means there is no document to work on at all.
//! - Recoverable findings (`TransformError`): appended to an
//!   `ErrorCollection` that travels alongside the document. Transformers
//!   never abort the pipeline for these.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::dom::{Document, NodeId};

// ============================================================================
// Hard failures
// ============================================================================

/// Input could not be turned into a document.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("input is empty")]
    Empty,

    #[error("input contains no element")]
    NoElement,

    #[error("html parser failed: {0}")]
    Parser(String),
}

/// Invalid tree access or mutation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomError {
    #[error("node not found: {0}")]
    NodeNotFound(NodeId),

    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    #[error("cannot attach node {child} under {parent}: would create a cycle")]
    Cycle { parent: NodeId, child: NodeId },
}

// ============================================================================
// ErrorKind
// ============================================================================

/// Closed set of recoverable error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    InvalidLength,
    UnsupportedLayout,
    CannotPreloadImage,
    TooManyHeroImages,
    CannotParseCss,
    /// Catch-all for a transformer that failed unexpectedly.
    CannotAdapt,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidLength => "InvalidLength",
            Self::UnsupportedLayout => "UnsupportedLayout",
            Self::CannotPreloadImage => "CannotPreloadImage",
            Self::TooManyHeroImages => "TooManyHeroImages",
            Self::CannotParseCss => "CannotParseCss",
            Self::CannotAdapt => "CannotAdapt",
        }
    }

    /// Notes are informational: the markup is still valid.
    pub const fn is_note(&self) -> bool {
        matches!(self, Self::CannotPreloadImage)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// TransformError
// ============================================================================

/// A single recoverable finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformError {
    pub kind: ErrorKind,
    pub message: String,
    /// Offending node, as a handle into the document arena.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeId>,
    /// Tag name of the offending node at the time of recording.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

impl TransformError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            node: None,
            tag: None,
        }
    }

    /// Attach the offending node.
    pub fn at(mut self, doc: &Document, node: NodeId) -> Self {
        self.node = Some(node);
        self.tag = doc.get(node).and_then(|n| n.tag()).map(str::to_string);
        self
    }
}

impl fmt::Display for TransformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(tag) => write!(f, "{} <{}>: {}", self.kind, tag, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

// ============================================================================
// ErrorCollection
// ============================================================================

/// Ordered, append-only sink of recoverable errors.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ErrorCollection {
    errors: Vec<TransformError>,
}

impl ErrorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: TransformError) {
        self.errors.push(error);
    }

    /// Record an error that is not tied to a node.
    pub fn record(&mut self, kind: ErrorKind, message: impl Into<String>) {
        self.push(TransformError::new(kind, message));
    }

    /// Record an error against a node.
    pub fn record_at(
        &mut self,
        doc: &Document,
        node: NodeId,
        kind: ErrorKind,
        message: impl Into<String>,
    ) {
        self.push(TransformError::new(kind, message).at(doc, node));
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransformError> {
        self.errors.iter()
    }

    /// Number of entries of the given kind.
    pub fn count(&self, kind: ErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind == kind).count()
    }

    pub fn has(&self, kind: ErrorKind) -> bool {
        self.errors.iter().any(|e| e.kind == kind)
    }

    /// True when something other than a note was recorded.
    pub fn has_errors(&self) -> bool {
        self.errors.iter().any(|e| !e.kind.is_note())
    }

    pub fn as_slice(&self) -> &[TransformError] {
        &self.errors
    }

    pub fn into_vec(self) -> Vec<TransformError> {
        self.errors
    }
}

impl<'a> IntoIterator for &'a ErrorCollection {
    type Item = &'a TransformError;
    type IntoIter = std::slice::Iter<'a, TransformError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_preserves_order() {
        let mut errors = ErrorCollection::new();
        errors.record(ErrorKind::InvalidLength, "first");
        errors.record(ErrorKind::CannotParseCss, "second");
        errors.record(ErrorKind::InvalidLength, "third");

        let messages: Vec<_> = errors.iter().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, vec!["first", "second", "third"]);
        assert_eq!(errors.count(ErrorKind::InvalidLength), 2);
        assert!(errors.has(ErrorKind::CannotParseCss));
        assert!(!errors.has(ErrorKind::CannotAdapt));
    }

    #[test]
    fn test_notes_are_not_errors() {
        let mut errors = ErrorCollection::new();
        errors.record(ErrorKind::CannotPreloadImage, "srcset");
        assert!(!errors.is_empty());
        assert!(!errors.has_errors());

        errors.record(ErrorKind::TooManyHeroImages, "cap");
        assert!(errors.has_errors());
    }

    #[test]
    fn test_record_at_captures_tag() {
        let doc = Document::parse("<html><body><amp-img width=\"x\"></amp-img></body></html>")
            .unwrap();
        let img = doc.find_by_tag("amp-img")[0];

        let mut errors = ErrorCollection::new();
        errors.record_at(&doc, img, ErrorKind::InvalidLength, "bad width");

        let error = errors.iter().next().unwrap();
        assert_eq!(error.node, Some(img));
        assert_eq!(error.tag.as_deref(), Some("amp-img"));
        assert_eq!(error.to_string(), "InvalidLength <amp-img>: bad width");
    }

    #[test]
    fn test_serialize_report() {
        let mut errors = ErrorCollection::new();
        errors.record(ErrorKind::CannotAdapt, "boom");
        let json = serde_json::to_string(&errors).unwrap();
        assert_eq!(json, r#"[{"kind":"CannotAdapt","message":"boom"}]"#);
    }
}
