//! Error types for zxml
//!
//! Every [`Error`] means the input was rejected as invalid XML. No partial
//! document is ever returned next to one.

use std::fmt;
use thiserror::Error;

/// Position in source input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.offset, self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }
}

/// Span representing a range in source input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.start.line == 0 && self.end.line == 0
    }
}

/// Why the input was rejected
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    EmptyInput,
    MissingRoot,
    InvalidToken,
    InvalidUtf8,
    InvalidEntity { entity: String },
    UnexpectedEof,
    MismatchedTag { expected: String, found: String },
    DuplicateAttribute { name: String },
    UnbalancedDocument,
    MaxDepthExceeded { max: u32 },
    MaxSizeExceeded { max: usize },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(f, "empty input"),
            Self::MissingRoot => write!(f, "no root element"),
            Self::InvalidToken => write!(f, "invalid token"),
            Self::InvalidUtf8 => write!(f, "invalid utf-8"),
            Self::InvalidEntity { entity } => write!(f, "invalid entity: &{entity};"),
            Self::UnexpectedEof => write!(f, "unexpected end of input"),
            Self::MismatchedTag { expected, found } => {
                write!(f, "mismatched closing tag: expected </{expected}>, found </{found}>")
            }
            Self::DuplicateAttribute { name } => write!(f, "duplicate attribute: {name}"),
            Self::UnbalancedDocument => write!(f, "unbalanced element nesting"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
        }
    }
}

/// Invalid input error
#[derive(Error, Clone, Debug, PartialEq)]
#[error("invalid xml at {}: {}", .span.start, .message)]
pub struct Error {
    kind: ErrorKind,
    span: Span,
    message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, span: Span) -> Self {
        let message = kind.to_string();
        Self {
            kind,
            span,
            message,
        }
    }

    pub fn with_message(kind: ErrorKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            kind,
            span,
            message: message.into(),
        }
    }

    /// Create error at specific position
    pub fn at(kind: ErrorKind, pos: Pos) -> Self {
        Self::new(kind, Span::new(pos, pos))
    }

    /// Create error without position information
    pub fn unpositioned(kind: ErrorKind) -> Self {
        Self::new(kind, Span::empty())
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Result type alias for zxml
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pos_display() {
        let pos = Pos::new(42, 10, 5);
        assert_eq!(pos.to_string(), "42:10:5");
    }

    #[test]
    fn test_error_creation() {
        let err = Error::at(ErrorKind::InvalidToken, Pos::new(0, 1, 1));
        assert_eq!(err.kind(), &ErrorKind::InvalidToken);
        assert!(!err.span().is_empty());
    }

    #[test]
    fn test_unpositioned_error() {
        let err = Error::unpositioned(ErrorKind::UnbalancedDocument);
        assert!(err.span().is_empty());
        assert_eq!(err.message(), "unbalanced element nesting");
    }

    #[test]
    fn test_error_display() {
        let err = Error::at(
            ErrorKind::MismatchedTag {
                expected: "a".to_string(),
                found: "b".to_string(),
            },
            Pos::new(10, 2, 5),
        );
        let display = err.to_string();
        assert!(display.contains("invalid xml at 10:2:5"));
        assert!(display.contains("expected </a>, found </b>"));
    }
}
