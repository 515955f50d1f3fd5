//! Error types for jxml

use std::fmt;
use thiserror::Error;

/// Position in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pos {
    pub offset: usize,
    pub line: u32,
    pub col: u32,
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

impl Pos {
    pub const fn new(offset: usize, line: u32, col: u32) -> Self {
        Self { offset, line, col }
    }

    /// Locate a byte offset in `text`, counting 1-based lines and columns.
    ///
    /// Offsets past the end clamp to the end of the text.
    pub fn locate(text: &str, offset: usize) -> Self {
        let offset = offset.min(text.len());
        let mut line: u32 = 1;
        let mut col: u32 = 1;
        for b in text.bytes().take(offset) {
            if b == b'\n' {
                line = line.saturating_add(1);
                col = 1;
            } else {
                col = col.saturating_add(1);
            }
        }
        Self { offset, line, col }
    }

    const fn is_known(&self) -> bool {
        self.line > 0
    }
}

/// Span representing a range in source text
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Span {
    pub start: Pos,
    pub end: Pos,
}

impl Span {
    pub const fn new(start: Pos, end: Pos) -> Self {
        Self { start, end }
    }

    pub const fn at(pos: Pos) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    pub const fn empty() -> Self {
        Self {
            start: Pos::new(0, 0, 0),
            end: Pos::new(0, 0, 0),
        }
    }
}

/// Error kind for detailed categorization
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// No source text was supplied
    NullInput,
    /// Delimiter is not a single character from the allowed set
    InvalidDelimiter { delimiter: String },
    /// JSON root object has no keys
    MalformedRoot,
    /// JSON root object has more than one key
    AmbiguousRoot { count: usize },
    /// A JSON position holds the wrong kind of value
    TypeMismatch {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
    /// XML text does not parse
    MalformedInput,
    /// JSON text does not parse
    JsonParse,
    /// The JSON writer failed to render the value tree
    JsonSerialize,
    /// The XML writer rejected the element tree
    XmlSerialize,
    MaxDepthExceeded { max: u16 },
    MaxSizeExceeded { max: usize },
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NullInput => write!(f, "input should not be null"),
            Self::InvalidDelimiter { delimiter } => write!(
                f,
                "delimiter {delimiter:?} must follow this pattern: '[._=!@#~%&*^?,-]'"
            ),
            Self::MalformedRoot => {
                write!(f, "json should contain a root element to be converted to xml")
            }
            Self::AmbiguousRoot { count } => write!(
                f,
                "json should contain only a single root element to be converted to xml, found {count}"
            ),
            Self::TypeMismatch {
                path,
                expected,
                found,
            } => write!(f, "expected {expected} at `{path}`, found {found}"),
            Self::MalformedInput => write!(f, "malformed xml input"),
            Self::JsonParse => write!(f, "invalid json input"),
            Self::JsonSerialize => write!(f, "failed to serialize json"),
            Self::XmlSerialize => write!(f, "failed to serialize xml"),
            Self::MaxDepthExceeded { max } => write!(f, "max depth exceeded: {max}"),
            Self::MaxSizeExceeded { max } => write!(f, "max size exceeded: {max}"),
        }
    }
}

/// Main error type for jxml
#[derive(Error, Clone, Debug, PartialEq)]
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

    /// Error with no source position
    pub fn from_kind(kind: ErrorKind) -> Self {
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

    pub(crate) fn type_mismatch(path: &str, expected: &'static str, found: &'static str) -> Self {
        Self::from_kind(ErrorKind::TypeMismatch {
            path: path.to_string(),
            expected,
            found,
        })
    }

    pub(crate) fn xml_serialize(message: impl Into<String>) -> Self {
        Self::with_message(ErrorKind::XmlSerialize, Span::empty(), message)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.span.start.is_known() {
            write!(f, "error at {}: {}", self.span.start, self.message)
        } else {
            f.write_str(&self.message)
        }
    }
}

/// Result type alias for jxml
pub type Result<T> = std::result::Result<T, Error>;
