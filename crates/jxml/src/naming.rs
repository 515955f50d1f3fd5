//! Key naming convention shared by both conversion directions
//!
//! A JSON object describing one element partitions its keys into three roles:
//!
//! - `<delim>name`: attribute `name`
//! - `<delim><delim>text`: the element's text content
//! - anything else: a child element (an array value means repeated siblings)

use crate::error::{Error, ErrorKind, Result};

/// Default delimiter used for the attribute and text markers
pub const DEFAULT_DELIMITER: &str = "_";

/// Characters accepted as a delimiter
pub const DELIMITER_CHARSET: &[char] = &[
    '.', '_', '=', '!', '@', '#', '~', '%', '&', '*', '^', '?', ',', '-',
];

const TEXT_SUFFIX: &str = "text";

/// Attribute and text marker keys derived from one delimiter
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Markers {
    pub attribute: String,
    pub text: String,
}

impl Markers {
    /// Validate `delimiter` and derive both markers from it
    pub fn new(delimiter: &str) -> Result<Self> {
        validate_delimiter(delimiter)?;
        Ok(Self {
            attribute: attribute_marker(delimiter),
            text: text_marker(delimiter),
        })
    }

    /// Attribute name carried by `key`, if `key` is an attribute key.
    ///
    /// The text marker is not an attribute key; callers check it first.
    pub fn attribute_name<'k>(&self, key: &'k str) -> Option<&'k str> {
        key.strip_prefix(self.attribute.as_str())
            .filter(|name| !name.is_empty())
    }

    pub fn attribute_key(&self, name: &str) -> String {
        format!("{}{name}", self.attribute)
    }

    pub fn is_text(&self, key: &str) -> bool {
        key == self.text
    }
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            attribute: attribute_marker(DEFAULT_DELIMITER),
            text: text_marker(DEFAULT_DELIMITER),
        }
    }
}

/// Prefix identifying attribute keys
pub fn attribute_marker(delimiter: &str) -> String {
    delimiter.to_string()
}

/// Key holding an element's text content
pub fn text_marker(delimiter: &str) -> String {
    format!("{delimiter}{delimiter}{TEXT_SUFFIX}")
}

/// Name as written to the output, optionally without its namespace prefix.
///
/// Only the first `:` splits, so `a:b:c` strips to `b:c`.
pub fn wire_name(raw: &str, keep_namespace: bool) -> &str {
    if keep_namespace {
        return raw;
    }
    match raw.split_once(':') {
        Some((_, local)) => local,
        None => raw,
    }
}

/// Check that `delimiter` is exactly one character from [`DELIMITER_CHARSET`]
pub fn validate_delimiter(delimiter: &str) -> Result<()> {
    let mut chars = delimiter.chars();
    match (chars.next(), chars.next()) {
        (Some(ch), None) if DELIMITER_CHARSET.contains(&ch) => Ok(()),
        _ => Err(Error::from_kind(ErrorKind::InvalidDelimiter {
            delimiter: delimiter.to_string(),
        })),
    }
}

/// True when `text` holds only tabs, newlines and spaces
pub fn is_blank(text: &str) -> bool {
    text.chars().all(|ch| matches!(ch, ' ' | '\t' | '\n' | '\r'))
}

/// Collapse tabs, newlines and runs of spaces into single spaces, then trim.
pub fn normalize_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;
    for ch in text.chars() {
        if matches!(ch, ' ' | '\t' | '\n' | '\r') {
            pending_space = true;
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(ch);
    }
    out
}
