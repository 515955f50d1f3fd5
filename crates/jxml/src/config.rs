//! Conversion options

use crate::error::{Error, ErrorKind, Result};
use crate::naming::{Markers, DEFAULT_DELIMITER};

/// Options shared by both conversion directions
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// Keep `prefix:` on element names (default: true)
    pub keep_namespace: bool,
    /// Attribute marker; must be one of `. _ = ! @ # ~ % & * ^ ? , -`
    pub delimiter: String,
    /// Maximum nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keep_namespace: true,
            delimiter: DEFAULT_DELIMITER.to_string(),
            max_depth: 128,
            max_size: 10 * 1024 * 1024, // 10 MB default
        }
    }
}

impl Config {
    /// Default naming options with no depth or size limits
    pub fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
            ..Self::default()
        }
    }

    pub fn with_keep_namespace(mut self, keep_namespace: bool) -> Self {
        self.keep_namespace = keep_namespace;
        self
    }

    pub fn with_delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    pub const fn with_max_depth(mut self, max_depth: u16) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub const fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = max_size;
        self
    }

    /// Validate the delimiter and derive the marker keys
    pub fn markers(&self) -> Result<Markers> {
        Markers::new(&self.delimiter)
    }

    pub(crate) fn check_size(&self, input: &str) -> Result<()> {
        if self.max_size > 0 && input.len() > self.max_size {
            return Err(Error::from_kind(ErrorKind::MaxSizeExceeded {
                max: self.max_size,
            }));
        }
        Ok(())
    }

    /// Fail once `depth` goes past the configured limit
    pub(crate) fn check_depth(&self, depth: usize) -> Result<()> {
        if self.max_depth > 0 && depth > usize::from(self.max_depth) {
            return Err(Error::from_kind(ErrorKind::MaxDepthExceeded {
                max: self.max_depth,
            }));
        }
        Ok(())
    }
}
