//! JSON text <-> [`Value`] through `serde_json`

use std::cell::Cell;

use serde::de::DeserializeSeed;

use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::value::{Value, ValueSeed};

/// Parse JSON text into a value tree without a nesting limit
pub fn from_str(input: &str) -> Result<Value> {
    from_str_with_max_depth(input, 0)
}

/// Parse JSON text, rejecting documents nested deeper than `max_depth`
/// elements (0 means unlimited).
///
/// An element level costs at most two JSON containers, its contents object
/// and the array of its repetition group, and the root wrapper adds one more.
/// The encoder checks the exact element depth afterwards.
pub fn from_str_with_max_depth(input: &str, max_depth: u16) -> Result<Value> {
    let max_containers = (max_depth > 0).then(|| usize::from(max_depth) * 2 + 1);
    let exceeded = Cell::new(false);

    let mut de = serde_json::Deserializer::from_str(input);
    de.disable_recursion_limit();
    let parsed = ValueSeed::new(max_containers, &exceeded)
        .deserialize(&mut de)
        .and_then(|value| de.end().map(|()| value));

    parsed.map_err(|err| {
        let line = u32::try_from(err.line()).unwrap_or(u32::MAX);
        let col = u32::try_from(err.column()).unwrap_or(u32::MAX);
        let span = Span::at(Pos::new(0, line, col));
        if exceeded.get() {
            Error::new(ErrorKind::MaxDepthExceeded { max: max_depth }, span)
        } else {
            Error::with_message(ErrorKind::JsonParse, span, err.to_string())
        }
    })
}

/// Render a value tree as compact JSON.
///
/// No whitespace is inserted and HTML-sensitive characters are not escaped.
pub fn to_string(value: &Value) -> Result<String> {
    serde_json::to_string(value).map_err(|err| {
        Error::with_message(ErrorKind::JsonSerialize, Span::empty(), err.to_string())
    })
}
