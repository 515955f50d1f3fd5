//! JSON value tree used on the JSON side of a conversion
//!
//! Only objects, arrays and strings exist here. JSON booleans and numbers are
//! kept as their JSON text and `null` becomes an empty string when parsed.

use indexmap::map::{IntoIter, Iter, Keys};
use indexmap::IndexMap;
use serde::de::{self, Deserialize, DeserializeSeed, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::cell::Cell;
use std::fmt;
use std::ops::Index;

/// A JSON value as seen by the converters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Object (key-value pairs with order preservation)
    Object(Object),
    /// Array of values
    Array(Array),
    /// String value
    String(String),
}

impl Default for Value {
    fn default() -> Self {
        Self::Object(Object::new())
    }
}

impl Value {
    /// Returns the string value if this is a string, None otherwise
    pub fn as_string(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the object if this is an object, None otherwise
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Self::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Short type name used in error messages
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Object(_) => "object",
            Self::Array(_) => "array",
            Self::String(_) => "string",
        }
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<Array> for Value {
    fn from(value: Array) -> Self {
        Self::Array(value)
    }
}

impl From<Object> for Value {
    fn from(value: Object) -> Self {
        Self::Object(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(values: Vec<Value>) -> Self {
        Self::Array(Array(values))
    }
}

/// An order-preserving object (map of string keys to values)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Object(IndexMap<String, Value>);

impl Object {
    /// Creates a new empty object
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Creates a new object with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    /// Returns the number of key-value pairs in the object
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the object contains no key-value pairs
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Inserts a key-value pair into the object.
    ///
    /// An existing key keeps its position and has its value replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Returns an iterator over the keys
    pub fn keys(&self) -> Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Returns an iterator over key-value pairs
    pub fn iter(&self) -> Iter<'_, String, Value> {
        self.0.iter()
    }

    /// First key-value pair in insertion order
    pub fn first(&self) -> Option<(&String, &Value)> {
        self.0.first()
    }
}

impl Index<&str> for Object {
    type Output = Value;

    #[allow(clippy::indexing_slicing)]
    fn index(&self, key: &str) -> &Self::Output {
        &self.0[key]
    }
}

impl<'a> IntoIterator for &'a Object {
    type Item = (&'a String, &'a Value);
    type IntoIter = Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Object {
    type Item = (String, Value);
    type IntoIter = IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self(IndexMap::from_iter(iter))
    }
}

/// An array of values
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Array(Vec<Value>);

impl Array {
    /// Creates a new empty array
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Returns the number of elements in the array
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the array contains no elements
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the array
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Array {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<Value>> for Array {
    fn from(values: Vec<Value>) -> Self {
        Self(values)
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self(Vec::from_iter(iter))
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Array(arr) => {
                let mut seq = serializer.serialize_seq(Some(arr.len()))?;
                for element in arr {
                    seq.serialize_element(element)?;
                }
                seq.end()
            }
            Self::Object(obj) => {
                let mut map = serializer.serialize_map(Some(obj.len()))?;
                for (k, v) in obj {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let exceeded = Cell::new(false);
        ValueSeed::new(None, &exceeded).deserialize(deserializer)
    }
}

/// Deserializes a [`Value`], allowing at most `remaining` nested containers.
///
/// Running out of depth sets `exceeded` before failing, so callers can tell
/// the limit apart from a syntax error.
#[derive(Clone, Copy)]
pub(crate) struct ValueSeed<'a> {
    remaining: Option<usize>,
    exceeded: &'a Cell<bool>,
}

impl<'a> ValueSeed<'a> {
    pub(crate) const fn new(max_containers: Option<usize>, exceeded: &'a Cell<bool>) -> Self {
        Self {
            remaining: max_containers,
            exceeded,
        }
    }

    /// Seed for the values inside a container opened at this level
    fn enter<E: de::Error>(self) -> Result<Self, E> {
        match self.remaining {
            Some(0) => {
                self.exceeded.set(true);
                Err(E::custom("max depth exceeded"))
            }
            remaining => Ok(Self {
                remaining: remaining.map(|n| n.saturating_sub(1)),
                exceeded: self.exceeded,
            }),
        }
    }
}

impl<'de> DeserializeSeed<'de> for ValueSeed<'_> {
    type Value = Value;

    fn deserialize<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(ValueVisitor { seed: self })
    }
}

struct ValueVisitor<'a> {
    seed: ValueSeed<'a>,
}

impl<'de> Visitor<'de> for ValueVisitor<'_> {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("any valid JSON value")
    }

    fn visit_bool<E>(self, value: bool) -> Result<Value, E> {
        Ok(Value::String(value.to_string()))
    }

    fn visit_i64<E>(self, value: i64) -> Result<Value, E> {
        Ok(Value::String(value.to_string()))
    }

    fn visit_u64<E>(self, value: u64) -> Result<Value, E> {
        Ok(Value::String(value.to_string()))
    }

    fn visit_f64<E>(self, value: f64) -> Result<Value, E> {
        Ok(Value::String(value.to_string()))
    }

    fn visit_str<E>(self, value: &str) -> Result<Value, E> {
        Ok(Value::String(value.to_string()))
    }

    fn visit_string<E>(self, value: String) -> Result<Value, E> {
        Ok(Value::String(value))
    }

    fn visit_unit<E>(self) -> Result<Value, E> {
        Ok(Value::String(String::new()))
    }

    fn visit_none<E>(self) -> Result<Value, E> {
        Ok(Value::String(String::new()))
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        self.seed.deserialize(deserializer)
    }

    fn visit_seq<A>(self, mut seq: A) -> Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let inner = self.seed.enter()?;
        let mut values = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(elem) = seq.next_element_seed(inner)? {
            values.push(elem);
        }
        Ok(Value::Array(Array(values)))
    }

    fn visit_map<A>(self, mut map: A) -> Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let inner = self.seed.enter()?;
        let mut values = Object::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(key) = map.next_key::<String>()? {
            let value = map.next_value_seed(inner)?;
            values.insert(key, value);
        }
        Ok(Value::Object(values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_limited(input: &str, max_containers: usize) -> (serde_json::Result<Value>, bool) {
        let exceeded = Cell::new(false);
        let mut de = serde_json::Deserializer::from_str(input);
        let result = ValueSeed::new(Some(max_containers), &exceeded).deserialize(&mut de);
        (result, exceeded.get())
    }

    #[test]
    fn test_value_as_methods() {
        assert_eq!(Value::from("hello").as_string(), Some("hello"));
        assert_eq!(Value::Object(Object::new()).as_string(), None);
        assert!(Value::Object(Object::new()).as_object().is_some());
        assert!(Value::from("x").as_object().is_none());
    }

    #[test]
    fn test_kind_name() {
        assert_eq!(Value::from("x").kind_name(), "string");
        assert_eq!(Value::Array(Array::new()).kind_name(), "array");
        assert_eq!(Value::Object(Object::new()).kind_name(), "object");
    }

    #[test]
    fn test_object_order_preservation() {
        let mut obj = Object::new();
        obj.insert("first", "1");
        obj.insert("second", "2");
        obj.insert("third", "3");

        let keys: Vec<_> = obj.keys().collect();
        assert_eq!(keys, vec!["first", "second", "third"]);

        obj.insert("first", "updated");
        let keys: Vec<_> = obj.keys().collect();
        assert_eq!(keys, vec!["first", "second", "third"]);
        assert_eq!(obj["first"], Value::from("updated"));
        assert_eq!(obj.first().map(|(k, _)| k.as_str()), Some("first"));
    }

    #[test]
    fn test_array_from_values() {
        let arr: Array = vec![Value::from("a"), Value::Object(Object::new())].into();
        assert_eq!(arr.len(), 2);
        assert_eq!(arr.iter().next(), Some(&Value::from("a")));
    }

    #[test]
    fn test_seed_counts_containers() {
        let (result, exceeded) = parse_limited(r#"{"a":[{"b":"1"}]}"#, 3);
        assert!(result.is_ok());
        assert!(!exceeded);

        let (result, exceeded) = parse_limited(r#"{"a":[{"b":"1"}]}"#, 2);
        assert!(result.is_err());
        assert!(exceeded);
    }

    #[test]
    fn test_seed_syntax_error_is_not_depth() {
        let (result, exceeded) = parse_limited(r#"{"a":"#, 8);
        assert!(result.is_err());
        assert!(!exceeded);
    }
}
