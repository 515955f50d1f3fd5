//! XML element tree -> JSON value tree
//!
//! Sibling elements sharing a wire name form a repetition group. A group of
//! one becomes a nested object; a group of two or more becomes an array of
//! objects in document order, stored once under the shared name at the
//! position of its first member.

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::config::Config;
use crate::error::Result;
use crate::naming::{is_blank, normalize_text, wire_name, Markers};
use crate::value::{Array, Object, Value};
use crate::xml::model::{Document, Element};

/// Build the JSON value tree for an XML document.
///
/// The result is a single-key object: the root element's wire name mapped to
/// its contents.
pub fn decode(doc: &Document, config: &Config) -> Result<Value> {
    let markers = config.markers()?;
    let decoder = Decoder {
        config,
        markers: &markers,
    };

    let mut root = Object::with_capacity(1);
    root.insert(
        wire_name(&doc.root.name, config.keep_namespace),
        decoder.contents(&doc.root, 1)?,
    );
    Ok(Value::Object(root))
}

struct Decoder<'c> {
    config: &'c Config,
    markers: &'c Markers,
}

impl Decoder<'_> {
    /// Contents object for one element: attributes, then child groups, then text
    fn contents(&self, element: &Element, depth: usize) -> Result<Object> {
        self.config.check_depth(depth)?;

        let mut obj = Object::new();

        for (name, value) in &element.attributes {
            if !self.config.keep_namespace && value.contains(':') {
                debug!(element = %element.name, attribute = %name, "dropping attribute with ':' in value");
                continue;
            }
            put(&mut obj, element, self.markers.attribute_key(name), value.as_str());
        }

        for (name, group) in self.groups(element) {
            trace!(name, size = group.len(), "repetition group");
            let value = match group.as_slice() {
                [single] => Value::Object(self.contents(single, depth + 1)?),
                members => Value::Array(
                    members
                        .iter()
                        .map(|member| self.contents(member, depth + 1).map(Value::Object))
                        .collect::<Result<Array>>()?,
                ),
            };
            put(&mut obj, element, name, value);
        }

        if let Some(text) = element.leading_text().filter(|text| !is_blank(text)) {
            put(&mut obj, element, self.markers.text.as_str(), normalize_text(text));
        }

        Ok(obj)
    }

    /// Partition child elements by wire name, in order of first occurrence
    fn groups<'e>(&self, element: &'e Element) -> IndexMap<&'e str, Vec<&'e Element>> {
        let mut groups: IndexMap<&str, Vec<&Element>> = IndexMap::new();
        for child in element.child_elements() {
            groups
                .entry(wire_name(&child.name, self.config.keep_namespace))
                .or_default()
                .push(child);
        }
        groups
    }
}

/// Insert into a contents object. A child or text key that reuses an
/// attribute key replaces the earlier value in place.
fn put(obj: &mut Object, element: &Element, key: impl Into<String>, value: impl Into<Value>) {
    let key = key.into();
    if obj.insert(key.as_str(), value).is_some() {
        debug!(element = %element.name, key = %key, "key collision, earlier value replaced");
    }
}
