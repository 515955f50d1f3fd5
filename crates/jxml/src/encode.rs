//! JSON value tree -> XML element tree

use tracing::debug;

use crate::config::Config;
use crate::error::{Error, ErrorKind, Result};
use crate::naming::{wire_name, Markers};
use crate::value::{Object, Value};
use crate::xml::model::{Content, Document, Element};

/// Build an XML document from a JSON value tree.
///
/// The root must be an object with exactly one key; that key names the root
/// element and its value (an object) describes the element's contents.
pub fn encode(value: &Value, config: &Config) -> Result<Document> {
    let markers = config.markers()?;
    let (root_key, root_value) = single_root(value)?;

    let mut root = Element::new(wire_name(root_key, config.keep_namespace));
    let encoder = Encoder {
        config,
        markers: &markers,
    };
    let contents = expect_object(root_value, root_key)?;
    encoder.fill(&mut root, contents, root_key, 1)?;

    Ok(Document { root })
}

fn single_root(value: &Value) -> Result<(&str, &Value)> {
    let obj = expect_object(value, "$")?;
    if obj.len() > 1 {
        return Err(Error::from_kind(ErrorKind::AmbiguousRoot { count: obj.len() }));
    }
    obj.first()
        .map(|(key, value)| (key.as_str(), value))
        .ok_or_else(|| Error::from_kind(ErrorKind::MalformedRoot))
}

fn expect_object<'v>(value: &'v Value, path: &str) -> Result<&'v Object> {
    value
        .as_object()
        .ok_or_else(|| Error::type_mismatch(path, "object", value.kind_name()))
}

fn expect_string<'v>(value: &'v Value, path: &str) -> Result<&'v str> {
    value
        .as_string()
        .ok_or_else(|| Error::type_mismatch(path, "string", value.kind_name()))
}

struct Encoder<'c> {
    config: &'c Config,
    markers: &'c Markers,
}

impl Encoder<'_> {
    /// Map the keys of `contents` onto `element`, in key order
    fn fill(&self, element: &mut Element, contents: &Object, path: &str, depth: usize) -> Result<()> {
        self.config.check_depth(depth)?;

        for (key, value) in contents {
            let child_path = format!("{path}.{key}");

            if self.markers.is_text(key) {
                // text always leads the children
                let text = expect_string(value, &child_path)?;
                element.children.insert(0, Content::Text(text.to_string()));
                continue;
            }

            if let Some(name) = self.markers.attribute_name(key) {
                let text = expect_string(value, &child_path)?;
                if !self.config.keep_namespace && text.contains(':') {
                    debug!(attribute = name, value = text, "dropping attribute with ':' in value");
                    continue;
                }
                element.attributes.insert(name.to_string(), text.to_string());
                continue;
            }

            let name = wire_name(key, self.config.keep_namespace);
            match value {
                Value::Array(items) => {
                    for (index, item) in items.iter().enumerate() {
                        let item_path = format!("{child_path}[{index}]");
                        let item = expect_object(item, &item_path)?;
                        element
                            .children
                            .push(Content::Element(self.child(name, item, &item_path, depth)?));
                    }
                }
                _ => {
                    let item = expect_object(value, &child_path)?;
                    element
                        .children
                        .push(Content::Element(self.child(name, item, &child_path, depth)?));
                }
            }
        }

        Ok(())
    }

    fn child(&self, name: &str, contents: &Object, path: &str, depth: usize) -> Result<Element> {
        let mut child = Element::new(name);
        self.fill(&mut child, contents, path, depth + 1)?;
        Ok(child)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json;

    fn encode_str(input: &str, config: &Config) -> Result<Document> {
        encode(&json::from_str(input)?, config)
    }

    #[test]
    fn test_attribute_and_text() {
        let doc = encode_str(r#"{"E":{"_a":"x","__text":"y"}}"#, &Config::default()).unwrap();
        assert_eq!(doc.root.name, "E");
        assert_eq!(doc.root.attributes.get("a").map(String::as_str), Some("x"));
        assert_eq!(doc.root.leading_text(), Some("y"));
    }

    #[test]
    fn test_array_becomes_repeated_children() {
        let doc = encode_str(
            r#"{"A":{"T":[{"__text":"1"},{"__text":"2"}],"U":{}}}"#,
            &Config::default(),
        )
        .unwrap();
        let children: Vec<_> = doc
            .root
            .child_elements()
            .map(|e| (e.name.as_str(), e.leading_text()))
            .collect();
        assert_eq!(
            children,
            vec![("T", Some("1")), ("T", Some("2")), ("U", None)]
        );
    }

    #[test]
    fn test_text_precedes_children() {
        let doc = encode_str(r#"{"A":{"B":{},"__text":"t"}}"#, &Config::default()).unwrap();
        assert_eq!(doc.root.leading_text(), Some("t"));
        assert_eq!(doc.root.children.len(), 2);
    }

    #[test]
    fn test_empty_root_object() {
        let err = encode_str("{}", &Config::default()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MalformedRoot);
    }

    #[test]
    fn test_ambiguous_root() {
        let err = encode_str(r#"{"A":"1","B":"2"}"#, &Config::default()).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::AmbiguousRoot { count: 2 });
    }

    #[test]
    fn test_non_object_root_value() {
        let err = encode_str(r#"{"A":"1"}"#, &Config::default()).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TypeMismatch { path, expected: "object", found: "string" } if path == "A"
        ));
    }

    #[test]
    fn test_type_mismatch_path_in_array() {
        let err = encode_str(r#"{"A":{"B":[{},"oops"]}}"#, &Config::default()).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TypeMismatch { path, found: "string", .. } if path == "A.B[1]"
        ));
    }

    #[test]
    fn test_non_string_attribute_value() {
        let err = encode_str(r#"{"A":{"_x":{}}}"#, &Config::default()).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::TypeMismatch { expected: "string", .. }
        ));
    }

    #[test]
    fn test_namespace_stripping() {
        let config = Config::default().with_keep_namespace(false);
        let doc = encode_str(
            r#"{"ns:E":{"_ns:a":"v","_href":"http://x","ns:C":{}}}"#,
            &config,
        )
        .unwrap();
        assert_eq!(doc.root.name, "E");
        assert_eq!(doc.root.attributes.get("ns:a").map(String::as_str), Some("v"));
        assert!(!doc.root.attributes.contains_key("href"));
        assert_eq!(doc.root.child_elements().next().map(|e| e.name.as_str()), Some("C"));
    }

    #[test]
    fn test_custom_delimiter() {
        let config = Config::default().with_delimiter("#");
        let doc = encode_str(r###"{"E":{"#a":"x","##text":"y","_b":{}}}"###, &config).unwrap();
        assert_eq!(doc.root.attributes.get("a").map(String::as_str), Some("x"));
        assert_eq!(doc.root.leading_text(), Some("y"));
        assert_eq!(doc.root.child_elements().next().map(|e| e.name.as_str()), Some("_b"));
    }

    #[test]
    fn test_invalid_delimiter_checked_first() {
        let config = Config::default().with_delimiter("S");
        let err = encode_str("{}", &config).unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::InvalidDelimiter { .. }));
    }

    #[test]
    fn test_depth_limit() {
        let config = Config::default().with_max_depth(2);
        assert!(encode_str(r#"{"A":{"B":{}}}"#, &config).is_ok());
        let err = encode_str(r#"{"A":{"B":{"C":{}}}}"#, &config).unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MaxDepthExceeded { max: 2 });
    }
}
