//! jxml - JSON <-> XML conversion with a reversible key convention
//!
//! XML attributes become `_name` keys, element text becomes `__text`, and
//! repeated sibling elements become arrays. The delimiter (`_` by default)
//! and namespace-prefix handling are configurable through [`Config`].
//!
//! # Quick Start
//!
//! ```
//! # fn main() -> Result<(), jxml::Error> {
//! let json = jxml::xml_to_json(r#"<E a="x"><T>1</T><T>2</T></E>"#)?;
//! assert_eq!(json, r#"{"E":{"_a":"x","T":[{"__text":"1"},{"__text":"2"}]}}"#);
//!
//! let xml = jxml::json_to_xml(&json)?;
//! assert!(xml.ends_with(r#"<E a="x"><T>1</T><T>2</T></E>"#));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod config;
pub use config::Config;

pub mod naming;
pub use naming::Markers;

pub mod value;
pub use value::{Array, Object, Value};

pub mod json;
pub mod xml;
pub use xml::{
    Content as XmlContent, Document as XmlDocument, Element as XmlElement, Parser as XmlParser,
};

pub mod decode;
pub mod encode;
pub use decode::decode;
pub use encode::encode;

pub mod convert;
pub use convert::{convert, convert_with_config, Format};

/// Convert JSON text to XML with default options
pub fn json_to_xml(input: &str) -> Result<String> {
    convert::json_to_xml(input, &Config::default())
}

/// Convert JSON text to XML with custom options
pub fn json_to_xml_with_config(input: &str, config: &Config) -> Result<String> {
    convert::json_to_xml(input, config)
}

/// Convert XML text to JSON with default options
pub fn xml_to_json(input: &str) -> Result<String> {
    convert::xml_to_json(input, &Config::default())
}

/// Convert XML text to JSON with custom options
pub fn xml_to_json_with_config(input: &str, config: &Config) -> Result<String> {
    convert::xml_to_json(input, config)
}
