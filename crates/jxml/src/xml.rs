//! XML element tree, parser and serializer

pub mod model;
pub mod parser;
pub mod serializer;

pub use model::{Content, Document, Element};
pub use parser::Parser;
pub use serializer::to_string;
