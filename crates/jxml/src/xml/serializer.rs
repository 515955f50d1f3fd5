//! XML serializer built on `quick-xml`

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::error::{Error, Result};
use crate::xml::model::{Content, Document, Element};

/// Render a document as standalone XML text without indentation
pub fn to_string(doc: &Document) -> Result<String> {
    let mut writer = Writer::new(Vec::new());
    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
        .map_err(|err| Error::xml_serialize(err.to_string()))?;
    write_element(&mut writer, &doc.root)?;

    String::from_utf8(writer.into_inner()).map_err(|err| Error::xml_serialize(err.to_string()))
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &Element) -> Result<()> {
    check_name(&element.name, "element")?;

    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        check_name(key, "attribute")?;
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() {
        return write_event(writer, Event::Empty(start));
    }

    write_event(writer, Event::Start(start))?;
    for child in &element.children {
        match child {
            Content::Element(child) => write_element(writer, child)?,
            Content::Text(text) => write_event(writer, Event::Text(BytesText::new(text)))?,
        }
    }
    write_event(writer, Event::End(BytesEnd::new(element.name.as_str())))
}

fn write_event(writer: &mut Writer<Vec<u8>>, event: Event<'_>) -> Result<()> {
    writer
        .write_event(event)
        .map_err(|err| Error::xml_serialize(err.to_string()))
}

/// Reject names the writer would otherwise emit as ill-formed markup
fn check_name(name: &str, what: &str) -> Result<()> {
    let mut chars = name.chars();
    let valid = match chars.next() {
        Some(first) => is_name_start(first) && chars.all(is_name_char),
        None => false,
    };
    if valid {
        Ok(())
    } else {
        Err(Error::xml_serialize(format!("invalid {what} name `{name}`")))
    }
}

fn is_name_start(ch: char) -> bool {
    ch.is_alphabetic() || matches!(ch, '_' | ':')
}

fn is_name_char(ch: char) -> bool {
    is_name_start(ch) || ch.is_alphanumeric() || matches!(ch, '-' | '.' | '\u{B7}')
}
