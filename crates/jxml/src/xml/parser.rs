//! XML parser built on `quick-xml`
//!
//! Produces the element tree the decoder walks. The tree is built with an
//! explicit stack, so nesting depth is bounded by the configured limit
//! rather than by the call stack.

use std::borrow::Cow;
use std::fmt;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::xml::model::{Content, Document, Element};

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    input: &'a str,
    max_depth: u16,
}

impl<'a> Parser<'a> {
    /// Create a parser with no depth limit
    pub const fn new(input: &'a str) -> Self {
        Self {
            input,
            max_depth: 0,
        }
    }

    /// Create a parser that rejects nesting deeper than `max_depth` (0 means unlimited)
    pub const fn with_max_depth(input: &'a str, max_depth: u16) -> Self {
        Self { input, max_depth }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> Result<Document> {
        let mut reader = Reader::from_str(self.input);
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(err) => return Err(self.malformed(reader.error_position(), err)),
            };
            let offset = reader.buffer_position();

            match event {
                Event::Start(start) => {
                    if root.is_some() {
                        return Err(self.malformed(offset, "content after root element"));
                    }
                    self.check_depth(stack.len() + 1, offset)?;
                    stack.push(self.open_element(&start, offset)?);
                }
                Event::Empty(start) => {
                    if root.is_some() {
                        return Err(self.malformed(offset, "content after root element"));
                    }
                    self.check_depth(stack.len() + 1, offset)?;
                    let element = self.open_element(&start, offset)?;
                    attach(element, &mut stack, &mut root);
                }
                Event::End(_) => {
                    // quick-xml has already matched the end tag against the open one
                    let Some(element) = stack.pop() else {
                        return Err(self.malformed(offset, "unexpected closing tag"));
                    };
                    attach(element, &mut stack, &mut root);
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(|err| self.malformed(offset, err))?;
                    self.push_text(&mut stack, text, offset)?;
                }
                Event::CData(data) => {
                    let text = String::from_utf8_lossy(&data).into_owned();
                    self.push_text(&mut stack, Cow::Owned(text), offset)?;
                }
                Event::Eof => break,
                // declaration, doctype, comments and processing instructions
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            let message = format!("unexpected end of input: <{}> is not closed", open.name);
            return Err(self.malformed(self.input.len(), message));
        }

        root.map(|root| Document { root })
            .ok_or_else(|| self.malformed(self.input.len(), "no root element found"))
    }

    fn open_element<P>(&self, start: &BytesStart<'_>, offset: P) -> Result<Element>
    where
        usize: TryFrom<P>,
        P: Copy,
    {
        let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));

        for attr in start.attributes() {
            let attr = attr.map_err(|err| self.malformed(offset, err))?;
            let name = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|err| self.malformed(offset, err))?
                .into_owned();
            if element.attributes.contains_key(&name) {
                return Err(self.malformed(offset, format!("duplicate attribute `{name}`")));
            }
            element.attributes.insert(name, value);
        }

        Ok(element)
    }

    /// Append text to the open element, merging with a preceding text run
    fn push_text<P>(&self, stack: &mut [Element], text: Cow<'_, str>, offset: P) -> Result<()>
    where
        usize: TryFrom<P>,
        P: Copy,
    {
        let Some(parent) = stack.last_mut() else {
            if text.chars().all(char::is_whitespace) {
                return Ok(());
            }
            return Err(self.malformed(offset, "text outside root element"));
        };

        match parent.children.last_mut() {
            Some(Content::Text(run)) => run.push_str(&text),
            _ => parent.children.push(Content::Text(text.into_owned())),
        }
        Ok(())
    }

    fn check_depth<P>(&self, depth: usize, offset: P) -> Result<()>
    where
        usize: TryFrom<P>,
    {
        if self.max_depth > 0 && depth > usize::from(self.max_depth) {
            return Err(Error::new(
                ErrorKind::MaxDepthExceeded {
                    max: self.max_depth,
                },
                self.span(offset),
            ));
        }
        Ok(())
    }

    fn span<P>(&self, offset: P) -> Span
    where
        usize: TryFrom<P>,
    {
        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        Span::at(Pos::locate(self.input, offset))
    }

    fn malformed<P>(&self, offset: P, message: impl fmt::Display) -> Error
    where
        usize: TryFrom<P>,
    {
        Error::with_message(ErrorKind::MalformedInput, self.span(offset), message.to_string())
    }
}

/// Close `element`: attach it to its parent or make it the root
fn attach(element: Element, stack: &mut [Element], root: &mut Option<Element>) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(Content::Element(element)),
        None => *root = Some(element),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ensure_eq<T: PartialEq + fmt::Debug>(left: T, right: T) -> Result<()> {
        if left == right {
            Ok(())
        } else {
            Err(Error::with_message(
                ErrorKind::MalformedInput,
                Span::empty(),
                format!("assertion failed: left={left:?} right={right:?}"),
            ))
        }
    }

    fn parse(input: &str) -> Result<Document> {
        Parser::new(input).parse()
    }

    #[test]
    fn test_parse_simple_element() -> Result<()> {
        let doc = parse("<root></root>")?;
        ensure_eq(doc.root.name, "root".to_string())?;
        ensure_eq(doc.root.children.len(), 0)?;
        Ok(())
    }

    #[test]
    fn test_parse_with_attributes_in_order() -> Result<()> {
        let doc = parse("<root name='test' id=\"1\" ns:x=\"a&amp;b\"></root>")?;
        let attrs: Vec<_> = doc
            .root
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        ensure_eq(attrs, vec![("name", "test"), ("id", "1"), ("ns:x", "a&b")])?;
        Ok(())
    }

    #[test]
    fn test_parse_nested_with_text() -> Result<()> {
        let doc = parse("<root><child>text &lt;here&gt;</child></root>")?;
        let child = doc.root.child_elements().next().cloned().unwrap_or_default();
        ensure_eq(child.name.as_str(), "child")?;
        ensure_eq(child.leading_text(), Some("text <here>"))?;
        Ok(())
    }

    #[test]
    fn test_parse_self_closing() -> Result<()> {
        let doc = parse("<?xml version=\"1.0\"?>\n<!-- c --><root><child /></root>\n")?;
        let child = doc.root.child_elements().next().cloned().unwrap_or_default();
        ensure_eq(child.name.as_str(), "child")?;
        ensure_eq(child.children.len(), 0)?;
        Ok(())
    }

    #[test]
    fn test_whitespace_runs_are_kept() -> Result<()> {
        let doc = parse("<root>\n  <a/>\n</root>")?;
        ensure_eq(doc.root.children.len(), 3)?;
        ensure_eq(doc.root.leading_text(), Some("\n  "))?;
        Ok(())
    }

    #[test]
    fn test_cdata_merges_into_text_run() -> Result<()> {
        let doc = parse("<root>a<![CDATA[<b>]]>c</root>")?;
        ensure_eq(doc.root.leading_text(), Some("a<b>c"))?;
        ensure_eq(doc.root.children.len(), 1)?;
        Ok(())
    }

    #[test]
    fn test_mismatched_end_tag_is_malformed() {
        let err = parse("<a><b></a>").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MalformedInput);
        assert!(err.span().start.line >= 1);
    }

    #[test]
    fn test_unclosed_element_is_malformed() {
        let err = parse("<a><b></b>").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MalformedInput);
        assert!(err.message().contains("<a>"));
    }

    #[test]
    fn test_empty_input_is_malformed() {
        let err = parse("   ").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MalformedInput);
    }

    #[test]
    fn test_second_root_is_malformed() {
        let err = parse("<a/><b/>").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MalformedInput);
    }

    #[test]
    fn test_duplicate_attribute_is_malformed() {
        let err = parse("<a x=\"1\" x=\"2\"/>").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MalformedInput);
    }

    #[test]
    fn test_depth_limit() {
        let input = "<a><a><a><a/></a></a></a>";
        assert!(Parser::with_max_depth(input, 4).parse().is_ok());
        let err = Parser::with_max_depth(input, 3).parse().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::MaxDepthExceeded { max: 3 });
    }
}
