//! XML data model

use indexmap::IndexMap;

/// XML document
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub root: Element,
}

/// XML element
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Element {
    /// Qualified name, prefix included
    pub name: String,
    /// Attributes in document order
    pub attributes: IndexMap<String, String>,
    /// Child elements and text runs in document order
    pub children: Vec<Content>,
}

/// XML content node
#[derive(Clone, Debug, PartialEq)]
pub enum Content {
    Element(Element),
    Text(String),
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: IndexMap::new(),
            children: Vec::new(),
        }
    }

    /// Direct child elements, skipping text runs
    pub fn child_elements(&self) -> impl Iterator<Item = &Self> {
        self.children.iter().filter_map(|child| match child {
            Content::Element(element) => Some(element),
            Content::Text(_) => None,
        })
    }

    /// Text of the first child node, if that node is a text run
    pub fn leading_text(&self) -> Option<&str> {
        match self.children.first() {
            Some(Content::Text(text)) => Some(text),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_elements_skip_text() {
        let mut root = Element::new("root");
        root.children.push(Content::Text("lead".to_string()));
        root.children.push(Content::Element(Element::new("a")));
        root.children.push(Content::Text("tail".to_string()));
        root.children.push(Content::Element(Element::new("b")));

        let names: Vec<_> = root.child_elements().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(root.leading_text(), Some("lead"));
    }

    #[test]
    fn test_leading_text_requires_first_child() {
        let mut root = Element::new("root");
        assert_eq!(root.leading_text(), None);
        root.children.push(Content::Element(Element::new("a")));
        root.children.push(Content::Text("late".to_string()));
        assert_eq!(root.leading_text(), None);
    }
}
