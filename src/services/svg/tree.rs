//! Owned SVG document tree
//!
//! Parsed from markup with quick-xml. Attribute order is preserved so that the
//! generated components read like the source artwork.

use super::TransformError;
use indexmap::IndexMap;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    Doctype(String),
    /// `<?xml ... ?>`
    Declaration(String),
    ProcessingInstruction(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: IndexMap<String, String>,
    pub children: Vec<Node>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Top-level nodes, including the root element
    pub nodes: Vec<Node>,
}

impl Node {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(name.into(), value.into());
    }

    /// Remove an attribute, keeping the order of the others
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.attributes.shift_remove(name)
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    pub fn child_elements_mut(&mut self) -> impl Iterator<Item = &mut Element> {
        self.children.iter_mut().filter_map(Node::as_element_mut)
    }

    /// Visit this element and all descendants, parents first
    pub fn walk<F: FnMut(&Element)>(&self, f: &mut F) {
        f(self);
        for child in self.child_elements() {
            child.walk(f);
        }
    }

    /// Mutable pre-order walk
    pub fn walk_mut<F: FnMut(&mut Element)>(&mut self, f: &mut F) {
        f(self);
        for child in self.child_elements_mut() {
            child.walk_mut(f);
        }
    }
}

impl Document {
    pub fn root(&self) -> Option<&Element> {
        self.nodes.iter().find_map(Node::as_element)
    }

    pub fn root_mut(&mut self) -> Option<&mut Element> {
        self.nodes.iter_mut().find_map(Node::as_element_mut)
    }
}

/// Parse SVG markup into a [`Document`].
///
/// Whitespace-only text is dropped; the root element must be `<svg>`.
pub fn parse_svg(markup: &str) -> Result<Document, TransformError> {
    let mut reader = Reader::from_str(markup);
    let mut stack: Vec<Element> = Vec::new();
    let mut document = Document::default();

    loop {
        let event = reader.read_event().map_err(|e| TransformError::Xml {
            position: reader.buffer_position(),
            message: e.to_string(),
        })?;

        let node = match event {
            Event::Start(e) => {
                stack.push(element_from_start(&e, reader.buffer_position())?);
                continue;
            }
            Event::Empty(e) => Node::Element(element_from_start(&e, reader.buffer_position())?),
            Event::End(_) => match stack.pop() {
                Some(el) => Node::Element(el),
                None => {
                    return Err(TransformError::Xml {
                        position: reader.buffer_position(),
                        message: "closing tag without matching opening tag".to_string(),
                    });
                }
            },
            Event::Text(e) => {
                let text = e.unescape().map_err(|err| TransformError::Xml {
                    position: reader.buffer_position(),
                    message: err.to_string(),
                })?;
                if text.trim().is_empty() {
                    continue;
                }
                Node::Text(text.into_owned())
            }
            Event::CData(e) => Node::CData(String::from_utf8_lossy(&e).into_owned()),
            Event::Comment(e) => Node::Comment(String::from_utf8_lossy(&e).into_owned()),
            Event::DocType(e) => Node::Doctype(String::from_utf8_lossy(&e).into_owned()),
            Event::Decl(e) => Node::Declaration(String::from_utf8_lossy(&e).into_owned()),
            Event::PI(e) => Node::ProcessingInstruction(String::from_utf8_lossy(&e).into_owned()),
            Event::Eof => break,
        };

        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None => document.nodes.push(node),
        }
    }

    if let Some(open) = stack.pop() {
        return Err(TransformError::UnclosedElement(open.name));
    }

    match document.root() {
        None => Err(TransformError::NoRootElement),
        Some(root) if root.name != "svg" => Err(TransformError::UnexpectedRoot(root.name.clone())),
        Some(_) => Ok(document),
    }
}

fn element_from_start(start: &BytesStart<'_>, position: usize) -> Result<Element, TransformError> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));

    for attr in start.attributes() {
        let attr = attr.map_err(|e| TransformError::Xml {
            position,
            message: e.to_string(),
        })?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|e| TransformError::Xml {
            position,
            message: e.to_string(),
        })?;
        element.attributes.insert(key, value.into_owned());
    }

    Ok(element)
}
