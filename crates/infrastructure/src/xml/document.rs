//! Element tree built with quick-xml.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

/// Errors raised while reading a document.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum XmlError {
    /// The input holds no element at all.
    #[error("document is empty")]
    Empty,

    /// The reader rejected the input.
    #[error("malformed XML: {0}")]
    Malformed(String),

    /// The input ended before an element was closed.
    #[error("element <{0}> is never closed")]
    Unclosed(String),

    /// A second top-level element follows the root.
    #[error("multiple root elements: <{first}> and <{second}>")]
    MultipleRoots {
        /// The first root.
        first: String,
        /// The element that followed it.
        second: String,
    },

    /// Character data appears outside the root element.
    #[error("text outside the root element: '{0}'")]
    TextOutsideRoot(String),
}

/// One element with its attributes, trimmed text and children.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    /// Element name as written, prefix included.
    pub name: String,
    /// Attributes in document order, values unescaped.
    pub attributes: Vec<(String, String)>,
    /// Concatenated text content, unescaped.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<Self>,
}

impl XmlElement {
    fn from_start(start: &BytesStart<'_>) -> Result<Self, XmlError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = Vec::new();
        for attribute in start.attributes() {
            let attribute = attribute.map_err(|e| XmlError::Malformed(e.to_string()))?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|e| XmlError::Malformed(e.to_string()))?
                .into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name,
            attributes,
            ..Self::default()
        })
    }

    /// Returns the value of an attribute.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the first child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&Self> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Follows a `/`-separated path of child names, taking the first match
    /// at each level. An empty path is the element itself.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&Self> {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(self, |element, segment| element.child(segment))
    }

    /// Returns the trimmed text content.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.trim()
    }
}

/// A well-formed document with exactly one root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    /// Reads a document.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not well-formed, is empty, has more
    /// than one root element or leaves an element open.
    pub fn parse(input: &str) -> Result<Self, XmlError> {
        let mut reader = Reader::from_str(input);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let event = reader
                .read_event()
                .map_err(|e| XmlError::Malformed(e.to_string()))?;
            match event {
                Event::Start(start) => {
                    let element = XmlElement::from_start(&start)?;
                    check_single_root(root.as_ref(), &stack, &element)?;
                    stack.push(element);
                }
                Event::Empty(start) => {
                    let element = XmlElement::from_start(&start)?;
                    check_single_root(root.as_ref(), &stack, &element)?;
                    attach(&mut stack, &mut root, element);
                }
                Event::End(end) => {
                    let element = stack.pop().ok_or_else(|| {
                        XmlError::Malformed(format!(
                            "unexpected closing tag </{}>",
                            String::from_utf8_lossy(end.name().as_ref())
                        ))
                    })?;
                    attach(&mut stack, &mut root, element);
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| XmlError::Malformed(e.to_string()))?;
                    push_text(&mut stack, &text)?;
                }
                Event::CData(data) => {
                    push_text(&mut stack, &String::from_utf8_lossy(&data))?;
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.pop() {
            return Err(XmlError::Unclosed(open.name));
        }
        root.map(|root| Self { root }).ok_or(XmlError::Empty)
    }

    /// Returns the root element.
    #[must_use]
    pub const fn root(&self) -> &XmlElement {
        &self.root
    }

    /// Returns the element at a path below the root.
    #[must_use]
    pub fn find(&self, path: &str) -> Option<&XmlElement> {
        self.root.find(path)
    }

    /// Returns the trimmed text at a path below the root.
    #[must_use]
    pub fn text_at(&self, path: &str) -> Option<&str> {
        self.find(path).map(XmlElement::text)
    }
}

fn check_single_root(
    root: Option<&XmlElement>,
    stack: &[XmlElement],
    element: &XmlElement,
) -> Result<(), XmlError> {
    match root {
        Some(first) if stack.is_empty() => Err(XmlError::MultipleRoots {
            first: first.name.clone(),
            second: element.name.clone(),
        }),
        _ => Ok(()),
    }
}

fn attach(stack: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn push_text(stack: &mut [XmlElement], text: &str) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(element) => {
            element.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(XmlError::TextOutsideRoot(text.trim().to_string())),
    }
}
