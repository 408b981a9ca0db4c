//! Load SMART attribute database XML into a minimal element tree using quick-xml.
//!
//! The tree keeps only what the generator needs: element tags, attributes,
//! direct text content and element children. Comments, processing
//! instructions and the XML declaration are dropped while reading. Text is
//! kept untrimmed so pieces split by comments or CDATA join up unchanged.

use std::fs;
use std::path::{Path, PathBuf};

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum XmlError {
    #[error("read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("xml: {0}")]
    Xml(String),
    #[error("invalid document: {0}")]
    Invalid(String),
}

/// Element node of a parsed document.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    /// Tag name as written in the document.
    pub tag: String,
    /// Attributes in document order, values unescaped.
    pub attributes: Vec<(String, String)>,
    /// Text and CDATA found directly inside this element, concatenated.
    pub text: Option<String>,
    /// Element children in document order.
    pub children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Element {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Value of the attribute `name`, if present.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Direct text content with surrounding whitespace removed, or `None`
    /// when the element carries no text at all.
    pub fn trimmed_text(&self) -> Option<&str> {
        self.text.as_deref().map(str::trim)
    }

    fn push_text(&mut self, chunk: &str) {
        match &mut self.text {
            Some(text) => text.push_str(chunk),
            None => self.text = Some(chunk.to_string()),
        }
    }
}

/// Read and parse the document stored at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<Element, XmlError> {
    let path = path.as_ref();
    let xml = fs::read_to_string(path).map_err(|source| XmlError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = xml.len(), "loaded smartdb xml");
    parse_document(&xml)
}

/// Parse an XML document and return its root element.
pub fn parse_document(xml: &str) -> Result<Element, XmlError> {
    let mut reader = Reader::from_str(xml);
    reader.trim_text(false);
    let mut buf = Vec::new();
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                stack.push(start_element(&e)?);
            }
            Ok(Event::Empty(e)) => {
                let element = start_element(&e)?;
                attach(element, &mut stack, &mut root)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::Invalid("unbalanced end tag".into()))?;
                attach(element, &mut stack, &mut root)?;
            }
            Ok(Event::Text(e)) => {
                let text = e
                    .unescape()
                    .map_err(|err| XmlError::Xml(err.to_string()))?;
                push_text(&text, &mut stack)?;
            }
            Ok(Event::CData(e)) => {
                let inner = e.into_inner();
                push_text(&String::from_utf8_lossy(&inner), &mut stack)?;
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(XmlError::Xml(format!(
                    "{err} at byte {}",
                    reader.buffer_position()
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.last() {
        return Err(XmlError::Invalid(format!(
            "unexpected end of document inside <{}>",
            open.tag
        )));
    }
    root.ok_or_else(|| XmlError::Invalid("document has no root element".into()))
}

fn start_element(event: &BytesStart<'_>) -> Result<Element, XmlError> {
    let mut element = Element::new(String::from_utf8_lossy(event.name().as_ref()));
    for attr in event.attributes() {
        let attr = attr.map_err(|err| XmlError::Xml(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| XmlError::Xml(err.to_string()))?;
        element.attributes.push((key, value.to_string()));
    }
    Ok(element)
}

fn attach(
    element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> Result<(), XmlError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        return Ok(());
    }
    if let Some(existing) = root {
        return Err(XmlError::Invalid(format!(
            "second root element <{}> after <{}>",
            element.tag, existing.tag
        )));
    }
    *root = Some(element);
    Ok(())
}

fn push_text(text: &str, stack: &mut [Element]) -> Result<(), XmlError> {
    match stack.last_mut() {
        Some(current) => {
            current.push_text(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(XmlError::Invalid(format!(
            "text outside of the root element: {:?}",
            text.trim()
        ))),
    }
}
