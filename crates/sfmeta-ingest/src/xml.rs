//! Generic XML tree walk into [`DetailValue`]s
//!
//! Salesforce metadata files are shallow, schema-less trees. Rather than
//! modelling every metadata type with serde structs, the walker turns each
//! element into a detail value:
//!
//! - an element with child elements becomes a [`DetailValue::Map`]
//! - repeated sibling elements become a [`DetailValue::Seq`]
//! - a text-only (or empty) element becomes a [`DetailValue::String`]
//! - attributes become string entries of the element's map
//!
//! Text is kept verbatim; interpreting `"true"` or numbers is left to callers.

use crate::error::{ParseError, Result};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use sfmeta_common::metadata::{DetailValue, Details};
use std::path::Path;

/// A parsed document: root element name and its content
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    pub root: String,
    pub content: DetailValue,
}

impl XmlDocument {
    /// Root content as a map; an empty root yields an empty map
    pub fn into_details(self) -> Details {
        match self.content {
            DetailValue::Map(map) => map,
            _ => Details::new(),
        }
    }
}

struct Frame {
    name: String,
    children: Details,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>) -> std::result::Result<Self, String> {
        let name = String::from_utf8_lossy(start.local_name().into_inner()).to_string();
        let mut children = Details::new();

        for attr in start.attributes() {
            let attr = attr.map_err(|e| e.to_string())?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            if key == "xmlns" || key.starts_with("xmlns:") {
                continue;
            }
            let value = attr.unescape_value().map_err(|e| e.to_string())?;
            children.insert(key, DetailValue::String(value.to_string()));
        }

        Ok(Self {
            name,
            children,
            text: String::new(),
        })
    }

    fn close(self) -> (String, DetailValue) {
        let value = if self.children.is_empty() {
            DetailValue::String(self.text)
        } else {
            DetailValue::Map(self.children)
        };
        (self.name, value)
    }
}

/// Parse an XML string into its root element
pub fn parse_str(xml: &str) -> std::result::Result<XmlDocument, String> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, DetailValue)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => stack.push(Frame::open(e)?),
            Ok(Event::Empty(ref e)) => {
                let (name, value) = Frame::open(e)?.close();
                attach(&mut stack, &mut root, name, value);
            },
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().map_err(|e| e.to_string())?;
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&text);
                }
            },
            Ok(Event::CData(e)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&e.into_inner()));
                }
            },
            Ok(Event::End(_)) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| "closing tag without opening tag".to_string())?;
                let (name, value) = frame.close();
                attach(&mut stack, &mut root, name, value);
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "at position {}: {}",
                    reader.error_position(),
                    e
                ))
            },
            _ => {},
        }
    }

    if let Some(open) = stack.last() {
        return Err(format!("unclosed element <{}>", open.name));
    }

    root.map(|(root, content)| XmlDocument { root, content })
        .ok_or_else(|| "document has no root element".to_string())
}

fn attach(
    stack: &mut [Frame],
    root: &mut Option<(String, DetailValue)>,
    name: String,
    value: DetailValue,
) {
    match stack.last_mut() {
        Some(parent) => DetailValue::push_child(&mut parent.children, name, value),
        None => *root = Some((name, value)),
    }
}

/// Read a metadata file and check its root element.
///
/// Returns the root's children. A missing file is [`ParseError::NotFound`].
pub fn read_metadata_file(path: &Path, expected_root: &str) -> Result<Details> {
    let xml = std::fs::read_to_string(path).map_err(|e| ParseError::io(path, e))?;
    let document = parse_str(&xml).map_err(|message| ParseError::xml(path, message))?;

    if document.root != expected_root {
        return Err(ParseError::UnexpectedRoot {
            path: path.to_path_buf(),
            expected: expected_root.to_string(),
            found: document.root,
        });
    }

    Ok(document.into_details())
}

/// Remove an entry from a detail map and return it as text
pub fn take_text(details: &mut Details, key: &str) -> Option<String> {
    details
        .remove(key)
        .map(|v| v.as_text())
        .filter(|s| !s.trim().is_empty())
}

/// Text of an entry without removing it
pub fn text_of(details: &Details, key: &str) -> Option<String> {
    details
        .get(key)
        .map(DetailValue::as_text)
        .filter(|s| !s.trim().is_empty())
}
