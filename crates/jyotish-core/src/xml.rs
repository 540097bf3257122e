//! Owned XML document tree with quick-xml parse/serialize and a JSON
//! conversion for replies that arrive as JSON instead of XML.
//!
//! The tree is deliberately small: element name, attributes, child elements,
//! and direct text content. The remote API's payloads (persons, charts,
//! events) pass through as opaque documents, so no schema is modeled here.

use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};

use jyotish_types::error::XmlError;

/// A single XML element.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlElement {
    pub name: String,
    pub attributes: Vec<(String, String)>,
    pub children: Vec<XmlElement>,
    /// Direct text content, `None` when the element has no text of its own.
    pub text: Option<String>,
}

impl XmlElement {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: Some(text.into()),
            ..Default::default()
        }
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Serialize the tree to an XML string. Empty elements are written
    /// self-closing.
    pub fn to_xml_string(&self) -> Result<String, XmlError> {
        let mut writer = Writer::new(Vec::new());
        write_element(&mut writer, self)?;
        String::from_utf8(writer.into_inner()).map_err(|e| XmlError::Write(e.to_string()))
    }
}

/// Parse an XML document into a tree.
///
/// Whitespace-only text is dropped. Content before the root element is
/// ignored, so inputs with no element at all (plain text, JSON) fail with
/// [`XmlError::Malformed`] rather than silently producing an empty tree.
pub fn parse(input: &str) -> Result<XmlElement, XmlError> {
    let mut reader = Reader::from_str(input);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<XmlElement> = Vec::new();
    loop {
        match reader.read_event().map_err(|e| XmlError::Malformed(e.to_string()))? {
            Event::Start(start) => {
                stack.push(element_from_start(&start)?);
            }
            Event::Empty(start) => {
                let element = element_from_start(&start)?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Ok(element),
                }
            }
            Event::End(_) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| XmlError::Malformed("unmatched closing tag".to_string()))?;
                match stack.last_mut() {
                    Some(parent) => parent.children.push(element),
                    None => return Ok(element),
                }
            }
            Event::Text(text) => {
                let content = text
                    .unescape()
                    .map_err(|e| XmlError::Malformed(e.to_string()))?
                    .into_owned();
                append_text(&mut stack, content);
            }
            Event::CData(cdata) => {
                let content = String::from_utf8_lossy(&cdata).into_owned();
                append_text(&mut stack, content);
            }
            Event::Eof => return Err(XmlError::Malformed("no root element".to_string())),
            // Declarations, comments, processing instructions, doctypes.
            _ => {}
        }
    }
}

/// Convert a JSON payload into an XML tree wrapped in `root_name`.
///
/// Object keys become child elements, arrays repeat the key element once per
/// item, scalars become text content, and nulls become empty elements. Items
/// of a top-level array are wrapped in `<item>` elements since JSON gives
/// them no name.
pub fn from_json(payload: &str, root_name: &str) -> Result<XmlElement, XmlError> {
    let value: serde_json::Value =
        serde_json::from_str(payload.trim()).map_err(|e| XmlError::InvalidJson(e.to_string()))?;
    let mut root = XmlElement::new(root_name);
    append_json_value(&mut root, &value);
    Ok(root)
}

fn append_json_value(parent: &mut XmlElement, value: &serde_json::Value) {
    use serde_json::Value;

    match value {
        Value::Object(map) => {
            for (key, item) in map {
                match item {
                    Value::Array(items) => {
                        for entry in items {
                            let mut child = XmlElement::new(key.clone());
                            append_json_value(&mut child, entry);
                            parent.children.push(child);
                        }
                    }
                    _ => {
                        let mut child = XmlElement::new(key.clone());
                        append_json_value(&mut child, item);
                        parent.children.push(child);
                    }
                }
            }
        }
        Value::Array(items) => {
            for entry in items {
                let mut child = XmlElement::new("item");
                append_json_value(&mut child, entry);
                parent.children.push(child);
            }
        }
        Value::Null => {}
        Value::String(text) => parent.text = Some(text.clone()),
        Value::Bool(flag) => parent.text = Some(flag.to_string()),
        Value::Number(number) => parent.text = Some(number.to_string()),
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement, XmlError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut element = XmlElement::new(name);
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| XmlError::Malformed(e.to_string()))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| XmlError::Malformed(e.to_string()))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn append_text(stack: &mut [XmlElement], content: String) {
    if content.is_empty() {
        return;
    }
    // Text outside any element is ignored; the Eof arm reports the missing
    // root instead.
    if let Some(current) = stack.last_mut() {
        match &mut current.text {
            Some(existing) => existing.push_str(&content),
            None => current.text = Some(content),
        }
    }
}

fn write_element(writer: &mut Writer<Vec<u8>>, element: &XmlElement) -> Result<(), XmlError> {
    let mut start = BytesStart::new(element.name.as_str());
    for (key, value) in &element.attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }

    if element.children.is_empty() && element.text.is_none() {
        return writer
            .write_event(Event::Empty(start))
            .map_err(|e| XmlError::Write(e.to_string()));
    }

    writer
        .write_event(Event::Start(start))
        .map_err(|e| XmlError::Write(e.to_string()))?;
    if let Some(text) = &element.text {
        writer
            .write_event(Event::Text(BytesText::new(text)))
            .map_err(|e| XmlError::Write(e.to_string()))?;
    }
    for child in &element.children {
        write_element(writer, child)?;
    }
    writer
        .write_event(Event::End(BytesEnd::new(element.name.as_str())))
        .map_err(|e| XmlError::Write(e.to_string()))
}
