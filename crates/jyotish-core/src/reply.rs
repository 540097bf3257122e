//! Two-stage decoding of reply bodies.
//!
//! The remote API answers with XML or JSON depending on the endpoint. A
//! reply is first parsed as XML; only when that fails is it converted from
//! JSON under the caller-supplied root element name. Both stages failing is
//! the single error path, carrying each stage's error.

use jyotish_types::error::DecodeError;

use crate::xml::{self, XmlElement};

/// Which decode stage produced the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyFormat {
    Xml,
    Json,
}

/// Decode a raw reply body into an XML tree.
///
/// `root_name` wraps JSON payloads; it is ignored when the reply is already
/// XML.
pub fn decode_reply(raw: &str, root_name: &str) -> Result<(XmlElement, ReplyFormat), DecodeError> {
    let xml_error = match xml::parse(raw) {
        Ok(tree) => return Ok((tree, ReplyFormat::Xml)),
        Err(e) => e,
    };

    match xml::from_json(raw, root_name) {
        Ok(tree) => Ok((tree, ReplyFormat::Json)),
        Err(json_error) => Err(DecodeError {
            xml_error,
            json_error,
        }),
    }
}
