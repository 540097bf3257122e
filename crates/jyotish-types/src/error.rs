use thiserror::Error;

/// Errors surfaced by the API call wrappers.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The connectivity probe reported the host offline before the request
    /// was sent.
    #[error("network unreachable, api call not sent")]
    Offline,

    /// The unified communication failure: transport errors, unreadable
    /// bodies, and undecodable replies all land here. Carries the call-site
    /// identifier, the HTTP status when one was received, and whatever raw
    /// reply text was available.
    #[error("communication failed in {context} (status {status:?}): {raw}")]
    Communication {
        context: &'static str,
        status: Option<u16>,
        raw: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },
}

/// Errors from parsing, serializing, or converting XML documents.
#[derive(Debug, Error)]
pub enum XmlError {
    #[error("malformed xml: {0}")]
    Malformed(String),

    #[error("invalid json: {0}")]
    InvalidJson(String),

    #[error("xml write failed: {0}")]
    Write(String),
}

/// Both decode stages failed: the reply body is neither well-formed XML nor
/// JSON convertible to XML. Keeps both stage errors for diagnostics.
#[derive(Debug, Error)]
#[error("reply is neither xml nor json (xml: {xml_error}; json: {json_error})")]
pub struct DecodeError {
    pub xml_error: XmlError,
    pub json_error: XmlError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_communication_display_includes_context_and_raw() {
        let err = ClientError::Communication {
            context: "read_xml_reply",
            status: Some(502),
            raw: "<oops>".to_string(),
            source: None,
        };
        let message = err.to_string();
        assert!(message.contains("read_xml_reply"));
        assert!(message.contains("502"));
        assert!(message.contains("<oops>"));
    }

    #[test]
    fn test_communication_preserves_source() {
        let cause = DecodeError {
            xml_error: XmlError::Malformed("no root element".to_string()),
            json_error: XmlError::InvalidJson("expected value".to_string()),
        };
        let err = ClientError::Communication {
            context: "read_xml_reply",
            status: None,
            raw: "garbage".to_string(),
            source: Some(Box::new(cause)),
        };
        let source = std::error::Error::source(&err).expect("source should be set");
        assert!(source.to_string().contains("no root element"));
    }

    #[test]
    fn test_decode_error_display_names_both_stages() {
        let err = DecodeError {
            xml_error: XmlError::Malformed("bad tag".to_string()),
            json_error: XmlError::InvalidJson("bad token".to_string()),
        };
        let message = err.to_string();
        assert!(message.contains("bad tag"));
        assert!(message.contains("bad token"));
    }
}
