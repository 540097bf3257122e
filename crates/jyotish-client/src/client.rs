//! The API client and its three call wrappers.
//!
//! All three share one skeleton: admit through the call gate, check
//! connectivity, POST to the endpoint URL, convert the reply. The in-flight
//! guard returned by the gate clears the busy flag on every exit path,
//! including probe and transport failures.

use std::time::Duration;

use bytes::Bytes;

use jyotish_core::gate::CallGate;
use jyotish_core::probe::{AlwaysOnline, ConnectivityProbe};
use jyotish_core::reply::{ReplyFormat, decode_reply};
use jyotish_core::xml::{self, XmlElement};
use jyotish_types::config::ClientConfig;
use jyotish_types::error::ClientError;

/// Content type for outgoing XML bodies. Plain text stops intermediaries
/// from reformatting the payload.
const BODY_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Client for the remote Jyotish API.
///
/// Endpoints are passed as full URLs by the caller; the client owns no
/// endpoint catalog. The underlying reqwest client carries no client-level
/// timeout -- timeouts come from [`ClientConfig`] per call path, which lets
/// the write-and-wait path block indefinitely.
pub struct ApiClient<P = AlwaysOnline> {
    http: reqwest::Client,
    gate: CallGate,
    probe: P,
    config: ClientConfig,
}

impl ApiClient<AlwaysOnline> {
    pub fn new(config: ClientConfig) -> Self {
        Self::with_probe(config, AlwaysOnline)
    }
}

impl<P: ConnectivityProbe> ApiClient<P> {
    /// Build a client with a host-supplied connectivity probe.
    pub fn with_probe(config: ClientConfig, probe: P) -> Self {
        Self {
            http: reqwest::Client::new(),
            gate: CallGate::new(&config.gate),
            probe,
            config,
        }
    }

    /// Whether a call is currently in flight on this client's gate.
    pub fn is_busy(&self) -> bool {
        self.gate.is_busy()
    }

    /// Call `url` and return the reply as an XML tree.
    ///
    /// Replies that arrive as JSON are converted to XML under
    /// `root_element_name`; the name is ignored when the reply is already
    /// XML. The HTTP status is not used for control flow -- the body is
    /// decoded regardless and the status only enriches error context.
    pub async fn read_xml_reply(
        &self,
        url: &str,
        root_element_name: &str,
    ) -> Result<XmlElement, ClientError> {
        let _in_flight = self.gate.admit(url).await;
        self.probe.check().await?;

        let response = self
            .post(url, None, self.config.request_timeout())
            .await
            .map_err(|e| communication("read_xml_reply", None, String::new(), e))?;
        let status = response.status().as_u16();
        let raw = response
            .text()
            .await
            .map_err(|e| communication("read_xml_reply", Some(status), String::new(), e))?;

        match decode_reply(&raw, root_element_name) {
            Ok((tree, format)) => {
                if format == ReplyFormat::Json {
                    tracing::debug!(url, root_element_name, "json reply converted to xml");
                }
                Ok(tree)
            }
            Err(e) => Err(communication("read_xml_reply", Some(status), raw, e)),
        }
    }

    /// Send an XML document to `url` and return the raw reply payload
    /// without parsing it.
    ///
    /// The payload is fully received before the gate is released.
    pub async fn write_stream_reply(
        &self,
        url: &str,
        document: &XmlElement,
    ) -> Result<Bytes, ClientError> {
        let _in_flight = self.gate.admit(url).await;
        self.probe.check().await?;

        let body = document
            .to_xml_string()
            .map_err(|e| communication("write_stream_reply", None, String::new(), e))?;
        let response = self
            .post(url, Some(body), self.config.request_timeout())
            .await
            .map_err(|e| communication("write_stream_reply", None, String::new(), e))?;
        let status = response.status().as_u16();

        response
            .bytes()
            .await
            .map_err(|e| communication("write_stream_reply", Some(status), String::new(), e))
    }

    /// Send an XML document to `url` and parse the reply strictly as XML.
    ///
    /// No timeout by default: the request waits for the remote as long as it
    /// takes, unless `write_timeout_secs` is set in the config. Failures
    /// carry the HTTP status and raw reply text.
    pub async fn write_xml_reply(
        &self,
        url: &str,
        document: &XmlElement,
    ) -> Result<XmlElement, ClientError> {
        let _in_flight = self.gate.admit(url).await;
        self.probe.check().await?;

        let body = document
            .to_xml_string()
            .map_err(|e| communication("write_xml_reply", None, String::new(), e))?;
        let response = self
            .post(url, Some(body), self.config.write_timeout())
            .await
            .map_err(|e| communication("write_xml_reply", None, String::new(), e))?;
        let status = response.status().as_u16();
        let raw = response
            .text()
            .await
            .map_err(|e| communication("write_xml_reply", Some(status), String::new(), e))?;

        xml::parse(&raw).map_err(|e| communication("write_xml_reply", Some(status), raw, e))
    }

    async fn post(
        &self,
        url: &str,
        body: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<reqwest::Response, reqwest::Error> {
        let mut request = self.http.post(url);
        if let Some(body) = body {
            request = request
                .header(reqwest::header::CONTENT_TYPE, BODY_CONTENT_TYPE)
                .body(body);
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }
        request.send().await
    }
}

fn communication(
    context: &'static str,
    status: Option<u16>,
    raw: String,
    source: impl std::error::Error + Send + Sync + 'static,
) -> ClientError {
    ClientError::Communication {
        context,
        status,
        raw,
        source: Some(Box::new(source)),
    }
}
