//! End-to-end calls against a local axum stub standing in for the remote
//! API. The stub answers on an ephemeral port, so tests run in parallel
//! without port clashes.

use std::time::Duration;

use axum::Router;
use axum::routing::post;

use jyotish_client::ApiClient;
use jyotish_core::probe::ConnectivityProbe;
use jyotish_core::xml::{self, XmlElement};
use jyotish_types::config::ClientConfig;
use jyotish_types::error::ClientError;

/// Serve `router` on an ephemeral port and return its base URL.
async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn read_xml_reply_parses_xml_stub() {
    let base = serve(Router::new().route("/gethoroscope", post(|| async { "<Result>ok</Result>" }))).await;
    let client = ApiClient::new(ClientConfig::default());

    let tree = client
        .read_xml_reply(&format!("{base}/gethoroscope"), "Root")
        .await
        .unwrap();

    assert_eq!(tree.name, "Result");
    assert_eq!(tree.text.as_deref(), Some("ok"));
    assert!(!client.is_busy());
}

#[tokio::test]
async fn read_xml_reply_converts_json_stub() {
    let raw = r#"{"Status":"pass","Payload":{"PersonId":"p42"}}"#;
    let base = serve(Router::new().route("/getperson", post(move || async move { raw }))).await;
    let client = ApiClient::new(ClientConfig::default());

    let tree = client
        .read_xml_reply(&format!("{base}/getperson"), "Root")
        .await
        .unwrap();

    assert_eq!(tree.name, "Root");
    assert_eq!(tree, xml::from_json(raw, "Root").unwrap());
    assert_eq!(
        tree.child("Payload").unwrap().child("PersonId").unwrap().text.as_deref(),
        Some("p42")
    );
}

#[tokio::test]
async fn read_xml_reply_raises_communication_on_garbage() {
    let base = serve(Router::new().route("/getevents", post(|| async { "definitely not markup" }))).await;
    let client = ApiClient::new(ClientConfig::default());

    let err = client
        .read_xml_reply(&format!("{base}/getevents"), "Root")
        .await
        .unwrap_err();

    match err {
        ClientError::Communication { context, raw, status, .. } => {
            assert_eq!(context, "read_xml_reply");
            assert_eq!(raw, "definitely not markup");
            assert_eq!(status, Some(200));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!client.is_busy(), "decode failure must release the gate");
}

#[tokio::test]
async fn write_xml_reply_completes_despite_slow_remote() {
    let base = serve(Router::new().route(
        "/getmatchreport",
        post(|| async {
            tokio::time::sleep(Duration::from_millis(300)).await;
            "<Report>compatible</Report>"
        }),
    ))
    .await;
    // write_timeout defaults to None: the call waits out the delay.
    let client = ApiClient::new(ClientConfig::default());

    let tree = client
        .write_xml_reply(
            &format!("{base}/getmatchreport"),
            &XmlElement::with_text("MatchRequest", "p1,p2"),
        )
        .await
        .unwrap();

    assert_eq!(tree.name, "Report");
    assert_eq!(tree.text.as_deref(), Some("compatible"));
    assert!(!client.is_busy());
}

#[tokio::test]
async fn write_xml_reply_sends_serialized_document() {
    // Echo stub: the reply is exactly the request body, so the returned tree
    // must equal the document we sent.
    let base = serve(Router::new().route("/addperson", post(|body: String| async move { body }))).await;
    let client = ApiClient::new(ClientConfig::default());

    let mut person = XmlElement::new("Person");
    person.attributes.push(("id".to_string(), "p7".to_string()));
    person.children.push(XmlElement::with_text("Name", "Mira"));

    let tree = client
        .write_xml_reply(&format!("{base}/addperson"), &person)
        .await
        .unwrap();

    assert_eq!(tree, person);
}

#[tokio::test]
async fn write_stream_reply_returns_raw_bytes() {
    let base = serve(Router::new().route("/geteventschart", post(|| async { "<svg>chart</svg>" }))).await;
    let client = ApiClient::new(ClientConfig::default());

    let payload = client
        .write_stream_reply(
            &format!("{base}/geteventschart"),
            &XmlElement::with_text("ChartRequest", "p7"),
        )
        .await
        .unwrap();

    assert_eq!(payload.as_ref(), b"<svg>chart</svg>");
    assert!(!client.is_busy());
}

#[tokio::test]
async fn offline_probe_short_circuits_before_sending() {
    struct Offline;
    impl ConnectivityProbe for Offline {
        async fn check(&self) -> Result<(), ClientError> {
            Err(ClientError::Offline)
        }
    }

    // No server at this address; the probe must fail first.
    let client = ApiClient::with_probe(ClientConfig::default(), Offline);
    let err = client
        .read_xml_reply("http://127.0.0.1:9/getperson", "Root")
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Offline));
    assert!(!client.is_busy(), "probe failure must release the gate");
}

#[tokio::test]
async fn transport_failure_clears_busy_flag() {
    // Bind and immediately drop a listener so the port is closed.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(ClientConfig::default());
    let err = client
        .read_xml_reply(&format!("http://{addr}/getperson"), "Root")
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Communication { context: "read_xml_reply", .. }));
    assert!(!client.is_busy());
}
