//! Transport tests for the reporter against a mocked ingest endpoint.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::time::Duration;

use balise_common::ErrorRecord;
use balise_reporter::{ReportOptions, Reporter};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

/// Responder that acknowledges whatever record it receives, echoing the
/// record's id the way the real ingest endpoint does.
struct EchoAck;

impl Respond for EchoAck {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let record: ErrorRecord = serde_json::from_slice(&request.body).unwrap();
        ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "logged": true,
            "errorId": record.id,
        }))
    }
}

fn mock_endpoint(server: &MockServer) -> String {
    format!("{}/v1/errors", server.uri())
}

#[tokio::test]
async fn report_round_trips_the_generated_id() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/errors"))
        .and(header("content-type", "application/json"))
        .respond_with(EchoAck)
        .expect(1)
        .mount(&server)
        .await;

    let reporter = Reporter::new(mock_endpoint(&server)).unwrap();
    let outcome = reporter.report("E1", "boom", ReportOptions::default()).await;

    assert!(outcome.success);
    let acked_id = outcome.error_id.unwrap();

    // The acknowledged id is exactly the id the reporter put on the wire.
    let requests = server.received_requests().await.unwrap();
    let sent: ErrorRecord = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(sent.id, acked_id);
    assert_eq!(sent.error_code, "E1");
    assert_eq!(sent.severity.to_string(), "medium");
}

#[tokio::test]
async fn report_coerces_unknown_severity_on_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/errors"))
        .respond_with(EchoAck)
        .mount(&server)
        .await;

    let reporter = Reporter::new(mock_endpoint(&server)).unwrap();
    let options = ReportOptions {
        severity: Some("urgent".to_string()),
        ..ReportOptions::default()
    };
    let outcome = reporter.report("E1", "boom", options).await;
    assert!(outcome.success);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["severity"], "medium");
    assert!(
        body["context"]["severityNote"]
            .as_str()
            .unwrap()
            .contains("urgent")
    );
}

#[tokio::test]
async fn report_carries_optional_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/errors"))
        .respond_with(EchoAck)
        .mount(&server)
        .await;

    let reporter = Reporter::new(mock_endpoint(&server)).unwrap();
    let options = ReportOptions {
        stack: Some("at render (app.js:12)".to_string()),
        user_id: Some("u-42".to_string()),
        severity: Some("critical".to_string()),
        ..ReportOptions::default()
    };
    let outcome = reporter.report("E_RENDER", "render failed", options).await;
    assert!(outcome.success);

    let requests = server.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    assert_eq!(body["userId"], "u-42");
    assert_eq!(body["severity"], "critical");
    assert_eq!(body["stack"], "at render (app.js:12)");
}

#[tokio::test]
async fn non_200_status_is_a_failed_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/errors"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "success": false,
            "error": "Failed to log error",
            "message": "sink unavailable",
        })))
        .mount(&server)
        .await;

    let reporter = Reporter::new(mock_endpoint(&server)).unwrap();
    let outcome = reporter.report("E1", "boom", ReportOptions::default()).await;

    assert!(!outcome.success);
    assert!(outcome.error_id.is_none());
    assert!(outcome.error.unwrap().contains("500"));
}

#[tokio::test]
async fn malformed_acknowledgment_is_a_failed_outcome() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/errors"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let reporter = Reporter::new(mock_endpoint(&server)).unwrap();
    let outcome = reporter.report("E1", "boom", ReportOptions::default()).await;

    assert!(!outcome.success);
    assert!(outcome.error.is_some());
}

#[tokio::test]
async fn unreachable_endpoint_is_a_failed_outcome() {
    // Nothing listens here; the connection is refused immediately.
    let reporter = Reporter::with_timeout(
        "http://127.0.0.1:9/v1/errors",
        Duration::from_secs(1),
    )
    .unwrap();
    let outcome = reporter.report("E1", "boom", ReportOptions::default()).await;

    assert!(!outcome.success);
    assert!(outcome.error.is_some());
}

#[tokio::test]
async fn invalid_record_is_refused_without_a_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/errors"))
        .respond_with(EchoAck)
        .expect(0)
        .mount(&server)
        .await;

    let reporter = Reporter::new(mock_endpoint(&server)).unwrap();
    let outcome = reporter.report("", "boom", ReportOptions::default()).await;

    assert!(!outcome.success);
    server.verify().await;
}
