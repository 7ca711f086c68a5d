#![allow(clippy::unwrap_used)]
// Integration tests for `RemoteClient` using wiremock.

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fieldsync_api::{Error, RemoteClient, ReportsPayload, TransportConfig};

// ── Helpers ─────────────────────────────────────────────────────────

async fn setup() -> (MockServer, RemoteClient) {
    let server = MockServer::start().await;
    let base = format!("{}/api", server.uri());
    let client = RemoteClient::new(&base, &TransportConfig::default()).unwrap();
    (server, client)
}

// ── Sensors ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_sensors_sends_json_content_type() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/sensors"))
        .and(header("content-type", "application/json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "sensorId": "A1", "temperature": 24.5, "humidity": 65, "soilMoisture": 42 },
                { "id": "B2", "temperature": "19.0", "location": "North field" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let sensors = client.list_sensors().await.unwrap();

    assert_eq!(sensors.len(), 2);
    assert_eq!(sensors[0].sensor_id.as_deref(), Some("A1"));
    assert_eq!(sensors[0].temperature, Some(24.5));
    assert_eq!(sensors[1].id.as_deref(), Some("B2"));
    assert_eq!(sensors[1].temperature, Some(19.0));
    assert_eq!(sensors[1].location.as_deref(), Some("North field"));
}

#[tokio::test]
async fn test_missing_data_is_empty_not_error() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/realtime"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "ok" })))
        .mount(&server)
        .await;

    let readings = client.list_realtime().await.unwrap();
    assert!(readings.is_empty());
}

#[tokio::test]
async fn test_get_sensor_detail() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/sensors/A1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "sensorId": "A1", "phLevel": 6.8, "waterLevel": 12 }
        })))
        .mount(&server)
        .await;

    let sensor = client.get_sensor("A1").await.unwrap().unwrap();
    assert_eq!(sensor.ph_level, Some(6.8));
    assert_eq!(sensor.water_level, Some(12.0));
}

#[tokio::test]
async fn test_get_sensor_without_data_is_none() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/sensors/ghost"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    assert!(client.get_sensor("ghost").await.unwrap().is_none());
}

// ── Alerts ──────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_alerts() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/alerts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [
                { "id": "al-1", "sensorId": "A1", "severity": "critical", "message": "Too hot" },
                { "alertId": "al-2", "alertType": "humidity" }
            ]
        })))
        .mount(&server)
        .await;

    let alerts = client.list_alerts().await.unwrap();
    assert_eq!(alerts.len(), 2);
    assert_eq!(alerts[0].severity.as_deref(), Some("critical"));
    assert_eq!(alerts[1].alert_id.as_deref(), Some("al-2"));
    assert_eq!(alerts[1].alert_type.as_deref(), Some("humidity"));
}

#[tokio::test]
async fn test_resolve_alert_posts_to_resolve_path() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/alerts/al-1/resolve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "resolved": true }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = client.resolve_alert("al-1").await.unwrap();
    assert_eq!(resp, json!({ "resolved": true }));
}

#[tokio::test]
async fn test_resolve_alert_without_data_returns_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/alerts/al-9/resolve"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let resp = client.resolve_alert("al-9").await.unwrap();
    assert_eq!(resp, json!({ "ok": true }));
}

// ── Reports ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_reports_as_array() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "reportType": "daily", "fields": ["F1", "F2"] }]
        })))
        .mount(&server)
        .await;

    match client.list_reports().await.unwrap() {
        ReportsPayload::List(reports) => {
            assert_eq!(reports.len(), 1);
            assert_eq!(reports[0].report_type.as_deref(), Some("daily"));
        }
        other => panic!("expected list payload, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_reports_as_plain_text_body() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/reports"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string("reportType,avgTemperature\ndaily,21.5\n")
                .insert_header("content-type", "text/csv"),
        )
        .mount(&server)
        .await;

    match client.list_reports().await.unwrap() {
        ReportsPayload::Table(text) => assert!(text.starts_with("reportType,")),
        other => panic!("expected table payload, got: {other:?}"),
    }
}

// ── Error tests ─────────────────────────────────────────────────────

#[tokio::test]
async fn test_error_carries_upstream_message() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/alerts"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({ "message": "Event hub offline" })),
        )
        .mount(&server)
        .await;

    let result = client.list_alerts().await;

    match result {
        Err(Error::Http { status, ref message }) => {
            assert_eq!(status, 503);
            assert_eq!(message, "Event hub offline");
        }
        other => panic!("expected Http error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_error_falls_back_to_raw_body() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/alerts/al-1/resolve"))
        .respond_with(ResponseTemplate::new(404).set_body_string("no such alert"))
        .mount(&server)
        .await;

    let err = client.resolve_alert("al-1").await.unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(err.to_string(), "Service error (HTTP 404): no such alert");
}

#[tokio::test]
async fn test_error_without_body_uses_status_text() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    match client.list_sensors().await {
        Err(Error::Http { status, message }) => {
            assert_eq!(status, 500);
            assert!(message.contains("500"), "unexpected message: {message}");
        }
        other => panic!("expected Http 500 error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_slow_response_times_out() {
    let server = MockServer::start().await;
    let transport = TransportConfig {
        timeout: Duration::from_millis(200),
        ..TransportConfig::default()
    };
    let client = RemoteClient::new(&server.uri(), &transport).unwrap();

    Mock::given(method("GET"))
        .and(path("/sensors"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [] }))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let result = client.list_sensors().await;
    assert!(
        matches!(result, Err(Error::Timeout { .. })),
        "expected Timeout, got: {result:?}"
    );
}
