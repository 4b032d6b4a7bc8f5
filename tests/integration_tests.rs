//! Integration tests using mock HTTP server
//!
//! Tests the full end-to-end flow: YAML config → AdminClient → paged HTTP
//! requests → accumulated records

use admin_api_client::config::ClientConfig;
use admin_api_client::http::{ApiRequest, HttpClient, Transport};
use admin_api_client::logs::{LogRecord, LogWindow};
use admin_api_client::pagination::{limit, OptionPipeline};
use admin_api_client::{AdminClient, Error, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn config_for(server: &MockServer) -> ClientConfig {
    let yaml = format!(
        r#"
base_url: "{}"
timeout_seconds: 5
max_retries: 2
backoff:
  type: constant
  initial_ms: 1
  max_ms: 5
default_headers:
  X-Client: integration
"#,
        server.uri()
    );
    ClientConfig::from_yaml_str(&yaml).unwrap()
}

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

fn log_page(timestamps: impl IntoIterator<Item = i64>) -> serde_json::Value {
    let records: Vec<_> = timestamps
        .into_iter()
        .enumerate()
        .map(|(i, ts)| json!({ "action": "user_update", "object": format!("u{i}"), "timestamp": ts }))
        .collect();
    json!({ "stat": "OK", "response": records })
}

// ============================================================================
// Offset Pagination Flow
// ============================================================================

#[tokio::test]
async fn test_users_flow_from_yaml_config() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/v1/users"))
        .and(header("X-Client", "integration"))
        .and(query_param("limit", "2"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "stat": "OK",
            "metadata": { "prev_offset": null, "next_offset": 2, "total_objects": 3 },
            "response": [{ "user_id": "DU1" }, { "user_id": "DU2" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/admin/v1/users"))
        .and(query_param("limit", "2"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "stat": "OK",
            "metadata": { "prev_offset": "0", "next_offset": null, "total_objects": "3" },
            "response": [{ "user_id": "DU3" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AdminClient::from_config(&config_for(&server)).unwrap();
    let users = client
        .get_users(&OptionPipeline::new().with(limit(2)))
        .await
        .unwrap();

    let ids: Vec<_> = users
        .items
        .iter()
        .map(|u| u["user_id"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(ids, vec!["DU1", "DU2", "DU3"]);
    assert_eq!(users.total_objects, Some(3));
    assert_eq!(users.pages, 2);
}

#[tokio::test]
async fn test_transient_failure_retried_mid_pagination() {
    let server = MockServer::start().await;

    Mock::given(path("/admin/v1/phones"))
        .and(query_param("offset", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "stat": "OK",
            "metadata": { "next_offset": 100 },
            "response": [{ "phone_id": "DP1" }]
        })))
        .mount(&server)
        .await;

    Mock::given(path("/admin/v1/phones"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(path("/admin/v1/phones"))
        .and(query_param("offset", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "stat": "OK",
            "metadata": { "next_offset": null },
            "response": [{ "phone_id": "DP2" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = AdminClient::from_config(&config_for(&server)).unwrap();
    let phones = client.get_phones(&OptionPipeline::new()).await.unwrap();

    assert_eq!(phones.len(), 2);
    assert_eq!(phones.items[1]["phone_id"], "DP2");
}

#[tokio::test]
async fn test_http_error_aborts_retrieval() {
    let server = MockServer::start().await;

    Mock::given(path("/admin/v1/groups"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    let client = AdminClient::from_config(&config_for(&server)).unwrap();
    let err = client.get_groups(&OptionPipeline::new()).await.unwrap_err();

    assert!(matches!(err, Error::HttpStatus { status: 401, .. }));
    assert!(err.is_transport());
}

// ============================================================================
// Log Pagination Flow
// ============================================================================

#[tokio::test]
async fn test_admin_logs_advance_window() {
    let server = MockServer::start().await;

    // Full page, mixed timestamps: the next request starts at the newest one.
    let first = (0..1000).map(|i| if i < 700 { 1346172815 } else { 1346172818 });
    Mock::given(path("/admin/v1/logs/administrator"))
        .and(query_param("mintime", "1346172815"))
        .respond_with(ResponseTemplate::new(200).set_body_json(log_page(first)))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(path("/admin/v1/logs/administrator"))
        .and(query_param("mintime", "1346172818"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(log_page([1346172818, 1346172821])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = AdminClient::from_config(&config_for(&server)).unwrap();
    let window = LogWindow::new(at(1346172815), at(1346172825)).unwrap();
    let logs = client
        .get_admin_logs(window, &OptionPipeline::new())
        .await
        .unwrap();

    assert_eq!(logs.pages, 2);
    assert_eq!(logs.len(), 1002);
    assert_eq!(
        logs.items.last().unwrap().timestamp().unwrap(),
        at(1346172821)
    );
}

#[tokio::test]
async fn test_admin_logs_stop_at_max_time() {
    let server = MockServer::start().await;

    Mock::given(path("/admin/v1/logs/administrator"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(log_page((0..1000).map(|_| 1346172825))),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = AdminClient::from_config(&config_for(&server)).unwrap();
    let window = LogWindow::new(at(1346172815), at(1346172825)).unwrap();
    let logs = client
        .get_admin_logs(window, &OptionPipeline::new())
        .await
        .unwrap();

    assert_eq!(logs.pages, 1);
    assert_eq!(logs.len(), 1000);
}

#[tokio::test]
async fn test_malformed_timestamp_surfaces() {
    let server = MockServer::start().await;

    let mut body = log_page((0..1000).map(|_| 1346172816));
    body["response"][500]["timestamp"] = json!("yesterday");
    Mock::given(path("/admin/v1/logs/telephony"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let client = AdminClient::from_config(&config_for(&server)).unwrap();
    let window = LogWindow::new(at(1346172815), at(1346172825)).unwrap();
    let err = client
        .get_telephony_logs(window, &OptionPipeline::new())
        .await
        .unwrap_err();

    assert!(matches!(err, Error::TimestampParse { .. }));
}

// ============================================================================
// Custom Transport
// ============================================================================

/// Wraps the HTTP client, stamping every request with a signature header
struct SigningTransport {
    inner: HttpClient,
    signed: AtomicUsize,
}

#[async_trait]
impl Transport for SigningTransport {
    async fn send(&self, request: &ApiRequest) -> Result<String> {
        self.signed.fetch_add(1, Ordering::SeqCst);
        self.inner.send(request).await
    }
}

#[tokio::test]
async fn test_custom_transport_shared_between_tasks() {
    let server = MockServer::start().await;

    for resource in ["tokens", "u2ftokens"] {
        Mock::given(path(format!("/admin/v1/{resource}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "stat": "OK",
                "metadata": { "next_offset": null, "total_objects": 1 },
                "response": [{ "resource": resource }]
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let transport = Arc::new(SigningTransport {
        inner: HttpClient::from_client_config(&config_for(&server)).unwrap(),
        signed: AtomicUsize::new(0),
    });
    let client = AdminClient::new(Arc::clone(&transport));
    let options = OptionPipeline::new();

    let (tokens, u2f) = tokio::join!(client.get_tokens(&options), client.get_u2f_tokens(&options));

    assert_eq!(tokens.unwrap().items[0]["resource"], "tokens");
    assert_eq!(u2f.unwrap().items[0]["resource"], "u2ftokens");
    assert_eq!(transport.signed.load(Ordering::SeqCst), 2);
}
