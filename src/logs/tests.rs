//! Tests for log records, windows and cursors

use super::*;
use crate::decode::{decode_envelope, Envelope};
use crate::error::Error;
use crate::types::QueryParams;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;
use test_case::test_case;

fn at(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap()
}

// ============================================================================
// Timestamp Parsing Tests
// ============================================================================

#[test_case(json!(1346172820) => 1346172820 ; "integer")]
#[test_case(json!("1346172820") => 1346172820 ; "numeric string")]
#[test_case(json!(" 1346172820 ") => 1346172820 ; "padded string")]
#[test_case(json!(1346172820.0) => 1346172820 ; "integral float")]
fn test_parse_epoch_seconds(value: serde_json::Value) -> i64 {
    parse_epoch_seconds(Some(&value)).unwrap()
}

#[test_case(None ; "missing")]
#[test_case(Some(json!(null)) ; "null")]
#[test_case(Some(json!("abc")) ; "not a number")]
#[test_case(Some(json!(1.5)) ; "fractional")]
#[test_case(Some(json!(true)) ; "boolean")]
fn test_parse_epoch_seconds_rejects(value: Option<serde_json::Value>) {
    let err = parse_epoch_seconds(value.as_ref()).unwrap_err();
    assert!(matches!(err, Error::TimestampParse { .. }));
}

#[test]
fn test_record_accessors() {
    let log: AdminLog = serde_json::from_value(json!({
        "action": "user_update",
        "description": "{\"notes\": \"Joe asked for their nickname to be displayed\"}",
        "object": "jsmith",
        "timestamp": 1346172820,
        "username": "admin"
    }))
    .unwrap();

    assert_eq!(log.get_str("action"), Some("user_update"));
    assert_eq!(log.get_str("missing"), None);
    assert_eq!(log.timestamp_secs().unwrap(), 1346172820);
    assert_eq!(log.timestamp().unwrap(), at(1346172820));
    assert_eq!(log.fields().len(), 5);
}

#[test]
fn test_record_at_and_round_trip() {
    let log = TelephonyLog::at(1346172697);
    assert_eq!(log.timestamp().unwrap(), at(1346172697));

    let raw = log.clone().into_inner();
    assert_eq!(TelephonyLog::from(raw), log);
    assert_eq!(
        serde_json::to_value(&log).unwrap(),
        json!({ "timestamp": 1346172697 })
    );
}

// ============================================================================
// LogWindow Tests
// ============================================================================

#[test]
fn test_log_window_new() {
    let window = LogWindow::new(at(1346172815), at(1346172825)).unwrap();
    assert_eq!(window.min_time, at(1346172815));
    assert_eq!(window.max_time, at(1346172825));

    assert!(LogWindow::new(at(5), at(5)).is_ok());

    let err = LogWindow::new(at(1346172825), at(1346172815)).unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
}

#[test]
fn test_log_window_starting_at() {
    let window = LogWindow::starting_at(at(1532951960), Duration::seconds(5)).unwrap();
    assert_eq!(window.max_time, at(1532951965));

    assert!(LogWindow::starting_at(at(1532951960), Duration::seconds(-5)).is_err());
}

#[test]
fn test_log_window_since() {
    let window = LogWindow::since(at(1346172815)).unwrap();
    assert!(window.max_time > window.min_time);

    let future = Utc::now() + Duration::days(1);
    assert!(LogWindow::since(future).is_err());
}

#[test]
fn test_log_window_write_millis() {
    let window = LogWindow::starting_at(at(1532951960), Duration::seconds(5)).unwrap();
    let mut params = QueryParams::new();
    window.write_millis(&mut params);

    assert_eq!(params[MINTIME_PARAM], "1532951960000");
    assert_eq!(params[MAXTIME_PARAM], "1532951965000");
}

#[test]
fn test_epoch_encodings() {
    let time = at(1346172815) + Duration::milliseconds(250);
    assert_eq!(epoch_seconds(time), "1346172815");
    assert_eq!(epoch_millis(time), "1346172815250");
}

// ============================================================================
// Cursor Tests
// ============================================================================

#[test]
fn test_composite_cursor_param() {
    let cursor = CompositeCursor::new("1532951920000", "b40ba235-0b33-23c8-bc23-a31aa0231db4");
    assert_eq!(cursor.timestamp_millis(), "1532951920000");
    assert_eq!(cursor.opaque_id(), "b40ba235-0b33-23c8-bc23-a31aa0231db4");
    assert_eq!(
        cursor.to_param(),
        "1532951920000,b40ba235-0b33-23c8-bc23-a31aa0231db4"
    );

    let mut params = QueryParams::new();
    (cursor.as_option())(&mut params);
    assert_eq!(
        params[NEXT_OFFSET_PARAM],
        "1532951920000,b40ba235-0b33-23c8-bc23-a31aa0231db4"
    );
}

#[test]
fn test_cursor_metadata_with_cursor() {
    let metadata: CursorMetadata = serde_json::from_value(json!({
        "next_offset": ["1532951895000", "af0ba235-0b33-23c8-bc23-a31aa0231de8"],
        "total_objects": 1
    }))
    .unwrap();

    assert_eq!(
        metadata.next_offset,
        Some(CompositeCursor::new(
            "1532951895000",
            "af0ba235-0b33-23c8-bc23-a31aa0231de8"
        ))
    );
    assert_eq!(metadata.total_objects, Some(1));
    assert!(metadata.next_page_option().is_some());
}

#[test]
fn test_cursor_metadata_numeric_parts() {
    let metadata: CursorMetadata =
        serde_json::from_value(json!({ "next_offset": [1532951895000_u64, "x"] })).unwrap();
    assert_eq!(metadata.next_offset.unwrap().to_param(), "1532951895000,x");
}

#[test_case(json!({ "next_offset": [] }) ; "empty array")]
#[test_case(json!({ "next_offset": null }) ; "null")]
#[test_case(json!({}) ; "missing")]
fn test_cursor_metadata_exhausted(value: serde_json::Value) {
    let metadata: CursorMetadata = serde_json::from_value(value).unwrap();
    assert_eq!(metadata.next_offset, None);
    assert!(metadata.next_page_option().is_none());
}

#[test_case(json!({ "next_offset": ["1"] }) ; "one element")]
#[test_case(json!({ "next_offset": ["1", "a", "b"] }) ; "three elements")]
#[test_case(json!({ "next_offset": [true, "a"] }) ; "boolean element")]
fn test_cursor_metadata_rejects(value: serde_json::Value) {
    assert!(serde_json::from_value::<CursorMetadata>(value).is_err());
}

#[test]
fn test_cursor_serializes_as_array() {
    let cursor = CompositeCursor::new("1532951895000", "af0ba235");
    assert_eq!(
        serde_json::to_value(&cursor).unwrap(),
        json!(["1532951895000", "af0ba235"])
    );
}

// ============================================================================
// AuthLogPage Tests
// ============================================================================

#[test]
fn test_auth_log_page_decode() {
    let body = json!({
        "stat": "OK",
        "response": {
            "authlogs": [{
                "access_device": { "browser": "Chrome", "ip": "192.168.225.128" },
                "event_type": "authentication",
                "factor": "duo_push",
                "reason": "user_approved",
                "result": "success",
                "timestamp": 1532951962,
                "txid": "340a23e3-23f3-23c1-87dc-1491a23dfdbb",
                "user": { "key": "DU3KC77WJ06Y5HIV7XKQ", "name": "narroway@example.com" }
            }],
            "metadata": {
                "next_offset": ["1532951895000", "af0ba235-0b33-23c8-bc23-a31aa0231de8"],
                "total_objects": 1
            }
        }
    })
    .to_string();

    let envelope: Envelope<AuthLogPage> = decode_envelope(&body).unwrap();
    let page = envelope.response;

    assert_eq!(page.logs.len(), 1);
    assert_eq!(page.logs[0].get_str("factor"), Some("duo_push"));
    assert_eq!(page.logs[0].timestamp_secs().unwrap(), 1532951962);
    assert_eq!(page.metadata.total_objects, Some(1));
    assert_eq!(
        page.metadata.next_offset.unwrap().to_param(),
        "1532951895000,af0ba235-0b33-23c8-bc23-a31aa0231de8"
    );
}

#[test]
fn test_auth_log_page_empty() {
    let page: AuthLogPage = serde_json::from_value(json!({ "authlogs": [] })).unwrap();
    assert!(page.logs.is_empty());
    assert_eq!(page.metadata, CursorMetadata::default());
}
