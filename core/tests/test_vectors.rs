//! Verify classification and message lookup against JSON test vectors stored
//! in `test-vectors/`.
//!
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use serde::de::IgnoredAny;
use serde_json::Value;
use thesis_core::{error_message, ClientConfig, ErrorKind, HttpResponse, ThesisApi};

fn parse_kind(s: &str) -> ErrorKind {
    match s {
        "Api" => ErrorKind::Api,
        "Authentication" => ErrorKind::Authentication,
        "Authorization" => ErrorKind::Authorization,
        "NotFound" => ErrorKind::NotFound,
        "Validation" => ErrorKind::Validation,
        other => panic!("unknown kind: {other}"),
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[test]
fn classification_test_vectors() {
    let raw = include_str!("../../test-vectors/classification.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    let api = ThesisApi::new(&ClientConfig::new("http://localhost:8080"));
    for case in vectors["cases"].as_array().unwrap() {
        let name = case["name"].as_str().unwrap();
        let response = HttpResponse {
            status: case["response"]["status"].as_u64().unwrap() as u16,
            headers: Vec::new(),
            body: case["response"]["body"].as_str().unwrap().to_string(),
        };
        let expected = &case["expected"];

        let err = api.parse::<IgnoredAny>(response).unwrap_err();
        assert_eq!(err.kind(), parse_kind(expected["kind"].as_str().unwrap()), "{name}: kind");
        assert_eq!(
            err.status(),
            expected["status"].as_u64().map(|s| s as u16),
            "{name}: status"
        );
        assert_eq!(err.message(), expected["message"].as_str().unwrap(), "{name}: message");

        match err.kind() {
            ErrorKind::Authentication | ErrorKind::Authorization | ErrorKind::NotFound => {
                assert!(err.body().is_none(), "{name}: body must be absent");
            }
            ErrorKind::Validation => {
                assert_eq!(err.validation_errors(), Some(&expected["body"]), "{name}: errors");
            }
            ErrorKind::Api => {
                let body = err.body().cloned().unwrap_or(Value::Null);
                assert_eq!(body, expected["body"], "{name}: body");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Message lookup
// ---------------------------------------------------------------------------

#[test]
fn error_message_test_vectors() {
    let raw = include_str!("../../test-vectors/error_messages.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();

    for case in vectors["cases"].as_array().unwrap() {
        let endpoint = case["endpoint"].as_str().unwrap();
        let status = case["status"].as_u64().map(|s| s as u16);
        assert_eq!(
            error_message(endpoint, status),
            case["message"].as_str().unwrap(),
            "{endpoint} / {status:?}"
        );
    }
}
