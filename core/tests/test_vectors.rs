//! Verify request building, response parsing and doctor normalization
//! against JSON test vectors stored in `test-vectors/`.
//!
//! Comparing parsed JSON (not raw strings) avoids false negatives from
//! field-ordering differences.

use clinic_core::request::{build_request, parse_response};
use clinic_core::{ApiError, ClientConfig, Doctor, HttpMethod, HttpResponse, RequestDescriptor};
use serde_json::Value;

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "PATCH" => HttpMethod::Patch,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn header_pairs(value: &Value) -> Vec<(String, String)> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let pair = h.as_array().unwrap();
            (pair[0].as_str().unwrap().to_string(), pair[1].as_str().unwrap().to_string())
        })
        .collect()
}

fn cases(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

#[test]
fn request_test_vectors() {
    let raw = include_str!("../../test-vectors/requests.json");
    let vectors: Value = serde_json::from_str(raw).unwrap();
    let base_url = vectors["base_url"].as_str().unwrap();
    let config = ClientConfig::new(base_url);

    for case in cases(raw) {
        let name = case["name"].as_str().unwrap();
        let input = &case["input"];
        let expected = &case["expected"];

        let mut descriptor = RequestDescriptor::new(
            parse_method(input["method"].as_str().unwrap()),
            input["endpoint"].as_str().unwrap(),
        );
        if !input["body"].is_null() {
            descriptor = descriptor.json(&input["body"]).unwrap();
        }
        for (header, value) in header_pairs(&input["headers"]) {
            descriptor = descriptor.header(&header, &value);
        }

        let req = build_request(&config, &descriptor, input["token"].as_str()).unwrap();
        assert_eq!(req.method, descriptor.method, "{name}: method");
        assert_eq!(
            req.path,
            format!("{base_url}{}", expected["path"].as_str().unwrap()),
            "{name}: path"
        );
        assert_eq!(req.headers, header_pairs(&expected["headers"]), "{name}: headers");

        let body: Value = req
            .body
            .as_deref()
            .map(|b| serde_json::from_str(b).unwrap())
            .unwrap_or(Value::Null);
        assert_eq!(body, expected["body"], "{name}: body");
    }
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

#[test]
fn response_test_vectors() {
    let raw = include_str!("../../test-vectors/responses.json");

    for case in cases(raw) {
        let name = case["name"].as_str().unwrap();
        let response = &case["response"];
        let expected = &case["expected"];

        let headers = match response["content_type"].as_str() {
            Some(content_type) => vec![("Content-Type".to_string(), content_type.to_string())],
            None => Vec::new(),
        };
        let resp = HttpResponse {
            status: response["status"].as_u64().unwrap() as u16,
            headers,
            body: response["body"].as_str().unwrap().to_string(),
        };

        let result = parse_response(&resp);
        if let Some(value) = expected.get("value") {
            assert_eq!(&result.unwrap(), value, "{name}: value");
            continue;
        }

        let err = result.unwrap_err();
        let want = &expected["error"];
        assert_eq!(err.status().map(u64::from), want["status"].as_u64(), "{name}: status");
        if let Some(message) = want["message"].as_str() {
            assert_eq!(err.to_string(), message, "{name}: message");
        }
        if want["kind"] == "decode" {
            assert!(
                matches!(err, ApiError::Decode(_)),
                "{name}: expected decode error, got {err:?}"
            );
        }
    }
}

// ---------------------------------------------------------------------------
// Doctors
// ---------------------------------------------------------------------------

#[test]
fn doctor_normalization_vectors() {
    let raw = include_str!("../../test-vectors/doctors.json");

    for case in cases(raw) {
        let name = case["name"].as_str().unwrap();
        let doctor: Doctor = serde_json::from_value(case["raw"].clone()).unwrap();
        let normalized = serde_json::to_value(&doctor).unwrap();

        for (field, want) in case["expected"].as_object().unwrap() {
            let got = normalized.get(field).unwrap_or(&Value::Null);
            match want {
                Value::Number(n) => assert_eq!(got.as_f64(), n.as_f64(), "{name}: {field}"),
                _ => assert_eq!(got, want, "{name}: {field}"),
            }
        }
        assert!(normalized.get("doctor_profile").is_none(), "{name}: profile flattened");
    }
}
