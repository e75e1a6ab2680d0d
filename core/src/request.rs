//! Sans-IO half of the request executor.
//!
//! # Design
//! `build_request` turns a `RequestDescriptor` plus the current token into a
//! fully-qualified `HttpRequest`; `parse_response` turns whatever came back
//! into a JSON value or an `ApiError`. Neither touches the network, so the
//! header, status and `detail` rules are pinned down by plain unit tests.

use serde::Serialize;
use serde_json::{Map, Value};
use url::form_urlencoded;

use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};

const JSON_CONTENT_TYPE: &str = "application/json";

/// One API call, described before the token and base URL are known.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub endpoint: String,
    pub method: HttpMethod,
    pub body: Option<Value>,
    pub headers: Vec<(String, String)>,
}

impl RequestDescriptor {
    pub fn new(method: HttpMethod, endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            method,
            body: None,
            headers: Vec::new(),
        }
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Serialization` when `payload` cannot be represented
    /// as JSON.
    pub fn json<B: Serialize + ?Sized>(mut self, payload: &B) -> Result<Self, ApiError> {
        let body =
            serde_json::to_value(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        self.body = Some(body);
        Ok(self)
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Produce the outgoing request for `descriptor`.
///
/// Defaults are `content-type: application/json` and, when `token` is a
/// non-empty string, `authorization: Bearer <token>`. Caller headers replace
/// defaults of the same name.
pub fn build_request(
    config: &ClientConfig,
    descriptor: &RequestDescriptor,
    token: Option<&str>,
) -> Result<HttpRequest, ApiError> {
    let mut headers = vec![("content-type".to_string(), JSON_CONTENT_TYPE.to_string())];
    if let Some(token) = token.filter(|t| !t.is_empty()) {
        headers.push(("authorization".to_string(), format!("Bearer {token}")));
    }
    for (name, value) in &descriptor.headers {
        headers.retain(|(existing, _)| !existing.eq_ignore_ascii_case(name));
        headers.push((name.clone(), value.clone()));
    }

    let body = descriptor
        .body
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| ApiError::Serialization(e.to_string()))?;

    Ok(HttpRequest {
        method: descriptor.method,
        path: format!("{}{}", config.api_root(), descriptor.endpoint),
        headers,
        body,
    })
}

/// Interpret a response according to its `content-type` and status.
///
/// - JSON and 2xx: the parsed body (a blank body reads as `{}`).
/// - JSON and not 2xx: `ApiError::Server` using the body's `detail`.
/// - Not JSON and 2xx: `{}`.
/// - Not JSON and not 2xx: `ApiError::Server` with a generic message.
pub fn parse_response(response: &HttpResponse) -> Result<Value, ApiError> {
    if !response.is_json() {
        if !response.is_success() {
            return Err(ApiError::server(response.status, None));
        }
        return Ok(Value::Object(Map::new()));
    }

    let parsed = parse_json_body(&response.body);
    if !response.is_success() {
        let detail = parsed.ok().as_ref().and_then(detail_message);
        return Err(ApiError::server(response.status, detail));
    }
    parsed.map_err(|e| ApiError::Decode(e.to_string()))
}

fn parse_json_body(body: &str) -> Result<Value, serde_json::Error> {
    if body.trim().is_empty() {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_str(body)
}

/// Extract the user-facing message from an error body.
///
/// `detail` is either a string or, for request validation failures, a list
/// of objects each carrying a `msg`.
fn detail_message(body: &Value) -> Option<String> {
    match body.get("detail")? {
        Value::String(detail) => Some(detail.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            (!messages.is_empty()).then(|| messages.join("; "))
        }
        _ => None,
    }
}

/// Append URL-encoded query parameters to `path`.
pub fn with_query(path: &str, params: &[(&str, String)]) -> String {
    if params.is_empty() {
        return path.to_string();
    }
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params.iter().map(|(k, v)| (*k, v.as_str())))
        .finish();
    format!("{path}?{query}")
}

/// Offset pagination used by most list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub skip: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }

    pub(crate) fn query_pairs(self) -> Vec<(&'static str, String)> {
        vec![("skip", self.skip.to_string()), ("limit", self.limit.to_string())]
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self { skip: 0, limit: 20 }
    }
}

/// Page-number pagination used by the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        Self { page, limit }
    }

    pub(crate) fn query_pairs(self) -> Vec<(&'static str, String)> {
        vec![("page", self.page.to_string()), ("limit", self.limit.to_string())]
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, limit: 20 }
    }
}
