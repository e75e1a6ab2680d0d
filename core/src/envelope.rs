//! Decoding of response payloads into typed values.
//!
//! List endpoints answer with either a bare JSON array or an object wrapping
//! the array under `data`. `ListPayload::decode` accepts exactly those two
//! shapes and rejects everything else with `ApiError::UnexpectedShape`.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::ApiError;

const LIST_SHAPE: &str = "a JSON array or an object with a `data` array";

#[derive(Debug, Clone, PartialEq)]
pub enum ListPayload<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T>, total: Option<u64> },
}

impl<T: DeserializeOwned> ListPayload<T> {
    pub fn decode(value: Value) -> Result<Self, ApiError> {
        match value {
            Value::Array(items) => Ok(ListPayload::Bare(decode_items(items)?)),
            Value::Object(mut fields) => match fields.remove("data") {
                Some(Value::Array(items)) => Ok(ListPayload::Wrapped {
                    data: decode_items(items)?,
                    total: fields.get("total").and_then(Value::as_u64),
                }),
                _ => Err(ApiError::UnexpectedShape {
                    expected: LIST_SHAPE,
                }),
            },
            _ => Err(ApiError::UnexpectedShape {
                expected: LIST_SHAPE,
            }),
        }
    }
}

impl<T> ListPayload<T> {
    pub fn into_items(self) -> Vec<T> {
        match self {
            ListPayload::Bare(items) | ListPayload::Wrapped { data: items, .. } => items,
        }
    }
}

fn decode_items<T: DeserializeOwned>(items: Vec<Value>) -> Result<Vec<T>, ApiError> {
    items.into_iter().map(decode).collect()
}

/// Decode a single JSON value into `T`.
pub fn decode<T: DeserializeOwned>(value: Value) -> Result<T, ApiError> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}
