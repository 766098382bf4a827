use crate::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Build a human-readable message for a non-2xx response.
/// Prefers the `detail` field of a JSON body, then `error`, then the raw
/// body, then the canonical status reason.
pub fn error_message(status: reqwest::StatusCode, body: &str) -> String {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(body) {
        for field in ["detail", "error"] {
            if let Some(Value::String(message)) = map.get(field) {
                if !message.trim().is_empty() {
                    return message.clone();
                }
            }
        }
    }

    let body = body.trim();
    if !body.is_empty() && body.len() <= 200 && !body.starts_with('<') {
        return body.to_string();
    }

    status
        .canonical_reason()
        .map_or_else(|| format!("HTTP {}", status.as_u16()), ToString::to_string)
}

/// Parse a response body. An empty body is `Value::Null`.
pub fn parse_json_body(body: &str) -> ApiResult<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(body)?)
}

/// Decode a JSON value into a typed response. `null` decodes as an empty
/// object so endpoints that answer with no body still produce their
/// defaulted response type.
pub fn from_json_value<R: DeserializeOwned>(value: Value) -> ApiResult<R> {
    let value = if value.is_null() {
        Value::Object(serde_json::Map::new())
    } else {
        value
    };
    serde_json::from_value(value).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Read a single cookie out of a `Cookie` header string.
pub fn cookie_value<'a>(cookie_header: &'a str, name: &str) -> Option<&'a str> {
    cookie_header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.trim())
        .filter(|value| !value.is_empty())
}
