//! Typed parsing of the `/convert` response body.
//!
//! The status code is carried along but never decides success: any body
//! that is a JSON object with a string `ascii` field is a result, whatever
//! the status. On failure the server replies `{"error": "…"}`; that message
//! is surfaced in [`ConvertError::MissingAsciiField`].

use crate::error::ConvertError;
use crate::output::{AboutInfo, ConversionOutput};
use serde_json::{Map, Value};

/// Maximum number of body characters kept in a malformed-response error.
const PREVIEW_CHARS: usize = 200;

/// Parse a `/convert` response body.
///
/// An `ascii` of `null` counts as absent.
pub fn parse_conversion(
    status: u16,
    body: &str,
    duration_ms: u64,
) -> Result<ConversionOutput, ConvertError> {
    let object = parse_object(status, body)?;

    match object.get("ascii") {
        Some(Value::String(ascii)) => Ok(ConversionOutput {
            status,
            ascii: ascii.clone(),
            duration_ms,
        }),
        None | Some(Value::Null) => Err(ConvertError::MissingAsciiField {
            status,
            server_error: object
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string),
        }),
        Some(other) => Err(malformed(
            status,
            format!("'ascii' must be a string, got {}", json_kind(other)),
            body,
        )),
    }
}

/// Parse a `/about` response body.
pub fn parse_about(status: u16, body: &str) -> Result<AboutInfo, ConvertError> {
    let object = parse_object(status, body)?;
    serde_json::from_value(Value::Object(object))
        .map_err(|e| malformed(status, e.to_string(), body))
}

/// Both routes answer with a JSON object; arrays and scalars are rejected
/// here, before any field lookup.
fn parse_object(status: u16, body: &str) -> Result<Map<String, Value>, ConvertError> {
    match serde_json::from_str(body) {
        Ok(Value::Object(object)) => Ok(object),
        Ok(other) => Err(malformed(
            status,
            format!("expected a JSON object, got {}", json_kind(&other)),
            body,
        )),
        Err(e) => Err(malformed(status, e.to_string(), body)),
    }
}

fn malformed(status: u16, detail: String, body: &str) -> ConvertError {
    ConvertError::MalformedResponse {
        status,
        detail,
        preview: preview(body),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn preview(body: &str) -> String {
    body.chars().take(PREVIEW_CHARS).collect()
}
