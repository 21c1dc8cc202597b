//! Wire envelope and line codec
//!
//! One JSON object per line in each direction. Requests carry a method name,
//! optional params and an optional correlation id; responses echo the id and
//! carry either `result` or `error`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtocolError;

/// Envelope tag written on every response
pub const JSONRPC_VERSION: &str = "2.0";

/// Protocol version advertised by `initialize`
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Methods in this namespace are fire-and-forget and never answered
pub const NOTIFICATION_PREFIX: &str = "notifications/";

/// An incoming request line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
}

impl Request {
    pub fn new(method: impl Into<String>, params: Option<Value>, id: Option<Value>) -> Self {
        Self {
            jsonrpc: Some(JSONRPC_VERSION.to_string()),
            method: method.into(),
            params,
            id,
        }
    }

    pub fn is_notification(&self) -> bool {
        self.method.starts_with(NOTIFICATION_PREFIX)
    }

    /// Correlation id to echo back, `null` when the caller sent none
    pub fn response_id(&self) -> Value {
        self.id.clone().unwrap_or(Value::Null)
    }
}

/// Either half of a response body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Result(Value),
    Error(ProtocolError),
}

/// An outgoing response line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    pub jsonrpc: String,
    pub id: Value,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl Response {
    pub fn ok(id: Value, result: Value) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            outcome: Outcome::Result(result),
        }
    }

    pub fn err(id: Value, error: ProtocolError) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION.to_string(),
            id,
            outcome: Outcome::Error(error),
        }
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.outcome {
            Outcome::Result(value) => Some(value),
            Outcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ProtocolError> {
        match &self.outcome {
            Outcome::Result(_) => None,
            Outcome::Error(err) => Some(err),
        }
    }
}

/// A line that could not be turned into a [`Request`]
#[derive(Debug, Clone, PartialEq)]
pub struct DecodeError {
    /// Id recovered from the line, if any
    pub id: Value,
    pub error: ProtocolError,
}

/// Decode one request line
///
/// Invalid JSON is a parse failure with a `null` id. Valid JSON that is not a
/// request object is an invalid request, answered with whatever id could be
/// recovered.
pub fn decode_request(line: &str) -> Result<Request, DecodeError> {
    let value: Value = serde_json::from_str(line).map_err(|e| DecodeError {
        id: Value::Null,
        error: ProtocolError::parse_failure(format!("Parse error: {}", e)),
    })?;

    let id = value.get("id").cloned().unwrap_or(Value::Null);
    serde_json::from_value(value).map_err(|e| DecodeError {
        id,
        error: ProtocolError::invalid_request(format!("Invalid request: {}", e)),
    })
}

/// Encode one response as a single line (without the trailing newline)
pub fn encode_response(response: &Response) -> Result<String, serde_json::Error> {
    serde_json::to_string(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::codes;
    use serde_json::json;

    #[test]
    fn test_decode_full_request() {
        let req = decode_request(
            r#"{"jsonrpc":"2.0","method":"read_file","params":{"path":"/tmp/a"},"id":7}"#,
        )
        .unwrap();
        assert_eq!(req.method, "read_file");
        assert_eq!(req.params, Some(json!({"path": "/tmp/a"})));
        assert_eq!(req.response_id(), json!(7));
        assert!(!req.is_notification());
    }

    #[test]
    fn test_decode_minimal_request() {
        let req = decode_request(r#"{"method":"notifications/initialized"}"#).unwrap();
        assert!(req.is_notification());
        assert_eq!(req.response_id(), Value::Null);
    }

    #[test]
    fn test_decode_garbage_is_parse_failure() {
        let err = decode_request("{not json").unwrap_err();
        assert_eq!(err.id, Value::Null);
        assert_eq!(err.error.code, codes::PARSE_ERROR);
    }

    #[test]
    fn test_decode_non_request_keeps_id() {
        let err = decode_request(r#"{"id":"abc","params":{}}"#).unwrap_err();
        assert_eq!(err.id, json!("abc"));
        assert_eq!(err.error.code, codes::INVALID_REQUEST);
    }

    #[test]
    fn test_encode_result_and_error_shapes() {
        let line = encode_response(&Response::ok(json!(1), json!({"ok": true}))).unwrap();
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value, json!({"jsonrpc": "2.0", "id": 1, "result": {"ok": true}}));

        let line = encode_response(&Response::err(
            Value::Null,
            ProtocolError::method_not_found("nope"),
        ))
        .unwrap();
        let value: Value = serde_json::from_str(&line).unwrap();
        assert_eq!(value["id"], Value::Null);
        assert_eq!(value["error"]["code"], codes::METHOD_NOT_FOUND);
        assert!(value.get("result").is_none());
    }

    #[test]
    fn test_encoded_line_has_no_newlines() {
        let line =
            encode_response(&Response::ok(json!(2), json!("first\nsecond\r\nthird"))).unwrap();
        assert!(!line.contains('\n'));
        let back: Response = serde_json::from_str(&line).unwrap();
        assert_eq!(back.result(), Some(&json!("first\nsecond\r\nthird")));
    }
}
