use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{DispatchError, JsonRpcError, JsonRpcErrorObject};
use crate::types::{JsonRpcVersion, RequestId};

/// A successful JSON-RPC response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub id: Option<RequestId>,
    pub result: Value,
}

impl JsonRpcResponse {
    pub fn new(id: Option<RequestId>, result: Value) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            id,
            result,
        }
    }
}

/// Union type that represents either a successful response or an error response
/// This ensures JSON-RPC 2.0 compliance by keeping success and error responses separate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum JsonRpcMessage {
    /// Successful response with result field
    Response(JsonRpcResponse),
    /// Error response with error field
    Error(JsonRpcError),
}

impl JsonRpcMessage {
    /// Create a success message
    pub fn success(id: Option<RequestId>, result: Value) -> Self {
        Self::Response(JsonRpcResponse::new(id, result))
    }

    /// Check if this is an error response
    pub fn is_error(&self) -> bool {
        matches!(self, JsonRpcMessage::Error(_))
    }

    /// Get the response id (`None` when it serializes as `null`)
    pub fn id(&self) -> Option<&RequestId> {
        match self {
            JsonRpcMessage::Response(resp) => resp.id.as_ref(),
            JsonRpcMessage::Error(err) => err.id.as_ref(),
        }
    }

    pub fn result(&self) -> Option<&Value> {
        match self {
            JsonRpcMessage::Response(resp) => Some(&resp.result),
            JsonRpcMessage::Error(_) => None,
        }
    }

    pub fn error_object(&self) -> Option<&JsonRpcErrorObject> {
        match self {
            JsonRpcMessage::Response(_) => None,
            JsonRpcMessage::Error(err) => Some(&err.error),
        }
    }
}

impl From<JsonRpcResponse> for JsonRpcMessage {
    fn from(response: JsonRpcResponse) -> Self {
        Self::Response(response)
    }
}

impl From<JsonRpcError> for JsonRpcMessage {
    fn from(error: JsonRpcError) -> Self {
        Self::Error(error)
    }
}

/// Everything a single dispatch produces: one response, or one per batch element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DispatchReply {
    Single(JsonRpcMessage),
    Batch(Vec<JsonRpcMessage>),
}

impl DispatchReply {
    pub fn as_single(&self) -> Option<&JsonRpcMessage> {
        match self {
            DispatchReply::Single(message) => Some(message),
            DispatchReply::Batch(_) => None,
        }
    }

    pub fn as_batch(&self) -> Option<&[JsonRpcMessage]> {
        match self {
            DispatchReply::Single(_) => None,
            DispatchReply::Batch(messages) => Some(messages),
        }
    }

    pub fn to_value(&self) -> Result<Value, DispatchError> {
        Ok(serde_json::to_value(self)?)
    }

    pub fn to_json_string(&self) -> Result<String, DispatchError> {
        Ok(serde_json::to_string(self)?)
    }
}

impl From<JsonRpcMessage> for DispatchReply {
    fn from(message: JsonRpcMessage) -> Self {
        DispatchReply::Single(message)
    }
}

/// Reply in the shape selected by `DispatcherConfig::serialize_output`.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutput {
    Structured(DispatchReply),
    Text(String),
}

impl DispatchOutput {
    pub fn as_reply(&self) -> Option<&DispatchReply> {
        match self {
            DispatchOutput::Structured(reply) => Some(reply),
            DispatchOutput::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DispatchOutput::Structured(_) => None,
            DispatchOutput::Text(text) => Some(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_response_serialization() {
        let message = JsonRpcMessage::success(Some(RequestId::from(1)), json!(3));
        assert_eq!(
            serde_json::to_value(&message).unwrap(),
            json!({"jsonrpc": "2.0", "id": 1, "result": 3})
        );
    }

    #[test]
    fn test_null_result_keeps_result_field() {
        let message = JsonRpcMessage::success(Some(RequestId::from("a")), Value::Null);
        let json = serde_json::to_string(&message).unwrap();
        assert!(json.contains(r#""result":null"#));
        assert!(!json.contains("error"));
    }

    #[test]
    fn test_message_round_trip_picks_variant() {
        let error: JsonRpcMessage = serde_json::from_value(json!({
            "jsonrpc": "2.0", "id": null, "error": {"code": -32700, "message": "Parse error"}
        }))
        .unwrap();
        assert!(error.is_error());
        assert_eq!(error.id(), None);
        assert_eq!(error.error_object().unwrap().code, -32700);

        let ok: JsonRpcMessage =
            serde_json::from_value(json!({"jsonrpc": "2.0", "id": 4, "result": [1]})).unwrap();
        assert!(!ok.is_error());
        assert_eq!(ok.result(), Some(&json!([1])));
    }

    #[test]
    fn test_batch_reply_serializes_as_array() {
        let reply = DispatchReply::Batch(vec![
            JsonRpcMessage::success(Some(RequestId::from(1)), json!(1)),
            JsonRpcError::invalid_request().into(),
        ]);
        let value = reply.to_value().unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert_eq!(value[1]["error"]["message"], "Invalid Request");
        assert!(reply.as_single().is_none());
    }
}
