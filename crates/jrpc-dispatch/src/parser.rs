//! Request text/structure → generic JSON value.

use serde_json::Value;
use tracing::debug;

use crate::error::JsonRpcError;
use crate::request::RequestInput;

/// Decode a request and check that it is something the dispatcher can answer.
///
/// Only objects (single requests) and arrays (batches) survive; invalid JSON
/// and top-level scalars both become a parse error with a null id.
pub fn parse_request(input: RequestInput) -> Result<Value, JsonRpcError> {
    let value = match input {
        RequestInput::Value(value) => value,
        RequestInput::Text(text) => serde_json::from_str(&text).map_err(|e| {
            debug!(error = %e, "Rejecting request text that is not valid JSON");
            JsonRpcError::parse_error()
        })?,
    };

    match value {
        Value::Object(_) | Value::Array(_) => Ok(value),
        other => {
            debug!(kind = value_kind(&other), "Rejecting non-structured request");
            Err(JsonRpcError::parse_error())
        }
    }
}

/// Short JSON type name used in logs and bind diagnostics.
pub(crate) fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_valid_object_and_array() {
        let value = parse_request(r#"{"jsonrpc": "2.0", "method": "test", "id": 1}"#.into()).unwrap();
        assert_eq!(value["method"], "test");

        let value = parse_request(r#"[{"jsonrpc": "2.0"}]"#.into()).unwrap();
        assert!(value.is_array());
    }

    #[test]
    fn test_parse_invalid_json() {
        for text in ["dsfsdfds}ew223}", "{123}}", "self", r#"{"jsonrpc": "2.0", "method": "test""#] {
            let error = parse_request(text.into()).unwrap_err();
            assert_eq!(error.error.code, -32700, "input: {}", text);
            assert_eq!(error.id, None);
        }
    }

    #[test]
    fn test_parse_rejects_scalars() {
        assert!(parse_request("123".into()).is_err());
        assert!(parse_request(json!("text").into()).is_err());
        assert!(parse_request(json!(null).into()).is_err());
    }

    #[test]
    fn test_decoded_value_passes_through() {
        let input = json!({"method": "x"});
        assert_eq!(parse_request(input.clone().into()).unwrap(), input);
    }
}
