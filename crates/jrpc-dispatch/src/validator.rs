//! Envelope validation.
//!
//! Checks run in a fixed order and the first failure decides the response:
//! fields, version, method lookup, then params shape. Method lookup coming
//! before params means an unknown method is reported as such even when its
//! params are malformed too.

use serde_json::{Map, Value};
use tracing::debug;

use crate::binder::{SuppliedArgs, split_params};
use crate::error::{BindError, JsonRpcError};
use crate::parser::value_kind;
use crate::registry::{MethodEntry, MethodRegistry};
use crate::request::RequestParams;
use crate::types::{JsonRpcVersion, RequestId};

/// A validated request, ready to be bound and invoked.
#[derive(Debug)]
pub struct CallContext<'a, S> {
    pub entry: &'a MethodEntry<S>,
    pub id: Option<RequestId>,
    pub supplied: SuppliedArgs,
}

/// Why a request never reached its handler.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejected {
    /// Final response, including its id policy.
    Envelope(JsonRpcError),
    /// `params`/`kwargs` of the wrong JSON type; the classifier decides the id.
    Params {
        id: Option<RequestId>,
        error: BindError,
    },
}

impl From<JsonRpcError> for Rejected {
    fn from(error: JsonRpcError) -> Self {
        Rejected::Envelope(error)
    }
}

pub fn validate<'a, S>(
    request: &Value,
    registry: &'a MethodRegistry<S>,
) -> Result<CallContext<'a, S>, Rejected> {
    let Some(envelope) = request.as_object() else {
        debug!(kind = value_kind(request), "Request element is not an object");
        return Err(JsonRpcError::invalid_request().into());
    };

    let (Some(version), Some(raw_id), Some(method)) = (
        envelope.get("jsonrpc"),
        envelope.get("id"),
        envelope.get("method"),
    ) else {
        debug!("Request is missing one of jsonrpc/id/method");
        return Err(JsonRpcError::invalid_request().into());
    };

    let (Some(method), Ok(id)) = (method.as_str(), RequestId::from_value(raw_id)) else {
        debug!("Request method is not a string or id is not a scalar");
        return Err(JsonRpcError::invalid_request().into());
    };

    if !JsonRpcVersion::V2_0.matches(version) {
        debug!(version = %version, "Unsupported JSON-RPC version");
        return Err(JsonRpcError::invalid_request().into());
    }

    let Some(entry) = registry.get(method) else {
        debug!(method, "Method not found");
        return Err(JsonRpcError::method_not_found(id).into());
    };

    let params = match extract_params(envelope.get("params")) {
        Ok(params) => params,
        Err(error) => return Err(Rejected::Params { id, error }),
    };
    let kwargs = match extract_kwargs(envelope.get("kwargs")) {
        Ok(kwargs) => kwargs,
        Err(error) => return Err(Rejected::Params { id, error }),
    };

    debug!(method, id = ?id, params = ?params, kwargs = ?kwargs, "Validated request");

    Ok(CallContext {
        entry,
        id,
        supplied: split_params(params, kwargs),
    })
}

fn extract_params(params: Option<&Value>) -> Result<Option<RequestParams>, BindError> {
    match params {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Array(values)) => Ok(Some(RequestParams::Array(values.clone()))),
        Some(Value::Object(map)) => Ok(Some(RequestParams::Object(map.clone()))),
        Some(other) => Err(BindError::NonStructured(value_kind(other))),
    }
}

fn extract_kwargs(kwargs: Option<&Value>) -> Result<Option<Map<String, Value>>, BindError> {
    match kwargs {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map.clone())),
        Some(other) => Err(BindError::KwargsNotObject(value_kind(other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binder::{Args, Signature};
    use crate::dispatcher::JsonRpcDispatcher;
    use crate::error::MethodResult;
    use crate::registry::MethodHandler;
    use serde_json::json;
    use std::sync::Arc;

    fn registry() -> MethodRegistry<()> {
        let mut registry = MethodRegistry::new();
        registry.register(
            "add",
            Signature::required(["a", "b"]),
            MethodHandler::Sync(Arc::new(
                |_: &JsonRpcDispatcher<()>, _: Args| -> MethodResult { Ok(json!(0)) },
            )),
            None,
        );
        registry
    }

    fn envelope_error(request: Value) -> JsonRpcError {
        match validate(&request, &registry()) {
            Err(Rejected::Envelope(error)) => error,
            other => panic!("expected envelope rejection, got {:?}", other.map(|c| c.id)),
        }
    }

    #[test]
    fn test_missing_fields() {
        for request in [
            json!({"id": 1, "method": "add"}),
            json!({"jsonrpc": "2.0", "method": "add"}),
            json!({"jsonrpc": "2.0", "id": 1}),
            json!([1, 2]),
        ] {
            let error = envelope_error(request);
            assert_eq!(error.error.message, "Invalid Request");
            assert_eq!(error.id, None);
        }
    }

    #[test]
    fn test_bad_version_and_field_types() {
        for request in [
            json!({"jsonrpc": "1.0", "id": 1, "method": "add"}),
            json!({"jsonrpc": 2.0, "id": 1, "method": "add"}),
            json!({"jsonrpc": "2.0", "id": 1, "method": 5}),
            json!({"jsonrpc": "2.0", "id": {"x": 1}, "method": "add"}),
        ] {
            let error = envelope_error(request);
            assert_eq!(error.error.code, -32600);
            assert_eq!(error.id, None);
        }
    }

    #[test]
    fn test_method_resolved_before_params() {
        let error = envelope_error(
            json!({"jsonrpc": "2.0", "id": 9, "method": "unknown", "params": "bogus"}),
        );
        assert_eq!(error.error.message, "Method not found");
        assert_eq!(error.id, Some(RequestId::from(9)));
    }

    #[test]
    fn test_non_structured_params() {
        let request = json!({"jsonrpc": "2.0", "id": 3, "method": "add", "params": 123});
        match validate(&request, &registry()) {
            Err(Rejected::Params { id, error }) => {
                assert_eq!(id, Some(RequestId::from(3)));
                assert_eq!(error, BindError::NonStructured("number"));
            }
            other => panic!("expected params rejection, got {:?}", other.map(|c| c.id)),
        }

        let request =
            json!({"jsonrpc": "2.0", "id": 3, "method": "add", "params": [], "kwargs": [1]});
        assert!(matches!(
            validate(&request, &registry()),
            Err(Rejected::Params {
                error: BindError::KwargsNotObject("array"),
                ..
            })
        ));
    }

    #[test]
    fn test_valid_request() {
        let request = json!({
            "jsonrpc": "2.0", "id": "abc", "method": "add",
            "params": [1], "kwargs": {"b": 2}
        });
        let registry = registry();
        let ctx = validate(&request, &registry).unwrap();
        assert_eq!(ctx.entry.name, "add");
        assert_eq!(ctx.id, Some(RequestId::from("abc")));
        assert_eq!(ctx.supplied.positional, vec![json!(1)]);
        assert_eq!(ctx.supplied.keyword.get("b"), Some(&json!(2)));
    }

    #[test]
    fn test_null_id_and_params() {
        let request = json!({"jsonrpc": "2.0", "id": null, "method": "add", "params": null});
        let registry = registry();
        let ctx = validate(&request, &registry).unwrap();
        assert_eq!(ctx.id, None);
        assert!(ctx.supplied.positional.is_empty());
        assert!(ctx.supplied.keyword.is_empty());
    }
}
