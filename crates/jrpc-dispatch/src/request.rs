use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::{JsonRpcVersion, RequestId};

/// Parameters for a JSON-RPC request
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum RequestParams {
    /// Positional parameters as an array
    Array(Vec<Value>),
    /// Named parameters as an object
    Object(Map<String, Value>),
}

impl RequestParams {
    /// Get a parameter by name (for object params only)
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            RequestParams::Object(map) => map.get(key),
            RequestParams::Array(_) => None,
        }
    }

    /// Get a parameter by index (for array params only)
    pub fn get_index(&self, index: usize) -> Option<&Value> {
        match self {
            RequestParams::Array(vec) => vec.get(index),
            RequestParams::Object(_) => None,
        }
    }

    /// Check if parameters are empty
    pub fn is_empty(&self) -> bool {
        match self {
            RequestParams::Object(map) => map.is_empty(),
            RequestParams::Array(vec) => vec.is_empty(),
        }
    }

    /// Split into the positional list and keyword map the binder works with.
    pub fn into_parts(self) -> (Vec<Value>, Map<String, Value>) {
        match self {
            RequestParams::Array(vec) => (vec, Map::new()),
            RequestParams::Object(map) => (Vec::new(), map),
        }
    }
}

impl From<Map<String, Value>> for RequestParams {
    fn from(map: Map<String, Value>) -> Self {
        RequestParams::Object(map)
    }
}

impl From<Vec<Value>> for RequestParams {
    fn from(vec: Vec<Value>) -> Self {
        RequestParams::Array(vec)
    }
}

impl From<RequestParams> for Value {
    fn from(params: RequestParams) -> Self {
        match params {
            RequestParams::Array(vec) => Value::Array(vec),
            RequestParams::Object(map) => Value::Object(map),
        }
    }
}

/// A JSON-RPC request as built by a caller.
///
/// The dispatcher never deserializes into this type; incoming envelopes are
/// validated field by field so that each failure maps onto the right error
/// code. It exists for hosts and tests that need to produce requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub id: Option<RequestId>,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<RequestParams>,
    /// Non-standard extension: extra keyword arguments alongside `params`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kwargs: Option<Map<String, Value>>,
}

impl JsonRpcRequest {
    pub fn new(id: impl Into<RequestId>, method: impl Into<String>) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            id: Some(id.into()),
            method: method.into(),
            params: None,
            kwargs: None,
        }
    }

    pub fn with_params(mut self, params: impl Into<RequestParams>) -> Self {
        self.params = Some(params.into());
        self
    }

    pub fn with_array_params(self, params: Vec<Value>) -> Self {
        self.with_params(RequestParams::Array(params))
    }

    pub fn with_object_params(self, params: Map<String, Value>) -> Self {
        self.with_params(RequestParams::Object(params))
    }

    pub fn with_kwargs(mut self, kwargs: Map<String, Value>) -> Self {
        self.kwargs = Some(kwargs);
        self
    }

    /// Get a parameter by name (if params are an object)
    pub fn get_param(&self, name: &str) -> Option<&Value> {
        self.params.as_ref()?.get(name)
    }

    /// Get a parameter by index (if params are an array)
    pub fn get_param_index(&self, index: usize) -> Option<&Value> {
        self.params.as_ref()?.get_index(index)
    }

    /// The request as a wire envelope. Built field by field, so it cannot fail.
    pub fn to_value(&self) -> Value {
        let mut envelope = Map::new();
        envelope.insert("jsonrpc".to_string(), Value::from(self.version.as_str()));
        envelope.insert(
            "id".to_string(),
            self.id.clone().map_or(Value::Null, Value::from),
        );
        envelope.insert("method".to_string(), Value::from(self.method.as_str()));
        if let Some(params) = &self.params {
            envelope.insert("params".to_string(), Value::from(params.clone()));
        }
        if let Some(kwargs) = &self.kwargs {
            envelope.insert("kwargs".to_string(), Value::Object(kwargs.clone()));
        }
        Value::Object(envelope)
    }
}

/// Input accepted by the dispatcher: raw request text or an already decoded value.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestInput {
    Text(String),
    Value(Value),
}

impl From<&str> for RequestInput {
    fn from(text: &str) -> Self {
        RequestInput::Text(text.to_string())
    }
}

impl From<String> for RequestInput {
    fn from(text: String) -> Self {
        RequestInput::Text(text)
    }
}

impl From<Value> for RequestInput {
    fn from(value: Value) -> Self {
        RequestInput::Value(value)
    }
}

impl From<JsonRpcRequest> for RequestInput {
    fn from(request: JsonRpcRequest) -> Self {
        RequestInput::Value(request.to_value())
    }
}

impl From<Vec<JsonRpcRequest>> for RequestInput {
    fn from(batch: Vec<JsonRpcRequest>) -> Self {
        RequestInput::Value(Value::Array(
            batch.iter().map(JsonRpcRequest::to_value).collect(),
        ))
    }
}
