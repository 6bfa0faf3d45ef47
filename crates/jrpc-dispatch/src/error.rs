use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;

use crate::types::{JsonRpcVersion, RequestId};

/// JSON-RPC error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonRpcErrorCode {
    ParseError,
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    InternalError,
    ServerError(i64), // -32099 to -32000, or any code a handler chooses
}

impl JsonRpcErrorCode {
    pub fn code(&self) -> i64 {
        match self {
            JsonRpcErrorCode::ParseError => crate::error_codes::PARSE_ERROR,
            JsonRpcErrorCode::InvalidRequest => crate::error_codes::INVALID_REQUEST,
            JsonRpcErrorCode::MethodNotFound => crate::error_codes::METHOD_NOT_FOUND,
            JsonRpcErrorCode::InvalidParams => crate::error_codes::INVALID_PARAMS,
            JsonRpcErrorCode::InternalError => crate::error_codes::INTERNAL_ERROR,
            JsonRpcErrorCode::ServerError(code) => *code,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            JsonRpcErrorCode::ParseError => "Parse error",
            JsonRpcErrorCode::InvalidRequest => "Invalid Request",
            JsonRpcErrorCode::MethodNotFound => "Method not found",
            JsonRpcErrorCode::InvalidParams => "Invalid params",
            JsonRpcErrorCode::InternalError => "Internal error",
            JsonRpcErrorCode::ServerError(_) => "Server error",
        }
    }
}

impl fmt::Display for JsonRpcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

/// JSON-RPC Error object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl JsonRpcErrorObject {
    pub fn new(code: JsonRpcErrorCode, message: Option<String>, data: Option<Value>) -> Self {
        Self {
            code: code.code(),
            message: message.unwrap_or_else(|| code.message().to_string()),
            data,
        }
    }

    pub fn parse_error() -> Self {
        Self::new(JsonRpcErrorCode::ParseError, None, None)
    }

    pub fn invalid_request() -> Self {
        Self::new(JsonRpcErrorCode::InvalidRequest, None, None)
    }

    pub fn method_not_found() -> Self {
        Self::new(JsonRpcErrorCode::MethodNotFound, None, None)
    }

    /// Standard "Invalid params" object; `data` carries diagnostics in verbose mode.
    pub fn invalid_params(data: Option<Value>) -> Self {
        Self::new(JsonRpcErrorCode::InvalidParams, None, data)
    }

    /// Internal error, optionally with the raw failure message substituted in.
    pub fn internal_error(message: Option<String>, data: Option<Value>) -> Self {
        Self::new(JsonRpcErrorCode::InternalError, message, data)
    }

    /// Handler-defined error. Code and message are passed through verbatim.
    pub fn domain(code: i64, message: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            code,
            message: message.into(),
            data,
        }
    }
}

/// JSON-RPC Error response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonRpcError {
    #[serde(rename = "jsonrpc")]
    pub version: JsonRpcVersion,
    pub id: Option<RequestId>,
    pub error: JsonRpcErrorObject,
}

impl JsonRpcError {
    pub fn new(id: Option<RequestId>, error: JsonRpcErrorObject) -> Self {
        Self {
            version: JsonRpcVersion::V2_0,
            id,
            error,
        }
    }

    pub fn parse_error() -> Self {
        Self::new(None, JsonRpcErrorObject::parse_error())
    }

    pub fn invalid_request() -> Self {
        Self::new(None, JsonRpcErrorObject::invalid_request())
    }

    pub fn method_not_found(id: Option<RequestId>) -> Self {
        Self::new(id, JsonRpcErrorObject::method_not_found())
    }

    pub fn invalid_params(id: Option<RequestId>, data: Option<Value>) -> Self {
        Self::new(id, JsonRpcErrorObject::invalid_params(data))
    }

    pub fn internal_error(id: Option<RequestId>) -> Self {
        Self::new(id, JsonRpcErrorObject::internal_error(None, None))
    }
}

impl fmt::Display for JsonRpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "JSON-RPC Error {}: {}",
            self.error.code, self.error.message
        )
    }
}

impl std::error::Error for JsonRpcError {}

/// Mismatch between the arguments a request supplied and a method's signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    #[error("takes {expected} positional argument(s) but {given} were given")]
    TooManyPositional { expected: usize, given: usize },

    #[error("got an unexpected keyword argument '{0}'")]
    UnexpectedKeyword(String),

    #[error("got multiple values for argument '{0}'")]
    DuplicateArgument(String),

    #[error("missing required argument '{0}'")]
    Missing(String),

    #[error("argument '{name}' has the wrong type: {reason}")]
    TypeMismatch { name: String, reason: String },

    #[error("params must be an array or an object, got {0}")]
    NonStructured(&'static str),

    #[error("kwargs must be an object, got {0}")]
    KwargsNotObject(&'static str),
}

/// Error returned by a registered method.
///
/// `Domain` is the only variant whose content reaches the caller verbatim;
/// the others are normalised by the classifier.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MethodError {
    #[error("{message} ({code})")]
    Domain {
        code: i64,
        message: String,
        data: Option<Value>,
    },

    #[error("invalid params: {0}")]
    InvalidParams(#[from] BindError),

    #[error("{message}")]
    Internal {
        message: String,
        data: Option<Value>,
    },
}

impl MethodError {
    pub fn domain(code: i64, message: impl Into<String>) -> Self {
        MethodError::Domain {
            code,
            message: message.into(),
            data: None,
        }
    }

    /// Handler error in the server-reserved range (-32099..=-32000).
    pub fn server(code: i64, message: impl Into<String>) -> Self {
        debug_assert!(
            (crate::error_codes::SERVER_ERROR_START..=crate::error_codes::SERVER_ERROR_END)
                .contains(&code),
            "Server error code must be in range -32099 to -32000"
        );
        Self::domain(code, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        MethodError::Internal {
            message: message.into(),
            data: None,
        }
    }

    /// Attach `data` to a domain or internal error. No-op for `InvalidParams`.
    pub fn with_data(mut self, value: Value) -> Self {
        match &mut self {
            MethodError::Domain { data, .. } | MethodError::Internal { data, .. } => {
                *data = Some(value)
            }
            MethodError::InvalidParams(_) => {}
        }
        self
    }
}

pub type MethodResult = Result<Value, MethodError>;

/// Host-facing errors that never become JSON-RPC responses themselves.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("failed to serialize response: {0}")]
    Serialization(#[from] serde_json::Error),
}
