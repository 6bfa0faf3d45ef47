//! Invocation outcome → response.
//!
//! Owns the id policy: "Method not found" and domain errors always echo the
//! request id, "Invalid params" and "Internal error" only do so in verbose
//! mode.

use std::any::Any;

use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::config::DispatcherConfig;
use crate::error::{BindError, JsonRpcError, JsonRpcErrorObject, MethodError, MethodResult};
use crate::response::JsonRpcMessage;
use crate::types::RequestId;

/// Outcome of binding and invoking one method.
#[derive(Debug, Clone, PartialEq)]
pub enum Invocation {
    Success(Value),
    BindError(BindError),
    DomainError {
        code: i64,
        message: String,
        data: Option<Value>,
    },
    OtherFailure {
        message: String,
        data: Option<Value>,
    },
}

impl Invocation {
    /// Outcome of a handler that panicked instead of returning.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "handler panicked".to_string());
        Invocation::OtherFailure {
            message,
            data: None,
        }
    }
}

impl From<MethodResult> for Invocation {
    fn from(result: MethodResult) -> Self {
        match result {
            Ok(value) => Invocation::Success(value),
            Err(MethodError::Domain {
                code,
                message,
                data,
            }) => Invocation::DomainError {
                code,
                message,
                data,
            },
            Err(MethodError::InvalidParams(error)) => Invocation::BindError(error),
            Err(MethodError::Internal { message, data }) => {
                Invocation::OtherFailure { message, data }
            }
        }
    }
}

/// Build the response for an invocation outcome.
pub fn classify(
    invocation: Invocation,
    id: Option<RequestId>,
    config: &DispatcherConfig,
) -> JsonRpcMessage {
    match invocation {
        Invocation::Success(result) => JsonRpcMessage::success(id, result),
        Invocation::BindError(error) => {
            debug!(id = ?id, error = %error, "Invalid params");
            if config.verbose {
                JsonRpcError::invalid_params(id, Some(json!(error.to_string()))).into()
            } else {
                JsonRpcError::invalid_params(None, None).into()
            }
        }
        Invocation::DomainError {
            code,
            message,
            data,
        } => {
            debug!(id = ?id, code, message = %message, "Handler returned a domain error");
            JsonRpcError::new(id, JsonRpcErrorObject::domain(code, message, data)).into()
        }
        Invocation::OtherFailure { message, data } => {
            warn!(id = ?id, error = %message, "Handler failed");
            if config.verbose {
                JsonRpcError::new(id, JsonRpcErrorObject::internal_error(Some(message), data))
                    .into()
            } else {
                JsonRpcError::internal_error(None).into()
            }
        }
    }
}
