//! # JSON-RPC Dispatcher Prelude
//!
//! Convenient re-exports of the types needed to register methods and
//! dispatch requests.
//!
//! ```rust
//! use jrpc_dispatch::prelude::*;
//! ```

pub use crate::binder::{Args, Signature};
pub use crate::config::DispatcherConfig;
pub use crate::dispatcher::{JsonRpcDispatcher, JsonRpcDispatcherBuilder};
pub use crate::error::{BindError, JsonRpcError, JsonRpcErrorObject, MethodError, MethodResult};
pub use crate::registry::{ApiDescription, AsyncMethod, MethodHandler, SyncMethod};
pub use crate::request::{JsonRpcRequest, RequestInput, RequestParams};
pub use crate::response::{DispatchOutput, DispatchReply, JsonRpcMessage};
pub use crate::types::RequestId;

// Standard error codes
pub use crate::error_codes::*;
