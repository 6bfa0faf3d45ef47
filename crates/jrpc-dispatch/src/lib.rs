//! # JSON-RPC 2.0 Dispatcher
//!
//! A transport-agnostic JSON-RPC 2.0 request dispatcher. Give it request text
//! or an already decoded value and it validates the envelope, resolves the
//! method, binds the parameters to the method's declared signature, invokes
//! it and returns a JSON-RPC 2.0 response (or an array of them for batches).
//!
//! ## Features
//! - Positional (`[..]`) and named (`{..}`) params, plus a non-standard
//!   `kwargs` sibling object for mixed positional + keyword calls
//! - Blocking and suspension-aware execution sharing one validation path
//! - Batches processed in order with per-element error isolation
//! - Handler panics and failures never escape as host faults
//!
//! ```rust
//! use jrpc_dispatch::prelude::*;
//! use serde_json::json;
//!
//! let dispatcher = JsonRpcDispatcher::builder()
//!     .method("add", Signature::required(["a", "b"]), |_, args| {
//!         Ok(json!(args.get::<i64>("a")? + args.get::<i64>("b")?))
//!     })
//!     .build();
//!
//! let reply = dispatcher.dispatch(r#"{"jsonrpc": "2.0", "method": "add", "params": [1, 2], "id": 1}"#);
//! assert_eq!(reply.as_single().and_then(|m| m.result()), Some(&json!(3)));
//! ```

pub mod batch;
pub mod binder;
pub mod classify;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod parser;
pub mod prelude;
pub mod registry;
pub mod request;
pub mod response;
pub mod types;
pub mod validator;

// Re-export main types
pub use binder::{Args, Signature, SuppliedArgs};
pub use classify::Invocation;
pub use config::DispatcherConfig;
pub use dispatcher::{JsonRpcDispatcher, JsonRpcDispatcherBuilder};
pub use error::{
    BindError, DispatchError, JsonRpcError, JsonRpcErrorCode, JsonRpcErrorObject, MethodError,
    MethodResult,
};
pub use registry::{
    ApiDescription, AsyncMethod, MethodDescription, MethodEntry, MethodHandler, MethodRegistry,
    SyncMethod,
};
pub use request::{JsonRpcRequest, RequestInput, RequestParams};
pub use response::{DispatchOutput, DispatchReply, JsonRpcMessage, JsonRpcResponse};
pub use types::{JsonRpcVersion, RequestId};

/// JSON-RPC 2.0 version constant
pub const JSONRPC_VERSION: &str = "2.0";

/// Standard JSON-RPC 2.0 error codes
pub mod error_codes {
    pub const PARSE_ERROR: i64 = -32700;
    pub const INVALID_REQUEST: i64 = -32600;
    pub const METHOD_NOT_FOUND: i64 = -32601;
    pub const INVALID_PARAMS: i64 = -32602;
    pub const INTERNAL_ERROR: i64 = -32603;

    // Server error range: -32099 to -32000
    pub const SERVER_ERROR_START: i64 = -32099;
    pub const SERVER_ERROR_END: i64 = -32000;
}
