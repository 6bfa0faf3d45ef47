//! Request dispatch: validation, binding, invocation and response assembly.
//!
//! [`JsonRpcDispatcher::handle`] runs everything on the calling thread.
//! [`JsonRpcDispatcher::handle_async`] shares the same validation and binding
//! but awaits suspendable handlers at their single suspension point. Neither
//! path spawns tasks or takes locks.

use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use futures::FutureExt;
use serde_json::Value;
use tracing::{debug, error, warn};

use crate::batch::{run_batch, run_batch_async};
use crate::binder::{Args, Signature};
use crate::classify::{Invocation, classify};
use crate::config::DispatcherConfig;
use crate::error::MethodResult;
use crate::parser::parse_request;
use crate::registry::{ApiDescription, MethodEntry, MethodHandler, MethodRegistry};
use crate::request::RequestInput;
use crate::response::{DispatchOutput, DispatchReply, JsonRpcMessage};
use crate::validator::{CallContext, Rejected, validate};

/// Sent when a reply cannot be serialized in text mode.
const INTERNAL_ERROR_TEXT: &str =
    r#"{"jsonrpc":"2.0","id":null,"error":{"code":-32603,"message":"Internal error"}}"#;

struct DispatcherInner<S> {
    registry: MethodRegistry<S>,
    config: DispatcherConfig,
    context: S,
}

/// JSON-RPC 2.0 dispatcher.
///
/// A cheap handle around immutable state. Every handler receives the
/// dispatcher that is serving the call as its first argument; the context
/// value given to [`JsonRpcDispatcher::builder_with_context`] is reachable
/// through [`JsonRpcDispatcher::context`].
pub struct JsonRpcDispatcher<S = ()> {
    inner: Arc<DispatcherInner<S>>,
}

impl<S> Clone for JsonRpcDispatcher<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl JsonRpcDispatcher<()> {
    pub fn builder() -> JsonRpcDispatcherBuilder<()> {
        JsonRpcDispatcherBuilder::new(())
    }
}

impl<S> JsonRpcDispatcher<S> {
    /// The context value handlers share.
    pub fn context(&self) -> &S {
        &self.inner.context
    }

    pub fn config(&self) -> &DispatcherConfig {
        &self.inner.config
    }

    pub fn registry(&self) -> &MethodRegistry<S> {
        &self.inner.registry
    }

    /// Get all registered methods
    pub fn registered_methods(&self) -> Vec<&str> {
        self.inner.registry.names()
    }

    pub fn describe(&self) -> ApiDescription {
        self.inner.registry.describe(self.inner.config.api_version)
    }
}

impl<S> JsonRpcDispatcher<S>
where
    S: Send + Sync + 'static,
{
    pub fn builder_with_context(context: S) -> JsonRpcDispatcherBuilder<S> {
        JsonRpcDispatcherBuilder::new(context)
    }

    /// Blocking path. Suspendable handlers are driven to completion on the
    /// calling thread, so do not call this from inside an async task.
    ///
    /// No tokio runtime is entered here. A suspendable handler that needs the
    /// tokio reactor (timers, sockets) only works when the calling thread
    /// already carries a runtime context, as `spawn_blocking` threads do;
    /// otherwise it panics and the call answers "Internal error".
    pub fn handle(&self, input: impl Into<RequestInput>) -> DispatchOutput {
        self.render(self.dispatch(input))
    }

    /// Blocking path, always returning the structured reply. Same runtime
    /// caveats as [`JsonRpcDispatcher::handle`].
    pub fn dispatch(&self, input: impl Into<RequestInput>) -> DispatchReply {
        match parse_request(input.into()) {
            Err(error) => DispatchReply::Single(error.into()),
            Ok(Value::Array(items)) => run_batch(&items, |item| self.handle_request(item)),
            Ok(request) => DispatchReply::Single(self.handle_request(&request)),
        }
    }

    /// Handle one decoded request envelope (a single batch element).
    pub fn handle_request(&self, request: &Value) -> JsonRpcMessage {
        let ctx = match validate(request, &self.inner.registry) {
            Ok(ctx) => ctx,
            Err(rejected) => return self.reject(rejected),
        };
        let id = ctx.id.clone();
        let invocation = match bind(ctx) {
            Ok((entry, args)) => self.invoke_blocking(entry, args),
            Err(invocation) => invocation,
        };
        classify(invocation, id, &self.inner.config)
    }

    /// Suspension-aware path.
    pub async fn handle_async(&self, input: impl Into<RequestInput>) -> DispatchOutput {
        let reply = self.dispatch_async(input).await;
        self.render(reply)
    }

    /// Suspension-aware path, always returning the structured reply.
    pub async fn dispatch_async(&self, input: impl Into<RequestInput>) -> DispatchReply {
        match parse_request(input.into()) {
            Err(error) => DispatchReply::Single(error.into()),
            Ok(Value::Array(items)) => {
                run_batch_async(&items, |item| self.handle_request_async(item)).await
            }
            Ok(request) => DispatchReply::Single(self.handle_request_async(&request).await),
        }
    }

    /// Suspension-aware handling of one decoded request envelope.
    pub async fn handle_request_async(&self, request: &Value) -> JsonRpcMessage {
        let ctx = match validate(request, &self.inner.registry) {
            Ok(ctx) => ctx,
            Err(rejected) => return self.reject(rejected),
        };
        let id = ctx.id.clone();
        let invocation = match bind(ctx) {
            Ok((entry, args)) => self.invoke_async(entry, args).await,
            Err(invocation) => invocation,
        };
        classify(invocation, id, &self.inner.config)
    }

    fn invoke_blocking(&self, entry: &MethodEntry<S>, args: Args) -> Invocation {
        debug!(method = %entry.name, suspendable = entry.handler.is_suspendable(), "Invoking method");
        let outcome = match &entry.handler {
            MethodHandler::Sync(method) => {
                panic::catch_unwind(AssertUnwindSafe(|| method.call(self, args)))
            }
            MethodHandler::Suspendable(method) => {
                let call = method.call(self.clone(), args);
                panic::catch_unwind(AssertUnwindSafe(|| futures::executor::block_on(call)))
            }
        };
        outcome.map_or_else(Invocation::from_panic, Invocation::from)
    }

    async fn invoke_async(&self, entry: &MethodEntry<S>, args: Args) -> Invocation {
        debug!(method = %entry.name, suspendable = entry.handler.is_suspendable(), "Invoking method");
        let outcome = match &entry.handler {
            MethodHandler::Sync(method) => {
                panic::catch_unwind(AssertUnwindSafe(|| method.call(self, args)))
            }
            MethodHandler::Suspendable(method) => {
                AssertUnwindSafe(method.call(self.clone(), args))
                    .catch_unwind()
                    .await
            }
        };
        outcome.map_or_else(Invocation::from_panic, Invocation::from)
    }

    fn reject(&self, rejected: Rejected) -> JsonRpcMessage {
        match rejected {
            Rejected::Envelope(error) => error.into(),
            Rejected::Params { id, error } => {
                classify(Invocation::BindError(error), id, &self.inner.config)
            }
        }
    }

    fn render(&self, reply: DispatchReply) -> DispatchOutput {
        if !self.inner.config.serialize_output {
            return DispatchOutput::Structured(reply);
        }
        match reply.to_json_string() {
            Ok(text) => DispatchOutput::Text(text),
            Err(e) => {
                error!(error = %e, "Failed to serialize reply");
                DispatchOutput::Text(INTERNAL_ERROR_TEXT.to_string())
            }
        }
    }
}

/// Match the supplied arguments against the method's declared slots.
fn bind<S>(ctx: CallContext<'_, S>) -> Result<(&MethodEntry<S>, Args), Invocation> {
    let CallContext {
        entry, supplied, ..
    } = ctx;
    entry
        .signature
        .bind(supplied)
        .map(|args| (entry, args))
        .map_err(Invocation::BindError)
}

/// Builder for [`JsonRpcDispatcher`]. Registration happens here, before any
/// request is served.
pub struct JsonRpcDispatcherBuilder<S> {
    registry: MethodRegistry<S>,
    config: DispatcherConfig,
    context: S,
}

impl<S> JsonRpcDispatcherBuilder<S>
where
    S: Send + Sync + 'static,
{
    pub fn new(context: S) -> Self {
        Self {
            registry: MethodRegistry::new(),
            config: DispatcherConfig::default(),
            context,
        }
    }

    /// Register a method that runs to completion without suspending.
    pub fn method<F>(self, name: impl Into<String>, signature: Signature, method: F) -> Self
    where
        F: Fn(&JsonRpcDispatcher<S>, Args) -> MethodResult + Send + Sync + 'static,
    {
        self.handler(name, signature, MethodHandler::Sync(Arc::new(method)))
    }

    /// Register a method that may suspend once while it runs.
    pub fn async_method<F, Fut>(
        self,
        name: impl Into<String>,
        signature: Signature,
        method: F,
    ) -> Self
    where
        F: Fn(JsonRpcDispatcher<S>, Args) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = MethodResult> + Send + 'static,
    {
        self.handler(name, signature, MethodHandler::Suspendable(Arc::new(method)))
    }

    /// Register an already constructed handler.
    pub fn handler(
        mut self,
        name: impl Into<String>,
        signature: Signature,
        handler: MethodHandler<S>,
    ) -> Self {
        self.registry.register(name, signature, handler, None);
        self
    }

    /// Document a registered method for `describe()`.
    pub fn doc(mut self, name: &str, doc: impl Into<String>) -> Self {
        if !self.registry.set_doc(name, doc) {
            warn!(method = name, "Ignoring documentation for unregistered method");
        }
        self
    }

    pub fn config(mut self, config: DispatcherConfig) -> Self {
        self.config = config;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.config.verbose = verbose;
        self
    }

    pub fn serialize_output(mut self, serialize_output: bool) -> Self {
        self.config.serialize_output = serialize_output;
        self
    }

    pub fn api_version(mut self, api_version: u32) -> Self {
        self.config.api_version = api_version;
        self
    }

    pub fn build(self) -> JsonRpcDispatcher<S> {
        debug!(methods = self.registry.len(), config = ?self.config, "Building dispatcher");
        JsonRpcDispatcher {
            inner: Arc::new(DispatcherInner {
                registry: self.registry,
                config: self.config,
                context: self.context,
            }),
        }
    }
}
