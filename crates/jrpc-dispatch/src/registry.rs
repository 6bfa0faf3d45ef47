//! Method registry: name → handler, signature and optional documentation.
//!
//! Populated through [`JsonRpcDispatcherBuilder`](crate::JsonRpcDispatcherBuilder)
//! and read-only once the dispatcher is built.

use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::binder::{Args, Signature};
use crate::dispatcher::JsonRpcDispatcher;
use crate::error::MethodResult;

/// A method that completes without suspending.
///
/// The first argument is the bound context: the dispatcher handling the
/// call, through which the configured context value is reachable.
pub trait SyncMethod<S>: Send + Sync {
    fn call(&self, ctx: &JsonRpcDispatcher<S>, args: Args) -> MethodResult;
}

impl<S, F> SyncMethod<S> for F
where
    F: Fn(&JsonRpcDispatcher<S>, Args) -> MethodResult + Send + Sync,
{
    fn call(&self, ctx: &JsonRpcDispatcher<S>, args: Args) -> MethodResult {
        (self)(ctx, args)
    }
}

/// A method that may suspend once while it runs.
#[async_trait]
pub trait AsyncMethod<S>: Send + Sync {
    async fn call(&self, ctx: JsonRpcDispatcher<S>, args: Args) -> MethodResult;
}

#[async_trait]
impl<S, F, Fut> AsyncMethod<S> for F
where
    S: Send + Sync + 'static,
    F: Fn(JsonRpcDispatcher<S>, Args) -> Fut + Send + Sync,
    Fut: Future<Output = MethodResult> + Send + 'static,
{
    async fn call(&self, ctx: JsonRpcDispatcher<S>, args: Args) -> MethodResult {
        (self)(ctx, args).await
    }
}

/// Handler plus its execution capability, fixed at registration time.
pub enum MethodHandler<S> {
    Sync(Arc<dyn SyncMethod<S>>),
    Suspendable(Arc<dyn AsyncMethod<S>>),
}

impl<S> MethodHandler<S> {
    pub fn is_suspendable(&self) -> bool {
        matches!(self, MethodHandler::Suspendable(_))
    }
}

impl<S> Clone for MethodHandler<S> {
    fn clone(&self) -> Self {
        match self {
            MethodHandler::Sync(handler) => MethodHandler::Sync(handler.clone()),
            MethodHandler::Suspendable(handler) => MethodHandler::Suspendable(handler.clone()),
        }
    }
}

impl<S> std::fmt::Debug for MethodHandler<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MethodHandler::Sync(_) => f.write_str("MethodHandler::Sync"),
            MethodHandler::Suspendable(_) => f.write_str("MethodHandler::Suspendable"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MethodEntry<S> {
    pub name: String,
    pub signature: Signature,
    pub handler: MethodHandler<S>,
    pub doc: Option<String>,
}

pub struct MethodRegistry<S> {
    methods: HashMap<String, MethodEntry<S>>,
}

impl<S> MethodRegistry<S> {
    pub fn new() -> Self {
        Self {
            methods: HashMap::new(),
        }
    }

    /// Register a handler under `name`, replacing any previous entry.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        signature: Signature,
        handler: MethodHandler<S>,
        doc: Option<String>,
    ) {
        let name = name.into();
        let entry = MethodEntry {
            name: name.clone(),
            signature,
            handler,
            doc,
        };
        if self.methods.insert(name.clone(), entry).is_some() {
            warn!(method = %name, "Replacing previously registered method");
        }
    }

    /// Attach documentation to a registered method. Returns false if unknown.
    pub fn set_doc(&mut self, name: &str, doc: impl Into<String>) -> bool {
        match self.methods.get_mut(name) {
            Some(entry) => {
                entry.doc = Some(doc.into());
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<&MethodEntry<S>> {
        self.methods.get(name)
    }

    /// Registered method names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.methods.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.methods.len()
    }

    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Self-description: `api_version` is reported only when non-zero.
    pub fn describe(&self, api_version: u32) -> ApiDescription {
        ApiDescription {
            api_version: (api_version > 0).then_some(api_version),
            methods: self
                .methods
                .values()
                .map(|entry| {
                    (
                        entry.name.clone(),
                        MethodDescription {
                            doc: entry.doc.clone(),
                        },
                    )
                })
                .collect(),
        }
    }
}

impl<S> Default for MethodRegistry<S> {
    fn default() -> Self {
        Self::new()
    }
}

/// Informational listing of the registered API. Not consumed by dispatch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiDescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_version: Option<u32>,
    pub methods: BTreeMap<String, MethodDescription>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodDescription {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}
