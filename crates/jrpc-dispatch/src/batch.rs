//! Batch fan-out: one response per element, in input order.
//!
//! Elements run strictly one after another. Handlers may share state through
//! the bound context, so running them concurrently would lose ordering.

use std::future::Future;

use serde_json::Value;
use tracing::debug;

use crate::error::JsonRpcError;
use crate::response::{DispatchReply, JsonRpcMessage};

pub(crate) fn run_batch<F>(items: &[Value], handle: F) -> DispatchReply
where
    F: FnMut(&Value) -> JsonRpcMessage,
{
    if items.is_empty() {
        return empty_batch();
    }
    debug!(size = items.len(), "Processing batch");
    DispatchReply::Batch(items.iter().map(handle).collect())
}

/// Like [`run_batch`], yielding to the scheduler after every element.
pub(crate) async fn run_batch_async<'a, F, Fut>(items: &'a [Value], mut handle: F) -> DispatchReply
where
    F: FnMut(&'a Value) -> Fut,
    Fut: Future<Output = JsonRpcMessage>,
{
    if items.is_empty() {
        return empty_batch();
    }
    debug!(size = items.len(), "Processing batch");
    let mut responses = Vec::with_capacity(items.len());
    for item in items {
        responses.push(handle(item).await);
        tokio::task::yield_now().await;
    }
    DispatchReply::Batch(responses)
}

fn empty_batch() -> DispatchReply {
    debug!("Rejecting empty batch");
    DispatchReply::Single(JsonRpcError::invalid_request().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RequestId;
    use serde_json::json;

    fn echo(item: &Value) -> JsonRpcMessage {
        JsonRpcMessage::success(item.as_i64().map(RequestId::from), item.clone())
    }

    #[test]
    fn test_order_preserved() {
        let items = vec![json!(3), json!(1), json!(2)];
        let reply = run_batch(&items, echo);
        let ids: Vec<_> = reply
            .as_batch()
            .unwrap()
            .iter()
            .map(|m| m.id().cloned())
            .collect();
        assert_eq!(
            ids,
            vec![
                Some(RequestId::from(3)),
                Some(RequestId::from(1)),
                Some(RequestId::from(2))
            ]
        );
    }

    #[test]
    fn test_empty_batch_is_invalid_request() {
        let reply = run_batch(&[], echo);
        let message = reply.as_single().unwrap();
        assert_eq!(message.error_object().unwrap().message, "Invalid Request");
    }

    #[tokio::test]
    async fn test_async_order_preserved() {
        let items = vec![json!(1), json!(2)];
        let reply = run_batch_async(&items, |item| async move { echo(item) }).await;
        let results: Vec<_> = reply
            .as_batch()
            .unwrap()
            .iter()
            .map(|m| m.result().cloned())
            .collect();
        assert_eq!(results, vec![Some(json!(1)), Some(json!(2))]);
    }
}
