//! Adapters between the SDK's positional callbacks and the flow future.

use std::fmt;

use ca_payments_core::{CallbackStatus, DataUpdateReply, FlowId, PaymentsError, UpdatedData};
use futures::channel::mpsc;
use futures::future::{FutureExt, LocalBoxFuture};
use serde_json::Value;

use crate::completion::Completer;
use crate::hooks::OnDataUpdate;
use crate::vendor::FlowKind;

/// Raw success payload of a flow, before it is decoded into a typed result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlowOutcome {
    /// Post-sale token (checkout only).
    pub token: Option<String>,
    /// Completion data as sent by the SDK.
    pub data: Option<Value>,
}

/// The terminal callback attached to every presented flow.
///
/// The SDK calls it once per flow, either with an error status or with the
/// completion data. Only the first call settles the flow.
#[derive(Clone)]
pub struct TerminalCallback {
    flow: FlowKind,
    flow_id: FlowId,
    completer: Completer<FlowOutcome>,
}

impl TerminalCallback {
    pub(crate) fn new(flow: FlowKind, flow_id: FlowId, completer: Completer<FlowOutcome>) -> Self {
        Self {
            flow,
            flow_id,
            completer,
        }
    }

    /// Flow this callback settles.
    #[must_use]
    pub fn flow(&self) -> FlowKind {
        self.flow
    }

    /// `(data, error)` shape used by the apply and identify flows.
    pub fn call(&self, data: Option<Value>, error: Option<CallbackStatus>) {
        self.settle(None, data, error);
    }

    /// `(token, data, error)` shape used by the checkout flow.
    pub fn call_with_token(
        &self,
        token: Option<String>,
        data: Option<Value>,
        error: Option<CallbackStatus>,
    ) {
        self.settle(token, data, error);
    }

    /// Whether the flow has already been settled.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.completer.is_settled()
    }

    fn settle(&self, token: Option<String>, data: Option<Value>, error: Option<CallbackStatus>) {
        let result = match error {
            Some(status) => {
                tracing::info!(
                    flow = %self.flow,
                    flow_id = %self.flow_id,
                    code = %status.code,
                    message = %status.message,
                    "payments status"
                );
                Err(PaymentsError::flow(status, data))
            }
            None => Ok(FlowOutcome { token, data }),
        };

        if !self.completer.complete(result) {
            tracing::warn!(
                flow = %self.flow,
                flow_id = %self.flow_id,
                "terminal callback invoked after the flow settled; ignoring"
            );
        }
    }
}

impl fmt::Debug for TerminalCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalCallback")
            .field("flow", &self.flow)
            .field("flow_id", &self.flow_id)
            .field("settled", &self.is_settled())
            .finish()
    }
}

/// Continuation the SDK passes along with a data update.
pub type Continuation = Box<dyn FnOnce(Value)>;

/// Pending continuation work, driven by the flow future.
pub(crate) type PendingUpdate = LocalBoxFuture<'static, ()>;

/// Bridges the SDK's `onDataUpdate(updatedData, callback)` to an optionally
/// asynchronous caller hook.
///
/// The continuation is called exactly once per update: immediately with `{}`
/// when the hook returns nothing, or with the hook's reply once its future
/// resolves.
#[derive(Clone)]
pub struct DataUpdateAdapter {
    flow_id: FlowId,
    hook: OnDataUpdate,
    pending: mpsc::UnboundedSender<PendingUpdate>,
}

impl DataUpdateAdapter {
    pub(crate) fn new(
        flow_id: FlowId,
        hook: OnDataUpdate,
        pending: mpsc::UnboundedSender<PendingUpdate>,
    ) -> Self {
        Self {
            flow_id,
            hook,
            pending,
        }
    }

    /// Handle one data update from the SDK.
    ///
    /// The hook always runs. Fields that do not decode are left at their
    /// defaults; a payload that is not an object at all reaches the hook as
    /// an empty update.
    pub fn call(&self, updated: Value, continuation: Continuation) {
        let data = serde_json::from_value::<UpdatedData>(updated).unwrap_or_else(|err| {
            tracing::warn!(
                flow_id = %self.flow_id,
                error = %err,
                "data update from payments SDK is not an object; passing an empty update"
            );
            UpdatedData::default()
        });

        let Some(reply) = (self.hook)(data) else {
            continuation(empty_reply());
            return;
        };

        let task = async move {
            let reply = reply.await;
            continuation(reply_value(&reply));
        }
        .boxed_local();

        if self.pending.unbounded_send(task).is_err() {
            tracing::warn!(
                flow_id = %self.flow_id,
                "data update arrived after the flow settled; dropping it"
            );
        }
    }
}

impl fmt::Debug for DataUpdateAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataUpdateAdapter")
            .field("flow_id", &self.flow_id)
            .finish_non_exhaustive()
    }
}

fn empty_reply() -> Value {
    Value::Object(serde_json::Map::new())
}

fn reply_value(reply: &DataUpdateReply) -> Value {
    serde_json::to_value(reply).unwrap_or_else(|_| empty_reply())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion;
    use crate::hooks::{data_update_async, data_update_sync};
    use ca_payments_core::StatusCode;
    use futures::executor::block_on;
    use futures::StreamExt;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn recorder() -> (Rc<RefCell<Vec<Value>>>, impl Fn() -> Continuation) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let sink = calls.clone();
        let make = move || {
            let sink = sink.clone();
            Box::new(move |value| sink.borrow_mut().push(value)) as Continuation
        };
        (calls, make)
    }

    #[test]
    fn checkout_success_carries_token() {
        let (completer, completion) = completion::channel();
        let callback = TerminalCallback::new(FlowKind::Checkout, FlowId::generate(), completer);
        callback.call_with_token(Some("tok1".into()), Some(json!({"totalAmount": 100})), None);
        let outcome = block_on(completion).unwrap();
        assert_eq!(outcome.token.as_deref(), Some("tok1"));
        assert_eq!(outcome.data, Some(json!({"totalAmount": 100})));
    }

    #[test]
    fn error_status_rejects_with_partial_data() {
        let (completer, completion) = completion::channel();
        let callback = TerminalCallback::new(FlowKind::Apply, FlowId::generate(), completer);
        callback.call(
            Some(json!({"step": "offers"})),
            Some(CallbackStatus::new("GENERAL", "boom")),
        );
        let err = block_on(completion).unwrap_err();
        assert_eq!(err.status_code(), Some(&StatusCode::General));
        assert_eq!(
            err,
            PaymentsError::Flow {
                code: StatusCode::General,
                message: "boom".into(),
                data: Some(json!({"step": "offers"})),
            }
        );
    }

    #[test]
    fn second_invocation_is_ignored() {
        let (completer, completion) = completion::channel();
        let callback = TerminalCallback::new(FlowKind::Apply, FlowId::generate(), completer);
        callback.call(Some(json!({"token": "a"})), None);
        callback.call(None, Some(CallbackStatus::new("GENERAL", "late")));
        assert!(callback.is_settled());
        assert_eq!(block_on(completion).unwrap().data, Some(json!({"token": "a"})));
    }

    #[test]
    fn sync_hook_continues_immediately_with_empty_object() {
        let (tx, _rx) = mpsc::unbounded();
        let seen = Rc::new(RefCell::new(None));
        let sink = seen.clone();
        let adapter = DataUpdateAdapter::new(
            FlowId::generate(),
            data_update_sync(move |data| *sink.borrow_mut() = Some(data.total_amount)),
            tx,
        );
        let (calls, continuation) = recorder();

        adapter.call(json!({"totalAmount": 42.0}), continuation());

        assert_eq!(*seen.borrow(), Some(42.0));
        assert_eq!(*calls.borrow(), vec![json!({})]);
    }

    #[test]
    fn async_hook_continues_with_reply_once_resolved() {
        let (tx, mut rx) = mpsc::unbounded();
        let adapter = DataUpdateAdapter::new(
            FlowId::generate(),
            data_update_async(|data: UpdatedData| async move {
                DataUpdateReply {
                    total_amount: Some(data.total_amount + 10.0),
                    ..DataUpdateReply::default()
                }
            }),
            tx,
        );
        let (calls, continuation) = recorder();

        adapter.call(json!({"totalAmount": 90.0}), continuation());
        assert!(calls.borrow().is_empty());

        let task = block_on(rx.next()).unwrap();
        block_on(task);
        assert_eq!(*calls.borrow(), vec![json!({"totalAmount": 100.0})]);
    }

    #[test]
    fn partial_update_still_reaches_hook() {
        let (tx, _rx) = mpsc::unbounded();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let adapter = DataUpdateAdapter::new(
            FlowId::generate(),
            data_update_sync(move |data| sink.borrow_mut().push(data)),
            tx,
        );
        let (calls, continuation) = recorder();

        // No sku, a null tax amount and a list where an object is expected.
        adapter.call(
            json!({
                "totalAmount": 120,
                "taxAmount": null,
                "items": [{ "name": "Sofa", "price": 100, "quantity": 1 }],
                "discounts": "none"
            }),
            continuation(),
        );

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].total_amount, 120.0);
        assert_eq!(seen[0].tax_amount, 0.0);
        assert_eq!(seen[0].items[0].name, "Sofa");
        assert_eq!(seen[0].items[0].sku, "");
        assert!(seen[0].discounts.is_empty());
        assert_eq!(*calls.borrow(), vec![json!({})]);
    }

    #[test]
    fn non_object_update_reaches_hook_as_empty_update() {
        let (tx, _rx) = mpsc::unbounded();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        let adapter = DataUpdateAdapter::new(
            FlowId::generate(),
            data_update_sync(move |data| sink.borrow_mut().push(data)),
            tx,
        );
        let (calls, continuation) = recorder();

        adapter.call(json!("not-an-object"), continuation());

        assert_eq!(*seen.borrow(), vec![UpdatedData::default()]);
        assert_eq!(*calls.borrow(), vec![json!({})]);
    }
}
