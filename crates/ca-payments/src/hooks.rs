//! Caller-supplied hooks.
//!
//! Hooks are reference counted closures because one flow hands the same hook
//! to several places (the published vendor config and the fast path replay).

use std::fmt;
use std::future::Future;
use std::rc::Rc;

use ca_payments_core::{DataUpdateReply, UpdatedData};
use futures::future::{FutureExt, LocalBoxFuture};

/// A notification without payload (e.g. "modal about to open").
pub type Hook = Rc<dyn Fn()>;

/// A notification carrying an opaque vendor payload.
pub type ValueHook = Rc<dyn Fn(serde_json::Value)>;

/// Data-update hook.
///
/// Returning `None` tells the widget nothing changed; returning a future
/// makes the widget wait for the recalculated amounts.
pub type OnDataUpdate = Rc<dyn Fn(UpdatedData) -> Option<LocalBoxFuture<'static, DataUpdateReply>>>;

/// Wrap a closure as a [`Hook`].
pub fn hook(f: impl Fn() + 'static) -> Hook {
    Rc::new(f)
}

/// Wrap a closure as a [`ValueHook`].
pub fn value_hook(f: impl Fn(serde_json::Value) + 'static) -> ValueHook {
    Rc::new(f)
}

/// Wrap an async closure as an [`OnDataUpdate`] hook that always replies.
pub fn data_update_async<F, Fut>(f: F) -> OnDataUpdate
where
    F: Fn(UpdatedData) -> Fut + 'static,
    Fut: Future<Output = DataUpdateReply> + 'static,
{
    Rc::new(move |data| Some(f(data).boxed_local()))
}

/// Wrap a synchronous closure as an [`OnDataUpdate`] hook that never replies
/// with data.
pub fn data_update_sync(f: impl Fn(UpdatedData) + 'static) -> OnDataUpdate {
    Rc::new(move |data| {
        f(data);
        None
    })
}

/// Optional hooks shared by every flow kind.
#[derive(Clone, Default)]
pub struct FlowHooks {
    /// Fires just before the modal is displayed, on first load and on reuse.
    pub on_modal_open: Option<Hook>,
    /// Fires when the consumer confirms the loan.
    pub on_confirm: Option<ValueHook>,
    /// Fires when the application's approval status changes.
    pub on_approval_status_change: Option<ValueHook>,
}

impl fmt::Debug for FlowHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowHooks")
            .field("on_modal_open", &self.on_modal_open.is_some())
            .field("on_confirm", &self.on_confirm.is_some())
            .field(
                "on_approval_status_change",
                &self.on_approval_status_change.is_some(),
            )
            .finish()
    }
}
