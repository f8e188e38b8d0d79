//! Single-settlement completion source.
//!
//! A [`Completer`] can be cloned and handed to callback code; the first call
//! to [`Completer::complete`] settles the paired [`Completion`], later calls
//! are rejected. If every completer is dropped without settling, the
//! completion resolves to [`PaymentsError::Abandoned`].

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use ca_payments_core::{PaymentsError, Result};
use futures::channel::oneshot;
use futures::future::FusedFuture;

/// Create a connected completer/completion pair.
#[must_use]
pub fn channel<T>() -> (Completer<T>, Completion<T>) {
    let (tx, rx) = oneshot::channel();
    (
        Completer {
            slot: Rc::new(RefCell::new(Some(tx))),
        },
        Completion { rx, done: false },
    )
}

/// Settling side.
pub struct Completer<T> {
    slot: Rc<RefCell<Option<oneshot::Sender<Result<T>>>>>,
}

impl<T> Clone for Completer<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T> Completer<T> {
    /// Settle the completion. Returns `false` if it was already settled.
    pub fn complete(&self, result: Result<T>) -> bool {
        let Some(tx) = self.slot.borrow_mut().take() else {
            return false;
        };
        // The receiver may be gone if the caller stopped waiting; the
        // completion still counts as settled.
        let _ = tx.send(result);
        true
    }

    /// Whether the completion has been settled.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.slot.borrow().is_none()
    }
}

/// Waiting side.
#[must_use = "a completion does nothing unless awaited"]
pub struct Completion<T> {
    rx: oneshot::Receiver<Result<T>>,
    // The receiver reports itself terminated as soon as the sender is
    // dropped, before the cancellation has been observed. Termination here
    // means this future has yielded its output.
    done: bool,
}

impl<T> Future for Completion<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let result = match Pin::new(&mut self.rx).poll(cx) {
            Poll::Ready(Ok(result)) => result,
            Poll::Ready(Err(oneshot::Canceled)) => Err(PaymentsError::Abandoned),
            Poll::Pending => return Poll::Pending,
        };
        self.done = true;
        Poll::Ready(result)
    }
}

impl<T> FusedFuture for Completion<T> {
    fn is_terminated(&self) -> bool {
        self.done
    }
}
