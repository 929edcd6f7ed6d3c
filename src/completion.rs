use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use futures::channel::oneshot;

/// Promise-like handle returned by `entry()`/`leave()`/`toggle()`.
///
/// Resolves once when the driving tween reaches progress 1. A transition
/// rejected by the mutual-exclusion guard returns an already-resolved handle.
/// A transition killed by `stop_timeline_if_active()` or `destroy()` never
/// settles; callers that care must bring their own timeout.
#[derive(Debug)]
pub struct Completion {
    state: State,
}

#[derive(Debug)]
enum State {
    Resolved,
    Waiting(oneshot::Receiver<()>),
    Cancelled,
}

impl Completion {
    /// A handle that is already complete.
    pub(crate) fn resolved() -> Self {
        Self {
            state: State::Resolved,
        }
    }

    /// A pending handle plus the signal that resolves it.
    pub(crate) fn pair() -> (oneshot::Sender<()>, Self) {
        let (tx, rx) = oneshot::channel();
        (
            tx,
            Self {
                state: State::Waiting(rx),
            },
        )
    }

    /// Non-blocking check, for synchronous hosts and tests.
    pub fn try_resolved(&mut self) -> bool {
        match &mut self.state {
            State::Resolved => true,
            State::Cancelled => false,
            State::Waiting(rx) => match rx.try_recv() {
                Ok(Some(())) => {
                    self.state = State::Resolved;
                    true
                }
                Ok(None) => false,
                // Sender dropped without firing: the transition was killed.
                Err(_) => {
                    self.state = State::Cancelled;
                    false
                }
            },
        }
    }
}

impl Future for Completion {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        match &mut this.state {
            State::Resolved => Poll::Ready(()),
            State::Cancelled => Poll::Pending,
            State::Waiting(rx) => match Pin::new(rx).poll(cx) {
                Poll::Ready(Ok(())) => {
                    this.state = State::Resolved;
                    Poll::Ready(())
                }
                Poll::Ready(Err(oneshot::Canceled)) => {
                    this.state = State::Cancelled;
                    Poll::Pending
                }
                Poll::Pending => Poll::Pending,
            },
        }
    }
}
