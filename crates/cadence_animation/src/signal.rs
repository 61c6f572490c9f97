//! One-shot awaitable signals
//!
//! Single-fulfillment cells resolved synchronously from inside the
//! scheduler's tick (or at registration, when the answer is already known).
//! There is no executor and no background thread: awaiting simply observes
//! a cell an earlier tick filled in, so any executor that can poll a future
//! on the driver thread works (tests use `pollster::block_on` after the
//! relevant ticks have run).

use std::cell::RefCell;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};

struct Shared<T> {
    value: Option<T>,
    waker: Option<Waker>,
}

/// The awaitable half of a one-shot signal.
///
/// Resolves exactly once; polling after resolution pends forever, as usual
/// for consumed futures.
pub struct OneShot<T> {
    shared: Rc<RefCell<Shared<T>>>,
}

/// The write half, held inside a task's registries. Consuming it is the
/// single fulfillment.
pub(crate) struct Fulfill<T> {
    shared: Rc<RefCell<Shared<T>>>,
}

/// Create a connected fulfill/await pair.
pub(crate) fn one_shot<T>() -> (Fulfill<T>, OneShot<T>) {
    let shared = Rc::new(RefCell::new(Shared {
        value: None,
        waker: None,
    }));
    (
        Fulfill {
            shared: Rc::clone(&shared),
        },
        OneShot { shared },
    )
}

/// A signal that is already resolved at creation.
pub(crate) fn fulfilled<T>(value: T) -> OneShot<T> {
    let (fulfill, signal) = one_shot();
    fulfill.fulfill(value);
    signal
}

impl<T> Fulfill<T> {
    pub(crate) fn fulfill(self, value: T) {
        let waker = {
            let mut shared = self.shared.borrow_mut();
            shared.value = Some(value);
            shared.waker.take()
        };
        // Wake outside the borrow: the waker may poll immediately.
        if let Some(waker) = waker {
            waker.wake();
        }
    }
}

impl<T> Future for OneShot<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let mut shared = self.shared.borrow_mut();
        match shared.value.take() {
            Some(value) => Poll::Ready(value),
            None => {
                shared.waker = Some(cx.waker().clone());
                Poll::Pending
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fulfill_then_await() {
        let (fulfill, signal) = one_shot();
        fulfill.fulfill(7u32);
        assert_eq!(pollster::block_on(signal), 7);
    }

    #[test]
    fn test_already_fulfilled() {
        let signal = fulfilled("done");
        assert_eq!(pollster::block_on(signal), "done");
    }
}
