#![forbid(unsafe_code)]

//! One-shot completion signal.
//!
//! [`completion()`] returns a connected ([`Completer`], [`Completion`]) pair.
//! The completer is moved into a task; the completion goes back to the
//! caller, who can block with [`Completion::wait`] or `.await` it.
//!
//! # Failure Modes
//!
//! - **Task dropped unrun** (executor shut down, task panicked): the
//!   completer's `Drop` resolves the pair with [`Abandoned`], so waiters never
//!   hang on a task that will not run.
//! - **Waiting on the executing thread**: blocking in `wait()` from inside a
//!   task on the same serial executor deadlocks. Use `.await` or poll with
//!   [`Completion::try_take`] there instead.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::task::{Context, Poll, Waker};

/// The completer was dropped without resolving its completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("completion abandoned before it resolved")]
pub struct Abandoned;

enum SlotState<T> {
    Pending(Option<Waker>),
    Ready(T),
    Abandoned,
    Taken,
}

struct Slot<T> {
    state: Mutex<SlotState<T>>,
    resolved: Condvar,
}

impl<T> Slot<T> {
    fn lock(&self) -> MutexGuard<'_, SlotState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn resolve(&self, next: SlotState<T>) {
        let previous = std::mem::replace(&mut *self.lock(), next);
        self.resolved.notify_all();
        if let SlotState::Pending(Some(waker)) = previous {
            waker.wake();
        }
    }
}

fn take<T>(state: &mut SlotState<T>) -> Result<T, Abandoned> {
    match std::mem::replace(state, SlotState::Taken) {
        SlotState::Ready(value) => Ok(value),
        _ => Err(Abandoned),
    }
}

/// Create a connected completer/completion pair.
#[must_use]
pub fn completion<T>() -> (Completer<T>, Completion<T>) {
    let slot = Arc::new(Slot {
        state: Mutex::new(SlotState::Pending(None)),
        resolved: Condvar::new(),
    });
    (
        Completer {
            slot: Some(Arc::clone(&slot)),
        },
        Completion { slot },
    )
}

/// Write side of a [`completion()`] pair.
pub struct Completer<T> {
    slot: Option<Arc<Slot<T>>>,
}

impl<T> Completer<T> {
    /// Resolve the paired completion with `value`.
    pub fn complete(mut self, value: T) {
        if let Some(slot) = self.slot.take() {
            slot.resolve(SlotState::Ready(value));
        }
    }
}

impl<T> Drop for Completer<T> {
    fn drop(&mut self) {
        if let Some(slot) = self.slot.take() {
            slot.resolve(SlotState::Abandoned);
        }
    }
}

impl<T> fmt::Debug for Completer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completer")
            .field("armed", &self.slot.is_some())
            .finish()
    }
}

/// Read side of a [`completion()`] pair.
///
/// Resolves exactly once, either with the completer's value or with
/// [`Abandoned`].
pub struct Completion<T> {
    slot: Arc<Slot<T>>,
}

impl<T> Completion<T> {
    /// A completion that is already resolved with `value`.
    #[must_use]
    pub fn ready(value: T) -> Self {
        let (completer, completion) = completion();
        completer.complete(value);
        completion
    }

    /// Whether the completion has resolved (or its value was already taken).
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !matches!(*self.slot.lock(), SlotState::Pending(_))
    }

    /// Take the outcome if resolved; `None` while still pending.
    pub fn try_take(&mut self) -> Option<Result<T, Abandoned>> {
        let mut state = self.slot.lock();
        match *state {
            SlotState::Pending(_) => None,
            _ => Some(take(&mut state)),
        }
    }

    /// Block the current thread until the completion resolves.
    pub fn wait(self) -> Result<T, Abandoned> {
        let mut state = self.slot.lock();
        while matches!(*state, SlotState::Pending(_)) {
            state = self
                .slot
                .resolved
                .wait(state)
                .unwrap_or_else(PoisonError::into_inner);
        }
        take(&mut state)
    }
}

impl<T> Future for Completion<T> {
    type Output = Result<T, Abandoned>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let mut state = self.slot.lock();
        match *state {
            SlotState::Pending(ref mut waker) => {
                *waker = Some(cx.waker().clone());
                Poll::Pending
            }
            _ => Poll::Ready(take(&mut state)),
        }
    }
}

impl<T> fmt::Debug for Completion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Completion")
            .field("complete", &self.is_complete())
            .finish()
    }
}
