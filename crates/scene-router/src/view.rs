#![forbid(unsafe_code)]

//! The display region a router drives.
//!
//! The router calls [`RouterView::show`] exactly once per committed
//! navigation, synchronously inside the commit and on the executor's
//! thread. What "showing" means (replacing a container's children, swapping
//! a widget tree, writing to a terminal pane) is entirely up to the sink.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Sink that displays route content.
pub trait RouterView<N>: Send + 'static {
    /// Replace whatever is displayed with `content`.
    fn show(&mut self, content: N);
}

impl<N, F> RouterView<N> for F
where
    F: FnMut(N) + Send + 'static,
{
    fn show(&mut self, content: N) {
        self(content);
    }
}

/// Stock sink that keeps the displayed content in a shared slot.
///
/// Clones share the slot, so a host can hand one clone to the router and
/// keep another to read what is on screen.
pub struct SlotView<N> {
    slot: Arc<Mutex<SlotState<N>>>,
}

struct SlotState<N> {
    current: Option<N>,
    shown: u64,
}

impl<N> SlotView<N> {
    /// An empty slot.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slot: Arc::new(Mutex::new(SlotState {
                current: None,
                shown: 0,
            })),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SlotState<N>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The content currently displayed.
    #[must_use]
    pub fn current(&self) -> Option<N>
    where
        N: Clone,
    {
        self.lock().current.clone()
    }

    /// Run `f` against the displayed content without cloning it.
    pub fn with_current<R>(&self, f: impl FnOnce(Option<&N>) -> R) -> R {
        f(self.lock().current.as_ref())
    }

    /// How many times content has been shown.
    #[must_use]
    pub fn shown_count(&self) -> u64 {
        self.lock().shown
    }
}

impl<N> Clone for SlotView<N> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<N> Default for SlotView<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Send + 'static> RouterView<N> for SlotView<N> {
    fn show(&mut self, content: N) {
        let mut state = self.lock();
        state.current = Some(content);
        state.shown += 1;
    }
}

impl<N: fmt::Debug> fmt::Debug for SlotView<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("SlotView")
            .field("current", &state.current)
            .field("shown", &state.shown)
            .finish()
    }
}
