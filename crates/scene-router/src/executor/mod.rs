#![forbid(unsafe_code)]

//! Where navigation commits run.
//!
//! The router never mutates its history or notifies listeners on the
//! caller's thread directly. Every commit is wrapped in a [`Task`] and handed
//! to an [`Executor`], which runs tasks one at a time, in submission order, on
//! the thread that owns the view. The caller gets a [`Completion`] back
//! immediately and can block on it or `.await` it.
//!
//! Provided executors:
//!
//! | Executor | Runs tasks | Use when |
//! |----------|-----------|----------|
//! | [`Immediate`] | inline, on the submitting thread | single-threaded hosts, tests |
//! | [`QueueHandle`] | when the host calls [`TaskQueue::run_pending`] | the host owns its own UI loop |
//! | [`UiThreadHandle`] | on a dedicated [`UiThread`] | no UI loop of your own |
//!
//! Any `Fn(Task) + Send + Sync` closure is also an executor, which is how a
//! toolkit's own "run later on the UI thread" primitive plugs in.

pub mod completion;
pub mod queue;
pub mod ui_thread;

pub use completion::{Abandoned, Completer, Completion, completion};
pub use queue::{QueueHandle, TaskQueue};
pub use ui_thread::{UiThread, UiThreadConfig, UiThreadHandle};

/// A unit of work submitted to an [`Executor`].
pub type Task = Box<dyn FnOnce() + Send + 'static>;

/// Runs [`Task`]s serially, in submission order.
///
/// An executor that can no longer run tasks drops them; the router observes
/// this as an abandoned [`Completion`].
pub trait Executor: Send + Sync + 'static {
    /// Submit `task` for execution.
    fn execute(&self, task: Task);
}

impl<F> Executor for F
where
    F: Fn(Task) + Send + Sync + 'static,
{
    fn execute(&self, task: Task) {
        self(task);
    }
}

/// Runs every task inline on the submitting thread.
///
/// This is the single-threaded embodiment: a navigation's completion is
/// already resolved when the navigation call returns.
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl Executor for Immediate {
    fn execute(&self, task: Task) {
        task();
    }
}
