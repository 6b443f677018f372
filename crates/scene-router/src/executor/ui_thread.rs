#![forbid(unsafe_code)]

//! Dedicated owning thread for navigation commits.
//!
//! [`UiThread`] spawns one named thread that runs every submitted [`Task`] in
//! order. It is the only place commits execute, so history mutation, view
//! updates, and listener calls never interleave, no matter how many threads
//! submit navigations.
//!
//! # Shutdown
//!
//! [`UiThread::shutdown`] (or drop) enqueues a shutdown marker and joins the
//! thread. Tasks submitted before the marker still run; tasks submitted after
//! it are dropped, which resolves their completions as abandoned.
//!
//! # Panics in tasks
//!
//! A panicking task is caught and logged; the thread keeps serving later
//! tasks. The panicking task's own completion resolves as abandoned.
//!
//! # Example
//!
//! ```
//! use scene_router::executor::{Executor, UiThread, completion};
//!
//! let ui = UiThread::start().expect("spawn ui thread");
//! let (done, signal) = completion();
//! ui.handle().execute(Box::new(move || done.complete(7)));
//! assert_eq!(signal.wait(), Ok(7));
//! ui.shutdown();
//! ```

use std::io;
use std::panic::{self, AssertUnwindSafe};
use std::sync::mpsc;
use std::thread::{self, JoinHandle, ThreadId};

use super::{Executor, Task};

/// Default name for the spawned thread.
pub const DEFAULT_THREAD_NAME: &str = "scene-router-ui";

/// Messages sent to the UI thread.
enum UiMsg {
    /// Run one task.
    Run(Task),
    /// Stop after everything queued before this message.
    Shutdown,
}

/// Configuration for [`UiThread::with_config`].
#[derive(Debug, Clone)]
pub struct UiThreadConfig {
    /// Name given to the spawned OS thread.
    pub name: String,
}

impl Default for UiThreadConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_THREAD_NAME.to_owned(),
        }
    }
}

impl UiThreadConfig {
    /// Set the thread name.
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

/// Handle to a running UI thread.
///
/// The channel is unbounded: a task running on the UI thread may submit more
/// tasks (a listener that navigates) without blocking on itself.
pub struct UiThread {
    sender: mpsc::Sender<UiMsg>,
    handle: Option<JoinHandle<()>>,
}

impl UiThread {
    /// Spawn the thread with default configuration.
    pub fn start() -> io::Result<Self> {
        Self::with_config(UiThreadConfig::default())
    }

    /// Spawn the thread.
    pub fn with_config(config: UiThreadConfig) -> io::Result<Self> {
        let (tx, rx) = mpsc::channel::<UiMsg>();
        let handle = thread::Builder::new()
            .name(config.name.clone())
            .spawn(move || ui_loop(rx))?;
        tracing::debug!(name = %config.name, "ui thread started");
        Ok(Self {
            sender: tx,
            handle: Some(handle),
        })
    }

    /// An executor that submits to this thread.
    #[must_use]
    pub fn handle(&self) -> UiThreadHandle {
        UiThreadHandle {
            sender: self.sender.clone(),
        }
    }

    /// The spawned thread's id.
    #[must_use]
    pub fn thread_id(&self) -> Option<ThreadId> {
        self.handle.as_ref().map(|h| h.thread().id())
    }

    /// Run everything already queued, then stop the thread and join it.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        let _ = self.sender.send(UiMsg::Shutdown);
        if let Some(handle) = self.handle.take() {
            // Joining from the UI thread itself would wait forever.
            if handle.thread().id() != thread::current().id() {
                let _ = handle.join();
            }
        }
    }
}

impl Drop for UiThread {
    fn drop(&mut self) {
        self.stop();
    }
}

impl std::fmt::Debug for UiThread {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiThread")
            .field("thread_id", &self.thread_id())
            .finish()
    }
}

/// Cloneable executor that submits tasks to a [`UiThread`].
#[derive(Clone)]
pub struct UiThreadHandle {
    sender: mpsc::Sender<UiMsg>,
}

impl Executor for UiThreadHandle {
    fn execute(&self, task: Task) {
        if self.sender.send(UiMsg::Run(task)).is_err() {
            tracing::warn!("ui thread has exited; discarding task");
        }
    }
}

impl std::fmt::Debug for UiThreadHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("UiThreadHandle")
    }
}

/// The UI thread's main loop: run tasks in arrival order until shutdown.
fn ui_loop(rx: mpsc::Receiver<UiMsg>) {
    while let Ok(msg) = rx.recv() {
        match msg {
            UiMsg::Run(task) => {
                if panic::catch_unwind(AssertUnwindSafe(task)).is_err() {
                    tracing::error!("task panicked on ui thread");
                }
            }
            UiMsg::Shutdown => break,
        }
    }
    tracing::debug!("ui thread exiting");
}
