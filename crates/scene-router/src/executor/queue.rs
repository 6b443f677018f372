#![forbid(unsafe_code)]

//! Host-pumped task queue.
//!
//! For hosts that already run a UI loop: the router submits commits through a
//! [`QueueHandle`] from any thread, and the loop drains them with
//! [`TaskQueue::run_pending`] on the owning thread.
//!
//! ```
//! use scene_router::executor::{Executor, TaskQueue};
//!
//! let queue = TaskQueue::new();
//! let handle = queue.handle();
//! handle.execute(Box::new(|| println!("runs on the owning thread")));
//! assert_eq!(queue.run_pending(), 1);
//! ```

use std::sync::mpsc;
use std::time::Duration;

use super::{Executor, Task};

/// Owning side of a task queue. Not `Sync`: exactly one thread drains it.
#[derive(Debug)]
pub struct TaskQueue {
    sender: mpsc::Sender<Task>,
    receiver: mpsc::Receiver<Task>,
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskQueue {
    /// Create an empty queue.
    #[must_use]
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::channel();
        Self { sender, receiver }
    }

    /// A submitting handle, usable from any thread.
    #[must_use]
    pub fn handle(&self) -> QueueHandle {
        QueueHandle {
            sender: self.sender.clone(),
        }
    }

    /// Run queued tasks until the queue is empty.
    ///
    /// Tasks submitted while draining (e.g. a listener that navigates) run in
    /// the same call. Returns the number of tasks run.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        while let Ok(task) = self.receiver.try_recv() {
            task();
            ran += 1;
        }
        if ran > 0 {
            tracing::trace!(ran, "task queue drained");
        }
        ran
    }

    /// Block up to `timeout` for one task and run it.
    ///
    /// Returns `true` if a task ran.
    pub fn run_one_timeout(&self, timeout: Duration) -> bool {
        match self.receiver.recv_timeout(timeout) {
            Ok(task) => {
                task();
                true
            }
            Err(_) => false,
        }
    }
}

/// Submitting side of a [`TaskQueue`].
#[derive(Debug, Clone)]
pub struct QueueHandle {
    sender: mpsc::Sender<Task>,
}

impl Executor for QueueHandle {
    fn execute(&self, task: Task) {
        if self.sender.send(task).is_err() {
            tracing::warn!("task queue dropped; discarding task");
        }
    }
}
