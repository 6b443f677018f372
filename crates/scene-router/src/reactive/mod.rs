#![forbid(unsafe_code)]

//! Reactive state cells for router output.
//!
//! - [`Observable`]: a shared, version-tracked value with change notification
//!   via subscriber callbacks. Readers on any thread get a consistent
//!   snapshot without blocking the writer.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//!
//! # Architecture
//!
//! The current value lives in an [`arc_swap::ArcSwap`], so a read is a single
//! atomic load and can never observe a half-written value. Subscribers are
//! stored as `Weak` callbacks and cleaned up lazily during notification.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per [`Observable::set`].
//! 2. Subscribers are notified in registration order.
//! 3. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.
//! 4. Subscribers see the new value; a read from inside a callback returns it
//!    too.

pub mod observable;

pub use observable::{Observable, Subscription};
