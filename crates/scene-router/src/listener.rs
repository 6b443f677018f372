#![forbid(unsafe_code)]

//! Route change and route selection callbacks.
//!
//! Change listeners hear about every committed navigation. Selection
//! listeners are registered against one route and hear only about commits
//! that land on it. Within a commit every change listener runs before any
//! selection listener, each group in registration order.
//!
//! Both traits are implemented for plain closures:
//!
//! ```
//! use scene_router::{Context, RouteChange, RouteChangeListener, RouteSelectionListener};
//!
//! let on_change = |change: &RouteChange| println!("now at {}", change.route);
//! let on_select = |ctx: &Context| assert!(ctx.is_none());
//! # fn assert_change(_: &impl RouteChangeListener) {}
//! # fn assert_select(_: &impl RouteSelectionListener) {}
//! # assert_change(&on_change);
//! # assert_select(&on_select);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

use crate::route::{Context, RouteId};

/// What a committed navigation changed.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteChange {
    /// Route now shown.
    pub route: RouteId,
    /// Context of the route now shown.
    pub context: Context,
    /// Route shown before the commit; `None` for the first navigation.
    pub old_route: Option<RouteId>,
    /// Context of the previous route.
    pub old_context: Context,
}

/// Notified after every committed navigation.
pub trait RouteChangeListener: Send + Sync + 'static {
    fn route_changed(&self, change: &RouteChange);
}

impl<F> RouteChangeListener for F
where
    F: Fn(&RouteChange) + Send + Sync + 'static,
{
    fn route_changed(&self, change: &RouteChange) {
        self(change);
    }
}

/// Notified when a commit lands on the route it was registered for.
pub trait RouteSelectionListener: Send + Sync + 'static {
    fn on_route_selected(&self, context: &Context);
}

impl<F> RouteSelectionListener for F
where
    F: Fn(&Context) + Send + Sync + 'static,
{
    fn on_route_selected(&self, context: &Context) {
        self(context);
    }
}

/// Identifies a registered listener so it can be removed later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

impl ListenerId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}
