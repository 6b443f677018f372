#![forbid(unsafe_code)]

//! Route-based content switching with browser-like history.
//!
//! A [`Router`] maps route names to content, shows one route at a time in a
//! [`RouterView`], and keeps a back/forward [`RouteHistory`]. Navigations
//! are committed on an [`executor`] that owns the view, and observers can
//! follow the current route and breadcrumbs through an [`Observable`].
//!
//! ```
//! use scene_router::{Router, SlotView};
//!
//! let view = SlotView::new();
//! let router = Router::new(view.clone());
//! router.map("inbox", "Inbox").map("message", "Message");
//!
//! router.navigate("inbox").wait().unwrap();
//! router.navigate("message").wait().unwrap();
//! router.navigate_back().wait().unwrap();
//!
//! assert_eq!(view.current(), Some("Inbox"));
//! let crumbs: Vec<_> = router.breadcrumbs().iter().map(|c| c.label.clone()).collect();
//! assert_eq!(crumbs, ["inbox", "message"]);
//! ```

pub mod config;
pub mod content;
pub mod error;
pub mod executor;
pub mod history;
pub mod link;
pub mod listener;
pub mod reactive;
pub mod route;
pub mod router;
pub mod view;

pub use config::RouterConfig;
pub use content::{
    BoxError, Capabilities, Content, Controller, LoadedTemplate, ResourceLocator, TemplateLoader,
};
pub use error::{Result, RouterError};
pub use history::{Breadcrumb, RouteHistory};
pub use link::RouterLink;
pub use listener::{ListenerId, RouteChange, RouteChangeListener, RouteSelectionListener};
pub use reactive::{Observable, Subscription};
pub use route::{Context, HistoryEntry, RouteId};
pub use router::{Navigation, Router, RouterBuilder, RouterState};
pub use view::{RouterView, SlotView};
