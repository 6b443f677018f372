#![forbid(unsafe_code)]

//! A navigation trigger bound to a route.
//!
//! [`RouterLink`] is what a clickable link or menu item holds: the router to
//! drive, the route to go to and an optional context. The host calls
//! [`activate`](RouterLink::activate) from its click handler.

use std::fmt;

use crate::content::Content;
use crate::route::{Context, RouteId};
use crate::router::{Navigation, Router};

/// Router, route and context for a link-style control.
///
/// ```
/// use scene_router::{Router, RouterLink, SlotView};
///
/// let view = SlotView::new();
/// let router = Router::new(view.clone());
/// router.map("about", "about page");
///
/// let link = RouterLink::new(router.clone(), "about");
/// link.activate().expect("router and route set").wait().unwrap();
/// assert_eq!(view.current(), Some("about page"));
/// ```
pub struct RouterLink<N> {
    router: Option<Router<N>>,
    route: Option<RouteId>,
    context: Context,
}

impl<N> Default for RouterLink<N> {
    fn default() -> Self {
        Self {
            router: None,
            route: None,
            context: Context::none(),
        }
    }
}

impl<N> fmt::Debug for RouterLink<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterLink")
            .field("bound", &self.router.is_some())
            .field("route", &self.route)
            .field("context", &self.context)
            .finish()
    }
}

impl<N> Clone for RouterLink<N> {
    fn clone(&self) -> Self {
        Self {
            router: self.router.clone(),
            route: self.route.clone(),
            context: self.context.clone(),
        }
    }
}

impl<N: Content> RouterLink<N> {
    /// A link to `route` on `router`, with no context.
    pub fn new(router: Router<N>, route: impl Into<RouteId>) -> Self {
        Self {
            router: Some(router),
            route: Some(route.into()),
            context: Context::none(),
        }
    }

    /// An unbound link; set the router and route before activating.
    #[must_use]
    pub fn unbound() -> Self {
        Self::default()
    }

    pub fn set_router(&mut self, router: Router<N>) {
        self.router = Some(router);
    }

    #[must_use]
    pub fn router(&self) -> Option<&Router<N>> {
        self.router.as_ref()
    }

    /// Point the link at `route`. Any previously set context is cleared.
    pub fn set_route(&mut self, route: impl Into<RouteId>) {
        self.set_route_with(route, Context::none());
    }

    /// Point the link at `route` with `context`.
    pub fn set_route_with(&mut self, route: impl Into<RouteId>, context: Context) {
        self.route = Some(route.into());
        self.context = context;
    }

    #[must_use]
    pub fn route(&self) -> Option<&RouteId> {
        self.route.as_ref()
    }

    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Navigate to the link's route.
    ///
    /// Returns `None` without doing anything unless both router and route
    /// are set.
    pub fn activate(&self) -> Option<Navigation<()>> {
        let (router, route) = (self.router.as_ref()?, self.route.as_ref()?);
        Some(router.navigate_with(route, self.context.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::SlotView;

    fn router() -> (Router<u8>, SlotView<u8>) {
        let view = SlotView::new();
        let router = Router::new(view.clone());
        router.map("one", 1).map("two", 2);
        (router, view)
    }

    #[test]
    fn unbound_link_does_nothing() {
        let (router, view) = router();
        let mut link = RouterLink::unbound();
        assert!(link.activate().is_none());
        link.set_route("one");
        assert!(link.activate().is_none());
        link.set_router(router);
        link.activate().unwrap().wait().unwrap();
        assert_eq!(view.current(), Some(1));
    }

    #[test]
    fn set_route_clears_context() {
        let (router, _view) = router();
        let mut link = RouterLink::new(router, "one");
        link.set_route_with("two", Context::new("hello"));
        assert_eq!(link.context().get::<&'static str>(), Some(&"hello"));
        link.set_route("one");
        assert!(link.context().is_none());
        assert_eq!(link.route().map(RouteId::as_str), Some("one"));
    }

    #[test]
    fn activate_passes_context() {
        let (router, _view) = router();
        let mut link = RouterLink::new(router.clone(), "one");
        link.set_route_with("two", Context::new(99_u16));
        link.activate().unwrap().wait().unwrap();
        assert_eq!(router.current_route().as_deref(), Some("two"));
        assert_eq!(router.current_context().get::<u16>(), Some(&99));
    }

    #[test]
    fn activating_unmapped_route_reports_error() {
        let (router, _view) = router();
        let link = RouterLink::new(router, "three");
        assert!(link.activate().unwrap().wait().is_err());
    }
}
