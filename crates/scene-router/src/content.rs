#![forbid(unsafe_code)]

//! Producing the content a route displays.
//!
//! A route maps to one of:
//!
//! - a fixed, pre-built value ([`Router::map`](crate::Router::map)),
//! - a producer closure run on demand ([`Router::map_with`](crate::Router::map_with)),
//! - a template resource loaded through the router's [`TemplateLoader`]
//!   ([`Router::map_template`](crate::Router::map_template)).
//!
//! Template loaders may hand back a [`Controller`] alongside the content. The
//! router never inspects the controller object itself; it reads only the
//! [`Capabilities`] the loader declared, and auto-registers those listeners.

use std::any::{Any, type_name};
use std::fmt;
use std::sync::{Arc, OnceLock};

use crate::listener::{RouteChangeListener, RouteSelectionListener};

/// Boxed error returned by template loaders.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Bounds every displayable content type satisfies.
///
/// Content is cloned out of memoized producers for each commit, so cheap
/// handles (`Arc<...>`, widget ids) make the best content types.
pub trait Content: Clone + Send + Sync + 'static {}

impl<T: Clone + Send + Sync + 'static> Content for T {}

// ---------------------------------------------------------------------------
// ResourceLocator
// ---------------------------------------------------------------------------

/// Names a template resource (a path, URL, or embedded asset key).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceLocator(Arc<str>);

impl ResourceLocator {
    #[must_use]
    pub fn new(locator: impl AsRef<str>) -> Self {
        Self(Arc::from(locator.as_ref()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceLocator {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ResourceLocator {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

// ---------------------------------------------------------------------------
// Controller
// ---------------------------------------------------------------------------

/// Listener roles a controller opted into.
#[derive(Clone, Default)]
pub struct Capabilities {
    /// Registered against the mapped route.
    pub selection: Option<Arc<dyn RouteSelectionListener>>,
    /// Registered globally.
    pub change: Option<Arc<dyn RouteChangeListener>>,
}

impl Capabilities {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selection.is_none() && self.change.is_none()
    }
}

impl fmt::Debug for Capabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Capabilities")
            .field("selection", &self.selection.is_some())
            .field("change", &self.change.is_some())
            .finish()
    }
}

/// Object bound to a loaded template, plus the listener roles it declared.
#[derive(Clone)]
pub struct Controller {
    object: Arc<dyn Any + Send + Sync>,
    type_name: &'static str,
    capabilities: Capabilities,
}

impl Controller {
    /// Wrap a controller object with no declared capabilities.
    pub fn new<T: Any + Send + Sync>(object: Arc<T>) -> Self {
        Self {
            object,
            type_name: type_name::<T>(),
            capabilities: Capabilities::default(),
        }
    }

    /// Wrap a controller that is itself a selection listener and declare it.
    pub fn selecting<T: RouteSelectionListener>(object: Arc<T>) -> Self {
        let listener: Arc<dyn RouteSelectionListener> = object.clone();
        Self::new(object).with_selection_listener(listener)
    }

    /// Wrap a controller that is itself a change listener and declare it.
    pub fn changing<T: RouteChangeListener>(object: Arc<T>) -> Self {
        let listener: Arc<dyn RouteChangeListener> = object.clone();
        Self::new(object).with_change_listener(listener)
    }

    /// Declare a selection listener for the route this controller is mapped to.
    #[must_use]
    pub fn with_selection_listener(mut self, listener: Arc<dyn RouteSelectionListener>) -> Self {
        self.capabilities.selection = Some(listener);
        self
    }

    /// Declare a global route change listener.
    #[must_use]
    pub fn with_change_listener(mut self, listener: Arc<dyn RouteChangeListener>) -> Self {
        self.capabilities.change = Some(listener);
        self
    }

    #[must_use]
    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// The controller object, if it is a `T`.
    #[must_use]
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        Arc::clone(&self.object).downcast::<T>().ok()
    }

    /// Rust type name of the wrapped object.
    #[must_use]
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("type", &self.type_name)
            .field("capabilities", &self.capabilities)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Template loading
// ---------------------------------------------------------------------------

/// Result of loading a template resource.
#[derive(Debug, Clone)]
pub struct LoadedTemplate<N> {
    pub content: N,
    pub controller: Option<Controller>,
}

impl<N> LoadedTemplate<N> {
    /// Content with no controller.
    pub fn new(content: N) -> Self {
        Self {
            content,
            controller: None,
        }
    }

    #[must_use]
    pub fn with_controller(mut self, controller: Controller) -> Self {
        self.controller = Some(controller);
        self
    }
}

/// Turns a [`ResourceLocator`] into content.
///
/// Any `Fn(&ResourceLocator) -> Result<LoadedTemplate<N>, BoxError>` closure
/// is a loader.
pub trait TemplateLoader<N>: Send + Sync + 'static {
    fn load(&self, locator: &ResourceLocator) -> Result<LoadedTemplate<N>, BoxError>;
}

impl<N, F> TemplateLoader<N> for F
where
    F: Fn(&ResourceLocator) -> Result<LoadedTemplate<N>, BoxError> + Send + Sync + 'static,
{
    fn load(&self, locator: &ResourceLocator) -> Result<LoadedTemplate<N>, BoxError> {
        self(locator)
    }
}

// ---------------------------------------------------------------------------
// Producer
// ---------------------------------------------------------------------------

type MakeFn<N> = Box<dyn Fn() -> N + Send + Sync>;

/// Registered content source for one route.
pub(crate) enum Producer<N> {
    Fixed(N),
    Lazy {
        make: MakeFn<N>,
        /// `None` when memoization is disabled.
        cache: Option<OnceLock<N>>,
    },
}

impl<N: Content> Producer<N> {
    pub(crate) fn lazy(make: impl Fn() -> N + Send + Sync + 'static, memoize: bool) -> Self {
        Self::Lazy {
            make: Box::new(make),
            cache: memoize.then(OnceLock::new),
        }
    }

    /// Content for a commit.
    pub(crate) fn produce(&self) -> N {
        match self {
            Self::Fixed(content) => content.clone(),
            Self::Lazy {
                make,
                cache: Some(cache),
            } => cache.get_or_init(|| make()).clone(),
            Self::Lazy { make, cache: None } => make(),
        }
    }

    /// Fill the cache so later commits skip the producer.
    ///
    /// Returns whether the content is now ready without a call. Unmemoized
    /// producers are left alone and report `false`.
    pub(crate) fn warm(&self) -> bool {
        match self {
            Self::Fixed(_) => true,
            Self::Lazy {
                make,
                cache: Some(cache),
            } => {
                cache.get_or_init(|| make());
                true
            }
            Self::Lazy { cache: None, .. } => false,
        }
    }

    #[cfg(test)]
    pub(crate) fn is_warm(&self) -> bool {
        match self {
            Self::Fixed(_) => true,
            Self::Lazy { cache, .. } => cache.as_ref().is_some_and(|c| c.get().is_some()),
        }
    }
}

impl<N> fmt::Debug for Producer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(_) => f.write_str("Producer::Fixed"),
            Self::Lazy { cache, .. } => f
                .debug_struct("Producer::Lazy")
                .field("memoized", &cache.is_some())
                .finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::listener::RouteChange;
    use crate::route::{Context, RouteId};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting(calls: &Arc<AtomicUsize>) -> impl Fn() -> String + Send + Sync + 'static {
        let calls = Arc::clone(calls);
        move || format!("node-{}", calls.fetch_add(1, Ordering::SeqCst))
    }

    #[test]
    fn fixed_producer_clones_value() {
        let p = Producer::Fixed("a".to_owned());
        assert_eq!(p.produce(), "a");
        assert_eq!(p.produce(), "a");
        assert!(p.is_warm());
    }

    #[test]
    fn memoized_producer_runs_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let p = Producer::lazy(counting(&calls), true);
        assert!(!p.is_warm());
        assert_eq!(p.produce(), "node-0");
        assert_eq!(p.produce(), "node-0");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn unmemoized_producer_runs_every_time() {
        let calls = Arc::new(AtomicUsize::new(0));
        let p = Producer::lazy(counting(&calls), false);
        assert_eq!(p.produce(), "node-0");
        assert_eq!(p.produce(), "node-1");
        assert!(!p.is_warm());
    }

    #[test]
    fn warm_fills_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let p = Producer::lazy(counting(&calls), true);
        assert!(p.warm());
        assert!(p.is_warm());
        assert_eq!(p.produce(), "node-0");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn warm_skips_unmemoized_producer() {
        let calls = Arc::new(AtomicUsize::new(0));
        let p = Producer::lazy(counting(&calls), false);
        assert!(!p.warm());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(Producer::Fixed(String::from("ready")).warm());
    }

    struct Page {
        selected: AtomicUsize,
    }

    impl RouteSelectionListener for Page {
        fn on_route_selected(&self, _context: &Context) {
            self.selected.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn selecting_controller_declares_itself() {
        let page = Arc::new(Page {
            selected: AtomicUsize::new(0),
        });
        let controller = Controller::selecting(Arc::clone(&page));
        let caps = controller.capabilities();
        assert!(caps.change.is_none());
        caps.selection
            .as_ref()
            .unwrap()
            .on_route_selected(&Context::none());
        assert_eq!(page.selected.load(Ordering::SeqCst), 1);
        assert!(controller.downcast::<Page>().is_some());
        assert!(controller.downcast::<String>().is_none());
        assert!(controller.type_name().ends_with("Page"));
    }

    #[test]
    fn plain_controller_has_no_capabilities() {
        let controller = Controller::new(Arc::new(7_u32));
        assert!(controller.capabilities().is_empty());
        assert_eq!(controller.downcast::<u32>().as_deref(), Some(&7));
    }

    #[test]
    fn change_listener_capability() {
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        let controller = Controller::new(Arc::new(())).with_change_listener(Arc::new(
            move |_: &RouteChange| {
                h.fetch_add(1, Ordering::SeqCst);
            },
        ));
        controller
            .capabilities()
            .change
            .as_ref()
            .unwrap()
            .route_changed(&RouteChange {
                route: RouteId::from("a"),
                context: Context::none(),
                old_route: None,
                old_context: Context::none(),
            });
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn closure_is_a_template_loader() {
        let loader = |locator: &ResourceLocator| -> Result<LoadedTemplate<String>, BoxError> {
            if locator.as_str().ends_with(".tpl") {
                Ok(LoadedTemplate::new(format!("loaded {locator}")))
            } else {
                Err(format!("unsupported resource {locator}").into())
            }
        };
        let ok = loader.load(&ResourceLocator::from("home.tpl")).unwrap();
        assert_eq!(ok.content, "loaded home.tpl");
        assert!(ok.controller.is_none());
        let err = loader.load(&"home.html".into()).unwrap_err();
        assert_eq!(err.to_string(), "unsupported resource home.html");
    }
}
