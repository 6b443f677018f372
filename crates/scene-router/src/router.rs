#![forbid(unsafe_code)]

//! The navigation orchestrator.
//!
//! A [`Router`] owns a route map, a [`RouteHistory`], listener registries and
//! a [`RouterView`]. Every navigation is turned into a commit that runs on
//! the router's [`Executor`]; the caller immediately gets a [`Navigation`]
//! handle that resolves once the commit has finished.
//!
//! # Commit protocol
//!
//! 1. Resolve the target entry and its producer. An unmapped target fails
//!    here, before anything is touched. Back/forward at a history boundary
//!    resolve to `Ok(false)` here too.
//! 2. Produce the content (outside every lock; producers may be slow).
//! 3. Capture the old route/context and mutate the history.
//! 4. Hand the content to the view.
//! 5. Publish the new current route and breadcrumbs as one [`RouterState`]
//!    snapshot.
//! 6. Call every change listener, then the selection listeners registered
//!    for the new route, each group in registration order.
//!
//! # Invariants
//!
//! - Commits run one at a time, in submission order, on the executor.
//! - Steps 3 to 5 run under one lock, so even an inline executor shared
//!   across threads publishes states in history order.
//! - The view is shown exactly once per successful commit.
//! - Observers never see a current route and breadcrumbs from different
//!   commits.
//!
//! # Failure Modes
//!
//! - **Unmapped route**: `navigate`/`replace` resolve to
//!   [`RouterError::Unmapped`] without enqueueing anything.
//! - **Executor gone**: the commit is dropped unrun and the navigation
//!   resolves to [`RouterError::ExecutorClosed`].
//! - **Re-entrant navigation**: a listener may navigate. On a queued
//!   executor the nested commit runs after the current one; on
//!   [`Immediate`] it runs inline, before later listeners of the outer
//!   commit. A view, breadcrumb labeler or state observer that navigates
//!   from inside steps 3 to 5 has its commit parked until the outer commit
//!   has finished, whatever the executor.

use std::any::{Any, type_name};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::task::{self, Poll};
use std::thread;
use std::time::Instant;

use ahash::AHashMap;
use tracing::{debug, info, trace, warn};

use crate::config::RouterConfig;
use crate::content::{Content, Controller, Producer, ResourceLocator, TemplateLoader};
use crate::error::{Result, RouterError};
use crate::executor::{Abandoned, Completion, Executor, Immediate, Task, completion};
use crate::history::{Breadcrumb, RouteHistory};
use crate::listener::{ListenerId, RouteChange, RouteChangeListener, RouteSelectionListener};
use crate::reactive::{Observable, Subscription};
use crate::route::{Context, HistoryEntry, RouteId};
use crate::view::RouterView;

/// Name of the thread spawned by [`Router::load_all_routes`].
pub const WARM_THREAD_NAME: &str = "scene-router-warm";

// ---------------------------------------------------------------------------
// RouterState
// ---------------------------------------------------------------------------

/// Observable router state, published once per commit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouterState {
    /// Route at the history cursor; `None` before the first navigation.
    pub current_route: Option<RouteId>,
    /// One crumb per history entry, oldest first.
    pub breadcrumbs: Vec<Breadcrumb>,
}

// ---------------------------------------------------------------------------
// Navigation
// ---------------------------------------------------------------------------

/// Pending outcome of a navigation.
///
/// Block with [`wait`](Self::wait), poll with [`try_take`](Self::try_take),
/// or `.await` it. The navigation runs whether or not the handle is used.
#[must_use = "the navigation runs anyway; the handle only reports its outcome"]
pub struct Navigation<T> {
    completion: Completion<Result<T>>,
}

fn settle<T>(outcome: std::result::Result<Result<T>, Abandoned>) -> Result<T> {
    outcome.unwrap_or_else(|Abandoned| Err(RouterError::ExecutorClosed))
}

impl<T> Navigation<T> {
    fn failed(err: RouterError) -> Self {
        Self {
            completion: Completion::ready(Err(err)),
        }
    }

    /// Whether the commit has finished (or was rejected).
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.completion.is_complete()
    }

    /// Take the outcome if the commit has finished.
    pub fn try_take(&mut self) -> Option<Result<T>> {
        self.completion.try_take().map(settle)
    }

    /// Block until the commit has finished.
    ///
    /// Do not call this from inside a commit running on a serial executor;
    /// the commit being waited on can never start.
    pub fn wait(self) -> Result<T> {
        settle(self.completion.wait())
    }
}

impl<T> Future for Navigation<T> {
    type Output = Result<T>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut task::Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.completion).poll(cx).map(settle)
    }
}

impl<T> fmt::Debug for Navigation<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Navigation")
            .field("complete", &self.is_complete())
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Internals
// ---------------------------------------------------------------------------

#[derive(Debug)]
enum Transition {
    Push(HistoryEntry),
    Replace(HistoryEntry),
    Back,
    Forward,
    BackAndClear,
}

impl Transition {
    fn name(&self) -> &'static str {
        match self {
            Self::Push(_) => "push",
            Self::Replace(_) => "replace",
            Self::Back => "back",
            Self::Forward => "forward",
            Self::BackAndClear => "back_and_clear",
        }
    }
}

type ChangeEntry = (ListenerId, Arc<dyn RouteChangeListener>);
type SelectionEntry = (ListenerId, Arc<dyn RouteSelectionListener>);

/// Everything guarded by the router's one lock.
struct Registry<N> {
    history: RouteHistory,
    routes: AHashMap<RouteId, Arc<Producer<N>>>,
    change_listeners: Vec<ChangeEntry>,
    selection_listeners: AHashMap<RouteId, Vec<SelectionEntry>>,
}

impl<N> Registry<N> {
    fn add_change(&mut self, listener: Arc<dyn RouteChangeListener>) -> ListenerId {
        let id = ListenerId::next();
        self.change_listeners.push((id, listener));
        id
    }

    fn add_selection(
        &mut self,
        route: RouteId,
        listener: Arc<dyn RouteSelectionListener>,
    ) -> ListenerId {
        let id = ListenerId::next();
        self.selection_listeners
            .entry(route)
            .or_default()
            .push((id, listener));
        id
    }
}

struct Shared<N> {
    executor: Box<dyn Executor>,
    loader: Option<Box<dyn TemplateLoader<N>>>,
    config: RouterConfig,
    view: Mutex<Box<dyn RouterView<N>>>,
    state: Observable<RouterState>,
    registry: Mutex<Registry<N>>,
    deferred: Mutex<VecDeque<Task>>,
}

impl<N: Content> Shared<N> {
    fn lock(&self) -> MutexGuard<'_, Registry<N>> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn commit(&self, transition: Transition) -> Result<bool> {
        let kind = transition.name();

        let (target, producer) = {
            let registry = self.lock();
            let target = match &transition {
                Transition::Push(entry) | Transition::Replace(entry) => entry.clone(),
                Transition::Back | Transition::BackAndClear => {
                    match registry.history.peek_back() {
                        Some(entry) => entry.clone(),
                        None => {
                            trace!(transition = kind, "no earlier entry");
                            return Ok(false);
                        }
                    }
                }
                Transition::Forward => match registry.history.peek_forward() {
                    Some(entry) => entry.clone(),
                    None => {
                        trace!(transition = kind, "no later entry");
                        return Ok(false);
                    }
                },
            };
            let Some(producer) = registry.routes.get(target.route()).cloned() else {
                warn!(route = %target.route(), transition = kind, "commit targets unmapped route");
                return Err(RouterError::unmapped(target.route()));
            };
            (target, producer)
        };

        let content = producer.produce();

        // Held from the history mutation until the new state is published.
        let mut view = self.view.lock().unwrap_or_else(PoisonError::into_inner);
        let section = CommitSection::enter(self);

        let (old, history, change_listeners, selection_listeners) = {
            let mut registry = self.lock();
            let old = registry.history.current().cloned();
            let moved = match transition {
                Transition::Push(entry) => {
                    registry.history.push(entry.route(), entry.context().clone());
                    true
                }
                Transition::Replace(entry) => {
                    registry.history.clear();
                    registry.history.push(entry.route(), entry.context().clone());
                    true
                }
                Transition::Back => registry.history.back().is_some(),
                Transition::Forward => registry.history.forward().is_some(),
                Transition::BackAndClear => {
                    let moved = registry.history.back().is_some();
                    if moved {
                        registry.history.clear_forward();
                    }
                    moved
                }
            };
            if !moved {
                // Another thread committed between resolve and apply; only
                // possible with an inline executor shared across threads.
                trace!(transition = kind, "history moved underneath commit");
                return Ok(false);
            }
            let change_listeners: Vec<_> = registry
                .change_listeners
                .iter()
                .map(|(_, l)| Arc::clone(l))
                .collect();
            let selection_listeners: Vec<_> = registry
                .selection_listeners
                .get(target.route())
                .map(|ls| ls.iter().map(|(_, l)| Arc::clone(l)).collect())
                .unwrap_or_default();
            (
                old,
                registry.history.clone(),
                change_listeners,
                selection_listeners,
            )
        };

        let breadcrumbs = history.breadcrumbs_with(|route, ctx| self.config.label(route, ctx));
        let change = RouteChange {
            route: target.route().clone(),
            context: target.context().clone(),
            old_route: old.as_ref().map(|e| e.route().clone()),
            old_context: old.map(|e| e.context().clone()).unwrap_or_default(),
        };

        view.show(content);
        self.state.set(RouterState {
            current_route: Some(change.route.clone()),
            breadcrumbs,
        });
        drop(section);
        drop(view);

        for listener in &change_listeners {
            listener.route_changed(&change);
        }
        for listener in &selection_listeners {
            listener.on_route_selected(&change.context);
        }

        debug!(
            transition = kind,
            route = %change.route,
            old_route = ?change.old_route.as_ref().map(RouteId::as_str),
            history_len = history.len(),
            cursor = ?history.current_index(),
            "navigation committed"
        );
        self.run_deferred();
        Ok(true)
    }

    /// Run `task` now, or park it if this thread is inside this router's
    /// commit section.
    fn run_or_defer(&self, task: Task) {
        if CommitSection::is_active(self) {
            trace!("commit deferred until the current one publishes");
            self.deferred
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push_back(task);
        } else {
            task();
        }
    }

    fn run_deferred(&self) {
        loop {
            let next = self
                .deferred
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .pop_front();
            match next {
                Some(task) => task(),
                None => break,
            }
        }
    }
}

thread_local! {
    /// Routers whose commit section is held by this thread.
    static ACTIVE_SECTIONS: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

/// Marks the current thread as inside a router's commit section.
struct CommitSection {
    key: usize,
}

impl CommitSection {
    fn key<N>(shared: &Shared<N>) -> usize {
        std::ptr::from_ref(shared) as usize
    }

    fn enter<N>(shared: &Shared<N>) -> Self {
        let key = Self::key(shared);
        ACTIVE_SECTIONS.with(|active| active.borrow_mut().push(key));
        Self { key }
    }

    fn is_active<N>(shared: &Shared<N>) -> bool {
        let key = Self::key(shared);
        ACTIVE_SECTIONS.with(|active| active.borrow().contains(&key))
    }
}

impl Drop for CommitSection {
    fn drop(&mut self) {
        ACTIVE_SECTIONS.with(|active| {
            let mut active = active.borrow_mut();
            if let Some(pos) = active.iter().rposition(|k| *k == self.key) {
                active.remove(pos);
            }
        });
    }
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Assembles a [`Router`].
///
/// ```
/// use scene_router::executor::TaskQueue;
/// use scene_router::{Router, RouterConfig, SlotView};
///
/// let queue = TaskQueue::new();
/// let view = SlotView::<&'static str>::new();
/// let router = Router::builder(view.clone())
///     .executor(queue.handle())
///     .config(RouterConfig::default().memoize_content(false))
///     .build();
/// router.map("home", "home page");
///
/// let nav = router.navigate("home");
/// assert_eq!(view.current(), None);
/// queue.run_pending();
/// nav.wait().unwrap();
/// assert_eq!(view.current(), Some("home page"));
/// ```
pub struct RouterBuilder<N> {
    view: Box<dyn RouterView<N>>,
    executor: Box<dyn Executor>,
    loader: Option<Box<dyn TemplateLoader<N>>>,
    config: RouterConfig,
}

impl<N: Content> RouterBuilder<N> {
    /// Run commits on `executor` instead of inline.
    #[must_use]
    pub fn executor(mut self, executor: impl Executor) -> Self {
        self.executor = Box::new(executor);
        self
    }

    /// Loader used by [`Router::map_template`].
    #[must_use]
    pub fn template_loader(mut self, loader: impl TemplateLoader<N>) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    #[must_use]
    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn build(self) -> Router<N> {
        Router {
            shared: Arc::new(Shared {
                executor: self.executor,
                loader: self.loader,
                config: self.config,
                view: Mutex::new(self.view),
                state: Observable::new(RouterState::default()),
                registry: Mutex::new(Registry {
                    history: RouteHistory::new(),
                    routes: AHashMap::new(),
                    change_listeners: Vec::new(),
                    selection_listeners: AHashMap::new(),
                }),
                deferred: Mutex::new(VecDeque::new()),
            }),
        }
    }
}

impl<N> fmt::Debug for RouterBuilder<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterBuilder")
            .field("has_loader", &self.loader.is_some())
            .field("config", &self.config)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Swaps a view's content between named routes and keeps a browser-like
/// history.
///
/// `Router` is a cheap handle: clones share the same history, routes and
/// listeners. With a queued executor ([`TaskQueue`](crate::executor::TaskQueue)
/// or [`UiThread`](crate::executor::UiThread)) clones can be moved to other
/// threads to submit navigations. With the default [`Immediate`] executor the
/// view is driven from whichever thread navigates; commits stay consistent
/// with each other, but their order across threads is whatever order they
/// win the commit lock.
///
/// ```
/// use scene_router::{Context, Router, SlotView};
///
/// let view = SlotView::new();
/// let router = Router::new(view.clone());
/// router.map("a", "page A").map("b", "page B");
///
/// router.navigate("a").wait().unwrap();
/// router.navigate_with("b", Context::new(42_u32)).wait().unwrap();
/// assert_eq!(view.current(), Some("page B"));
/// assert_eq!(router.current_context().get::<u32>(), Some(&42));
///
/// assert!(router.navigate_back().wait().unwrap());
/// assert_eq!(router.current_route().as_deref(), Some("a"));
/// ```
pub struct Router<N> {
    shared: Arc<Shared<N>>,
}

impl<N> Clone for Router<N> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<N: Content> Router<N> {
    /// A router that commits inline on the calling thread.
    pub fn new(view: impl RouterView<N>) -> Self {
        Self::builder(view).build()
    }

    pub fn builder(view: impl RouterView<N>) -> RouterBuilder<N> {
        RouterBuilder {
            view: Box::new(view),
            executor: Box::new(Immediate),
            loader: None,
            config: RouterConfig::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.shared.config
    }

    // -- mapping -------------------------------------------------------------

    /// Map `route` to a pre-built content value. The last mapping wins.
    pub fn map(&self, route: impl Into<RouteId>, content: N) -> &Self {
        self.insert(route.into(), Producer::Fixed(content));
        self
    }

    /// Map `route` to a producer run when the route is first shown (every
    /// time it is shown if memoization is off).
    pub fn map_with(
        &self,
        route: impl Into<RouteId>,
        producer: impl Fn() -> N + Send + Sync + 'static,
    ) -> &Self {
        let memoize = self.shared.config.memoizes_content();
        self.insert(route.into(), Producer::lazy(producer, memoize));
        self
    }

    /// Map `route` to content loaded from `locator` by the template loader.
    ///
    /// The template is loaded now, so loader failures surface from this
    /// call. Listener capabilities declared by the loaded controller are
    /// registered: selection against `route`, change globally.
    pub fn map_template(
        &self,
        route: impl Into<RouteId>,
        locator: impl Into<ResourceLocator>,
    ) -> Result<&Self> {
        let route = route.into();
        let locator = locator.into();
        self.map_loaded(&route, &locator, |_| Ok(()))
            .inspect_err(|err| warn!(%route, %locator, error = %err, "template mapping failed"))?;
        Ok(self)
    }

    /// Like [`map_template`](Self::map_template), then hand the loaded
    /// controller to `customizer`.
    ///
    /// Fails with [`RouterError::MissingController`] when the template has
    /// no controller and [`RouterError::ControllerType`] when it is not a
    /// `T`. On failure nothing is mapped and no listener is registered.
    pub fn map_template_customized<T: Any + Send + Sync>(
        &self,
        route: impl Into<RouteId>,
        locator: impl Into<ResourceLocator>,
        customizer: impl FnOnce(&T),
    ) -> Result<&Self> {
        let route = route.into();
        let locator = locator.into();
        self.map_loaded(&route, &locator, |controller| {
            let controller = controller.ok_or_else(|| RouterError::MissingController {
                locator: locator.clone(),
            })?;
            let typed = controller
                .downcast::<T>()
                .ok_or_else(|| RouterError::ControllerType {
                    locator: locator.clone(),
                    expected: type_name::<T>(),
                })?;
            customizer(typed.as_ref());
            Ok(())
        })
        .inspect_err(|err| warn!(%route, %locator, error = %err, "template mapping failed"))?;
        Ok(self)
    }

    fn map_loaded(
        &self,
        route: &RouteId,
        locator: &ResourceLocator,
        customize: impl FnOnce(Option<&Controller>) -> Result<()>,
    ) -> Result<()> {
        let loader = self
            .shared
            .loader
            .as_deref()
            .ok_or_else(|| RouterError::NoTemplateLoader {
                route: route.clone(),
            })?;
        let loaded = loader
            .load(locator)
            .map_err(|source| RouterError::TemplateLoad {
                locator: locator.clone(),
                source,
            })?;
        customize(loaded.controller.as_ref())?;

        let mut registry = self.shared.lock();
        if let Some(controller) = &loaded.controller {
            let capabilities = controller.capabilities();
            if let Some(listener) = &capabilities.selection {
                registry.add_selection(route.clone(), Arc::clone(listener));
            }
            if let Some(listener) = &capabilities.change {
                registry.add_change(Arc::clone(listener));
            }
        }
        registry
            .routes
            .insert(route.clone(), Arc::new(Producer::Fixed(loaded.content)));
        debug!(%route, %locator, controller = loaded.controller.is_some(), "template mapped");
        Ok(())
    }

    fn insert(&self, route: RouteId, producer: Producer<N>) {
        trace!(%route, ?producer, "route mapped");
        self.shared.lock().routes.insert(route, Arc::new(producer));
    }

    /// Whether `route` has content mapped.
    #[must_use]
    pub fn is_mapped(&self, route: impl AsRef<str>) -> bool {
        self.shared.lock().routes.contains_key(route.as_ref())
    }

    /// Every mapped route, sorted.
    #[must_use]
    pub fn mapped_routes(&self) -> Vec<RouteId> {
        let mut routes: Vec<RouteId> = self.shared.lock().routes.keys().cloned().collect();
        routes.sort();
        routes
    }

    /// Run every route's producer once on a background thread so later
    /// navigations hit the cache.
    ///
    /// Resolves to the number of routes whose content is ready without a
    /// producer call. Producers mapped while memoization is off are skipped.
    /// Navigation keeps working while warming runs.
    pub fn load_all_routes(&self) -> Result<Completion<usize>> {
        let producers: Vec<Arc<Producer<N>>> =
            self.shared.lock().routes.values().cloned().collect();
        let (done, warmed) = completion();
        thread::Builder::new()
            .name(WARM_THREAD_NAME.to_owned())
            .spawn(move || {
                let started = Instant::now();
                let ready = producers.iter().filter(|p| p.warm()).count();
                info!(
                    routes = ready,
                    skipped = producers.len() - ready,
                    elapsed = ?started.elapsed(),
                    "route content warmed"
                );
                done.complete(ready);
            })?;
        Ok(warmed)
    }

    // -- navigation ----------------------------------------------------------

    /// Navigate to `route` with no context.
    pub fn navigate(&self, route: impl Into<RouteId>) -> Navigation<()> {
        self.navigate_with(route, Context::none())
    }

    /// Push `route` onto the history, dropping any forward entries, and show
    /// it.
    pub fn navigate_with(&self, route: impl Into<RouteId>, context: Context) -> Navigation<()> {
        let route = route.into();
        if let Err(err) = self.check_mapped(&route) {
            return Navigation::failed(err);
        }
        self.submit(Transition::Push(HistoryEntry::new(route, context)), |_| ())
    }

    /// Step back one entry. Resolves to `false` at the start of history.
    pub fn navigate_back(&self) -> Navigation<bool> {
        self.submit(Transition::Back, |moved| moved)
    }

    /// Step forward one entry. Resolves to `false` at the end of history.
    pub fn navigate_forward(&self) -> Navigation<bool> {
        self.submit(Transition::Forward, |moved| moved)
    }

    /// Step back one entry and drop everything after it.
    ///
    /// From `A -> B -> C` at `C` this leaves `A -> B` at `B`. Resolves to
    /// `false`, changing nothing, when there is no earlier entry.
    pub fn navigate_back_and_clear(&self) -> Navigation<bool> {
        self.submit(Transition::BackAndClear, |moved| moved)
    }

    /// Replace the whole history with `route`.
    pub fn replace(&self, route: impl Into<RouteId>) -> Navigation<()> {
        self.replace_with(route, Context::none())
    }

    /// Replace the whole history with `route` and `context`.
    pub fn replace_with(&self, route: impl Into<RouteId>, context: Context) -> Navigation<()> {
        let route = route.into();
        if let Err(err) = self.check_mapped(&route) {
            return Navigation::failed(err);
        }
        self.submit(Transition::Replace(HistoryEntry::new(route, context)), |_| ())
    }

    fn check_mapped(&self, route: &RouteId) -> Result<()> {
        if self.is_mapped(route) {
            Ok(())
        } else {
            warn!(%route, "navigation to unmapped route");
            Err(RouterError::unmapped(route))
        }
    }

    fn submit<T: Send + 'static>(
        &self,
        transition: Transition,
        finish: fn(bool) -> T,
    ) -> Navigation<T> {
        let (done, pending) = completion();
        let shared = Arc::clone(&self.shared);
        trace!(transition = transition.name(), "commit enqueued");
        self.shared.executor.execute(Box::new(move || {
            let runner = Arc::clone(&shared);
            runner.run_or_defer(Box::new(move || {
                done.complete(shared.commit(transition).map(finish));
            }));
        }));
        Navigation {
            completion: pending,
        }
    }

    // -- state ---------------------------------------------------------------

    /// Context of the entry at the history cursor.
    #[must_use]
    pub fn current_context(&self) -> Context {
        self.shared.lock().history.current_context()
    }

    #[must_use]
    pub fn current_route(&self) -> Option<RouteId> {
        self.shared.state.with(|s| s.current_route.clone())
    }

    #[must_use]
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        self.shared.state.with(|s| s.breadcrumbs.clone())
    }

    /// Latest published state snapshot.
    #[must_use]
    pub fn state(&self) -> Arc<RouterState> {
        self.shared.state.get()
    }

    /// The observable cell the router publishes to.
    #[must_use]
    pub fn state_observable(&self) -> Observable<RouterState> {
        self.shared.state.clone()
    }

    /// Call `callback` with every newly published state.
    #[must_use = "dropping the subscription unsubscribes immediately"]
    pub fn observe(
        &self,
        callback: impl Fn(&RouterState) + Send + Sync + 'static,
    ) -> Subscription {
        self.shared.state.subscribe(callback)
    }

    /// Read the history under the router's lock.
    ///
    /// `f` must not call back into the router.
    pub fn with_history<R>(&self, f: impl FnOnce(&RouteHistory) -> R) -> R {
        f(&self.shared.lock().history)
    }

    // -- listeners -----------------------------------------------------------

    pub fn add_route_change_listener(&self, listener: impl RouteChangeListener) -> ListenerId {
        self.add_shared_route_change_listener(Arc::new(listener))
    }

    /// Register a listener that is also held elsewhere.
    pub fn add_shared_route_change_listener(
        &self,
        listener: Arc<dyn RouteChangeListener>,
    ) -> ListenerId {
        self.shared.lock().add_change(listener)
    }

    pub fn add_route_selection_listener(
        &self,
        route: impl Into<RouteId>,
        listener: impl RouteSelectionListener,
    ) -> ListenerId {
        self.add_shared_route_selection_listener(route, Arc::new(listener))
    }

    pub fn add_shared_route_selection_listener(
        &self,
        route: impl Into<RouteId>,
        listener: Arc<dyn RouteSelectionListener>,
    ) -> ListenerId {
        self.shared.lock().add_selection(route.into(), listener)
    }

    /// Returns whether a listener was removed.
    pub fn remove_route_change_listener(&self, id: ListenerId) -> bool {
        let mut registry = self.shared.lock();
        let before = registry.change_listeners.len();
        registry.change_listeners.retain(|(lid, _)| *lid != id);
        registry.change_listeners.len() != before
    }

    /// Returns whether a listener was removed.
    pub fn remove_route_selection_listener(&self, id: ListenerId) -> bool {
        let mut registry = self.shared.lock();
        let mut removed = false;
        for listeners in registry.selection_listeners.values_mut() {
            let before = listeners.len();
            listeners.retain(|(lid, _)| *lid != id);
            removed |= listeners.len() != before;
        }
        registry.selection_listeners.retain(|_, ls| !ls.is_empty());
        removed
    }
}

impl<N> fmt::Debug for Router<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.shared.state.get();
        f.debug_struct("Router")
            .field("current_route", &state.current_route)
            .field("history_len", &state.breadcrumbs.len())
            .field("config", &self.shared.config)
            .finish()
    }
}
