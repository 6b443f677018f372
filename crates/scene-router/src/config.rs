#![forbid(unsafe_code)]

//! Router configuration.

use std::fmt;
use std::sync::Arc;

use crate::route::{Context, RouteId};

type LabelFn = dyn Fn(&RouteId, &Context) -> String + Send + Sync;

/// Tunables fixed when a [`Router`](crate::Router) is built.
///
/// ```
/// use scene_router::RouterConfig;
///
/// let config = RouterConfig::default()
///     .memoize_content(false)
///     .breadcrumb_label(|route, _ctx| route.as_str().to_uppercase());
/// assert!(!config.memoizes_content());
/// ```
#[derive(Clone)]
pub struct RouterConfig {
    memoize_content: bool,
    breadcrumb_label: Option<Arc<LabelFn>>,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            memoize_content: true,
            breadcrumb_label: None,
        }
    }
}

impl RouterConfig {
    /// Cache the first output of each [`map_with`](crate::Router::map_with)
    /// producer and reuse it for every later visit. On by default.
    #[must_use]
    pub fn memoize_content(mut self, memoize: bool) -> Self {
        self.memoize_content = memoize;
        self
    }

    /// Compute breadcrumb labels with `label` instead of the route name.
    #[must_use]
    pub fn breadcrumb_label(
        mut self,
        label: impl Fn(&RouteId, &Context) -> String + Send + Sync + 'static,
    ) -> Self {
        self.breadcrumb_label = Some(Arc::new(label));
        self
    }

    #[must_use]
    pub fn memoizes_content(&self) -> bool {
        self.memoize_content
    }

    /// Label for one breadcrumb.
    pub(crate) fn label(&self, route: &RouteId, context: &Context) -> String {
        match &self.breadcrumb_label {
            Some(label) => label(route, context),
            None => route.to_string(),
        }
    }
}

impl fmt::Debug for RouterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouterConfig")
            .field("memoize_content", &self.memoize_content)
            .field("custom_breadcrumb_label", &self.breadcrumb_label.is_some())
            .finish()
    }
}
