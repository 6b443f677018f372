#![forbid(unsafe_code)]

//! Router error type.

use thiserror::Error;

use crate::content::{BoxError, ResourceLocator};
use crate::route::RouteId;

pub type Result<T> = std::result::Result<T, RouterError>;

/// Everything that can go wrong while configuring or driving a router.
///
/// Going back or forward at a history boundary is not an error; those
/// operations resolve to `Ok(false)`.
#[derive(Debug, Error)]
pub enum RouterError {
    #[error("route \"{route}\" is not mapped to any content")]
    Unmapped { route: RouteId },

    #[error("failed to load template {locator}")]
    TemplateLoad {
        locator: ResourceLocator,
        #[source]
        source: BoxError,
    },

    #[error("no controller found when loading {locator}")]
    MissingController { locator: ResourceLocator },

    #[error("controller loaded from {locator} is not a {expected}")]
    ControllerType {
        locator: ResourceLocator,
        expected: &'static str,
    },

    #[error("cannot map route \"{route}\" to a template: no template loader configured")]
    NoTemplateLoader { route: RouteId },

    #[error("router executor shut down before the navigation ran")]
    ExecutorClosed,

    #[error("failed to spawn route warm-up worker: {0}")]
    WorkerSpawn(#[from] std::io::Error),
}

impl RouterError {
    /// Whether this error indicates a router configuration mistake rather
    /// than a runtime condition.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::Unmapped { .. }
                | Self::MissingController { .. }
                | Self::ControllerType { .. }
                | Self::NoTemplateLoader { .. }
        )
    }

    pub(crate) fn unmapped(route: &RouteId) -> Self {
        Self::Unmapped {
            route: route.clone(),
        }
    }
}
