#![forbid(unsafe_code)]

//! Route identifiers, opaque navigation contexts, and history entries.

use std::any::Any;
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Name of a registered navigation target.
///
/// Cheap to clone (`Arc<str>` inside) and hashable, so it can key the route
/// map and the per-route listener registry directly.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(Arc<str>);

impl RouteId {
    /// Create a route identifier from any string-like value.
    #[must_use]
    pub fn new(name: impl AsRef<str>) -> Self {
        Self(Arc::from(name.as_ref()))
    }

    /// The route name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteId({:?})", &*self.0)
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RouteId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for RouteId {
    fn from(name: String) -> Self {
        Self(Arc::from(name))
    }
}

impl From<&RouteId> for RouteId {
    fn from(route: &RouteId) -> Self {
        route.clone()
    }
}

impl Deref for RouteId {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for RouteId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for RouteId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for RouteId {
    fn eq(&self, other: &str) -> bool {
        &*self.0 == other
    }
}

impl PartialEq<&str> for RouteId {
    fn eq(&self, other: &&str) -> bool {
        &*self.0 == *other
    }
}

/// Opaque payload attached to one visit of a route.
///
/// The router never inspects or compares a context; it only carries it from
/// the navigation call to listeners, breadcrumbs, and
/// [`Router::current_context`](crate::Router::current_context).
///
/// "No context supplied" and "explicitly empty context" are the same value:
/// [`Context::none()`], which is also the [`Default`].
#[derive(Clone, Default)]
pub struct Context(Option<Arc<dyn Any + Send + Sync>>);

impl Context {
    /// The empty context.
    #[must_use]
    pub const fn none() -> Self {
        Self(None)
    }

    /// Wrap a value as a context.
    #[must_use]
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Some(Arc::new(value)))
    }

    /// Wrap an already shared value without re-allocating it.
    #[must_use]
    pub fn from_arc<T: Any + Send + Sync>(value: Arc<T>) -> Self {
        Self(Some(value))
    }

    /// Whether this is the empty context.
    #[must_use]
    pub fn is_none(&self) -> bool {
        self.0.is_none()
    }

    /// Whether a payload is present.
    #[must_use]
    pub fn is_some(&self) -> bool {
        self.0.is_some()
    }

    /// Borrow the payload as `T`, if present and of that type.
    #[must_use]
    pub fn get<T: Any>(&self) -> Option<&T> {
        self.0.as_deref().and_then(|value| value.downcast_ref::<T>())
    }

    /// Clone out a shared handle to the payload as `T`.
    #[must_use]
    pub fn get_arc<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        self.0.clone().and_then(|value| value.downcast::<T>().ok())
    }

    /// Whether two contexts refer to the same payload allocation.
    ///
    /// Two empty contexts are considered the same.
    #[must_use]
    pub fn same_payload(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            None => f.write_str("Context(none)"),
            Some(_) => f.write_str("Context(..)"),
        }
    }
}

/// Payloads are compared by identity, never by value.
impl PartialEq for Context {
    fn eq(&self, other: &Self) -> bool {
        self.same_payload(other)
    }
}

impl<T: Any + Send + Sync> From<Option<T>> for Context {
    fn from(value: Option<T>) -> Self {
        value.map_or_else(Self::none, Self::new)
    }
}

/// One visit to a route, as recorded in [`RouteHistory`](crate::RouteHistory).
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    route: RouteId,
    context: Context,
}

impl HistoryEntry {
    /// Create an entry.
    #[must_use]
    pub fn new(route: impl Into<RouteId>, context: Context) -> Self {
        Self {
            route: route.into(),
            context,
        }
    }

    /// The visited route.
    #[must_use]
    pub fn route(&self) -> &RouteId {
        &self.route
    }

    /// The context supplied for this visit.
    #[must_use]
    pub fn context(&self) -> &Context {
        &self.context
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_id_compares_with_str() {
        let route = RouteId::from("settings");
        assert_eq!(route, "settings");
        assert_eq!(route.as_str(), "settings");
        assert_eq!(route.to_string(), "settings");
    }

    #[test]
    fn route_id_from_string_and_str_agree() {
        assert_eq!(RouteId::from("a"), RouteId::from(String::from("a")));
    }

    #[test]
    fn context_default_is_none() {
        let ctx = Context::default();
        assert!(ctx.is_none());
        assert!(ctx.get::<i32>().is_none());
    }

    #[test]
    fn context_downcasts_to_stored_type_only() {
        let ctx = Context::new(42_i32);
        assert_eq!(ctx.get::<i32>(), Some(&42));
        assert!(ctx.get::<String>().is_none());
        assert_eq!(ctx.get_arc::<i32>().as_deref(), Some(&42));
    }

    #[test]
    fn context_from_option_conflates_absent_and_none() {
        let absent: Context = Option::<i32>::None.into();
        assert!(absent.is_none());
        assert!(absent.same_payload(&Context::none()));

        let present: Context = Some("x").into();
        assert_eq!(present.get::<&str>(), Some(&"x"));
    }

    #[test]
    fn context_clones_share_payload() {
        let ctx = Context::new(String::from("payload"));
        let copy = ctx.clone();
        assert!(ctx.same_payload(&copy));
        assert!(!ctx.same_payload(&Context::new(String::from("payload"))));
    }

    #[test]
    fn history_entry_equality_uses_payload_identity() {
        let ctx = Context::new(1_u8);
        let a = HistoryEntry::new("a", ctx.clone());
        assert_eq!(a, HistoryEntry::new("a", ctx));
        assert_ne!(a, HistoryEntry::new("a", Context::new(1_u8)));
        assert_ne!(a, HistoryEntry::new("b", Context::none()));
    }
}
