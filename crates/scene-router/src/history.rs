#![forbid(unsafe_code)]

//! Linear, browser-like navigation history.
//!
//! [`RouteHistory`] is an ordered list of [`HistoryEntry`] values plus a
//! cursor pointing at the entry currently shown. Visiting a new route drops
//! everything ahead of the cursor, exactly like a web browser.
//!
//! # Invariants
//!
//! 1. The cursor is `None` iff the history is empty; otherwise it is a valid
//!    index into the entries.
//! 2. Entries are contiguous from index 0.
//! 3. Entries past the cursor exist only if they were pushed and later
//!    stepped back over, and no push or clear has happened since.
//!
//! The history does no locking and no notification. The router touches it
//! only from its commit step.

use std::fmt;

use crate::route::{Context, HistoryEntry, RouteId};

/// Display-oriented projection of one history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Breadcrumb {
    /// Text to show for this crumb.
    pub label: String,
    /// The visited route.
    pub route: RouteId,
    /// The context supplied for that visit.
    pub context: Context,
    /// Whether the history cursor is at this entry.
    pub is_current: bool,
}

/// Ordered route history with a movable cursor.
#[derive(Debug, Clone, Default)]
pub struct RouteHistory {
    entries: Vec<HistoryEntry>,
    cursor: Option<usize>,
}

impl RouteHistory {
    /// Create an empty history.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a route after the cursor, discarding all forward entries.
    pub fn push(&mut self, route: impl Into<RouteId>, context: Context) {
        let next = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(next);
        self.entries.push(HistoryEntry::new(route, context));
        self.cursor = Some(next);
    }

    /// The entry at the cursor.
    #[must_use]
    pub fn current(&self) -> Option<&HistoryEntry> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    /// The context of the entry at the cursor, or [`Context::none()`].
    #[must_use]
    pub fn current_context(&self) -> Context {
        self.current()
            .map(|entry| entry.context().clone())
            .unwrap_or_default()
    }

    /// Whether there is an entry before the cursor.
    #[must_use]
    pub fn can_go_back(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    /// Whether there is an entry after the cursor.
    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        matches!(self.cursor, Some(c) if c + 1 < self.entries.len())
    }

    /// The entry [`back`](Self::back) would move to, without moving.
    #[must_use]
    pub fn peek_back(&self) -> Option<&HistoryEntry> {
        match self.cursor {
            Some(c) if c > 0 => self.entries.get(c - 1),
            _ => None,
        }
    }

    /// The entry [`forward`](Self::forward) would move to, without moving.
    #[must_use]
    pub fn peek_forward(&self) -> Option<&HistoryEntry> {
        self.cursor.and_then(|c| self.entries.get(c + 1))
    }

    /// Step the cursor back by one.
    ///
    /// Returns the entry now current, or `None` (and leaves the history
    /// untouched) when already at the start.
    pub fn back(&mut self) -> Option<&HistoryEntry> {
        if !self.can_go_back() {
            return None;
        }
        self.cursor = self.cursor.map(|c| c - 1);
        self.current()
    }

    /// Step the cursor forward by one.
    ///
    /// Returns the entry now current, or `None` (and leaves the history
    /// untouched) when already at the end.
    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        if !self.can_go_forward() {
            return None;
        }
        self.cursor = self.cursor.map(|c| c + 1);
        self.current()
    }

    /// Remove every entry.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    /// Remove every entry after the cursor. The cursor does not move.
    pub fn clear_forward(&mut self) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
    }

    /// Breadcrumbs labelled with the route name.
    #[must_use]
    pub fn breadcrumbs(&self) -> Vec<Breadcrumb> {
        self.breadcrumbs_with(|route, _| route.to_string())
    }

    /// Breadcrumbs with a caller-supplied label for each entry.
    #[must_use]
    pub fn breadcrumbs_with(
        &self,
        label: impl Fn(&RouteId, &Context) -> String,
    ) -> Vec<Breadcrumb> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, entry)| Breadcrumb {
                label: label(entry.route(), entry.context()),
                route: entry.route().clone(),
                context: entry.context().clone(),
                is_current: Some(i) == self.cursor,
            })
            .collect()
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn items(&self) -> &[HistoryEntry] {
        &self.entries
    }

    /// Index of the current entry; `None` when empty.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.cursor
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for RouteHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RouteHistory:")?;
        for (i, entry) in self.entries.iter().enumerate() {
            write!(
                f,
                "\n{i:>4} route = \"{}\", context = {:?}",
                entry.route(),
                entry.context()
            )?;
            if Some(i) == self.cursor {
                write!(f, " <--- current")?;
            }
        }
        Ok(())
    }
}
