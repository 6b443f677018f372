#![forbid(unsafe_code)]

//! Property-based invariant tests for `RouteHistory`.
//!
//! For any sequence of history operations:
//!
//! 1. The cursor is `None` iff the history is empty, and a valid index
//!    otherwise.
//! 2. The history matches a naive vector-plus-index model step for step.
//! 3. `push` after stepping back discards exactly the forward entries.
//! 4. `can_go_back` / `can_go_forward` agree with the cursor position.
//! 5. Breadcrumbs have one crumb per entry and exactly one current crumb
//!    (none when empty), at the cursor.
//! 6. `back` and `forward` at a boundary change nothing.

use proptest::prelude::*;
use scene_router::{Context, RouteHistory};

// ── Strategies ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
enum Op {
    Push(u8),
    Back,
    Forward,
    Clear,
    ClearForward,
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..6).prop_map(Op::Push),
        3 => Just(Op::Back),
        2 => Just(Op::Forward),
        1 => Just(Op::Clear),
        1 => Just(Op::ClearForward),
    ]
}

fn ops() -> impl Strategy<Value = Vec<Op>> {
    proptest::collection::vec(op(), 0..60)
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Reference model: entries plus a signed cursor, -1 when empty.
#[derive(Debug)]
struct Model {
    entries: Vec<String>,
    cursor: isize,
}

impl Model {
    fn new() -> Self {
        Self {
            entries: Vec::new(),
            cursor: -1,
        }
    }

    fn apply(&mut self, op: &Op) {
        match op {
            Op::Push(n) => {
                self.entries.truncate((self.cursor + 1) as usize);
                self.entries.push(route_name(*n));
                self.cursor += 1;
            }
            Op::Back => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                }
            }
            Op::Forward => {
                if self.cursor < self.entries.len() as isize - 1 {
                    self.cursor += 1;
                }
            }
            Op::Clear => {
                self.entries.clear();
                self.cursor = -1;
            }
            Op::ClearForward => {
                self.entries.truncate((self.cursor + 1) as usize);
            }
        }
    }
}

fn route_name(n: u8) -> String {
    format!("route-{n}")
}

fn apply(history: &mut RouteHistory, op: &Op) {
    match op {
        Op::Push(n) => history.push(route_name(*n), Context::new(*n)),
        Op::Back => {
            history.back();
        }
        Op::Forward => {
            history.forward();
        }
        Op::Clear => history.clear(),
        Op::ClearForward => history.clear_forward(),
    }
}

fn routes(history: &RouteHistory) -> Vec<String> {
    history
        .items()
        .iter()
        .map(|e| e.route().to_string())
        .collect()
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Cursor bounds and agreement with the model
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn matches_model_and_keeps_cursor_in_bounds(ops in ops()) {
        let mut history = RouteHistory::new();
        let mut model = Model::new();
        for op in &ops {
            apply(&mut history, op);
            model.apply(op);

            prop_assert_eq!(routes(&history), model.entries.clone(), "after {:?}", op);
            let expected_cursor = usize::try_from(model.cursor).ok();
            prop_assert_eq!(history.current_index(), expected_cursor);
            match history.current_index() {
                None => prop_assert!(history.is_empty()),
                Some(c) => prop_assert!(c < history.len()),
            }
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Push after back discards exactly the forward entries
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn push_after_back_truncates_forward(ops in ops(), steps in 1usize..5, pushed in 0u8..6) {
        let mut history = RouteHistory::new();
        for op in &ops {
            apply(&mut history, op);
        }
        for _ in 0..steps {
            history.back();
        }
        let kept: Vec<String> = match history.current_index() {
            Some(c) => routes(&history)[..=c].to_vec(),
            None => Vec::new(),
        };

        history.push(route_name(pushed), Context::none());

        let mut expected = kept;
        expected.push(route_name(pushed));
        prop_assert_eq!(routes(&history), expected);
        prop_assert_eq!(history.current_index(), Some(history.len() - 1));
        prop_assert!(!history.can_go_forward());
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4. Traversal predicates agree with the cursor
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn predicates_agree_with_cursor(ops in ops()) {
        let mut history = RouteHistory::new();
        for op in &ops {
            apply(&mut history, op);
            let cursor = history.current_index();
            prop_assert_eq!(history.can_go_back(), cursor.is_some_and(|c| c > 0));
            prop_assert_eq!(
                history.can_go_forward(),
                cursor.is_some_and(|c| c + 1 < history.len())
            );
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 5. Breadcrumbs mirror the entries
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn breadcrumbs_mirror_entries(ops in ops()) {
        let mut history = RouteHistory::new();
        for op in &ops {
            apply(&mut history, op);
        }
        let crumbs = history.breadcrumbs();
        prop_assert_eq!(crumbs.len(), history.len());

        let current: Vec<usize> = crumbs
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_current)
            .map(|(i, _)| i)
            .collect();
        match history.current_index() {
            None => prop_assert!(current.is_empty()),
            Some(c) => prop_assert_eq!(current, vec![c]),
        }
        for (crumb, entry) in crumbs.iter().zip(history.items()) {
            prop_assert_eq!(&crumb.route, entry.route());
            prop_assert_eq!(crumb.label.as_str(), entry.route().as_str());
        }
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Boundary traversal is a no-op
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn boundary_traversal_is_noop(ops in ops()) {
        let mut history = RouteHistory::new();
        for op in &ops {
            apply(&mut history, op);
        }

        while history.back().is_some() {}
        let at_start = (routes(&history), history.current_index());
        prop_assert!(history.back().is_none());
        prop_assert_eq!((routes(&history), history.current_index()), at_start);

        while history.forward().is_some() {}
        let at_end = (routes(&history), history.current_index());
        prop_assert!(history.forward().is_none());
        prop_assert_eq!((routes(&history), history.current_index()), at_end);
    }
}
