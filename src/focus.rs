//! Keyboard focus path.
//!
//! The path is stored leaf first and never includes the root. Every entry is
//! the parent of the entry before it, because the path is only ever built by
//! walking parent links upward from the newly focused widget.

use crate::error::{HandlerResult, WidgetError};
use crate::tree::{NodeId, WidgetTree};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FocusPath {
    path: Vec<NodeId>,
    window: Option<NodeId>,
}

impl FocusPath {
    pub fn new() -> Self {
        Self::default()
    }

    /// Entries from the focused leaf up to (not including) the root.
    pub fn entries(&self) -> &[NodeId] {
        &self.path
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.path.contains(&id)
    }

    /// Focused leaf, if any.
    pub fn leaf(&self) -> Option<NodeId> {
        self.path.first().copied()
    }

    /// Outermost entry: the root's direct child on the path.
    pub fn outermost(&self) -> Option<NodeId> {
        self.path.last().copied()
    }

    /// Top-level window (a root child) enclosing the focused widget.
    pub fn window(&self) -> Option<NodeId> {
        self.window
    }

    /// Replace the focus path with the chain above `widget`.
    ///
    /// Every entry of the old path that still reports focus receives
    /// `focus_changed(false)`; the new chain then receives `focus_changed(true)`
    /// outermost first. `None` (or a stale id) only clears. Returns the window
    /// that should be raised.
    ///
    /// Handler failures do not stop the transition: all notifications are
    /// delivered and the first error is returned afterwards.
    pub fn update(
        &mut self,
        tree: &mut WidgetTree,
        widget: Option<NodeId>,
    ) -> HandlerResult<Option<NodeId>> {
        let mut first_error: Option<WidgetError> = None;

        for id in std::mem::take(&mut self.path) {
            if !tree.is_focused(id) {
                continue;
            }
            tree.set_focused(id, false);
            if let Some(w) = tree.widget_mut(id)
                && let Err(err) = w.focus_changed(false)
            {
                first_error.get_or_insert(err);
            }
        }
        self.window = None;

        if let Some(widget) = widget {
            if !tree.is_alive(widget) {
                tracing::debug!(node = ?widget, "ignoring focus request for stale widget");
            }
            self.path = tree.ancestors(widget);
            // Windows may nest; only the one sitting on the stack gets raised.
            let root = tree.root();
            self.window = self.path.iter().copied().find(|id| {
                tree.parent(*id) == Some(root) && tree.role(*id).is_some_and(|r| r.is_window())
            });
        }

        for &id in self.path.iter().rev() {
            tree.set_focused(id, true);
            if let Some(w) = tree.widget_mut(id)
                && let Err(err) = w.focus_changed(true)
            {
                first_error.get_or_insert(err);
            }
        }

        tracing::debug!(
            leaf = ?self.leaf(),
            window = ?self.window,
            depth = self.path.len(),
            "focus path updated"
        );

        match first_error {
            Some(err) => Err(err),
            None => Ok(self.window),
        }
    }

    /// Drop the whole path without notifications, used when part of it is
    /// being destroyed. Surviving entries stop reporting focus.
    pub fn clear_silently(&mut self, tree: &mut WidgetTree) {
        for id in self.path.drain(..) {
            tree.set_focused(id, false);
        }
        self.window = None;
    }

    /// Whether every entry is live and each entry's parent is the next one.
    pub fn is_consistent(&self, tree: &WidgetTree) -> bool {
        let chained = self
            .path
            .windows(2)
            .all(|pair| tree.parent(pair[0]) == Some(pair[1]));
        let rooted = self
            .outermost()
            .is_none_or(|top| tree.parent(top) == Some(tree.root()));
        chained && rooted && self.path.iter().all(|id| tree.is_alive(*id))
    }
}
