//! Back-to-front ordering of the root's children.
//!
//! The last entry is drawn on top and wins hit tests. Every popup must sit
//! after its owner; raising a window therefore also raises the popups it owns,
//! recursively.

use crate::tree::{NodeId, WidgetTree};

/// Mutable view of the window stack held by a [`WidgetTree`].
#[derive(Debug)]
pub struct WindowStack<'a> {
    tree: &'a mut WidgetTree,
}

impl<'a> WindowStack<'a> {
    pub fn new(tree: &'a mut WidgetTree) -> Self {
        Self { tree }
    }

    /// Current order, back to front.
    pub fn order(&self) -> &[NodeId] {
        self.tree.children(self.tree.root())
    }

    pub fn position(&self, id: NodeId) -> Option<usize> {
        self.order().iter().position(|x| *x == id)
    }

    fn owner(&self, id: NodeId) -> Option<NodeId> {
        self.tree.role(id).and_then(|r| r.owner())
    }

    /// Move `window` to the top, then promote every popup it owns that now
    /// sits below it. Each promotion may promote further popups, so the scan
    /// restarts until a full pass changes nothing.
    ///
    /// Ids that are not on the stack are ignored.
    pub fn bring_to_front(&mut self, window: NodeId) {
        let root = self.tree.root();
        let Some(stack) = self.tree.children_mut(root) else {
            return;
        };
        let Some(pos) = stack.iter().position(|x| *x == window) else {
            return;
        };
        let item = stack.remove(pos);
        stack.push(item);
        tracing::debug!(window_id = ?window, "raised window");

        // Quadratic, but the stack only ever holds a handful of windows.
        loop {
            let order = self.order();
            let Some(base) = order.iter().position(|x| *x == window) else {
                return;
            };
            let promote = order
                .iter()
                .take(base)
                .copied()
                .find(|id| self.owner(*id) == Some(window));
            match promote {
                Some(popup) => self.bring_to_front(popup),
                None => break,
            }
        }
    }

    /// Whether every popup on the stack sits above its (live) owner.
    pub fn popups_above_owners(&self) -> bool {
        let order = self.order();
        order.iter().enumerate().all(|(idx, id)| {
            match self.owner(*id).and_then(|owner| self.position(owner)) {
                Some(owner_idx) => owner_idx < idx,
                None => true,
            }
        })
    }
}
