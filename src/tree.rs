//! Arena-owned widget tree.
//!
//! The screen never holds references into the tree. Focus paths, the drag
//! target and the window stack all store [`NodeId`] handles, which are
//! generational: once a node is removed its handle stops resolving, even if the
//! slot is reused by a later insertion.
//!
//! The tree also provides the default pointer routing used by the screen:
//! events descend into the topmost visible child containing the point, and a
//! node's own handler only runs when none of its children consumed the event.

use std::fmt;

use crate::canvas::Canvas;
use crate::error::HandlerResult;
use crate::event::{Buttons, Modifiers, MouseButton};
use crate::geometry::{Point, Rect, Size, Vec2};
use crate::widget::{Container, Cursor, Role, Widget};

/// Handle to a node in a [`WidgetTree`] (slot index + generation).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32, u32);

impl NodeId {
    pub(crate) const fn new(idx: u32, generation: u32) -> Self {
        Self(idx, generation)
    }

    const fn idx(self) -> usize {
        self.0 as usize
    }
}

struct Node {
    generation: u32,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    position: Point,
    size: Size,
    visible: bool,
    focused: bool,
    role: Role,
    widget: Box<dyn Widget>,
}

pub struct WidgetTree {
    nodes: Vec<Option<Node>>,
    // last generation per slot (persists across frees)
    generations: Vec<u32>,
    free_list: Vec<usize>,
    root: NodeId,
}

impl fmt::Debug for WidgetTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WidgetTree")
            .field("root", &self.root)
            .field("live_nodes", &self.len())
            .finish()
    }
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetTree {
    /// Create a tree holding only the root node.
    pub fn new() -> Self {
        let mut tree = Self {
            nodes: Vec::new(),
            generations: Vec::new(),
            free_list: Vec::new(),
            root: NodeId::new(0, 0),
        };
        tree.root = tree.alloc(None, Role::Leaf, Rect::default(), Box::new(Container));
        tree
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of live nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.children(self.root).is_empty()
    }

    /// Returns true if `id` refers to a live node.
    pub fn is_alive(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes
            .get(id.idx())
            .and_then(|n| n.as_ref())
            .filter(|n| n.generation == id.1)
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes
            .get_mut(id.idx())
            .and_then(|n| n.as_mut())
            .filter(|n| n.generation == id.1)
    }

    fn alloc(
        &mut self,
        parent: Option<NodeId>,
        role: Role,
        rect: Rect,
        widget: Box<dyn Widget>,
    ) -> NodeId {
        let node = |generation| Node {
            generation,
            parent,
            children: Vec::new(),
            position: rect.origin(),
            size: rect.size(),
            visible: true,
            focused: false,
            role,
            widget,
        };
        let (idx, generation) = if let Some(idx) = self.free_list.pop() {
            let generation = self.generations[idx].saturating_add(1);
            self.generations[idx] = generation;
            self.nodes[idx] = Some(node(generation));
            (idx, generation)
        } else {
            let generation = 1_u32;
            self.nodes.push(Some(node(generation)));
            self.generations.push(generation);
            (self.nodes.len() - 1, generation)
        };
        NodeId::new(idx as u32, generation)
    }

    /// Append a new node as the last (topmost) child of `parent`.
    ///
    /// Returns `None` when `parent` is stale.
    pub fn add_child<W: Widget + 'static>(
        &mut self,
        parent: NodeId,
        role: Role,
        rect: Rect,
        widget: W,
    ) -> Option<NodeId> {
        if !self.is_alive(parent) {
            return None;
        }
        let id = self.alloc(Some(parent), role, rect, Box::new(widget));
        if let Some(p) = self.node_mut(parent) {
            p.children.push(id);
        }
        Some(id)
    }

    /// Append a top-level window above every existing one.
    pub fn add_window<W: Widget + 'static>(&mut self, rect: Rect, modal: bool, widget: W) -> NodeId {
        let root = self.root;
        let id = self.alloc(Some(root), Role::Window { modal }, rect, Box::new(widget));
        if let Some(r) = self.node_mut(root) {
            r.children.push(id);
        }
        id
    }

    /// Append a popup owned by `owner` above every existing window.
    ///
    /// Returns `None` when `owner` is stale.
    pub fn add_popup<W: Widget + 'static>(
        &mut self,
        owner: NodeId,
        rect: Rect,
        widget: W,
    ) -> Option<NodeId> {
        if !self.is_alive(owner) {
            return None;
        }
        let root = self.root;
        self.add_child(root, Role::Popup { owner }, rect, widget)
    }

    /// Remove `id` and its whole subtree. Stale ids and the root are ignored.
    pub fn remove(&mut self, id: NodeId) -> bool {
        if id == self.root || !self.is_alive(id) {
            return false;
        }
        if let Some(parent) = self.parent(id)
            && let Some(p) = self.node_mut(parent)
        {
            p.children.retain(|c| *c != id);
        }
        self.free_subtree(id);
        true
    }

    fn free_subtree(&mut self, id: NodeId) {
        let children = match self.node_mut(id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            self.free_subtree(child);
        }
        self.nodes[id.idx()] = None;
        self.free_list.push(id.idx());
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    /// Children back-to-front; empty for stale ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    pub(crate) fn children_mut(&mut self, id: NodeId) -> Option<&mut Vec<NodeId>> {
        self.node_mut(id).map(|n| &mut n.children)
    }

    pub fn role(&self, id: NodeId) -> Option<Role> {
        self.node(id).map(|n| n.role)
    }

    pub fn position(&self, id: NodeId) -> Point {
        self.node(id).map(|n| n.position).unwrap_or_default()
    }

    pub fn set_position(&mut self, id: NodeId, position: Point) {
        if let Some(n) = self.node_mut(id) {
            n.position = position;
        }
    }

    pub fn size(&self, id: NodeId) -> Size {
        self.node(id).map(|n| n.size).unwrap_or_default()
    }

    pub fn set_size(&mut self, id: NodeId, size: Size) {
        if let Some(n) = self.node_mut(id) {
            n.size = size;
        }
    }

    pub fn is_visible(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.visible)
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(n) = self.node_mut(id) {
            n.visible = visible;
        }
    }

    pub fn is_focused(&self, id: NodeId) -> bool {
        self.node(id).is_some_and(|n| n.focused)
    }

    pub(crate) fn set_focused(&mut self, id: NodeId, focused: bool) {
        if let Some(n) = self.node_mut(id) {
            n.focused = focused;
        }
    }

    /// Position of `id` in root coordinates.
    pub fn absolute_position(&self, id: NodeId) -> Point {
        let mut pos = Point::ZERO;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let Some(node) = self.node(current) else {
                break;
            };
            pos += node.position;
            cursor = node.parent;
        }
        pos
    }

    pub fn absolute_rect(&self, id: NodeId) -> Rect {
        Rect::from_parts(self.absolute_position(id), self.size(id))
    }

    /// Whether `p`, given in the parent's coordinate space, lies inside `id`.
    pub fn contains(&self, id: NodeId, p: Point) -> bool {
        self.node(id)
            .is_some_and(|n| Rect::from_parts(n.position, n.size).contains(p))
    }

    pub fn cursor(&self, id: NodeId) -> Cursor {
        self.node(id).map(|n| n.widget.cursor()).unwrap_or_default()
    }

    pub fn tooltip(&self, id: NodeId) -> &str {
        self.node(id).map(|n| n.widget.tooltip()).unwrap_or("")
    }

    pub fn preferred_size(&self, id: NodeId) -> Size {
        self.node(id)
            .map(|n| n.widget.preferred_size())
            .unwrap_or_default()
    }

    pub fn widget(&self, id: NodeId) -> Option<&dyn Widget> {
        self.node(id).map(|n| n.widget.as_ref())
    }

    pub fn widget_mut(&mut self, id: NodeId) -> Option<&mut dyn Widget> {
        let node = self.node_mut(id)?;
        let widget: &mut dyn Widget = node.widget.as_mut();
        Some(widget)
    }

    /// `id` and every ancestor below the root, leaf first.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            if current == self.root || !self.is_alive(current) {
                break;
            }
            chain.push(current);
            cursor = self.parent(current);
        }
        chain
    }

    /// Deepest visible node containing `p` (root coordinates), possibly the
    /// root itself. `None` when `p` lies outside the root.
    pub fn hit_test(&self, p: Point) -> Option<NodeId> {
        if !self.contains(self.root, p) {
            return None;
        }
        let mut current = self.root;
        let mut local = p;
        'descend: loop {
            local -= self.position(current);
            for &child in self.children(current).iter().rev() {
                if self.is_visible(child) && self.contains(child, local) {
                    current = child;
                    continue 'descend;
                }
            }
            return Some(current);
        }
    }

    /// Route a button event below `id`. `p` is in `id`'s parent space.
    pub fn route_button(
        &mut self,
        id: NodeId,
        p: Point,
        button: MouseButton,
        down: bool,
        modifiers: Modifiers,
    ) -> HandlerResult {
        let local = p - self.position(id);
        for child in self.children(id).to_vec().into_iter().rev() {
            if self.is_visible(child)
                && self.contains(child, local)
                && self.route_button(child, local, button, down, modifiers)?
            {
                return Ok(true);
            }
        }
        match self.widget_mut(id) {
            Some(w) => w.mouse_button(p, button, down, modifiers),
            None => Ok(false),
        }
    }

    /// Route a scroll event below `id`. `p` is in `id`'s parent space.
    pub fn route_scroll(&mut self, id: NodeId, p: Point, delta: Vec2) -> HandlerResult {
        let local = p - self.position(id);
        for child in self.children(id).to_vec().into_iter().rev() {
            if self.is_visible(child)
                && self.contains(child, local)
                && self.route_scroll(child, local, delta)?
            {
                return Ok(true);
            }
        }
        match self.widget_mut(id) {
            Some(w) => w.scroll(p, delta),
            None => Ok(false),
        }
    }

    /// Route pointer motion below `id`, emitting enter/leave notifications for
    /// children whose containment changed between `p - rel` and `p`.
    pub fn route_motion(
        &mut self,
        id: NodeId,
        p: Point,
        rel: Point,
        buttons: Buttons,
        modifiers: Modifiers,
    ) -> HandlerResult {
        let local = p - self.position(id);
        for child in self.children(id).to_vec().into_iter().rev() {
            if !self.is_visible(child) {
                continue;
            }
            let contained = self.contains(child, local);
            let prev_contained = self.contains(child, local - rel);
            if contained != prev_contained
                && let Some(w) = self.widget_mut(child)
            {
                w.mouse_enter(local, contained)?;
            }
            if (contained || prev_contained)
                && self.route_motion(child, local, rel, buttons, modifiers)?
            {
                return Ok(true);
            }
        }
        match self.widget_mut(id) {
            Some(w) => w.mouse_motion(p, rel, buttons, modifiers),
            None => Ok(false),
        }
    }

    /// Paint every visible node back-to-front.
    pub fn draw(&self, canvas: &mut dyn Canvas) {
        self.draw_node(self.root, Point::ZERO, canvas);
    }

    fn draw_node(&self, id: NodeId, origin: Point, canvas: &mut dyn Canvas) {
        let Some(node) = self.node(id) else {
            return;
        };
        if !node.visible {
            return;
        }
        let rect = Rect::from_parts(origin + node.position, node.size);
        node.widget.draw(canvas, rect);
        for &child in &node.children {
            self.draw_node(child, rect.origin(), canvas);
        }
    }
}
