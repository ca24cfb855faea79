use crate::event::{Buttons, Modifiers, MouseButton};
use crate::geometry::Point;
use crate::tree::{NodeId, WidgetTree};
use crate::widget::Cursor;

/// Interaction state owned by a screen for its whole lifetime.
#[derive(Debug, Clone, Copy)]
pub struct ScreenState {
    mouse_pos: Point,
    buttons: Buttons,
    modifiers: Modifiers,
    drag_target: Option<NodeId>,
    last_interaction: f64,
    cursor: Cursor,
    events_enabled: bool,
    visible: bool,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self::new(0.0)
    }
}

impl ScreenState {
    pub fn new(now: f64) -> Self {
        Self {
            mouse_pos: Point::ZERO,
            buttons: Buttons::empty(),
            modifiers: Modifiers::empty(),
            drag_target: None,
            last_interaction: now,
            cursor: Cursor::Arrow,
            events_enabled: true,
            visible: false,
        }
    }

    pub fn mouse_pos(&self) -> Point {
        self.mouse_pos
    }

    pub(crate) fn set_mouse_pos(&mut self, pos: Point) {
        self.mouse_pos = pos;
    }

    pub fn buttons(&self) -> Buttons {
        self.buttons
    }

    pub(crate) fn press(&mut self, button: MouseButton) {
        self.buttons.insert(button.mask());
    }

    pub(crate) fn release(&mut self, button: MouseButton) {
        self.buttons.remove(button.mask());
    }

    pub fn modifiers(&self) -> Modifiers {
        self.modifiers
    }

    pub(crate) fn set_modifiers(&mut self, modifiers: Modifiers) {
        self.modifiers = modifiers;
    }

    /// A drag is active exactly when a drag target is held.
    pub fn drag_active(&self) -> bool {
        self.drag_target.is_some()
    }

    pub fn drag_target(&self) -> Option<NodeId> {
        self.drag_target
    }

    pub(crate) fn begin_drag(&mut self, target: NodeId) {
        self.drag_target = Some(target);
    }

    pub(crate) fn end_drag(&mut self) {
        self.drag_target = None;
    }

    /// Drop the drag target if it no longer resolves in `tree`.
    pub(crate) fn scrub_drag(&mut self, tree: &WidgetTree) -> bool {
        match self.drag_target {
            Some(id) if !tree.is_alive(id) => {
                tracing::debug!(node = ?id, "dropping stale drag target");
                self.drag_target = None;
                true
            }
            _ => false,
        }
    }

    pub fn last_interaction(&self) -> f64 {
        self.last_interaction
    }

    pub(crate) fn touch(&mut self, now: f64) {
        self.last_interaction = now;
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Record `cursor`; returns true when it differs from the installed one.
    pub(crate) fn swap_cursor(&mut self, cursor: Cursor) -> bool {
        if self.cursor == cursor {
            return false;
        }
        self.cursor = cursor;
        true
    }

    pub fn events_enabled(&self) -> bool {
        self.events_enabled
    }

    pub fn set_events_enabled(&mut self, enabled: bool) {
        self.events_enabled = enabled;
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) -> bool {
        if self.visible == visible {
            return false;
        }
        self.visible = visible;
        true
    }
}
