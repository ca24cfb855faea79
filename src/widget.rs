//! Widget capability trait.
//!
//! Everything the dispatcher needs from a widget goes through this trait.
//! Positions handed to a widget are expressed in its parent's coordinate
//! space; every notification reports whether it consumed the event.

use crate::canvas::Canvas;
use crate::error::HandlerResult;
use crate::event::{Buttons, KeyEvent, Modifiers, MouseButton};
use crate::geometry::{Point, Rect, Size, Vec2};
use crate::tree::NodeId;

/// Pointer icon a widget asks for while hovered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Cursor {
    #[default]
    Arrow,
    IBeam,
    Crosshair,
    Hand,
    HResize,
    VResize,
}

/// What a tree node is, as far as focus and stacking are concerned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Role {
    #[default]
    Leaf,
    /// Top-level window. A modal window swallows pointer presses and scrolls
    /// that land outside it while it is on the focus path.
    Window { modal: bool },
    /// Transient window that must always stack above `owner`.
    Popup { owner: NodeId },
}

impl Role {
    pub fn is_window(&self) -> bool {
        matches!(self, Role::Window { .. } | Role::Popup { .. })
    }

    pub fn is_modal(&self) -> bool {
        matches!(self, Role::Window { modal: true })
    }

    pub fn owner(&self) -> Option<NodeId> {
        match self {
            Role::Popup { owner } => Some(*owner),
            _ => None,
        }
    }
}

pub trait Widget {
    fn cursor(&self) -> Cursor {
        Cursor::Arrow
    }

    fn tooltip(&self) -> &str {
        ""
    }

    fn preferred_size(&self) -> Size {
        Size::ZERO
    }

    fn focus_changed(&mut self, _focused: bool) -> HandlerResult {
        Ok(false)
    }

    fn key(&mut self, _event: &KeyEvent) -> HandlerResult {
        Ok(false)
    }

    fn character(&mut self, _codepoint: char) -> HandlerResult {
        Ok(false)
    }

    fn mouse_button(
        &mut self,
        _pos: Point,
        _button: MouseButton,
        _down: bool,
        _modifiers: Modifiers,
    ) -> HandlerResult {
        Ok(false)
    }

    fn mouse_motion(
        &mut self,
        _pos: Point,
        _rel: Point,
        _buttons: Buttons,
        _modifiers: Modifiers,
    ) -> HandlerResult {
        Ok(false)
    }

    /// Pointer motion while this widget holds drag capture. Delivered even
    /// when the pointer has left the widget's bounds.
    fn mouse_drag(
        &mut self,
        _pos: Point,
        _rel: Point,
        _buttons: Buttons,
        _modifiers: Modifiers,
    ) -> HandlerResult {
        Ok(false)
    }

    fn mouse_enter(&mut self, _pos: Point, _entered: bool) -> HandlerResult {
        Ok(false)
    }

    fn scroll(&mut self, _pos: Point, _delta: Vec2) -> HandlerResult {
        Ok(false)
    }

    fn draw(&self, _canvas: &mut dyn Canvas, _rect: Rect) {}
}

/// Widget that does nothing. Used for the root and for plain containers.
#[derive(Debug, Default, Clone, Copy)]
pub struct Container;

impl Widget for Container {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_handlers_do_not_consume() {
        let mut c = Container;
        assert!(!c.focus_changed(true).unwrap());
        assert!(!c.character('x').unwrap());
        assert!(
            !c.mouse_button(Point::ZERO, MouseButton::Left, true, Modifiers::empty())
                .unwrap()
        );
        assert_eq!(c.cursor(), Cursor::Arrow);
        assert!(c.tooltip().is_empty());
    }

    #[test]
    fn popup_counts_as_window() {
        let owner = NodeId::new(1, 1);
        let popup = Role::Popup { owner };
        assert!(popup.is_window());
        assert!(!popup.is_modal());
        assert_eq!(popup.owner(), Some(owner));
        assert!(Role::Window { modal: true }.is_modal());
        assert!(!Role::Leaf.is_window());
    }
}
