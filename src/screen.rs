//! The screen: single entry point for raw input.
//!
//! A `Screen` owns the widget tree, the focus path, the drag target and the
//! window stack, and keeps them consistent while translating raw backend events
//! into widget notifications. One event is processed to completion before the
//! next is accepted.
//!
//! Widget handlers report failures through [`HandlerResult`]. Each public
//! dispatch operation settles that result at its boundary: errors are logged
//! and the event is reported as not consumed. State mutated before the failure
//! stays mutated.

use std::fmt;
use std::path::PathBuf;

use crate::backend::{Backend, WindowHandle};
use crate::canvas::Canvas;
use crate::config::ScreenConfig;
use crate::error::{HandlerResult, ScreenError};
use crate::event::{KeyEvent, Modifiers, MouseButton, RawEvent};
use crate::focus::FocusPath;
use crate::geometry::{Point, Size, Vec2};
use crate::state::ScreenState;
use crate::tooltip::{Tooltip, tooltip_alpha};
use crate::tree::{NodeId, WidgetTree};
use crate::widget::{Cursor, Widget};
use crate::window_stack::WindowStack;

pub type ResizeCallback = Box<dyn FnMut(Size) -> HandlerResult<()>>;
pub type DropCallback = Box<dyn FnMut(&[PathBuf]) -> HandlerResult>;

pub struct Screen<B: Backend> {
    backend: B,
    config: ScreenConfig,
    tree: WidgetTree,
    focus: FocusPath,
    state: ScreenState,
    size: Size,
    fb_size: Size,
    pixel_ratio: f32,
    caption: String,
    resize_callback: Option<ResizeCallback>,
    drop_callback: Option<DropCallback>,
}

impl<B: Backend> fmt::Debug for Screen<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Screen")
            .field("handle", &self.backend.handle())
            .field("size", &self.size)
            .field("fb_size", &self.fb_size)
            .field("pixel_ratio", &self.pixel_ratio)
            .field("caption", &self.caption)
            .field("state", &self.state)
            .field("focus", &self.focus)
            .field("tree", &self.tree)
            .finish_non_exhaustive()
    }
}

impl<B: Backend> Screen<B> {
    /// Open a backend window for `config` and build a screen on top of it.
    pub fn new(config: ScreenConfig) -> Result<Self, ScreenError> {
        config.validate()?;
        let backend = B::open(&config)?;
        Self::with_backend(backend, config)
    }

    /// Build a screen on an already opened backend.
    pub fn with_backend(mut backend: B, config: ScreenConfig) -> Result<Self, ScreenError> {
        config.validate()?;
        let pixel_ratio = backend.pixel_ratio();
        if !pixel_ratio.is_finite() || pixel_ratio <= 0.0 {
            return Err(ScreenError::Context {
                major: config.api_version.0,
                minor: config.api_version.1,
                reason: format!("backend reported pixel ratio {pixel_ratio}"),
            });
        }

        let size = backend.window_size();
        if config.scale_by_pixel_ratio && pixel_ratio != 1.0 && !config.fullscreen {
            backend.set_window_size(size.scale(pixel_ratio));
        }
        let fb_size = backend.framebuffer_size();

        let mut state = ScreenState::new(backend.now_secs());
        state.set_visible(backend.is_shown());

        let mut tree = WidgetTree::new();
        let root = tree.root();
        tree.set_size(root, size);

        tracing::debug!(
            handle = ?backend.handle(),
            ?size,
            ?fb_size,
            pixel_ratio,
            "screen initialised"
        );

        Ok(Self {
            caption: config.caption.clone(),
            backend,
            config,
            tree,
            focus: FocusPath::new(),
            state,
            size,
            fb_size,
            pixel_ratio,
            resize_callback: None,
            drop_callback: None,
        })
    }

    pub fn handle(&self) -> WindowHandle {
        self.backend.handle()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn config(&self) -> &ScreenConfig {
        &self.config
    }

    pub fn tree(&self) -> &WidgetTree {
        &self.tree
    }

    /// Direct tree access for building the UI. Removing nodes through this
    /// bypasses focus/drag scrubbing; prefer [`Screen::dispose_window`].
    pub fn tree_mut(&mut self) -> &mut WidgetTree {
        &mut self.tree
    }

    pub fn root(&self) -> NodeId {
        self.tree.root()
    }

    pub fn focus_path(&self) -> &FocusPath {
        &self.focus
    }

    pub fn state(&self) -> &ScreenState {
        &self.state
    }

    /// Logical size.
    pub fn size(&self) -> Size {
        self.size
    }

    pub fn framebuffer_size(&self) -> Size {
        self.fb_size
    }

    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn caption(&self) -> &str {
        &self.caption
    }

    pub fn visible(&self) -> bool {
        self.state.visible()
    }

    /// Window stack, back to front.
    pub fn window_order(&self) -> &[NodeId] {
        self.tree.children(self.tree.root())
    }

    pub fn set_events_enabled(&mut self, enabled: bool) {
        self.state.set_events_enabled(enabled);
    }

    pub fn set_resize_callback<F>(&mut self, callback: F)
    where
        F: FnMut(Size) -> HandlerResult<()> + 'static,
    {
        self.resize_callback = Some(Box::new(callback));
    }

    pub fn clear_resize_callback(&mut self) {
        self.resize_callback = None;
    }

    pub fn set_drop_callback<F>(&mut self, callback: F)
    where
        F: FnMut(&[PathBuf]) -> HandlerResult + 'static,
    {
        self.drop_callback = Some(Box::new(callback));
    }

    fn touch(&mut self) {
        let now = self.backend.now_secs();
        self.state.touch(now);
    }

    fn settle(&self, op: &'static str, result: HandlerResult) -> bool {
        match result {
            Ok(consumed) => consumed,
            Err(err) => {
                tracing::error!(op, error = %err, "caught error in event handler");
                false
            }
        }
    }

    fn install_cursor(&mut self, cursor: Cursor) {
        if self.state.swap_cursor(cursor) {
            tracing::trace!(?cursor, "installing cursor");
            self.backend.set_cursor(cursor);
        }
    }

    /// Absolute position of `id`'s parent; drag-local coordinates are
    /// relative to it.
    fn parent_origin(&self, id: NodeId) -> Point {
        self.tree
            .parent(id)
            .map(|p| self.tree.absolute_position(p))
            .unwrap_or_default()
    }

    /// A modal window at the top of the focus path swallows pointer input
    /// landing outside it.
    fn modal_blocks(&self) -> bool {
        let Some(top) = self.focus.outermost() else {
            return false;
        };
        if !self.tree.role(top).is_some_and(|r| r.is_modal()) {
            return false;
        }
        !self
            .tree
            .absolute_rect(top)
            .contains(self.state.mouse_pos())
    }

    /// Dispatch one raw backend event. Returns whether it was consumed.
    pub fn process_event(&mut self, event: RawEvent) -> bool {
        if !self.state.events_enabled() {
            return false;
        }
        match event {
            RawEvent::PointerMove { x, y } => self.pointer_move(x, y),
            RawEvent::PointerButton {
                button,
                pressed,
                modifiers,
            } => self.pointer_button(button, pressed, modifiers),
            RawEvent::Wheel { dx, dy, flipped } => {
                if flipped {
                    self.scroll(-dx, -dy)
                } else {
                    self.scroll(dx, dy)
                }
            }
            RawEvent::Key(key) => self.key(key),
            RawEvent::Text(text) => {
                let mut consumed = false;
                for ch in text.chars() {
                    consumed |= self.character(ch);
                }
                consumed
            }
            RawEvent::Resize { width, height } => self.resize(Size::new(width, height)),
            RawEvent::Close => {
                self.set_visible(false);
                false
            }
            RawEvent::Drop(paths) => self.drop_files(&paths),
        }
    }

    /// Pointer moved to native coordinates `(x, y)`.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        let mut p = Point::new(x as i32, y as i32);
        if self.config.scale_by_pixel_ratio {
            p = Point::new(
                (p.x as f32 / self.pixel_ratio) as i32,
                (p.y as f32 / self.pixel_ratio) as i32,
            );
        }
        p -= self.config.pointer_correction;
        self.touch();
        let result = self.dispatch_pointer_move(p);
        self.settle("pointer_move", result)
    }

    fn dispatch_pointer_move(&mut self, p: Point) -> HandlerResult {
        self.state.scrub_drag(&self.tree);
        let rel = p - self.state.mouse_pos();
        let buttons = self.state.buttons();
        let modifiers = self.state.modifiers();
        let mut consumed = false;

        match self.state.drag_target() {
            None => {
                if let Some(hit) = self.tree.hit_test(p) {
                    let cursor = self.tree.cursor(hit);
                    self.install_cursor(cursor);
                }
            }
            Some(target) => {
                let local = p - self.parent_origin(target);
                if let Some(w) = self.tree.widget_mut(target) {
                    consumed = w.mouse_drag(local, rel, buttons, modifiers)?;
                }
            }
        }

        if !consumed {
            let root = self.tree.root();
            consumed = self.tree.route_motion(root, p, rel, buttons, modifiers)?;
        }

        self.state.set_mouse_pos(p);
        Ok(consumed)
    }

    /// Button pressed or released at the current pointer position.
    pub fn pointer_button(
        &mut self,
        button: MouseButton,
        pressed: bool,
        modifiers: Modifiers,
    ) -> bool {
        self.state.set_modifiers(modifiers);
        self.touch();
        let result = self.dispatch_pointer_button(button, pressed);
        self.settle("pointer_button", result)
    }

    fn dispatch_pointer_button(&mut self, button: MouseButton, pressed: bool) -> HandlerResult {
        if self.modal_blocks() {
            return Ok(false);
        }
        if pressed {
            self.state.press(button);
        } else {
            self.state.release(button);
        }
        self.state.scrub_drag(&self.tree);

        let pos = self.state.mouse_pos();
        let modifiers = self.state.modifiers();
        let root = self.tree.root();
        let hit = self.tree.hit_test(pos);

        // The drag target always sees its release, wherever the pointer is.
        if !pressed
            && let Some(target) = self.state.drag_target()
            && hit != Some(target)
        {
            let local = pos - self.parent_origin(target);
            if let Some(w) = self.tree.widget_mut(target) {
                w.mouse_button(local, button, false, modifiers)?;
            }
        }

        if let Some(hit) = hit {
            let cursor = self.tree.cursor(hit);
            self.install_cursor(cursor);
        }

        if pressed {
            match hit.filter(|id| *id != root) {
                Some(target) => {
                    self.state.begin_drag(target);
                    if button == MouseButton::Left && !self.tree.is_focused(target) {
                        self.update_focus(Some(target))?;
                    }
                }
                None => {
                    self.state.end_drag();
                    self.update_focus(None)?;
                }
            }
        } else {
            self.state.end_drag();
        }

        self.tree.route_button(root, pos, button, pressed, modifiers)
    }

    /// Scroll by `(dx, dy)` at the current pointer position.
    pub fn scroll(&mut self, dx: f32, dy: f32) -> bool {
        self.touch();
        if self.modal_blocks() {
            return false;
        }
        let root = self.tree.root();
        let pos = self.state.mouse_pos();
        let result = self.tree.route_scroll(root, pos, Vec2::new(dx, dy));
        self.settle("scroll", result)
    }

    pub fn key(&mut self, event: KeyEvent) -> bool {
        self.touch();
        let result = self.deliver_along_focus(|w| w.key(&event));
        self.settle("key", result)
    }

    pub fn character(&mut self, codepoint: char) -> bool {
        self.touch();
        let result = self.deliver_along_focus(|w| w.character(codepoint));
        self.settle("character", result)
    }

    /// Offer a keyboard notification along the focus path, outermost first,
    /// skipping the entry recorded as the enclosing window. Only widgets that
    /// still report focus are asked; the first consumer wins.
    fn deliver_along_focus<F>(&mut self, mut deliver: F) -> HandlerResult
    where
        F: FnMut(&mut dyn Widget) -> HandlerResult,
    {
        let window = self.focus.window();
        let targets: Vec<NodeId> = self
            .focus
            .entries()
            .iter()
            .rev()
            .copied()
            .filter(|id| Some(*id) != window)
            .collect();
        for id in targets {
            if !self.tree.is_focused(id) {
                continue;
            }
            if let Some(w) = self.tree.widget_mut(id)
                && deliver(w)?
            {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Hand a batch of dropped files to the drop callback.
    pub fn drop_files(&mut self, paths: &[PathBuf]) -> bool {
        let result = match self.drop_callback.as_mut() {
            Some(callback) => callback(paths),
            None => Ok(false),
        };
        self.settle("drop", result)
    }

    /// The native window now measures `size`.
    pub fn resize(&mut self, size: Size) -> bool {
        let fb_size = self.backend.framebuffer_size();
        let logical = if self.config.scale_by_pixel_ratio {
            size.unscale(self.pixel_ratio)
        } else {
            size
        };
        if self.fb_size.is_degenerate() || logical.is_degenerate() {
            tracing::debug!(previous = ?self.fb_size, ?logical, "ignoring degenerate resize");
            return false;
        }

        self.fb_size = fb_size;
        self.size = logical;
        let root = self.tree.root();
        self.tree.set_size(root, logical);
        self.touch();

        let result = match self.resize_callback.as_mut() {
            Some(callback) => callback(logical).map(|()| true),
            None => Ok(false),
        };
        self.settle("resize", result)
    }

    /// Move keyboard focus to `widget` (or clear it), raising its window.
    pub fn set_focus(&mut self, widget: Option<NodeId>) {
        if let Err(err) = self.update_focus(widget) {
            tracing::error!(error = %err, "caught error in focus handler");
        }
    }

    fn update_focus(&mut self, widget: Option<NodeId>) -> HandlerResult<()> {
        let result = self.focus.update(&mut self.tree, widget);
        if let Some(window) = self.focus.window() {
            self.move_to_front(window);
        }
        result.map(|_| ())
    }

    /// Raise `window`, and the popups it owns, to the top of the stack.
    pub fn move_to_front(&mut self, window: NodeId) {
        WindowStack::new(&mut self.tree).bring_to_front(window);
    }

    /// Remove `window` from the tree. A focus path running through it is
    /// dropped entirely, and a drag targeting it (or anything inside it) ends.
    /// Unknown ids are ignored.
    pub fn dispose_window(&mut self, window: NodeId) {
        if self.focus.contains(window) {
            self.focus.clear_silently(&mut self.tree);
        }
        if self.state.drag_target() == Some(window) {
            self.state.end_drag();
        }
        let removed = self.tree.remove(window);
        self.state.scrub_drag(&self.tree);
        tracing::debug!(window_id = ?window, removed, "disposed window");
    }

    /// Centre `window` on the screen, sizing it to its preferred size first if
    /// it has none yet.
    pub fn center_window(&mut self, window: NodeId) {
        if !self.tree.is_alive(window) {
            return;
        }
        if self.tree.size(window) == Size::ZERO {
            let preferred = self.tree.preferred_size(window);
            self.tree.set_size(window, preferred);
        }
        let offset = (self.size - self.tree.size(window)) / 2;
        self.tree
            .set_position(window, Point::new(offset.width, offset.height));
    }

    pub fn set_visible(&mut self, visible: bool) {
        if self.state.set_visible(visible) {
            self.backend.set_visible(visible);
        }
    }

    pub fn set_caption(&mut self, caption: &str) {
        if caption != self.caption {
            self.backend.set_title(caption);
            self.caption = caption.to_string();
        }
    }

    /// Resize to logical `size`.
    pub fn set_size(&mut self, size: Size) {
        self.size = size;
        let root = self.tree.root();
        self.tree.set_size(root, size);
        let native = if self.config.scale_by_pixel_ratio {
            size.scale(self.pixel_ratio)
        } else {
            size
        };
        self.backend.set_window_size(native);
    }

    fn refresh_sizes(&mut self) {
        let fb_size = self.backend.framebuffer_size();
        let native = self.backend.window_size();
        if self.config.scale_by_pixel_ratio {
            self.size = native.unscale(self.pixel_ratio);
            self.fb_size = self.size.scale(self.pixel_ratio);
        } else {
            self.size = native;
            self.fb_size = fb_size;
            if native.width != 0 {
                self.pixel_ratio = fb_size.width as f32 / native.width as f32;
            }
        }
        let root = self.tree.root();
        self.tree.set_size(root, self.size);
    }

    /// Paint one frame: the widget tree, then the tooltip for the hovered
    /// widget once the pointer has been idle long enough.
    pub fn render_frame(&mut self, canvas: &mut dyn Canvas) {
        if !self.state.visible() {
            return;
        }
        self.refresh_sizes();
        canvas.begin_frame(self.size, self.pixel_ratio, self.config.background);
        self.tree.draw(canvas);
        if let Some(tooltip) = self.compose_tooltip(canvas) {
            canvas.draw_tooltip(&tooltip);
        }
        canvas.end_frame();
        self.backend.present();
    }

    fn compose_tooltip(&self, canvas: &mut dyn Canvas) -> Option<Tooltip> {
        let elapsed = self.backend.now_secs() - self.state.last_interaction();
        let alpha = tooltip_alpha(elapsed)?;
        let hit = self.tree.hit_test(self.state.mouse_pos())?;
        let text = self.tree.tooltip(hit);
        if text.is_empty() {
            return None;
        }
        Some(Tooltip::layout(
            canvas,
            self.tree.absolute_rect(hit),
            text,
            alpha,
            self.config.tooltip,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::HeadlessBackend;
    use crate::error::WidgetError;
    use crate::event::{KeyAction, keys};
    use crate::geometry::Rect;
    use crate::widget::{Container, Role};

    fn screen() -> Screen<HeadlessBackend> {
        let cfg = ScreenConfig::new(Size::new(200, 100), "test")
            .with_pointer_correction(Point::ZERO);
        Screen::new(cfg).unwrap()
    }

    struct Failing;

    impl Widget for Failing {
        fn mouse_button(
            &mut self,
            _pos: Point,
            _button: MouseButton,
            _down: bool,
            _modifiers: Modifiers,
        ) -> HandlerResult {
            Err(WidgetError::msg("button handler exploded"))
        }

        fn cursor(&self) -> Cursor {
            Cursor::Hand
        }
    }

    #[test]
    fn pointer_correction_and_ratio_are_applied() {
        let backend = HeadlessBackend::new(Size::new(100, 100)).with_pixel_ratio(2.0);
        let mut s = Screen::with_backend(backend, ScreenConfig::default()).unwrap();
        s.pointer_move(41.0, 81.0);
        // (41, 81) / 2 = (20, 40), minus (1, 2)
        assert_eq!(s.state().mouse_pos(), Point::new(19, 38));
        // the native window was enlarged to keep the logical size
        assert_eq!(s.backend().window_size(), Size::new(200, 200));
    }

    #[test]
    fn handler_errors_are_reported_as_unconsumed() {
        let mut s = screen();
        let w = s
            .tree_mut()
            .add_window(Rect::new(0, 0, 50, 50), false, Failing);
        s.pointer_move(10.0, 10.0);
        assert!(!s.pointer_button(MouseButton::Left, true, Modifiers::empty()));
        // state changes made before the failure stay in place
        assert_eq!(s.state().drag_target(), Some(w));
        assert_eq!(s.state().cursor(), Cursor::Hand);
    }

    #[test]
    fn press_on_empty_space_clears_focus_and_drag() {
        let mut s = screen();
        let w = s
            .tree_mut()
            .add_window(Rect::new(0, 0, 50, 50), false, Container);
        s.set_focus(Some(w));
        s.pointer_move(150.0, 80.0);
        s.pointer_button(MouseButton::Left, true, Modifiers::empty());
        assert!(s.focus_path().is_empty());
        assert!(!s.state().drag_active());
        assert!(!s.tree().is_focused(w));
    }

    #[test]
    fn disabled_events_are_ignored() {
        let mut s = screen();
        s.set_events_enabled(false);
        assert!(!s.process_event(RawEvent::PointerMove { x: 5.0, y: 5.0 }));
        assert_eq!(s.state().mouse_pos(), Point::ZERO);
    }

    #[test]
    fn close_hides_window() {
        let mut s = screen();
        assert!(s.visible());
        assert!(!s.process_event(RawEvent::Close));
        assert!(!s.visible());
        assert!(!s.backend().is_shown());
    }

    #[test]
    fn caption_changes_reach_backend_once() {
        let mut s = screen();
        s.set_caption("test");
        assert_eq!(s.backend().title(), "test");
        s.set_caption("renamed");
        assert_eq!(s.backend().title(), "renamed");
        assert_eq!(s.caption(), "renamed");
    }

    #[test]
    fn center_window_uses_preferred_size() {
        struct Preferred;
        impl Widget for Preferred {
            fn preferred_size(&self) -> Size {
                Size::new(40, 20)
            }
        }
        let mut s = screen();
        let w = s.tree_mut().add_window(Rect::default(), false, Preferred);
        s.center_window(w);
        assert_eq!(s.tree().size(w), Size::new(40, 20));
        assert_eq!(s.tree().position(w), Point::new(80, 40));
    }

    #[test]
    fn entries_no_longer_focused_are_skipped() {
        use std::cell::Cell;
        use std::rc::Rc;

        struct Keys(Rc<Cell<u32>>);
        impl Widget for Keys {
            fn key(&mut self, _event: &KeyEvent) -> HandlerResult {
                self.0.set(self.0.get() + 1);
                Ok(true)
            }
        }

        let count = Rc::new(Cell::new(0));
        let mut s = screen();
        let w = s
            .tree_mut()
            .add_window(Rect::new(0, 0, 50, 50), false, Container);
        let leaf = s
            .tree_mut()
            .add_child(w, Role::Leaf, Rect::new(0, 0, 5, 5), Keys(Rc::clone(&count)))
            .unwrap();
        s.set_focus(Some(leaf));
        let ev = KeyEvent::new(keys::ENTER, KeyAction::Press, Modifiers::empty());
        assert!(s.key(ev));
        assert_eq!(count.get(), 1);

        s.tree.set_focused(leaf, false);
        assert!(!s.key(ev));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn key_without_focus_is_not_consumed() {
        let mut s = screen();
        let root = s.root();
        s.tree_mut()
            .add_child(root, Role::Leaf, Rect::new(0, 0, 5, 5), Container)
            .unwrap();
        let ev = KeyEvent::new(keys::ENTER, KeyAction::Press, Modifiers::empty());
        assert!(!s.key(ev));
    }
}
