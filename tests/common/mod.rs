#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use widget_screen::{
    Buttons, Canvas, Color, Cursor, HandlerResult, HeadlessBackend, KeyEvent, Modifiers,
    MouseButton, Point, Rect, Screen, ScreenConfig, Size, TextBounds, Tooltip, Vec2, Widget,
    WidgetError,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Focus(bool),
    Key(i32),
    Char(char),
    Button { pos: Point, down: bool },
    Motion { pos: Point, rel: Point },
    Drag { pos: Point, rel: Point },
    Enter(bool),
    Scroll(Vec2),
}

pub type Log = Rc<RefCell<Vec<(&'static str, Call)>>>;

pub fn new_log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

/// Calls recorded for the widget named `name`, oldest first.
pub fn calls(log: &Log, name: &str) -> Vec<Call> {
    log.borrow()
        .iter()
        .filter(|(n, _)| *n == name)
        .map(|(_, c)| c.clone())
        .collect()
}

/// Widget that records every notification and consumes what it is told to.
pub struct Recorder {
    name: &'static str,
    log: Log,
    consume_keys: bool,
    consume_buttons: bool,
    consume_drag: bool,
    consume_scroll: bool,
    fail_drag: bool,
    cursor: Cursor,
    tooltip: String,
}

impl Recorder {
    pub fn new(name: &'static str, log: &Log) -> Self {
        Self {
            name,
            log: Rc::clone(log),
            consume_keys: false,
            consume_buttons: false,
            consume_drag: false,
            consume_scroll: false,
            fail_drag: false,
            cursor: Cursor::Arrow,
            tooltip: String::new(),
        }
    }

    pub fn consuming_keys(mut self) -> Self {
        self.consume_keys = true;
        self
    }

    pub fn consuming_buttons(mut self) -> Self {
        self.consume_buttons = true;
        self
    }

    pub fn consuming_drag(mut self) -> Self {
        self.consume_drag = true;
        self
    }

    pub fn consuming_scroll(mut self) -> Self {
        self.consume_scroll = true;
        self
    }

    pub fn failing_drag(mut self) -> Self {
        self.fail_drag = true;
        self
    }

    pub fn with_cursor(mut self, cursor: Cursor) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn with_tooltip(mut self, tooltip: &str) -> Self {
        self.tooltip = tooltip.to_string();
        self
    }

    fn record(&self, call: Call) {
        self.log.borrow_mut().push((self.name, call));
    }
}

impl Widget for Recorder {
    fn cursor(&self) -> Cursor {
        self.cursor
    }

    fn tooltip(&self) -> &str {
        &self.tooltip
    }

    fn focus_changed(&mut self, focused: bool) -> HandlerResult {
        self.record(Call::Focus(focused));
        Ok(false)
    }

    fn key(&mut self, event: &KeyEvent) -> HandlerResult {
        self.record(Call::Key(event.key));
        Ok(self.consume_keys)
    }

    fn character(&mut self, codepoint: char) -> HandlerResult {
        self.record(Call::Char(codepoint));
        Ok(self.consume_keys)
    }

    fn mouse_button(
        &mut self,
        pos: Point,
        _button: MouseButton,
        down: bool,
        _modifiers: Modifiers,
    ) -> HandlerResult {
        self.record(Call::Button { pos, down });
        Ok(self.consume_buttons)
    }

    fn mouse_motion(
        &mut self,
        pos: Point,
        rel: Point,
        _buttons: Buttons,
        _modifiers: Modifiers,
    ) -> HandlerResult {
        self.record(Call::Motion { pos, rel });
        Ok(false)
    }

    fn mouse_drag(
        &mut self,
        pos: Point,
        rel: Point,
        _buttons: Buttons,
        _modifiers: Modifiers,
    ) -> HandlerResult {
        self.record(Call::Drag { pos, rel });
        if self.fail_drag {
            return Err(WidgetError::msg("drag handler failed"));
        }
        Ok(self.consume_drag)
    }

    fn mouse_enter(&mut self, _pos: Point, entered: bool) -> HandlerResult {
        self.record(Call::Enter(entered));
        Ok(false)
    }

    fn scroll(&mut self, _pos: Point, delta: Vec2) -> HandlerResult {
        self.record(Call::Scroll(delta));
        Ok(self.consume_scroll)
    }
}

/// Headless screen with no pointer correction, so native == logical.
pub fn screen(width: i32, height: i32) -> Screen<HeadlessBackend> {
    let config = ScreenConfig::new(Size::new(width, height), "test")
        .with_pointer_correction(Point::ZERO);
    Screen::new(config).expect("headless screen")
}

/// Press and release the left button at the current pointer position.
pub fn click(screen: &mut Screen<HeadlessBackend>, x: f64, y: f64) {
    screen.pointer_move(x, y);
    screen.pointer_button(MouseButton::Left, true, Modifiers::empty());
    screen.pointer_button(MouseButton::Left, false, Modifiers::empty());
}

/// Canvas with fixed metrics (one unit per char, one per line) that keeps
/// every tooltip it is asked to draw.
#[derive(Default)]
pub struct RecordingCanvas {
    pub frames: usize,
    pub tooltips: Vec<Tooltip>,
    pub fills: Vec<Rect>,
}

impl Canvas for RecordingCanvas {
    fn begin_frame(&mut self, _size: Size, _pixel_ratio: f32, _background: Color) {
        self.frames += 1;
    }

    fn text_bounds(&mut self, origin: Point, text: &str) -> TextBounds {
        let width = text.chars().count() as f32;
        TextBounds {
            min_x: origin.x as f32,
            min_y: origin.y as f32,
            max_x: origin.x as f32 + width,
            max_y: origin.y as f32 + 1.0,
        }
    }

    fn text_box_bounds(&mut self, origin: Point, wrap_width: i32, text: &str) -> TextBounds {
        let count = text.chars().count() as f32;
        let lines = (count / wrap_width as f32).ceil().max(1.0);
        let half = wrap_width as f32 / 2.0;
        TextBounds {
            min_x: origin.x as f32 - half,
            min_y: origin.y as f32,
            max_x: origin.x as f32 + half,
            max_y: origin.y as f32 + lines,
        }
    }

    fn fill_rect(&mut self, rect: Rect, _color: Color) {
        self.fills.push(rect);
    }

    fn stroke_rect(&mut self, _rect: Rect, _color: Color) {}

    fn draw_text(&mut self, _origin: Point, _text: &str, _color: Color) {}

    fn draw_tooltip(&mut self, tooltip: &Tooltip) {
        self.tooltips.push(tooltip.clone());
    }
}
