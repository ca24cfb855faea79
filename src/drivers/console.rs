use std::collections::VecDeque;
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, MouseButton as TermButton, MouseEvent,
    MouseEventKind,
};
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, SetSize, SetTitle};
use crossterm::{execute, terminal};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use super::keyboard::{KeyboardNormalizer, modifiers_from};
use super::{InputDriver, OutputDriver};
use crate::backend::{Backend, WindowHandle};
use crate::config::ScreenConfig;
use crate::error::ScreenError;
use crate::event::{MouseButton, RawEvent};
use crate::geometry::Size;
use crate::ui::TerminalCanvas;
use crate::widget::Cursor;

fn button_from(button: TermButton) -> MouseButton {
    match button {
        TermButton::Left => MouseButton::Left,
        TermButton::Right => MouseButton::Right,
        TermButton::Middle => MouseButton::Middle,
    }
}

/// Reads terminal events and normalises them into [`RawEvent`]s.
///
/// One terminal event can expand into several raw events (a click reports its
/// position and then the button), so translated events are queued.
pub struct ConsoleInputDriver {
    normalizer: KeyboardNormalizer,
    event_queue: VecDeque<RawEvent>,
}

impl Default for ConsoleInputDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleInputDriver {
    pub fn new() -> Self {
        Self {
            normalizer: KeyboardNormalizer::new(),
            event_queue: VecDeque::new(),
        }
    }

    pub fn translate(&mut self, evt: Event) -> Vec<RawEvent> {
        match evt {
            Event::Key(key) => self.normalizer.normalize(key),
            Event::Mouse(mouse) => translate_mouse(mouse),
            Event::Resize(cols, rows) => vec![RawEvent::Resize {
                width: i32::from(cols),
                height: i32::from(rows),
            }],
            Event::Paste(text) if !text.is_empty() => vec![RawEvent::Text(text)],
            _ => Vec::new(),
        }
    }

    fn read_internal(&mut self) -> io::Result<RawEvent> {
        loop {
            let evt = crossterm::event::read()?;
            let mut translated = self.translate(evt).into_iter();
            if let Some(first) = translated.next() {
                self.event_queue.extend(translated);
                return Ok(first);
            }
        }
    }
}

fn translate_mouse(mouse: MouseEvent) -> Vec<RawEvent> {
    let at = RawEvent::PointerMove {
        x: f64::from(mouse.column),
        y: f64::from(mouse.row),
    };
    let modifiers = modifiers_from(mouse.modifiers);
    let wheel = |dx: f32, dy: f32| RawEvent::Wheel {
        dx,
        dy,
        flipped: false,
    };
    match mouse.kind {
        MouseEventKind::Down(button) => vec![
            at,
            RawEvent::PointerButton {
                button: button_from(button),
                pressed: true,
                modifiers,
            },
        ],
        MouseEventKind::Up(button) => vec![
            at,
            RawEvent::PointerButton {
                button: button_from(button),
                pressed: false,
                modifiers,
            },
        ],
        MouseEventKind::Drag(_) | MouseEventKind::Moved => vec![at],
        MouseEventKind::ScrollUp => vec![at, wheel(0.0, 1.0)],
        MouseEventKind::ScrollDown => vec![at, wheel(0.0, -1.0)],
        MouseEventKind::ScrollLeft => vec![at, wheel(-1.0, 0.0)],
        MouseEventKind::ScrollRight => vec![at, wheel(1.0, 0.0)],
    }
}

impl InputDriver for ConsoleInputDriver {
    fn poll(&mut self, timeout: Duration) -> io::Result<bool> {
        if !self.event_queue.is_empty() {
            return Ok(true);
        }
        crossterm::event::poll(timeout)
    }

    fn read(&mut self) -> io::Result<RawEvent> {
        if let Some(evt) = self.event_queue.pop_front() {
            return Ok(evt);
        }
        self.read_internal()
    }

    fn set_mouse_capture(&mut self, enabled: bool) -> io::Result<()> {
        if enabled {
            execute!(io::stdout(), EnableMouseCapture)
        } else {
            execute!(io::stdout(), DisableMouseCapture)
        }
    }
}

/// The terminal as a native window: one cell per logical unit, pixel ratio 1.
///
/// Terminals cannot change the pointer shape, so cursor requests are only
/// remembered. Visibility is tracked locally.
#[derive(Debug)]
pub struct ConsoleBackend {
    handle: WindowHandle,
    size: Size,
    started: Instant,
    shown: bool,
    cursor: Cursor,
}

impl ConsoleBackend {
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }
}

impl Backend for ConsoleBackend {
    fn open(config: &ScreenConfig) -> Result<Self, ScreenError> {
        let (cols, rows) = terminal::size()?;
        execute!(io::stdout(), SetTitle(&config.caption))?;
        Ok(Self {
            handle: WindowHandle::next(),
            size: Size::new(i32::from(cols), i32::from(rows)),
            started: Instant::now(),
            shown: true,
            cursor: Cursor::Arrow,
        })
    }

    fn handle(&self) -> WindowHandle {
        self.handle
    }

    fn framebuffer_size(&self) -> Size {
        self.window_size()
    }

    fn window_size(&self) -> Size {
        terminal::size()
            .map(|(cols, rows)| Size::new(i32::from(cols), i32::from(rows)))
            .unwrap_or(self.size)
    }

    fn pixel_ratio(&self) -> f32 {
        1.0
    }

    fn ticks_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    fn is_shown(&self) -> bool {
        self.shown
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursor = cursor;
    }

    fn set_visible(&mut self, visible: bool) {
        self.shown = visible;
    }

    fn set_title(&mut self, title: &str) {
        if let Err(err) = execute!(io::stdout(), SetTitle(title)) {
            tracing::warn!(error = %err, "failed to set terminal title");
        }
    }

    fn set_window_size(&mut self, size: Size) {
        let cols = size.width.clamp(1, i32::from(u16::MAX)) as u16;
        let rows = size.height.clamp(1, i32::from(u16::MAX)) as u16;
        match execute!(io::stdout(), SetSize(cols, rows)) {
            Ok(()) => self.size = size,
            Err(err) => tracing::warn!(error = %err, "failed to resize terminal"),
        }
    }
}

pub struct ConsoleOutputDriver {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    entered: bool,
}

impl ConsoleOutputDriver {
    pub fn new() -> io::Result<Self> {
        let stdout = io::stdout();
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;
        Ok(Self {
            terminal,
            entered: false,
        })
    }
}

impl OutputDriver for ConsoleOutputDriver {
    type Backend = CrosstermBackend<Stdout>;

    fn enter(&mut self) -> io::Result<()> {
        if self.entered {
            return Ok(());
        }
        execute!(self.terminal.backend_mut(), EnterAlternateScreen)?;
        terminal::enable_raw_mode()?;
        self.terminal.hide_cursor()?;
        self.entered = true;
        Ok(())
    }

    fn exit(&mut self) -> io::Result<()> {
        if !self.entered {
            return Ok(());
        }
        terminal::disable_raw_mode()?;
        execute!(
            self.terminal.backend_mut(),
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.terminal.show_cursor()?;
        self.entered = false;
        Ok(())
    }

    fn draw<F>(&mut self, f: F) -> io::Result<()>
    where
        F: FnOnce(&mut TerminalCanvas<'_>),
    {
        self.terminal
            .draw(move |frame| {
                let area = frame.area();
                let mut canvas = TerminalCanvas::new(area, frame.buffer_mut());
                f(&mut canvas);
            })
            .map(|_| ())
            .map_err(|err| io::Error::other(err.to_string()))
    }
}

impl Drop for ConsoleOutputDriver {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}
