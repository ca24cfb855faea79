use std::cell::Cell;
use std::io;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Duration;

use clap::Parser;
use indoc::indoc;

use widget_screen::backend::Backend;
use widget_screen::drivers::console::{ConsoleBackend, ConsoleInputDriver, ConsoleOutputDriver};
use widget_screen::drivers::{InputDriver, OutputDriver};
use widget_screen::event_loop::{ControlFlow, EventLoop};
use widget_screen::tracing_sub::{self, LogTarget};
use widget_screen::{
    Canvas, Color, Cursor, HandlerResult, KeyAction, KeyEvent, Modifiers, MouseButton, NodeId,
    Point, RawEvent, Rect, Role, Screen, ScreenConfig, Size, TooltipLayout, Widget, keys,
};

const MAX_WINDOWS: usize = 8;
const WINDOW_SIZE: Size = Size::new(36, 8);

#[derive(Parser, Debug)]
#[command(
    name = "widget-screen",
    version = env!("CARGO_PKG_VERSION"),
    about = "Terminal demo of the widget screen",
    long_about = indoc! {"
        Terminal demo of the widget screen.

        Click a window to focus and raise it, type into its text field, and
        hover a title bar to see its tooltip. A popup stays above the window
        that owns it, and a modal dialog swallows clicks outside itself.

        Keys:
          ctrl+n  open another window
          ctrl+w  close the focused window
          ctrl+q  quit
    "}
)]
struct Cli {
    /// Append diagnostics to this file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Number of windows to open on start.
    #[arg(short = 'w', long = "windows", value_name = "COUNT", default_value_t = 3)]
    windows: usize,

    /// Open a modal dialog on start.
    #[arg(long)]
    modal: bool,

    /// Attach a popup to the first window.
    #[arg(long)]
    popup: bool,
}

struct DemoConfig {
    screen: ScreenConfig,
    windows: usize,
    modal: bool,
    popup: bool,
}

impl TryFrom<&Cli> for DemoConfig {
    type Error = String;

    fn try_from(cli: &Cli) -> Result<Self, Self::Error> {
        if !(1..=MAX_WINDOWS).contains(&cli.windows) {
            return Err(format!("windows must be between 1 and {MAX_WINDOWS}"));
        }
        // Terminal cells are the native unit; there is no pointer hotspot offset.
        let screen = ScreenConfig::new(Size::new(80, 24), "widget-screen")
            .with_pointer_correction(Point::ZERO)
            .with_background(Color::rgb(30, 30, 36))
            .with_tooltip(TooltipLayout {
                wrap_width: 40,
                gap: 1,
                padding: 0,
            });
        Ok(Self {
            screen,
            windows: cli.windows,
            modal: cli.modal,
            popup: cli.popup,
        })
    }
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    let config = DemoConfig::try_from(&cli)
        .map_err(|msg| io::Error::new(io::ErrorKind::InvalidInput, msg))?;
    let target = match &cli.log_file {
        Some(path) => LogTarget::file(path)?,
        None => LogTarget::stderr(),
    };
    tracing_sub::init_with_writer(target);

    let mut output = ConsoleOutputDriver::new()?;
    output.enter()?;
    let mut input = ConsoleInputDriver::new();
    input.set_mouse_capture(true)?;

    let mut screen: Screen<ConsoleBackend> =
        Screen::new(config.screen.clone()).map_err(io::Error::other)?;
    let mut app = App::new(&mut screen, &config);

    let mut events = EventLoop::new(input, Duration::from_millis(16));
    let result = events.run(|_, event| {
        let Some(event) = event else {
            output.draw(|canvas| screen.render_frame(canvas))?;
            return Ok(ControlFlow::Continue);
        };
        if let RawEvent::Key(key) = &event
            && app.shortcut(&mut screen, key)
        {
            return Ok(app.flow);
        }
        screen.process_event(event);
        app.after_event(&mut screen);
        if !screen.visible() {
            return Ok(ControlFlow::Quit);
        }
        Ok(ControlFlow::Continue)
    });

    output.exit()?;
    result
}

struct App {
    windows: Vec<NodeId>,
    dialog: Option<(NodeId, Rc<Cell<bool>>)>,
    opened: usize,
    flow: ControlFlow,
}

impl App {
    fn new<B: Backend>(screen: &mut Screen<B>, config: &DemoConfig) -> Self {
        let mut app = Self {
            windows: Vec::new(),
            dialog: None,
            opened: 0,
            flow: ControlFlow::Continue,
        };
        for _ in 0..config.windows {
            app.open_window(screen);
        }
        if config.popup
            && let Some(&owner) = app.windows.first()
        {
            let origin = screen.tree().position(owner);
            let rect = Rect::new(origin.x + WINDOW_SIZE.width - 4, origin.y + 2, 18, 4);
            screen.tree_mut().add_popup(
                owner,
                rect,
                Panel::new("popup", "Owned by window 1", Color::rgb(120, 70, 20)),
            );
        }
        if config.modal {
            app.open_dialog(screen);
        }
        app
    }

    fn open_window<B: Backend>(&mut self, screen: &mut Screen<B>) {
        if self.windows.len() >= MAX_WINDOWS {
            tracing::warn!("window limit reached");
            return;
        }
        self.opened += 1;
        let n = self.opened as i32;
        let rect = Rect::from_parts(Point::new(2 + 5 * (n - 1), 1 + 2 * (n - 1)), WINDOW_SIZE);
        let title = format!("window {n}");
        let tooltip = format!("Demo window #{n}");
        let shade = (40 + 25 * (n % 6)) as u8;
        let window = screen.tree_mut().add_window(
            rect,
            false,
            Panel::new(&title, &tooltip, Color::rgb(shade / 2, shade / 2, shade)),
        );
        screen.tree_mut().add_child(
            window,
            Role::Leaf,
            Rect::new(2, 3, WINDOW_SIZE.width - 4, 1),
            TextField::default(),
        );
        self.windows.push(window);
        screen.set_focus(Some(window));
    }

    fn open_dialog<B: Backend>(&mut self, screen: &mut Screen<B>) {
        let dismissed = Rc::new(Cell::new(false));
        let dialog = screen.tree_mut().add_window(
            Rect::default(),
            true,
            Panel::new("modal", "Clicks outside are ignored", Color::rgb(110, 30, 30))
                .with_preferred(Size::new(30, 6)),
        );
        screen.tree_mut().add_child(
            dialog,
            Role::Leaf,
            Rect::new(11, 3, 8, 1),
            DismissButton {
                dismissed: Rc::clone(&dismissed),
            },
        );
        screen.center_window(dialog);
        screen.set_focus(Some(dialog));
        self.dialog = Some((dialog, dismissed));
    }

    /// Handle demo shortcuts; returns true when the key was one.
    fn shortcut<B: Backend>(&mut self, screen: &mut Screen<B>, key: &KeyEvent) -> bool {
        if key.action == KeyAction::Release || !key.modifiers.contains(Modifiers::CONTROL) {
            return false;
        }
        match char::from_u32(key.key as u32) {
            Some('q') => self.flow = ControlFlow::Quit,
            Some('n') => self.open_window(screen),
            Some('w') => {
                if let Some(window) = screen.focus_path().window() {
                    self.windows.retain(|w| *w != window);
                    screen.dispose_window(window);
                }
            }
            _ => return false,
        }
        true
    }

    fn after_event<B: Backend>(&mut self, screen: &mut Screen<B>) {
        if let Some((dialog, dismissed)) = &self.dialog
            && dismissed.get()
        {
            screen.dispose_window(*dialog);
            self.dialog = None;
        }
    }
}

struct Panel {
    title: String,
    tooltip: String,
    color: Color,
    preferred: Size,
    clicks: u32,
}

impl Panel {
    fn new(title: &str, tooltip: &str, color: Color) -> Self {
        Self {
            title: title.to_string(),
            tooltip: tooltip.to_string(),
            color,
            preferred: Size::ZERO,
            clicks: 0,
        }
    }

    fn with_preferred(mut self, size: Size) -> Self {
        self.preferred = size;
        self
    }
}

impl Widget for Panel {
    fn tooltip(&self) -> &str {
        &self.tooltip
    }

    fn preferred_size(&self) -> Size {
        self.preferred
    }

    fn mouse_button(
        &mut self,
        _pos: Point,
        _button: MouseButton,
        down: bool,
        _modifiers: Modifiers,
    ) -> HandlerResult {
        if down {
            self.clicks += 1;
        }
        Ok(true)
    }

    fn draw(&self, canvas: &mut dyn Canvas, rect: Rect) {
        canvas.fill_rect(rect, self.color);
        canvas.stroke_rect(rect, Color::WHITE);
        let label = format!(" {} · {} clicks ", self.title, self.clicks);
        canvas.draw_text(Point::new(rect.x + 2, rect.y), &label, Color::WHITE);
    }
}

#[derive(Default)]
struct TextField {
    text: String,
    focused: bool,
}

impl Widget for TextField {
    fn cursor(&self) -> Cursor {
        Cursor::IBeam
    }

    fn focus_changed(&mut self, focused: bool) -> HandlerResult {
        self.focused = focused;
        Ok(false)
    }

    fn key(&mut self, event: &KeyEvent) -> HandlerResult {
        if event.key == keys::BACKSPACE && event.action != KeyAction::Release {
            self.text.pop();
            return Ok(true);
        }
        Ok(false)
    }

    fn character(&mut self, codepoint: char) -> HandlerResult {
        self.text.push(codepoint);
        Ok(true)
    }

    fn mouse_button(
        &mut self,
        _pos: Point,
        _button: MouseButton,
        _down: bool,
        _modifiers: Modifiers,
    ) -> HandlerResult {
        Ok(true)
    }

    fn draw(&self, canvas: &mut dyn Canvas, rect: Rect) {
        canvas.fill_rect(rect, Color::rgb(12, 12, 12));
        let caret = if self.focused { "_" } else { "" };
        let visible = rect.width.max(1) as usize;
        let shown: String = self
            .text
            .chars()
            .rev()
            .take(visible.saturating_sub(1))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        canvas.draw_text(rect.origin(), &format!("{shown}{caret}"), Color::WHITE);
    }
}

struct DismissButton {
    dismissed: Rc<Cell<bool>>,
}

impl Widget for DismissButton {
    fn cursor(&self) -> Cursor {
        Cursor::Hand
    }

    fn mouse_button(
        &mut self,
        _pos: Point,
        button: MouseButton,
        down: bool,
        _modifiers: Modifiers,
    ) -> HandlerResult {
        if button == MouseButton::Left && !down {
            self.dismissed.set(true);
        }
        Ok(true)
    }

    fn draw(&self, canvas: &mut dyn Canvas, rect: Rect) {
        canvas.fill_rect(rect, Color::rgb(200, 200, 200));
        canvas.draw_text(rect.origin(), "  OK  ", Color::BLACK);
    }
}
