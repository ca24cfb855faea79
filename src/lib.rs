//! Top-level input dispatch for widget trees.
//!
//! A [`Screen`] sits between a windowing [`Backend`] and a [`WidgetTree`]: it
//! turns raw pointer, keyboard, scroll, resize and drop events into widget
//! notifications, tracks the keyboard focus path, captures drags, keeps popups
//! stacked above their owners and fades in tooltips.

pub mod backend;
pub mod canvas;
pub mod config;
pub mod constants;
pub mod drivers;
pub mod error;
pub mod event;
pub mod event_loop;
pub mod focus;
pub mod geometry;
pub mod registry;
pub mod screen;
pub mod state;
pub mod tooltip;
pub mod tracing_sub;
pub mod tree;
pub mod ui;
pub mod widget;
pub mod window_stack;

pub use backend::{Backend, HeadlessBackend, WindowHandle};
pub use canvas::{Canvas, Color, TextBounds};
pub use config::{ScreenConfig, TooltipLayout};
pub use error::{HandlerResult, ScreenError, WidgetError};
pub use event::{Buttons, KeyAction, KeyEvent, Modifiers, MouseButton, RawEvent, keys};
pub use focus::FocusPath;
pub use geometry::{Point, Rect, Size, Vec2};
pub use registry::ScreenRegistry;
pub use screen::Screen;
pub use state::ScreenState;
pub use tooltip::Tooltip;
pub use tree::{NodeId, WidgetTree};
pub use widget::{Container, Cursor, Role, Widget};
pub use window_stack::WindowStack;
