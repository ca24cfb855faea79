//! Raw input as delivered by a windowing backend, one occurrence at a time.

use std::path::PathBuf;

bitflags::bitflags! {
    /// Keyboard modifier mask active at the time of an event.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        const SHIFT   = 0b0000_0001;
        const CONTROL = 0b0000_0010;
        const ALT     = 0b0000_0100;
        const SUPER   = 0b0000_1000;
    }
}

bitflags::bitflags! {
    /// Set of pointer buttons currently held down.
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
    pub struct Buttons: u8 {
        const LEFT   = 0b0000_0001;
        const MIDDLE = 0b0000_0010;
        const RIGHT  = 0b0000_0100;
        const X1     = 0b0000_1000;
        const X2     = 0b0001_0000;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
    X1,
    X2,
}

impl MouseButton {
    /// Bit this button occupies in [`Buttons`].
    pub const fn mask(self) -> Buttons {
        match self {
            MouseButton::Left => Buttons::LEFT,
            MouseButton::Middle => Buttons::MIDDLE,
            MouseButton::Right => Buttons::RIGHT,
            MouseButton::X1 => Buttons::X1,
            MouseButton::X2 => Buttons::X2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Press,
    Release,
    Repeat,
}

/// Backend-neutral key codes. Printable keys use their Unicode scalar value;
/// everything else lives above the Unicode range.
pub mod keys {
    pub const UNKNOWN: i32 = -1;
    pub const ESCAPE: i32 = 0x11_0000;
    pub const ENTER: i32 = ESCAPE + 1;
    pub const TAB: i32 = ESCAPE + 2;
    pub const BACKSPACE: i32 = ESCAPE + 3;
    pub const INSERT: i32 = ESCAPE + 4;
    pub const DELETE: i32 = ESCAPE + 5;
    pub const RIGHT: i32 = ESCAPE + 6;
    pub const LEFT: i32 = ESCAPE + 7;
    pub const DOWN: i32 = ESCAPE + 8;
    pub const UP: i32 = ESCAPE + 9;
    pub const PAGE_UP: i32 = ESCAPE + 10;
    pub const PAGE_DOWN: i32 = ESCAPE + 11;
    pub const HOME: i32 = ESCAPE + 12;
    pub const END: i32 = ESCAPE + 13;
    /// `F1` is `F_BASE + 1`.
    pub const F_BASE: i32 = ESCAPE + 0x100;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: i32,
    pub scancode: i32,
    pub action: KeyAction,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub const fn new(key: i32, action: KeyAction, modifiers: Modifiers) -> Self {
        Self {
            key,
            scancode: 0,
            action,
            modifiers,
        }
    }

    pub const fn with_scancode(mut self, scancode: i32) -> Self {
        self.scancode = scancode;
        self
    }
}

/// One input occurrence from the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum RawEvent {
    /// Pointer position in native window pixels.
    PointerMove { x: f64, y: f64 },
    PointerButton {
        button: MouseButton,
        pressed: bool,
        modifiers: Modifiers,
    },
    /// `flipped` is set when the platform reports "natural" scrolling; both
    /// axes are negated before dispatch.
    Wheel { dx: f32, dy: f32, flipped: bool },
    Key(KeyEvent),
    Text(String),
    /// New native window size.
    Resize { width: i32, height: i32 },
    Close,
    Drop(Vec<PathBuf>),
}
