//! Windowing collaborator.
//!
//! A backend owns the native window: it reports sizes, the pixel ratio and a
//! monotonic clock, and carries out cursor/title/visibility/size requests. All
//! calls are synchronous and never retried.

use std::sync::atomic::{AtomicU32, Ordering};

use crate::config::ScreenConfig;
use crate::error::ScreenError;
use crate::geometry::Size;
use crate::widget::Cursor;

/// Identifier of a native window, unique per process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowHandle(pub u32);

impl WindowHandle {
    /// Allocate a fresh process-unique handle.
    pub fn next() -> Self {
        static NEXT: AtomicU32 = AtomicU32::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

pub trait Backend {
    /// Create the native window described by `config`.
    fn open(config: &ScreenConfig) -> Result<Self, ScreenError>
    where
        Self: Sized;

    fn handle(&self) -> WindowHandle;

    fn framebuffer_size(&self) -> Size;

    /// Window size in native (unscaled) units.
    fn window_size(&self) -> Size;

    fn pixel_ratio(&self) -> f32;

    /// Monotonic milliseconds since an arbitrary origin.
    fn ticks_ms(&self) -> u64;

    fn is_shown(&self) -> bool;

    fn set_cursor(&mut self, cursor: Cursor);

    fn set_visible(&mut self, visible: bool);

    fn set_title(&mut self, title: &str);

    /// Resize the native window (native units).
    fn set_window_size(&mut self, size: Size);

    /// Present the finished frame.
    fn present(&mut self) {}

    fn now_secs(&self) -> f64 {
        self.ticks_ms() as f64 / 1000.0
    }
}

/// In-memory backend with a manually advanced clock.
///
/// Records every request so tests and benchmarks can inspect what the screen
/// asked of the window system.
#[derive(Debug, Clone)]
pub struct HeadlessBackend {
    handle: WindowHandle,
    window_size: Size,
    framebuffer_size: Size,
    pixel_ratio: f32,
    ticks_ms: u64,
    shown: bool,
    title: String,
    cursors: Vec<Cursor>,
    presented: usize,
}

impl HeadlessBackend {
    pub fn new(size: Size) -> Self {
        Self {
            handle: WindowHandle::next(),
            window_size: size,
            framebuffer_size: size,
            pixel_ratio: 1.0,
            ticks_ms: 0,
            shown: true,
            title: String::new(),
            cursors: Vec::new(),
            presented: 0,
        }
    }

    /// Simulate a hi-dpi display: the framebuffer becomes `size * ratio`.
    pub fn with_pixel_ratio(mut self, ratio: f32) -> Self {
        self.pixel_ratio = ratio;
        self.framebuffer_size = self.window_size.scale(ratio);
        self
    }

    pub fn advance(&mut self, ms: u64) {
        self.ticks_ms = self.ticks_ms.saturating_add(ms);
    }

    /// Change the reported sizes as a window manager would.
    pub fn resize_native(&mut self, window: Size, framebuffer: Size) {
        self.window_size = window;
        self.framebuffer_size = framebuffer;
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Every cursor install request, oldest first.
    pub fn cursor_history(&self) -> &[Cursor] {
        &self.cursors
    }

    pub fn presented_frames(&self) -> usize {
        self.presented
    }
}

impl Backend for HeadlessBackend {
    fn open(config: &ScreenConfig) -> Result<Self, ScreenError> {
        let mut backend = Self::new(config.size);
        backend.title = config.caption.clone();
        Ok(backend)
    }

    fn handle(&self) -> WindowHandle {
        self.handle
    }

    fn framebuffer_size(&self) -> Size {
        self.framebuffer_size
    }

    fn window_size(&self) -> Size {
        self.window_size
    }

    fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    fn ticks_ms(&self) -> u64 {
        self.ticks_ms
    }

    fn is_shown(&self) -> bool {
        self.shown
    }

    fn set_cursor(&mut self, cursor: Cursor) {
        self.cursors.push(cursor);
    }

    fn set_visible(&mut self, visible: bool) {
        self.shown = visible;
    }

    fn set_title(&mut self, title: &str) {
        self.title = title.to_string();
    }

    fn set_window_size(&mut self, size: Size) {
        self.window_size = size;
        self.framebuffer_size = size;
    }

    fn present(&mut self) {
        self.presented += 1;
    }
}
