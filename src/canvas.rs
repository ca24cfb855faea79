//! Rendering collaborator.
//!
//! The screen never paints pixels itself. Widgets and the tooltip pass are
//! handed a `Canvas` and describe what they want drawn in logical coordinates.

use crate::geometry::{Point, Rect, Size};
use crate::tooltip::Tooltip;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }
}

/// Measured text extents: `[min_x, min_y, max_x, max_y]` in logical units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextBounds {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl TextBounds {
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

pub trait Canvas {
    fn begin_frame(&mut self, size: Size, pixel_ratio: f32, background: Color);

    fn end_frame(&mut self) {}

    /// Bounds of `text` laid out on a single line starting at `origin`.
    fn text_bounds(&mut self, origin: Point, text: &str) -> TextBounds;

    /// Bounds of `text` wrapped into a box `wrap_width` wide, centred on
    /// `origin.x`.
    fn text_box_bounds(&mut self, origin: Point, wrap_width: i32, text: &str) -> TextBounds;

    fn fill_rect(&mut self, rect: Rect, color: Color);

    fn stroke_rect(&mut self, rect: Rect, color: Color);

    fn draw_text(&mut self, origin: Point, text: &str, color: Color);

    fn draw_tooltip(&mut self, tooltip: &Tooltip);
}
