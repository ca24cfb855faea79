//! TerminalCanvas: a [`Canvas`] over a `ratatui` buffer.
//!
//! One logical unit is one terminal cell. Every draw call is clipped to the
//! buffer area, so widgets may hand over rectangles that drift partially or
//! fully off screen. Text metrics are cell counts: one cell per char, one row
//! per line. Terminals cannot blend, so tooltip opacity only chooses between
//! a dimmed and a normal style.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect as CellRect;
use ratatui::style::{Color as CellColor, Modifier, Style};

use crate::canvas::{Canvas, Color, TextBounds};
use crate::geometry::{Point, Rect, Size};
use crate::tooltip::Tooltip;

const TOOLTIP_BACKGROUND: Color = Color::rgb(24, 24, 24);
const TOOLTIP_FOREGROUND: Color = Color::WHITE;
/// Below this opacity tooltips are drawn dimmed while they fade in.
const TOOLTIP_DIM_BELOW: f32 = 0.5;

fn cell_color(color: Color) -> CellColor {
    CellColor::Rgb(color.r, color.g, color.b)
}

pub struct TerminalCanvas<'a> {
    area: CellRect,
    buffer: &'a mut Buffer,
    background: Color,
}

impl<'a> TerminalCanvas<'a> {
    pub fn new(area: CellRect, buffer: &'a mut Buffer) -> Self {
        Self {
            area,
            buffer,
            background: Color::BLACK,
        }
    }

    pub fn area(&self) -> CellRect {
        self.area
    }

    pub fn buffer(&self) -> &Buffer {
        self.buffer
    }

    /// Intersection of `rect` with the buffer area, in cells.
    fn clip(&self, rect: Rect) -> Option<CellRect> {
        let x0 = rect.x.max(i32::from(self.area.x));
        let y0 = rect.y.max(i32::from(self.area.y));
        let x1 = rect
            .right()
            .min(i32::from(self.area.x) + i32::from(self.area.width));
        let y1 = rect
            .bottom()
            .min(i32::from(self.area.y) + i32::from(self.area.height));
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(CellRect::new(
            x0 as u16,
            y0 as u16,
            (x1 - x0) as u16,
            (y1 - y0) as u16,
        ))
    }

    fn put_text(&mut self, origin: Point, text: &str, style: Style) {
        let top = i32::from(self.area.y);
        let bottom = top + i32::from(self.area.height);
        if origin.y < top || origin.y >= bottom {
            return;
        }
        let left = i32::from(self.area.x);
        let skip = (left - origin.x).max(0) as usize;
        let visible: String = text.chars().skip(skip).collect();
        let x = origin.x.max(left);
        if x > i32::from(u16::MAX) {
            return;
        }
        safe_set_string(
            self.buffer,
            self.area,
            x as u16,
            origin.y as u16,
            &visible,
            style,
        );
    }

    fn set_cell(&mut self, x: i32, y: i32, symbol: &str, style: Style) {
        if self.clip(Rect::new(x, y, 1, 1)).is_none() {
            return;
        }
        if let Some(cell) = self.buffer.cell_mut((x as u16, y as u16)) {
            cell.set_symbol(symbol);
            cell.set_style(style);
        }
    }
}

impl Canvas for TerminalCanvas<'_> {
    fn begin_frame(&mut self, _size: Size, _pixel_ratio: f32, background: Color) {
        self.background = background;
        let style = Style::default().bg(cell_color(background));
        for y in self.area.y..self.area.y.saturating_add(self.area.height) {
            for x in self.area.x..self.area.x.saturating_add(self.area.width) {
                if let Some(cell) = self.buffer.cell_mut((x, y)) {
                    cell.reset();
                    cell.set_style(style);
                }
            }
        }
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
        let wrap = wrap_width.max(1) as usize;
        let count = text.chars().count();
        let lines = count.div_ceil(wrap).max(1);
        let width = count.min(wrap) as f32;
        let min_x = origin.x as f32 - (width / 2.0).floor();
        TextBounds {
            min_x,
            min_y: origin.y as f32,
            max_x: min_x + width,
            max_y: origin.y as f32 + lines as f32,
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(area) = self.clip(rect) else {
            return;
        };
        let style = Style::default().bg(cell_color(color));
        self.buffer.set_style(area, style);
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        if rect.width <= 0 || rect.height <= 0 {
            return;
        }
        let style = Style::default().fg(cell_color(color));
        let (x0, y0) = (rect.x, rect.y);
        let (x1, y1) = (rect.right() - 1, rect.bottom() - 1);
        for x in x0..=x1 {
            self.set_cell(x, y0, "─", style);
            self.set_cell(x, y1, "─", style);
        }
        for y in y0..=y1 {
            self.set_cell(x0, y, "│", style);
            self.set_cell(x1, y, "│", style);
        }
        self.set_cell(x0, y0, "┌", style);
        self.set_cell(x1, y0, "┐", style);
        self.set_cell(x0, y1, "└", style);
        self.set_cell(x1, y1, "┘", style);
    }

    fn draw_text(&mut self, origin: Point, text: &str, color: Color) {
        self.put_text(origin, text, Style::default().fg(cell_color(color)));
    }

    fn draw_tooltip(&mut self, tooltip: &Tooltip) {
        let mut style = Style::default()
            .fg(cell_color(TOOLTIP_FOREGROUND))
            .bg(cell_color(TOOLTIP_BACKGROUND));
        if tooltip.alpha < TOOLTIP_DIM_BELOW {
            style = style.add_modifier(Modifier::DIM);
        }
        if let Some(panel) = self.clip(tooltip.panel) {
            self.buffer.set_style(panel, style);
        }
        let apex = tooltip.arrow[0];
        self.set_cell(apex.x, tooltip.panel.y - 1, "▲", style);

        let chars: Vec<char> = tooltip.text.chars().collect();
        let per_line = if tooltip.wrapped {
            tooltip.wrap_width.max(1) as usize
        } else {
            chars.len().max(1)
        };
        for (row, line) in chars.chunks(per_line).enumerate() {
            let line: String = line.iter().collect();
            let origin = Point::new(tooltip.text_origin.x, tooltip.text_origin.y + row as i32);
            self.put_text(origin, &line, style);
        }
    }
}

pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: CellRect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let available = max_x.saturating_sub(x);
    if available == 0 {
        return;
    }
    let text = truncate_to_width(text, available as usize);
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TooltipLayout;

    fn area(width: u16, height: u16) -> CellRect {
        CellRect {
            x: 0,
            y: 0,
            width,
            height,
        }
    }

    fn row(buf: &Buffer, y: u16, width: u16) -> String {
        (0..width)
            .map(|x| buf.cell((x, y)).unwrap().symbol().to_string())
            .collect()
    }

    #[test]
    fn truncate_to_width_short_and_long() {
        assert_eq!(truncate_to_width("abc", 5), "abc");
        assert_eq!(truncate_to_width("abcdef", 3), "abc");
    }

    #[test]
    fn safe_set_string_writes_within_bounds() {
        let bounds = area(10, 2);
        let mut buf = Buffer::empty(bounds);
        safe_set_string(&mut buf, bounds, 1, 0, "hello", Style::default());
        assert_eq!(buf.cell((1, 0)).unwrap().symbol(), "h");

        // outside bounds should be ignored (no panic)
        safe_set_string(&mut buf, bounds, 100, 0, "x", Style::default());
    }

    #[test]
    fn text_hanging_off_the_left_edge_is_clipped() {
        let bounds = area(6, 1);
        let mut buf = Buffer::empty(bounds);
        let mut canvas = TerminalCanvas::new(bounds, &mut buf);
        canvas.draw_text(Point::new(-2, 0), "abcdef", Color::WHITE);
        canvas.draw_text(Point::new(0, 4), "zzz", Color::WHITE);
        assert_eq!(row(&buf, 0, 6), "cdef  ");
    }

    #[test]
    fn fill_rect_clips_to_area() {
        let bounds = area(4, 3);
        let mut buf = Buffer::empty(bounds);
        let mut canvas = TerminalCanvas::new(bounds, &mut buf);
        canvas.fill_rect(Rect::new(2, -5, 10, 7), Color::rgb(1, 2, 3));
        canvas.fill_rect(Rect::new(-10, -10, 2, 2), Color::rgb(9, 9, 9));
        assert_eq!(buf.cell((3, 1)).unwrap().bg, CellColor::Rgb(1, 2, 3));
        assert_eq!(buf.cell((1, 1)).unwrap().bg, CellColor::Reset);
        assert_eq!(buf.cell((3, 2)).unwrap().bg, CellColor::Reset);
    }

    #[test]
    fn stroke_rect_draws_corners() {
        let bounds = area(4, 3);
        let mut buf = Buffer::empty(bounds);
        let mut canvas = TerminalCanvas::new(bounds, &mut buf);
        canvas.stroke_rect(Rect::new(0, 0, 4, 3), Color::WHITE);
        assert_eq!(row(&buf, 0, 4), "┌──┐");
        assert_eq!(row(&buf, 1, 4), "│  │");
        assert_eq!(row(&buf, 2, 4), "└──┘");
    }

    #[test]
    fn begin_frame_paints_background() {
        let bounds = area(3, 1);
        let mut buf = Buffer::empty(bounds);
        let mut canvas = TerminalCanvas::new(bounds, &mut buf);
        canvas.draw_text(Point::ZERO, "old", Color::WHITE);
        canvas.begin_frame(Size::new(3, 1), 1.0, Color::rgb(7, 7, 7));
        assert_eq!(row(&buf, 0, 3), "   ");
        assert_eq!(buf.cell((2, 0)).unwrap().bg, CellColor::Rgb(7, 7, 7));
    }

    #[test]
    fn wrapped_box_is_centred_on_origin() {
        let bounds = area(1, 1);
        let mut buf = Buffer::empty(bounds);
        let mut canvas = TerminalCanvas::new(bounds, &mut buf);
        let b = canvas.text_box_bounds(Point::new(20, 5), 10, &"x".repeat(25));
        assert_eq!(b.min_x, 15.0);
        assert_eq!(b.width(), 10.0);
        assert_eq!(b.height(), 3.0);
    }

    #[test]
    fn tooltip_text_lands_under_widget() {
        let bounds = area(20, 6);
        let mut buf = Buffer::empty(bounds);
        let mut canvas = TerminalCanvas::new(bounds, &mut buf);
        let layout = TooltipLayout {
            wrap_width: 10,
            gap: 1,
            padding: 0,
        };
        let tip = Tooltip::layout(&mut canvas, Rect::new(6, 0, 8, 2), "tip", 0.8, layout);
        canvas.draw_tooltip(&tip);
        // anchor (10, 3), half width 1
        assert_eq!(tip.text_origin, Point::new(9, 3));
        assert_eq!(row(&buf, 3, 20).trim(), "tip");
        assert_eq!(buf.cell((9, 3)).unwrap().symbol(), "t");
    }
}
