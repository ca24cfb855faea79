//! Integer geometry shared by the tree, the dispatcher and the canvas.
//!
//! Everything the dispatcher stores (pointer position, widget positions, window
//! sizes) lives on an integer grid. Only scroll deltas and text metrics are
//! fractional.

use std::ops::{Add, AddAssign, Div, Mul, Sub, SubAssign};

/// Signed 2D integer point or offset. Arithmetic saturates at the `i32` range.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

impl SubAssign for Point {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

/// Width/height pair. Components are signed so that `(screen - window) / 2`
/// style arithmetic never wraps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

impl Size {
    pub const ZERO: Self = Self {
        width: 0,
        height: 0,
    };

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// True when either axis is zero (or negative).
    pub fn is_degenerate(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    pub fn scale(self, factor: f32) -> Self {
        Self::new(
            (self.width as f32 * factor) as i32,
            (self.height as f32 * factor) as i32,
        )
    }

    pub fn unscale(self, factor: f32) -> Self {
        if factor <= 0.0 {
            return self;
        }
        Self::new(
            (self.width as f32 / factor) as i32,
            (self.height as f32 / factor) as i32,
        )
    }
}

impl Sub for Size {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.width.saturating_sub(rhs.width),
            self.height.saturating_sub(rhs.height),
        )
    }
}

impl Mul<i32> for Size {
    type Output = Self;

    fn mul(self, rhs: i32) -> Self {
        Self::new(self.width.saturating_mul(rhs), self.height.saturating_mul(rhs))
    }
}

impl Div<i32> for Size {
    type Output = Self;

    fn div(self, rhs: i32) -> Self {
        Self::new(self.width / rhs, self.height / rhs)
    }
}

/// Axis-aligned rectangle with a signed origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub const fn from_parts(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    /// Half-open containment: the right and bottom edges are outside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.y >= self.y && p.x < self.right() && p.y < self.bottom()
    }
}

/// Fractional 2D vector used for scroll deltas.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_contains_is_half_open() {
        let r = Rect::new(10, 10, 5, 5);
        assert!(r.contains(Point::new(10, 10)));
        assert!(r.contains(Point::new(14, 14)));
        assert!(!r.contains(Point::new(15, 10)));
        assert!(!r.contains(Point::new(10, 15)));
        assert!(!r.contains(Point::new(9, 12)));
    }

    #[test]
    fn point_arithmetic_saturates() {
        let far = Point::new(i32::MIN, i32::MAX);
        assert_eq!(far - Point::new(1, -1), far);
        let mut p = Point::new(i32::MAX, 0);
        p += Point::new(5, 5);
        assert_eq!(p, Point::new(i32::MAX, 5));
        p -= Point::new(i32::MIN, 0);
        assert_eq!(p.x, i32::MAX);
    }

    #[test]
    fn degenerate_sizes() {
        assert!(Size::new(0, 10).is_degenerate());
        assert!(Size::new(10, 0).is_degenerate());
        assert!(!Size::new(1, 1).is_degenerate());
    }

    #[test]
    fn unscale_ignores_non_positive_factor() {
        let s = Size::new(200, 100);
        assert_eq!(s.unscale(2.0), Size::new(100, 50));
        assert_eq!(s.unscale(0.0), s);
        assert_eq!(s.unscale(2.0).scale(2.0), s);
    }
}
