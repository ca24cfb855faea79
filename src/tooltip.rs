//! Tooltip timing and placement.
//!
//! A tooltip appears once the pointer has been idle for
//! [`TOOLTIP_DELAY_SECS`] and fades in linearly to [`TOOLTIP_MAX_ALPHA`].
//! Placement centres the text under the hovered widget; text wider than the
//! wrap budget is re-measured as a wrapped box.

use crate::canvas::{Canvas, TextBounds};
use crate::config::TooltipLayout;
use crate::constants::{TOOLTIP_DELAY_SECS, TOOLTIP_FADE_PER_SEC, TOOLTIP_MAX_ALPHA};
use crate::geometry::{Point, Rect};

/// Opacity for a tooltip given the idle time, or `None` while still hidden.
pub fn tooltip_alpha(elapsed: f64) -> Option<f32> {
    if elapsed > TOOLTIP_DELAY_SECS {
        let ramp = (TOOLTIP_FADE_PER_SEC * (elapsed - TOOLTIP_DELAY_SECS)).min(1.0);
        Some((ramp * TOOLTIP_MAX_ALPHA) as f32)
    } else {
        None
    }
}

/// Fully laid out tooltip, ready for a canvas to paint.
#[derive(Debug, Clone, PartialEq)]
pub struct Tooltip {
    pub text: String,
    pub alpha: f32,
    /// Background panel.
    pub panel: Rect,
    /// Pointer triangle: apex, then the two base corners.
    pub arrow: [Point; 3],
    /// Top-left of the text box.
    pub text_origin: Point,
    pub wrap_width: i32,
    /// True when the natural width exceeded the budget and the text was
    /// re-measured as a wrapped box.
    pub wrapped: bool,
}

impl Tooltip {
    /// Lay out `text` for the widget occupying `widget` (root coordinates).
    pub fn layout(
        canvas: &mut dyn Canvas,
        widget: Rect,
        text: &str,
        alpha: f32,
        layout: TooltipLayout,
    ) -> Self {
        let anchor = Point::new(
            widget.x + widget.width / 2,
            widget.y + widget.height + layout.gap,
        );
        let mut bounds = canvas.text_bounds(anchor, text);
        let mut half = half_width(&bounds);
        let wrapped = half > layout.wrap_width / 2;
        if wrapped {
            bounds = canvas.text_box_bounds(anchor, layout.wrap_width, text);
            half = half_width(&bounds);
        }

        let pad = layout.padding;
        let panel = Rect::new(
            bounds.min_x as i32 - pad - half,
            bounds.min_y as i32 - pad,
            bounds.width() as i32 + 2 * pad,
            bounds.height() as i32 + 2 * pad,
        );
        let px = ((bounds.max_x + bounds.min_x) / 2.0) as i32 - half;
        let top = bounds.min_y as i32;
        let arrow = [
            Point::new(px, top - 10),
            Point::new(px + 7, top + 1),
            Point::new(px - 7, top + 1),
        ];

        Self {
            text: text.to_string(),
            alpha,
            panel,
            arrow,
            text_origin: Point::new(anchor.x - half, anchor.y),
            wrap_width: layout.wrap_width,
            wrapped,
        }
    }
}

fn half_width(bounds: &TextBounds) -> i32 {
    (bounds.width() / 2.0) as i32
}
