//! Shared crate-wide constants.

use crate::canvas::Color;
use crate::geometry::{Point, Size};

/// Idle time (seconds) after the last interaction before a tooltip may show.
pub const TOOLTIP_DELAY_SECS: f64 = 0.5;

/// Fade-in speed: opacity gained per second once the delay has passed.
pub const TOOLTIP_FADE_PER_SEC: f64 = 2.0;

/// Opacity of a fully faded-in tooltip.
pub const TOOLTIP_MAX_ALPHA: f64 = 0.8;

/// Width budget of a tooltip before its text is wrapped into a box.
pub const TOOLTIP_WRAP_WIDTH: i32 = 150;

/// Vertical gap between a widget's bottom edge and its tooltip anchor.
pub const TOOLTIP_GAP: i32 = 10;

/// Padding around tooltip text inside its panel.
pub const TOOLTIP_PADDING: i32 = 4;

/// Correction subtracted from every pointer position reported by the backend.
///
/// Units: logical pixels. Empirically the native pointer hotspot lands this far
/// right of and below the logical point the user is aiming at.
pub const POINTER_CORRECTION: Point = Point::new(1, 2);

pub const DEFAULT_SIZE: Size = Size::new(1024, 768);

pub const DEFAULT_CAPTION: &str = "Unnamed";

pub const DEFAULT_BACKGROUND: Color = Color::rgba(77, 77, 82, 255);
