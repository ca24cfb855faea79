//! Screen construction parameters.

use crate::canvas::Color;
use crate::constants::{
    DEFAULT_BACKGROUND, DEFAULT_CAPTION, DEFAULT_SIZE, POINTER_CORRECTION, TOOLTIP_GAP,
    TOOLTIP_PADDING, TOOLTIP_WRAP_WIDTH,
};
use crate::error::ScreenError;
use crate::geometry::{Point, Size};

/// Tooltip geometry. Timing is fixed; only placement is configurable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TooltipLayout {
    pub wrap_width: i32,
    pub gap: i32,
    pub padding: i32,
}

impl Default for TooltipLayout {
    fn default() -> Self {
        Self {
            wrap_width: TOOLTIP_WRAP_WIDTH,
            gap: TOOLTIP_GAP,
            padding: TOOLTIP_PADDING,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScreenConfig {
    pub size: Size,
    pub caption: String,
    pub resizable: bool,
    pub fullscreen: bool,
    pub color_bits: u8,
    pub alpha_bits: u8,
    pub depth_bits: u8,
    pub stencil_bits: u8,
    pub samples: u8,
    /// Requested graphics API version as `(major, minor)`.
    pub api_version: (u32, u32),
    pub background: Color,
    /// Subtracted from every pointer position after DPI scaling.
    pub pointer_correction: Point,
    /// Divide native pointer coordinates and window sizes by the pixel ratio
    /// (and multiply when resizing the native window). When off, the ratio is
    /// re-derived every frame from framebuffer width / window width.
    pub scale_by_pixel_ratio: bool,
    pub tooltip: TooltipLayout,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            caption: DEFAULT_CAPTION.to_string(),
            resizable: true,
            fullscreen: false,
            color_bits: 8,
            alpha_bits: 8,
            depth_bits: 24,
            stencil_bits: 8,
            samples: 0,
            api_version: (3, 3),
            background: DEFAULT_BACKGROUND,
            pointer_correction: POINTER_CORRECTION,
            scale_by_pixel_ratio: true,
            tooltip: TooltipLayout::default(),
        }
    }
}

impl ScreenConfig {
    pub fn new(size: Size, caption: impl Into<String>) -> Self {
        Self {
            size,
            caption: caption.into(),
            ..Self::default()
        }
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_fullscreen(mut self, fullscreen: bool) -> Self {
        self.fullscreen = fullscreen;
        self
    }

    pub fn with_samples(mut self, samples: u8) -> Self {
        self.samples = samples;
        self
    }

    pub fn with_api_version(mut self, major: u32, minor: u32) -> Self {
        self.api_version = (major, minor);
        self
    }

    pub fn with_background(mut self, background: Color) -> Self {
        self.background = background;
        self
    }

    pub fn with_pointer_correction(mut self, correction: Point) -> Self {
        self.pointer_correction = correction;
        self
    }

    pub fn with_scale_by_pixel_ratio(mut self, enabled: bool) -> Self {
        self.scale_by_pixel_ratio = enabled;
        self
    }

    pub fn with_tooltip(mut self, tooltip: TooltipLayout) -> Self {
        self.tooltip = tooltip;
        self
    }

    pub fn validate(&self) -> Result<(), ScreenError> {
        let invalid = |msg: String| Err(ScreenError::InvalidConfig(msg));
        if self.size.width < 0 || self.size.height < 0 {
            return invalid(format!(
                "window size must not be negative (got {}x{})",
                self.size.width, self.size.height
            ));
        }
        if !(1..=16).contains(&self.color_bits) {
            return invalid(format!(
                "color bits must be between 1 and 16 (got {})",
                self.color_bits
            ));
        }
        if self.alpha_bits > 16 || self.depth_bits > 32 || self.stencil_bits > 16 {
            return invalid("alpha/depth/stencil bit depth out of range".to_string());
        }
        if self.samples != 0 && !self.samples.is_power_of_two() {
            return invalid(format!(
                "multisample count must be zero or a power of two (got {})",
                self.samples
            ));
        }
        if self.api_version.0 < 2 {
            return invalid(format!(
                "graphics API {}.{} is not supported",
                self.api_version.0, self.api_version.1
            ));
        }
        if self.tooltip.wrap_width <= 0 {
            return invalid("tooltip wrap width must be positive".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        let cfg = ScreenConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.pointer_correction, Point::new(1, 2));
        assert_eq!(cfg.api_version, (3, 3));
    }

    #[test]
    fn rejects_bad_sample_counts_and_versions() {
        let cfg = ScreenConfig::default().with_samples(3);
        assert!(matches!(cfg.validate(), Err(ScreenError::InvalidConfig(_))));
        let cfg = ScreenConfig::default().with_api_version(1, 5);
        assert!(cfg.validate().is_err());
        let cfg = ScreenConfig::default().with_samples(4);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn builder_keeps_caption_and_size() {
        let cfg = ScreenConfig::new(Size::new(640, 480), "demo").with_fullscreen(true);
        assert_eq!(cfg.caption, "demo");
        assert_eq!(cfg.size, Size::new(640, 480));
        assert!(cfg.fullscreen);
    }
}
