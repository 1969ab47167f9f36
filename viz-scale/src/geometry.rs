// SPDX-License-Identifier: MIT
//! # Draw Plan Computation
//!
//! Maps a frame onto the viewer window. Given a scale mode, the frame size and
//! the window size, [`build_draw_plan`] decides the scale factor, the drawn
//! size, where it lands on the canvas and how much of it is visible.
//!
//! ## Scale modes
//!
//! - **Fit**: `min((W-60)/iw, (H-100)/ih)`, whole frame inside the margins
//! - **Fill**: `max((W-60)/iw, (H-100)/ih)`, may overflow and get clipped
//! - **Original**: exactly 1.0, frame drawn pixel for pixel
//! - **Custom**: the user-controlled zoom factor
//!
//! ## Placement
//!
//! A drawn frame that fits the content area is centered inside it. Anything
//! larger is pinned to a fixed top-left offset and clipped, never shrunk to
//! fit, so `Original` and `Custom` stay useful for full-resolution inspection.
//!
//! All computations are O(1) and allocation free.

use std::fmt;
use std::str::FromStr;

/// Represents a 2D size with width and height in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub struct Size {
    pub w: u32,
    pub h: u32,
}

impl Size {
    pub const fn new(w: u32, h: u32) -> Self {
        Self { w, h }
    }

    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    pub fn area(&self) -> usize {
        self.w as usize * self.h as usize
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.w, self.h)
    }
}

/// How a frame's pixel size maps to its on-screen size.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ScaleMode {
    /// Preserve aspect ratio, whole frame visible inside the margins.
    Fit,
    /// Preserve aspect ratio, cover the content area; excess is cropped.
    Fill,
    /// No resampling at all.
    #[default]
    Original,
    /// User zoom factor.
    Custom,
}

impl ScaleMode {
    /// Upper-case label used by the overlay.
    pub fn label(&self) -> &'static str {
        match self {
            ScaleMode::Fit => "FIT",
            ScaleMode::Fill => "FILL",
            ScaleMode::Original => "ORIGINAL",
            ScaleMode::Custom => "CUSTOM",
        }
    }
}

impl fmt::Display for ScaleMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label().to_ascii_lowercase())
    }
}

impl FromStr for ScaleMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "fit" => Ok(ScaleMode::Fit),
            "fill" => Ok(ScaleMode::Fill),
            "original" => Ok(ScaleMode::Original),
            "custom" => Ok(ScaleMode::Custom),
            other => Err(format!(
                "Invalid scale mode: {}. Use: fit, fill, original, custom",
                other
            )),
        }
    }
}

/// Fixed margins of the viewer window layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Subtracted from the window size to get the content area.
    pub margin: Size,
    /// Top-left corner of the content area.
    pub content_origin: (u32, u32),
    /// Where an oversized frame is pinned.
    pub pinned_origin: (u32, u32),
    /// Subtracted from the window size to get the clip rectangle of a pinned frame.
    pub pinned_inset: Size,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            margin: Size::new(60, 100),
            content_origin: (30, 50),
            pinned_origin: (10, 70),
            pinned_inset: Size::new(20, 120),
        }
    }
}

impl Layout {
    /// Window size minus the fixed margins.
    pub fn content_area(&self, window: Size) -> Size {
        Size::new(
            window.w.saturating_sub(self.margin.w),
            window.h.saturating_sub(self.margin.h),
        )
    }

    fn pinned_clip(&self, window: Size) -> Size {
        Size::new(
            window.w.saturating_sub(self.pinned_inset.w),
            window.h.saturating_sub(self.pinned_inset.h),
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Placement {
    Centered,
    Pinned,
}

/// Region of the source frame, in source pixels, that ends up on screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SourceRegion {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Complete draw plan for one frame in one window.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawPlan {
    pub mode: ScaleMode,
    pub scale: f64,
    /// Source frame dimensions
    pub image: Size,
    /// Frame dimensions after scaling
    pub scaled: Size,
    /// Canvas position of the top-left visible pixel
    pub origin: (u32, u32),
    /// Part of `scaled` that is actually drawn
    pub visible: Size,
    pub placement: Placement,
}

impl DrawPlan {
    /// `Original` mode (or a custom zoom of exactly 1.0) copies pixels untouched.
    pub fn needs_resample(&self) -> bool {
        self.scale != 1.0
    }

    pub fn is_clipped(&self) -> bool {
        self.visible != self.scaled
    }

    /// Source rectangle that maps onto the visible part of the drawn frame.
    /// Cropping always starts at the frame's top-left corner.
    pub fn source_region(&self) -> SourceRegion {
        let width = if self.visible == self.scaled {
            self.image.w as f64
        } else {
            (self.visible.w as f64 / self.scale).min(self.image.w as f64)
        };
        let height = if self.visible == self.scaled {
            self.image.h as f64
        } else {
            (self.visible.h as f64 / self.scale).min(self.image.h as f64)
        };
        SourceRegion {
            left: 0.0,
            top: 0.0,
            width,
            height,
        }
    }
}

/// Scale factor for `mode` without any placement logic.
pub fn mode_scale(mode: ScaleMode, custom_scale: f64, image: Size, window: Size, layout: &Layout) -> f64 {
    match mode {
        ScaleMode::Original => 1.0,
        ScaleMode::Custom => custom_scale,
        ScaleMode::Fit | ScaleMode::Fill => {
            if image.is_empty() {
                return 1.0;
            }
            let area = layout.content_area(window);
            let sx = area.w as f64 / image.w as f64;
            let sy = area.h as f64 / image.h as f64;
            if mode == ScaleMode::Fit {
                sx.min(sy)
            } else {
                sx.max(sy)
            }
        }
    }
}

/// Compute where and how large `image` is drawn in `window`.
///
/// Returns `None` for an empty frame or an empty window.
pub fn build_draw_plan(
    mode: ScaleMode,
    custom_scale: f64,
    image: Size,
    window: Size,
    layout: &Layout,
) -> Option<DrawPlan> {
    if image.is_empty() || window.is_empty() {
        return None;
    }

    let scale = mode_scale(mode, custom_scale, image, window, layout);
    let scaled = Size::new(
        ((image.w as f64 * scale).round() as u32).max(1),
        ((image.h as f64 * scale).round() as u32).max(1),
    );

    let content = layout.content_area(window);
    let plan = if scaled.w <= content.w && scaled.h <= content.h {
        let (cx, cy) = layout.content_origin;
        DrawPlan {
            mode,
            scale,
            image,
            scaled,
            origin: (cx + (content.w - scaled.w) / 2, cy + (content.h - scaled.h) / 2),
            visible: scaled,
            placement: Placement::Centered,
        }
    } else {
        let clip = layout.pinned_clip(window);
        DrawPlan {
            mode,
            scale,
            image,
            scaled,
            origin: layout.pinned_origin,
            visible: Size::new(scaled.w.min(clip.w), scaled.h.min(clip.h)),
            placement: Placement::Pinned,
        }
    };
    Some(plan)
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE: Size = Size::new(2000, 1000);
    const WINDOW: Size = Size::new(1400, 900);

    #[test]
    fn test_original_is_always_unit_scale() {
        let layout = Layout::default();
        for image in [Size::new(1, 1), IMAGE, Size::new(8000, 300)] {
            for window in [WINDOW, Size::new(100, 100), Size::new(4000, 3000)] {
                let plan = build_draw_plan(ScaleMode::Original, 3.5, image, window, &layout).unwrap();
                assert_eq!(plan.scale, 1.0);
                assert!(!plan.needs_resample());
                assert_eq!(plan.scaled, image);
            }
        }
    }

    #[test]
    fn test_fit_centers_inside_content_area() {
        let plan = build_draw_plan(ScaleMode::Fit, 1.0, IMAGE, WINDOW, &Layout::default()).unwrap();
        assert!((plan.scale - 0.67).abs() < 1e-9);
        assert_eq!(plan.scaled, Size::new(1340, 670));
        assert_eq!(plan.placement, Placement::Centered);
        assert_eq!(plan.visible, plan.scaled);
        assert_eq!(plan.origin, (30, 50 + (800 - 670) / 2));
    }

    #[test]
    fn test_fill_clips_instead_of_shrinking() {
        let plan = build_draw_plan(ScaleMode::Fill, 1.0, IMAGE, WINDOW, &Layout::default()).unwrap();
        assert!((plan.scale - 0.8).abs() < 1e-9);
        assert_eq!(plan.scaled, Size::new(1600, 800));
        assert_eq!(plan.placement, Placement::Pinned);
        assert_eq!(plan.origin, (10, 70));
        assert_eq!(plan.visible, Size::new(1380, 780));
        assert!(plan.is_clipped());

        let region = plan.source_region();
        assert!((region.width - 1380.0 / 0.8).abs() < 1e-9);
        assert!((region.height - 780.0 / 0.8).abs() < 1e-9);
    }

    #[test]
    fn test_original_oversized_frame_is_pinned() {
        let plan = build_draw_plan(ScaleMode::Original, 1.0, IMAGE, WINDOW, &Layout::default()).unwrap();
        assert_eq!(plan.placement, Placement::Pinned);
        assert_eq!(plan.visible, Size::new(1380, 780));
        assert_eq!(plan.source_region().width, 1380.0);
    }

    #[test]
    fn test_custom_uses_zoom_factor() {
        let plan = build_draw_plan(ScaleMode::Custom, 0.25, IMAGE, WINDOW, &Layout::default()).unwrap();
        assert_eq!(plan.scaled, Size::new(500, 250));
        assert_eq!(plan.placement, Placement::Centered);
    }

    #[test]
    fn test_tiny_window_never_panics() {
        let plan = build_draw_plan(ScaleMode::Fit, 1.0, IMAGE, Size::new(40, 40), &Layout::default()).unwrap();
        assert_eq!(plan.scaled, Size::new(1, 1));
        assert!(build_draw_plan(ScaleMode::Fit, 1.0, Size::new(0, 10), WINDOW, &Layout::default()).is_none());
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("FIT".parse::<ScaleMode>().unwrap(), ScaleMode::Fit);
        assert_eq!("custom".parse::<ScaleMode>().unwrap(), ScaleMode::Custom);
        assert!("zoom".parse::<ScaleMode>().is_err());
        assert_eq!(ScaleMode::default(), ScaleMode::Original);
    }
}
