//! Composes one tick into a 0RGB `u32` canvas: background, the current frame
//! placed according to its draw plan, then overlay text.
//!
//! The resampled visible region is cached and reused while neither the frame
//! nor the plan changes, so an idle viewer does no scaling work.

use fast_image_resize::Resizer;
use log::warn;
use viz_scale::cpu::{blit_rgb_to_xrgb, fill_xrgb, render_visible_rgb};
use viz_scale::{DrawPlan, Layout, Size};

use crate::core::Frame;
use crate::error::VizError;
use crate::viz::overlay::{draw_text, overlay_lines};
use crate::viz::state::DisplayState;

pub const BACKGROUND: [u8; 3] = [30, 30, 30];

pub struct Compositor {
    size: Size,
    canvas: Vec<u32>,
    resizer: Resizer,
    visible: Vec<u8>,
    cached: Option<(Frame, DrawPlan)>,
}

impl Compositor {
    pub fn new(size: Size) -> Self {
        Self {
            size,
            canvas: vec![0; size.area()],
            resizer: Resizer::new(),
            visible: Vec::new(),
            cached: None,
        }
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn resize(&mut self, size: Size) {
        self.size = size;
        self.canvas = vec![0; size.area()];
        self.cached = None;
    }

    /// Draw the whole tick and return the finished canvas.
    pub fn compose(&mut self, state: &DisplayState, title: &str, fps: u32, layout: &Layout) -> &[u32] {
        fill_xrgb(&mut self.canvas, BACKGROUND);

        let plan = state.plan(self.size, layout);
        if let (Some(frame), Some(plan)) = (state.last_frame(), plan.as_ref()) {
            self.draw_frame(frame, plan);
        }

        for line in overlay_lines(title, fps, state, plan.as_ref(), self.size) {
            draw_text(&mut self.canvas, self.size, &line);
        }
        &self.canvas
    }

    fn draw_frame(&mut self, frame: &Frame, plan: &DrawPlan) {
        let fresh = match &self.cached {
            Some((cached_frame, cached_plan)) => cached_frame.ptr_eq(frame) && cached_plan == plan,
            None => false,
        };

        if !fresh {
            self.cached = None;
            if let Err(e) = render_visible_rgb(&mut self.resizer, frame.as_rgb(), plan, &mut self.visible) {
                warn!("skipping frame: {}", VizError::from(e));
                return;
            }
            self.cached = Some((frame.clone(), *plan));
        }

        blit_rgb_to_xrgb(&self.visible, plan.visible, &mut self.canvas, self.size, plan.origin);
    }
}
