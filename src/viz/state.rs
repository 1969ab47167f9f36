//! Display state owned by the render loop, and the input events that mutate it.

use viz_scale::{build_draw_plan, DrawPlan, Layout, ScaleMode, Size};

use crate::config::VisualizerConfig;
use crate::core::Frame;

/// Input understood by the render loop, independent of the windowing backend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Window closed or Escape pressed
    Quit,
    ZoomIn,
    ZoomOut,
    /// Custom scale back to 1.0
    ResetZoom,
    SetMode(ScaleMode),
}

impl InputEvent {
    /// Keyboard binding: `+`/`=` zoom in, `-` zoom out, `0` reset, `1`-`4` fit/fill/original/custom.
    pub fn from_key_char(key: char) -> Option<Self> {
        match key {
            '+' | '=' => Some(InputEvent::ZoomIn),
            '-' => Some(InputEvent::ZoomOut),
            '0' => Some(InputEvent::ResetZoom),
            '1' => Some(InputEvent::SetMode(ScaleMode::Fit)),
            '2' => Some(InputEvent::SetMode(ScaleMode::Fill)),
            '3' => Some(InputEvent::SetMode(ScaleMode::Original)),
            '4' => Some(InputEvent::SetMode(ScaleMode::Custom)),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

/// Mutable viewer state. Only the render loop touches it.
#[derive(Debug, Clone)]
pub struct DisplayState {
    mode: ScaleMode,
    custom_scale: f64,
    zoom_step: f64,
    min_scale: f64,
    last_frame: Option<Frame>,
    frames_received: u64,
}

impl DisplayState {
    pub fn new(config: &VisualizerConfig) -> Self {
        Self {
            mode: config.initial_mode,
            custom_scale: 1.0,
            zoom_step: config.zoom_step,
            min_scale: config.min_scale,
            last_frame: None,
            frames_received: 0,
        }
    }

    pub fn mode(&self) -> ScaleMode {
        self.mode
    }

    pub fn custom_scale(&self) -> f64 {
        self.custom_scale
    }

    pub fn last_frame(&self) -> Option<&Frame> {
        self.last_frame.as_ref()
    }

    pub fn frames_received(&self) -> u64 {
        self.frames_received
    }

    pub fn apply(&mut self, event: InputEvent) -> LoopControl {
        match event {
            InputEvent::Quit => return LoopControl::Quit,
            InputEvent::ZoomIn => self.custom_scale += self.zoom_step,
            InputEvent::ZoomOut => {
                self.custom_scale = (self.custom_scale - self.zoom_step).max(self.min_scale)
            }
            InputEvent::ResetZoom => self.custom_scale = 1.0,
            InputEvent::SetMode(mode) => self.mode = mode,
        }
        LoopControl::Continue
    }

    /// Replace the frame being shown.
    pub fn accept_frame(&mut self, frame: Frame) {
        self.last_frame = Some(frame);
        self.frames_received += 1;
    }

    /// Draw plan of the current frame in `window`, if there is a frame.
    pub fn plan(&self, window: Size, layout: &Layout) -> Option<DrawPlan> {
        let frame = self.last_frame.as_ref()?;
        build_draw_plan(self.mode, self.custom_scale, frame.size(), window, layout)
    }
}
