//! # Visualizer Configuration
//!
//! Parameters of the live viewer window and its frame hand-off. The defaults
//! give a 1400x900 window, at most five pending frames, 20 ticks per second
//! and a 0.1 zoom step starting at original size.
//!
//! | Parameter | Type | Range | Description |
//! |-----------|------|-------|-------------|
//! | `title` | `String` | non-empty | Window title and overlay heading |
//! | `width` / `height` | `u32` | 160-8192 / 160-8192 | Window size in pixels |
//! | `queue_capacity` | `usize` | 1-64 | Pending frames kept before evicting the oldest |
//! | `fps` | `u32` | 1-240 | Render loop tick rate |
//! | `zoom_step` | `f64` | > 0 | Custom scale increment per key press |
//! | `min_scale` | `f64` | > 0 | Floor of the custom scale |
//! | `initial_mode` | `ScaleMode` | | Mode used after every start |
//!
//! ## Examples
//!
//! ```rust
//! use drive_viz::config::VisualizerConfig;
//! use viz_scale::ScaleMode;
//!
//! let config = VisualizerConfig::default()
//!     .with_title("Agent camera")
//!     .with_initial_mode(ScaleMode::Fit);
//! assert!(config.validate().is_ok());
//! ```

use std::time::Duration;

use viz_scale::{Layout, ScaleMode, Size};

/// Configuration of one visualizer instance.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualizerConfig {
    /// Window title, also drawn as the overlay heading.
    pub title: String,
    pub width: u32,
    pub height: u32,
    /// Maximum number of frames waiting for the render loop.
    pub queue_capacity: usize,
    /// Render loop ticks per second. Matches the agent's inference rate by default.
    pub fps: u32,
    pub zoom_step: f64,
    pub min_scale: f64,
    pub initial_mode: ScaleMode,
    /// Window margins used for placement.
    pub layout: Layout,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self {
            title: "Agent Visualization".to_string(),
            width: 1400,
            height: 900,
            queue_capacity: 5,
            fps: 20,
            zoom_step: 0.1,
            min_scale: 0.1,
            initial_mode: ScaleMode::Original,
            layout: Layout::default(),
        }
    }
}

impl VisualizerConfig {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    pub fn with_fps(mut self, fps: u32) -> Self {
        self.fps = fps;
        self
    }

    pub fn with_initial_mode(mut self, mode: ScaleMode) -> Self {
        self.initial_mode = mode;
        self
    }

    pub fn window_size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Duration of one render tick.
    pub fn tick_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fps.max(1) as f64)
    }

    /// Validates the configuration parameters.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Window title must not be empty".to_string());
        }
        if !(160..=8192).contains(&self.width) || !(160..=8192).contains(&self.height) {
            return Err(format!(
                "Window size must be between 160 and 8192 pixels per side, got {}x{}",
                self.width, self.height
            ));
        }
        if !(1..=64).contains(&self.queue_capacity) {
            return Err("Queue capacity must be between 1 and 64".to_string());
        }
        if !(1..=240).contains(&self.fps) {
            return Err("FPS must be between 1 and 240".to_string());
        }
        if !(self.zoom_step > 0.0) {
            return Err("Zoom step must be greater than 0".to_string());
        }
        if !(self.min_scale > 0.0) {
            return Err("Minimum scale must be greater than 0".to_string());
        }
        Ok(())
    }
}
