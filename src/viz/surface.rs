//! # Display Surfaces
//!
//! The seam between the render loop and a windowing backend. A surface is
//! created *inside* the render thread by a [`SurfaceFactory`] and never leaves
//! it.
//!
//! The default factory opens a `minifb` window when the `window` feature is
//! enabled. Without it, surface creation fails and the visualizer stays
//! stopped, which is the same path taken when no display is reachable.

use viz_scale::Size;

use crate::config::VisualizerConfig;
use crate::error::{VizError, VizResult};
use crate::viz::state::InputEvent;

/// A presentable 0RGB framebuffer with an input queue.
pub trait DisplaySurface {
    /// Canvas size the render loop should compose at.
    fn size(&self) -> Size;

    /// Input received since the last call. Closing the window yields [`InputEvent::Quit`].
    fn poll_events(&mut self) -> Vec<InputEvent>;

    /// Show a finished canvas of `size` pixels.
    fn present(&mut self, canvas: &[u32], size: Size) -> VizResult<()>;
}

/// Creates the display surface on the render thread.
pub trait SurfaceFactory: Send + Sync + 'static {
    fn create(&self, config: &VisualizerConfig) -> VizResult<Box<dyn DisplaySurface>>;

    fn name(&self) -> &str {
        "custom"
    }
}

impl<F> SurfaceFactory for F
where
    F: Fn(&VisualizerConfig) -> VizResult<Box<dyn DisplaySurface>> + Send + Sync + 'static,
{
    fn create(&self, config: &VisualizerConfig) -> VizResult<Box<dyn DisplaySurface>> {
        self(config)
    }
}

/// Factory for the on-screen window.
#[derive(Debug, Default, Clone, Copy)]
pub struct WindowSurfaceFactory;

impl SurfaceFactory for WindowSurfaceFactory {
    #[cfg(feature = "window")]
    fn create(&self, config: &VisualizerConfig) -> VizResult<Box<dyn DisplaySurface>> {
        Ok(Box::new(crate::viz::window::MinifbSurface::open(config)?))
    }

    #[cfg(not(feature = "window"))]
    fn create(&self, _config: &VisualizerConfig) -> VizResult<Box<dyn DisplaySurface>> {
        Err(VizError::display_init("window", "drive-viz was built without the `window` feature"))
    }

    fn name(&self) -> &str {
        "minifb"
    }
}

/// Factory that always fails; useful for running the harness without a display.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDisplayFactory;

impl SurfaceFactory for NoDisplayFactory {
    fn create(&self, _config: &VisualizerConfig) -> VizResult<Box<dyn DisplaySurface>> {
        Err(VizError::display_init("none", "display disabled"))
    }

    fn name(&self) -> &str {
        "none"
    }
}
