//! # Live Visualizer
//!
//! A window that shows the most recent frame pushed by the agent loop. The
//! agent submits frames through a [`Visualizer`] handle; a dedicated render
//! thread owns the window, drains the frame channel at a fixed cadence and
//! draws the frame with the selected scale mode plus a status overlay.

pub mod compositor;
pub mod overlay;
pub mod render_loop;
pub mod state;
pub mod surface;
pub mod visualizer;
#[cfg(feature = "window")]
pub mod window;

pub use render_loop::{run_render_loop, LoopExit, RenderContext};
pub use state::{DisplayState, InputEvent, LoopControl};
pub use surface::{DisplaySurface, NoDisplayFactory, SurfaceFactory, WindowSurfaceFactory};
pub use visualizer::Visualizer;
