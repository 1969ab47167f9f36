//! # Drive Viz
//!
//! Evaluation glue for running a driving agent inside CARLA through the
//! Bench2Drive leaderboard, and a live visualizer the agent loop can push
//! camera or debug images into.
//!
//! ## Architecture
//!
//! - `core`: the [`core::Frame`] type and the bounded [`core::FrameChannel`]
//!   that hands frames from the agent to the render thread
//! - `viz`: the [`Visualizer`] handle, render loop, compositor and overlay
//! - `config`: visualizer and evaluation configuration with validation
//! - `eval`: port discovery, evaluator command construction, subprocess
//!   lifecycle and result checkpoint parsing
//! - `error`: the shared error type
//!
//! Geometry and resampling live in the `viz-scale` workspace crate.
//!
//! ## Example
//!
//! ```rust,no_run
//! use drive_viz::{Visualizer, VisualizerConfig};
//!
//! # fn example() -> drive_viz::VizResult<()> {
//! let viz = Visualizer::new(VisualizerConfig::default());
//! viz.start()?;
//!
//! let camera = image::RgbImage::new(1600, 900);
//! viz.submit_frame(camera);
//!
//! viz.stop();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod eval;
pub mod viz;

pub use config::{EvalConfig, VisualizerConfig};
pub use core::{Frame, FrameChannel, IntoFrame, PixelLayout, RawImage};
pub use error::{HasRecoverySuggestion, HasSeverity, Recoverable, VizError, VizResult};
pub use viz::Visualizer;
pub use viz_scale::{ScaleMode, Size};
