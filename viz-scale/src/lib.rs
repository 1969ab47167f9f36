// SPDX-License-Identifier: MIT
//! # viz-scale: Draw Geometry and Scaling for the Live Viewer
//!
//! This crate holds the window-independent half of the drive-viz render path:
//! deciding how a frame is placed in the window, and producing the pixels that
//! are actually visible.
//!
//! ## Key Components
//!
//! - [`geometry`]: scale modes, window layout and [`geometry::DrawPlan`] computation
//! - [`cpu`]: SIMD resampling of the visible region via fast_image_resize, plus
//!   canvas fill/blit helpers for 0RGB `u32` framebuffers
//!
//! ## Usage Example
//!
//! ```rust
//! use viz_scale::geometry::{build_draw_plan, Layout, ScaleMode, Size};
//!
//! let plan = build_draw_plan(
//!     ScaleMode::Fit,
//!     1.0,
//!     Size::new(2000, 1000),
//!     Size::new(1400, 900),
//!     &Layout::default(),
//! )
//! .unwrap();
//! assert_eq!(plan.scaled, Size::new(1340, 670));
//! ```
//!
//! Only the visible region is ever resampled, so zooming far into a large
//! frame costs no more than drawing a window-sized image.

pub mod cpu;
pub mod geometry;

pub use geometry::{build_draw_plan, DrawPlan, Layout, Placement, ScaleMode, Size};
