//! # Configuration Module
//!
//! Configuration structures for the live visualizer and for single-scenario evaluation runs.

pub mod config;
pub mod eval;

pub use config::VisualizerConfig;
pub use eval::EvalConfig;
