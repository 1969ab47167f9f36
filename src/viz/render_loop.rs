//! # Render Loop
//!
//! Runs on the dedicated render thread at a fixed tick rate. Each tick:
//!
//! 1. stop if the running flag was cleared
//! 2. apply every pending input event (a quit ends the loop)
//! 3. take at most one frame from the channel
//! 4. compose background, frame and overlay
//! 5. present, then sleep out the rest of the tick
//!
//! Shutdown is cooperative: `stop` clears the running flag and the loop
//! notices it at the top of the next tick.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Instant;

use log::{debug, error, info};

use crate::config::VisualizerConfig;
use crate::core::FrameChannel;
use crate::viz::compositor::Compositor;
use crate::viz::state::{DisplayState, LoopControl};
use crate::viz::surface::DisplaySurface;

/// Everything the render thread shares with the visualizer handle.
#[derive(Clone)]
pub struct RenderContext {
    pub config: VisualizerConfig,
    pub channel: Arc<FrameChannel>,
    pub running: Arc<AtomicBool>,
}

/// Why the render loop ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopExit {
    /// Running flag cleared by `stop`
    Stopped,
    /// Quit event from the window
    Quit,
    /// The surface refused a frame
    PresentFailed,
    /// The surface could not be created
    InitFailed,
}

/// Drive `surface` until stopped, quit, or presenting fails.
/// Clears the running flag on every exit path except `Stopped`, where it is already clear.
pub fn run_render_loop(surface: &mut dyn DisplaySurface, ctx: &RenderContext) -> LoopExit {
    let config = &ctx.config;
    let period = config.tick_period();
    let mut state = DisplayState::new(config);
    let mut compositor = Compositor::new(surface.size());
    let mut ticks: u64 = 0;

    info!("render loop started at {} FPS", config.fps);

    while ctx.running.load(Ordering::Acquire) {
        let tick_start = Instant::now();

        for event in surface.poll_events() {
            if state.apply(event) == LoopControl::Quit {
                info!("quit requested from the window");
                ctx.running.store(false, Ordering::Release);
                return LoopExit::Quit;
            }
        }

        if let Some(frame) = ctx.channel.try_take() {
            state.accept_frame(frame);
        }

        let size = surface.size();
        if size != compositor.size() {
            compositor.resize(size);
        }
        let canvas = compositor.compose(&state, &config.title, config.fps, &config.layout);
        if let Err(e) = surface.present(canvas, size) {
            error!("{}", e);
            ctx.running.store(false, Ordering::Release);
            return LoopExit::PresentFailed;
        }

        ticks += 1;
        if ticks % (config.fps.max(1) as u64 * 10) == 0 {
            debug!(
                "tick {}: {} frames shown, {} pending",
                ticks,
                state.frames_received(),
                ctx.channel.len()
            );
        }

        if let Some(remaining) = period.checked_sub(tick_start.elapsed()) {
            thread::sleep(remaining);
        }
    }

    LoopExit::Stopped
}
