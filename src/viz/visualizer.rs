//! # Visualizer Handle
//!
//! Explicit handle to one live viewer. The orchestration code creates it and
//! passes it (or an `Arc` of it) to whatever needs to push frames; there is
//! no process-wide instance.
//!
//! States are `Stopped` and `Running`:
//!
//! - `start` spawns the render thread, waits until the surface exists and
//!   reports a creation failure as an error; while running it is a no-op
//! - `stop` clears the running flag, joins the render thread and drops every
//!   pending frame; calling it again does nothing
//! - closing the window moves to `Stopped` on its own
//!
//! `submit_frame` never blocks and never fails from the caller's point of
//! view: when stopped, or when the image cannot be converted, the frame is
//! silently dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{RecvTimeoutError, Sender};
use log::{debug, error, info, warn};

use crate::config::VisualizerConfig;
use crate::core::{ChannelStats, FrameChannel, IntoFrame, SubmitOutcome};
use crate::error::{VizError, VizResult};
use crate::viz::render_loop::{run_render_loop, LoopExit, RenderContext};
use crate::viz::surface::{SurfaceFactory, WindowSurfaceFactory};

/// How long `start` waits for the render thread to create its surface.
pub const STARTUP_TIMEOUT: Duration = Duration::from_secs(5);

pub struct Visualizer {
    config: VisualizerConfig,
    channel: Arc<FrameChannel>,
    running: Arc<AtomicBool>,
    render_thread: Mutex<Option<JoinHandle<LoopExit>>>,
    factory: Arc<dyn SurfaceFactory>,
}

impl Visualizer {
    /// Visualizer drawing into an on-screen window.
    pub fn new(config: VisualizerConfig) -> Self {
        Self::with_surface_factory(config, WindowSurfaceFactory)
    }

    /// Visualizer drawing into surfaces made by `factory`.
    pub fn with_surface_factory(config: VisualizerConfig, factory: impl SurfaceFactory) -> Self {
        let channel = Arc::new(FrameChannel::closed(config.queue_capacity));
        Self {
            config,
            channel,
            running: Arc::new(AtomicBool::new(false)),
            render_thread: Mutex::new(None),
            factory: Arc::new(factory),
        }
    }

    pub fn config(&self) -> &VisualizerConfig {
        &self.config
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    fn slot(&self) -> MutexGuard<'_, Option<JoinHandle<LoopExit>>> {
        self.render_thread.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Enter `Running`. Idempotent; never creates a second render loop.
    pub fn start(&self) -> VizResult<()> {
        let mut slot = self.slot();

        if slot.is_some() && self.is_running() {
            debug!("visualizer already running");
            return Ok(());
        }
        // a loop that ended on its own (window closed) is reaped before restarting
        if let Some(handle) = slot.take() {
            join_render_thread(handle);
        }

        self.config
            .validate()
            .map_err(|reason| VizError::config("visualizer", &self.config.title, reason))?;

        self.running.store(true, Ordering::Release);
        self.channel.open();

        let ctx = RenderContext {
            config: self.config.clone(),
            channel: Arc::clone(&self.channel),
            running: Arc::clone(&self.running),
        };
        let factory = Arc::clone(&self.factory);
        let (ready_tx, ready_rx) = crossbeam_channel::bounded(1);

        let handle = thread::Builder::new()
            .name("viz-render".to_string())
            .spawn(move || render_thread_main(factory, ctx, ready_tx))
            .map_err(|e| {
                self.running.store(false, Ordering::Release);
                self.channel.close();
                VizError::io("spawn render thread", e)
            })?;

        match ready_rx.recv_timeout(STARTUP_TIMEOUT) {
            Ok(Ok(())) => {
                *slot = Some(handle);
                info!("visualizer started ({}x{})", self.config.width, self.config.height);
                Ok(())
            }
            Ok(Err(e)) => {
                join_render_thread(handle);
                Err(e)
            }
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                self.running.store(false, Ordering::Release);
                self.channel.close();
                // joined by the next stop/start once surface creation returns
                *slot = Some(handle);
                Err(VizError::display_init(
                    self.factory.name(),
                    format!("surface not ready within {:?}", STARTUP_TIMEOUT),
                ))
            }
        }
    }

    /// Enter `Stopped`: join the render thread and drop pending frames. Idempotent.
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
        let mut slot = self.slot();
        // a start that held the lock may have set the flag again
        self.running.store(false, Ordering::Release);
        if let Some(handle) = slot.take() {
            join_render_thread(handle);
            info!("visualizer stopped");
        }
        self.channel.close();
    }

    /// Hand an image to the render loop. Never blocks, never fails.
    pub fn submit_frame(&self, image: impl IntoFrame) {
        if !self.is_running() {
            return;
        }
        match image.into_frame() {
            Ok(frame) => {
                if self.channel.submit(frame) == SubmitOutcome::Evicted {
                    debug!("render loop behind, evicted oldest pending frame");
                }
            }
            Err(e) => debug!("dropping frame: {}", e),
        }
    }

    pub fn pending_frames(&self) -> usize {
        self.channel.len()
    }

    pub fn channel_stats(&self) -> ChannelStats {
        self.channel.stats()
    }
}

impl Drop for Visualizer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn render_thread_main(
    factory: Arc<dyn SurfaceFactory>,
    ctx: RenderContext,
    ready: Sender<VizResult<()>>,
) -> LoopExit {
    let mut surface = match factory.create(&ctx.config) {
        Ok(surface) => surface,
        Err(e) => {
            error!("{}", e);
            ctx.running.store(false, Ordering::Release);
            ctx.channel.close();
            let _ = ready.send(Err(e));
            return LoopExit::InitFailed;
        }
    };
    let _ = ready.send(Ok(()));

    let exit = run_render_loop(surface.as_mut(), &ctx);
    ctx.running.store(false, Ordering::Release);
    ctx.channel.close();
    drop(surface);
    debug!("render loop exited: {:?}", exit);
    exit
}

fn join_render_thread(handle: JoinHandle<LoopExit>) {
    if handle.thread().id() == thread::current().id() {
        return;
    }
    if handle.join().is_err() {
        warn!("render thread panicked");
    }
}
