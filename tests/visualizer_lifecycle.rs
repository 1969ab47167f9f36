mod common;

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use common::frames::{solid, tagged};
use common::headless::Probe;
use common::wait;
use drive_viz::error::{VizError, VizResult};
use drive_viz::core::FrameChannel;
use drive_viz::viz::{
    run_render_loop, DisplaySurface, InputEvent, LoopExit, NoDisplayFactory, RenderContext, SurfaceFactory,
};
use drive_viz::{ScaleMode, Size, Visualizer, VisualizerConfig};

const TIMEOUT: Duration = Duration::from_secs(5);

fn config() -> VisualizerConfig {
    VisualizerConfig::default().with_size(400, 300)
}

fn headless() -> (Visualizer, Probe) {
    let probe = Probe::default();
    let viz = Visualizer::with_surface_factory(config(), probe.factory());
    (viz, probe)
}

#[test]
fn test_frame_reaches_the_canvas() {
    let (viz, probe) = headless();
    viz.start().unwrap();
    assert!(viz.is_running());

    viz.submit_frame(solid(10, 10, [255, 0, 0]));
    let size = Size::new(400, 300);
    assert!(wait::until(TIMEOUT, || probe.pixel(size, 200, 150) == Some(0x00FF_0000)));

    viz.stop();
    assert!(!viz.is_running());
}

#[test]
fn test_stop_twice_is_safe() {
    let (viz, _probe) = headless();
    viz.start().unwrap();
    viz.stop();
    viz.stop();
    assert!(!viz.is_running());
}

#[test]
fn test_stop_without_start_is_a_noop() {
    let (viz, probe) = headless();
    viz.stop();
    assert_eq!(probe.created(), 0);
}

#[test]
fn test_submit_while_stopped_is_dropped() {
    let (viz, _probe) = headless();
    viz.submit_frame(solid(8, 8, [1, 2, 3]));
    assert_eq!(viz.pending_frames(), 0);

    viz.start().unwrap();
    viz.stop();
    viz.submit_frame(solid(8, 8, [1, 2, 3]));
    assert_eq!(viz.pending_frames(), 0);
}

#[test]
fn test_start_is_idempotent() {
    let (viz, probe) = headless();
    viz.start().unwrap();
    viz.start().unwrap();
    assert_eq!(probe.created(), 1);
    viz.stop();
}

#[test]
fn test_restart_after_stop() {
    let (viz, probe) = headless();
    viz.start().unwrap();
    viz.stop();
    viz.start().unwrap();
    assert!(viz.is_running());
    assert_eq!(probe.created(), 2);
    viz.stop();
}

#[test]
fn test_display_init_failure_leaves_visualizer_stopped() {
    let viz = Visualizer::with_surface_factory(config(), NoDisplayFactory);
    let err = viz.start().unwrap_err();
    assert!(matches!(err, VizError::DisplayInit { .. }));
    assert!(!viz.is_running());

    viz.submit_frame(solid(8, 8, [0, 0, 0]));
    assert_eq!(viz.pending_frames(), 0);
    viz.stop();
}

#[test]
fn test_invalid_config_is_rejected() {
    let probe = Probe::default();
    let viz = Visualizer::with_surface_factory(config().with_fps(0), probe.factory());
    assert!(matches!(viz.start(), Err(VizError::Config { .. })));
    assert_eq!(probe.created(), 0);
}

#[test]
fn test_quit_event_stops_the_loop() {
    let (viz, probe) = headless();
    viz.start().unwrap();
    probe.push_event(InputEvent::SetMode(ScaleMode::Fit));
    probe.push_event(InputEvent::Quit);

    assert!(wait::until(TIMEOUT, || !viz.is_running()));
    viz.submit_frame(solid(8, 8, [0, 0, 0]));
    assert_eq!(viz.pending_frames(), 0);

    // a closed window can be reopened
    viz.start().unwrap();
    assert!(viz.is_running());
    viz.stop();
}

#[test]
fn test_present_failure_stops_the_loop() {
    struct Broken;

    impl DisplaySurface for Broken {
        fn size(&self) -> Size {
            Size::new(200, 200)
        }

        fn poll_events(&mut self) -> Vec<InputEvent> {
            Vec::new()
        }

        fn present(&mut self, _canvas: &[u32], _size: Size) -> VizResult<()> {
            Err(VizError::render("present", "surface lost"))
        }
    }

    let viz = Visualizer::with_surface_factory(config(), |_: &VisualizerConfig| -> VizResult<Box<dyn DisplaySurface>> {
        Ok(Box::new(Broken))
    });
    viz.start().unwrap();
    assert!(wait::until(TIMEOUT, || !viz.is_running()));
    viz.stop();
}

#[test]
fn test_drop_joins_render_thread() {
    let (viz, probe) = headless();
    viz.start().unwrap();
    assert!(wait::until(TIMEOUT, || probe.presented() > 0));
    drop(viz);

    let presented = probe.presented();
    std::thread::sleep(Duration::from_millis(150));
    assert_eq!(probe.presented(), presented);
}

/// Surface that asks to quit once it has shown one canvas.
struct SingleTick {
    presented: usize,
}

impl DisplaySurface for SingleTick {
    fn size(&self) -> Size {
        Size::new(400, 300)
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        if self.presented > 0 {
            vec![InputEvent::Quit]
        } else {
            Vec::new()
        }
    }

    fn present(&mut self, _canvas: &[u32], _size: Size) -> VizResult<()> {
        self.presented += 1;
        Ok(())
    }
}

#[test]
fn test_one_frame_taken_per_tick() {
    let config = config();
    let k = config.queue_capacity;
    let channel = Arc::new(FrameChannel::new(k));
    for id in 0..k as u8 {
        channel.submit(tagged(id));
    }

    let ctx = RenderContext {
        config,
        channel: Arc::clone(&channel),
        running: Arc::new(AtomicBool::new(true)),
    };
    let mut surface = SingleTick { presented: 0 };

    assert_eq!(run_render_loop(&mut surface, &ctx), LoopExit::Quit);
    assert_eq!(surface.presented, 1);
    assert_eq!(channel.len(), k - 1);
    assert_eq!(channel.stats().taken, 1);
    assert!(!ctx.running.load(Ordering::Acquire));
}

#[test]
fn test_stop_waits_out_a_restart_reaping_a_stuck_surface() {
    let (release_tx, release_rx) = crossbeam_channel::bounded::<()>(1);
    let calls = Arc::new(AtomicUsize::new(0));
    let probe = Probe::default();
    let inner = probe.factory();

    let factory = {
        let calls = Arc::clone(&calls);
        move |config: &VisualizerConfig| -> VizResult<Box<dyn DisplaySurface>> {
            if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                // first surface hangs past the startup timeout
                let _ = release_rx.recv();
            }
            inner.create(config)
        }
    };
    let viz = Arc::new(Visualizer::with_surface_factory(config(), factory));

    assert!(matches!(viz.start(), Err(VizError::DisplayInit { .. })));
    assert!(!viz.is_running());

    // restart holds the handle lock while it reaps the stuck thread
    let restart = {
        let viz = Arc::clone(&viz);
        std::thread::spawn(move || viz.start())
    };
    std::thread::sleep(Duration::from_millis(100));

    let (stopped_tx, stopped_rx) = crossbeam_channel::bounded(1);
    {
        let viz = Arc::clone(&viz);
        std::thread::spawn(move || {
            viz.stop();
            let _ = stopped_tx.send(());
        });
    }
    std::thread::sleep(Duration::from_millis(100));
    release_tx.send(()).unwrap();

    restart.join().unwrap().unwrap();
    assert!(stopped_rx.recv_timeout(TIMEOUT).is_ok(), "stop never returned");
    assert!(!viz.is_running());
}
