//! Shared helpers for the drive-viz integration tests: a headless surface
//! that records what the render loop presents, and frame builders.

#![allow(dead_code)]

pub mod headless {
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    use drive_viz::config::VisualizerConfig;
    use drive_viz::error::VizResult;
    use drive_viz::viz::{DisplaySurface, InputEvent, SurfaceFactory};
    use drive_viz::Size;

    /// What the render thread did to the surface, observable from the test.
    #[derive(Default)]
    pub struct Record {
        pub created: usize,
        pub presented: usize,
        pub last_canvas: Vec<u32>,
        pub pending_events: VecDeque<InputEvent>,
    }

    #[derive(Clone, Default)]
    pub struct Probe(pub Arc<Mutex<Record>>);

    impl Probe {
        pub fn presented(&self) -> usize {
            self.0.lock().unwrap().presented
        }

        pub fn created(&self) -> usize {
            self.0.lock().unwrap().created
        }

        pub fn pixel(&self, size: Size, x: u32, y: u32) -> Option<u32> {
            let record = self.0.lock().unwrap();
            record.last_canvas.get((y * size.w + x) as usize).copied()
        }

        /// Queue an event for the next `poll_events`.
        pub fn push_event(&self, event: InputEvent) {
            self.0.lock().unwrap().pending_events.push_back(event);
        }

        pub fn factory(&self) -> impl SurfaceFactory + use<> {
            let probe = self.clone();
            move |config: &VisualizerConfig| -> VizResult<Box<dyn DisplaySurface>> {
                probe.0.lock().unwrap().created += 1;
                Ok(Box::new(HeadlessSurface {
                    size: config.window_size(),
                    probe: probe.clone(),
                }))
            }
        }
    }

    pub struct HeadlessSurface {
        size: Size,
        probe: Probe,
    }

    impl DisplaySurface for HeadlessSurface {
        fn size(&self) -> Size {
            self.size
        }

        fn poll_events(&mut self) -> Vec<InputEvent> {
            self.probe.0.lock().unwrap().pending_events.drain(..).collect()
        }

        fn present(&mut self, canvas: &[u32], _size: Size) -> VizResult<()> {
            let mut record = self.probe.0.lock().unwrap();
            record.presented += 1;
            record.last_canvas.clear();
            record.last_canvas.extend_from_slice(canvas);
            Ok(())
        }
    }
}

pub mod frames {
    use drive_viz::Frame;

    /// Solid-colour RGB frame.
    pub fn solid(width: u32, height: u32, rgb: [u8; 3]) -> Frame {
        let data = rgb.repeat((width * height) as usize);
        Frame::from_rgb(width, height, data).unwrap()
    }

    /// Frame whose first pixel encodes `id`, to tell frames apart after a hand-off.
    pub fn tagged(id: u8) -> Frame {
        let mut data = vec![0u8; 4 * 4 * 3];
        data[0] = id;
        Frame::from_rgb(4, 4, data).unwrap()
    }

    pub fn tag(frame: &Frame) -> u8 {
        frame.as_rgb()[0]
    }
}

pub mod wait {
    use std::time::{Duration, Instant};

    /// Poll `cond` until it holds or `timeout` passes.
    pub fn until(timeout: Duration, mut cond: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        cond()
    }
}
