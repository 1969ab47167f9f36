//! `minifb` window backend.

use log::info;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use viz_scale::Size;

use crate::config::VisualizerConfig;
use crate::error::{VizError, VizResult};
use crate::viz::state::InputEvent;
use crate::viz::surface::DisplaySurface;

pub struct MinifbSurface {
    window: Window,
    size: Size,
}

impl MinifbSurface {
    pub fn open(config: &VisualizerConfig) -> VizResult<Self> {
        let size = config.window_size();
        let mut window = Window::new(&config.title, size.w as usize, size.h as usize, WindowOptions::default())
            .map_err(|e| {
                VizError::display_init("minifb", e.to_string()).with_recovery_suggestion(
                    "Set DISPLAY or WAYLAND_DISPLAY, or pass a headless SurfaceFactory",
                )
            })?;
        // the render loop keeps its own cadence
        window.limit_update_rate(None);
        info!("opened {} window '{}'", size, config.title);
        Ok(Self { window, size })
    }
}

fn map_key(key: Key) -> Option<InputEvent> {
    let ch = match key {
        Key::Escape => return Some(InputEvent::Quit),
        Key::Equal | Key::NumPadPlus => '+',
        Key::Minus | Key::NumPadMinus => '-',
        Key::Key0 | Key::NumPad0 => '0',
        Key::Key1 | Key::NumPad1 => '1',
        Key::Key2 | Key::NumPad2 => '2',
        Key::Key3 | Key::NumPad3 => '3',
        Key::Key4 | Key::NumPad4 => '4',
        _ => return None,
    };
    InputEvent::from_key_char(ch)
}

impl DisplaySurface for MinifbSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn poll_events(&mut self) -> Vec<InputEvent> {
        if !self.window.is_open() {
            return vec![InputEvent::Quit];
        }
        self.window
            .get_keys_pressed(KeyRepeat::No)
            .into_iter()
            .filter_map(map_key)
            .collect()
    }

    fn present(&mut self, canvas: &[u32], size: Size) -> VizResult<()> {
        self.window
            .update_with_buffer(canvas, size.w as usize, size.h as usize)
            .map_err(|e| VizError::render("present", e.to_string()))
    }
}
