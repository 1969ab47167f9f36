//! Bitmap text for the overlay, drawn straight into the 0RGB canvas with the
//! 8x8 `font8x8` glyphs. Characters outside ASCII render as `?`.

use font8x8::legacy::BASIC_LEGACY;
use viz_scale::cpu::pack_xrgb;
use viz_scale::{DrawPlan, Size};

use crate::viz::state::DisplayState;

const GLYPH_SIDE: u32 = 8;

pub const WHITE: [u8; 3] = [255, 255, 255];
pub const GRAY: [u8; 3] = [180, 180, 180];
pub const LIGHT_GRAY: [u8; 3] = [200, 200, 200];
pub const GREEN: [u8; 3] = [150, 255, 150];

pub const CONTROLS_HINT: &str = "Controls: +/- Zoom | 0 Reset | 1 Fit | 2 Fill | 3 Original | 4 Custom";
pub const WAITING_TEXT: &str = "Waiting for visualization data...";

/// One line of overlay text.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    pub text: String,
    pub origin: (u32, u32),
    /// Integer glyph magnification.
    pub scale: u32,
    pub color: [u8; 3],
}

impl TextLine {
    fn new(text: impl Into<String>, origin: (u32, u32), scale: u32, color: [u8; 3]) -> Self {
        Self {
            text: text.into(),
            origin,
            scale,
            color,
        }
    }
}

fn glyph_for_char(ch: char) -> [u8; 8] {
    let index = ch as usize;
    if index < BASIC_LEGACY.len() {
        BASIC_LEGACY[index]
    } else {
        BASIC_LEGACY[b'?' as usize]
    }
}

pub fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH_SIDE * scale
}

/// Draw `line` onto the canvas, clipped to its bounds.
pub fn draw_text(canvas: &mut [u32], canvas_size: Size, line: &TextLine) {
    let color = pack_xrgb(line.color[0], line.color[1], line.color[2]);
    let scale = line.scale.max(1);
    let (mut pen_x, pen_y) = line.origin;

    for ch in line.text.chars() {
        let glyph = glyph_for_char(ch);
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..GLYPH_SIDE {
                // bit 0 is the leftmost pixel
                if bits & (1 << col) == 0 {
                    continue;
                }
                let x0 = pen_x + col * scale;
                let y0 = pen_y + row as u32 * scale;
                for dy in 0..scale {
                    for dx in 0..scale {
                        let (x, y) = (x0 + dx, y0 + dy);
                        if x < canvas_size.w && y < canvas_size.h {
                            canvas[(y * canvas_size.w + x) as usize] = color;
                        }
                    }
                }
            }
        }
        pen_x += GLYPH_SIDE * scale;
        if pen_x >= canvas_size.w {
            break;
        }
    }
}

/// Overlay lines for the current tick: heading, key hints and status lines,
/// or the waiting placeholder before the first frame.
pub fn overlay_lines(
    title: &str,
    fps: u32,
    state: &DisplayState,
    plan: Option<&DrawPlan>,
    window: Size,
) -> Vec<TextLine> {
    let bottom = |offset: u32| window.h.saturating_sub(offset);
    let mode = state.mode().label();
    let custom = state.custom_scale();

    match plan {
        Some(plan) => vec![
            TextLine::new(
                format!("{} - Real-time Visualization ({} FPS)", title, fps),
                (10, 10),
                2,
                WHITE,
            ),
            TextLine::new(CONTROLS_HINT, (10, 40), 1, GRAY),
            TextLine::new(
                format!(
                    "Image: {} | Display: {} | Scale: {:.2}x",
                    plan.image, plan.scaled, plan.scale
                ),
                (10, bottom(65)),
                1,
                LIGHT_GRAY,
            ),
            TextLine::new(
                format!("Mode: {} | Custom Scale: {:.1}x", mode, custom),
                (10, bottom(45)),
                1,
                GREEN,
            ),
            TextLine::new(
                format!("Synchronized with agent inference rate ({} FPS)", fps),
                (10, bottom(25)),
                1,
                GREEN,
            ),
        ],
        None => {
            let width = text_width(WAITING_TEXT, 2);
            let center = (
                (window.w / 2).saturating_sub(width / 2),
                (window.h / 2).saturating_sub(GLYPH_SIDE),
            );
            vec![
                TextLine::new(WAITING_TEXT, center, 2, WHITE),
                TextLine::new(CONTROLS_HINT, (10, 40), 1, GRAY),
                TextLine::new(
                    format!("Current Mode: {} | Custom Scale: {:.1}x", mode, custom),
                    (10, bottom(45)),
                    1,
                    GREEN,
                ),
            ]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VisualizerConfig;
    use crate::core::Frame;
    use viz_scale::Layout;

    #[test]
    fn test_draw_text_sets_pixels_and_clips() {
        let size = Size::new(20, 10);
        let mut canvas = vec![0u32; size.area()];
        let line = TextLine::new("HHHHHH", (0, 0), 1, WHITE);
        draw_text(&mut canvas, size, &line);
        assert!(canvas.iter().any(|&px| px == 0x00FF_FFFF));

        // far outside the canvas, must not panic
        let line = TextLine::new("clipped", (19, 9), 3, WHITE);
        draw_text(&mut canvas, size, &line);
    }

    #[test]
    fn test_waiting_overlay_before_first_frame() {
        let state = DisplayState::new(&VisualizerConfig::default());
        let lines = overlay_lines("Agent", 20, &state, None, Size::new(1400, 900));
        assert_eq!(lines[0].text, WAITING_TEXT);
        assert!(lines.iter().any(|l| l.text.contains("Current Mode: ORIGINAL")));
    }

    #[test]
    fn test_status_overlay_reports_dimensions() {
        let mut state = DisplayState::new(&VisualizerConfig::default());
        state.accept_frame(Frame::from_rgb(4, 2, vec![0; 24]).unwrap());
        let window = Size::new(1400, 900);
        let plan = state.plan(window, &Layout::default()).unwrap();
        let lines = overlay_lines("Agent", 20, &state, Some(&plan), window);
        assert!(lines.iter().any(|l| l.text == "Image: 4x2 | Display: 4x2 | Scale: 1.00x"));
        assert!(lines.iter().any(|l| l.text == "Mode: ORIGINAL | Custom Scale: 1.0x"));
        assert_eq!(lines[2].origin, (10, 835));
    }
}
