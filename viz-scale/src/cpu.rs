// SPDX-License-Identifier: MIT
// CPU scaler built on fast_image_resize (SIMD-accelerated).
// RGB8 in → RGB8 out for the visible region only, then blitted onto a 0RGB canvas.

use fast_image_resize as fir;
use fir::images::{TypedImage, TypedImageRef};
use fir::pixels::U8x3;
use fir::{FilterType, ResizeAlg, ResizeOptions, Resizer};

use crate::geometry::{DrawPlan, Size, SourceRegion};

#[derive(Debug)]
pub enum ScaleError {
    BufferTooSmall,
    EmptyRegion,
    Fir(fir::ResizeError),
    ImageBuf(fir::ImageBufferError),
}

impl From<fir::ResizeError> for ScaleError { fn from(e: fir::ResizeError) -> Self { Self::Fir(e) } }
impl From<fir::ImageBufferError> for ScaleError { fn from(e: fir::ImageBufferError) -> Self { Self::ImageBuf(e) } }

impl std::fmt::Display for ScaleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleError::BufferTooSmall => write!(f, "Source buffer too small for its dimensions"),
            ScaleError::EmptyRegion => write!(f, "Nothing visible to scale"),
            ScaleError::Fir(e) => write!(f, "Fast image resize error: {}", e),
            ScaleError::ImageBuf(e) => write!(f, "Image buffer error: {}", e),
        }
    }
}

impl std::error::Error for ScaleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScaleError::Fir(e) => Some(e),
            ScaleError::ImageBuf(e) => Some(e),
            _ => None,
        }
    }
}

/// Resample `region` of a tightly packed RGB8 source into a `dst` sized RGB8 buffer.
/// `out` is resized to `dst.w * dst.h * 3` and reused across calls.
pub fn scale_region_rgb(
    resizer: &mut Resizer,
    src_rgb: &[u8],
    src: Size,
    region: SourceRegion,
    dst: Size,
    out: &mut Vec<u8>,
) -> Result<(), ScaleError> {
    if dst.is_empty() || region.width <= 0.0 || region.height <= 0.0 {
        return Err(ScaleError::EmptyRegion);
    }
    if src_rgb.len() < src.area() * 3 {
        return Err(ScaleError::BufferTooSmall);
    }

    let src_view = TypedImageRef::<U8x3>::from_buffer(src.w, src.h, &src_rgb[..src.area() * 3])?;

    out.clear();
    out.resize(dst.area() * 3, 0);
    let mut dst_image = TypedImage::<U8x3>::from_buffer(dst.w, dst.h, out.as_mut_slice())?;

    let opts = ResizeOptions::new()
        .resize_alg(ResizeAlg::Convolution(FilterType::Bilinear))
        .crop(region.left, region.top, region.width, region.height);
    resizer.resize_typed::<U8x3>(&src_view, &mut dst_image, &opts)?;

    Ok(())
}

/// Produce the visible pixels of `plan` as a tightly packed RGB8 buffer of size `plan.visible`.
/// With a unit scale the source rows are copied as-is, without resampling.
pub fn render_visible_rgb(
    resizer: &mut Resizer,
    src_rgb: &[u8],
    plan: &DrawPlan,
    out: &mut Vec<u8>,
) -> Result<(), ScaleError> {
    if plan.needs_resample() {
        return scale_region_rgb(resizer, src_rgb, plan.image, plan.source_region(), plan.visible, out);
    }

    if src_rgb.len() < plan.image.area() * 3 {
        return Err(ScaleError::BufferTooSmall);
    }
    let src_row = plan.image.w as usize * 3;
    let row_bytes = plan.visible.w.min(plan.image.w) as usize * 3;
    let rows = plan.visible.h.min(plan.image.h) as usize;
    out.clear();
    out.reserve(row_bytes * rows);
    for r in 0..rows {
        out.extend_from_slice(&src_rgb[r * src_row..r * src_row + row_bytes]);
    }
    Ok(())
}

/// Fill a 0RGB canvas with one colour.
#[inline]
pub fn fill_xrgb(canvas: &mut [u32], rgb: [u8; 3]) {
    canvas.fill(pack_xrgb(rgb[0], rgb[1], rgb[2]));
}

#[inline]
pub fn pack_xrgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Copy an RGB8 image onto a 0RGB canvas at `origin`, clipped to the canvas bounds.
pub fn blit_rgb_to_xrgb(
    src_rgb: &[u8],
    src: Size,
    canvas: &mut [u32],
    canvas_size: Size,
    origin: (u32, u32),
) {
    let (ox, oy) = origin;
    if ox >= canvas_size.w || oy >= canvas_size.h {
        return;
    }
    let cols = src.w.min(canvas_size.w - ox) as usize;
    let rows = src.h.min(canvas_size.h - oy) as usize;
    let src_row = src.w as usize * 3;

    for y in 0..rows {
        let s = &src_rgb[y * src_row..][..cols * 3];
        let d_start = (oy as usize + y) * canvas_size.w as usize + ox as usize;
        let d = &mut canvas[d_start..d_start + cols];
        for (px, rgb) in d.iter_mut().zip(s.chunks_exact(3)) {
            *px = pack_xrgb(rgb[0], rgb[1], rgb[2]);
        }
    }
}
