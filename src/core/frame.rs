//! # Frames
//!
//! A [`Frame`] is one decoded RGB8 image on its way to the viewer. Frames are
//! immutable once built; pixel storage sits behind an `Arc` so the render loop
//! can keep the last frame around while the producer moves on.
//!
//! Anything the agent has in memory converts through [`IntoFrame`]: `image`
//! crate buffers, or a borrowed [`RawImage`] for camera/sensor buffers in RGB,
//! BGR, RGBA, BGRA or grayscale layout. Alpha is always discarded.

use std::sync::Arc;

use image::{DynamicImage, RgbImage, RgbaImage};
use viz_scale::Size;

use crate::error::{VizError, VizResult};

/// Immutable RGB8 image, tightly packed, row-major.
#[derive(Clone, Debug)]
pub struct Frame {
    size: Size,
    pixels: Arc<[u8]>,
}

impl Frame {
    /// Build a frame from tightly packed RGB8 bytes.
    pub fn from_rgb(width: u32, height: u32, data: Vec<u8>) -> VizResult<Self> {
        let size = Size::new(width, height);
        if size.is_empty() {
            return Err(VizError::conversion(format!("empty frame {}", size)));
        }
        if data.len() != size.area() * 3 {
            return Err(VizError::conversion(format!(
                "expected {} bytes for {} rgb8, got {}",
                size.area() * 3,
                size,
                data.len()
            )));
        }
        Ok(Self {
            size,
            pixels: data.into(),
        })
    }

    pub fn size(&self) -> Size {
        self.size
    }

    pub fn width(&self) -> u32 {
        self.size.w
    }

    pub fn height(&self) -> u32 {
        self.size.h
    }

    pub fn as_rgb(&self) -> &[u8] {
        &self.pixels
    }

    /// RGB value at (x, y), if inside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.size.w || y >= self.size.h {
            return None;
        }
        let i = (y as usize * self.size.w as usize + x as usize) * 3;
        Some([self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]])
    }

    /// True if both frames share the same pixel storage.
    pub fn ptr_eq(&self, other: &Frame) -> bool {
        Arc::ptr_eq(&self.pixels, &other.pixels)
    }
}

/// Pixel layouts accepted by [`RawImage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelLayout {
    Rgb8,
    Bgr8,
    Rgba8,
    Bgra8,
    Gray8,
}

impl PixelLayout {
    pub fn bytes_per_pixel(&self) -> usize {
        match self {
            PixelLayout::Rgb8 | PixelLayout::Bgr8 => 3,
            PixelLayout::Rgba8 | PixelLayout::Bgra8 => 4,
            PixelLayout::Gray8 => 1,
        }
    }
}

/// Borrowed image buffer with an explicit layout and optional row stride.
#[derive(Debug, Clone, Copy)]
pub struct RawImage<'a> {
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub layout: PixelLayout,
    /// Bytes per row; `None` means tightly packed.
    pub stride: Option<usize>,
}

impl<'a> RawImage<'a> {
    pub fn new(data: &'a [u8], width: u32, height: u32, layout: PixelLayout) -> Self {
        Self {
            data,
            width,
            height,
            layout,
            stride: None,
        }
    }

    pub fn with_stride(mut self, stride: usize) -> Self {
        self.stride = Some(stride);
        self
    }
}

/// Conversion into a [`Frame`]. Implemented for every image type `submit_frame` accepts.
pub trait IntoFrame {
    fn into_frame(self) -> VizResult<Frame>;
}

impl IntoFrame for Frame {
    fn into_frame(self) -> VizResult<Frame> {
        Ok(self)
    }
}

impl IntoFrame for RgbImage {
    fn into_frame(self) -> VizResult<Frame> {
        let (w, h) = self.dimensions();
        Frame::from_rgb(w, h, self.into_raw())
    }
}

impl IntoFrame for RgbaImage {
    fn into_frame(self) -> VizResult<Frame> {
        DynamicImage::ImageRgba8(self).into_rgb8().into_frame()
    }
}

impl IntoFrame for DynamicImage {
    fn into_frame(self) -> VizResult<Frame> {
        self.into_rgb8().into_frame()
    }
}

impl IntoFrame for &DynamicImage {
    fn into_frame(self) -> VizResult<Frame> {
        self.to_rgb8().into_frame()
    }
}

impl IntoFrame for RawImage<'_> {
    fn into_frame(self) -> VizResult<Frame> {
        let size = Size::new(self.width, self.height);
        if size.is_empty() {
            return Err(VizError::conversion(format!("empty raw image {}", size)));
        }
        let bpp = self.layout.bytes_per_pixel();
        let row_bytes = self.width as usize * bpp;
        let stride = self.stride.unwrap_or(row_bytes);
        if stride < row_bytes {
            return Err(VizError::conversion(format!(
                "stride {} shorter than row of {} bytes",
                stride, row_bytes
            )));
        }
        let needed = stride * (self.height as usize - 1) + row_bytes;
        if self.data.len() < needed {
            return Err(VizError::conversion(format!(
                "buffer of {} bytes too short for {} {:?} (needs {})",
                self.data.len(),
                size,
                self.layout,
                needed
            )));
        }

        let mut rgb = Vec::with_capacity(size.area() * 3);
        for y in 0..self.height as usize {
            let row = &self.data[y * stride..y * stride + row_bytes];
            match self.layout {
                PixelLayout::Rgb8 => rgb.extend_from_slice(row),
                PixelLayout::Bgr8 => {
                    for px in row.chunks_exact(3) {
                        rgb.extend_from_slice(&[px[2], px[1], px[0]]);
                    }
                }
                PixelLayout::Rgba8 => {
                    for px in row.chunks_exact(4) {
                        rgb.extend_from_slice(&px[..3]);
                    }
                }
                PixelLayout::Bgra8 => {
                    for px in row.chunks_exact(4) {
                        rgb.extend_from_slice(&[px[2], px[1], px[0]]);
                    }
                }
                PixelLayout::Gray8 => {
                    for &v in row {
                        rgb.extend_from_slice(&[v, v, v]);
                    }
                }
            }
        }
        Frame::from_rgb(self.width, self.height, rgb)
    }
}
