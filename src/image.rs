//! Grayscale pixel grids that can be handed to the codec.
//!
//! Any image source works as long as it can report its size and an 8-bit intensity per pixel;
//! decoding files and rendering fonts stay with the caller. `Canvas` is a ready-made 128x48
//! surface, which with the `graphics` feature is an `embedded-graphics` draw target.

use crate::command::consts::*;
use crate::error::DimensionError;

const CANVAS_LEN: usize = NUM_PIXEL_COLS as usize * NUM_PIXEL_ROWS as usize;

/// A rectangular grid of 8-bit grayscale intensities, 0 black to 255 white.
pub trait GrayImage {
    /// Width and height in pixels.
    fn size(&self) -> (u32, u32);

    /// Intensity of the pixel at column `x`, row `y`. Only called with in-bounds coordinates.
    fn luma(&self, x: u32, y: u32) -> u8;
}

impl<'a, I: GrayImage + ?Sized> GrayImage for &'a I {
    fn size(&self) -> (u32, u32) {
        (**self).size()
    }

    fn luma(&self, x: u32, y: u32) -> u8 {
        (**self).luma(x, y)
    }
}

/// A borrowed row-major buffer of one intensity byte per pixel.
#[derive(Clone, Copy, Debug)]
pub struct GrayView<'a> {
    pixels: &'a [u8],
    width: u32,
    height: u32,
}

impl<'a> GrayView<'a> {
    /// Wrap `pixels` as a `width` x `height` image. The slice length must be exactly
    /// `width * height`.
    pub fn new(pixels: &'a [u8], width: u32, height: u32) -> Result<Self, DimensionError> {
        if (width as usize).checked_mul(height as usize) != Some(pixels.len()) {
            return Err(DimensionError);
        }
        Ok(Self {
            pixels,
            width,
            height,
        })
    }
}

impl<'a> GrayImage for GrayView<'a> {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn luma(&self, x: u32, y: u32) -> u8 {
        self.pixels[y as usize * self.width as usize + x as usize]
    }
}

/// Nearest-neighbour view of an image scaled to exactly the display size.
#[derive(Clone, Copy, Debug)]
pub struct Resized<I> {
    inner: I,
    src_width: u32,
    src_height: u32,
}

impl<I: GrayImage> Resized<I> {
    /// Scale `inner` to 128x48. Fails if `inner` has no pixels to sample from.
    pub fn new(inner: I) -> Result<Self, DimensionError> {
        let (src_width, src_height) = inner.size();
        if src_width == 0 || src_height == 0 {
            return Err(DimensionError);
        }
        Ok(Self {
            inner,
            src_width,
            src_height,
        })
    }
}

impl<I: GrayImage> GrayImage for Resized<I> {
    fn size(&self) -> (u32, u32) {
        (NUM_PIXEL_COLS as u32, NUM_PIXEL_ROWS as u32)
    }

    fn luma(&self, x: u32, y: u32) -> u8 {
        let sx = (x as u64 * self.src_width as u64 / NUM_PIXEL_COLS as u64) as u32;
        let sy = (y as u64 * self.src_height as u64 / NUM_PIXEL_ROWS as u64) as u32;
        self.inner.luma(sx, sy)
    }
}

/// An owned 128x48 grayscale drawing surface, initially white.
#[derive(Clone)]
pub struct Canvas {
    pixels: [u8; CANVAS_LEN],
}

impl Canvas {
    pub fn new() -> Self {
        Self::filled(0xFF)
    }

    /// A canvas with every pixel set to `luma`.
    pub fn filled(luma: u8) -> Self {
        Self {
            pixels: [luma; CANVAS_LEN],
        }
    }

    /// Set a pixel. Coordinates outside the canvas are ignored.
    pub fn set(&mut self, x: u32, y: u32, luma: u8) {
        if x < NUM_PIXEL_COLS as u32 && y < NUM_PIXEL_ROWS as u32 {
            self.pixels[y as usize * NUM_PIXEL_COLS as usize + x as usize] = luma;
        }
    }

    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        if x < NUM_PIXEL_COLS as u32 && y < NUM_PIXEL_ROWS as u32 {
            Some(self.pixels[y as usize * NUM_PIXEL_COLS as usize + x as usize])
        } else {
            None
        }
    }

    /// The row-major pixel data.
    pub fn as_bytes(&self) -> &[u8] {
        &self.pixels
    }
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new()
    }
}

impl GrayImage for Canvas {
    fn size(&self) -> (u32, u32) {
        (NUM_PIXEL_COLS as u32, NUM_PIXEL_ROWS as u32)
    }

    fn luma(&self, x: u32, y: u32) -> u8 {
        self.pixels[y as usize * NUM_PIXEL_COLS as usize + x as usize]
    }
}

#[cfg(feature = "graphics")]
use embedded_graphics_core::{
    draw_target::DrawTarget,
    geometry::{OriginDimensions, Size},
    pixelcolor::{Gray8, GrayColor},
    Pixel,
};

#[cfg(feature = "graphics")]
impl DrawTarget for Canvas {
    type Color = Gray8;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        pixels
            .into_iter()
            .filter(|Pixel(pos, _)| pos.x >= 0 && pos.y >= 0)
            .for_each(|Pixel(pos, color)| self.set(pos.x as u32, pos.y as u32, color.luma()));
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.pixels = [color.luma(); CANVAS_LEN];
        Ok(())
    }
}

#[cfg(feature = "graphics")]
impl OriginDimensions for Canvas {
    fn size(&self) -> Size {
        Size::new(NUM_PIXEL_COLS as u32, NUM_PIXEL_ROWS as u32)
    }
}
