//! Conversion of grayscale images into the controller's page-addressed display RAM layout.
//!
//! The buffer is page-major: page 0's 128 column bytes, then page 1's, and so on. Within a byte,
//! bit `j` is pixel row `page * 8 + j`, so the least significant bit is the topmost row of the
//! page. A set bit is a dark pixel.

use core::slice::ChunksExact;

use itertools::iproduct;

use crate::command::consts::*;
use crate::error::DimensionError;
use crate::image::{GrayImage, Resized};

/// Intensities below this are dark (bit set), at or above it light (bit clear).
pub const THRESHOLD: u8 = 128;

/// A full-screen image in display RAM layout.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bytes: [u8; BUF_LEN],
}

impl FrameBuffer {
    /// All pixels off.
    pub const fn blank() -> Self {
        Self {
            bytes: [0x00; BUF_LEN],
        }
    }

    /// All pixels on.
    pub const fn filled() -> Self {
        Self {
            bytes: [0xFF; BUF_LEN],
        }
    }

    /// Threshold `image` into a frame buffer. Images that are not exactly 128x48 are first
    /// scaled to that size by nearest-neighbour sampling; an image with no pixels is an error.
    pub fn encode<I: GrayImage>(image: &I) -> Result<Self, DimensionError> {
        if image.size() == (NUM_PIXEL_COLS as u32, NUM_PIXEL_ROWS as u32) {
            Ok(Self::encode_exact(image))
        } else {
            Ok(Self::encode_exact(&Resized::new(image)?))
        }
    }

    fn encode_exact<I: GrayImage>(image: &I) -> Self {
        let mut fb = Self::blank();
        for (page, col) in iproduct!(0..NUM_PAGES as u32, 0..NUM_PIXEL_COLS as u32) {
            let top = page * ROWS_PER_PAGE as u32;
            let byte = (0..ROWS_PER_PAGE as u32)
                .filter(|&j| image.luma(col, top + j) < THRESHOLD)
                .fold(0u8, |acc, j| acc | 1 << j);
            fb.bytes[page as usize * NUM_PIXEL_COLS as usize + col as usize] = byte;
        }
        fb
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The 128 column bytes of one page, or `None` past the last page.
    pub fn page(&self, page: u8) -> Option<&[u8]> {
        if page > PAGE_MAX {
            return None;
        }
        let start = page as usize * NUM_PIXEL_COLS as usize;
        Some(&self.bytes[start..start + NUM_PIXEL_COLS as usize])
    }

    /// The pages in display order.
    pub fn pages(&self) -> ChunksExact<'_, u8> {
        self.bytes.chunks_exact(NUM_PIXEL_COLS as usize)
    }

    /// Whether the pixel at column `x`, row `y` is on, or `None` if outside the display.
    pub fn pixel(&self, x: u8, y: u8) -> Option<bool> {
        if x > PIXEL_COL_MAX || y >= NUM_PIXEL_ROWS {
            return None;
        }
        let idx = (y / ROWS_PER_PAGE) as usize * NUM_PIXEL_COLS as usize + x as usize;
        Some(self.bytes[idx] & 1 << (y % ROWS_PER_PAGE) != 0)
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::blank()
    }
}

impl core::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_struct("FrameBuffer")
            .field("lit", &self.bytes.iter().map(|b| b.count_ones()).sum::<u32>())
            .finish()
    }
}
