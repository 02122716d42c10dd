//! Driver library for the Akizuki AQM1248A 128x48 monochrome graphic LCD module, built around an
//! ST7565R-compatible controller on a 4-wire SPI bus.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate embedded_hal as hal;

pub mod codec;
pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod image;
pub mod interface;

// Re-exports for primary API.
pub use codec::FrameBuffer;
pub use command::{consts, Bias, ComScanDirection, Command, SegmentDirection};
pub use config::Config;
pub use display::Display;
pub use error::{DimensionError, Error};
pub use image::{Canvas, GrayImage, GrayView, Resized};
pub use interface::spi::SpiInterface;
