//! Full example code for setting up an AQM1248A display on a Raspberry Pi running Linux. The
//! module is wired to SPI0 (/dev/spidev0.0), with RS on GPIO24, CS on GPIO8 and /RESET on GPIO23.
//!
//! Needs `linux-embedded-hal = "0.3"` and `embedded-graphics = "0.8"` as dependencies.

extern crate aqm1248a;
extern crate embedded_graphics;
extern crate linux_embedded_hal as linux_hal;

use std::thread;
use std::time::Duration;

use aqm1248a as lcd;
use embedded_graphics::{
    mono_font::{ascii::FONT_10X20, MonoTextStyle},
    pixelcolor::Gray8,
    prelude::*,
    text::{Baseline, Text},
};
use linux_hal::spidev::{SpiModeFlags, SpidevOptions};
use linux_hal::sysfs_gpio::Direction;
use linux_hal::{Delay, Spidev, SysfsPin};

fn output_pin(gpio: u32) -> SysfsPin {
    let pin = SysfsPin::new(gpio as u64);
    pin.export().unwrap();
    pin.set_direction(Direction::Out).unwrap();
    pin
}

fn main() {
    let config = lcd::Config::new().contrast(lcd::consts::DEFAULT_CONTRAST);

    // Open the SPI bus at the configured clock rate.
    let mut spi = Spidev::open("/dev/spidev0.0").unwrap();
    spi.configure(
        &SpidevOptions::new()
            .bits_per_word(8)
            .max_speed_hz(config.get_bus_hz())
            .mode(SpiModeFlags::SPI_MODE_0)
            .build(),
    )
    .unwrap();

    let rs = output_pin(lcd::consts::DEFAULT_RS_GPIO);
    let cs = output_pin(lcd::consts::DEFAULT_CS_GPIO);
    let rst = output_pin(lcd::consts::DEFAULT_RESET_GPIO);

    // Creating the display resets and initializes it, leaving it blank.
    let mut disp = lcd::Display::new(
        lcd::SpiInterface::new(spi, rs),
        cs,
        rst,
        Delay,
        config,
    )
    .unwrap();

    disp.fill().unwrap();
    thread::sleep(Duration::from_secs(1));

    // Draw two lines of dark text on a white canvas.
    let mut canvas = lcd::Canvas::new();
    let style = MonoTextStyle::new(&FONT_10X20, Gray8::BLACK);
    Text::with_baseline("Raspberry Pi", Point::new(0, 0), style, Baseline::Top)
        .draw(&mut canvas)
        .unwrap();
    Text::with_baseline("AQM1248A", Point::new(0, 24), style, Baseline::Top)
        .draw(&mut canvas)
        .unwrap();
    disp.show_image(&canvas).unwrap();

    let (iface, _cs, _rst, _delay) = disp.close();
    let (_spi, _rs) = iface.release();
}
