//! The command set of the AQM1248A's ST7565R-compatible controller.
//!
//! Every command is a single byte sent with RS low. Commands carrying an argument fold it into the
//! low bits of the opcode, except the electronic volume (contrast) level, which is a second
//! command byte following `ElectronicVolumeMode`.
//!
//! Note 1: The display RAM is arranged in pages of 8 pixel rows. Each data byte written covers one
//! column of one page, least significant bit topmost, and the column address auto-increments
//! after every byte.

use crate::error::Error;
use crate::interface::DisplayInterface;

pub mod consts {
    //! Geometry of the module and limits of the command arguments.

    pub const NUM_PIXEL_COLS: u8 = 128;
    pub const NUM_PIXEL_ROWS: u8 = 48;
    pub const ROWS_PER_PAGE: u8 = 8;
    pub const NUM_PAGES: u8 = NUM_PIXEL_ROWS / ROWS_PER_PAGE;
    pub const PIXEL_COL_MAX: u8 = NUM_PIXEL_COLS - 1;
    pub const PAGE_MAX: u8 = NUM_PAGES - 1;
    pub const COLUMN_HIGH_NIBBLE_MAX: u8 = PIXEL_COL_MAX >> 4;
    /// Size in bytes of a full-screen page buffer.
    pub const BUF_LEN: usize = NUM_PAGES as usize * NUM_PIXEL_COLS as usize;

    pub const CONTRAST_MAX: u8 = 0x3F;
    pub const DEFAULT_CONTRAST: u8 = 0x1C;
    pub const RESISTOR_RATIO_MAX: u8 = 7;
    pub const DEFAULT_RESISTOR_RATIO: u8 = 3;
    pub const START_LINE_MAX: u8 = 63;

    /// Length of the low pulse on RESET, in milliseconds.
    pub const RESET_PULSE_MS: u32 = 100;
    /// Settle time after reset and after each power control step, in milliseconds.
    pub const SETTLE_MS: u32 = 2;

    /// Default SPI clock rate.
    pub const DEFAULT_BUS_HZ: u32 = 1_000_000;
    /// Default wiring on a Raspberry Pi header, in BCM GPIO numbers.
    pub const DEFAULT_RS_GPIO: u32 = 24;
    pub const DEFAULT_CS_GPIO: u32 = 8;
    pub const DEFAULT_RESET_GPIO: u32 = 23;
}

use self::consts::*;

/// LCD drive bias ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bias {
    /// 1/9 bias.
    OneNinth,
    /// 1/7 bias, which the AQM1248A module requires.
    OneSeventh,
}

/// Mapping of column addresses onto the SEG driver lines (the "ADC select" command).
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SegmentDirection {
    /// Column address 0 drives SEG0.
    Normal,
    /// Column address 0 drives SEG131.
    Reverse,
}

/// Scan direction of the COM lines. Changing this setting will flip the image vertically.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ComScanDirection {
    /// COM0 scans first.
    Normal,
    /// COM63 scans first. The AQM1248A glass is mounted so that this is the upright orientation.
    Reverse,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Turn the display output on or off. Display RAM is retained while off.
    DisplayOn(bool),
    /// Set the display start line, rolling the image upwards. Range 0-63.
    StartLine(u8),
    /// Set the page address for subsequent data writes. Range 0-5. (Note 1)
    PageAddress(u8),
    /// Set the lower nibble of the column address. Range 0-15.
    ColumnAddressLow(u8),
    /// Set the upper nibble of the column address. Range 0-7.
    ColumnAddressHigh(u8),
    /// Select how column addresses map onto segments.
    SegmentDirection(SegmentDirection),
    /// Show the display RAM inverted (true) or normally (false).
    Inverse(bool),
    /// Light every pixel regardless of RAM content (true), or show RAM (false).
    AllPixelsOn(bool),
    /// Select the LCD bias.
    Bias(Bias),
    /// Select the COM scan direction.
    ComScanDirection(ComScanDirection),
    /// Enable the internal booster, voltage regulator and voltage follower circuits.
    PowerControl {
        booster: bool,
        regulator: bool,
        follower: bool,
    },
    /// Set the V0 voltage regulator internal resistor ratio. Range 0-7.
    ResistorRatio(u8),
    /// Enter electronic volume mode. The next command byte must be `ElectronicVolume`.
    ElectronicVolumeMode,
    /// Electronic volume (contrast) level. Range 0-63.
    ElectronicVolume(u8),
}

impl Command {
    /// Encode the command as its opcode byte, or `None` if the argument is out of range.
    pub fn to_byte(self) -> Option<u8> {
        let byte = match self {
            Command::DisplayOn(on) => match on {
                true => 0xAF,
                false => 0xAE,
            },
            Command::StartLine(line) => match line {
                0..=START_LINE_MAX => 0x40 | line,
                _ => return None,
            },
            Command::PageAddress(page) => match page {
                0..=PAGE_MAX => 0xB0 | page,
                _ => return None,
            },
            Command::ColumnAddressLow(nibble) => match nibble {
                0..=0xF => nibble,
                _ => return None,
            },
            Command::ColumnAddressHigh(nibble) => match nibble {
                0..=COLUMN_HIGH_NIBBLE_MAX => 0x10 | nibble,
                _ => return None,
            },
            Command::SegmentDirection(dir) => match dir {
                SegmentDirection::Normal => 0xA0,
                SegmentDirection::Reverse => 0xA1,
            },
            Command::Inverse(inverse) => match inverse {
                true => 0xA7,
                false => 0xA6,
            },
            Command::AllPixelsOn(on) => match on {
                true => 0xA5,
                false => 0xA4,
            },
            Command::Bias(bias) => match bias {
                Bias::OneNinth => 0xA2,
                Bias::OneSeventh => 0xA3,
            },
            Command::ComScanDirection(dir) => match dir {
                ComScanDirection::Normal => 0xC0,
                ComScanDirection::Reverse => 0xC8,
            },
            Command::PowerControl {
                booster,
                regulator,
                follower,
            } => 0x28 | (booster as u8) << 2 | (regulator as u8) << 1 | follower as u8,
            Command::ResistorRatio(ratio) => match ratio {
                0..=RESISTOR_RATIO_MAX => 0x20 | ratio,
                _ => return None,
            },
            Command::ElectronicVolumeMode => 0x81,
            Command::ElectronicVolume(level) => match level {
                0..=CONTRAST_MAX => level,
                _ => return None,
            },
        };
        Some(byte)
    }

    /// Send the command to the display at `iface`. An out-of-range argument is reported as
    /// `Error::Configuration` and nothing is sent.
    pub fn send<DI, CommE, PinE>(self, iface: &mut DI) -> Result<(), Error<CommE, PinE>>
    where
        DI: DisplayInterface<Error = Error<CommE, PinE>>,
    {
        let cmd = self.to_byte().ok_or(Error::Configuration)?;
        iface.send_command(cmd)
    }
}

/// The two commands addressing column `col`, lower nibble first.
pub fn column_address(col: u8) -> Option<[Command; 2]> {
    match col {
        0..=PIXEL_COL_MAX => Some([
            Command::ColumnAddressLow(col & 0xF),
            Command::ColumnAddressHigh((col >> 4) & 0xF),
        ]),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::test_spy::{Sent, TestSpyInterface};

    #[test]
    fn display_on() {
        assert_eq!(Command::DisplayOn(true).to_byte(), Some(0xAF));
        assert_eq!(Command::DisplayOn(false).to_byte(), Some(0xAE));
    }

    #[test]
    fn start_line() {
        assert_eq!(Command::StartLine(0).to_byte(), Some(0x40));
        assert_eq!(Command::StartLine(63).to_byte(), Some(0x7F));
        assert_eq!(Command::StartLine(64).to_byte(), None);
    }

    #[test]
    fn page_address() {
        assert_eq!(Command::PageAddress(0).to_byte(), Some(0xB0));
        assert_eq!(Command::PageAddress(5).to_byte(), Some(0xB5));
        assert_eq!(Command::PageAddress(6).to_byte(), None);
    }

    #[test]
    fn column_address_nibbles() {
        for &(col, lo, hi) in &[(0, 0x00, 0x10), (15, 0x0F, 0x10), (16, 0x00, 0x11), (127, 0x0F, 0x17)]
        {
            let [l, h] = column_address(col).unwrap();
            assert_eq!(l.to_byte(), Some(lo));
            assert_eq!(h.to_byte(), Some(hi));
            assert_eq!(lo, 0x00 | (col & 0xF));
            assert_eq!(hi, 0x10 | ((col >> 4) & 0xF));
        }
        assert!(column_address(128).is_none());
        assert_eq!(Command::ColumnAddressLow(16).to_byte(), None);
        assert_eq!(Command::ColumnAddressHigh(8).to_byte(), None);
    }

    #[test]
    fn init_opcodes() {
        assert_eq!(Command::SegmentDirection(SegmentDirection::Normal).to_byte(), Some(0xA0));
        assert_eq!(Command::SegmentDirection(SegmentDirection::Reverse).to_byte(), Some(0xA1));
        assert_eq!(Command::ComScanDirection(ComScanDirection::Normal).to_byte(), Some(0xC0));
        assert_eq!(Command::ComScanDirection(ComScanDirection::Reverse).to_byte(), Some(0xC8));
        assert_eq!(Command::Bias(Bias::OneNinth).to_byte(), Some(0xA2));
        assert_eq!(Command::Bias(Bias::OneSeventh).to_byte(), Some(0xA3));
        assert_eq!(Command::AllPixelsOn(false).to_byte(), Some(0xA4));
        assert_eq!(Command::AllPixelsOn(true).to_byte(), Some(0xA5));
        assert_eq!(Command::Inverse(false).to_byte(), Some(0xA6));
        assert_eq!(Command::Inverse(true).to_byte(), Some(0xA7));
    }

    #[test]
    fn power_control() {
        let pc = |booster, regulator, follower| {
            Command::PowerControl {
                booster,
                regulator,
                follower,
            }
            .to_byte()
        };
        assert_eq!(pc(false, false, false), Some(0x28));
        assert_eq!(pc(true, false, false), Some(0x2C));
        assert_eq!(pc(true, true, false), Some(0x2E));
        assert_eq!(pc(true, true, true), Some(0x2F));
    }

    #[test]
    fn contrast_commands() {
        assert_eq!(Command::ResistorRatio(3).to_byte(), Some(0x23));
        assert_eq!(Command::ResistorRatio(8).to_byte(), None);
        assert_eq!(Command::ElectronicVolumeMode.to_byte(), Some(0x81));
        assert_eq!(Command::ElectronicVolume(0x1C).to_byte(), Some(0x1C));
        assert_eq!(Command::ElectronicVolume(0x3F).to_byte(), Some(0x3F));
        assert_eq!(Command::ElectronicVolume(0x40).to_byte(), None);
    }

    #[test]
    fn send_rejects_before_writing() {
        let mut di = TestSpyInterface::new();
        Command::PageAddress(2).send(&mut di).unwrap();
        assert_eq!(
            Command::PageAddress(6).send(&mut di),
            Err(Error::Configuration)
        );
        di.check_multi(&[Sent::Cmd(0xB2)]);
    }
}
