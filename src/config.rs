//! Settings applied when the display is initialized. The defaults reproduce the power-on sequence
//! recommended for the AQM1248A module.

use crate::command::consts::*;
use crate::command::*;
use crate::error::Error;

/// A configuration for the display. Builder methods override the module defaults.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub(crate) segment_direction: SegmentDirection,
    pub(crate) com_scan_direction: ComScanDirection,
    pub(crate) bias: Bias,
    pub(crate) resistor_ratio: u8,
    pub(crate) contrast: u8,
    pub(crate) bus_hz: u32,
    pub(crate) debug: bool,
}

impl Config {
    pub fn new() -> Self {
        Config {
            segment_direction: SegmentDirection::Normal,
            com_scan_direction: ComScanDirection::Reverse,
            bias: Bias::OneSeventh,
            resistor_ratio: DEFAULT_RESISTOR_RATIO,
            contrast: DEFAULT_CONTRAST,
            bus_hz: DEFAULT_BUS_HZ,
            debug: false,
        }
    }

    /// Initial contrast (electronic volume) level, 0-63. See `Command::ElectronicVolume`.
    pub fn contrast(self, level: u8) -> Self {
        Self {
            contrast: level,
            ..self
        }
    }

    /// V0 regulator resistor ratio, 0-7. See `Command::ResistorRatio`.
    pub fn resistor_ratio(self, ratio: u8) -> Self {
        Self {
            resistor_ratio: ratio,
            ..self
        }
    }

    pub fn bias(self, bias: Bias) -> Self {
        Self { bias, ..self }
    }

    /// Horizontal mirroring. See `Command::SegmentDirection`.
    pub fn segment_direction(self, dir: SegmentDirection) -> Self {
        Self {
            segment_direction: dir,
            ..self
        }
    }

    /// Vertical mirroring. See `Command::ComScanDirection`.
    pub fn com_scan_direction(self, dir: ComScanDirection) -> Self {
        Self {
            com_scan_direction: dir,
            ..self
        }
    }

    /// SPI clock rate the bus should be opened with. The driver does not configure the SPI master
    /// itself; this is carried for the code that does.
    pub fn bus_hz(self, hz: u32) -> Self {
        Self { bus_hz: hz, ..self }
    }

    /// Trace every command and data transfer through `defmt`. Without the `defmt` feature this
    /// flag is stored but has no effect.
    pub fn debug(self, enabled: bool) -> Self {
        Self {
            debug: enabled,
            ..self
        }
    }

    pub fn get_bus_hz(&self) -> u32 {
        self.bus_hz
    }

    pub fn get_debug(&self) -> bool {
        self.debug
    }

    /// The orientation and bias commands, in the order the controller expects them right after
    /// reset.
    pub(crate) fn orientation_commands(&self) -> [Command; 3] {
        [
            Command::SegmentDirection(self.segment_direction),
            Command::ComScanDirection(self.com_scan_direction),
            Command::Bias(self.bias),
        ]
    }

    /// Check every value before anything is sent, so a bad config leaves the display untouched.
    pub(crate) fn validate<CommE, PinE>(&self) -> Result<(), Error<CommE, PinE>> {
        let ok = Command::ResistorRatio(self.resistor_ratio).to_byte().is_some()
            && Command::ElectronicVolume(self.contrast).to_byte().is_some();
        if ok {
            Ok(())
        } else {
            Err(Error::Configuration)
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
