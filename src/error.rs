//! Error type shared by every fallible operation of the driver.

use core::fmt;

/// Errors reported by the driver. `CommE` is the error type of the SPI bus, and `PinE` the error
/// type of the GPIO output pins (RS, CS and RESET share one pin error type).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<CommE, PinE> {
    /// Writing to the serial bus failed.
    Comm(CommE),
    /// Driving one of the control lines failed.
    Pin(PinE),
    /// The image has zero width or height, or its pixel data does not match its dimensions.
    InvalidDimensions,
    /// A command argument (contrast, page, column, ...) is out of range. Nothing was written.
    Configuration,
}

impl<CommE, PinE> Error<CommE, PinE> {
    /// Whether the error came from the bus or one of the pins rather than from bad arguments.
    pub fn is_transport_fault(&self) -> bool {
        matches!(self, Error::Comm(_) | Error::Pin(_))
    }
}

/// The image handed to the codec could not be normalized to the display size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DimensionError;

impl<CommE, PinE> From<DimensionError> for Error<CommE, PinE> {
    fn from(_: DimensionError) -> Self {
        Error::InvalidDimensions
    }
}

impl<CommE: fmt::Debug, PinE: fmt::Debug> fmt::Display for Error<CommE, PinE> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Comm(e) => write!(f, "bus transfer failed: {:?}", e),
            Error::Pin(e) => write!(f, "control line failed: {:?}", e),
            Error::InvalidDimensions => f.write_str("image cannot be resized to 128x48"),
            Error::Configuration => f.write_str("command argument out of range"),
        }
    }
}

#[cfg(feature = "std")]
impl<CommE: fmt::Debug, PinE: fmt::Debug> std::error::Error for Error<CommE, PinE> {}
