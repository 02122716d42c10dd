//! Transport to the display controller: a byte stream framed as either command or data by the
//! level of the RS (register select) line.

/// Something that can deliver command bytes and display data to the controller.
pub trait DisplayInterface {
    type Error;

    /// Send a single command byte, with RS held low.
    fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error>;
    /// Send a run of data bytes in one bus transaction, with RS held high.
    fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error>;
}

pub mod spi {
    //! The 4-wire SPI interface of the controller: SCLK and SI carried by the SPI master, plus a
    //! GPIO output driving RS. The module has no MISO line, so the bus is write-only.

    use hal::blocking::spi::Write;
    use hal::digital::v2::OutputPin;

    use super::DisplayInterface;
    use crate::error::Error;

    pub struct SpiInterface<SPI, RS> {
        /// The SPI master device connected to the module.
        spi: SPI,
        /// A GPIO output pin connected to the RS pin of the module.
        rs: RS,
    }

    impl<SPI, RS> SpiInterface<SPI, RS>
    where
        SPI: Write<u8>,
        RS: OutputPin,
    {
        /// Create a new SPI interface to communicate with the display controller. `spi` is the SPI
        /// master device, and `rs` is the GPIO output pin connected to the RS pin of the module.
        pub fn new(spi: SPI, rs: RS) -> Self {
            Self { spi, rs }
        }

        /// Give back the SPI master and the RS pin.
        pub fn release(self) -> (SPI, RS) {
            (self.spi, self.rs)
        }
    }

    impl<SPI, RS> DisplayInterface for SpiInterface<SPI, RS>
    where
        SPI: Write<u8>,
        RS: OutputPin,
    {
        type Error = Error<SPI::Error, RS::Error>;

        fn send_command(&mut self, cmd: u8) -> Result<(), Self::Error> {
            self.rs.set_low().map_err(Error::Pin)?;
            self.spi.write(&[cmd]).map_err(Error::Comm)
        }

        fn send_data(&mut self, buf: &[u8]) -> Result<(), Self::Error> {
            self.rs.set_high().map_err(Error::Pin)?;
            self.spi.write(buf).map_err(Error::Comm)
        }
    }

}
