//! The main API to the display driver: bringing the controller up, and writing whole-screen
//! images to it page by page.

use hal::blocking::delay::DelayMs;
use hal::digital::v2::OutputPin;

use crate::codec::FrameBuffer;
use crate::command::consts::*;
use crate::command::{column_address, Command};
use crate::config::Config;
use crate::error::Error;
use crate::image::GrayImage;
use crate::interface;

/// A driver for an AQM1248A display.
///
/// The driver owns the interface, the CS and RESET lines and the delay source until `close`.
/// Every call blocks until the bus transfer completes; callers sharing one display across threads
/// must serialize access themselves.
///
/// The RS line inside `DI` and the CS and RESET lines must all report the same pin error type
/// `PinE`, since pin faults surface as `Error::Pin(PinE)`. Wrap pins from different drivers to a
/// common error type before handing them over.
pub struct Display<DI, CS, RST, D> {
    iface: DI,
    cs: CS,
    rst: RST,
    delay: D,
    config: Config,
    commands_sent: u32,
}

impl<DI, CS, RST, D, CommE, PinE> Display<DI, CS, RST, D>
where
    DI: interface::DisplayInterface<Error = Error<CommE, PinE>>,
    CS: OutputPin<Error = PinE>,
    RST: OutputPin<Error = PinE>,
    D: DelayMs<u32>,
{
    /// Take ownership of the display hardware, then reset and initialize the controller with
    /// `config`. The display is on and blank when this returns.
    pub fn new(
        iface: DI,
        cs: CS,
        rst: RST,
        delay: D,
        config: Config,
    ) -> Result<Self, Error<CommE, PinE>> {
        config.validate()?;
        let mut disp = Display {
            iface,
            cs,
            rst,
            delay,
            config,
            commands_sent: 0,
        };
        disp.initialize()?;
        Ok(disp)
    }

    /// Run the power-on sequence: select the chip, pulse reset, configure orientation and bias,
    /// ramp up the internal power circuits, set contrast, switch the display on and clear it.
    pub fn initialize(&mut self) -> Result<(), Error<CommE, PinE>> {
        self.cs.set_low().map_err(Error::Pin)?;
        self.reset()?;
        self.delay.delay_ms(SETTLE_MS);

        self.send_command(Command::DisplayOn(false))?;
        let orientation = self.config.orientation_commands();
        self.send_command_sequence(&orientation, 0)?;

        // Each power circuit must settle before the next one is enabled.
        self.send_command_sequence(
            &[
                Command::PowerControl {
                    booster: true,
                    regulator: false,
                    follower: false,
                },
                Command::PowerControl {
                    booster: true,
                    regulator: true,
                    follower: false,
                },
                Command::PowerControl {
                    booster: true,
                    regulator: true,
                    follower: true,
                },
            ],
            SETTLE_MS,
        )?;

        self.set_contrast(self.config.contrast)?;

        self.send_command_sequence(
            &[
                Command::AllPixelsOn(false),
                Command::StartLine(0),
                Command::Inverse(false),
                Command::DisplayOn(true),
            ],
            0,
        )?;
        self.clear()
    }

    /// Pulse the hardware reset line low for `RESET_PULSE_MS`.
    pub fn reset(&mut self) -> Result<(), Error<CommE, PinE>> {
        self.rst.set_low().map_err(Error::Pin)?;
        self.delay.delay_ms(RESET_PULSE_MS);
        self.rst.set_high().map_err(Error::Pin)
    }

    /// Send a single command.
    pub fn send_command(&mut self, cmd: Command) -> Result<(), Error<CommE, PinE>> {
        cmd.send(&mut self.iface)?;
        self.trace_command(cmd);
        self.commands_sent = self.commands_sent.wrapping_add(1);
        Ok(())
    }

    /// Send commands in order. With a non-zero `gap_ms`, wait that long after each one.
    pub fn send_command_sequence(
        &mut self,
        cmds: &[Command],
        gap_ms: u32,
    ) -> Result<(), Error<CommE, PinE>> {
        for &cmd in cmds {
            self.send_command(cmd)?;
            if gap_ms > 0 {
                self.delay.delay_ms(gap_ms);
            }
        }
        Ok(())
    }

    /// Write display data at the current page and column, in a single bus transaction.
    pub fn send_data(&mut self, buf: &[u8]) -> Result<(), Error<CommE, PinE>> {
        self.iface.send_data(buf)?;
        self.trace_data(buf);
        Ok(())
    }

    /// Set the page subsequent data is written to. Range 0-5.
    pub fn select_page(&mut self, page: u8) -> Result<(), Error<CommE, PinE>> {
        self.send_command(Command::PageAddress(page))
    }

    /// Set the column subsequent data is written from. Range 0-127.
    pub fn select_column(&mut self, col: u8) -> Result<(), Error<CommE, PinE>> {
        let cmds = column_address(col).ok_or(Error::Configuration)?;
        self.send_command_sequence(&cmds, 0)
    }

    /// Set the contrast (electronic volume) level, 0-63.
    pub fn set_contrast(&mut self, level: u8) -> Result<(), Error<CommE, PinE>> {
        if level > CONTRAST_MAX {
            return Err(Error::Configuration);
        }
        self.send_command_sequence(
            &[
                Command::ResistorRatio(self.config.resistor_ratio),
                Command::ElectronicVolumeMode,
                Command::ElectronicVolume(level),
            ],
            0,
        )
    }

    /// Turn the display output on or off. The display RAM is kept while off.
    pub fn display_on(&mut self, on: bool) -> Result<(), Error<CommE, PinE>> {
        self.send_command(Command::DisplayOn(on))
    }

    /// Show the display RAM inverted (light ink on dark) or normally.
    pub fn invert(&mut self, inverse: bool) -> Result<(), Error<CommE, PinE>> {
        self.send_command(Command::Inverse(inverse))
    }

    /// Light every pixel regardless of the display RAM, or go back to showing it.
    pub fn all_pixels_on(&mut self, on: bool) -> Result<(), Error<CommE, PinE>> {
        self.send_command(Command::AllPixelsOn(on))
    }

    /// Set the RAM row shown on the top line of the display. Range 0-63.
    pub fn start_line(&mut self, line: u8) -> Result<(), Error<CommE, PinE>> {
        self.send_command(Command::StartLine(line))
    }

    /// Threshold `image` and show it. The output is switched off while the pages are written.
    ///
    /// The image is encoded before anything is sent, so an image that cannot be resized leaves
    /// the display untouched.
    pub fn show_image<I: GrayImage>(&mut self, image: &I) -> Result<(), Error<CommE, PinE>> {
        let fb = FrameBuffer::encode(image)?;
        self.display_on(false)?;
        self.show_buffer(&fb)?;
        self.display_on(true)
    }

    /// Write a frame buffer to the display RAM, one page per data transfer.
    pub fn show_buffer(&mut self, fb: &FrameBuffer) -> Result<(), Error<CommE, PinE>> {
        for (page, bytes) in fb.pages().enumerate() {
            self.select_page(page as u8)?;
            self.select_column(0)?;
            self.send_data(bytes)?;
        }
        Ok(())
    }

    /// Turn every pixel off.
    pub fn clear(&mut self) -> Result<(), Error<CommE, PinE>> {
        self.show_buffer(&FrameBuffer::blank())
    }

    /// Turn every pixel on.
    pub fn fill(&mut self) -> Result<(), Error<CommE, PinE>> {
        self.show_buffer(&FrameBuffer::filled())
    }

    /// Number of command bytes sent since construction.
    pub fn command_count(&self) -> u32 {
        self.commands_sent
    }

    /// Release the hardware. The display keeps showing its last image.
    pub fn close(self) -> (DI, CS, RST, D) {
        (self.iface, self.cs, self.rst, self.delay)
    }

    #[cfg(feature = "defmt")]
    fn trace_command(&self, cmd: Command) {
        if let (true, Some(byte)) = (self.config.get_debug(), cmd.to_byte()) {
            defmt::debug!("{=u32:X}: {=u8:X}", self.commands_sent, byte);
        }
    }

    #[cfg(not(feature = "defmt"))]
    fn trace_command(&self, _cmd: Command) {}

    #[cfg(feature = "defmt")]
    fn trace_data(&self, buf: &[u8]) {
        if self.config.get_debug() {
            defmt::debug!("data={=[u8]:X}: {=usize}", buf, buf.len());
        }
    }

    #[cfg(not(feature = "defmt"))]
    fn trace_data(&self, _buf: &[u8]) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::{Canvas, GrayView};
    use crate::interface::test_spy::{Line, Sent, SpyDelay, SpyFault, SpyPin, TestSpyInterface};
    use crate::interface::DisplayInterface;

    macro_rules! send {
        ([$($d:tt),*]) => {Sent::Data(vec![$($d,)*])};
        ($c:tt) => {Sent::Cmd($c)};
    }
    macro_rules! sends {
        ($($e:tt),*) => {vec![$(send!($e),)*]};
    }

    type SpyDisplay = Display<TestSpyInterface, SpyPin, SpyPin, SpyDelay>;

    fn connect(di: &TestSpyInterface, cfg: Config) -> SpyDisplay {
        Display::new(di.split(), di.pin(Line::Cs), di.pin(Line::Reset), di.delay(), cfg).unwrap()
    }

    /// The bus traffic of writing `fill` to every page from column 0.
    fn whole_screen(fill: u8) -> Vec<Sent> {
        (0..6u8)
            .flat_map(|page| {
                vec![
                    Sent::Cmd(0xB0 | page),
                    Sent::Cmd(0x00),
                    Sent::Cmd(0x10),
                    Sent::Data(vec![fill; 128]),
                ]
            })
            .collect()
    }

    #[test]
    fn init_defaults() {
        let di = TestSpyInterface::new();
        let disp = connect(&di, Config::new());
        let mut expect = vec![
            Sent::Pin(Line::Cs, false),
            Sent::Pin(Line::Reset, false),
            Sent::DelayMs(100),
            Sent::Pin(Line::Reset, true),
            Sent::DelayMs(2),
        ];
        #[rustfmt::skip]
        expect.extend(sends!(
            0xAE, // display off
            0xA0, // segment direction normal
            0xC8, // COM scan reversed
            0xA3 // bias 1/7
        ));
        expect.extend(vec![
            Sent::Cmd(0x2C), // booster
            Sent::DelayMs(2),
            Sent::Cmd(0x2E), // + regulator
            Sent::DelayMs(2),
            Sent::Cmd(0x2F), // + follower
            Sent::DelayMs(2),
        ]);
        #[rustfmt::skip]
        expect.extend(sends!(
            0x23, 0x81, 0x1C, // contrast
            0xA4, // all pixels normal
            0x40, // start line 0
            0xA6, // not inverted
            0xAF // display on
        ));
        expect.extend(whole_screen(0x00));
        di.check_multi(&expect);
        assert_eq!(disp.command_count(), 14 + 6 * 3);
    }

    #[test]
    fn init_with_options() {
        let di = TestSpyInterface::new();
        let cfg = Config::new().contrast(0x30).resistor_ratio(5).debug(true);
        connect(&di, cfg);
        let bus = di.bus();
        assert_eq!(bus[7..10], sends!(0x25, 0x81, 0x30)[..]);
    }

    #[test]
    fn init_rejects_bad_config() {
        let di = TestSpyInterface::new();
        let res = Display::new(
            di.split(),
            di.pin(Line::Cs),
            di.pin(Line::Reset),
            di.delay(),
            Config::new().contrast(0x40),
        );
        assert_eq!(res.err(), Some(Error::Configuration));
        di.check_multi(&[]);
    }

    #[test]
    fn clear_streams_six_pages() {
        let di = TestSpyInterface::new();
        let mut disp = connect(&di, Config::new());
        di.clear();
        disp.clear().unwrap();
        di.check_multi(&whole_screen(0x00));
    }

    #[test]
    fn fill_streams_six_pages() {
        let di = TestSpyInterface::new();
        let mut disp = connect(&di, Config::new());
        di.clear();
        disp.fill().unwrap();
        di.check_multi(&whole_screen(0xFF));
    }

    #[test]
    fn select_column_nibbles() {
        let di = TestSpyInterface::new();
        let mut disp = connect(&di, Config::new());
        for &(col, lo, hi) in &[(0u8, 0x00u8, 0x10u8), (15, 0x0F, 0x10), (16, 0x00, 0x11), (127, 0x0F, 0x17)]
        {
            di.clear();
            disp.select_column(col).unwrap();
            di.check_multi(&[Sent::Cmd(lo), Sent::Cmd(hi)]);
        }
        di.clear();
        assert_eq!(disp.select_column(128), Err(Error::Configuration));
        di.check_multi(&[]);
    }

    #[test]
    fn select_page_range() {
        let di = TestSpyInterface::new();
        let mut disp = connect(&di, Config::new());
        di.clear();
        disp.select_page(0).unwrap();
        disp.select_page(5).unwrap();
        assert_eq!(disp.select_page(6), Err(Error::Configuration));
        di.check_multi(&sends!(0xB0, 0xB5));
    }

    #[test]
    fn contrast() {
        let di = TestSpyInterface::new();
        let mut disp = connect(&di, Config::new());
        di.clear();
        disp.set_contrast(0x3F).unwrap();
        disp.set_contrast(0).unwrap();
        assert_eq!(disp.set_contrast(0x40), Err(Error::Configuration));
        di.check_multi(&sends!(0x23, 0x81, 0x3F, 0x23, 0x81, 0x00));
    }

    #[test]
    fn command_sequence_gaps() {
        let di = TestSpyInterface::new();
        let mut disp = connect(&di, Config::new());
        di.clear();
        disp.send_command_sequence(&[Command::DisplayOn(false), Command::DisplayOn(true)], 5)
            .unwrap();
        disp.send_command_sequence(&[Command::Inverse(true), Command::Inverse(false)], 0)
            .unwrap();
        di.check_multi(&[
            Sent::Cmd(0xAE),
            Sent::DelayMs(5),
            Sent::Cmd(0xAF),
            Sent::DelayMs(5),
            Sent::Cmd(0xA7),
            Sent::Cmd(0xA6),
        ]);
    }

    #[test]
    fn display_mode_commands() {
        let di = TestSpyInterface::new();
        let mut disp = connect(&di, Config::new());
        di.clear();
        disp.display_on(false).unwrap();
        disp.invert(true).unwrap();
        disp.all_pixels_on(true).unwrap();
        disp.start_line(12).unwrap();
        assert_eq!(disp.start_line(64), Err(Error::Configuration));
        di.check_multi(&sends!(0xAE, 0xA7, 0xA5, 0x4C));
    }

    #[test]
    fn show_image_single_pixel() {
        let di = TestSpyInterface::new();
        let mut disp = connect(&di, Config::new());
        di.clear();
        let mut canvas = Canvas::new();
        canvas.set(3, 10, 0);
        disp.show_image(&canvas).unwrap();

        let mut expect = vec![Sent::Cmd(0xAE)];
        let mut pages = whole_screen(0x00);
        if let Sent::Data(ref mut page1) = pages[7] {
            page1[3] = 1 << 2;
        }
        expect.extend(pages);
        expect.push(Sent::Cmd(0xAF));
        di.check_multi(&expect);
    }

    #[test]
    fn show_image_resizes() {
        let di = TestSpyInterface::new();
        let mut disp = connect(&di, Config::new());
        di.clear();
        let pixels = [0u8; 4];
        disp.show_image(&GrayView::new(&pixels, 2, 2).unwrap()).unwrap();
        let mut expect = vec![Sent::Cmd(0xAE)];
        expect.extend(whole_screen(0xFF));
        expect.push(Sent::Cmd(0xAF));
        di.check_multi(&expect);
    }

    #[test]
    fn show_image_invalid_dimensions() {
        let di = TestSpyInterface::new();
        let mut disp = connect(&di, Config::new());
        di.clear();
        let empty = GrayView::new(&[], 0, 0).unwrap();
        assert_eq!(disp.show_image(&empty), Err(Error::InvalidDimensions));
        di.check_multi(&[]);
    }

    #[test]
    fn transport_fault_aborts() {
        let di = TestSpyInterface::new();
        let mut disp = connect(&di, Config::new());
        di.clear();
        // Page 0 goes through, page 1's column high nibble fails.
        di.fail_after(6);
        let err = disp.fill().unwrap_err();
        assert_eq!(err, Error::Comm(SpyFault));
        assert!(err.is_transport_fault());
        let mut expect = whole_screen(0xFF);
        expect.truncate(6);
        di.check_multi(&expect);
    }

    #[test]
    fn reset_line_fault_stops_init() {
        let di = TestSpyInterface::new();
        di.fail_pin(Line::Reset);
        let err = Display::new(
            di.split(),
            di.pin(Line::Cs),
            di.pin(Line::Reset),
            di.delay(),
            Config::new(),
        )
        .err()
        .unwrap();
        assert_eq!(err, Error::Pin(SpyFault));
        assert!(err.is_transport_fault());
        di.check_multi(&[Sent::Pin(Line::Cs, false)]);
    }

    #[test]
    fn close_releases_hardware() {
        let di = TestSpyInterface::new();
        let disp = connect(&di, Config::new());
        let (mut iface, _cs, _rst, _delay) = disp.close();
        di.clear();
        iface.send_command(0xE3).unwrap();
        di.check_multi(&sends!(0xE3));
    }
}
