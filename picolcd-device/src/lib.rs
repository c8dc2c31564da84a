//! High-level interface for PicoLCD character displays
//!
//! This crate sits on top of `picolcd-transport` and provides:
//!
//! - per-model report encoders ([`DisplayProtocol`])
//! - the [`PicoLcd`] device handle (display, backlight, key lights, glyphs)
//! - keypad/IR input assembly ([`InputDemultiplexer`])
//! - an RC5 infrared decoder ([`Rc5Decoder`])
//! - a background input reader broadcasting events ([`InputReader`])

pub mod display;
pub mod error;
pub mod glyph;
pub mod input;
pub mod profile;
pub mod rc5;
pub mod reader;

pub use display::{DisplayProtocol, FourByTwenty, Report, TwoByTwenty};
pub use error::LcdError;
pub use glyph::{bar_graph_rows, special_char, Glyph, BAR_GRAPH, GLYPH_SLOTS};
pub use input::{InputDemultiplexer, InputEvent, IrEvent};
pub use profile::{find_profile, DeviceModel, DeviceProfile, PROFILES, PROFILE_20X2, PROFILE_20X4};
pub use rc5::{decode_rc5, DecodedIr, Rc5Decoder, Rc5Error};
pub use reader::{InputReader, ReaderConfig, TimestampedInput};

// Re-export the transport types callers need to build a handle
pub use picolcd_transport::{Transport, TransportDeviceInfo, TransportError};

use std::sync::Arc;

use picolcd_transport::open_device;
use picolcd_transport::protocol::{report, MAX_REPORT_SIZE};
use tracing::{debug, info, warn};

/// An open PicoLCD
///
/// Owns the transport, the model's encoder and the input-side state (held
/// key, RC5 buffers). All calls are blocking; one handle drives one device.
pub struct PicoLcd {
    transport: Arc<dyn Transport>,
    profile: &'static DeviceProfile,
    protocol: &'static dyn DisplayProtocol,
    demux: InputDemultiplexer,
    decoder: Rc5Decoder,
}

impl PicoLcd {
    /// Open the first attached device of `model`
    pub fn open(model: DeviceModel) -> Result<Self, LcdError> {
        let profile = model.profile();
        let transport = open_device(profile.vid, profile.pid)?;
        info!("Opened {}", profile.description());
        Ok(Self::with_transport(model, transport))
    }

    /// Attach to an already opened transport
    pub fn with_transport(model: DeviceModel, transport: Arc<dyn Transport>) -> Self {
        Self::with_protocol(model.protocol(), transport)
    }

    /// Attach with an explicit encoder; the profile comes from the encoder
    pub(crate) fn with_protocol(
        protocol: &'static dyn DisplayProtocol,
        transport: Arc<dyn Transport>,
    ) -> Self {
        let profile = protocol.profile();
        Self {
            transport,
            profile,
            protocol,
            demux: InputDemultiplexer::new(profile.ir_enabled),
            decoder: Rc5Decoder::new(),
        }
    }

    /// Attach to a transport, picking the model from its product ID
    pub fn from_transport(transport: Arc<dyn Transport>) -> Result<Self, LcdError> {
        let info = transport.device_info();
        let profile = find_profile(info.vid, info.pid).ok_or_else(|| {
            LcdError::UnsupportedModel(format!("{:04X}:{:04X}", info.vid, info.pid))
        })?;
        Ok(Self::with_transport(profile.model, transport))
    }

    pub fn model(&self) -> DeviceModel {
        self.profile.model
    }

    pub fn profile(&self) -> &'static DeviceProfile {
        self.profile
    }

    /// Get the underlying transport
    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Send reports in order; returns the byte count of the last one
    fn write_reports(&self, reports: Vec<Report>) -> Result<usize, LcdError> {
        let max = self.profile.max_transfer_len;
        if let Some(report) = reports.iter().find(|r| r.len() > max) {
            return Err(LcdError::PacketTooLarge {
                len: report.len(),
                max,
            });
        }

        let mut last = 0;
        for report in &reports {
            last = self.transport.send(report)?;
            if last < report.len() {
                warn!(
                    "{} write short: {} of {} bytes",
                    report.first().map_or("EMPTY", |&id| report::name(id)),
                    last,
                    report.len()
                );
            }
        }
        Ok(last)
    }

    // === Display ===

    /// Bring the controller into a known state and clear input state
    ///
    /// Only the 20x4 sends anything; both models reset the held key and
    /// the RC5 decoder.
    pub fn init(&mut self) -> Result<(), LcdError> {
        self.decoder.reset();
        self.demux.reset();
        self.write_reports(self.protocol.init())?;
        debug!("{} initialized", self.profile.name);
        Ok(())
    }

    /// Blank every row
    pub fn clear(&self) -> Result<(), LcdError> {
        self.write_reports(self.protocol.clear())?;
        Ok(())
    }

    /// Write text at `row`/`col`
    ///
    /// Text is truncated at the end of the line and rows past the last one
    /// land on row 0. Bytes go to the controller as-is, so codes 0x08-0x0F
    /// show custom characters (see [`special_char`]).
    ///
    /// # Returns
    /// Bytes the device reported for the final report written.
    pub fn display(&self, row: u8, col: u8, text: impl AsRef<[u8]>) -> Result<usize, LcdError> {
        self.write_reports(self.protocol.display(row, col, text.as_ref()))
    }

    /// Upload a glyph into custom character slot `index`
    pub fn set_custom_char(&self, index: u8, glyph: impl Into<Glyph>) -> Result<usize, LcdError> {
        let glyph = glyph.into();
        self.write_reports(self.protocol.custom_char(index, glyph.rows()))
    }

    /// Load the bar-graph glyph set into all eight slots
    pub fn load_bar_graph(&self) -> Result<(), LcdError> {
        for (index, glyph) in (0u8..).zip(BAR_GRAPH) {
            self.set_custom_char(index, glyph)?;
        }
        Ok(())
    }

    /// Set backlight brightness
    pub fn set_backlight(&self, value: u8) -> Result<usize, LcdError> {
        self.write_reports(self.protocol.backlight(value))
    }

    /// Switch keypad lights
    ///
    /// Models without key lights send nothing and return 0.
    pub fn set_key_lights(&self, mask: u8, enabled: bool) -> Result<usize, LcdError> {
        if !self.profile.has_key_lights {
            debug!("{} has no key lights", self.profile.name);
            return Ok(0);
        }
        self.write_reports(self.protocol.key_lights(mask, enabled))
    }

    // === Input ===

    /// Block until the next key press or IR frame
    ///
    /// Timeouts are retried forever; transport errors are returned.
    pub fn read_input_event(&mut self) -> Result<InputEvent, LcdError> {
        let event = self
            .demux
            .read_event(self.transport.as_ref(), MAX_REPORT_SIZE)?;
        Ok(event)
    }

    /// Decode an IR event as RC5 with this handle's decoder
    pub fn decode_ir(&mut self, event: &IrEvent) -> Result<DecodedIr, LcdError> {
        Ok(self.decoder.decode(&event.samples())?)
    }

    /// Run input reading on a background thread
    ///
    /// The reader keeps its own held-key state; do not mix it with
    /// [`read_input_event`](Self::read_input_event) on the same device.
    pub fn spawn_input_reader(&self, config: ReaderConfig) -> Result<InputReader, LcdError> {
        InputReader::spawn(self.transport.clone(), self.profile, config)
    }

    /// Release the device
    pub fn close(self) -> Result<(), LcdError> {
        self.transport.close()?;
        info!("Closed {}", self.profile.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use picolcd_transport::MemoryTransport;

    fn open(model: DeviceModel) -> (PicoLcd, Arc<MemoryTransport>) {
        let transport = Arc::new(MemoryTransport::for_pid(model.profile().pid));
        let lcd = PicoLcd::with_transport(model, transport.clone());
        (lcd, transport)
    }

    #[test]
    fn test_display_returns_last_write_count() {
        let (lcd, transport) = open(DeviceModel::FourByTwenty);
        assert_eq!(lcd.display(1, 0, "Hi").unwrap(), 7);
        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], vec![0x94, 0x00, 0x01, 0x00, 0x64, 0xC0]);
    }

    #[test]
    fn test_short_write_is_returned() {
        let transport = Arc::new(MemoryTransport::for_pid(PROFILE_20X2.pid).with_write_limit(4));
        let lcd = PicoLcd::with_transport(DeviceModel::TwoByTwenty, transport);
        assert_eq!(lcd.display(0, 0, "HELLO").unwrap(), 4);
    }

    #[test]
    fn test_from_transport_detects_model() {
        let transport = Arc::new(MemoryTransport::for_pid(PROFILE_20X4.pid));
        let lcd = PicoLcd::from_transport(transport).unwrap();
        assert_eq!(lcd.model(), DeviceModel::FourByTwenty);

        let unknown = Arc::new(MemoryTransport::for_pid(0x1234));
        assert!(matches!(
            PicoLcd::from_transport(unknown),
            Err(LcdError::UnsupportedModel(_))
        ));
    }

    #[test]
    fn test_init_resets_input_state() {
        let (mut lcd, transport) = open(DeviceModel::TwoByTwenty);
        lcd.demux.feed(&[0x11, 4, 0]);
        assert_eq!(lcd.demux.pending_key(), Some(4));
        lcd.init().unwrap();
        assert_eq!(lcd.demux.pending_key(), None);
        assert!(transport.sent().is_empty());
    }

    #[test]
    fn test_load_bar_graph() {
        let (lcd, transport) = open(DeviceModel::TwoByTwenty);
        lcd.load_bar_graph().unwrap();
        let sent = transport.sent();
        assert_eq!(sent.len(), 8);
        assert_eq!(sent[7], vec![0x9C, 7, 0x1F, 0x1F, 0, 0x1F, 0x1F, 0, 0x1F, 0x1F]);
    }

    /// 20x2 encoder that pads every text report one byte past the limit
    struct OversizedText;

    impl DisplayProtocol for OversizedText {
        fn profile(&self) -> &'static DeviceProfile {
            &PROFILE_20X2
        }

        fn display(&self, _row: u8, _col: u8, _text: &[u8]) -> Vec<Report> {
            vec![vec![0x98, 0, 0, 1, b'x'], vec![0x98; 25]]
        }

        fn custom_char(&self, _index: u8, _glyph: &[u8; 8]) -> Vec<Report> {
            Vec::new()
        }
    }

    static OVERSIZED_TEXT: OversizedText = OversizedText;

    #[test]
    fn test_oversized_report_is_refused() {
        let transport = Arc::new(MemoryTransport::for_pid(PROFILE_20X2.pid));
        let lcd = PicoLcd::with_protocol(&OVERSIZED_TEXT, transport.clone());
        assert!(matches!(
            lcd.display(0, 0, "x"),
            Err(LcdError::PacketTooLarge { len: 25, max: 24 })
        ));
        // Nothing of the operation goes out, not even the reports that fit
        assert!(transport.sent().is_empty());

        // Other operations on the same handle are unaffected
        assert_eq!(lcd.set_backlight(0x40).unwrap(), 2);
    }

    #[test]
    fn test_close_closes_transport() {
        let (lcd, transport) = open(DeviceModel::TwoByTwenty);
        lcd.close().unwrap();
        assert!(transport.is_closed());
    }
}
