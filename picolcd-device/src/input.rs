//! Keypad and IR input assembly
//!
//! The keypad reports its state repeatedly while a key is held and sends an
//! all-zero report on release. `InputDemultiplexer` collapses that sequence
//! into one `InputEvent::Key`, and forwards IR reports as they arrive.

use picolcd_transport::protocol::timing;
use picolcd_transport::{parse_input_report, InputFrame, Transport, TransportError};
use tracing::{debug, trace};
use zerocopy::byteorder::little_endian::I16;
use zerocopy::FromBytes;

/// Raw IR timing data from one IR report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IrEvent {
    /// Payload bytes: signed 16-bit little-endian pulse durations
    pub raw: Vec<u8>,
}

impl IrEvent {
    /// Pulse durations in device time units; the sign carries polarity
    ///
    /// A trailing odd byte is ignored.
    pub fn samples(&self) -> Vec<i16> {
        let even = self.raw.len() & !1;
        <[I16]>::ref_from_bytes(&self.raw[..even])
            .map(|samples| samples.iter().map(|s| s.get()).collect())
            .unwrap_or_default()
    }
}

/// One discrete input from the device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A key was pressed and released
    Key { code: u8 },
    /// An IR frame was received
    Ir(IrEvent),
}

/// Stateful assembler turning IN reports into input events
#[derive(Debug, Clone)]
pub struct InputDemultiplexer {
    ir_enabled: bool,
    pending_key: Option<u8>,
}

impl InputDemultiplexer {
    pub fn new(ir_enabled: bool) -> Self {
        Self {
            ir_enabled,
            pending_key: None,
        }
    }

    /// Key currently held (seen but not yet released)
    pub fn pending_key(&self) -> Option<u8> {
        self.pending_key
    }

    /// Forget any held key
    pub fn reset(&mut self) {
        self.pending_key = None;
    }

    /// Feed one received report; returns an event when one is complete
    ///
    /// The held key is byte 1 of a keypad report, or byte 2 when byte 1 is
    /// zero. So `[11, 00, 07]` followed by `[11, 00, 00]` emits key 7.
    pub fn feed(&mut self, report: &[u8]) -> Option<InputEvent> {
        match parse_input_report(report) {
            InputFrame::Key { first: 0, second: 0 } => {
                let code = self.pending_key.take()?;
                debug!("Key 0x{:02X} released", code);
                Some(InputEvent::Key { code })
            }
            InputFrame::Key { first, second } => {
                let code = if first != 0 { first } else { second };
                trace!("Key 0x{:02X} held", code);
                self.pending_key = Some(code);
                None
            }
            InputFrame::Ir { payload } if self.ir_enabled => {
                debug!("IR frame with {} bytes", payload.len());
                Some(InputEvent::Ir(IrEvent { raw: payload }))
            }
            InputFrame::Ir { .. } => {
                trace!("IR disabled, dropping IR frame");
                None
            }
            InputFrame::Unknown(data) => {
                trace!("Ignoring report {:02X?}", &data[..data.len().min(8)]);
                None
            }
        }
    }

    /// Block until one complete event arrives
    ///
    /// Receives with the long read timeout and keeps waiting across
    /// timeouts; there is no cancellation. Any other transport error is
    /// returned as-is.
    pub fn read_event(
        &mut self,
        transport: &dyn Transport,
        max_len: usize,
    ) -> Result<InputEvent, TransportError> {
        let mut buf = vec![0u8; max_len];
        loop {
            match transport.receive(&mut buf, timing::READ_TIMEOUT_MS) {
                Ok(len) => {
                    if let Some(event) = self.feed(&buf[..len.min(buf.len())]) {
                        return Ok(event);
                    }
                }
                Err(e) if e.is_timeout() => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
