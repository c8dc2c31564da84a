//! Classification of PicoLCD IN reports
//!
//! The device multiplexes keypad and IR data over one interrupt IN endpoint.
//! The first byte of each report selects the format:
//!
//! - `0x11` keypad: `[11, key1, key2]`, zero meaning "no key" in a slot
//! - `0x21` IR: `[21, len, sample bytes...]`, `len` counting payload bytes
//!
//! Parsing here is stateless; turning a held/released key sequence into a
//! single key press is done by the device layer.

use tracing::trace;

use crate::protocol::report;
use crate::types::InputFrame;

/// Parse one IN report as received from the transport
///
/// Short keypad reports read missing slots as zero. An IR length byte larger
/// than the received payload is clamped to what actually arrived.
pub fn parse_input_report(data: &[u8]) -> InputFrame {
    let Some(&report_id) = data.first() else {
        return InputFrame::Unknown(Vec::new());
    };

    match report_id {
        report::KEY_STATE => InputFrame::Key {
            first: data.get(1).copied().unwrap_or(0),
            second: data.get(2).copied().unwrap_or(0),
        },
        report::IR_DATA => {
            let declared = data.get(1).copied().unwrap_or(0) as usize;
            let available = data.len().saturating_sub(2);
            if declared > available {
                trace!(
                    "IR report declares {} bytes, only {} received",
                    declared,
                    available
                );
            }
            let len = declared.min(available);
            let payload = data.get(2..2 + len).map(<[u8]>::to_vec).unwrap_or_default();
            InputFrame::Ir { payload }
        }
        _ => InputFrame::Unknown(data.to_vec()),
    }
}
