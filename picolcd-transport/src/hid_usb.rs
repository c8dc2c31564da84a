//! HID transport implementation for the PicoLCD USB interface

use std::time::Instant;

use hidapi::HidDevice;
use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::error::TransportError;
use crate::protocol::timing;
use crate::types::TransportDeviceInfo;
use crate::Transport;

/// HID transport over the PicoLCD interrupt endpoints
///
/// hidapi writes OUT reports to the interrupt OUT endpoint when the device
/// has one, and reads IN reports from the interrupt IN endpoint, so the
/// report bytes go on the wire unchanged.
pub struct HidTransport {
    device: Mutex<HidDevice>,
    info: TransportDeviceInfo,
}

impl HidTransport {
    /// Wrap an already opened HID device
    pub fn new(device: HidDevice, info: TransportDeviceInfo) -> Self {
        Self {
            device: Mutex::new(device),
            info,
        }
    }
}

impl Transport for HidTransport {
    fn send(&self, report: &[u8]) -> Result<usize, TransportError> {
        let device = self.device.lock();
        let start = Instant::now();
        let sent = device.write(report)?;
        let elapsed = start.elapsed();
        debug!("Sent {} of {} bytes: {:02X?}", sent, report.len(), report);
        // hidapi writes have no timeout of their own
        if elapsed.as_millis() > timing::WRITE_TIMEOUT_MS as u128 {
            warn!("Write took {:?}, device may be stalled", elapsed);
        }
        if sent < report.len() {
            warn!("Short write: {} of {} bytes", sent, report.len());
        }
        Ok(sent)
    }

    fn receive(&self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, TransportError> {
        let device = self.device.lock();
        match device.read_timeout(buf, timeout_ms)? {
            0 => Err(TransportError::Timeout),
            len => {
                trace!("Received {} bytes: {:02X?}", len, &buf[..len.min(16)]);
                Ok(len)
            }
        }
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }

    fn close(&self) -> Result<(), TransportError> {
        // HidDevice closes on drop
        debug!("Closing {}", self.info.device_path);
        Ok(())
    }
}
