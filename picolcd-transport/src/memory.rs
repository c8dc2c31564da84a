//! In-memory transport
//!
//! Records every OUT report and replays a scripted queue of IN reports.
//! Used to drive the device layer without hardware.

use std::collections::VecDeque;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::trace;

use crate::error::TransportError;
use crate::types::TransportDeviceInfo;
use crate::Transport;

/// Upper bound on how long an empty queue blocks a receive
const IDLE_SLEEP_MS: i32 = 5;

/// What `receive` does once the scripted input is used up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WhenDrained {
    /// Sleep briefly and report a timeout, like an idle device
    #[default]
    Timeout,
    /// Report the device as gone
    Disconnect,
}

enum Scripted {
    Report(Vec<u8>),
    Error(TransportError),
}

#[derive(Default)]
struct State {
    incoming: VecDeque<Scripted>,
    sent: Vec<Vec<u8>>,
    closed: bool,
}

pub struct MemoryTransport {
    info: TransportDeviceInfo,
    state: Mutex<State>,
    write_limit: Option<usize>,
    when_drained: WhenDrained,
}

impl MemoryTransport {
    pub fn new(info: TransportDeviceInfo) -> Self {
        Self {
            info,
            state: Mutex::new(State::default()),
            write_limit: None,
            when_drained: WhenDrained::default(),
        }
    }

    /// Virtual PicoLCD with the given product ID
    pub fn for_pid(pid: u16) -> Self {
        Self::new(TransportDeviceInfo::virtual_device(
            crate::device_registry::VENDOR_ID,
            pid,
        ))
    }

    /// Report at most `limit` bytes written per send
    pub fn with_write_limit(mut self, limit: usize) -> Self {
        self.write_limit = Some(limit);
        self
    }

    pub fn with_when_drained(mut self, when_drained: WhenDrained) -> Self {
        self.when_drained = when_drained;
        self
    }

    /// Queue one IN report
    pub fn push_input(&self, report: impl Into<Vec<u8>>) {
        self.state
            .lock()
            .incoming
            .push_back(Scripted::Report(report.into()));
    }

    /// Queue one receive failure
    pub fn push_error(&self, error: TransportError) {
        self.state.lock().incoming.push_back(Scripted::Error(error));
    }

    /// Number of queued IN reports and errors not yet received
    pub fn pending_input(&self) -> usize {
        self.state.lock().incoming.len()
    }

    /// Every OUT report sent so far, oldest first
    pub fn sent(&self) -> Vec<Vec<u8>> {
        self.state.lock().sent.clone()
    }

    /// Drain the OUT report log
    pub fn take_sent(&self) -> Vec<Vec<u8>> {
        std::mem::take(&mut self.state.lock().sent)
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

impl Transport for MemoryTransport {
    fn send(&self, report: &[u8]) -> Result<usize, TransportError> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(TransportError::Disconnected);
        }
        trace!("memory send: {:02X?}", report);
        state.sent.push(report.to_vec());
        Ok(self
            .write_limit
            .map_or(report.len(), |limit| report.len().min(limit)))
    }

    fn receive(&self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, TransportError> {
        let next = {
            let mut state = self.state.lock();
            if state.closed {
                return Err(TransportError::Disconnected);
            }
            state.incoming.pop_front()
        };
        match next {
            Some(Scripted::Report(report)) => {
                let len = report.len().min(buf.len());
                buf[..len].copy_from_slice(&report[..len]);
                Ok(len)
            }
            Some(Scripted::Error(e)) => Err(e),
            None => match self.when_drained {
                WhenDrained::Timeout => {
                    let ms = timeout_ms.clamp(0, IDLE_SLEEP_MS) as u64;
                    std::thread::sleep(Duration::from_millis(ms));
                    Err(TransportError::Timeout)
                }
                WhenDrained::Disconnect => Err(TransportError::Disconnected),
            },
        }
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        &self.info
    }

    fn close(&self) -> Result<(), TransportError> {
        self.state.lock().closed = true;
        Ok(())
    }
}
