//! Background input reader
//!
//! Runs the receive loop on a dedicated thread and broadcasts assembled
//! input events, so a caller can keep writing to the display while waiting
//! for keys.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use picolcd_transport::protocol::{timing, MAX_REPORT_SIZE};
use picolcd_transport::{Transport, TransportError};
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::error::LcdError;
use crate::input::{InputDemultiplexer, InputEvent};
use crate::profile::DeviceProfile;

/// Broadcast channel capacity for input events
const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Input event with the time it was assembled
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampedInput {
    /// Seconds since the reader started
    pub timestamp: f64,
    pub event: InputEvent,
}

/// Reader thread tuning
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Receive timeout in milliseconds (how often the shutdown flag is checked when idle)
    pub poll_timeout_ms: i32,
    /// Sleep duration on error before retrying
    pub error_sleep_ms: u64,
    /// Thread name prefix
    pub name: &'static str,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self::usb()
    }
}

impl ReaderConfig {
    /// Configuration for a directly attached PicoLCD
    pub fn usb() -> Self {
        Self {
            poll_timeout_ms: timing::READER_POLL_MS,
            error_sleep_ms: timing::READER_ERROR_SLEEP_MS,
            name: "picolcd",
        }
    }

    pub fn with_poll_timeout(mut self, ms: i32) -> Self {
        self.poll_timeout_ms = ms;
        self
    }

    pub fn with_error_sleep(mut self, ms: u64) -> Self {
        self.error_sleep_ms = ms;
        self
    }

    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

/// Handle to a running input reader thread
///
/// Dropping it signals the thread to stop; the thread exits after its
/// current poll.
pub struct InputReader {
    event_tx: broadcast::Sender<TimestampedInput>,
    shutdown: Arc<AtomicBool>,
}

impl InputReader {
    /// Start reading `transport` on a new thread
    pub fn spawn(
        transport: Arc<dyn Transport>,
        profile: &'static DeviceProfile,
        config: ReaderConfig,
    ) -> Result<Self, LcdError> {
        let shutdown = Arc::new(AtomicBool::new(false));
        let (tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let tx_clone = tx.clone();
        let shutdown_clone = shutdown.clone();

        std::thread::Builder::new()
            .name(format!("{}-input-reader", config.name))
            .spawn(move || {
                run_input_reader_loop(transport, profile, tx_clone, shutdown_clone, config);
            })
            .map_err(LcdError::ReaderSpawn)?;

        Ok(Self {
            event_tx: tx,
            shutdown,
        })
    }

    /// New receiver for events assembled from now on
    pub fn subscribe(&self) -> broadcast::Receiver<TimestampedInput> {
        self.event_tx.subscribe()
    }

    /// Ask the thread to stop without dropping the handle
    pub fn stop(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        !self.shutdown.load(Ordering::SeqCst)
    }
}

impl Drop for InputReader {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::SeqCst);
        debug!("InputReader dropped, signaling reader shutdown");
    }
}

fn run_input_reader_loop(
    transport: Arc<dyn Transport>,
    profile: &'static DeviceProfile,
    tx: broadcast::Sender<TimestampedInput>,
    shutdown: Arc<AtomicBool>,
    config: ReaderConfig,
) {
    debug!("{} input reader thread started", config.name);
    let mut demux = InputDemultiplexer::new(profile.ir_enabled);
    let mut buf = [0u8; MAX_REPORT_SIZE];
    let start_time = Instant::now();

    while !shutdown.load(Ordering::Relaxed) {
        match transport.receive(&mut buf, config.poll_timeout_ms) {
            Ok(len) => {
                let len = len.min(buf.len());
                debug!(
                    "{} input reader got {} bytes: {:02X?}",
                    config.name,
                    len,
                    &buf[..len.min(16)]
                );
                if let Some(event) = demux.feed(&buf[..len]) {
                    let timestamp = start_time.elapsed().as_secs_f64();
                    // No subscribers is fine
                    let _ = tx.send(TimestampedInput { timestamp, event });
                }
            }
            Err(TransportError::Timeout) => {}
            Err(e) => {
                warn!("{} input reader error: {}", config.name, e);
                std::thread::sleep(Duration::from_millis(config.error_sleep_ms));
            }
        }
    }

    debug!("{} input reader thread exiting", config.name);
}
