//! Transport abstraction layer for PicoLCD communication
//!
//! This crate provides the raw report I/O underneath the PicoLCD device
//! layer:
//!
//! - the [`Transport`] trait (send one OUT report, receive one IN report)
//! - a hidapi backend for real hardware ([`HidTransport`])
//! - an in-memory backend for tests and offline use ([`MemoryTransport`])
//! - stateless classification of IN reports ([`event_parser`])
//! - a packet monitor middleware ([`PrinterTransport`])

pub mod device_registry;
pub mod error;
pub mod event_parser;
pub mod memory;
pub mod printer;
pub mod protocol;
pub mod types;

mod discovery;
mod hid_usb;

pub use device_registry::{is_picolcd, PICOLCD_PIDS, PID_20X2, PID_20X4, VENDOR_ID};
pub use discovery::open_device;
pub use error::TransportError;
pub use event_parser::parse_input_report;
pub use hid_usb::HidTransport;
pub use memory::{MemoryTransport, WhenDrained};
pub use printer::{
    DecodedPacket, Direction, OutputFormat, PacketFilter, PrinterConfig, PrinterTransport,
};
pub use types::{InputFrame, TransportDeviceInfo};

/// The core transport trait - all backends implement this
///
/// Transfers are synchronous: `send` blocks until the device accepted the
/// report or the write failed, `receive` blocks until a report arrived or the
/// timeout elapsed. No retries happen at this layer.
pub trait Transport: Send + Sync {
    /// Send one OUT report (report ID in byte 0)
    ///
    /// # Returns
    /// Number of bytes the device reported as transferred. A short count is
    /// returned as-is, not as an error.
    fn send(&self, report: &[u8]) -> Result<usize, TransportError>;

    /// Receive one IN report into `buf`
    ///
    /// # Arguments
    /// * `buf` - Destination buffer, sized to the model's max transfer length
    /// * `timeout_ms` - Timeout in milliseconds
    ///
    /// # Returns
    /// Number of bytes received, or `TransportError::Timeout` if nothing
    /// arrived in time.
    fn receive(&self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, TransportError>;

    /// Get device information
    fn device_info(&self) -> &TransportDeviceInfo;

    /// Close the transport gracefully
    fn close(&self) -> Result<(), TransportError> {
        Ok(())
    }
}
