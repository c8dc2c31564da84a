//! Device interface error types

use picolcd_transport::TransportError;
use thiserror::Error;

/// Errors from PicoLCD operations
#[derive(Error, Debug)]
pub enum LcdError {
    /// Transport layer error
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Encoded report does not fit the model's interrupt transfer
    #[error("Packet of {len} bytes exceeds max transfer length {max}")]
    PacketTooLarge { len: usize, max: usize },

    /// Product ID does not belong to a supported model
    #[error("Unsupported model: {0}")]
    UnsupportedModel(String),

    /// Background input reader thread could not be started
    #[error("Failed to spawn input reader: {0}")]
    ReaderSpawn(#[source] std::io::Error),

    /// IR frame could not be decoded as RC5
    #[error("RC5 decode failed: {0}")]
    Decode(#[from] crate::rc5::Rc5Error),
}
