//! Common types for transport layer

/// Device identification information
#[derive(Debug, Clone)]
pub struct TransportDeviceInfo {
    /// USB Vendor ID
    pub vid: u16,
    /// USB Product ID
    pub pid: u16,
    /// Device path or identifier (transport-specific)
    pub device_path: String,
    /// Serial number if available
    pub serial: Option<String>,
    /// Product name if available
    pub product_name: Option<String>,
}

impl TransportDeviceInfo {
    /// Info for a transport with no backing USB device (tests, replay)
    pub fn virtual_device(vid: u16, pid: u16) -> Self {
        Self {
            vid,
            pid,
            device_path: "virtual".into(),
            serial: None,
            product_name: None,
        }
    }
}

/// Raw IN report classified by its report ID
///
/// This is the stateless half of input handling: it only looks at one
/// report. Assembling key presses across reports happens above the
/// transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputFrame {
    /// Keypad state; a code of 0 means "no key" in that slot
    Key { first: u8, second: u8 },
    /// IR timing payload (length byte already applied)
    Ir { payload: Vec<u8> },
    /// Anything else (unknown report ID or empty read)
    Unknown(Vec<u8>),
}

impl InputFrame {
    /// True when the keypad report carries no held key
    pub fn is_key_release(&self) -> bool {
        matches!(self, Self::Key { first: 0, second: 0 })
    }
}
