//! Static device profiles for the supported PicoLCD models

use std::fmt;
use std::str::FromStr;

use picolcd_transport::protocol::{hd44780, LINE_WIDTH};
use picolcd_transport::{PID_20X2, PID_20X4, VENDOR_ID};
use serde::{Deserialize, Serialize};

use crate::display::{DisplayProtocol, FourByTwenty, TwoByTwenty};

/// Supported PicoLCD hardware model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeviceModel {
    /// PicoLCD 20x2 (OEM), keypad with key lights
    #[serde(rename = "20x2")]
    TwoByTwenty,
    /// PicoLCD 20x4, HD44780 command interface
    #[serde(rename = "20x4")]
    FourByTwenty,
}

impl DeviceModel {
    /// All models in product order
    pub const ALL: [DeviceModel; 2] = [DeviceModel::TwoByTwenty, DeviceModel::FourByTwenty];

    /// Map a USB product ID to a model
    pub fn from_pid(pid: u16) -> Option<Self> {
        match pid {
            PID_20X2 => Some(Self::TwoByTwenty),
            PID_20X4 => Some(Self::FourByTwenty),
            _ => None,
        }
    }

    /// Static capability table for this model
    pub fn profile(self) -> &'static DeviceProfile {
        match self {
            Self::TwoByTwenty => &PROFILE_20X2,
            Self::FourByTwenty => &PROFILE_20X4,
        }
    }

    /// Wire encoder for this model
    pub fn protocol(self) -> &'static dyn DisplayProtocol {
        match self {
            Self::TwoByTwenty => &TwoByTwenty,
            Self::FourByTwenty => &FourByTwenty,
        }
    }
}

impl fmt::Display for DeviceModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TwoByTwenty => f.write_str("20x2"),
            Self::FourByTwenty => f.write_str("20x4"),
        }
    }
}

impl FromStr for DeviceModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "20x2" | "2" | "picolcd-20x2" => Ok(Self::TwoByTwenty),
            "20x4" | "4" | "picolcd-20x4" => Ok(Self::FourByTwenty),
            _ => Err(format!("unknown model: \"{s}\". Use 20x2 or 20x4")),
        }
    }
}

/// Per-model capability table
///
/// One static instance exists per model; handles borrow it for their whole
/// lifetime.
#[derive(Debug)]
pub struct DeviceProfile {
    pub model: DeviceModel,
    pub vid: u16,
    pub pid: u16,
    pub name: &'static str,
    /// Largest report the interrupt endpoints accept
    pub max_transfer_len: usize,
    pub ir_enabled: bool,
    pub has_key_lights: bool,
    /// Report sent by `init`; empty when the model needs none
    pub init_sequence: &'static [u8],
    /// Row index -> addressing byte used by the model's positioning header
    pub row_addresses: &'static [u8],
    pub rows: u8,
    pub cols: u8,
}

impl DeviceProfile {
    /// Check if this profile matches a VID/PID pair
    pub fn matches(&self, vid: u16, pid: u16) -> bool {
        self.vid == vid && self.pid == pid
    }

    /// Row actually written for a requested row
    ///
    /// Out-of-range rows fall back to row 0 instead of failing.
    pub fn clamp_row(&self, row: u8) -> u8 {
        if row < self.rows {
            row
        } else {
            0
        }
    }

    /// Get a short description of the device
    pub fn description(&self) -> String {
        format!(
            "{} ({:04X}:{:04X}, {}x{}, max {} bytes{}{})",
            self.name,
            self.vid,
            self.pid,
            self.cols,
            self.rows,
            self.max_transfer_len,
            if self.ir_enabled { ", IR" } else { "" },
            if self.has_key_lights { ", key lights" } else { "" },
        )
    }
}

/// HD44780 init for the 20x4: function set (8-bit, 2-line) repeated,
/// entry mode, display on, then a trailing delay word.
const INIT_20X4: [u8; 24] = [
    0x94, 0x00, 0x07, 0x00, 0x32, 0x30, 0x00, 0x32, 0x30, 0x00, 0x32, 0x30, 0x00, 0x32, 0x38,
    0x00, 0x32, 0x06, 0x00, 0x32, 0x0C, 0x07, 0xD0, 0x01,
];

pub static PROFILE_20X2: DeviceProfile = DeviceProfile {
    model: DeviceModel::TwoByTwenty,
    vid: VENDOR_ID,
    pid: PID_20X2,
    name: "PicoLCD 20x2",
    max_transfer_len: 24,
    ir_enabled: true,
    has_key_lights: true,
    init_sequence: &[],
    row_addresses: &[0x00, 0x01],
    rows: 2,
    cols: LINE_WIDTH as u8,
};

pub static PROFILE_20X4: DeviceProfile = DeviceProfile {
    model: DeviceModel::FourByTwenty,
    vid: VENDOR_ID,
    pid: PID_20X4,
    name: "PicoLCD 20x4",
    max_transfer_len: 64,
    ir_enabled: true,
    has_key_lights: false,
    init_sequence: &INIT_20X4,
    row_addresses: &hd44780::LINE_ADDRESS,
    rows: 4,
    cols: LINE_WIDTH as u8,
};

/// Every supported profile
pub static PROFILES: [&DeviceProfile; 2] = [&PROFILE_20X2, &PROFILE_20X4];

/// Find the profile for a VID/PID pair
pub fn find_profile(vid: u16, pid: u16) -> Option<&'static DeviceProfile> {
    PROFILES.iter().copied().find(|p| p.matches(vid, pid))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_lookup() {
        assert_eq!(
            find_profile(0x04D8, 0xC001).map(|p| p.model),
            Some(DeviceModel::FourByTwenty)
        );
        assert_eq!(
            DeviceModel::from_pid(0x0002),
            Some(DeviceModel::TwoByTwenty)
        );
        assert!(find_profile(0x04D8, 0x1234).is_none());
    }

    #[test]
    fn test_profiles_are_consistent() {
        for profile in PROFILES {
            assert_eq!(profile.row_addresses.len(), profile.rows as usize);
            assert_eq!(profile.cols, 20);
            assert!(profile.init_sequence.len() <= profile.max_transfer_len);
            assert!(std::ptr::eq(profile.model.profile(), profile));
        }
    }

    #[test]
    fn test_init_sequence() {
        assert!(PROFILE_20X2.init_sequence.is_empty());
        assert_eq!(PROFILE_20X4.init_sequence.len(), 24);
        assert_eq!(PROFILE_20X4.init_sequence[0], 0x94);
    }

    #[test]
    fn test_clamp_row() {
        assert_eq!(PROFILE_20X4.clamp_row(3), 3);
        assert_eq!(PROFILE_20X4.clamp_row(4), 0);
        assert_eq!(PROFILE_20X2.clamp_row(1), 1);
        assert_eq!(PROFILE_20X2.clamp_row(2), 0);
    }

    #[test]
    fn test_model_parse_and_display() {
        assert_eq!(
            "20x4".parse::<DeviceModel>().unwrap(),
            DeviceModel::FourByTwenty
        );
        assert_eq!("2".parse::<DeviceModel>().unwrap(), DeviceModel::TwoByTwenty);
        assert!("16x2".parse::<DeviceModel>().is_err());
        assert_eq!(DeviceModel::TwoByTwenty.to_string(), "20x2");
    }

    #[test]
    fn test_model_serde_names() {
        let json = serde_json::to_string(&DeviceModel::FourByTwenty).unwrap();
        assert_eq!(json, "\"20x4\"");
        let model: DeviceModel = serde_json::from_str("\"20x2\"").unwrap();
        assert_eq!(model, DeviceModel::TwoByTwenty);
    }

    #[test]
    fn test_description() {
        let desc = PROFILE_20X2.description();
        assert!(desc.contains("PicoLCD 20x2"));
        assert!(desc.contains("04D8:0002"));
        assert!(desc.contains("key lights"));
    }
}
