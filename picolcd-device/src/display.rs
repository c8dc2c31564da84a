//! Per-model wire encoders
//!
//! The two PicoLCD families speak different report formats for the same
//! operations:
//!
//! - 20x2: combined "position + text" and "custom char" reports (0x98, 0x9C)
//! - 20x4: raw HD44780 command (0x94) and data (0x95) reports, two per write
//!
//! Encoders are pure: they only build reports. Sending them is the handle's
//! job.

use picolcd_transport::protocol::{hd44780, report};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::profile::{DeviceProfile, PROFILE_20X2, PROFILE_20X4};

/// One OUT report, report ID first
pub type Report = Vec<u8>;

/// A full line of blanks, used to synthesize "clear"
const BLANK_LINE: [u8; 20] = [b' '; 20];

/// Model-specific report encoding
///
/// Every method returns the reports to send, in order. Operations a model
/// does not support return no reports.
pub trait DisplayProtocol: Send + Sync {
    /// Static capability table for the model
    fn profile(&self) -> &'static DeviceProfile;

    /// Reports that bring the controller into a known state
    fn init(&self) -> Vec<Report> {
        let init = self.profile().init_sequence;
        if init.is_empty() {
            Vec::new()
        } else {
            vec![init.to_vec()]
        }
    }

    /// Write `text` at `row`/`col`, truncated to the line width
    fn display(&self, row: u8, col: u8, text: &[u8]) -> Vec<Report>;

    /// Blank every row; neither model has a hardware clear
    fn clear(&self) -> Vec<Report> {
        (0..self.profile().rows)
            .flat_map(|row| self.display(row, 0, &BLANK_LINE))
            .collect()
    }

    /// Upload an 8-row glyph into custom character slot `index`
    ///
    /// Slots are 0-7; the index is not checked here.
    fn custom_char(&self, index: u8, glyph: &[u8; 8]) -> Vec<Report>;

    /// Set backlight brightness (0x00-0xFF)
    fn backlight(&self, value: u8) -> Vec<Report> {
        vec![vec![report::BACKLIGHT, value]]
    }

    /// Switch keypad lights; `enabled == false` turns all of them off
    fn key_lights(&self, _mask: u8, _enabled: bool) -> Vec<Report> {
        Vec::new()
    }
}

/// Bytes of `text` that fit on a line starting at `col`
pub fn visible_text<'a>(profile: &DeviceProfile, col: u8, text: &'a [u8]) -> &'a [u8] {
    let room = (profile.cols as usize).saturating_sub(col as usize);
    &text[..text.len().min(room)]
}

fn with_payload<H: IntoBytes + Immutable>(header: &H, payload: &[u8]) -> Report {
    let header = header.as_bytes();
    let mut report = Vec::with_capacity(header.len() + payload.len());
    report.extend_from_slice(header);
    report.extend_from_slice(payload);
    report
}

// =============================================================================
// Report headers (zerocopy)
// =============================================================================

/// LCD_TEXT (0x98) header, 20x2 only. Followed by `len` text bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct TextHeader {
    pub report_id: u8,
    pub row: u8,
    pub col: u8,
    pub len: u8,
}

/// LCD_CUSTOM_CHAR (0x9C), 20x2 only. Complete 10-byte report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct CustomCharReport {
    pub report_id: u8,
    pub index: u8,
    pub glyph: [u8; 8],
}

/// LCD_CMD (0x94) carrying a single HD44780 instruction. Complete report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct LcdCommand {
    pub prefix: [u8; 5],
    pub instruction: u8,
}

impl LcdCommand {
    pub fn new(instruction: u8) -> Self {
        Self {
            prefix: hd44780::CMD_PREFIX,
            instruction,
        }
    }
}

/// LCD_DATA (0x95) header. Followed by `len` data bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IntoBytes, FromBytes, KnownLayout, Immutable)]
#[repr(C)]
pub struct LcdDataHeader {
    pub prefix: [u8; 4],
    pub len: u8,
}

impl LcdDataHeader {
    pub fn new(len: u8) -> Self {
        Self {
            prefix: hd44780::DATA_PREFIX,
            len,
        }
    }
}

// =============================================================================
// Models
// =============================================================================

/// PicoLCD 20x2 encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoByTwenty;

impl DisplayProtocol for TwoByTwenty {
    fn profile(&self) -> &'static DeviceProfile {
        &PROFILE_20X2
    }

    fn display(&self, row: u8, col: u8, text: &[u8]) -> Vec<Report> {
        let profile = self.profile();
        let row = profile.clamp_row(row);
        let text = visible_text(profile, col, text);
        let header = TextHeader {
            report_id: report::LCD_TEXT,
            row: profile.row_addresses[row as usize],
            col,
            len: text.len() as u8,
        };
        vec![with_payload(&header, text)]
    }

    fn custom_char(&self, index: u8, glyph: &[u8; 8]) -> Vec<Report> {
        let packet = CustomCharReport {
            report_id: report::LCD_CUSTOM_CHAR,
            index,
            glyph: *glyph,
        };
        vec![packet.as_bytes().to_vec()]
    }

    fn key_lights(&self, mask: u8, enabled: bool) -> Vec<Report> {
        vec![vec![report::KEY_LIGHTS, if enabled { mask } else { 0x00 }]]
    }
}

/// PicoLCD 20x4 encoder
#[derive(Debug, Clone, Copy, Default)]
pub struct FourByTwenty;

impl DisplayProtocol for FourByTwenty {
    fn profile(&self) -> &'static DeviceProfile {
        &PROFILE_20X4
    }

    fn display(&self, row: u8, col: u8, text: &[u8]) -> Vec<Report> {
        let profile = self.profile();
        let row = profile.clamp_row(row);
        let text = visible_text(profile, col, text);
        let address = profile.row_addresses[row as usize].wrapping_add(col);
        vec![
            LcdCommand::new(address).as_bytes().to_vec(),
            with_payload(&LcdDataHeader::new(text.len() as u8), text),
        ]
    }

    fn custom_char(&self, index: u8, glyph: &[u8; 8]) -> Vec<Report> {
        let address = hd44780::SET_CGRAM.wrapping_add(index.wrapping_mul(8));
        vec![
            LcdCommand::new(address).as_bytes().to_vec(),
            with_payload(&LcdDataHeader::new(glyph.len() as u8), glyph),
        ]
    }
}
