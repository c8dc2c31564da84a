//! Protocol constants for PicoLCD communication
//!
//! Every PicoLCD packet is a HID report: the first byte is the report ID,
//! which doubles as the command opcode. OUT reports go to interrupt
//! endpoint 1, IN reports (keypad and IR) come from interrupt endpoint 1.

/// HID report IDs (first byte of every packet)
pub mod report {
    // OUT reports (host -> device)
    /// Key light state: `[0x81, mask]` (20x2 only)
    pub const KEY_LIGHTS: u8 = 0x81;
    /// Backlight brightness: `[0x91, value]`
    pub const BACKLIGHT: u8 = 0x91;
    /// HD44780 command write (20x4): `[0x94, 0x00, count, 0x00, delay, cmd...]`
    pub const LCD_CMD: u8 = 0x94;
    /// HD44780 data write (20x4): `[0x95, 0x01, 0x00, 0x01, len, data...]`
    pub const LCD_DATA: u8 = 0x95;
    /// Combined position + text write (20x2): `[0x98, row, col, len, text...]`
    pub const LCD_TEXT: u8 = 0x98;
    /// Custom character upload (20x2): `[0x9C, index, glyph[8]]`
    pub const LCD_CUSTOM_CHAR: u8 = 0x9C;

    // IN reports (device -> host)
    /// Keypad state: `[0x11, key1, key2]`
    pub const KEY_STATE: u8 = 0x11;
    /// Raw IR timing data: `[0x21, len, samples...]`
    pub const IR_DATA: u8 = 0x21;

    /// Get human-readable name for a report ID
    pub fn name(id: u8) -> &'static str {
        match id {
            KEY_LIGHTS => "KEY_LIGHTS",
            BACKLIGHT => "BACKLIGHT",
            LCD_CMD => "LCD_CMD",
            LCD_DATA => "LCD_DATA",
            LCD_TEXT => "LCD_TEXT",
            LCD_CUSTOM_CHAR => "LCD_CUSTOM_CHAR",
            KEY_STATE => "KEY_STATE",
            IR_DATA => "IR_DATA",
            _ => "UNKNOWN",
        }
    }

    /// Whether the report ID is sent by the device (IN direction)
    pub fn is_input(id: u8) -> bool {
        matches!(id, KEY_STATE | IR_DATA)
    }
}

/// HD44780 controller addressing used by the 20x4 command reports
pub mod hd44780 {
    /// Fixed prefix of a single-command LCD_CMD report:
    /// report ID, flags, command count, reserved, execution delay.
    pub const CMD_PREFIX: [u8; 5] = [super::report::LCD_CMD, 0x00, 0x01, 0x00, 0x64];
    /// Fixed prefix of an LCD_DATA report, followed by the payload length
    pub const DATA_PREFIX: [u8; 4] = [super::report::LCD_DATA, 0x01, 0x00, 0x01];
    /// "Set CGRAM address" base; glyph `n` lives at `SET_CGRAM + 8 * n`
    pub const SET_CGRAM: u8 = 0x40;
    /// "Set DDRAM address" for the start of each display line
    pub const LINE_ADDRESS: [u8; 4] = [0x80, 0xC0, 0x94, 0xD4];
}

/// Timing constants
pub mod timing {
    /// Budget for a single OUT interrupt transfer; slower writes are logged
    pub const WRITE_TIMEOUT_MS: i32 = 1000;
    /// Timeout used by the blocking input loop; timeouts are retried
    pub const READ_TIMEOUT_MS: i32 = 0xFFFF;
    /// Poll timeout of the background input reader (bounds shutdown latency)
    pub const READER_POLL_MS: i32 = 50;
    /// Sleep after a reader error before retrying
    pub const READER_ERROR_SLEEP_MS: u64 = 100;
}

/// Display line width shared by every supported model
pub const LINE_WIDTH: usize = 20;

/// Largest IN report any model produces
pub const MAX_REPORT_SIZE: usize = 64;
