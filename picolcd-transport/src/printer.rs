//! PrinterTransport middleware for monitoring transport traffic
//!
//! Wraps any Transport implementation and prints every report passing
//! through it, decoded by report ID.
//!
//! # Example
//!
//! ```ignore
//! use picolcd_transport::{open_device, PrinterConfig, PrinterTransport};
//!
//! let transport = open_device(0x04D8, 0x0002)?;
//! let monitored = PrinterTransport::wrap(transport, PrinterConfig::default());
//! // Now all reports will be printed to stderr
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crossterm::style::Stylize;
use serde::Serialize;

use crate::protocol::{hd44780, report};
use crate::{Transport, TransportDeviceInfo, TransportError};

/// Output format for the printer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Transfer direction of a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Out,
    In,
}

/// Packet filter for selective display
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PacketFilter {
    #[default]
    All,
    Out,
    In,
    Report(u8),
}

impl FromStr for PacketFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "all" | "" => Ok(Self::All),
            "out" | "sent" | "commands" => Ok(Self::Out),
            "in" | "received" | "events" => Ok(Self::In),
            s if s.starts_with("report=") || s.starts_with("0x") => {
                let hex_str = s.strip_prefix("report=").unwrap_or(s);
                let hex_str = hex_str.strip_prefix("0x").unwrap_or(hex_str);
                u8::from_str_radix(hex_str, 16)
                    .map(Self::Report)
                    .map_err(|e| format!("Invalid report ID: {}", e))
            }
            _ => Err(format!("Unknown filter: {}", s)),
        }
    }
}

/// Configuration for the PrinterTransport
#[derive(Debug, Clone, Default)]
pub struct PrinterConfig {
    /// Show raw hex dump alongside decoded output
    pub show_hex: bool,
    /// Filter for selective display
    pub filter: PacketFilter,
    /// Output format
    pub format: OutputFormat,
}

impl PrinterConfig {
    /// Create config with hex output setting
    pub fn with_hex(mut self, show: bool) -> Self {
        self.show_hex = show;
        self
    }

    /// Create config with filter
    pub fn with_filter(mut self, filter: PacketFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Create config with output format
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    fn should_show(&self, direction: Direction, report_id: u8) -> bool {
        match &self.filter {
            PacketFilter::All => true,
            PacketFilter::Out => direction == Direction::Out,
            PacketFilter::In => direction == Direction::In,
            PacketFilter::Report(id) => *id == report_id,
        }
    }
}

/// One report decoded for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedPacket {
    pub direction: Direction,
    pub report_id: u8,
    pub name: &'static str,
    pub summary: String,
    pub bytes: Vec<u8>,
}

impl DecodedPacket {
    /// Decode a raw report
    pub fn decode(direction: Direction, data: &[u8]) -> Self {
        let report_id = data.first().copied().unwrap_or(0);
        Self {
            direction,
            report_id,
            name: report::name(report_id),
            summary: summarize(report_id, data),
            bytes: data.to_vec(),
        }
    }
}

impl fmt::Display for DecodedPacket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02x} {} {}", self.report_id, self.name, self.summary)
    }
}

fn text_of(bytes: &[u8]) -> String {
    format!("\"{}\"", bytes.escape_ascii())
}

fn summarize(report_id: u8, data: &[u8]) -> String {
    let byte = |i: usize| data.get(i).copied().unwrap_or(0);
    let tail = |i: usize| data.get(i..).unwrap_or(&[]);

    match report_id {
        report::KEY_LIGHTS => format!("mask=0x{:02x}", byte(1)),
        report::BACKLIGHT => format!("value={}", byte(1)),
        report::LCD_CMD if data.len() == hd44780::CMD_PREFIX.len() + 1 => {
            let cmd = byte(5);
            if cmd & 0x80 != 0 {
                format!("set DDRAM 0x{:02x}", cmd & 0x7F)
            } else if cmd & 0x40 != 0 {
                format!("set CGRAM 0x{:02x} (glyph {})", cmd & 0x3F, (cmd & 0x3F) / 8)
            } else {
                format!("cmd=0x{:02x}", cmd)
            }
        }
        report::LCD_CMD => format!("{} command bytes", data.len().saturating_sub(1)),
        report::LCD_DATA => format!("len={} {}", byte(4), text_of(tail(5))),
        report::LCD_TEXT => format!(
            "row={} col={} len={} {}",
            byte(1),
            byte(2),
            byte(3),
            text_of(tail(4))
        ),
        report::LCD_CUSTOM_CHAR => format!("glyph {} {:02x?}", byte(1), tail(2)),
        report::KEY_STATE => format!("keys=[{}, {}]", byte(1), byte(2)),
        report::IR_DATA => format!("{} sample bytes", byte(1)),
        _ => format!("{:02x?}", tail(1)),
    }
}

/// Transport middleware that prints all reports
pub struct PrinterTransport {
    inner: Arc<dyn Transport>,
    config: PrinterConfig,
}

impl PrinterTransport {
    /// Wrap a transport with printing middleware
    pub fn wrap(transport: Arc<dyn Transport>, config: PrinterConfig) -> Arc<dyn Transport> {
        Arc::new(Self {
            inner: transport,
            config,
        })
    }

    fn print(&self, direction: Direction, data: &[u8]) {
        let Some(&report_id) = data.first() else {
            return;
        };
        if !self.config.should_show(direction, report_id) {
            return;
        }

        let packet = DecodedPacket::decode(direction, data);
        if self.config.format == OutputFormat::Json {
            match serde_json::to_string(&packet) {
                Ok(line) => eprintln!("{line}"),
                Err(e) => eprintln!("JSON encoding failed: {e}"),
            }
            return;
        }

        match direction {
            Direction::Out => eprintln!(
                "{} {}  0x{:02x} {} {}",
                ">>>".cyan(),
                "OUT".cyan().bold(),
                report_id,
                packet.name.yellow(),
                packet.summary
            ),
            Direction::In => eprintln!(
                "{} {}  0x{:02x} {} {}",
                "<<<".green(),
                "IN ".green().bold(),
                report_id,
                packet.name.yellow(),
                packet.summary
            ),
        }

        if self.config.show_hex {
            eprintln!("    {}  {:02x?}", "HEX".dim(), data);
        }
    }
}

impl Transport for PrinterTransport {
    fn send(&self, report: &[u8]) -> Result<usize, TransportError> {
        self.print(Direction::Out, report);
        self.inner.send(report)
    }

    fn receive(&self, buf: &mut [u8], timeout_ms: i32) -> Result<usize, TransportError> {
        let len = self.inner.receive(buf, timeout_ms)?;
        self.print(Direction::In, &buf[..len.min(buf.len())]);
        Ok(len)
    }

    fn device_info(&self) -> &TransportDeviceInfo {
        self.inner.device_info()
    }

    fn close(&self) -> Result<(), TransportError> {
        self.inner.close()
    }
}
