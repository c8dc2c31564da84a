// CLI definitions using clap

use clap::{Parser, Subcommand};
use picolcd_device::DeviceModel;

#[derive(Parser)]
#[command(name = "picolcd")]
#[command(author, version, about = "PicoLCD 20x2/20x4 USB display driver")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Display model (20x2 or 20x4)
    #[arg(short, long, global = true, default_value = "20x2")]
    pub model: DeviceModel,

    /// Enable transport monitoring (prints every report sent and received)
    #[arg(long, global = true)]
    pub monitor: bool,

    /// Show raw hex dump alongside decoded output
    #[arg(long, global = true)]
    pub hex: bool,

    /// Print monitor output and events as JSON lines
    #[arg(long, global = true)]
    pub json: bool,

    /// Filter monitor output (all, out, in, report=0xNN)
    #[arg(long, global = true)]
    pub filter: Option<String>,

    /// Verbose logging (debug level)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show supported models and their capabilities
    #[command(visible_aliases = ["models", "i"])]
    Info,

    /// Send the model's init sequence and clear the screen
    Init,

    /// Blank every row
    #[command(visible_alias = "cls")]
    Clear,

    /// Write text at a row/column
    #[command(visible_alias = "p")]
    Print {
        /// Row (0-based; out-of-range rows land on row 0)
        row: u8,
        /// Column (0-19)
        col: u8,
        /// Text to write, truncated at the end of the line
        text: String,
    },

    /// Set backlight brightness
    #[command(visible_alias = "bl")]
    Backlight {
        /// Brightness (0-255)
        value: u8,
    },

    /// Switch keypad lights (20x2 only)
    #[command(visible_alias = "kl")]
    Keylights {
        /// Light mask, decimal or 0x-prefixed hex
        #[arg(value_parser = parse_byte)]
        mask: u8,
        /// Turn all lights off
        #[arg(long)]
        off: bool,
    },

    /// Upload a custom character
    Glyph {
        /// Slot (0-7)
        index: u8,
        /// Eight row bytes in hex, top row first (e.g. 1F 11 11 11 11 11 11 1F)
        #[arg(num_args = 8, value_parser = parse_hex_byte)]
        rows: Vec<u8>,
    },

    /// Load the bar-graph glyph set and draw bars
    #[command(visible_alias = "bars")]
    Bargraph {
        /// Bar lengths in cells; three bars share a row
        levels: Vec<u8>,
    },

    /// Print key presses and decoded IR codes until Ctrl-C
    #[command(visible_aliases = ["watch", "l"])]
    Listen {
        /// Print IR frames that fail RC5 decoding as raw samples
        #[arg(long)]
        raw: bool,
    },
}

fn parse_byte(s: &str) -> Result<u8, String> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    }
    .map_err(|e| format!("invalid byte '{s}': {e}"))
}

fn parse_hex_byte(s: &str) -> Result<u8, String> {
    let hex = s.trim_start_matches("0x").trim_start_matches("0X");
    u8::from_str_radix(hex, 16).map_err(|e| format!("invalid hex byte '{s}': {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_byte() {
        assert_eq!(parse_byte("12"), Ok(12));
        assert_eq!(parse_byte("0x3F"), Ok(0x3F));
        assert!(parse_byte("256").is_err());
    }

    #[test]
    fn test_parse_hex_byte() {
        assert_eq!(parse_hex_byte("1F"), Ok(0x1F));
        assert_eq!(parse_hex_byte("0x0a"), Ok(0x0A));
        assert!(parse_hex_byte("zz").is_err());
    }

    #[test]
    fn test_cli_parses_print() {
        let cli = Cli::try_parse_from(["picolcd", "--model", "20x4", "print", "1", "2", "hi"])
            .unwrap();
        assert_eq!(cli.model, DeviceModel::FourByTwenty);
        assert!(matches!(
            cli.command,
            Some(Commands::Print { row: 1, col: 2, ref text }) if text == "hi"
        ));
    }

    #[test]
    fn test_cli_glyph_needs_eight_rows() {
        assert!(Cli::try_parse_from(["picolcd", "glyph", "1", "1F", "11"]).is_err());
        let cli = Cli::try_parse_from([
            "picolcd", "glyph", "1", "1F", "11", "11", "11", "11", "11", "11", "1F",
        ])
        .unwrap();
        assert!(matches!(cli.command, Some(Commands::Glyph { index: 1, ref rows }) if rows.len() == 8));
    }

    #[test]
    fn test_cli_verify() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
