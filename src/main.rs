//! PicoLCD Driver CLI
//!
//! A command-line interface for PicoLCD 20x2/20x4 USB character displays.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

// CLI definitions
mod cli;
use cli::{Cli, Commands};

// Command handlers
mod commands;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "picolcd={default_level},picolcd_device={default_level},picolcd_transport={default_level}"
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    // Create printer config if monitoring is enabled
    let printer_config =
        commands::create_printer_config(cli.monitor, cli.hex, cli.json, cli.filter.as_deref())?;
    let model = cli.model;

    match cli.command {
        None | Some(Commands::Info) => commands::query::info(cli.json)?,

        // === Display Commands ===
        Some(Commands::Init) => commands::display::init(model, printer_config)?,
        Some(Commands::Clear) => commands::display::clear(model, printer_config)?,
        Some(Commands::Print { row, col, text }) => {
            commands::display::print(model, printer_config, row, col, &text)?
        }
        Some(Commands::Backlight { value }) => {
            commands::display::backlight(model, printer_config, value)?
        }
        Some(Commands::Keylights { mask, off }) => {
            commands::display::keylights(model, printer_config, mask, !off)?
        }
        Some(Commands::Glyph { index, rows }) => {
            commands::display::glyph(model, printer_config, index, &rows)?
        }
        Some(Commands::Bargraph { levels }) => {
            commands::display::bargraph(model, printer_config, &levels)?
        }

        // === Input Commands ===
        Some(Commands::Listen { raw }) => {
            commands::input::listen(model, printer_config, cli.json, raw)?
        }
    }

    Ok(())
}
