//! Command handlers for the CLI application.
//!
//! This module organizes command handlers by category:
//! - `query`: Commands that need no device (info)
//! - `display`: Output commands (init, clear, print, backlight, keylights, glyph, bargraph)
//! - `input`: Keypad and IR commands (listen)

pub mod display;
pub mod input;
pub mod query;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use picolcd_device::{DeviceModel, PicoLcd};
use picolcd_transport::{open_device, OutputFormat, PacketFilter, PrinterConfig, PrinterTransport};
use tracing::debug;

/// Open a PicoLCD of `model`.
/// If `printer_config` is Some, the transport is wrapped with the packet printer.
pub fn open_lcd(model: DeviceModel, printer_config: Option<PrinterConfig>) -> Result<PicoLcd> {
    let profile = model.profile();
    let transport = open_device(profile.vid, profile.pid)
        .with_context(|| format!("Failed to open {}", profile.name))?;
    let transport = match printer_config {
        Some(config) => {
            debug!("Monitoring enabled: {:?}", config);
            PrinterTransport::wrap(transport, config)
        }
        None => transport,
    };
    Ok(PicoLcd::with_transport(model, transport))
}

/// Set up a Ctrl-C handler that sets the given flag to false when triggered.
/// Returns the Arc<AtomicBool> for use in the main loop.
pub fn setup_interrupt_handler() -> Arc<AtomicBool> {
    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    ctrlc::set_handler(move || {
        running_clone.store(false, Ordering::SeqCst);
    })
    .ok();

    running
}

/// Create printer config from CLI flags
pub fn create_printer_config(
    monitor: bool,
    hex: bool,
    json: bool,
    filter: Option<&str>,
) -> Result<Option<PrinterConfig>> {
    if !monitor {
        return Ok(None);
    }

    let filter = match filter {
        Some(f) => f.parse::<PacketFilter>().map_err(|e| anyhow!(e))?,
        None => PacketFilter::All,
    };
    let format = if json {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    Ok(Some(
        PrinterConfig::default()
            .with_hex(hex)
            .with_filter(filter)
            .with_format(format),
    ))
}
