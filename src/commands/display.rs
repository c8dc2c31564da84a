//! Display output commands

use anyhow::{bail, Context, Result};
use picolcd_device::{bar_graph_rows, DeviceModel, Glyph, PicoLcd, GLYPH_SLOTS};
use picolcd_transport::PrinterConfig;
use tracing::info;

use super::open_lcd;

pub fn init(model: DeviceModel, printer_config: Option<PrinterConfig>) -> Result<()> {
    let mut lcd = open_lcd(model, printer_config)?;
    lcd.init().context("init failed")?;
    lcd.clear().context("clear failed")?;
    info!("{} initialized", lcd.profile().name);
    lcd.close()?;
    Ok(())
}

pub fn clear(model: DeviceModel, printer_config: Option<PrinterConfig>) -> Result<()> {
    let lcd = open_lcd(model, printer_config)?;
    lcd.clear().context("clear failed")?;
    lcd.close()?;
    Ok(())
}

pub fn print(
    model: DeviceModel,
    printer_config: Option<PrinterConfig>,
    row: u8,
    col: u8,
    text: &str,
) -> Result<()> {
    let lcd = open_lcd(model, printer_config)?;
    let written = lcd.display(row, col, text).context("display failed")?;
    info!("Wrote row {} col {} ({} bytes on last report)", row, col, written);
    lcd.close()?;
    Ok(())
}

pub fn backlight(model: DeviceModel, printer_config: Option<PrinterConfig>, value: u8) -> Result<()> {
    let lcd = open_lcd(model, printer_config)?;
    lcd.set_backlight(value).context("backlight failed")?;
    println!("Backlight: {value}/255");
    lcd.close()?;
    Ok(())
}

pub fn keylights(
    model: DeviceModel,
    printer_config: Option<PrinterConfig>,
    mask: u8,
    enabled: bool,
) -> Result<()> {
    let lcd = open_lcd(model, printer_config)?;
    apply_keylights(lcd, mask, enabled)
}

fn apply_keylights(lcd: PicoLcd, mask: u8, enabled: bool) -> Result<()> {
    if !lcd.profile().has_key_lights {
        println!("{} has no key lights", lcd.profile().name);
        lcd.close()?;
        return Ok(());
    }
    lcd.set_key_lights(mask, enabled)
        .context("key lights failed")?;
    println!(
        "Key lights: {}",
        if enabled {
            format!("0x{mask:02X}")
        } else {
            "off".to_string()
        }
    );
    lcd.close()?;
    Ok(())
}

pub fn glyph(
    model: DeviceModel,
    printer_config: Option<PrinterConfig>,
    index: u8,
    rows: &[u8],
) -> Result<()> {
    let Ok(rows) = <[u8; 8]>::try_from(rows) else {
        bail!("a glyph needs exactly 8 rows, got {}", rows.len());
    };
    if index >= GLYPH_SLOTS {
        bail!("glyph slot must be below {GLYPH_SLOTS}, got {index}");
    }
    let glyph = Glyph::from_rows(rows);
    let lcd = open_lcd(model, printer_config)?;
    lcd.set_custom_char(index, glyph)
        .context("custom char upload failed")?;
    for row in glyph.rows() {
        let line: String = (0..5)
            .map(|x| if row & (0x10 >> x) != 0 { '#' } else { '.' })
            .collect();
        println!("  {line}");
    }
    lcd.close()?;
    Ok(())
}

pub fn bargraph(
    model: DeviceModel,
    printer_config: Option<PrinterConfig>,
    levels: &[u8],
) -> Result<()> {
    let lcd = open_lcd(model, printer_config)?;
    lcd.load_bar_graph().context("glyph upload failed")?;
    let rows = bar_graph_rows(lcd.profile(), levels);
    if rows.len() > usize::from(lcd.profile().rows) {
        bail!(
            "{} bars need {} rows, {} has {}",
            levels.len(),
            rows.len(),
            lcd.profile().name,
            lcd.profile().rows
        );
    }
    for (row, line) in (0u8..).zip(&rows) {
        lcd.display(row, 0, line).context("display failed")?;
    }
    info!("Drew {} bars on {} rows", levels.len(), rows.len());
    lcd.close()?;
    Ok(())
}
