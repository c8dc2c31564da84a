//! Integration tests against a real PicoLCD.
//!
//! These tests require a device to be connected.
//! Run with: cargo test -p picolcd-device --test hardware -- --ignored --nocapture

use picolcd_device::{DeviceModel, PicoLcd, BAR_GRAPH};

fn model_from_env() -> DeviceModel {
    std::env::var("PICOLCD_MODEL")
        .ok()
        .and_then(|m| m.parse().ok())
        .unwrap_or(DeviceModel::TwoByTwenty)
}

#[test]
#[ignore] // requires hardware
fn write_every_row() {
    let mut lcd = PicoLcd::open(model_from_env()).expect("No PicoLCD found");
    lcd.init().unwrap();
    lcd.clear().unwrap();
    for row in 0..lcd.profile().rows {
        let written = lcd.display(row, 0, format!("row {row}")).unwrap();
        assert!(written > 0);
    }
    lcd.set_backlight(0xFF).unwrap();
    lcd.close().unwrap();
}

#[test]
#[ignore] // requires hardware
fn bar_graph_glyphs() {
    let mut lcd = PicoLcd::open(model_from_env()).expect("No PicoLCD found");
    lcd.init().unwrap();
    for (index, glyph) in (0u8..).zip(BAR_GRAPH) {
        lcd.set_custom_char(index, glyph).unwrap();
    }
    let line: Vec<u8> = (0x08..=0x0F).collect();
    lcd.display(0, 0, line).unwrap();
    lcd.close().unwrap();
}
