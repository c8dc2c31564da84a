//! Keypad and IR input commands

use std::sync::atomic::Ordering;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::style::Stylize;
use picolcd_device::{decode_rc5, DeviceModel, InputEvent, ReaderConfig};
use picolcd_transport::PrinterConfig;
use tokio::sync::broadcast::error::TryRecvError;

use super::{open_lcd, setup_interrupt_handler};

/// Print key presses and RC5 codes until Ctrl-C
pub fn listen(
    model: DeviceModel,
    printer_config: Option<PrinterConfig>,
    json: bool,
    raw: bool,
) -> Result<()> {
    let lcd = open_lcd(model, printer_config)?;
    let reader = lcd
        .spawn_input_reader(ReaderConfig::usb())
        .context("Failed to start input reader")?;
    let mut rx = reader.subscribe();
    let running = setup_interrupt_handler();

    if !json {
        println!("Listening on {} (Ctrl-C to stop)", lcd.profile().name);
    }

    while running.load(Ordering::SeqCst) {
        let input = match rx.try_recv() {
            Ok(input) => input,
            Err(TryRecvError::Empty) => {
                std::thread::sleep(Duration::from_millis(10));
                continue;
            }
            Err(TryRecvError::Lagged(n)) => {
                eprintln!("Dropped {n} events");
                continue;
            }
            Err(TryRecvError::Closed) => break,
        };

        match input.event {
            InputEvent::Key { code } => {
                if json {
                    println!(
                        "{}",
                        serde_json::json!({"t": input.timestamp, "type": "key", "code": code})
                    );
                } else {
                    println!("[{:8.3}] {} 0x{:02X}", input.timestamp, "KEY".green(), code);
                }
            }
            InputEvent::Ir(ir) => {
                let samples = ir.samples();
                match decode_rc5(&samples) {
                    Ok(code) => {
                        if json {
                            println!(
                                "{}",
                                serde_json::json!({
                                    "t": input.timestamp,
                                    "type": "rc5",
                                    "address": code.address,
                                    "command": code.command,
                                    "toggle": code.toggle,
                                    "packed": code.packed(),
                                })
                            );
                        } else {
                            println!(
                                "[{:8.3}] {} addr {:2} cmd {:2} toggle {} (0x{:04X})",
                                input.timestamp,
                                "RC5".cyan(),
                                code.address,
                                code.command,
                                u8::from(code.toggle),
                                code.packed()
                            );
                        }
                    }
                    Err(e) if raw => {
                        if json {
                            println!(
                                "{}",
                                serde_json::json!({
                                    "t": input.timestamp,
                                    "type": "ir",
                                    "error": e.to_string(),
                                    "samples": samples,
                                })
                            );
                        } else {
                            println!(
                                "[{:8.3}] {} {} {:?}",
                                input.timestamp,
                                "IR ".yellow(),
                                e,
                                samples
                            );
                        }
                    }
                    Err(_) => {}
                }
            }
        }
    }

    drop(reader);
    lcd.close()?;
    Ok(())
}
