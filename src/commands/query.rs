//! Device-independent query commands

use anyhow::Result;
use crossterm::style::Stylize;
use picolcd_device::{DeviceModel, PROFILES};

/// Print the supported models
pub fn info(json: bool) -> Result<()> {
    if json {
        for profile in PROFILES {
            let line = serde_json::json!({
                "model": profile.model,
                "name": profile.name,
                "vid": profile.vid,
                "pid": profile.pid,
                "rows": profile.rows,
                "cols": profile.cols,
                "max_transfer_len": profile.max_transfer_len,
                "ir": profile.ir_enabled,
                "key_lights": profile.has_key_lights,
            });
            println!("{line}");
        }
        return Ok(());
    }

    println!("{}", "Supported PicoLCD models".bold());
    for model in DeviceModel::ALL {
        let profile = model.profile();
        println!("  {:<5} {}", model.to_string().cyan(), profile.description());
        if !profile.init_sequence.is_empty() {
            println!(
                "        init: {} bytes, rows at {:02X?}",
                profile.init_sequence.len(),
                profile.row_addresses
            );
        }
    }
    Ok(())
}
