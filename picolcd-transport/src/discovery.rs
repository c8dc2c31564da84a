//! Opening PicoLCD devices by VID/PID

use std::sync::Arc;

use hidapi::HidApi;
use tracing::{debug, info};

use crate::device_registry;
use crate::error::TransportError;
use crate::hid_usb::HidTransport;
use crate::types::TransportDeviceInfo;
use crate::Transport;

/// Open the first device matching `vid`/`pid`
///
/// Interface claiming and kernel driver handling are left to hidapi's
/// backend.
pub fn open_device(vid: u16, pid: u16) -> Result<Arc<dyn Transport>, TransportError> {
    if !device_registry::is_picolcd(vid, pid) {
        debug!("Opening non-PicoLCD device {:04X}:{:04X}", vid, pid);
    }

    let api = HidApi::new()?;
    let device = api.open(vid, pid).map_err(|e| match TransportError::from(e) {
        TransportError::HidPermissionDenied(msg) => TransportError::HidPermissionDenied(msg),
        other => TransportError::DeviceNotFound(format!("{vid:04X}:{pid:04X}: {other}")),
    })?;

    let device_path = device
        .get_device_info()
        .map(|d| d.path().to_string_lossy().to_string())
        .unwrap_or_else(|_| format!("{vid:04X}:{pid:04X}"));
    let serial = device.get_serial_number_string().ok().flatten();
    let product_name = device.get_product_string().ok().flatten();

    info!(
        "Opened {} ({:04X}:{:04X}) at {}",
        product_name.as_deref().unwrap_or("PicoLCD"),
        vid,
        pid,
        device_path
    );

    let info = TransportDeviceInfo {
        vid,
        pid,
        device_path,
        serial,
        product_name,
    };
    Ok(Arc::new(HidTransport::new(device, info)))
}
