//! Device registry - supported PicoLCD models by USB PID

/// Mini-Box vendor ID (Microchip VID used by all PicoLCD modules)
pub const VENDOR_ID: u16 = 0x04D8;

/// PicoLCD 20x2 product ID
pub const PID_20X2: u16 = 0x0002;

/// PicoLCD 20x4 product ID
pub const PID_20X4: u16 = 0xC001;

/// All supported PicoLCD product IDs
pub const PICOLCD_PIDS: &[u16] = &[PID_20X2, PID_20X4];

/// Check if a VID/PID pair is a supported PicoLCD
#[inline]
pub fn is_picolcd(vid: u16, pid: u16) -> bool {
    vid == VENDOR_ID && PICOLCD_PIDS.contains(&pid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_pids() {
        assert!(is_picolcd(0x04D8, 0x0002));
        assert!(is_picolcd(0x04D8, 0xC001));
    }

    #[test]
    fn test_foreign_devices_rejected() {
        assert!(!is_picolcd(0x04D8, 0x0003));
        assert!(!is_picolcd(0x3151, 0x0002));
    }
}
