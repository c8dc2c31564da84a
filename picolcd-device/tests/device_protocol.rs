//! Integration tests for the PicoLCD handle over an in-memory transport.
//!
//! These drive the public API end to end: encoder → handle → transport for
//! output, scripted IN reports → demultiplexer → RC5 decoder for input.

use std::sync::Arc;

use picolcd_device::{
    DeviceModel, InputEvent, LcdError, PicoLcd, ReaderConfig, Rc5Error, Transport,
    TransportError,
};
use picolcd_transport::{MemoryTransport, WhenDrained};

fn open(model: DeviceModel) -> (PicoLcd, Arc<MemoryTransport>) {
    let transport = Arc::new(MemoryTransport::for_pid(model.profile().pid));
    let lcd = PicoLcd::with_transport(model, transport.clone());
    (lcd, transport)
}

/// RC5 frame for start=0b11, toggle=0, address=5, command=12 as the
/// device reports it (signed little-endian durations)
const RC5_ADDR5_CMD12: [i16; 19] = [
    -889, 889, -1778, 889, -889, 889, -889, 1778, -1778, 1778, -1778, 889, -889, 1778, -889, 889,
    -1778, 889, -889,
];

fn ir_report(samples: &[i16]) -> Vec<u8> {
    let payload: Vec<u8> = samples.iter().flat_map(|s| s.to_le_bytes()).collect();
    let mut report = vec![0x21, payload.len() as u8];
    report.extend(payload);
    report
}

// ── Output ──

#[test]
fn hello_on_20x2() {
    let (lcd, transport) = open(DeviceModel::TwoByTwenty);
    assert_eq!(lcd.display(0, 0, "HELLO").unwrap(), 9);
    assert_eq!(
        transport.sent(),
        vec![vec![0x98, 0, 0, 5, b'H', b'E', b'L', b'L', b'O']]
    );
}

#[test]
fn backlight_on_both_models() {
    for model in DeviceModel::ALL {
        let (lcd, transport) = open(model);
        assert_eq!(lcd.set_backlight(0x80).unwrap(), 2);
        assert_eq!(transport.sent(), vec![vec![0x91, 0x80]]);
    }
}

#[test]
fn clear_20x4_writes_four_blank_rows() {
    let (lcd, transport) = open(DeviceModel::FourByTwenty);
    lcd.clear().unwrap();

    let sent = transport.sent();
    assert_eq!(sent.len(), 8);

    let addresses: Vec<u8> = sent.iter().step_by(2).map(|r| r[5]).collect();
    assert_eq!(addresses, vec![0x80, 0xC0, 0x94, 0xD4]);

    for data in sent.iter().skip(1).step_by(2) {
        assert_eq!(&data[..5], &[0x95, 0x01, 0x00, 0x01, 20]);
        assert_eq!(&data[5..], &[b' '; 20]);
    }
}

#[test]
fn clear_20x2_writes_two_blank_rows() {
    let (lcd, transport) = open(DeviceModel::TwoByTwenty);
    lcd.clear().unwrap();
    let sent = transport.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(&sent[1][..4], &[0x98, 1, 0, 20]);
}

#[test]
fn init_20x4_sends_sequence() {
    let (mut lcd, transport) = open(DeviceModel::FourByTwenty);
    lcd.init().unwrap();
    let sent = transport.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].len(), 24);
    assert_eq!(&sent[0][..4], &[0x94, 0x00, 0x07, 0x00]);
    assert_eq!(&sent[0][21..], &[0x07, 0xD0, 0x01]);
}

#[test]
fn long_text_is_truncated_and_fits() {
    for model in DeviceModel::ALL {
        let (lcd, transport) = open(model);
        let max = model.profile().max_transfer_len;
        for col in 0..=22u8 {
            lcd.display(1, col, "abcdefghijklmnopqrstuvwxyz").unwrap();
            let sent = transport.take_sent();
            let text = sent.last().unwrap();
            let header = if model == DeviceModel::TwoByTwenty { 4 } else { 5 };
            let expected = 20usize.saturating_sub(col as usize);
            assert_eq!(text.len() - header, expected, "{model} col {col}");
            assert!(sent.iter().all(|r| r.len() <= max));
        }
    }
}

#[test]
fn out_of_range_row_falls_back_to_row_zero() {
    let (lcd, transport) = open(DeviceModel::FourByTwenty);
    lcd.display(7, 2, "x").unwrap();
    assert_eq!(transport.sent()[0][5], 0x82);

    let (lcd, transport) = open(DeviceModel::TwoByTwenty);
    lcd.display(2, 0, "x").unwrap();
    assert_eq!(transport.sent()[0][1], 0);
}

#[test]
fn custom_char_reports() {
    let glyph = [0x1F, 0x11, 0x11, 0x11, 0x11, 0x11, 0x11, 0x1F];

    let (lcd, transport) = open(DeviceModel::TwoByTwenty);
    lcd.set_custom_char(3, glyph).unwrap();
    let sent = transport.sent();
    assert_eq!(sent[0][..2], [0x9C, 3]);
    assert_eq!(sent[0][2..], glyph);

    let (lcd, transport) = open(DeviceModel::FourByTwenty);
    lcd.set_custom_char(3, glyph).unwrap();
    let sent = transport.sent();
    assert_eq!(sent[0], vec![0x94, 0x00, 0x01, 0x00, 0x64, 0x40 + 24]);
    assert_eq!(sent[1][..5], [0x95, 0x01, 0x00, 0x01, 0x08]);
    assert_eq!(sent[1][5..], glyph);
}

#[test]
fn key_lights() {
    let (lcd, transport) = open(DeviceModel::TwoByTwenty);
    lcd.set_key_lights(0x3F, true).unwrap();
    lcd.set_key_lights(0x3F, false).unwrap();
    assert_eq!(transport.sent(), vec![vec![0x81, 0x3F], vec![0x81, 0x00]]);

    let (lcd, transport) = open(DeviceModel::FourByTwenty);
    assert_eq!(lcd.set_key_lights(0x3F, true).unwrap(), 0);
    assert!(transport.sent().is_empty());
}

#[test]
fn write_error_propagates() {
    let (lcd, transport) = open(DeviceModel::TwoByTwenty);
    transport.close().unwrap();
    assert!(matches!(
        lcd.set_backlight(1),
        Err(LcdError::Transport(TransportError::Disconnected))
    ));
}

// ── Input ──

#[test]
fn key_press_and_release() {
    let (mut lcd, transport) = open(DeviceModel::TwoByTwenty);
    transport.push_input([0x11, 5, 0]);
    transport.push_input([0x11, 5, 0]);
    transport.push_input([0x11, 0, 0]);
    assert_eq!(lcd.read_input_event().unwrap(), InputEvent::Key { code: 5 });
    assert_eq!(transport.pending_input(), 0);
}

#[test]
fn read_waits_through_timeouts() {
    let (mut lcd, transport) = open(DeviceModel::TwoByTwenty);
    transport.push_error(TransportError::Timeout);
    transport.push_input([0x42, 0]);
    transport.push_error(TransportError::Timeout);
    transport.push_input([0x11, 0, 8]);
    transport.push_input([0x11, 0, 0]);
    assert_eq!(lcd.read_input_event().unwrap(), InputEvent::Key { code: 8 });
}

#[test]
fn read_returns_transport_errors() {
    let transport = Arc::new(
        MemoryTransport::for_pid(DeviceModel::TwoByTwenty.profile().pid)
            .with_when_drained(WhenDrained::Disconnect),
    );
    let mut lcd = PicoLcd::with_transport(DeviceModel::TwoByTwenty, transport.clone());
    transport.push_input([0x11, 5, 0]);
    assert!(matches!(
        lcd.read_input_event(),
        Err(LcdError::Transport(TransportError::Disconnected))
    ));

    // The held key survives the error
    transport.push_input([0x11, 0, 0]);
    assert_eq!(lcd.read_input_event().unwrap(), InputEvent::Key { code: 5 });
}

#[test]
fn ir_frame_decodes_to_rc5() {
    let (mut lcd, transport) = open(DeviceModel::FourByTwenty);
    transport.push_input(ir_report(&RC5_ADDR5_CMD12));

    let InputEvent::Ir(ir) = lcd.read_input_event().unwrap() else {
        panic!("expected IR event");
    };
    assert_eq!(ir.samples(), RC5_ADDR5_CMD12.to_vec());

    let decoded = lcd.decode_ir(&ir).unwrap();
    assert_eq!((decoded.address, decoded.command), (5, 12));
    assert_eq!(decoded.packed(), 0x314C);
}

#[test]
fn ir_between_key_reports() {
    let (mut lcd, transport) = open(DeviceModel::FourByTwenty);
    transport.push_input([0x11, 2, 0]);
    transport.push_input(ir_report(&RC5_ADDR5_CMD12));
    transport.push_input([0x11, 0, 0]);

    assert!(matches!(lcd.read_input_event().unwrap(), InputEvent::Ir(_)));
    assert_eq!(lcd.read_input_event().unwrap(), InputEvent::Key { code: 2 });
}

#[test]
fn bad_ir_frame_fails_cleanly() {
    let (mut lcd, transport) = open(DeviceModel::FourByTwenty);
    let mut samples = RC5_ADDR5_CMD12;
    samples[3] = 3000;
    transport.push_input(ir_report(&samples));
    transport.push_input(ir_report(&RC5_ADDR5_CMD12));

    let InputEvent::Ir(bad) = lcd.read_input_event().unwrap() else {
        panic!("expected IR event");
    };
    assert!(matches!(
        lcd.decode_ir(&bad),
        Err(LcdError::Decode(Rc5Error::InvalidDuration(3000)))
    ));

    let InputEvent::Ir(good) = lcd.read_input_event().unwrap() else {
        panic!("expected IR event");
    };
    assert_eq!(lcd.decode_ir(&good).unwrap().command, 12);
}

#[test]
fn background_reader_delivers_events() {
    let (lcd, transport) = open(DeviceModel::TwoByTwenty);
    let reader = lcd
        .spawn_input_reader(ReaderConfig::usb().with_poll_timeout(5))
        .unwrap();
    let mut rx = reader.subscribe();

    transport.push_input([0x11, 9, 0]);
    transport.push_input([0x11, 0, 0]);

    let deadline = std::time::Instant::now() + std::time::Duration::from_secs(5);
    let event = loop {
        match rx.try_recv() {
            Ok(input) => break input.event,
            Err(_) if std::time::Instant::now() < deadline => {
                std::thread::sleep(std::time::Duration::from_millis(1))
            }
            Err(e) => panic!("reader produced nothing: {e:?}"),
        }
    };
    assert_eq!(event, InputEvent::Key { code: 9 });

    // Display writes still go through while the reader runs
    lcd.set_backlight(0x10).unwrap();
    assert!(transport.sent().contains(&vec![0x91, 0x10]));
}
