//! End-to-end: descriptor → attach → raw reports → events.

use rawpoint::backends::virtual_input::VirtualPointer;
use rawpoint::descriptor::parse_report_descriptor;
use rawpoint::{
    attach_from_descriptor, classify, ButtonState, CollectingSink, Config, Device, DeviceRegistry, Error,
    EventFilter, Fixed, JsonLinesSink, ScalingConfig, SinkBus,
};

/// Report id 1: three buttons and 16-bit X/Y. Report id 2: wheel only.
const SPLIT_REPORT_MOUSE: &[u8] = &[
    0x05, 0x01, 0x09, 0x02, 0xA1, 0x01, // Generic Desktop / Mouse / Application
    0x85, 0x01, // Report ID (1)
    0x05, 0x09, 0x19, 0x01, 0x29, 0x03, // Buttons 1..=3
    0x15, 0x00, 0x25, 0x01, 0x95, 0x03, 0x75, 0x01, 0x81, 0x02, //
    0x95, 0x01, 0x75, 0x05, 0x81, 0x03, // padding
    0x05, 0x01, 0x09, 0x30, 0x09, 0x31, // X, Y
    0x16, 0x01, 0x80, 0x26, 0xFF, 0x7F, 0x75, 0x10, 0x95, 0x02, 0x81, 0x06, //
    0x85, 0x02, // Report ID (2)
    0x09, 0x38, // Wheel
    0x15, 0x81, 0x25, 0x7F, 0x75, 0x08, 0x95, 0x01, 0x81, 0x06, //
    0xC0,
];

/// Generic Desktop / Mouse with a horizontal wheel on Z and nothing else.
const Z_ONLY: &[u8] = &[
    0x05, 0x01, 0x09, 0x02, 0xA1, 0x01, //
    0x09, 0x32, 0x15, 0x81, 0x25, 0x7F, 0x75, 0x08, 0x95, 0x01, 0x81, 0x06, //
    0xC0,
];

#[test]
fn split_reports_only_touch_their_own_channels() {
    let mut mouse = attach_from_descriptor("split", SPLIT_REPORT_MOUSE, ScalingConfig::default()).unwrap();
    let mut sink = CollectingSink::new();

    // Report 1 at t=100: button 3, X=+4, Y=-3.
    let first = mouse.ingest(100, 1, &[0b100, 0x04, 0x00, 0xFD, 0xFF], &mut sink);
    assert_eq!(first.pointer.dx.raw(), 131_072);
    assert_eq!(first.pointer.dy, Fixed::shifted(-3, 15));
    assert_eq!(first.scroll.vertical, Fixed::ZERO);
    assert!(first.buttons.is_pressed(2));

    // Report 2 at t=101: wheel only. Motion channels were sampled at t=100 and stay out.
    let second = mouse.ingest(101, 2, &[0x02], &mut sink);
    assert_eq!(second.pointer.dx, Fixed::ZERO);
    assert_eq!(second.pointer.dy, Fixed::ZERO);
    assert_eq!(second.scroll.vertical.raw(), -393_216);
    assert!(second.buttons.is_pressed(2), "button must persist across a wheel-only report");

    // A report id the device never declared still yields both events.
    let third = mouse.ingest(102, 9, &[0xFF, 0xFF], &mut sink);
    assert_eq!(third.pointer.dx, Fixed::ZERO);
    assert_eq!(third.buttons, second.buttons);

    assert_eq!(sink.pointer_events().count(), 3);
    assert_eq!(sink.scroll_events().count(), 3);
}

#[test]
fn interface_with_only_unsupported_axes_fails_attach() {
    let channels = parse_report_descriptor(Z_ONLY).unwrap();
    assert!(!classify(channels).found());

    let err = attach_from_descriptor("z", Z_ONLY, ScalingConfig::default()).unwrap_err();
    assert!(matches!(err, Error::ClassificationEmpty));
}

#[test]
fn configured_scaling_flows_into_devices() {
    let config = Config::from_toml_str(
        r#"
        [scaling]
        pointer_shift = 16
        scroll_multiplier = 1
        "#,
    )
    .unwrap();

    let mut registry = DeviceRegistry::new(config.scaling);
    registry.attach_descriptor("m", SPLIT_REPORT_MOUSE).unwrap();
    let mut sink = CollectingSink::new();

    let motion = registry.ingest("m", 1, 1, &[0, 0x02, 0x00, 0x00, 0x00], &mut sink).unwrap();
    assert_eq!(motion.pointer.dx, Fixed::from_int(2));

    let wheel = registry.ingest("m", 2, 2, &[0xFF], &mut sink).unwrap();
    assert_eq!(wheel.scroll.vertical, Fixed::from_int(-1));
}

#[test]
fn virtual_pointer_through_a_sink_bus() {
    let mut pointer = VirtualPointer::new("virtual:0", "Virtual", ScalingConfig::default()).unwrap();
    pointer.press(1);
    pointer.move_by(10, 0);
    pointer.scroll(-1);
    pointer.release(1);

    let mut bus = SinkBus::new();
    bus.add_sink(JsonLinesSink::new(std::io::sink()), EventFilter::All);
    bus.add_sink(rawpoint::LoggingSink::new(), EventFilter::PointerOnly);

    let mut collected = CollectingSink::new();
    assert_eq!(pointer.poll(&mut bus).unwrap(), 4);

    pointer.move_by(1, 1);
    pointer.poll(&mut collected).unwrap();
    assert_eq!(collected.events().len(), 2);
    assert_eq!(pointer.buttons(), ButtonState::NONE);
    assert_eq!(pointer.detach(), ButtonState::NONE);
}

#[test]
fn json_output_is_one_line_per_event() {
    let mut mouse = attach_from_descriptor("json", SPLIT_REPORT_MOUSE, ScalingConfig::default()).unwrap();
    let mut sink = JsonLinesSink::new(Vec::new());

    mouse.ingest(5, 1, &[0b1, 0x01, 0x00, 0x00, 0x00], &mut sink);
    mouse.ingest(6, 2, &[0x01], &mut sink);

    let text = String::from_utf8(sink.finish().unwrap()).unwrap();
    let kinds: Vec<String> = text
        .lines()
        .map(|l| serde_json::from_str::<serde_json::Value>(l).unwrap()["kind"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(kinds, vec!["pointer", "scroll", "pointer", "scroll"]);
}
