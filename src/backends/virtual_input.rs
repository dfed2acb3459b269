//! Scripted in-process pointer.
//!
//! [`VirtualPointer`] behaves like a real HID mouse: it is attached from a
//! report descriptor and every scripted action is encoded as a raw input
//! report, then sampled and interpreted on [`Device::poll`]. Useful for demos
//! and for exercising sinks without hardware.

use std::collections::VecDeque;

use crate::buttons::ButtonState;
use crate::device::{Device, PointerDevice};
use crate::error::Result;
use crate::interpreter::ScalingConfig;
use crate::metadata::DeviceMeta;
use crate::sink::EventSink;

/// Eight buttons, 16-bit relative X/Y, 8-bit wheel. No report ids.
///
/// Report layout: `[buttons][x lo][x hi][y lo][y hi][wheel]`.
pub const VIRTUAL_MOUSE_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, // Usage Page (Generic Desktop)
    0x09, 0x02, // Usage (Mouse)
    0xA1, 0x01, // Collection (Application)
    0x09, 0x01, //   Usage (Pointer)
    0xA1, 0x00, //   Collection (Physical)
    0x05, 0x09, //     Usage Page (Button)
    0x19, 0x01, //     Usage Minimum (1)
    0x29, 0x08, //     Usage Maximum (8)
    0x15, 0x00, //     Logical Minimum (0)
    0x25, 0x01, //     Logical Maximum (1)
    0x95, 0x08, //     Report Count (8)
    0x75, 0x01, //     Report Size (1)
    0x81, 0x02, //     Input (Data, Variable, Absolute)
    0x05, 0x01, //     Usage Page (Generic Desktop)
    0x09, 0x30, //     Usage (X)
    0x09, 0x31, //     Usage (Y)
    0x16, 0x01, 0x80, // Logical Minimum (-32767)
    0x26, 0xFF, 0x7F, // Logical Maximum (32767)
    0x75, 0x10, //     Report Size (16)
    0x95, 0x02, //     Report Count (2)
    0x81, 0x06, //     Input (Data, Variable, Relative)
    0x09, 0x38, //     Usage (Wheel)
    0x15, 0x81, //     Logical Minimum (-127)
    0x25, 0x7F, //     Logical Maximum (127)
    0x75, 0x08, //     Report Size (8)
    0x95, 0x01, //     Report Count (1)
    0x81, 0x06, //     Input (Data, Variable, Relative)
    0xC0, //   End Collection
    0xC0, // End Collection
];

const VIRTUAL_BUTTONS: u32 = 8;

pub struct VirtualPointer {
    name: String,
    device: PointerDevice,
    pending: VecDeque<(u64, [u8; 6])>,
    /// Buttons as the scripted "hardware" currently reports them.
    held: u8,
    clock: u64,
}

impl VirtualPointer {
    pub fn new(id: &str, name: &str, scaling: ScalingConfig) -> Result<Self> {
        let device = crate::device::attach_from_descriptor(id, VIRTUAL_MOUSE_DESCRIPTOR, scaling)?;
        Ok(Self {
            name: name.to_string(),
            device,
            pending: VecDeque::new(),
            held: 0,
            clock: 0,
        })
    }

    fn push_report(&mut self, dx: i16, dy: i16, wheel: i8) {
        self.clock += 1;
        let [x_lo, x_hi] = dx.to_le_bytes();
        let [y_lo, y_hi] = dy.to_le_bytes();
        let report = [self.held, x_lo, x_hi, y_lo, y_hi, wheel as u8];
        self.pending.push_back((self.clock, report));
    }

    /// Queue a motion report.
    pub fn move_by(&mut self, dx: i16, dy: i16) {
        self.push_report(dx, dy, 0);
    }

    /// Queue a wheel report; positive is "away from the user".
    pub fn scroll(&mut self, detents: i8) {
        self.push_report(0, 0, detents);
    }

    /// Queue a press of `button` (1-based). Buttons beyond the eighth are ignored.
    pub fn press(&mut self, button: u32) {
        if (1..=VIRTUAL_BUTTONS).contains(&button) {
            self.held |= 1 << (button - 1);
            self.push_report(0, 0, 0);
        }
    }

    /// Queue a release of `button` (1-based).
    pub fn release(&mut self, button: u32) {
        if (1..=VIRTUAL_BUTTONS).contains(&button) {
            self.held &= !(1 << (button - 1));
            self.push_report(0, 0, 0);
        }
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Button mask as last interpreted.
    pub fn buttons(&self) -> ButtonState {
        self.device.buttons()
    }

    /// Detach the underlying device.
    pub fn detach(self) -> ButtonState {
        self.device.detach()
    }
}

impl Device for VirtualPointer {
    fn poll(&mut self, sink: &mut dyn EventSink) -> Result<usize> {
        let mut handled = 0;
        while let Some((timestamp, report)) = self.pending.pop_front() {
            self.device.ingest(timestamp, 0, &report, &mut *sink);
            handled += 1;
        }
        Ok(handled)
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> &str {
        self.device.id()
    }

    fn metadata(&self) -> DeviceMeta {
        DeviceMeta {
            product_string: Some(self.name.clone()),
            usage_page: Some(crate::usage::PAGE_GENERIC_DESKTOP),
            usage: Some(crate::usage::GD_MOUSE as u16),
            path: Some(format!("virtual://{}", self.device.id())),
            ..Default::default()
        }
    }
}
