//! HID usage tables used by the pointer pipeline.
//!
//! Only the handful of pages and usages a two-axis, one-wheel, multi-button
//! pointer produces are named here. Anything else is carried through as a raw
//! `(usage_page, usage)` pair and rejected by the classifier.

/// Generic Desktop usage page.
pub const PAGE_GENERIC_DESKTOP: u16 = 0x01;
/// Button usage page.
pub const PAGE_BUTTON: u16 = 0x09;

/// Generic Desktop: Pointer (physical collection).
pub const GD_POINTER: u32 = 0x01;
/// Generic Desktop: Mouse (application collection).
pub const GD_MOUSE: u32 = 0x02;
/// Generic Desktop: X axis.
pub const GD_X: u32 = 0x30;
/// Generic Desktop: Y axis.
pub const GD_Y: u32 = 0x31;
/// Generic Desktop: Z axis. Some mice put a horizontal wheel here; not supported.
pub const GD_Z: u32 = 0x32;
/// Generic Desktop: Wheel.
pub const GD_WHEEL: u32 = 0x38;

/// Button page: first button (primary).
pub const BUTTON_1: u32 = 0x01;
/// Button page: highest button usage the interpreter considers.
pub const BUTTON_255: u32 = 0xFF;

/// The "no meaning" usage sentinel.
pub const USAGE_UNDEFINED: u32 = 0;

/// Friendly names for the usages that show up in pointer logs.
pub fn usage_name(usage_page: u16, usage: u32) -> String {
    match usage_page {
        PAGE_GENERIC_DESKTOP => {
            let s = match usage {
                GD_POINTER => "Pointer",
                GD_MOUSE => "Mouse",
                GD_X => "X",
                GD_Y => "Y",
                GD_Z => "Z",
                0x33 => "Rx",
                0x34 => "Ry",
                0x35 => "Rz",
                GD_WHEEL => "Wheel",
                _ => return format!("GD_{usage:#04x}"),
            };
            s.to_string()
        }
        PAGE_BUTTON => format!("Button{usage}"),
        p if (p & 0xFF00) == 0xFF00 => "Vendor".to_string(),
        _ => format!("UP_{usage_page:04x}_U_{usage:04x}"),
    }
}
