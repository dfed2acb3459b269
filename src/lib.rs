//! rawpoint: acceleration-free pointer events from raw HID reports.
//!
//! A pointing device declares its input channels once (buttons, X/Y, wheel,
//! plus whatever else its interface carries). rawpoint classifies those
//! channels at attach, then turns every input report into one relative pointer
//! event and one scroll event in 16.16 fixed point, with a persistent button
//! mask and acceleration explicitly disabled.
//!
//! ```
//! use rawpoint::{attach_from_descriptor, CollectingSink, ScalingConfig};
//! use rawpoint::backends::virtual_input::VIRTUAL_MOUSE_DESCRIPTOR;
//!
//! let mut mouse = attach_from_descriptor("demo", VIRTUAL_MOUSE_DESCRIPTOR, ScalingConfig::default())?;
//! let mut sink = CollectingSink::new();
//!
//! // Button 1 held, X = +4, Y = 0, wheel = +2.
//! let out = mouse.ingest(1, 0, &[0x01, 0x04, 0x00, 0x00, 0x00, 0x02], &mut sink);
//! assert_eq!(out.pointer.dx.raw(), 4 << 15);
//! assert_eq!(out.scroll.vertical.raw(), -6 << 16);
//! assert!(out.buttons.is_pressed(0));
//! # Ok::<(), rawpoint::Error>(())
//! ```

pub mod backends;
pub mod buttons;
pub mod channel;
pub mod classifier;
pub mod config;
pub mod descriptor;
pub mod device;
pub mod error;
pub mod event;
pub mod fixed;
pub mod interpreter;
pub mod logging;
pub mod manager;
pub mod metadata;
pub mod sampler;
pub mod sink;
pub mod usage;

pub use buttons::*;
pub use channel::*;
pub use classifier::*;
pub use config::*;
pub use device::*;
pub use error::{Error, Result};
pub use event::*;
pub use fixed::Fixed;
pub use interpreter::*;
pub use manager::*;
pub use metadata::*;
pub use sink::*;
