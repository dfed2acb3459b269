//! Error types for rawpoint.
//!
//! The interpreter itself never fails. Everything here originates either at
//! attach time (classification, descriptor reading) or in the host layer
//! (configuration, I/O, HID backend, registry lookups).

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No declared channel is pointer-relevant; the attach must be aborted.
    #[error("device declares no pointer channels (no X/Y/wheel axis and no buttons)")]
    ClassificationEmpty,

    /// The HID report descriptor could not be read.
    #[error("report descriptor error at byte {offset}: {message}")]
    Descriptor { offset: usize, message: String },

    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// A configuration value parsed but is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("configuration encode error: {0}")]
    ConfigEncode(#[from] toml::ser::Error),

    /// A registry operation named a device that is not attached.
    #[error("unknown device: {0}")]
    UnknownDevice(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[cfg(feature = "hid")]
    #[cfg_attr(docsrs, doc(cfg(feature = "hid")))]
    #[error("hid backend error: {0}")]
    Hid(#[from] hidapi::HidError),
}

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn descriptor(offset: usize, message: impl Into<String>) -> Self {
        Self::Descriptor {
            offset,
            message: message.into(),
        }
    }

    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}
