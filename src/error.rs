//! Error handling stuff
use displaydoc::Display;
use std::{io, path::PathBuf};
use thiserror::Error;

/// Error type for [`crate::class`] and [`crate::registry`]
#[derive(Debug, Display, Error)]
pub enum DeviceError {
    /// No unclaimed `{class}` device matching `{pattern}`
    DeviceNotFound {
        /// Device class directory that was searched
        class: String,

        /// Name pattern, or port name, that was looked for
        pattern: String,
    },

    /// Attribute `{attribute}` unavailable at {path:?}: {reason}
    AttributeUnavailable {
        /// Attribute name
        attribute: String,

        /// Full path of the attribute file
        path: PathBuf,

        /// Why it couldn't be used
        reason: &'static str,
    },

    /// Invalid value `{value}` for attribute `{attribute}`
    InvalidValue {
        /// Attribute name
        attribute: String,

        /// The rejected value
        value: String,
    },

    /// Couldn't parse `{value}` from attribute `{attribute}`
    Parse {
        /// Attribute name
        attribute: String,

        /// The contents that failed to parse
        value: String,
    },

    /// Invalid device name pattern: {0}
    InvalidPattern(#[from] glob::PatternError),

    /// IO Failed
    Io(#[from] io::Error),
}

/// Error text.
pub(crate) mod text {
    pub const NOT_FOUND: &str = "not found";

    pub const PERMISSION: &str = "permission denied";

    pub const NOT_SUPPORTED: &str = "operation not supported";

    pub const WRITE_ONLY: &str = "attribute is write-only";

    pub const READ_ONLY: &str = "attribute is read-only";
}
