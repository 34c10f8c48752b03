//! Error types for decoding operations.

use std::fmt;

/// Errors that can occur while decoding dataset descriptors and tiles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Reading the source file failed.
    Io { path: String, message: String },
    /// Invalid data format or structure.
    InvalidFormat {
        context: &'static str,
        detail: String,
    },
    /// A required key is absent from a dataset descriptor.
    MissingField { field: String },
    /// The file is not in a format we decode (only TIFF tiles are supported).
    UnsupportedFormat { detail: String },
    /// The image decoded, but its channel layout or bit depth is not usable.
    UnsupportedLayout {
        context: &'static str,
        layout: String,
    },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, message } => write!(f, "failed to read {path}: {message}"),
            Self::InvalidFormat { context, detail } => {
                write!(f, "invalid format in {context}: {detail}")
            }
            Self::MissingField { field } => {
                write!(f, "missing required field `{field}`")
            }
            Self::UnsupportedFormat { detail } => write!(f, "unsupported format: {detail}"),
            Self::UnsupportedLayout { context, layout } => {
                write!(f, "unsupported {context} layout: {layout}")
            }
        }
    }
}

impl std::error::Error for DecodeError {}

/// Result type for decoding operations.
pub type DecodeResult<T> = Result<T, DecodeError>;
