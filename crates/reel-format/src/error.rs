//! Error types for the demo container format.

use std::error::Error;
use std::fmt;

/// Errors raised while decoding a demo.
///
/// Probing a header variant that simply is not present is not an error;
/// these are hard failures that must reach the caller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FormatError {
    /// The defunct extension header was recognised but is malformed.
    UnknownFormat {
        /// Which structural check failed.
        detail: String,
    },
    /// A header ended before a required field.
    TruncatedHeader {
        /// Bytes required to read the field.
        needed: usize,
        /// Bytes actually available.
        available: usize,
    },
    /// Fewer than one tic width of bytes remain before the end of the
    /// tic data.
    TruncatedTic {
        /// Bytes per tic record.
        needed: usize,
        /// Bytes remaining before the extent.
        available: usize,
    },
    /// No end marker was found after the tic data.
    MissingEndMarker,
    /// The versioned header points at a byte that is not the end marker.
    MarkerMismatch {
        /// Offset recorded in the header.
        offset: usize,
        /// Byte found there, if the offset is in range.
        found: Option<u8>,
    },
    /// The host's base header reader rejected the engine header.
    BaseHeader {
        /// Reader-supplied description.
        detail: String,
    },
}

impl fmt::Display for FormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownFormat { detail } => write!(f, "unknown demo format: {detail}"),
            Self::TruncatedHeader { needed, available } => {
                write!(
                    f,
                    "truncated demo header: need {needed} bytes, {available} available"
                )
            }
            Self::TruncatedTic { needed, available } => {
                write!(
                    f,
                    "truncated tic record: need {needed} bytes, {available} before end of tic data"
                )
            }
            Self::MissingEndMarker => write!(f, "demo has no end marker"),
            Self::MarkerMismatch { offset, found } => match found {
                Some(byte) => write!(
                    f,
                    "end marker expected at offset {offset}, found {byte:#04x}"
                ),
                None => write!(f, "end marker offset {offset} is past the end of the demo"),
            },
            Self::BaseHeader { detail } => write!(f, "invalid base demo header: {detail}"),
        }
    }
}

impl Error for FormatError {}
