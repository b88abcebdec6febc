//! Buffer-specific error types.

use std::error::Error;
use std::fmt;

/// Errors that can occur during buffer operations.
///
/// Every variant is fatal to the recording that owns the buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BufferError {
    /// Growing the backing storage failed.
    OutOfMemory {
        /// Capacity in bytes that could not be allocated.
        requested: usize,
    },
    /// A cursor move would seek forward past the current cursor.
    ///
    /// Bytes beyond the cursor may be stale, so a forward seek would
    /// silently desynchronize playback.
    TimeTravel {
        /// The offset the caller asked for.
        requested: usize,
        /// The cursor at the time of the call.
        current: usize,
    },
    /// A read or patch fell outside the addressable region.
    OutOfBounds {
        /// Start of the requested range.
        offset: usize,
        /// Length of the requested range.
        len: usize,
        /// End of the addressable region.
        limit: usize,
    },
    /// A configuration asked for a zero-byte initial capacity.
    ZeroCapacity,
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfMemory { requested } => {
                write!(f, "out of memory expanding demo buffer to {requested} bytes")
            }
            Self::TimeTravel { requested, current } => {
                write!(
                    f,
                    "impossible time traveling detected: cursor {current} cannot seek forward to {requested}"
                )
            }
            Self::OutOfBounds { offset, len, limit } => {
                write!(
                    f,
                    "range {offset}..{} is outside the addressable region 0..{limit}",
                    offset.saturating_add(*len)
                )
            }
            Self::ZeroCapacity => write!(f, "initial demo buffer capacity must be non-zero"),
        }
    }
}

impl Error for BufferError {}
