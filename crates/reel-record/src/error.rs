//! Recording-session error types.

use std::error::Error;
use std::fmt;
use std::io;
use std::path::PathBuf;

use reel_buffer::BufferError;
use reel_core::CompatLevel;
use reel_format::FormatError;

/// Errors raised by a [`DemoSession`](crate::DemoSession).
///
/// An error returned while a recording is in progress moves the session
/// to [`SessionState::Aborted`](crate::SessionState::Aborted); the
/// partially recorded demo is discarded. [`MarkerCollision`](Self::MarkerCollision)
/// is the exception: the record is refused and the recording continues.
#[derive(Debug)]
pub enum RecordError {
    /// Recording was requested without a compatibility level.
    CompatibilityLevelUnspecified,
    /// The experimental map format was requested without opting in.
    ExperimentalFormatRequiresOptIn,
    /// The experimental map format needs the MBF21 compatibility level.
    ExperimentalFormatRequiresMbf21 {
        /// The level that was configured instead.
        level: CompatLevel,
    },
    /// `start` was called while a recording is already in progress.
    AlreadyRecording,
    /// A recording operation was called with no recording in progress.
    NotRecording,
    /// A tic record did not match the session's record width.
    TicWidthMismatch {
        /// Width fixed at session start.
        expected: usize,
        /// Length of the record that was passed in.
        found: usize,
    },
    /// A legacy tic record began with the end-marker byte and would end
    /// playback early.
    MarkerCollision {
        /// Index of the refused tic.
        tic: u32,
    },
    /// The demo outgrew the 32-bit offsets of the versioned header.
    DemoTooLarge {
        /// Offset that did not fit.
        offset: usize,
    },
    /// Every numbered variant of the base name is taken.
    NamesExhausted {
        /// The base name being numbered.
        base: String,
    },
    /// Writing the finished demo failed.
    Persist {
        /// Destination that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: io::Error,
    },
    /// A checkpoint stream ended before its fields were read.
    TruncatedCheckpoint,
    /// A configuration value is out of range.
    InvalidConfig {
        /// Description of the problem.
        reason: String,
    },
    /// Demo buffer failure.
    Buffer(BufferError),
    /// Demo format failure.
    Format(FormatError),
    /// Checkpoint stream failure.
    Io(io::Error),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CompatibilityLevelUnspecified => {
                write!(f, "you must specify a compatibility level when recording a demo")
            }
            Self::ExperimentalFormatRequiresOptIn => {
                write!(f, "the experimental map format requires explicit opt-in")
            }
            Self::ExperimentalFormatRequiresMbf21 { level } => {
                write!(
                    f,
                    "the experimental map format requires compatibility level {}, got {level}",
                    CompatLevel::MBF21
                )
            }
            Self::AlreadyRecording => write!(f, "a demo is already being recorded"),
            Self::NotRecording => write!(f, "no demo is being recorded"),
            Self::TicWidthMismatch { expected, found } => {
                write!(f, "tic record is {found} bytes, session records {expected}")
            }
            Self::MarkerCollision { tic } => {
                write!(f, "tic {tic} begins with the end-marker byte")
            }
            Self::DemoTooLarge { offset } => {
                write!(f, "demo offset {offset} does not fit in 32 bits")
            }
            Self::NamesExhausted { base } => {
                write!(f, "no free demo name left for base {base:?}")
            }
            Self::Persist { path, source } => {
                write!(f, "failed to write demo {}: {source}", path.display())
            }
            Self::TruncatedCheckpoint => write!(f, "checkpoint data ended early"),
            Self::InvalidConfig { reason } => write!(f, "invalid recorder config: {reason}"),
            Self::Buffer(e) => write!(f, "buffer: {e}"),
            Self::Format(e) => write!(f, "format: {e}"),
            Self::Io(e) => write!(f, "i/o: {e}"),
        }
    }
}

impl Error for RecordError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persist { source, .. } => Some(source),
            Self::Buffer(e) => Some(e),
            Self::Format(e) => Some(e),
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<BufferError> for RecordError {
    fn from(e: BufferError) -> Self {
        Self::Buffer(e)
    }
}

impl From<FormatError> for RecordError {
    fn from(e: FormatError) -> Self {
        Self::Format(e)
    }
}

impl From<io::Error> for RecordError {
    fn from(e: io::Error) -> Self {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Self::TruncatedCheckpoint
        } else {
            Self::Io(e)
        }
    }
}
