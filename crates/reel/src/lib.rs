//! Reel: demo input recording and playback for deterministic game engines.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Reel sub-crates. For most users, adding `reel` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use reel::prelude::*;
//! use reel_test_utils::{FixedFooter, MemoryStorage};
//!
//! let mut session = DemoSession::new(RecorderConfig {
//!     base_name: Some("quick".into()),
//!     compatibility_level: Some(CompatLevel(21)),
//!     format: FormatChoice::Versioned,
//!     ..RecorderConfig::default()
//! });
//! session.start().unwrap();
//! session.write_raw(&[109]).unwrap(); // engine base header
//! for forward_move in [10, 20, 30] {
//!     session.record_tic(&TicCmd { forward_move, ..TicCmd::default() }).unwrap();
//! }
//!
//! let mut storage = MemoryStorage::new();
//! let demo = session.stop(&mut FixedFooter::default(), &mut storage).unwrap();
//! let bytes = storage.get(&demo.path).unwrap();
//!
//! let mut base = |_: &[u8], offset: usize| -> Result<BaseHeaderInfo, FormatError> {
//!     Ok(BaseHeaderInfo { tics_offset: offset + 1, flags: ModeFlags::default(), player_count: 1 })
//! };
//! let reader = DemoReader::open(bytes, &mut base).unwrap();
//! assert_eq!(reader.tic_count(), 3);
//! let moves: Vec<i8> = reader.tics().map(|t| t.unwrap().forward_move).collect();
//! assert_eq!(moves, [10, 20, 30]);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `reel-core` | Tic commands, mode flags, compatibility level, host traits |
//! | [`buffer`] | `reel-buffer` | The rewindable demo write buffer |
//! | [`format`] | `reel-format` | Header detection, tic codec, end-marker lookup, playback |
//! | [`record`] | `reel-record` | Recording sessions, naming, rewind checkpoints |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and host traits (`reel-core`).
pub use reel_core as types;

/// The demo write buffer (`reel-buffer`).
///
/// [`buffer::DemoBuffer`] owns the demo bytes, its cursor and the
/// high-water mark that makes replay over a rewind possible.
pub use reel_buffer as buffer;

/// Demo container format (`reel-format`).
///
/// Detect extension headers with [`format::detect_header`], encode and
/// decode tic records with [`format::TicCodec`], and play back complete
/// demos with [`format::DemoReader`].
pub use reel_format as format;

/// Recording sessions (`reel-record`).
///
/// [`record::DemoSession`] drives a recording from `start` to `stop`;
/// [`record::Rewindable`] bridges it to the host's rewind checkpoints.
pub use reel_record as record;

/// Common imports for typical Reel usage.
///
/// ```rust
/// use reel::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use reel_core::{CompatLevel, DemoStorage, FooterWriter, ModeFlags, TicCmd};

    // Errors
    pub use reel_buffer::BufferError;
    pub use reel_format::FormatError;
    pub use reel_record::RecordError;

    // Format
    pub use reel_format::{BaseHeaderInfo, DemoHeader, DemoReader, TicCodec};

    // Recording
    pub use reel_record::{
        CheckpointKind, DemoSession, FormatChoice, FsStorage, RecorderConfig, Rewindable,
        SessionState,
    };
}
