//! Demo container format: header detection, tic records, and playback.
//!
//! A demo is the engine's own base header followed by fixed-width tic
//! records and a one-byte end marker, optionally preceded by one of two
//! extension headers that sit behind an escape byte.
//!
//! # Format
//!
//! ```text
//! [ESCAPE 255] [0x1d "DSDA" 0xE6] [VERSION u8] [END OFFSET u32 BE] [TIC COUNT u32 BE]
//! [base engine header]
//! [tic 1] [tic 2] ... [tic N]
//! [END MARKER 0x80]
//! [footer]
//! ```
//!
//! - [`header`] detects and writes the extension header variants
//! - [`tic`] encodes and decodes single tic records
//! - [`marker`] locates the end of the tic data and counts tics
//! - [`DemoReader`] plays back tics from a complete demo
//!
//! All multi-byte header integers are big-endian regardless of host.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod error;
pub mod header;
pub mod marker;
pub mod reader;
pub mod tic;

pub use error::FormatError;
pub use header::{detect_header, DemoHeader, DetectedHeader, VersionedMeta};
pub use marker::{demo_marker_position, demo_tic_count};
pub use reader::{BaseHeaderInfo, BaseHeaderReader, DemoReader, TicIter};
pub use tic::TicCodec;

/// Sentinel byte terminating the tic data.
pub const DEMO_MARKER: u8 = 0x80;

/// First byte of every demo that carries an extension header.
pub const FORMAT_ESCAPE: u8 = 255;

/// Highest versioned-header format version this codec understands.
///
/// History:
/// - v1: end-marker offset and tic count metadata
pub const FORMAT_VERSION: u8 = 1;
