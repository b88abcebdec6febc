//! Demo recording for Reel.
//!
//! A [`DemoSession`] turns per-tic input commands into a demo file:
//!
//! 1. [`DemoSession::start`] validates the [`RecorderConfig`], allocates
//!    the buffer and writes the extension header.
//! 2. The host writes its base header with [`DemoSession::write_raw`],
//!    then calls [`DemoSession::record_tic`] once per player per tic.
//! 3. [`DemoSession::stop`] terminates the tic data, fills in the header
//!    metadata, appends the engine footer and persists the demo under
//!    the next free name from its [`DemoNamer`].
//!
//! Rewinding is supported through [`Rewindable`]: restoring a partial
//! checkpoint moves the cursor back, and the tics recorded past it are
//! replayed over the rewound section instead of live input until the
//! recording catches up.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod naming;
pub mod rewind;
pub mod session;
pub mod storage;

pub use config::{FormatChoice, RecorderConfig};
pub use error::RecordError;
pub use naming::DemoNamer;
pub use rewind::{CheckpointKind, Rewindable};
pub use session::{DemoSession, FinishedDemo, SessionState};
pub use storage::FsStorage;
