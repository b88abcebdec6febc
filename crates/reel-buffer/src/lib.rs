//! Growable, rewindable byte buffer backing a demo recording.
//!
//! A [`DemoBuffer`] is an owned `Vec<u8>` with an explicit integer
//! cursor. Nothing outside this crate ever holds a pointer into the
//! backing storage, so growth can reallocate freely: callers address
//! bytes by offset and every access is bounds-checked.
//!
//! # Cursor model
//!
//! ```text
//! 0            cursor        high-water mark        capacity
//! |--written---|--recorded future--|----stale/zero----|
//! ```
//!
//! - Appends write at the cursor and advance it, doubling the capacity
//!   whenever they would overflow it.
//! - [`DemoBuffer::set_cursor`] may only move the cursor backward. The
//!   bytes it skips over are not erased: up to the high-water mark they
//!   are genuinely recorded future tics that a resumed recording can
//!   replay from.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod error;

pub use buffer::DemoBuffer;
pub use config::BufferConfig;
pub use error::BufferError;
