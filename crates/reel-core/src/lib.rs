//! Core types and traits for the Reel demo subsystem.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the per-tic input command, the mode flags that fix a recording's
//! record width, the compatibility level newtype, and the traits through
//! which the recorder talks to its host (storage and footer writing).

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod id;
pub mod tic;
pub mod traits;

pub use id::CompatLevel;
pub use tic::{ModeFlags, TicBytes, TicCmd, BASE_TIC_WIDTH};
pub use traits::{DemoStorage, FooterWriter};
