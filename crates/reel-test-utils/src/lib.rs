//! Test utilities and mock collaborators for Reel development.
//!
//! Provides an in-memory [`DemoStorage`], a fixed-content
//! [`FooterWriter`], and [`SeededInput`], a deterministic stream of
//! plausible tic commands for recording scenarios.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use reel_core::{DemoStorage, FooterWriter, TicCmd};

/// In-memory implementation of [`DemoStorage`].
///
/// Pre-populate names with [`insert`](MemoryStorage::insert) to make
/// them look taken; inspect written demos with [`get`](MemoryStorage::get).
#[derive(Default)]
pub struct MemoryStorage {
    files: HashMap<PathBuf, Vec<u8>>,
    fail_writes: bool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage whose every write fails with `PermissionDenied`.
    pub fn failing() -> Self {
        Self {
            files: HashMap::new(),
            fail_writes: true,
        }
    }

    /// Store `bytes` under `path` directly.
    pub fn insert(&mut self, path: impl Into<PathBuf>, bytes: Vec<u8>) {
        self.files.insert(path.into(), bytes);
    }

    /// Contents written to `path`, if any.
    pub fn get(&self, path: impl AsRef<Path>) -> Option<&[u8]> {
        self.files.get(path.as_ref()).map(|v| v.as_slice())
    }

    /// Number of stored files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl DemoStorage for MemoryStorage {
    fn exists(&self, path: &Path) -> bool {
        self.files.contains_key(path)
    }

    fn write(&mut self, path: &Path, bytes: &[u8]) -> io::Result<()> {
        if self.fail_writes {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "storage is read-only",
            ));
        }
        self.files.insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}

/// [`FooterWriter`] that appends the same bytes every time.
#[derive(Clone, Debug, Default)]
pub struct FixedFooter(pub Vec<u8>);

impl FooterWriter for FixedFooter {
    fn write_footer(&mut self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.0);
    }
}

/// Deterministic stream of tic commands.
///
/// Seeded ChaCha8, so two streams with the same seed yield identical
/// commands on every platform. Movement stays within the engine's
/// normal running range, which keeps the first byte of every record
/// clear of the end-marker value.
pub struct SeededInput {
    rng: ChaCha8Rng,
}

impl SeededInput {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Produce the next command.
    pub fn next_cmd(&mut self) -> TicCmd {
        let a = self.rng.next_u32();
        let b = self.rng.next_u32();
        TicCmd {
            forward_move: ((a % 101) as i16 - 50) as i8,
            side_move: (((a >> 8) % 81) as i16 - 40) as i8,
            angle_turn: (a >> 16) as u16 as i16,
            buttons: b as u8,
            look_fly: (b >> 8) as u8,
            artifact: (b >> 16) as u8,
            ex_actions: (b >> 24) as u8,
        }
    }
}

impl Iterator for SeededInput {
    type Item = TicCmd;

    fn next(&mut self) -> Option<TicCmd> {
        Some(self.next_cmd())
    }
}
