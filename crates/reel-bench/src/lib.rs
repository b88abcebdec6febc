//! Benchmark profiles and utilities for the Reel demo subsystem.
//!
//! Provides pre-built recordings for benchmarking:
//!
//! - [`recording_profile`]: a [`RecorderConfig`] for a given header and flags
//! - [`record_demo`]: a complete demo of `tics` seeded tic records
//! - [`base_header_reader`]: the matching base-header parser for playback

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use reel_core::{CompatLevel, ModeFlags};
use reel_format::{BaseHeaderInfo, FormatError};
use reel_record::{DemoSession, FormatChoice, RecordError, RecorderConfig};
use reel_test_utils::{FixedFooter, MemoryStorage, SeededInput};

/// Engine base header written by every benchmark recording.
pub const BASE_HEADER: [u8; 3] = [221, 4, 1];

/// 35 tics per second for an hour.
pub const HOUR_OF_TICS: usize = 35 * 60 * 60;

/// Build a recorder profile for the given header and mode flags.
pub fn recording_profile(format: FormatChoice, flags: ModeFlags) -> RecorderConfig {
    RecorderConfig {
        base_name: Some("bench".into()),
        compatibility_level: Some(CompatLevel::MBF21),
        flags,
        format,
        ..RecorderConfig::default()
    }
}

/// Record `tics` commands from a seeded stream and return the demo bytes.
pub fn record_demo(config: RecorderConfig, tics: usize, seed: u64) -> Result<Vec<u8>, RecordError> {
    let mut session = DemoSession::new(config);
    session.start()?;
    session.write_raw(&BASE_HEADER)?;
    for cmd in SeededInput::new(seed).take(tics) {
        session.record_tic(&cmd)?;
    }
    let mut storage = MemoryStorage::new();
    let demo = session.stop(&mut FixedFooter(b"bench".to_vec()), &mut storage)?;
    Ok(storage
        .get(&demo.path)
        .map(|bytes| bytes.to_vec())
        .unwrap_or_default())
}

/// Base-header parser matching [`record_demo`] output.
pub fn base_header_reader(
    flags: ModeFlags,
) -> impl FnMut(&[u8], usize) -> Result<BaseHeaderInfo, FormatError> {
    move |_: &[u8], offset: usize| {
        Ok(BaseHeaderInfo {
            tics_offset: offset + BASE_HEADER.len(),
            flags,
            player_count: 1,
        })
    }
}
