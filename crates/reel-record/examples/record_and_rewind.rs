//! Reel: recording a demo, rewinding mid-run, and playing it back.
//!
//! Demonstrates:
//!   1. Recording seeded input into a versioned demo
//!   2. Taking a partial checkpoint and rewinding to it
//!   3. Recording over the rewound section with different input
//!   4. Playing the demo back and confirming the original tics survived
//!
//! Run with:
//!   cargo run --example record_and_rewind

use reel_core::{CompatLevel, ModeFlags};
use reel_format::{BaseHeaderInfo, DemoReader, FormatError};
use reel_record::{
    CheckpointKind, DemoSession, FormatChoice, RecorderConfig, Rewindable,
};
use reel_test_utils::{FixedFooter, MemoryStorage, SeededInput};

// ---- Parameters --------------------------------------------------------

const TICS: usize = 35;
const REWIND_AT: usize = 20;
const ENGINE_HEADER: [u8; 3] = [221, 4, 1];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = DemoSession::new(RecorderConfig {
        base_name: Some("example".into()),
        compatibility_level: Some(CompatLevel::MBF21),
        flags: ModeFlags {
            long_tics: true,
            ..ModeFlags::default()
        },
        format: FormatChoice::Versioned,
        ..RecorderConfig::default()
    });

    // ---- Record --------------------------------------------------------

    session.start()?;
    session.write_raw(&ENGINE_HEADER)?;
    println!(
        "recording with {}-byte tics",
        session.tic_width().unwrap_or_default()
    );

    let mut live = SeededInput::new(1);
    let mut checkpoint = Vec::new();
    let mut original = Vec::new();
    for tic in 0..TICS {
        if tic == REWIND_AT {
            session.store_checkpoint(&mut checkpoint, CheckpointKind::Partial)?;
        }
        original.push(session.record_tic(&live.next_cmd())?);
    }

    // ---- Rewind and record over -----------------------------------------

    session.load_checkpoint(&mut checkpoint.as_slice(), CheckpointKind::Partial)?;
    println!(
        "rewound to tic {} (cursor {:?}, high-water mark {:?})",
        session.tic_count(),
        session.cursor(),
        session.high_water_mark()
    );

    let mut other = SeededInput::new(2);
    let mut replayed = 0;
    while session.tic_count() < TICS as u32 + 5 {
        if session.pending_command().is_some() {
            replayed += 1;
        }
        session.record_tic(&other.next_cmd())?;
    }
    println!("replayed {replayed} recorded tics before resuming live input");

    let mut storage = MemoryStorage::new();
    let demo = session.stop(&mut FixedFooter(b"-complevel 21".to_vec()), &mut storage)?;
    println!(
        "wrote {} ({} tics, {} bytes)",
        demo.path.display(),
        demo.tics,
        demo.len
    );

    // ---- Play back -----------------------------------------------------

    let bytes = storage.get(&demo.path).ok_or("demo missing from storage")?;
    let mut base = |_: &[u8], offset: usize| -> Result<BaseHeaderInfo, FormatError> {
        Ok(BaseHeaderInfo {
            tics_offset: offset + ENGINE_HEADER.len(),
            flags: ModeFlags {
                long_tics: true,
                ..ModeFlags::default()
            },
            player_count: 1,
        })
    };
    let reader = DemoReader::open(bytes, &mut base)?;
    println!("demo reports {} tics", reader.tic_count());

    let played: Vec<_> = reader.tics().collect::<Result<_, _>>()?;
    let matches = played
        .iter()
        .zip(&original)
        .filter(|(a, b)| a == b)
        .count();
    println!("{matches}/{TICS} original tics preserved across the rewind");

    Ok(())
}
