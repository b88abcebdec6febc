//! Locating the end of the tic data.
//!
//! A versioned header records the end marker's offset and the tic count,
//! so both are O(1) lookups. Every other variant, version 0 included,
//! needs a linear scan in steps of one tic width until the marker byte
//! turns up at a record boundary.

use crate::error::FormatError;
use crate::header::DemoHeader;
use crate::DEMO_MARKER;

/// Offset of the end marker.
///
/// `tics_offset` is where the first tic record starts. For a header
/// with an [`extent`](DemoHeader::extent) the recorded offset must hold
/// the marker byte; otherwise the records are scanned.
pub fn demo_marker_position(
    bytes: &[u8],
    header: &DemoHeader,
    tics_offset: usize,
    tic_width: usize,
) -> Result<usize, FormatError> {
    if let Some(meta) = header.extent() {
        let offset = meta.end_marker_offset as usize;
        return match bytes.get(offset) {
            Some(&DEMO_MARKER) => Ok(offset),
            found => Err(FormatError::MarkerMismatch {
                offset,
                found: found.copied(),
            }),
        };
    }
    scan_for_marker(bytes, tics_offset, tic_width).ok_or(FormatError::MissingEndMarker)
}

/// Number of game tics in the demo.
///
/// Tic records are written once per player per game tic, so the record
/// count is divided by `player_count`. Without a versioned header the
/// records before the end marker are counted; a demo missing its marker
/// counts every whole record to the end of the data.
pub fn demo_tic_count(
    bytes: &[u8],
    header: &DemoHeader,
    tics_offset: usize,
    tic_width: usize,
    player_count: usize,
) -> usize {
    let players = player_count.max(1);
    if let Some(meta) = header.extent() {
        return meta.tic_count as usize / players;
    }
    let end = scan_for_marker(bytes, tics_offset, tic_width).unwrap_or(bytes.len());
    let records = end.saturating_sub(tics_offset) / tic_width.max(1);
    records / players
}

fn scan_for_marker(bytes: &[u8], tics_offset: usize, tic_width: usize) -> Option<usize> {
    let step = tic_width.max(1);
    let mut p = tics_offset;
    while p < bytes.len() && bytes[p] != DEMO_MARKER {
        p += step;
    }
    (p < bytes.len()).then_some(p)
}
