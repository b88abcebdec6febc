//! Rewind checkpoints of the recording position.
//!
//! The host's rewind system snapshots game state at intervals and calls
//! [`Rewindable::store_checkpoint`] alongside; restoring the snapshot
//! calls [`Rewindable::load_checkpoint`] to move the demo back with it.
//!
//! # Wire format
//!
//! ```text
//! [CURSOR u32 LE] [TIC COUNT u32 LE] [PAYLOAD: CURSOR bytes, full checkpoints only]
//! ```
//!
//! A partial checkpoint only moves the cursor back; the bytes past it
//! stay in the buffer and replay over the rewound tics. A full
//! checkpoint carries the whole demo up to its cursor and rewrites the
//! buffer from offset zero.

use std::io::{Read, Write};

use reel_format::codec::{read_u32_le, write_u32_le};

use crate::error::RecordError;
use crate::session::DemoSession;

/// Fixed prefix of every checkpoint: cursor and tic count.
pub const CHECKPOINT_HEADER_LEN: usize = 8;

/// How much of the demo a checkpoint carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CheckpointKind {
    /// Cursor and tic count only.
    #[default]
    Partial,
    /// Cursor, tic count and the demo bytes below the cursor.
    Full,
}

/// State that can be saved into and restored from a rewind checkpoint.
pub trait Rewindable {
    /// Bytes [`store_checkpoint`](Self::store_checkpoint) will write.
    fn checkpoint_size(&self, kind: CheckpointKind) -> usize;

    /// Serialize the current position into `w`.
    fn store_checkpoint(&self, w: &mut dyn Write, kind: CheckpointKind) -> Result<(), RecordError>;

    /// Restore a position previously stored with the same `kind`.
    fn load_checkpoint(&mut self, r: &mut dyn Read, kind: CheckpointKind) -> Result<(), RecordError>;
}

impl Rewindable for DemoSession {
    fn checkpoint_size(&self, kind: CheckpointKind) -> usize {
        let payload = match kind {
            CheckpointKind::Full => self.cursor().unwrap_or(0),
            CheckpointKind::Partial => 0,
        };
        CHECKPOINT_HEADER_LEN + payload
    }

    fn store_checkpoint(&self, w: &mut dyn Write, kind: CheckpointKind) -> Result<(), RecordError> {
        let cursor = self.cursor().unwrap_or(0);
        let cursor32 =
            u32::try_from(cursor).map_err(|_| RecordError::DemoTooLarge { offset: cursor })?;
        write_u32_le(w, cursor32)?;
        write_u32_le(w, self.tic_count())?;
        if kind == CheckpointKind::Full && cursor > 0 {
            w.write_all(self.bytes())?;
        }
        Ok(())
    }

    fn load_checkpoint(&mut self, r: &mut dyn Read, kind: CheckpointKind) -> Result<(), RecordError> {
        let result = restore(self, r, kind);
        if self.is_recording() {
            self.guard(result)
        } else {
            result
        }
    }
}

fn restore(
    session: &mut DemoSession,
    r: &mut dyn Read,
    kind: CheckpointKind,
) -> Result<(), RecordError> {
    let cursor = read_u32_le(r)? as usize;
    let tics = read_u32_le(r)?;

    let payload = if kind == CheckpointKind::Full && cursor > 0 {
        let mut payload = Vec::new();
        Read::take(&mut *r, cursor as u64).read_to_end(&mut payload)?;
        if payload.len() < cursor {
            return Err(RecordError::TruncatedCheckpoint);
        }
        Some(payload)
    } else {
        None
    };

    let Some(active) = session.active.as_mut() else {
        log::debug!("checkpoint at offset {cursor} restored with no recording in progress");
        return Ok(());
    };
    active.tics = tics;
    match payload {
        Some(payload) => {
            active.buffer.set_cursor(0)?;
            active.buffer.append(&payload)?;
            log::debug!("restored full demo checkpoint: {cursor} bytes, {tics} tics");
        }
        None => {
            active.buffer.set_cursor(cursor)?;
            log::debug!("rewound demo to offset {cursor} at {tics} tics");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RecorderConfig;
    use crate::SessionState;
    use reel_buffer::BufferError;
    use reel_core::{CompatLevel, TicCmd};
    use reel_test_utils::SeededInput;

    fn recording() -> DemoSession {
        let mut session = DemoSession::new(RecorderConfig {
            compatibility_level: Some(CompatLevel(9)),
            ..RecorderConfig::default()
        });
        session.start().unwrap();
        session.write_raw(&[1, 2, 3]).unwrap();
        session
    }

    fn record(session: &mut DemoSession, input: &mut SeededInput, n: usize) {
        for _ in 0..n {
            session.record_tic(&input.next_cmd()).unwrap();
        }
    }

    fn store(session: &DemoSession, kind: CheckpointKind) -> Vec<u8> {
        let mut out = Vec::new();
        session.store_checkpoint(&mut out, kind).unwrap();
        assert_eq!(out.len(), session.checkpoint_size(kind));
        out
    }

    #[test]
    fn partial_checkpoint_layout() {
        let mut session = recording();
        record(&mut session, &mut SeededInput::new(1), 2);
        let bytes = store(&session, CheckpointKind::Partial);
        assert_eq!(bytes, [11, 0, 0, 0, 2, 0, 0, 0]);
    }

    #[test]
    fn full_checkpoint_carries_demo_bytes() {
        let mut session = recording();
        record(&mut session, &mut SeededInput::new(1), 2);
        let bytes = store(&session, CheckpointKind::Full);
        assert_eq!(&bytes[8..], session.bytes());
    }

    #[test]
    fn idle_session_stores_empty_position() {
        let session = DemoSession::new(RecorderConfig::default());
        assert_eq!(store(&session, CheckpointKind::Full), [0; 8]);
    }

    #[test]
    fn partial_restore_moves_cursor_and_keeps_future() {
        let mut session = recording();
        let mut input = SeededInput::new(2);
        record(&mut session, &mut input, 2);
        let checkpoint = store(&session, CheckpointKind::Partial);
        record(&mut session, &mut input, 3);
        let hwm = session.cursor().unwrap();

        session
            .load_checkpoint(&mut checkpoint.as_slice(), CheckpointKind::Partial)
            .unwrap();
        assert_eq!(session.cursor(), Some(11));
        assert_eq!(session.tic_count(), 2);
        assert_eq!(session.high_water_mark(), Some(hwm));
        assert!(session.pending_command().is_some());
    }

    #[test]
    fn full_restore_rewrites_from_zero() {
        let mut session = recording();
        let mut input = SeededInput::new(3);
        record(&mut session, &mut input, 4);
        let checkpoint = store(&session, CheckpointKind::Full);
        let before = session.bytes().to_vec();
        record(&mut session, &mut input, 4);

        session
            .load_checkpoint(&mut checkpoint.as_slice(), CheckpointKind::Full)
            .unwrap();
        assert_eq!(session.bytes(), before.as_slice());
        assert_eq!(session.tic_count(), 4);
    }

    #[test]
    fn forward_partial_restore_aborts() {
        let mut session = recording();
        let mut checkpoint = Vec::new();
        write_u32_le(&mut checkpoint, 500).unwrap();
        write_u32_le(&mut checkpoint, 9).unwrap();

        let result = session.load_checkpoint(&mut checkpoint.as_slice(), CheckpointKind::Partial);
        assert!(matches!(
            result,
            Err(RecordError::Buffer(BufferError::TimeTravel {
                requested: 500,
                current: 3
            }))
        ));
        assert_eq!(session.state(), SessionState::Aborted);
    }

    #[test]
    fn truncated_checkpoint_is_reported() {
        let mut session = recording();
        let result = session.load_checkpoint(&mut &[1u8, 0, 0][..], CheckpointKind::Partial);
        assert!(matches!(result, Err(RecordError::TruncatedCheckpoint)));

        let mut session = recording();
        let mut checkpoint = Vec::new();
        write_u32_le(&mut checkpoint, 10).unwrap();
        write_u32_le(&mut checkpoint, 1).unwrap();
        checkpoint.extend_from_slice(&[0; 4]);
        let result = session.load_checkpoint(&mut checkpoint.as_slice(), CheckpointKind::Full);
        assert!(matches!(result, Err(RecordError::TruncatedCheckpoint)));
    }

    #[test]
    fn restore_without_recording_is_a_no_op() {
        let mut session = DemoSession::new(RecorderConfig::default());
        let mut checkpoint = Vec::new();
        write_u32_le(&mut checkpoint, 4).unwrap();
        write_u32_le(&mut checkpoint, 1).unwrap();
        checkpoint.extend_from_slice(&[9; 4]);
        session
            .load_checkpoint(&mut checkpoint.as_slice(), CheckpointKind::Full)
            .unwrap();
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.bytes().is_empty());
    }

    #[test]
    fn full_checkpoint_at_zero_has_no_payload() {
        let mut session = DemoSession::new(RecorderConfig {
            compatibility_level: Some(CompatLevel(9)),
            ..RecorderConfig::default()
        });
        session.start().unwrap();
        let checkpoint = store(&session, CheckpointKind::Full);
        assert_eq!(checkpoint.len(), CHECKPOINT_HEADER_LEN);
        session.record_tic(&TicCmd::default()).unwrap();
        session
            .load_checkpoint(&mut checkpoint.as_slice(), CheckpointKind::Full)
            .unwrap();
        assert_eq!(session.cursor(), Some(0));
    }
}
