//! The recording session lifecycle.
//!
//! ```text
//!           start()                 stop()
//!   Idle ────────────▶ Recording ────────────▶ Idle
//!    ▲                    │
//!    │   start()          │ any fatal error
//!    └────────────── Aborted ◀┘
//! ```
//!
//! A session owns at most one in-progress recording. The recording's
//! buffer, codec and tic counter live in a private `ActiveRecording`
//! that is created by `start` and dropped by `stop` or a fatal error,
//! so no recording state outlives the recording.

use std::path::PathBuf;

use reel_buffer::DemoBuffer;
use reel_core::{DemoStorage, FooterWriter, TicCmd};
use reel_format::header::{encode_metadata, write_versioned_header};
use reel_format::{TicCodec, DEMO_MARKER};

use crate::config::{FormatChoice, RecorderConfig};
use crate::error::RecordError;
use crate::naming::DemoNamer;

// ── SessionState ───────────────────────────────────────────────────

/// Lifecycle state of a [`DemoSession`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// No recording in progress.
    Idle,
    /// Tics are being appended to the demo buffer.
    Recording,
    /// The last recording hit a fatal error and was discarded.
    Aborted,
}

/// Summary of a demo written by [`DemoSession::stop`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FinishedDemo {
    /// Name the demo was written under.
    pub path: PathBuf,
    /// Size of the written file in bytes.
    pub len: usize,
    /// Tic records in the demo.
    pub tics: u32,
}

// ── ActiveRecording ────────────────────────────────────────────────

pub(crate) struct ActiveRecording {
    pub(crate) buffer: DemoBuffer,
    pub(crate) codec: TicCodec,
    /// Where the versioned metadata block sits, if one was written.
    metadata_offset: Option<usize>,
    pub(crate) tics: u32,
}

impl ActiveRecording {
    fn append_frame(&mut self, bytes: &[u8]) -> Result<(), RecordError> {
        let expected = self.codec.width();
        if bytes.len() != expected {
            return Err(RecordError::TicWidthMismatch {
                expected,
                found: bytes.len(),
            });
        }
        if self.metadata_offset.is_none() && bytes.first() == Some(&DEMO_MARKER) {
            return Err(RecordError::MarkerCollision { tic: self.tics });
        }
        self.buffer.append(bytes)?;
        self.tics = self.tics.saturating_add(1);
        Ok(())
    }

    /// The representable form of `live`.
    ///
    /// Legacy demos end at the first record starting with the marker
    /// byte, so a forward move of -128 is written as -127.
    fn quantize(&self, live: &TicCmd) -> TicCmd {
        let mut cmd = self.codec.quantize(live);
        if self.metadata_offset.is_none() && cmd.forward_move as u8 == DEMO_MARKER {
            cmd.forward_move += 1;
        }
        cmd
    }

    fn pending_command(&self) -> Option<TicCmd> {
        let future = self.buffer.recorded_future();
        if future.len() < self.codec.width() {
            return None;
        }
        self.codec.decode(future).ok()
    }
}

// ── DemoSession ────────────────────────────────────────────────────

/// Records one demo at a time into an in-memory buffer.
///
/// # Examples
///
/// ```
/// use reel_core::{CompatLevel, TicCmd};
/// use reel_record::{DemoSession, RecorderConfig, SessionState};
/// use reel_test_utils::{FixedFooter, MemoryStorage};
///
/// let mut session = DemoSession::new(RecorderConfig {
///     base_name: Some("run".into()),
///     compatibility_level: Some(CompatLevel(9)),
///     ..RecorderConfig::default()
/// });
/// session.start().unwrap();
/// session.write_raw(&[109]).unwrap(); // engine header
/// session.record_tic(&TicCmd { forward_move: 25, ..TicCmd::default() }).unwrap();
///
/// let mut storage = MemoryStorage::new();
/// let demo = session.stop(&mut FixedFooter::default(), &mut storage).unwrap();
/// assert_eq!(demo.path.to_str(), Some("run.lmp"));
/// assert_eq!(storage.get("run.lmp").unwrap(), &[109, 25, 0, 0, 0, 0x80]);
/// assert_eq!(session.state(), SessionState::Idle);
/// ```
pub struct DemoSession {
    config: RecorderConfig,
    namer: DemoNamer,
    state: SessionState,
    pub(crate) active: Option<ActiveRecording>,
}

impl DemoSession {
    /// An idle session. Nothing is allocated until [`start`](Self::start).
    pub fn new(config: RecorderConfig) -> Self {
        let namer = match &config.base_name {
            Some(name) => DemoNamer::new(name),
            None => DemoNamer::default(),
        };
        Self {
            config,
            namer,
            state: SessionState::Idle,
            active: None,
        }
    }

    /// The session's configuration.
    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Mutable configuration; changes apply from the next `start`.
    pub fn config_mut(&mut self) -> &mut RecorderConfig {
        &mut self.config
    }

    /// Set the base name for the next demo written.
    pub fn set_base_name(&mut self, name: &str) {
        self.config.base_name = Some(name.to_owned());
        self.namer.set_base_name(name);
    }

    /// The namer choosing demo file names.
    pub fn namer(&self) -> &DemoNamer {
        &self.namer
    }

    /// Current lifecycle state.
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Whether a recording is in progress.
    pub fn is_recording(&self) -> bool {
        self.state == SessionState::Recording
    }

    /// Begin a new recording.
    ///
    /// Validates the configuration, allocates the buffer and writes the
    /// versioned header if one was chosen. The record width is fixed
    /// here for the whole recording. The host writes its base header
    /// next with [`write_raw`](Self::write_raw).
    pub fn start(&mut self) -> Result<(), RecordError> {
        if self.state == SessionState::Recording {
            return Err(RecordError::AlreadyRecording);
        }
        self.config.validate()?;

        let mut buffer = DemoBuffer::new(&self.config.buffer)?;
        let metadata_offset = match self.config.effective_format() {
            FormatChoice::Versioned => {
                let mut header = Vec::new();
                let meta = write_versioned_header(&mut header);
                let at = buffer.append(&header)?;
                Some(at + meta)
            }
            FormatChoice::Legacy => None,
        };
        let codec = TicCodec::new(self.config.session_flags());

        log::info!(
            "recording demo {:?} with {}-byte tics",
            self.namer.base_name(),
            codec.width()
        );
        self.active = Some(ActiveRecording {
            buffer,
            codec,
            metadata_offset,
            tics: 0,
        });
        self.state = SessionState::Recording;
        Ok(())
    }

    /// Record width, fixed at `start`.
    pub fn tic_width(&self) -> Option<usize> {
        self.active.as_ref().map(|a| a.codec.width())
    }

    /// Codec of the current recording.
    pub fn codec(&self) -> Option<TicCodec> {
        self.active.as_ref().map(|a| a.codec)
    }

    /// Tic records appended so far.
    pub fn tic_count(&self) -> u32 {
        self.active.as_ref().map_or(0, |a| a.tics)
    }

    /// The demo buffer's write offset.
    pub fn cursor(&self) -> Option<usize> {
        self.active.as_ref().map(|a| a.buffer.cursor())
    }

    /// The furthest point ever recorded.
    pub fn high_water_mark(&self) -> Option<usize> {
        self.active.as_ref().map(|a| a.buffer.high_water_mark())
    }

    /// Bytes written so far. Empty when not recording.
    pub fn bytes(&self) -> &[u8] {
        self.active
            .as_ref()
            .map(|a| a.buffer.written())
            .unwrap_or_default()
    }

    /// Append opaque bytes, such as the engine's base header.
    ///
    /// Does not count as a tic. Returns the offset written at.
    pub fn write_raw(&mut self, bytes: &[u8]) -> Result<usize, RecordError> {
        let active = self.active.as_mut().ok_or(RecordError::NotRecording)?;
        let result = active.buffer.append(bytes).map_err(RecordError::from);
        self.guard(result)
    }

    /// Append one encoded tic record and count it.
    ///
    /// `bytes` must be exactly one record wide. A legacy record whose
    /// first byte is the end marker is refused with
    /// [`RecordError::MarkerCollision`] and the recording carries on.
    pub fn append_frame(&mut self, bytes: &[u8]) -> Result<(), RecordError> {
        let active = self.active.as_mut().ok_or(RecordError::NotRecording)?;
        match active.append_frame(bytes) {
            Err(e @ RecordError::MarkerCollision { .. }) => {
                log::warn!("tic record refused: {e}");
                Err(e)
            }
            result => self.guard(result),
        }
    }

    /// The command recorded for the next tic before the last rewind.
    ///
    /// `Some` only while a whole record remains between the cursor and
    /// the high-water mark.
    pub fn pending_command(&self) -> Option<TicCmd> {
        self.active.as_ref()?.pending_command()
    }

    /// Record this tic's command.
    ///
    /// After a rewind the previously recorded command wins over `live`
    /// until the recording catches up with its old high-water mark.
    /// Returns the command as it was written, which is what playback
    /// will see.
    pub fn record_tic(&mut self, live: &TicCmd) -> Result<TicCmd, RecordError> {
        let active = self.active.as_mut().ok_or(RecordError::NotRecording)?;
        let cmd = match active.pending_command() {
            Some(recorded) => recorded,
            None => active.quantize(live),
        };
        let bytes = active.codec.encode(&cmd);
        let result = active.append_frame(&bytes);
        self.guard(result).map(|()| cmd)
    }

    /// The most recent recorded commands, oldest first.
    ///
    /// Returns at most `min(logic_tic, limit)` commands ending at the
    /// cursor, fewer if fewer tics were recorded. Raw bytes written
    /// before the first tic are never decoded as commands. Used to
    /// refill a command history display after a rewind.
    pub fn command_history(&self, logic_tic: usize, limit: usize) -> Vec<TicCmd> {
        let Some(active) = self.active.as_ref() else {
            return Vec::new();
        };
        let width = active.codec.width();
        let cursor = active.buffer.cursor();
        let recorded = usize::try_from(active.tics).unwrap_or(usize::MAX);
        let count = logic_tic.min(limit).min(recorded).min(cursor / width);
        let start = cursor - count * width;

        (0..count)
            .filter_map(|i| {
                let record = active.buffer.read(start + i * width, width).ok()?;
                active.codec.decode(record).ok()
            })
            .collect()
    }

    /// Finish the recording and persist it.
    ///
    /// Writes the end marker, fills in the versioned metadata, appends
    /// the engine footer and writes the demo to the first free name in
    /// `storage`.
    pub fn stop(
        &mut self,
        footer: &mut dyn FooterWriter,
        storage: &mut dyn DemoStorage,
    ) -> Result<FinishedDemo, RecordError> {
        let active = self.active.take().ok_or(RecordError::NotRecording)?;
        match self.finish(active, footer, storage) {
            Ok(demo) => {
                log::info!(
                    "demo recording finished: {} ({} tics, {} bytes)",
                    demo.path.display(),
                    demo.tics,
                    demo.len
                );
                self.state = SessionState::Idle;
                Ok(demo)
            }
            Err(e) => {
                self.abort(&e);
                Err(e)
            }
        }
    }

    fn finish(
        &mut self,
        mut active: ActiveRecording,
        footer: &mut dyn FooterWriter,
        storage: &mut dyn DemoStorage,
    ) -> Result<FinishedDemo, RecordError> {
        let end = active.buffer.cursor();
        active.buffer.append(&[DEMO_MARKER])?;
        if let Some(at) = active.metadata_offset {
            let end_offset =
                u32::try_from(end).map_err(|_| RecordError::DemoTooLarge { offset: end })?;
            active
                .buffer
                .patch(at, &encode_metadata(end_offset, active.tics))?;
        }

        let mut trailer = Vec::new();
        footer.write_footer(&mut trailer);
        active.buffer.append(&trailer)?;

        let path = self.namer.next_name(storage)?;
        let bytes = active.buffer.into_written();
        storage
            .write(&path, &bytes)
            .map_err(|source| RecordError::Persist {
                path: path.clone(),
                source,
            })?;
        Ok(FinishedDemo {
            path,
            len: bytes.len(),
            tics: active.tics,
        })
    }

    /// Abort on error, passing the result through.
    pub(crate) fn guard<T>(&mut self, result: Result<T, RecordError>) -> Result<T, RecordError> {
        if let Err(e) = &result {
            self.abort(e);
        }
        result
    }

    fn abort(&mut self, e: &RecordError) {
        log::error!("demo recording aborted: {e}");
        self.active = None;
        self.state = SessionState::Aborted;
    }
}
