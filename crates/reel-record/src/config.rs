//! Recorder configuration and validation.
//!
//! [`RecorderConfig`] is the complete set of inputs a recording needs
//! before the first byte is written. [`RecorderConfig::validate()`]
//! checks the policy rules up front so that `start` never leaves a
//! half-initialized session behind.

use reel_buffer::BufferConfig;
use reel_core::{CompatLevel, ModeFlags};

use crate::error::RecordError;

// ── FormatChoice ───────────────────────────────────────────────────

/// Which extension header a new recording carries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FormatChoice {
    /// No extension header; the demo starts with the base header.
    #[default]
    Legacy,
    /// The versioned header with end-marker and tic-count metadata.
    Versioned,
}

// ── RecorderConfig ─────────────────────────────────────────────────

/// Complete configuration for a recording session.
#[derive(Clone, Debug, Default)]
pub struct RecorderConfig {
    /// Base name for demo files. `None` records under `"null"`.
    pub base_name: Option<String>,
    /// Compatibility level of the game being recorded. Required.
    pub compatibility_level: Option<CompatLevel>,
    /// Mode flags negotiated by the engine for this recording.
    pub flags: ModeFlags,
    /// Extension header to write.
    pub format: FormatChoice,
    /// Whether the map uses the experimental map format.
    pub experimental_map_format: bool,
    /// Explicit opt-in for recording on the experimental map format.
    pub allow_experimental: bool,
    /// Demo buffer sizing.
    pub buffer: BufferConfig,
}

impl RecorderConfig {
    /// Validate every structural and policy rule.
    ///
    /// Checks, in order:
    /// 1. the buffer configuration,
    /// 2. that a compatibility level is set,
    /// 3. that the experimental map format is opted into and recorded at
    ///    [`CompatLevel::MBF21`].
    pub fn validate(&self) -> Result<(), RecordError> {
        self.buffer.validate()?;
        if let Some(name) = &self.base_name {
            if name.is_empty() {
                return Err(RecordError::InvalidConfig {
                    reason: "base name must not be empty".into(),
                });
            }
        }
        let level = self
            .compatibility_level
            .ok_or(RecordError::CompatibilityLevelUnspecified)?;
        if self.experimental_map_format {
            if !self.allow_experimental {
                return Err(RecordError::ExperimentalFormatRequiresOptIn);
            }
            if level != CompatLevel::MBF21 {
                return Err(RecordError::ExperimentalFormatRequiresMbf21 { level });
            }
        }
        Ok(())
    }

    /// The header format actually written.
    ///
    /// The experimental map format always records the versioned header.
    pub fn effective_format(&self) -> FormatChoice {
        if self.experimental_map_format {
            FormatChoice::Versioned
        } else {
            self.format
        }
    }

    /// Mode flags the session records with.
    ///
    /// The versioned header implies the extended command set, so it is
    /// switched on here to keep recording and playback widths equal.
    pub fn session_flags(&self) -> ModeFlags {
        let mut flags = self.flags;
        if self.effective_format() == FormatChoice::Versioned {
            flags.extended_commands = true;
        }
        flags
    }
}
