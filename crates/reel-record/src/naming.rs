//! Demo file naming.
//!
//! A recording is saved as `{base}.lmp`. If that name is taken, the
//! namer tries `{base}-00002.lmp`, `{base}-00003.lmp`, and so on. The
//! suffix counter lives in the [`DemoNamer`] and only moves forward, so
//! later recordings in the same process continue where the last one
//! stopped.

use std::path::PathBuf;

use reel_core::DemoStorage;

use crate::error::RecordError;

/// File extension of demo files.
pub const DEMO_EXTENSION: &str = "lmp";

/// Base name used when none was set.
pub const DEFAULT_BASE_NAME: &str = "null";

/// First numeric suffix tried after the plain name.
pub const FIRST_SUFFIX: u32 = 2;

/// Last numeric suffix; five digits.
pub const LAST_SUFFIX: u32 = 99_999;

/// Strip a trailing extension from the last path component.
///
/// Only a `.` after the last `/` or `\` counts, and never one at the
/// first character of `name`.
///
/// ```
/// use reel_record::naming::strip_extension;
///
/// assert_eq!(strip_extension("runs/e1m1.lmp"), "runs/e1m1");
/// assert_eq!(strip_extension("my.runs/e1m1"), "my.runs/e1m1");
/// assert_eq!(strip_extension(".lmp"), ".lmp");
/// ```
pub fn strip_extension(name: &str) -> &str {
    let bytes = name.as_bytes();
    let mut i = bytes.len();
    while i > 1 {
        i -= 1;
        match bytes[i] {
            b'/' | b'\\' => break,
            b'.' => return &name[..i],
            _ => {}
        }
    }
    name
}

/// Picks the next unused demo file name.
#[derive(Clone, Debug)]
pub struct DemoNamer {
    base: String,
    next_suffix: u32,
}

impl Default for DemoNamer {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_NAME)
    }
}

impl DemoNamer {
    /// A namer for `base`, with any extension stripped.
    pub fn new(base: &str) -> Self {
        Self {
            base: strip_extension(base).to_owned(),
            next_suffix: FIRST_SUFFIX,
        }
    }

    /// Replace the base name. The suffix counter is kept.
    pub fn set_base_name(&mut self, base: &str) {
        self.base = strip_extension(base).to_owned();
    }

    /// The current base name.
    pub fn base_name(&self) -> &str {
        &self.base
    }

    /// The suffix the next collision will try.
    pub fn next_suffix(&self) -> u32 {
        self.next_suffix
    }

    /// The first name not already present in `storage`.
    ///
    /// Fails with [`RecordError::NamesExhausted`] once every suffix up to
    /// [`LAST_SUFFIX`] has been tried, rather than overwriting a file.
    pub fn next_name(&mut self, storage: &dyn DemoStorage) -> Result<PathBuf, RecordError> {
        let mut candidate = PathBuf::from(format!("{}.{DEMO_EXTENSION}", self.base));
        while storage.exists(&candidate) {
            if self.next_suffix > LAST_SUFFIX {
                return Err(RecordError::NamesExhausted {
                    base: self.base.clone(),
                });
            }
            candidate = PathBuf::from(format!(
                "{}-{:05}.{DEMO_EXTENSION}",
                self.base, self.next_suffix
            ));
            self.next_suffix += 1;
        }
        Ok(candidate)
    }
}
