//! Strongly-typed identifiers.

use std::fmt;

/// Engine compatibility level pinned for a recording.
///
/// The level selects which historical engine behaviour the simulation
/// emulates. A demo recorded without one is ambiguous to replay, so the
/// recorder refuses to start until the host has set it explicitly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompatLevel(pub u8);

impl CompatLevel {
    /// MBF21, the level required by experimental map formats.
    pub const MBF21: CompatLevel = CompatLevel(21);
}

impl fmt::Display for CompatLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u8> for CompatLevel {
    fn from(v: u8) -> Self {
        Self(v)
    }
}
