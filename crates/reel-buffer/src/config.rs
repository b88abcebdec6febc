//! Buffer configuration parameters.

use crate::error::BufferError;

/// Configuration for a [`DemoBuffer`](crate::DemoBuffer).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BufferConfig {
    /// Capacity allocated when recording starts, in bytes.
    ///
    /// Default: 0x20000 (128 KiB), enough for roughly half an hour of
    /// single-player tics before the first doubling. Must be non-zero.
    pub initial_capacity: usize,
}

impl BufferConfig {
    /// Default initial capacity in bytes.
    pub const DEFAULT_INITIAL_CAPACITY: usize = 0x20000;

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), BufferError> {
        if self.initial_capacity == 0 {
            return Err(BufferError::ZeroCapacity);
        }
        Ok(())
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_INITIAL_CAPACITY,
        }
    }
}
