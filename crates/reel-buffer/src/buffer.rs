//! The demo write buffer: owned bytes, an explicit cursor, and a
//! high-water mark.

use crate::config::BufferConfig;
use crate::error::BufferError;

/// A growable byte region with a backward-only seekable cursor.
///
/// The backing `Vec` is always zero-filled to its full capacity, so the
/// bytes between the cursor and the high-water mark survive a backward
/// seek untouched. Growth doubles the capacity until the pending write
/// fits, which keeps sustained appends amortized O(1).
///
/// # Examples
///
/// ```
/// use reel_buffer::DemoBuffer;
///
/// let mut buf = DemoBuffer::with_capacity(4).unwrap();
/// buf.append(&[1, 2, 3, 4, 5, 6]).unwrap();
/// assert_eq!(buf.capacity(), 8);
///
/// // Rewind: the skipped bytes remain readable as recorded future.
/// buf.set_cursor(2).unwrap();
/// assert_eq!(buf.written(), &[1, 2]);
/// assert_eq!(buf.recorded_future(), &[3, 4, 5, 6]);
///
/// // Seeking forward is rejected.
/// assert!(buf.set_cursor(3).is_err());
/// ```
#[derive(Debug)]
pub struct DemoBuffer {
    /// Backing storage. `data.len()` is the capacity.
    data: Vec<u8>,
    /// Next write position.
    cursor: usize,
    /// Largest cursor seen at any backward seek.
    largest_real_offset: usize,
}

impl DemoBuffer {
    /// Allocate a buffer at the configured initial capacity.
    pub fn new(config: &BufferConfig) -> Result<Self, BufferError> {
        config.validate()?;
        Self::with_capacity(config.initial_capacity)
    }

    /// Allocate a buffer with an explicit initial capacity in bytes.
    pub fn with_capacity(capacity: usize) -> Result<Self, BufferError> {
        if capacity == 0 {
            return Err(BufferError::ZeroCapacity);
        }
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|_| BufferError::OutOfMemory {
                requested: capacity,
            })?;
        data.resize(capacity, 0);
        Ok(Self {
            data,
            cursor: 0,
            largest_real_offset: 0,
        })
    }

    /// Current write offset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Allocated size in bytes.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Furthest cursor position ever reached in this buffer.
    ///
    /// Never decreases across appends and backward seeks.
    pub fn high_water_mark(&self) -> usize {
        self.largest_real_offset.max(self.cursor)
    }

    /// Bytes written so far: `[0, cursor)`.
    pub fn written(&self) -> &[u8] {
        &self.data[..self.cursor]
    }

    /// Bytes recorded before the last rewind that lie ahead of the
    /// cursor: `[cursor, high-water mark)`.
    ///
    /// Empty once the cursor has caught up with the high-water mark.
    pub fn recorded_future(&self) -> &[u8] {
        if self.largest_real_offset <= self.cursor {
            return &[];
        }
        &self.data[self.cursor..self.largest_real_offset]
    }

    /// Guarantee that `n` more bytes are writable at the cursor.
    ///
    /// Doubles the capacity until `cursor + n` fits. All existing bytes,
    /// including those past the cursor, are preserved.
    pub fn ensure_space(&mut self, n: usize) -> Result<(), BufferError> {
        let needed = self
            .cursor
            .checked_add(n)
            .ok_or(BufferError::OutOfMemory {
                requested: usize::MAX,
            })?;
        let capacity = self.data.len();
        if needed <= capacity {
            return Ok(());
        }

        let mut new_capacity = capacity.max(1);
        while needed > new_capacity {
            new_capacity = new_capacity
                .checked_mul(2)
                .ok_or(BufferError::OutOfMemory {
                    requested: usize::MAX,
                })?;
        }

        self.data
            .try_reserve_exact(new_capacity - capacity)
            .map_err(|_| BufferError::OutOfMemory {
                requested: new_capacity,
            })?;
        self.data.resize(new_capacity, 0);

        log::info!("expanding demo buffer to {new_capacity} bytes");
        Ok(())
    }

    /// Write `bytes` at the cursor and advance past them.
    ///
    /// Returns the offset the bytes were written at.
    pub fn append(&mut self, bytes: &[u8]) -> Result<usize, BufferError> {
        self.ensure_space(bytes.len())?;
        let start = self.cursor;
        let end = start + bytes.len();
        self.data[start..end].copy_from_slice(bytes);
        self.cursor = end;
        Ok(start)
    }

    /// Move the cursor back to `offset`.
    ///
    /// Fails with [`BufferError::TimeTravel`] if `offset` lies beyond the
    /// current cursor. The high-water mark is raised to the old cursor
    /// before moving, so the skipped bytes stay addressable.
    pub fn set_cursor(&mut self, offset: usize) -> Result<(), BufferError> {
        let current = self.cursor;
        if offset > current {
            return Err(BufferError::TimeTravel {
                requested: offset,
                current,
            });
        }
        if current > self.largest_real_offset {
            self.largest_real_offset = current;
        }
        self.cursor = offset;
        Ok(())
    }

    /// Read `len` bytes starting at `offset`.
    ///
    /// The readable region ends at the high-water mark: anything past it
    /// was never written in this recording.
    pub fn read(&self, offset: usize, len: usize) -> Result<&[u8], BufferError> {
        let limit = self.high_water_mark();
        let end = checked_end(offset, len, limit)?;
        Ok(&self.data[offset..end])
    }

    /// Overwrite already-written bytes in place.
    ///
    /// Used to fill header placeholders once their values are known. The
    /// range must lie entirely below the cursor.
    pub fn patch(&mut self, offset: usize, bytes: &[u8]) -> Result<(), BufferError> {
        let end = checked_end(offset, bytes.len(), self.cursor)?;
        self.data[offset..end].copy_from_slice(bytes);
        Ok(())
    }

    /// Consume the buffer, keeping only `[0, cursor)`.
    pub fn into_written(mut self) -> Vec<u8> {
        self.data.truncate(self.cursor);
        self.data
    }
}

fn checked_end(offset: usize, len: usize, limit: usize) -> Result<usize, BufferError> {
    match offset.checked_add(len) {
        Some(end) if end <= limit => Ok(end),
        _ => Err(BufferError::OutOfBounds { offset, len, limit }),
    }
}
