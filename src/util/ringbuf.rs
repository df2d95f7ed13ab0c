//! Fixed-capacity FIFO ring buffer
//!
//! The lockstep engine keeps pending intents and RTT samples in bounded
//! rings. `peek` is a non-destructive read starting at a logical offset;
//! `advance` drops elements from the front without copying them out.

use thiserror::Error;

/// Ring buffer errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RingBufError {
    #[error("ring buffer overflow: {requested} items do not fit in {free} free slots")]
    Overflow { requested: usize, free: usize },

    #[error("ring buffer read out of range: offset {offset} + len {len} exceeds {used} used slots")]
    OutOfRange {
        offset: usize,
        len: usize,
        used: usize,
    },

    #[error("cannot advance {requested} items, only {used} used")]
    Advance { requested: usize, used: usize },
}

/// Fixed-capacity FIFO with non-destructive reads
#[derive(Debug, Clone)]
pub struct RingBuf<T> {
    buf: Vec<T>,
    start: usize,
    len: usize,
}

impl<T: Clone + Default> RingBuf<T> {
    /// Create a ring with room for `capacity` items
    pub fn new(capacity: usize) -> Self {
        Self {
            buf: vec![T::default(); capacity],
            start: 0,
            len: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.buf.len()
    }

    /// Number of items currently queued
    pub fn used(&self) -> usize {
        self.len
    }

    /// Number of free slots remaining
    pub fn free(&self) -> usize {
        self.buf.len() - self.len
    }

    /// Append items to the back of the ring
    pub fn push(&mut self, items: &[T]) -> Result<(), RingBufError> {
        if items.len() > self.free() {
            return Err(RingBufError::Overflow {
                requested: items.len(),
                free: self.free(),
            });
        }

        for item in items {
            let idx = (self.start + self.len) % self.buf.len();
            self.buf[idx] = item.clone();
            self.len += 1;
        }
        Ok(())
    }

    /// Copy `out.len()` items into `out`, starting `offset` items from the front.
    /// The ring is not modified.
    pub fn peek(&self, out: &mut [T], offset: usize) -> Result<(), RingBufError> {
        if offset + out.len() > self.len {
            return Err(RingBufError::OutOfRange {
                offset,
                len: out.len(),
                used: self.len,
            });
        }

        for (i, slot) in out.iter_mut().enumerate() {
            let idx = (self.start + offset + i) % self.buf.len();
            *slot = self.buf[idx].clone();
        }
        Ok(())
    }

    /// Drop `n` items from the front
    pub fn advance(&mut self, n: usize) -> Result<(), RingBufError> {
        if n > self.len {
            return Err(RingBufError::Advance {
                requested: n,
                used: self.len,
            });
        }

        self.start = (self.start + n) % self.buf.len();
        self.len -= n;
        Ok(())
    }
}
