//! Shared utilities

pub mod ringbuf;
pub mod time;

pub use ringbuf::{RingBuf, RingBufError};
