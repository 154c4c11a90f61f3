//! Bounded in-memory byte stream feeding the sender
//!
//! The writer side pushes bytes and eventually closes (or errors) the
//! stream; the reader side peeks and pops. [`Reader`] and [`Writer`]
//! describe exactly what the sender needs from a stream.

use std::collections::VecDeque;

/// Consuming side of a stream
pub trait Reader {
    fn bytes_buffered(&self) -> u64;
    /// Contiguous view of buffered bytes. May be shorter than `bytes_buffered`.
    fn peek(&self) -> &[u8];
    fn pop(&mut self, len: u64);
    /// Closed and fully drained
    fn is_finished(&self) -> bool;
}

/// Producing side of a stream, as seen by the sender
pub trait Writer {
    fn is_closed(&self) -> bool;
    fn has_error(&self) -> bool;
    fn set_error(&mut self);
}

#[derive(Debug, Clone)]
pub struct ByteStream {
    capacity: usize,
    buffer: VecDeque<u8>,
    closed: bool,
    error: bool,
    bytes_pushed: u64,
    bytes_popped: u64,
}

impl ByteStream {
    pub fn new(capacity: usize) -> Self {
        ByteStream {
            capacity,
            buffer: VecDeque::with_capacity(capacity),
            closed: false,
            error: false,
            bytes_pushed: 0,
            bytes_popped: 0,
        }
    }

    /// Append as much of `data` as fits; returns the number of bytes accepted
    pub fn push(&mut self, data: &[u8]) -> usize {
        if self.closed || self.error {
            return 0;
        }
        let len = data.len().min(self.available_capacity());
        self.buffer.extend(&data[..len]);
        self.bytes_pushed += len as u64;
        len
    }

    pub fn close(&mut self) {
        self.closed = true;
    }

    pub fn available_capacity(&self) -> usize {
        self.capacity - self.buffer.len()
    }

    pub fn bytes_pushed(&self) -> u64 {
        self.bytes_pushed
    }

    pub fn bytes_popped(&self) -> u64 {
        self.bytes_popped
    }
}

impl Reader for ByteStream {
    fn bytes_buffered(&self) -> u64 {
        self.buffer.len() as u64
    }

    fn peek(&self) -> &[u8] {
        self.buffer.as_slices().0
    }

    fn pop(&mut self, len: u64) {
        let len = (len as usize).min(self.buffer.len());
        self.buffer.drain(..len);
        self.bytes_popped += len as u64;
    }

    fn is_finished(&self) -> bool {
        self.closed && self.buffer.is_empty()
    }
}

impl Writer for ByteStream {
    fn is_closed(&self) -> bool {
        self.closed
    }

    fn has_error(&self) -> bool {
        self.error
    }

    fn set_error(&mut self) {
        self.error = true;
    }
}
