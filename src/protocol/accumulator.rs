//! Bounded byte accumulation with resync and overflow policy.

use super::{framer, RX_BUFFER_CAPACITY, START_BYTE};

/// Outcome of ingesting a single byte.
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Ingest {
    /// Byte stored; frame still streaming in.
    Pending,
    /// Byte dropped while waiting for a start marker at position 0.
    Noise,
    /// Buffer filled without completing a frame; contents discarded.
    Overflow,
    /// A complete frame was extracted; the buffer has been cleared.
    Frame(String),
}

/// Owns the pending-byte buffer for one serial link.
///
/// The buffer is armed the moment its first stored byte is `'S'`; until then
/// every byte is discarded individually, which resynchronizes the stream past
/// leading line noise. Each terminal transition (extracted frame or overflow)
/// clears the buffer, so a frame never spans two buffers and leftover bytes
/// are never retried.
#[derive(Debug, Default)]
pub(crate) struct Accumulator {
    buf: Vec<u8>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self {
            buf: Vec::with_capacity(RX_BUFFER_CAPACITY),
        }
    }

    /// Ingest one byte and report the buffer transition.
    pub fn ingest(&mut self, byte: u8) -> Ingest {
        if self.buf.is_empty() && byte != START_BYTE {
            return Ingest::Noise;
        }
        self.buf.push(byte);

        if let Some(text) = framer::try_extract(&self.buf) {
            self.buf.clear();
            return Ingest::Frame(text);
        }

        if self.buf.len() >= RX_BUFFER_CAPACITY {
            self.buf.clear();
            return Ingest::Overflow;
        }

        Ingest::Pending
    }

    /// Number of pending bytes, in `[0, RX_BUFFER_CAPACITY)` between calls.
    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.buf.len()
    }
}
