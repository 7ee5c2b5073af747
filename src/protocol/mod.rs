//! # Frame Protocol Module
//!
//! The wire protocol core: a byte-at-a-time state machine that accumulates
//! the controller's textual telemetry frames, tokenizes them, and dispatches
//! them against a static command table to produce typed [`Record`]s.
//!
//! ## Wire format
//!
//! Frames are human-readable and whitespace delimited, one frame at a time:
//!
//! ```text
//! STA <COMMAND> [<SUBCOMMAND>] <field>... END
//! ```
//!
//! Anything preceding a frame (boot banners, line noise, partial frames from
//! a mid-stream attach) is dropped byte by byte until a frame candidate
//! starts. There is no binary framing, no checksum, and no pipelining; a
//! malformed or truncated frame is discarded and the controller is expected
//! to resend.
//!
//! ## Pipeline
//!
//! ```text
//! byte → accumulator → framer → tokenizer → dispatch → Record
//! ```
//!
//! Per buffer the state machine is `EMPTY → ARMED → {FRAME_COMPLETE →
//! DISPATCHED} → EMPTY`; every terminal outcome (frame emitted, frame
//! rejected, overflow) returns to `EMPTY`.
//!
//! ## Usage
//!
//! ```rust
//! use growlink::protocol::FrameParser;
//!
//! let mut parser = FrameParser::new();
//! let mut records = Vec::new();
//! for &b in b"STA PHW 6.8 END ".iter() {
//!     if let Some(record) = parser.feed_byte(b) {
//!         records.push(record);
//!     }
//! }
//! assert_eq!(records.len(), 1);
//! ```
//!
//! The parser performs no I/O and never blocks. It is single-owner state:
//! parse several physical links by giving each its own [`FrameParser`].

mod accumulator;
mod framer;
mod tokenizer;

pub mod dispatch;
pub mod record;

pub use dispatch::{CommandSpec, Reject, COMMAND_TABLE};
pub use record::{PhMeasurement, PrimaryMeasurement, Record};

use accumulator::{Accumulator, Ingest};
use log::{debug, trace};

use crate::logutil::escape_log;
use crate::metrics;

/// Pending-byte buffer capacity. A frame that grows past this without
/// completing is discarded wholesale.
pub const RX_BUFFER_CAPACITY: usize = 64;
/// Maximum tokens considered per frame; the rest are dropped.
pub const MAX_TOKENS: usize = 16;
/// Maximum characters kept per token.
pub const MAX_TOKEN_LEN: usize = 32;

/// Byte that arms an empty buffer.
pub const START_BYTE: u8 = b'S';
/// Frame start marker token.
pub const START_TOKEN: &str = "STA";
/// Frame end marker token.
pub const END_TOKEN: &str = "END";

/// The assembled pipeline for one serial link.
///
/// `feed_byte` consumes exactly one byte and emits at most one [`Record`].
/// All four failure modes (leading noise, buffer overflow, unknown command,
/// truncated or malformed frame) recover locally by clearing the buffer;
/// none of them is an error to the caller.
#[derive(Debug, Default)]
pub struct FrameParser {
    acc: Accumulator,
}

impl FrameParser {
    pub fn new() -> Self {
        Self {
            acc: Accumulator::new(),
        }
    }

    /// Ingest one byte; returns a record when this byte completed a
    /// well-formed frame.
    pub fn feed_byte(&mut self, byte: u8) -> Option<Record> {
        match self.acc.ingest(byte) {
            Ingest::Pending => None,
            Ingest::Noise => {
                metrics::inc_resync_dropped();
                None
            }
            Ingest::Overflow => {
                metrics::inc_buffer_overflows();
                debug!(
                    "rx buffer overflowed at {} bytes without a frame; discarded",
                    RX_BUFFER_CAPACITY
                );
                None
            }
            Ingest::Frame(text) => {
                trace!("frame candidate: {}", escape_log(&text));
                let tokens = tokenizer::tokenize(&text);
                match dispatch::dispatch(&tokens) {
                    Ok(record) => {
                        metrics::inc_frames_parsed();
                        debug!("parsed {} frame", record.kind());
                        Some(record)
                    }
                    Err(reject) => {
                        metrics::inc_frames_rejected();
                        debug!("rejected frame ({}): {}", reject, escape_log(&text));
                        None
                    }
                }
            }
        }
    }

    /// Convenience for chunked serial reads: feed a slice, collect whatever
    /// records it completed.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Vec<Record> {
        bytes.iter().filter_map(|&b| self.feed_byte(b)).collect()
    }
}
