//! Process-wide ingestion counters.
//!
//! Plain relaxed atomics; cheap enough to bump from the hot parse path. A
//! [`Snapshot`] is logged at shutdown and by the `status` command.

use std::sync::atomic::{AtomicU64, Ordering};

static FRAMES_PARSED: AtomicU64 = AtomicU64::new(0);
static FRAMES_REJECTED: AtomicU64 = AtomicU64::new(0);
static RESYNC_DROPPED: AtomicU64 = AtomicU64::new(0);
static BUFFER_OVERFLOWS: AtomicU64 = AtomicU64::new(0);
static RECORDS_STORED: AtomicU64 = AtomicU64::new(0);

pub fn inc_frames_parsed() {
    FRAMES_PARSED.fetch_add(1, Ordering::Relaxed);
}
pub fn inc_frames_rejected() {
    FRAMES_REJECTED.fetch_add(1, Ordering::Relaxed);
}
/// One noise byte dropped while hunting for a start marker.
pub fn inc_resync_dropped() {
    RESYNC_DROPPED.fetch_add(1, Ordering::Relaxed);
}
pub fn inc_buffer_overflows() {
    BUFFER_OVERFLOWS.fetch_add(1, Ordering::Relaxed);
}
pub fn inc_records_stored() {
    RECORDS_STORED.fetch_add(1, Ordering::Relaxed);
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    pub frames_parsed: u64,
    pub frames_rejected: u64,
    pub resync_dropped: u64,
    pub buffer_overflows: u64,
    pub records_stored: u64,
}

pub fn snapshot() -> Snapshot {
    Snapshot {
        frames_parsed: FRAMES_PARSED.load(Ordering::Relaxed),
        frames_rejected: FRAMES_REJECTED.load(Ordering::Relaxed),
        resync_dropped: RESYNC_DROPPED.load(Ordering::Relaxed),
        buffer_overflows: BUFFER_OVERFLOWS.load(Ordering::Relaxed),
        records_stored: RECORDS_STORED.load(Ordering::Relaxed),
    }
}
