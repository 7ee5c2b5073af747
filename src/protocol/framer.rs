//! Frame boundary detection over the accumulator's raw buffer.
//!
//! A frame is complete once the buffer contains the `STA` marker and, after
//! it, the `END` marker. The scan runs over the whole current buffer on every
//! appended byte rather than incrementally; with a 64-byte buffer the rescan
//! is cheap and matches the controller's one-frame-at-a-time wire protocol.
//! The markers are matched as plain substrings, so they are found even when
//! not whitespace-bounded; the dispatcher's token checks catch those frames.

use super::{END_TOKEN, START_TOKEN};

/// Attempt to extract a complete frame from the buffer.
///
/// Returns the buffer content up to and including the end marker, decoded
/// lossily (line noise may not be valid UTF-8). `None` means the frame is
/// still streaming in.
pub(crate) fn try_extract(buf: &[u8]) -> Option<String> {
    let sta = find(buf, START_TOKEN.as_bytes())?;
    let after_sta = sta + START_TOKEN.len();
    let end = after_sta + find(&buf[after_sta..], END_TOKEN.as_bytes())?;
    let frame_end = end + END_TOKEN.len();
    Some(String::from_utf8_lossy(&buf[..frame_end]).into_owned())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incomplete_frames_are_pending() {
        assert_eq!(try_extract(b""), None);
        assert_eq!(try_extract(b"STA"), None);
        assert_eq!(try_extract(b"STA PHW 6.8"), None);
        assert_eq!(try_extract(b"S PHW 6.8 END"), None);
    }

    #[test]
    fn complete_frame_is_returned_through_end_marker() {
        let text = try_extract(b"STA PHW 6.8 END").unwrap();
        assert_eq!(text, "STA PHW 6.8 END");
    }

    #[test]
    fn leading_bytes_before_start_are_included() {
        // The accumulator only guarantees the first byte is 'S'; anything the
        // arming byte dragged in stays in the frame text for the dispatcher
        // to reject by token inspection.
        let text = try_extract(b"SxSTA R END").unwrap();
        assert_eq!(text, "SxSTA R END");
    }

    #[test]
    fn bytes_after_end_marker_are_dropped() {
        let text = try_extract(b"STA R END ST").unwrap();
        assert_eq!(text, "STA R END");
    }

    #[test]
    fn end_marker_before_start_does_not_complete() {
        assert_eq!(try_extract(b"SEND STA R"), None);
    }

    #[test]
    fn markers_match_as_substrings() {
        // Unintended but preserved wire behavior: END embedded in a field
        // value terminates the scan early.
        let text = try_extract(b"STA PHW ENDX").unwrap();
        assert_eq!(text, "STA PHW END");
    }
}
