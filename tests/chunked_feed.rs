//! Chunked delivery: serial reads split frames at arbitrary byte boundaries,
//! and the parser must not care where the splits land.

use growlink::protocol::{FrameParser, Record};

const STREAM: &[u8] =
    b"boot noise\r\nSTA PRIMARYMEAS 55 120 21 22 20 60 END STA PHW 6.8 END STA R END ";

fn expected() -> Vec<&'static str> {
    vec!["primarymeas", "ph", "reset"]
}

#[test]
fn whole_stream_in_one_chunk() {
    let mut parser = FrameParser::new();
    let kinds: Vec<_> = parser
        .feed_bytes(STREAM)
        .iter()
        .map(|r| r.kind())
        .collect();
    assert_eq!(kinds, expected());
}

#[test]
fn one_byte_at_a_time_matches_chunked_delivery() {
    let mut parser = FrameParser::new();
    let mut records = Vec::new();
    for &b in STREAM {
        if let Some(r) = parser.feed_byte(b) {
            records.push(r);
        }
    }
    let kinds: Vec<_> = records.iter().map(|r| r.kind()).collect();
    assert_eq!(kinds, expected());
}

#[test]
fn every_chunk_size_yields_the_same_records() {
    for chunk_len in 1..=13 {
        let mut parser = FrameParser::new();
        let mut records = Vec::new();
        for chunk in STREAM.chunks(chunk_len) {
            records.extend(parser.feed_bytes(chunk));
        }
        let kinds: Vec<_> = records.iter().map(|r| r.kind()).collect();
        assert_eq!(kinds, expected(), "chunk_len={}", chunk_len);
    }
}

#[test]
fn parser_instances_are_independent() {
    // Two links, two parsers: interleaved feeding must not cross-talk.
    let mut a = FrameParser::new();
    let mut b = FrameParser::new();
    let frame_a = b"STA PHW 6.8 END ";
    let frame_b = b"STA PHS 7.2 END ";
    let mut out_a = Vec::new();
    let mut out_b = Vec::new();
    for i in 0..frame_a.len().max(frame_b.len()) {
        if let Some(&byte) = frame_a.get(i) {
            out_a.extend(a.feed_byte(byte));
        }
        if let Some(&byte) = frame_b.get(i) {
            out_b.extend(b.feed_byte(byte));
        }
    }
    assert_eq!(out_a.len(), 1);
    assert_eq!(out_b.len(), 1);
    assert!(matches!(out_a[0], Record::PhMeasurement(_)));
    assert!(matches!(out_b[0], Record::PhMeasurement(_)));
    assert_ne!(out_a[0], out_b[0]);
}
