//! Parse a realistic byte stream and persist everything it yields, the same
//! handoff the daemon's ingest loop performs.

use growlink::protocol::FrameParser;
use growlink::storage::{Storage, StoredRecord};

#[tokio::test]
async fn parsed_stream_persists_and_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let mut storage = Storage::new(dir.path().to_str().unwrap()).await.unwrap();

    let mut parser = FrameParser::new();
    let stream: &[u8] = b"\r\nSTA PRIMARYMEAS 55 120 21 22 20 60 END \
STA PHW 6.8 END STA PHS 7.1 END STA SL 06:00 22:00 450 END \
STA FOO 1 END STA R END ";

    let records = parser.feed_bytes(stream);
    assert_eq!(records.len(), 5); // FOO frame rejected

    for record in records {
        storage.store_record(record).await.unwrap();
    }

    let stats = storage.stats().await.unwrap();
    assert_eq!(stats.measurements, 1);
    assert_eq!(stats.ph, 2);
    assert_eq!(stats.control, 2);

    // Stored lines are valid, timestamped JSON
    let ph_lines = std::fs::read_to_string(dir.path().join("ph.jsonl")).unwrap();
    let parsed: Vec<StoredRecord> = ph_lines
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].record.kind(), "ph");
}
