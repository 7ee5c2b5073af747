//! Every command table row, driven through the full byte pipeline.

use growlink::protocol::{FrameParser, Record};

fn parse_one(frame: &str) -> Option<Record> {
    let mut parser = FrameParser::new();
    let mut records = parser.feed_bytes(frame.as_bytes());
    assert!(records.len() <= 1, "expected at most one record per frame");
    records.pop()
}

#[test]
fn settings_frames_round_trip_the_table() {
    assert_eq!(
        parse_one("STA SL 06:00 22:00 450 END "),
        Some(Record::Sl("06:00".into(), "22:00".into(), "450".into()))
    );
    assert_eq!(
        parse_one("STA ST 24 18 END "),
        Some(Record::St("24".into(), "18".into()))
    );
    assert_eq!(
        parse_one("STA SF 30 55 END "),
        Some(Record::Sf("30".into(), "55".into()))
    );
    assert_eq!(parse_one("STA CP 7.0 END "), Some(Record::Cp("7.0".into())));
    assert_eq!(
        parse_one("STA SI 08:00 120 40 END "),
        Some(Record::Si("08:00".into(), "120".into(), "40".into()))
    );
}

#[test]
fn notification_frames_have_no_fields() {
    assert_eq!(parse_one("STA R END "), Some(Record::Reset));
    assert_eq!(parse_one("STA DEF SETT END "), Some(Record::DefaultSettings));
}

#[test]
fn truncated_settings_frames_are_rejected() {
    assert_eq!(parse_one("STA SL 06:00 22:00 END "), None);
    assert_eq!(parse_one("STA SI END "), None);
    assert_eq!(parse_one("STA DEF END "), None);
}

#[test]
fn verbs_are_case_sensitive_exact_matches() {
    assert_eq!(parse_one("STA phw 6.8 END "), None);
    assert_eq!(parse_one("STA PHWX 6.8 END "), None);
}
