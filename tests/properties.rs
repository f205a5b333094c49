//! Property-based tests for record parsing and feature extraction
//!
//! These tests verify invariants that should hold for all inputs:
//! - Header lines survive a parse and re-serialization unchanged
//! - Word counts are sums of whitespace token counts per edit kind
//! - Only valid dotted quads are treated as anonymous users

use proptest::prelude::*;
use std::path::Path;
use vandalcheck::core::{ChangeRecord, Comment, Edit, EditKind, Label};
use vandalcheck::features::is_registered_user;
use vandalcheck::LogParser;

/// Header field without the delimiter or line breaks
fn field() -> impl Strategy<Value = String> {
    "[A-Za-z0-9:.?_-][A-Za-z0-9 :.?_-]{0,15}"
}

fn edit() -> impl Strategy<Value = Edit> {
    (any::<bool>(), "[a-z ]{0,30}").prop_map(|(insert, text)| {
        let kind = if insert {
            EditKind::Insertion
        } else {
            EditKind::Deletion
        };
        Edit::new(kind, text)
    })
}

fn octet() -> impl Strategy<Value = u32> {
    0u32..=255
}

proptest! {
    #[test]
    fn prop_header_line_round_trips(
        id in any::<i64>(),
        label in field(),
        user in field(),
        timestamp in field(),
        comment in field(),
        title in field(),
    ) {
        let line = [id.to_string(), label, user, timestamp, comment, title].join("\t");
        let records = LogParser::default()
            .parse_str(&line, Path::new("prop.log"))
            .unwrap();
        prop_assert_eq!(records.len(), 1);
        prop_assert_eq!(records[0].header_line("\t"), line);
    }

    #[test]
    fn prop_word_counts_sum_whitespace_tokens(edits in prop::collection::vec(edit(), 0..8)) {
        let expected = |kind: EditKind| -> usize {
            edits
                .iter()
                .filter(|e| e.kind() == kind)
                .map(|e| e.text().split_whitespace().count())
                .sum()
        };
        let inserted = expected(EditKind::Insertion);
        let deleted = expected(EditKind::Deletion);

        let record = ChangeRecord::new(
            1,
            Label::Unknown,
            "user",
            "t",
            Comment::Null,
            "title",
            edits,
        );
        prop_assert_eq!(record.insert_word_count(), inserted);
        prop_assert_eq!(record.delete_word_count(), deleted);
    }

    #[test]
    fn prop_valid_dotted_quads_are_anonymous(a in octet(), b in octet(), c in octet(), d in octet()) {
        let address = format!("{a}.{b}.{c}.{d}");
        prop_assert!(!is_registered_user(&address));
    }

    #[test]
    fn prop_out_of_range_octet_is_registered(a in 256u32..1000, b in octet(), c in octet(), d in octet()) {
        let address = format!("{b}.{a}.{c}.{d}");
        prop_assert!(is_registered_user(&address));
    }

    #[test]
    fn prop_names_without_dots_are_registered(name in "[A-Za-z][A-Za-z0-9_]{0,20}") {
        prop_assert!(is_registered_user(&name));
    }
}

#[test]
fn test_registered_user_examples() {
    for name in ["999.1.1.1", "abc.def", "en.wikipedia.org", "WikiGnome", "1.2.3", "1.2.3.4.5"] {
        assert!(is_registered_user(name), "{name} should count as registered");
    }
    for address in ["0.0.0.0", "255.255.255.255", "10.0.0.1", "192.168.001.010"] {
        assert!(!is_registered_user(address), "{address} should count as anonymous");
    }
}

#[test]
fn test_record_without_edits_counts_zero() {
    let record = ChangeRecord::new(
        7,
        Label::Known("regular".into()),
        "Alice",
        "t",
        Comment::Text("hi".into()),
        "Page",
        vec![],
    );
    assert_eq!(record.insert_word_count(), 0);
    assert_eq!(record.delete_word_count(), 0);
}
