use indoc::indoc;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use vandalcheck::core::{Comment, EditKind, Label};
use vandalcheck::{Error, LogParser};

const LOG: &str = indoc! {"
    101\tvandalism\t127.0.0.1\t2008-03-01T12:00:00Z\tnull\tMain Page
    I\tbuy cheap pills
    D\tThe Main Page

    102\tregular\tWikiGnome\t2008-03-01T12:05:00Z\tReverted edits by 127.0.0.1\tMain Page
    I\tThe Main Page
    D\tbuy cheap pills

    103\t?\tNewbie\t2008-03-02T08:00:00Z\ttypo\tHelp:Contents
"};

#[test]
fn test_parse_file_from_disk() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("train.log");
    fs::write(&path, LOG).unwrap();

    let records = LogParser::default().parse(&path).unwrap();

    assert_eq!(records.len(), 3);
    let ids: Vec<i64> = records.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec![101, 102, 103]);

    let first = &records[0];
    assert_eq!(first.label(), &Label::Known("vandalism".into()));
    assert_eq!(first.comment(), &Comment::Null);
    assert_eq!(first.edits().len(), 2);
    assert_eq!(first.edits()[0].kind(), EditKind::Insertion);
    assert_eq!(first.insert_word_count(), 3);
    assert_eq!(first.delete_word_count(), 3);

    assert_eq!(records[2].label(), &Label::Unknown);
    assert!(records[2].edits().is_empty());
    assert_eq!(records[2].insert_word_count(), 0);
}

#[test]
fn test_header_lines_round_trip() {
    let records = LogParser::default()
        .parse_str(LOG, Path::new("train.log"))
        .unwrap();
    let headers: Vec<String> = records.iter().map(|r| r.header_line("\t")).collect();
    let expected: Vec<&str> = LOG
        .lines()
        .filter(|line| line.split('\t').count() >= 6)
        .collect();
    assert_eq!(headers, expected);
}

#[test]
fn test_custom_delimiter() {
    let log = indoc! {"
        5|regular|Alice|t0|null|Page
        I|hello world
    "};
    let records = LogParser::new("|")
        .parse_str(log, Path::new("pipe.log"))
        .unwrap();
    assert_eq!(records[0].user_id(), "Alice");
    assert_eq!(records[0].edits()[0].text(), "hello world");
}

#[test]
fn test_four_field_header_is_malformed() {
    let log = "9\tregular\tAlice\t2008-01-01\n";
    let err = LogParser::default()
        .parse_str(log, Path::new("short.log"))
        .unwrap_err();
    match err {
        Error::MalformedLog { path, line, .. } => {
            assert_eq!(path, Path::new("short.log"));
            assert_eq!(line, 1);
        }
        other => panic!("expected MalformedLog, got {other:?}"),
    }
}

#[test]
fn test_first_failure_aborts_the_parse() {
    let log = indoc! {"
        1\tregular\tAlice\tt\tnull\tPage
        X\tnot an edit

        oops\tregular\tBob\tt\tnull\tPage
    "};
    let err = LogParser::default()
        .parse_str(log, Path::new("bad.log"))
        .unwrap_err();
    assert!(matches!(err, Error::MalformedLog { line: 2, .. }));
}

#[test]
fn test_missing_file_is_a_file_system_error() {
    let dir = TempDir::new().unwrap();
    let err = LogParser::default()
        .parse(&dir.path().join("absent.log"))
        .unwrap_err();
    assert!(matches!(err, Error::FileSystem { .. }));
}

#[test]
fn test_latin1_bytes_are_decoded_lossily() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("latin1.log");
    fs::write(
        &path,
        b"7\tregular\tJos\xE9\tt0\tnull\tCaf\xE9\nI\tna\xEFve edit\n",
    )
    .unwrap();

    let records = LogParser::default().parse(&path).unwrap();

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].user_id(), "Jos\u{FFFD}");
    assert_eq!(records[0].title(), "Caf\u{FFFD}");
    assert_eq!(records[0].edits()[0].text(), "na\u{FFFD}ve edit");
    assert_eq!(records[0].insert_word_count(), 2);
}
