use super::edit::{Edit, EditKind};
use serde::{Deserialize, Serialize};

/// Raw value used in the log for records whose class is not known.
pub const UNKNOWN_LABEL: &str = "?";

/// Raw value used in the log for edits made without a summary comment.
pub const NULL_COMMENT: &str = "null";

/// Class label of a change record as it appears in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Label {
    Known(String),
    Unknown,
}

impl Label {
    pub fn from_field(field: &str) -> Self {
        if field == UNKNOWN_LABEL {
            Self::Unknown
        } else {
            Self::Known(field.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(label) => label,
            Self::Unknown => UNKNOWN_LABEL,
        }
    }

    pub fn known(&self) -> Option<&str> {
        match self {
            Self::Known(label) => Some(label),
            Self::Unknown => None,
        }
    }
}

/// Edit summary left by the author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Comment {
    Text(String),
    Null,
}

impl Comment {
    pub fn from_field(field: &str) -> Self {
        if field == NULL_COMMENT {
            Self::Null
        } else {
            Self::Text(field.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(text) => text,
            Self::Null => NULL_COMMENT,
        }
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Null => None,
        }
    }
}

/// One parsed log entry: the header fields plus the diff body.
///
/// Records are immutable once built. The insert/delete word counts are
/// computed from the edits at construction and only exposed read-only, so
/// they can never disagree with the edit list. Deserialization goes through
/// [`RecordFields`] and recomputes them too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RecordFields")]
pub struct ChangeRecord {
    id: i64,
    label: Label,
    user_id: String,
    timestamp: String,
    comment: Comment,
    title: String,
    edits: Vec<Edit>,
    insert_word_count: usize,
    delete_word_count: usize,
}

impl ChangeRecord {
    pub fn new(
        id: i64,
        label: Label,
        user_id: impl Into<String>,
        timestamp: impl Into<String>,
        comment: Comment,
        title: impl Into<String>,
        edits: Vec<Edit>,
    ) -> Self {
        let insert_word_count = count_words(&edits, EditKind::Insertion);
        let delete_word_count = count_words(&edits, EditKind::Deletion);
        Self {
            id,
            label,
            user_id: user_id.into(),
            timestamp: timestamp.into(),
            comment,
            title: title.into(),
            edits,
            insert_word_count,
            delete_word_count,
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn label(&self) -> &Label {
        &self.label
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn comment(&self) -> &Comment {
        &self.comment
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn edits(&self) -> &[Edit] {
        &self.edits
    }

    pub fn insert_word_count(&self) -> usize {
        self.insert_word_count
    }

    pub fn delete_word_count(&self) -> usize {
        self.delete_word_count
    }

    /// Re-serialize the header fields in log order.
    pub fn header_line(&self, delimiter: &str) -> String {
        let id = self.id.to_string();
        [
            id.as_str(),
            self.label.as_str(),
            &self.user_id,
            &self.timestamp,
            self.comment.as_str(),
            &self.title,
        ]
        .join(delimiter)
    }
}

/// Serialized form of a record without the derived counts.
#[derive(Deserialize)]
struct RecordFields {
    id: i64,
    label: Label,
    user_id: String,
    timestamp: String,
    comment: Comment,
    title: String,
    edits: Vec<Edit>,
}

impl From<RecordFields> for ChangeRecord {
    fn from(fields: RecordFields) -> Self {
        ChangeRecord::new(
            fields.id,
            fields.label,
            fields.user_id,
            fields.timestamp,
            fields.comment,
            fields.title,
            fields.edits,
        )
    }
}

fn count_words(edits: &[Edit], kind: EditKind) -> usize {
    edits
        .iter()
        .filter(|edit| edit.kind() == kind)
        .map(Edit::word_count)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(edits: Vec<Edit>) -> ChangeRecord {
        ChangeRecord::new(
            1,
            Label::from_field("regular"),
            "Alice",
            "2008-01-01T00:00:00Z",
            Comment::from_field("fix typo"),
            "Main Page",
            edits,
        )
    }

    #[test]
    fn test_word_counts_split_by_kind() {
        let rec = record(vec![
            Edit::insertion("hello world"),
            Edit::deletion("bad"),
            Edit::insertion("again"),
        ]);
        assert_eq!(rec.insert_word_count(), 3);
        assert_eq!(rec.delete_word_count(), 1);
    }

    #[test]
    fn test_no_edits_means_zero_counts() {
        let rec = record(Vec::new());
        assert_eq!(rec.insert_word_count(), 0);
        assert_eq!(rec.delete_word_count(), 0);
    }

    #[test]
    fn test_sentinels() {
        assert_eq!(Label::from_field("?"), Label::Unknown);
        assert_eq!(Label::from_field("vandalism").known(), Some("vandalism"));
        assert_eq!(Comment::from_field("null"), Comment::Null);
        assert_eq!(Comment::from_field("Null").text(), Some("Null"));
    }

    #[test]
    fn test_deserialized_counts_follow_the_edits() {
        let rec = record(vec![Edit::insertion("hello world"), Edit::deletion("bad")]);
        let mut json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["insert_word_count"], 2);
        json["insert_word_count"] = 99.into();
        json["delete_word_count"] = 42.into();

        let restored: ChangeRecord = serde_json::from_value(json).unwrap();

        assert_eq!(restored.insert_word_count(), 2);
        assert_eq!(restored.delete_word_count(), 1);
        assert_eq!(restored, rec);
    }

    #[test]
    fn test_header_line() {
        let rec = record(Vec::new());
        assert_eq!(
            rec.header_line("\t"),
            "1\tregular\tAlice\t2008-01-01T00:00:00Z\tfix typo\tMain Page"
        );
    }
}
