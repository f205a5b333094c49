use crate::core::{ChangeRecord, Edit, Error, Result};
use crate::dataset::{AttributeSpec, Dataset, Value};
use once_cell::sync::Lazy;
use regex::Regex;

pub const IS_REGISTERED_USER: &str = "isRegisteredUser";
pub const HAS_COMMENT: &str = "hasComment";
pub const COMMENT_MENTIONS_REVERT: &str = "commentMentionsRevert";
pub const INSERT_WORD_COUNT: &str = "insertWordCount";
pub const DELETE_WORD_COUNT: &str = "deleteWordCount";
pub const WORD_COUNT_DELTA: &str = "wordCountDelta";
pub const COMMENT_LENGTH: &str = "commentLength";
pub const EDITS_TEXT: &str = "editsText";
pub const LABEL: &str = "label";

/// Column of the free-text attribute in the raw schema.
pub const EDITS_TEXT_INDEX: usize = 7;
/// Column of the class attribute in the raw schema.
pub const LABEL_INDEX: usize = 8;

/// Relation name used for every extracted dataset.
pub const RELATION: &str = "Wiki";

const REVERT_MARKER: &str = "reverted";

// Anchored dotted quad, each octet 0-255 (leading zeros allowed).
static IPV4_ADDRESS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)(\.(25[0-5]|2[0-4][0-9]|[01]?[0-9][0-9]?)){3}$",
    )
    .unwrap()
});

/// The fixed raw attribute schema for a given class set.
pub fn raw_schema(classes: &[String]) -> Vec<AttributeSpec> {
    vec![
        AttributeSpec::boolean(IS_REGISTERED_USER),
        AttributeSpec::boolean(HAS_COMMENT),
        AttributeSpec::boolean(COMMENT_MENTIONS_REVERT),
        AttributeSpec::numeric(INSERT_WORD_COUNT),
        AttributeSpec::numeric(DELETE_WORD_COUNT),
        AttributeSpec::numeric(WORD_COUNT_DELTA),
        AttributeSpec::numeric(COMMENT_LENGTH),
        AttributeSpec::text(EDITS_TEXT),
        AttributeSpec::nominal(LABEL, classes.iter().cloned()),
    ]
}

/// Anonymous edits are logged under the author's IP address; anything else
/// is taken to be an account name.
pub fn is_registered_user(user_id: &str) -> bool {
    !IPV4_ADDRESS.is_match(user_id)
}

/// Every edit token prefixed by its kind tag, each followed by a space.
pub fn edits_text(edits: &[Edit]) -> String {
    let mut text = String::new();
    for edit in edits {
        let tag = edit.kind().tag();
        for token in edit.tokens() {
            text.push(tag);
            text.push_str(token);
            text.push(' ');
        }
    }
    text
}

/// Turns change records into rows of the fixed raw schema.
#[derive(Debug, Clone)]
pub struct FeatureExtractor {
    classes: Vec<String>,
}

impl FeatureExtractor {
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn schema(&self) -> Vec<AttributeSpec> {
        raw_schema(&self.classes)
    }

    /// Build one row per record.
    ///
    /// With `known_label` unset the label column is still allocated but every
    /// cell is left missing so predictions can be written back later.
    pub fn extract(&self, records: &[ChangeRecord], known_label: bool) -> Result<Dataset> {
        let rows = records
            .iter()
            .map(|record| self.row(record, known_label))
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(rows = rows.len(), known_label, "extracted feature rows");
        Dataset::from_rows(RELATION, self.schema(), rows, LABEL_INDEX)
    }

    fn row(&self, record: &ChangeRecord, known_label: bool) -> Result<Vec<Value>> {
        let comment = record.comment().text();
        let inserted = record.insert_word_count() as f64;
        let deleted = record.delete_word_count() as f64;

        let label = match record.label().known() {
            Some(label) if known_label => {
                let index = self
                    .classes
                    .iter()
                    .position(|class| class == label)
                    .ok_or_else(|| Error::unknown_value(LABEL, label))?;
                Value::Nominal(index)
            }
            _ => Value::Missing,
        };

        Ok(vec![
            Value::Boolean(is_registered_user(record.user_id())),
            Value::Boolean(comment.is_some()),
            Value::Boolean(comment.is_some_and(|c| c.to_lowercase().contains(REVERT_MARKER))),
            Value::Numeric(inserted),
            Value::Numeric(deleted),
            Value::Numeric(deleted - inserted),
            Value::Numeric(comment.map_or(0, |c| c.chars().count()) as f64),
            Value::Text(edits_text(record.edits())),
            label,
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Comment, Label};
    use pretty_assertions::assert_eq;

    fn classes() -> Vec<String> {
        vec!["regular".to_string(), "vandalism".to_string()]
    }

    fn record(user: &str, label: &str, comment: &str, edits: Vec<Edit>) -> ChangeRecord {
        ChangeRecord::new(
            7,
            Label::from_field(label),
            user,
            "2008-01-01",
            Comment::from_field(comment),
            "Page",
            edits,
        )
    }

    #[test]
    fn test_ip_addresses_are_anonymous() {
        assert!(!is_registered_user("127.0.0.1"));
        assert!(!is_registered_user("255.255.255.255"));
        assert!(!is_registered_user("010.1.1.1"));
    }

    #[test]
    fn test_everything_else_is_registered() {
        for user in [
            "Alice",
            "999.1.1.1",
            "abc.def",
            "1.2.3",
            "1.2.3.4.5",
            "host.example.org",
            " 1.2.3.4",
        ] {
            assert!(is_registered_user(user), "{user}");
        }
    }

    #[test]
    fn test_edits_text_tags_every_token() {
        let edits = vec![Edit::insertion("hello world"), Edit::deletion("bad")];
        assert_eq!(edits_text(&edits), "Ihello Iworld Dbad ");
        assert_eq!(edits_text(&[]), "");
    }

    #[test]
    fn test_row_values() {
        let extractor = FeatureExtractor::new(classes());
        let rec = record(
            "10.0.0.1",
            "vandalism",
            "Reverted edits by X",
            vec![Edit::insertion("a b c"), Edit::deletion("d")],
        );
        let data = extractor.extract(&[rec], true).unwrap();
        assert_eq!(
            data.rows()[0],
            vec![
                Value::Boolean(false),
                Value::Boolean(true),
                Value::Boolean(true),
                Value::Numeric(3.0),
                Value::Numeric(1.0),
                Value::Numeric(-2.0),
                Value::Numeric(19.0),
                Value::Text("Ia Ib Ic Dd ".into()),
                Value::Nominal(1),
            ]
        );
        assert_eq!(data.label_index(), LABEL_INDEX);
        assert_eq!(data.attribute(EDITS_TEXT_INDEX).unwrap().name(), EDITS_TEXT);
    }

    #[test]
    fn test_null_comment() {
        let extractor = FeatureExtractor::new(classes());
        let data = extractor
            .extract(&[record("Bob", "regular", "null", Vec::new())], true)
            .unwrap();
        let row = &data.rows()[0];
        assert_eq!(row[1], Value::Boolean(false));
        assert_eq!(row[2], Value::Boolean(false));
        assert_eq!(row[6], Value::Numeric(0.0));
    }

    #[test]
    fn test_unknown_label_mode_leaves_label_missing() {
        let extractor = FeatureExtractor::new(classes());
        let data = extractor
            .extract(&[record("Bob", "regular", "null", Vec::new())], false)
            .unwrap();
        assert_eq!(data.num_attributes(), 9);
        assert_eq!(data.labels(), vec![None]);
    }

    #[test]
    fn test_label_outside_class_set_fails() {
        let extractor = FeatureExtractor::new(classes());
        let err = extractor
            .extract(&[record("Bob", "spam", "null", Vec::new())], true)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownCategoricalValue { .. }));
    }
}
