use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether a diff line added or removed text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EditKind {
    Insertion,
    Deletion,
}

impl EditKind {
    /// One-character tag used both in the raw log and in the edits text feature.
    pub const fn tag(self) -> char {
        match self {
            Self::Insertion => 'I',
            Self::Deletion => 'D',
        }
    }

    pub fn from_tag(tag: char) -> Option<Self> {
        match tag {
            'I' => Some(Self::Insertion),
            'D' => Some(Self::Deletion),
            _ => None,
        }
    }
}

impl fmt::Display for EditKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// A single insertion or deletion line from a change record's diff body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edit {
    kind: EditKind,
    text: String,
}

impl Edit {
    pub fn new(kind: EditKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }

    pub fn insertion(text: impl Into<String>) -> Self {
        Self::new(EditKind::Insertion, text)
    }

    pub fn deletion(text: impl Into<String>) -> Self {
        Self::new(EditKind::Deletion, text)
    }

    pub fn kind(&self) -> EditKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whitespace-delimited tokens of the edit text.
    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.text.split_whitespace()
    }

    pub fn word_count(&self) -> usize {
        self.tokens().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip() {
        for kind in [EditKind::Insertion, EditKind::Deletion] {
            assert_eq!(EditKind::from_tag(kind.tag()), Some(kind));
        }
        assert_eq!(EditKind::from_tag('X'), None);
    }

    #[test]
    fn test_word_count_ignores_extra_whitespace() {
        assert_eq!(Edit::insertion("  hello   world ").word_count(), 2);
        assert_eq!(Edit::deletion("").word_count(), 0);
    }
}
