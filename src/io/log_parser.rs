//! Parser for the block-structured change log format.
//!
//! A log is a sequence of blocks separated by blank lines. Each block starts
//! with a header line of delimiter-separated fields
//! (`id, label, userId, timestamp, comment, title`) followed by zero or more
//! edit lines of the form `<I|D><delimiter><text>`:
//!
//! ```text
//! 1	regular	Alice	2008-01-01T00:00:00Z	null	Main Page
//! I	hello world
//! D	goodbye
//!
//! 2	vandalism	10.0.0.1	2008-01-02T00:00:00Z	null	Main Page
//! I	lol
//! ```
//!
//! Parsing is fail-fast: the first malformed line aborts the whole parse.

use crate::core::{ChangeRecord, Comment, Edit, EditKind, Error, Label, Result};
use std::collections::HashSet;
use std::path::Path;

/// Number of header fields every block must carry.
pub const HEADER_FIELDS: usize = 6;

/// Default field delimiter of the raw log.
pub const DEFAULT_DELIMITER: &str = "\t";

#[derive(Debug, Clone)]
pub struct LogParser {
    delimiter: String,
}

impl Default for LogParser {
    fn default() -> Self {
        Self::new(DEFAULT_DELIMITER)
    }
}

impl LogParser {
    pub fn new(delimiter: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
        }
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// Read and parse a log file.
    pub fn parse(&self, path: &Path) -> Result<Vec<ChangeRecord>> {
        let content = super::read_file(path)?;
        self.parse_str(&content, path)
    }

    /// Parse log content; `origin` is only used in error messages.
    pub fn parse_str(&self, content: &str, origin: &Path) -> Result<Vec<ChangeRecord>> {
        let mut records = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut lines = content.lines().enumerate().map(|(i, line)| (i + 1, line));

        while let Some((header_no, header)) = lines.find(|(_, line)| !line.trim().is_empty()) {
            let mut edits = Vec::new();
            for (line_no, line) in lines.by_ref() {
                if line.trim().is_empty() {
                    break;
                }
                edits.push(self.parse_edit(line, origin, line_no)?);
            }

            let record = self.parse_header(header, edits, origin, header_no)?;
            if !seen_ids.insert(record.id()) {
                return Err(Error::malformed_log(
                    origin,
                    header_no,
                    format!("duplicate record id {}", record.id()),
                ));
            }
            records.push(record);
        }

        tracing::debug!(
            origin = %origin.display(),
            records = records.len(),
            "parsed change log"
        );
        Ok(records)
    }

    fn parse_header(
        &self,
        line: &str,
        edits: Vec<Edit>,
        origin: &Path,
        line_no: usize,
    ) -> Result<ChangeRecord> {
        let fields: Vec<&str> = line.split(self.delimiter.as_str()).collect();
        if fields.len() < HEADER_FIELDS {
            return Err(Error::malformed_log(
                origin,
                line_no,
                format!(
                    "header has {} fields, expected {}",
                    fields.len(),
                    HEADER_FIELDS
                ),
            ));
        }

        let id = fields[0].parse::<i64>().map_err(|_| {
            Error::malformed_log(
                origin,
                line_no,
                format!("record id '{}' is not an integer", fields[0]),
            )
        })?;

        // The title is the last field and may itself contain the delimiter.
        let title = fields[HEADER_FIELDS - 1..].join(&self.delimiter);

        Ok(ChangeRecord::new(
            id,
            Label::from_field(fields[1]),
            fields[2],
            fields[3],
            Comment::from_field(fields[4]),
            title,
            edits,
        ))
    }

    fn parse_edit(&self, line: &str, origin: &Path, line_no: usize) -> Result<Edit> {
        let (kind_field, text) = line
            .split_once(self.delimiter.as_str())
            .unwrap_or((line, ""));

        let mut chars = kind_field.chars();
        let tag = chars.next().ok_or_else(|| {
            Error::malformed_log(origin, line_no, "edit line is missing its kind character")
        })?;
        if chars.next().is_some() {
            return Err(Error::malformed_log(
                origin,
                line_no,
                format!(
                    "edit kind '{}' must be a single character followed by the delimiter",
                    kind_field
                ),
            ));
        }
        let kind = EditKind::from_tag(tag).ok_or_else(|| {
            Error::malformed_log(
                origin,
                line_no,
                format!("unknown edit kind '{}', expected 'I' or 'D'", tag),
            )
        })?;

        Ok(Edit::new(kind, text))
    }
}
