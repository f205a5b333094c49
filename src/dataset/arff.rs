//! ARFF rendering for dataset snapshots.
//!
//! Snapshots are debugging output only; nothing reads them back.

use super::{AttributeKind, AttributeSpec, Dataset, Value};
use crate::core::Result;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// Render a dataset in ARFF text form.
pub fn to_arff(dataset: &Dataset) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "@relation {}", quote(dataset.relation()));
    let _ = writeln!(out);
    for spec in dataset.attributes() {
        let _ = writeln!(out, "@attribute {} {}", quote(spec.name()), type_decl(spec));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "@data");
    for row in dataset.rows() {
        let cells: Vec<String> = dataset
            .attributes()
            .iter()
            .zip(row)
            .map(|(spec, value)| cell(spec, value))
            .collect();
        let _ = writeln!(out, "{}", cells.join(","));
    }
    out
}

/// Write `<dir>/<stem>-<stage>.arff` and return its path.
pub fn write_snapshot(dir: &Path, stem: &str, stage: &str, dataset: &Dataset) -> Result<PathBuf> {
    crate::io::ensure_dir(dir)?;
    let path = dir.join(format!("{stem}-{stage}.arff"));
    tracing::debug!(path = %path.display(), "writing dataset snapshot");
    crate::io::write_file(&path, &to_arff(dataset))?;
    Ok(path)
}

fn type_decl(spec: &AttributeSpec) -> String {
    match spec.kind() {
        AttributeKind::Boolean => "{true,false}".to_string(),
        AttributeKind::Numeric => "numeric".to_string(),
        AttributeKind::Text => "string".to_string(),
        AttributeKind::Nominal { values } => {
            let values: Vec<String> = values.iter().map(|v| quote(v)).collect();
            format!("{{{}}}", values.join(","))
        }
    }
}

fn cell(spec: &AttributeSpec, value: &Value) -> String {
    match value {
        Value::Missing => "?".to_string(),
        Value::Boolean(b) => b.to_string(),
        Value::Numeric(n) => format_number(*n),
        Value::Nominal(i) => spec
            .nominal_value(*i)
            .map(quote)
            .unwrap_or_else(|| "?".to_string()),
        Value::Text(text) => quote_always(text),
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn needs_quotes(s: &str) -> bool {
    s.is_empty()
        || s == "?"
        || s.chars()
            .any(|c| c.is_whitespace() || matches!(c, ',' | '\'' | '"' | '{' | '}' | '%' | '\\'))
}

fn quote(s: &str) -> String {
    if needs_quotes(s) {
        quote_always(s)
    } else {
        s.to_string()
    }
}

fn quote_always(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for c in s.chars() {
        match c {
            '\'' => out.push_str("\\'"),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
