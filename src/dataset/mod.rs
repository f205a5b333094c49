//! In-memory tabular dataset with a typed attribute schema.
//!
//! A [`Dataset`] is built once from complete rows and afterwards only changes
//! by whole-column operations: [`Dataset::replace_column`] (text expansion,
//! label write-back) and [`Dataset::project`] (attribute selection). Rows are
//! never edited in place, so the row-length and domain invariants only need to
//! be checked at those two entry points.

pub mod arff;

use crate::core::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Type and domain of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AttributeKind {
    Boolean,
    Numeric,
    Text,
    Nominal { values: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttributeSpec {
    name: String,
    kind: AttributeKind,
}

impl AttributeSpec {
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Boolean)
    }

    pub fn numeric(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Numeric)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, AttributeKind::Text)
    }

    pub fn nominal<S: Into<String>>(
        name: impl Into<String>,
        values: impl IntoIterator<Item = S>,
    ) -> Self {
        Self::new(
            name,
            AttributeKind::Nominal {
                values: values.into_iter().map(Into::into).collect(),
            },
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &AttributeKind {
        &self.kind
    }

    /// Position of `value` in a nominal domain.
    pub fn nominal_index(&self, value: &str) -> Option<usize> {
        match &self.kind {
            AttributeKind::Nominal { values } => values.iter().position(|v| v == value),
            _ => None,
        }
    }

    pub fn nominal_value(&self, index: usize) -> Option<&str> {
        match &self.kind {
            AttributeKind::Nominal { values } => values.get(index).map(String::as_str),
            _ => None,
        }
    }

    /// Number of distinct values a discrete attribute can take.
    pub fn domain_size(&self) -> Option<usize> {
        match &self.kind {
            AttributeKind::Boolean => Some(2),
            AttributeKind::Nominal { values } => Some(values.len()),
            AttributeKind::Numeric | AttributeKind::Text => None,
        }
    }

    fn check(&self, value: &Value) -> Result<()> {
        let ok = match (&self.kind, value) {
            (_, Value::Missing) => true,
            (AttributeKind::Boolean, Value::Boolean(_)) => true,
            (AttributeKind::Numeric, Value::Numeric(_)) => true,
            (AttributeKind::Text, Value::Text(_)) => true,
            (AttributeKind::Nominal { values }, Value::Nominal(index)) => {
                if *index >= values.len() {
                    return Err(Error::unknown_value(&self.name, index.to_string()));
                }
                true
            }
            _ => false,
        };
        if ok {
            Ok(())
        } else {
            Err(Error::IncompatibleSchema(format!(
                "value {} does not fit {:?} attribute '{}'",
                value, self.kind, self.name
            )))
        }
    }
}

/// A single cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Value {
    Missing,
    Boolean(bool),
    Numeric(f64),
    /// Index into the attribute's nominal domain.
    Nominal(usize),
    Text(String),
}

impl Value {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Numeric view used by rankers and classifiers; booleans map to 0/1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Boolean(b) => Some(if *b { 1.0 } else { 0.0 }),
            Self::Numeric(n) => Some(*n),
            Self::Nominal(i) => Some(*i as f64),
            Self::Missing | Self::Text(_) => None,
        }
    }

    /// Index within a discrete domain; booleans map to 0 (false) / 1 (true).
    pub fn as_discrete(&self) -> Option<usize> {
        match self {
            Self::Boolean(b) => Some(usize::from(*b)),
            Self::Nominal(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing => write!(f, "?"),
            Self::Boolean(b) => write!(f, "{b}"),
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Nominal(i) => write!(f, "#{i}"),
            Self::Text(t) => write!(f, "{t:?}"),
        }
    }
}

/// A whole column, used when replacing or adding columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub spec: AttributeSpec,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(spec: AttributeSpec, values: Vec<Value>) -> Self {
        Self { spec, values }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    relation: String,
    attributes: Vec<AttributeSpec>,
    rows: Vec<Vec<Value>>,
    label_index: usize,
}

impl Dataset {
    /// Build a dataset from complete rows, validating every cell.
    pub fn from_rows(
        relation: impl Into<String>,
        attributes: Vec<AttributeSpec>,
        rows: Vec<Vec<Value>>,
        label_index: usize,
    ) -> Result<Self> {
        match attributes.get(label_index).map(AttributeSpec::kind) {
            Some(AttributeKind::Nominal { .. }) => {}
            Some(_) => {
                return Err(Error::IncompatibleSchema(format!(
                    "label column {} is not nominal",
                    label_index
                )))
            }
            None => {
                return Err(Error::IncompatibleSchema(format!(
                    "label column {} out of range for {} attributes",
                    label_index,
                    attributes.len()
                )))
            }
        }

        for (row_no, row) in rows.iter().enumerate() {
            if row.len() != attributes.len() {
                return Err(Error::IncompatibleSchema(format!(
                    "row {} has {} values, expected {}",
                    row_no,
                    row.len(),
                    attributes.len()
                )));
            }
            for (spec, value) in attributes.iter().zip(row) {
                spec.check(value)?;
            }
        }

        Ok(Self {
            relation: relation.into(),
            attributes,
            rows,
            label_index,
        })
    }

    pub fn relation(&self) -> &str {
        &self.relation
    }

    pub fn attributes(&self) -> &[AttributeSpec] {
        &self.attributes
    }

    pub fn attribute(&self, index: usize) -> Option<&AttributeSpec> {
        self.attributes.get(index)
    }

    pub fn attribute_index(&self, name: &str) -> Option<usize> {
        self.attributes.iter().position(|a| a.name() == name)
    }

    pub fn attribute_names(&self) -> Vec<&str> {
        self.attributes.iter().map(AttributeSpec::name).collect()
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn num_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn num_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn label_index(&self) -> usize {
        self.label_index
    }

    pub fn label_attribute(&self) -> &AttributeSpec {
        &self.attributes[self.label_index]
    }

    /// Class values per row; `None` where the label is unset.
    pub fn labels(&self) -> Vec<Option<usize>> {
        self.column(self.label_index)
            .map(Value::as_discrete)
            .collect()
    }

    pub fn column(&self, index: usize) -> impl Iterator<Item = &Value> + '_ {
        self.rows.iter().map(move |row| &row[index])
    }

    /// New dataset holding copies of the given rows, in the given order.
    pub fn subset(&self, rows: &[usize]) -> Dataset {
        Dataset {
            relation: self.relation.clone(),
            attributes: self.attributes.clone(),
            rows: rows.iter().map(|&i| self.rows[i].clone()).collect(),
            label_index: self.label_index,
        }
    }

    /// Replace one column with zero or more new columns at the same position.
    ///
    /// The label column may only be replaced one-for-one (label write-back).
    pub fn replace_column(&mut self, index: usize, replacement: Vec<Column>) -> Result<()> {
        if index >= self.attributes.len() {
            return Err(Error::IncompatibleSchema(format!(
                "column {} out of range for {} attributes",
                index,
                self.attributes.len()
            )));
        }
        if index == self.label_index {
            match replacement.as_slice() {
                [column] if matches!(column.spec.kind(), AttributeKind::Nominal { .. }) => {}
                _ => {
                    return Err(Error::IncompatibleSchema(
                        "label column must be replaced by exactly one nominal column".into(),
                    ))
                }
            }
        }
        for column in &replacement {
            if column.values.len() != self.rows.len() {
                return Err(Error::IncompatibleSchema(format!(
                    "column '{}' has {} values, expected {}",
                    column.spec.name(),
                    column.values.len(),
                    self.rows.len()
                )));
            }
            for value in &column.values {
                column.spec.check(value)?;
            }
        }

        let added = replacement.len();
        let mut specs = Vec::with_capacity(added);
        let mut cells: Vec<std::vec::IntoIter<Value>> = Vec::with_capacity(added);
        for column in replacement {
            specs.push(column.spec);
            cells.push(column.values.into_iter());
        }

        for row in &mut self.rows {
            let new_cells: Vec<Value> = cells
                .iter_mut()
                .map(|it| it.next().unwrap_or(Value::Missing))
                .collect();
            let _ = row.splice(index..=index, new_cells);
        }
        let _ = self.attributes.splice(index..=index, specs);

        if index < self.label_index {
            self.label_index = self.label_index + added - 1;
        }
        Ok(())
    }

    /// Keep only `columns`, in that order, with the label column appended last.
    pub fn project(&mut self, columns: &[usize]) -> Result<()> {
        let mut seen = vec![false; self.attributes.len()];
        for &index in columns {
            if index >= self.attributes.len() || index == self.label_index {
                return Err(Error::IncompatibleSchema(format!(
                    "cannot project onto column {}",
                    index
                )));
            }
            if std::mem::replace(&mut seen[index], true) {
                return Err(Error::IncompatibleSchema(format!(
                    "column {} selected twice",
                    index
                )));
            }
        }

        let order: Vec<usize> = columns
            .iter()
            .copied()
            .chain(std::iter::once(self.label_index))
            .collect();

        self.attributes = order.iter().map(|&i| self.attributes[i].clone()).collect();
        for row in &mut self.rows {
            *row = order.iter().map(|&i| row[i].clone()).collect();
        }
        self.label_index = order.len() - 1;
        Ok(())
    }

    /// Write predicted class indices back into the label column.
    pub fn set_labels(&mut self, labels: &[usize]) -> Result<()> {
        let spec = self.label_attribute().clone();
        let values = labels.iter().map(|&l| Value::Nominal(l)).collect();
        self.replace_column(self.label_index, vec![Column::new(spec, values)])
    }
}
