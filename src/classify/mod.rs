//! Classifier capability used by the workflow.
//!
//! The workflow only talks to [`Classifier`] and [`Model`]; the learning
//! algorithm behind them is interchangeable. [`NaiveBayes`] is the default and
//! [`MajorityClass`] is a deterministic baseline.

pub mod evaluation;
pub mod majority;
pub mod naive_bayes;

pub use evaluation::{assign_folds, cross_validate, CrossValidationReport};
pub use majority::MajorityClass;
pub use naive_bayes::NaiveBayes;

use crate::core::{Error, Result};
use crate::dataset::{AttributeSpec, Dataset};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fitted model.
pub trait Model {
    /// Predicted class index (into the label domain) for every row.
    fn predict(&self, dataset: &Dataset) -> Result<Vec<usize>>;
}

/// Learns a [`Model`] from a labelled dataset.
pub trait Classifier {
    fn name(&self) -> &str;

    /// Fit on every row with a known label.
    fn fit(&self, train: &Dataset) -> Result<Box<dyn Model>>;

    /// Stratified k-fold estimate on the training data. Diagnostic only; the
    /// fitted folds are thrown away.
    fn cross_validate(
        &self,
        train: &Dataset,
        folds: usize,
        seed: u64,
    ) -> Result<Option<CrossValidationReport>> {
        cross_validate(self, train, folds, seed)
    }
}

/// Built-in classifiers selectable from the command line and config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ClassifierKind {
    #[default]
    NaiveBayes,
    Majority,
}

impl ClassifierKind {
    pub fn build(self) -> Box<dyn Classifier> {
        match self {
            Self::NaiveBayes => Box::new(NaiveBayes),
            Self::Majority => Box::new(MajorityClass),
        }
    }
}

impl fmt::Display for ClassifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NaiveBayes => write!(f, "naive-bayes"),
            Self::Majority => write!(f, "majority"),
        }
    }
}

/// Models check the prediction dataset against the schema they were fit on.
pub(crate) fn check_schema(expected: &[AttributeSpec], dataset: &Dataset) -> Result<()> {
    if expected == dataset.attributes() {
        Ok(())
    } else {
        Err(Error::IncompatibleSchema(format!(
            "model was fit on {} attributes, dataset has {} with a different layout",
            expected.len(),
            dataset.num_attributes()
        )))
    }
}

/// Per-class row counts over labelled rows.
pub(crate) fn class_counts(dataset: &Dataset) -> Result<Vec<usize>> {
    let num_classes = dataset.label_attribute().domain_size().unwrap_or(0);
    let mut counts = vec![0usize; num_classes];
    for class in dataset.labels().into_iter().flatten() {
        counts[class] += 1;
    }
    if counts.iter().all(|&c| c == 0) {
        return Err(Error::capability(
            "classifier fit",
            "training data has no labelled rows",
        ));
    }
    Ok(counts)
}

/// Index of the largest value; the lowest index wins ties.
pub(crate) fn argmax(values: &[f64]) -> usize {
    let mut best = 0;
    for (i, value) in values.iter().enumerate() {
        if *value > values[best] {
            best = i;
        }
    }
    best
}
