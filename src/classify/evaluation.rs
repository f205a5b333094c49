//! Stratified k-fold cross-validation and its summary report.

use super::Classifier;
use crate::core::Result;
use crate::dataset::Dataset;
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};
use serde::Serialize;
use std::fmt;

/// Confusion matrix and per-class statistics from cross-validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CrossValidationReport {
    pub classes: Vec<String>,
    pub folds: usize,
    /// `confusion[actual][predicted]`
    pub confusion: Vec<Vec<usize>>,
}

impl CrossValidationReport {
    pub fn new(classes: Vec<String>, folds: usize) -> Self {
        let n = classes.len();
        Self {
            classes,
            folds,
            confusion: vec![vec![0; n]; n],
        }
    }

    pub fn record(&mut self, actual: usize, predicted: usize) {
        self.confusion[actual][predicted] += 1;
    }

    pub fn total(&self) -> usize {
        self.confusion.iter().flatten().sum()
    }

    pub fn correct(&self) -> usize {
        (0..self.classes.len()).map(|c| self.confusion[c][c]).sum()
    }

    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total())
    }

    fn actual(&self, class: usize) -> usize {
        self.confusion[class].iter().sum()
    }

    fn predicted(&self, class: usize) -> usize {
        self.confusion.iter().map(|row| row[class]).sum()
    }

    /// Recall, also reported as the true-positive rate.
    pub fn recall(&self, class: usize) -> f64 {
        ratio(self.confusion[class][class], self.actual(class))
    }

    pub fn false_positive_rate(&self, class: usize) -> f64 {
        let false_positives = self.predicted(class) - self.confusion[class][class];
        ratio(false_positives, self.total() - self.actual(class))
    }

    pub fn precision(&self, class: usize) -> f64 {
        ratio(self.confusion[class][class], self.predicted(class))
    }

    pub fn f_measure(&self, class: usize) -> f64 {
        let precision = self.precision(class);
        let recall = self.recall(class);
        if precision + recall == 0.0 {
            0.0
        } else {
            2.0 * precision * recall / (precision + recall)
        }
    }

    fn weighted<F: Fn(usize) -> f64>(&self, metric: F) -> f64 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        (0..self.classes.len())
            .map(|c| metric(c) * self.actual(c) as f64)
            .sum::<f64>()
            / total as f64
    }
}

impl fmt::Display for CrossValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}-fold cross-validation: {}/{} correct ({:.2}%)",
            self.folds,
            self.correct(),
            self.total(),
            self.accuracy() * 100.0
        )?;

        let mut table = Table::new();
        table.load_preset(UTF8_FULL).set_header(vec![
            "Class", "TP Rate", "FP Rate", "Precision", "Recall", "F-Measure",
        ]);
        for (c, class) in self.classes.iter().enumerate() {
            table.add_row(vec![
                Cell::new(class),
                Cell::new(format!("{:.3}", self.recall(c))),
                Cell::new(format!("{:.3}", self.false_positive_rate(c))),
                Cell::new(format!("{:.3}", self.precision(c))),
                Cell::new(format!("{:.3}", self.recall(c))),
                Cell::new(format!("{:.3}", self.f_measure(c))),
            ]);
        }
        table.add_row(vec![
            Cell::new("Weighted Avg."),
            Cell::new(format!("{:.3}", self.weighted(|c| self.recall(c)))),
            Cell::new(format!("{:.3}", self.weighted(|c| self.false_positive_rate(c)))),
            Cell::new(format!("{:.3}", self.weighted(|c| self.precision(c)))),
            Cell::new(format!("{:.3}", self.weighted(|c| self.recall(c)))),
            Cell::new(format!("{:.3}", self.weighted(|c| self.f_measure(c)))),
        ]);
        write!(f, "{table}")
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Fold number for each labelled row, as `(row index, fold)` pairs.
///
/// Rows are shuffled with the seed, then grouped by class and dealt out
/// round-robin so every fold sees roughly the class distribution of the
/// whole set.
pub fn assign_folds(dataset: &Dataset, folds: usize, seed: u64) -> Vec<(usize, usize)> {
    let mut labelled: Vec<(usize, usize)> = dataset
        .labels()
        .into_iter()
        .enumerate()
        .filter_map(|(row, label)| label.map(|class| (row, class)))
        .collect();

    let mut rng = StdRng::seed_from_u64(seed);
    labelled.shuffle(&mut rng);
    labelled.sort_by_key(|&(_, class)| class);

    labelled
        .into_iter()
        .enumerate()
        .map(|(position, (row, _))| (row, position % folds.max(1)))
        .collect()
}

/// Run stratified k-fold cross-validation with any classifier.
///
/// `folds` is clamped to the number of labelled rows. Returns `None` when
/// there are fewer than two labelled rows to split.
pub fn cross_validate<C: Classifier + ?Sized>(
    classifier: &C,
    train: &Dataset,
    folds: usize,
    seed: u64,
) -> Result<Option<CrossValidationReport>> {
    let labelled = train.labels().iter().filter(|l| l.is_some()).count();
    if labelled < 2 {
        tracing::warn!(labelled, "too few labelled rows, skipping cross-validation");
        return Ok(None);
    }
    let folds = folds.clamp(2, labelled);

    let classes = match train.label_attribute().kind() {
        crate::dataset::AttributeKind::Nominal { values } => values.clone(),
        _ => Vec::new(),
    };
    let mut report = CrossValidationReport::new(classes, folds);
    let assignment = assign_folds(train, folds, seed);
    let labels = train.labels();

    for fold in 0..folds {
        let (held_out, training): (Vec<_>, Vec<_>) =
            assignment.iter().partition(|&&(_, f)| f == fold);
        let training: Vec<usize> = training.into_iter().map(|&(row, _)| row).collect();
        let held_out: Vec<usize> = held_out.into_iter().map(|&(row, _)| row).collect();

        let model = classifier.fit(&train.subset(&training))?;
        let predictions = model.predict(&train.subset(&held_out))?;
        for (row, predicted) in held_out.iter().zip(predictions) {
            if let Some(actual) = labels[*row] {
                report.record(actual, predicted);
            }
        }
        tracing::debug!(fold, train = training.len(), test = held_out.len(), "evaluated fold");
    }

    Ok(Some(report))
}
