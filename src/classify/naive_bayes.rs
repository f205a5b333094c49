use super::{argmax, check_schema, class_counts, Classifier, Model};
use crate::core::{Error, Result};
use crate::dataset::{AttributeKind, AttributeSpec, Dataset, Value};
use std::f64::consts::PI;

/// Precision assumed for numeric attributes with fewer than two distinct values.
const DEFAULT_PRECISION: f64 = 0.01;

/// Naive Bayes over mixed attributes.
///
/// Boolean and nominal attributes use Laplace-smoothed frequency estimates;
/// numeric attributes use a per-class normal distribution whose standard
/// deviation is floored at a sixth of the attribute's observed precision.
/// Missing values are ignored both when fitting and when predicting.
#[derive(Debug, Clone, Default)]
pub struct NaiveBayes;

enum Estimator {
    Label,
    /// `log_probs[class][value]`
    Discrete { log_probs: Vec<Vec<f64>> },
    Gaussian { mean: Vec<f64>, std_dev: Vec<f64> },
}

struct NaiveBayesModel {
    schema: Vec<AttributeSpec>,
    log_priors: Vec<f64>,
    estimators: Vec<Estimator>,
}

impl Classifier for NaiveBayes {
    fn name(&self) -> &str {
        "naive-bayes"
    }

    fn fit(&self, train: &Dataset) -> Result<Box<dyn Model>> {
        let counts = class_counts(train)?;
        let num_classes = counts.len();
        let total: usize = counts.iter().sum();
        let log_priors = counts
            .iter()
            .map(|&c| ((c as f64 + 1.0) / (total + num_classes) as f64).ln())
            .collect();

        let labels = train.labels();
        let estimators = train
            .attributes()
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                if index == train.label_index() {
                    return Ok(Estimator::Label);
                }
                match spec.kind() {
                    AttributeKind::Boolean | AttributeKind::Nominal { .. } => Ok(fit_discrete(
                        train,
                        &labels,
                        index,
                        spec.domain_size().unwrap_or(0),
                        num_classes,
                    )),
                    AttributeKind::Numeric => Ok(fit_gaussian(train, &labels, index, num_classes)),
                    AttributeKind::Text => Err(Error::capability(
                        "classifier fit",
                        format!("text attribute '{}' must be vectorized first", spec.name()),
                    )),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        tracing::debug!(
            rows = total,
            attributes = train.num_attributes(),
            "fitted naive bayes"
        );
        Ok(Box::new(NaiveBayesModel {
            schema: train.attributes().to_vec(),
            log_priors,
            estimators,
        }))
    }
}

fn fit_discrete(
    train: &Dataset,
    labels: &[Option<usize>],
    index: usize,
    domain: usize,
    num_classes: usize,
) -> Estimator {
    let mut counts = vec![vec![0usize; domain]; num_classes];
    for (value, label) in train.column(index).zip(labels) {
        if let (Some(v), Some(class)) = (value.as_discrete(), label) {
            if v < domain {
                counts[*class][v] += 1;
            }
        }
    }
    let log_probs = counts
        .into_iter()
        .map(|per_value| {
            let seen: usize = per_value.iter().sum();
            per_value
                .iter()
                .map(|&c| ((c as f64 + 1.0) / (seen + domain) as f64).ln())
                .collect()
        })
        .collect();
    Estimator::Discrete { log_probs }
}

fn fit_gaussian(
    train: &Dataset,
    labels: &[Option<usize>],
    index: usize,
    num_classes: usize,
) -> Estimator {
    let mut per_class: Vec<Vec<f64>> = vec![Vec::new(); num_classes];
    let mut all = Vec::new();
    for (value, label) in train.column(index).zip(labels) {
        if let (Some(v), Some(class)) = (value.as_f64(), label) {
            per_class[*class].push(v);
            all.push(v);
        }
    }
    let min_std_dev = precision(&mut all) / 6.0;

    let mut mean = Vec::with_capacity(num_classes);
    let mut std_dev = Vec::with_capacity(num_classes);
    for values in &per_class {
        if values.is_empty() {
            mean.push(0.0);
            std_dev.push(min_std_dev);
            continue;
        }
        let n = values.len() as f64;
        let m = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / n;
        mean.push(m);
        std_dev.push(variance.sqrt().max(min_std_dev));
    }
    Estimator::Gaussian { mean, std_dev }
}

/// Average gap between consecutive distinct values.
fn precision(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.total_cmp(b));
    let mut distinct = 0usize;
    let mut previous: Option<f64> = None;
    for &v in values.iter() {
        if previous != Some(v) {
            distinct += 1;
            previous = Some(v);
        }
    }
    match (values.first(), values.last()) {
        (Some(min), Some(max)) if distinct > 1 => (max - min) / (distinct - 1) as f64,
        _ => DEFAULT_PRECISION,
    }
}

fn gaussian_log_density(x: f64, mean: f64, std_dev: f64) -> f64 {
    let variance = std_dev * std_dev;
    -0.5 * (2.0 * PI * variance).ln() - (x - mean).powi(2) / (2.0 * variance)
}

impl NaiveBayesModel {
    fn log_scores(&self, row: &[Value]) -> Vec<f64> {
        let mut scores = self.log_priors.clone();
        for (estimator, value) in self.estimators.iter().zip(row) {
            match estimator {
                Estimator::Label => {}
                Estimator::Discrete { log_probs } => {
                    if let Some(v) = value.as_discrete() {
                        for (class, score) in scores.iter_mut().enumerate() {
                            if let Some(lp) = log_probs[class].get(v) {
                                *score += lp;
                            }
                        }
                    }
                }
                Estimator::Gaussian { mean, std_dev } => {
                    if let Some(x) = value.as_f64() {
                        for (class, score) in scores.iter_mut().enumerate() {
                            *score += gaussian_log_density(x, mean[class], std_dev[class]);
                        }
                    }
                }
            }
        }
        scores
    }
}

impl Model for NaiveBayesModel {
    fn predict(&self, dataset: &Dataset) -> Result<Vec<usize>> {
        check_schema(&self.schema, dataset)?;
        Ok(dataset
            .rows()
            .iter()
            .map(|row| argmax(&self.log_scores(row)))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(rows: &[(f64, bool, Option<usize>)]) -> Dataset {
        Dataset::from_rows(
            "t",
            vec![
                AttributeSpec::numeric("size"),
                AttributeSpec::boolean("flag"),
                AttributeSpec::nominal("class", ["regular", "vandalism"]),
            ],
            rows.iter()
                .map(|&(size, flag, label)| {
                    vec![
                        Value::Numeric(size),
                        Value::Boolean(flag),
                        label.map_or(Value::Missing, Value::Nominal),
                    ]
                })
                .collect(),
            2,
        )
        .unwrap()
    }

    #[test]
    fn test_separable_data() {
        let train = dataset(&[
            (1.0, true, Some(0)),
            (2.0, true, Some(0)),
            (1.5, true, Some(0)),
            (20.0, false, Some(1)),
            (22.0, false, Some(1)),
            (21.0, false, Some(1)),
        ]);
        let model = NaiveBayes.fit(&train).unwrap();
        let test = dataset(&[(1.2, true, None), (19.0, false, None)]);
        assert_eq!(model.predict(&test).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_single_row_per_class_uses_precision_floor() {
        let train = dataset(&[(1.0, true, Some(0)), (1.0, false, Some(1))]);
        let model = NaiveBayes.fit(&train).unwrap();
        let predictions = model.predict(&dataset(&[(1.0, true, None)])).unwrap();
        assert_eq!(predictions, vec![0]);
    }

    #[test]
    fn test_missing_values_are_skipped() {
        let train = dataset(&[(1.0, true, Some(0)), (9.0, false, Some(1))]);
        let model = NaiveBayes.fit(&train).unwrap();
        let test = Dataset::from_rows(
            "t",
            train.attributes().to_vec(),
            vec![vec![Value::Missing, Value::Boolean(false), Value::Missing]],
            2,
        )
        .unwrap();
        assert_eq!(model.predict(&test).unwrap(), vec![1]);
    }

    #[test]
    fn test_schema_mismatch_is_rejected() {
        let train = dataset(&[(1.0, true, Some(0))]);
        let model = NaiveBayes.fit(&train).unwrap();
        let other = Dataset::from_rows(
            "t",
            vec![AttributeSpec::nominal("class", ["regular", "vandalism"])],
            vec![vec![Value::Missing]],
            0,
        )
        .unwrap();
        assert!(matches!(
            model.predict(&other),
            Err(Error::IncompatibleSchema(_))
        ));
    }

    #[test]
    fn test_precision() {
        assert_eq!(precision(&mut [3.0, 1.0, 1.0, 5.0]), 2.0);
        assert_eq!(precision(&mut [4.0, 4.0]), DEFAULT_PRECISION);
        assert_eq!(precision(&mut []), DEFAULT_PRECISION);
    }
}
