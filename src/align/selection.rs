//! Attribute ranking by information gain with respect to the class.

use crate::core::{Error, Result};
use crate::dataset::{AttributeKind, Dataset, Value};
use std::cmp::Ordering;

/// Orders the non-label columns of a dataset by descending relevance.
///
/// Implementations must be deterministic for a given dataset.
pub trait AttributeRanker {
    fn rank(&self, dataset: &Dataset, label_index: usize) -> Result<Vec<usize>>;
}

/// Information gain of each attribute about the class, in bits.
///
/// Discrete attributes are scored on their full value split, with missing
/// values kept as a bucket of their own. Numeric attributes are scored at the
/// binary threshold that maximises gain. Rows with an unset label are ignored.
/// Ties are broken by column position.
#[derive(Debug, Clone, Copy, Default)]
pub struct InfoGainRanker;

impl InfoGainRanker {
    /// Gain for every non-label column, in column order.
    pub fn scores(&self, dataset: &Dataset, label_index: usize) -> Result<Vec<(usize, f64)>> {
        let num_classes = dataset
            .attribute(label_index)
            .and_then(|spec| spec.domain_size())
            .ok_or_else(|| {
                Error::capability(
                    "attribute ranking",
                    format!("label column {} is not nominal", label_index),
                )
            })?;

        let labelled: Vec<(&[Value], usize)> = dataset
            .rows()
            .iter()
            .filter_map(|row| row[label_index].as_discrete().map(|c| (row.as_slice(), c)))
            .collect();

        let mut class_counts = vec![0usize; num_classes];
        for (_, class) in &labelled {
            class_counts[*class] += 1;
        }
        let prior = entropy(&class_counts);

        let mut scores = Vec::with_capacity(dataset.num_attributes().saturating_sub(1));
        for (index, spec) in dataset.attributes().iter().enumerate() {
            if index == label_index {
                continue;
            }
            let conditional = match spec.kind() {
                AttributeKind::Boolean | AttributeKind::Nominal { .. } => {
                    let domain = spec.domain_size().unwrap_or(0);
                    discrete_conditional_entropy(&labelled, index, domain, num_classes)
                }
                AttributeKind::Numeric => {
                    numeric_conditional_entropy(&labelled, index, num_classes)
                }
                AttributeKind::Text => {
                    return Err(Error::capability(
                        "attribute ranking",
                        format!("text attribute '{}' must be vectorized first", spec.name()),
                    ))
                }
            };
            scores.push((index, (prior - conditional).max(0.0)));
        }
        Ok(scores)
    }
}

impl AttributeRanker for InfoGainRanker {
    fn rank(&self, dataset: &Dataset, label_index: usize) -> Result<Vec<usize>> {
        let mut scores = self.scores(dataset, label_index)?;
        scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then(a.0.cmp(&b.0)));

        if let Some((best, gain)) = scores.first() {
            tracing::debug!(column = best, gain, "top ranked attribute");
        }
        Ok(scores.into_iter().map(|(index, _)| index).collect())
    }
}

fn entropy(counts: &[usize]) -> f64 {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    counts
        .iter()
        .filter(|&&c| c > 0)
        .map(|&c| {
            let p = c as f64 / total;
            -p * p.log2()
        })
        .sum()
}

/// Weighted entropy of the class over a partition of the rows.
fn partition_entropy(buckets: &[Vec<usize>]) -> f64 {
    let total: usize = buckets.iter().flatten().sum();
    if total == 0 {
        return 0.0;
    }
    buckets
        .iter()
        .map(|bucket| {
            let size: usize = bucket.iter().sum();
            size as f64 / total as f64 * entropy(bucket)
        })
        .sum()
}

fn discrete_conditional_entropy(
    rows: &[(&[Value], usize)],
    index: usize,
    domain: usize,
    num_classes: usize,
) -> f64 {
    // Last bucket collects missing values.
    let mut buckets = vec![vec![0usize; num_classes]; domain + 1];
    for (row, class) in rows {
        let bucket = row[index]
            .as_discrete()
            .filter(|&v| v < domain)
            .unwrap_or(domain);
        buckets[bucket][*class] += 1;
    }
    partition_entropy(&buckets)
}

fn numeric_conditional_entropy(rows: &[(&[Value], usize)], index: usize, num_classes: usize) -> f64 {
    let mut missing = vec![0usize; num_classes];
    let mut points: Vec<(f64, usize)> = Vec::with_capacity(rows.len());
    for (row, class) in rows {
        match row[index].as_f64() {
            Some(value) => points.push((value, *class)),
            None => missing[*class] += 1,
        }
    }
    points.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

    let mut right = vec![0usize; num_classes];
    for (_, class) in &points {
        right[*class] += 1;
    }
    let mut left = vec![0usize; num_classes];

    // No split at all is the baseline.
    let mut best = partition_entropy(&[right.clone(), missing.clone()]);
    for i in 0..points.len().saturating_sub(1) {
        let class = points[i].1;
        left[class] += 1;
        right[class] -= 1;
        if points[i].0 == points[i + 1].0 {
            continue;
        }
        let candidate = partition_entropy(&[left.clone(), right.clone(), missing.clone()]);
        if candidate < best {
            best = candidate;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::AttributeSpec;

    fn dataset() -> Dataset {
        // `signal` separates the classes perfectly, `noise` not at all.
        let rows = vec![
            vec![Value::Numeric(1.0), Value::Boolean(true), Value::Nominal(0)],
            vec![Value::Numeric(2.0), Value::Boolean(false), Value::Nominal(0)],
            vec![Value::Numeric(10.0), Value::Boolean(true), Value::Nominal(1)],
            vec![Value::Numeric(11.0), Value::Boolean(false), Value::Nominal(1)],
        ];
        Dataset::from_rows(
            "t",
            vec![
                AttributeSpec::numeric("signal"),
                AttributeSpec::boolean("noise"),
                AttributeSpec::nominal("class", ["a", "b"]),
            ],
            rows,
            2,
        )
        .unwrap()
    }

    #[test]
    fn test_entropy() {
        assert_eq!(entropy(&[2, 2]), 1.0);
        assert_eq!(entropy(&[4, 0]), 0.0);
        assert_eq!(entropy(&[]), 0.0);
    }

    #[test]
    fn test_scores() {
        let scores = InfoGainRanker.scores(&dataset(), 2).unwrap();
        assert_eq!(scores.len(), 2);
        assert!((scores[0].1 - 1.0).abs() < 1e-12);
        assert!(scores[1].1.abs() < 1e-12);
    }

    #[test]
    fn test_rank_orders_by_gain() {
        assert_eq!(InfoGainRanker.rank(&dataset(), 2).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_ties_keep_column_order() {
        let rows = vec![
            vec![Value::Numeric(0.0), Value::Numeric(0.0), Value::Nominal(0)],
            vec![Value::Numeric(0.0), Value::Numeric(0.0), Value::Nominal(1)],
        ];
        let data = Dataset::from_rows(
            "t",
            vec![
                AttributeSpec::numeric("x"),
                AttributeSpec::numeric("y"),
                AttributeSpec::nominal("class", ["a", "b"]),
            ],
            rows,
            2,
        )
        .unwrap();
        assert_eq!(InfoGainRanker.rank(&data, 2).unwrap(), vec![0, 1]);
    }

    #[test]
    fn test_text_attribute_is_rejected() {
        let data = Dataset::from_rows(
            "t",
            vec![
                AttributeSpec::text("words"),
                AttributeSpec::nominal("class", ["a"]),
            ],
            vec![vec![Value::Text("x".into()), Value::Nominal(0)]],
            1,
        )
        .unwrap();
        let err = InfoGainRanker.rank(&data, 1).unwrap_err();
        assert!(matches!(err, Error::ExternalCapability { .. }));
    }
}
