use super::{check_schema, class_counts, Classifier, Model};
use crate::core::Result;
use crate::dataset::{AttributeSpec, Dataset};

/// Always predicts the most frequent training class.
#[derive(Debug, Clone, Copy, Default)]
pub struct MajorityClass;

struct MajorityModel {
    schema: Vec<AttributeSpec>,
    class: usize,
}

impl Classifier for MajorityClass {
    fn name(&self) -> &str {
        "majority"
    }

    fn fit(&self, train: &Dataset) -> Result<Box<dyn Model>> {
        let counts = class_counts(train)?;
        let mut class = 0;
        for (i, &count) in counts.iter().enumerate() {
            if count > counts[class] {
                class = i;
            }
        }
        Ok(Box::new(MajorityModel {
            schema: train.attributes().to_vec(),
            class,
        }))
    }
}

impl Model for MajorityModel {
    fn predict(&self, dataset: &Dataset) -> Result<Vec<usize>> {
        check_schema(&self.schema, dataset)?;
        Ok(vec![self.class; dataset.num_rows()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::Value;

    fn dataset(labels: &[Option<usize>]) -> Dataset {
        Dataset::from_rows(
            "t",
            vec![
                AttributeSpec::numeric("x"),
                AttributeSpec::nominal("class", ["a", "b"]),
            ],
            labels
                .iter()
                .map(|l| vec![Value::Numeric(0.0), l.map_or(Value::Missing, Value::Nominal)])
                .collect(),
            1,
        )
        .unwrap()
    }

    #[test]
    fn test_predicts_most_frequent_class() {
        let model = MajorityClass
            .fit(&dataset(&[Some(1), Some(1), Some(0), None]))
            .unwrap();
        assert_eq!(model.predict(&dataset(&[None, None])).unwrap(), vec![1, 1]);
    }

    #[test]
    fn test_tie_goes_to_first_class() {
        let model = MajorityClass.fit(&dataset(&[Some(1), Some(0)])).unwrap();
        assert_eq!(model.predict(&dataset(&[None])).unwrap(), vec![0]);
    }

    #[test]
    fn test_unlabelled_training_data_fails() {
        assert!(MajorityClass.fit(&dataset(&[None])).is_err());
    }
}
