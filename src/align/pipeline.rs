use super::selection::{AttributeRanker, InfoGainRanker};
use super::vocabulary::{BagOfWords, TextVectorizer, Vocabulary, DEFAULT_MAX_VOCABULARY};
use crate::core::{Error, Result};
use crate::dataset::{AttributeKind, AttributeSpec, Column, Dataset, Value};
use serde::Serialize;

/// Default number of attributes kept by selection.
pub const DEFAULT_ATTRIBUTES: usize = 40;

/// Everything learnt from the training split.
///
/// The schemas are recorded so that a dataset can only be transformed if it
/// has exactly the column layout the transforms were fit on.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FittedAlignment {
    source_schema: Vec<AttributeSpec>,
    text_index: Option<usize>,
    vocabulary: Vocabulary,
    expanded_schema: Vec<AttributeSpec>,
    selected: Vec<usize>,
}

impl FittedAlignment {
    pub fn source_schema(&self) -> &[AttributeSpec] {
        &self.source_schema
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    /// Schema after text expansion, before selection.
    pub fn expanded_schema(&self) -> &[AttributeSpec] {
        &self.expanded_schema
    }

    /// Indices into the expanded schema, in selection order.
    pub fn selected_columns(&self) -> &[usize] {
        &self.selected
    }

    pub fn selected_names(&self) -> Vec<&str> {
        self.selected
            .iter()
            .map(|&i| self.expanded_schema[i].name())
            .collect()
    }
}

/// Train and test datasets after alignment, with the fitted transforms.
#[derive(Debug, Clone)]
pub struct AlignedDatasets {
    pub train: Dataset,
    pub test: Dataset,
    pub fitted: FittedAlignment,
}

/// Fits text expansion and attribute selection on the training split and
/// replays them on any dataset with the same source schema.
pub struct AlignmentPipeline {
    vectorizer: Box<dyn TextVectorizer>,
    ranker: Box<dyn AttributeRanker>,
    attributes: usize,
}

impl Default for AlignmentPipeline {
    fn default() -> Self {
        Self::with_defaults(DEFAULT_ATTRIBUTES, DEFAULT_MAX_VOCABULARY)
    }
}

impl AlignmentPipeline {
    pub fn new(
        vectorizer: Box<dyn TextVectorizer>,
        ranker: Box<dyn AttributeRanker>,
        attributes: usize,
    ) -> Self {
        Self {
            vectorizer,
            ranker,
            attributes,
        }
    }

    /// Bag-of-words expansion with information-gain selection.
    pub fn with_defaults(attributes: usize, max_vocabulary: usize) -> Self {
        Self::new(
            Box::new(BagOfWords::new(max_vocabulary)),
            Box::new(InfoGainRanker),
            attributes,
        )
    }

    /// Fit on `train`, then transform both splits with the same state.
    pub fn align(&self, train: Dataset, test: Dataset) -> Result<AlignedDatasets> {
        check_same_schema(train.attributes(), test.attributes(), "train and test")?;
        let fitted = self.fit(&train)?;
        let train = self.transform(&fitted, train)?;
        let test = self.transform(&fitted, test)?;
        Ok(AlignedDatasets {
            train,
            test,
            fitted,
        })
    }

    pub fn fit(&self, train: &Dataset) -> Result<FittedAlignment> {
        let text_index = text_column(train)?;
        let vocabulary = match text_index {
            Some(index) => {
                let texts = texts(train, index);
                self.vectorizer.fit_vocabulary(&texts)?
            }
            None => Vocabulary::default(),
        };

        let mut fitted = FittedAlignment {
            source_schema: train.attributes().to_vec(),
            text_index,
            vocabulary,
            expanded_schema: Vec::new(),
            selected: Vec::new(),
        };

        let expanded = self.vectorize(&fitted, train.clone())?;
        fitted.expanded_schema = expanded.attributes().to_vec();

        let label_index = expanded.label_index();
        let available = expanded.num_attributes() - 1;
        let keep = self.attributes.min(available);
        fitted.selected = self
            .ranker
            .rank(&expanded, label_index)?
            .into_iter()
            .filter(|&i| i != label_index && i < expanded.num_attributes())
            .take(keep)
            .collect();

        tracing::info!(
            vocabulary = fitted.vocabulary.len(),
            expanded = available,
            requested = self.attributes,
            selected = fitted.selected.len(),
            "fitted alignment on training split"
        );
        Ok(fitted)
    }

    /// Replace the text column with one count column per vocabulary token.
    pub fn vectorize(&self, fitted: &FittedAlignment, mut dataset: Dataset) -> Result<Dataset> {
        check_same_schema(&fitted.source_schema, dataset.attributes(), "vectorize")?;
        let Some(index) = fitted.text_index else {
            return Ok(dataset);
        };

        let columns = {
            let texts = texts(&dataset, index);
            self.vectorizer
                .apply_vocabulary(&fitted.vocabulary, &texts)?
        };
        if columns.len() != fitted.vocabulary.len() {
            return Err(Error::capability(
                "text vectorization",
                format!(
                    "produced {} columns for a vocabulary of {}",
                    columns.len(),
                    fitted.vocabulary.len()
                ),
            ));
        }

        let replacement = fitted
            .vocabulary
            .tokens()
            .iter()
            .zip(columns)
            .map(|(token, counts)| {
                Column::new(
                    AttributeSpec::numeric(token.as_str()),
                    counts.into_iter().map(Value::Numeric).collect(),
                )
            })
            .collect();
        dataset.replace_column(index, replacement)?;
        Ok(dataset)
    }

    /// Project a vectorized dataset onto the selected columns, label last.
    pub fn select(&self, fitted: &FittedAlignment, mut dataset: Dataset) -> Result<Dataset> {
        check_same_schema(&fitted.expanded_schema, dataset.attributes(), "select")?;
        dataset.project(&fitted.selected)?;
        Ok(dataset)
    }

    pub fn transform(&self, fitted: &FittedAlignment, dataset: Dataset) -> Result<Dataset> {
        let vectorized = self.vectorize(fitted, dataset)?;
        self.select(fitted, vectorized)
    }
}

fn check_same_schema(expected: &[AttributeSpec], actual: &[AttributeSpec], stage: &str) -> Result<()> {
    if expected == actual {
        return Ok(());
    }
    let mismatch = expected
        .iter()
        .zip(actual)
        .position(|(a, b)| a != b)
        .unwrap_or_else(|| expected.len().min(actual.len()));
    Err(Error::IncompatibleSchema(format!(
        "{}: schemas differ at column {} ({} vs {} attributes)",
        stage,
        mismatch,
        expected.len(),
        actual.len()
    )))
}

fn text_column(dataset: &Dataset) -> Result<Option<usize>> {
    let mut text_columns = dataset
        .attributes()
        .iter()
        .enumerate()
        .filter(|(_, spec)| matches!(spec.kind(), AttributeKind::Text))
        .map(|(i, _)| i);
    let first = text_columns.next();
    if text_columns.next().is_some() {
        return Err(Error::IncompatibleSchema(
            "expected at most one text attribute".into(),
        ));
    }
    Ok(first)
}

fn texts(dataset: &Dataset, index: usize) -> Vec<&str> {
    dataset
        .column(index)
        .map(|value| value.as_text().unwrap_or(""))
        .collect()
}
