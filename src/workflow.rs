//! End-to-end classification run: parse, extract, align, evaluate, predict
//! and report.

use crate::align::{AlignmentPipeline, FittedAlignment};
use crate::classify::{Classifier, CrossValidationReport};
use crate::config::WorkflowConfig;
use crate::core::{ChangeRecord, Error, Result, ResultExt};
use crate::dataset::{arff, Dataset};
use crate::features::FeatureExtractor;
use crate::io::{write_predictions, LogParser, Prediction};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, info_span};

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct WorkflowOutcome {
    /// One prediction per test record, in input order
    pub predictions: Vec<Prediction>,
    pub cross_validation: Option<CrossValidationReport>,
    /// Names of the columns kept by attribute selection, label excluded
    pub selected_attributes: Vec<String>,
    /// Test dataset after alignment with the predicted labels written back
    pub labelled_test: Dataset,
    pub report_path: PathBuf,
}

/// Serializable digest of a run, for machine-readable output.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary<'a> {
    pub report_path: &'a Path,
    pub predictions: &'a [Prediction],
    pub selected_attributes: &'a [String],
    pub cross_validation: Option<&'a CrossValidationReport>,
    pub accuracy: Option<f64>,
}

impl WorkflowOutcome {
    pub fn summary(&self) -> RunSummary<'_> {
        RunSummary {
            report_path: &self.report_path,
            predictions: &self.predictions,
            selected_attributes: &self.selected_attributes,
            cross_validation: self.cross_validation.as_ref(),
            accuracy: self.cross_validation.as_ref().map(|r| r.accuracy()),
        }
    }
}

/// Runs the whole pipeline for one train/test pair.
pub struct ClassificationWorkflow {
    config: WorkflowConfig,
    parser: LogParser,
    extractor: FeatureExtractor,
    pipeline: AlignmentPipeline,
    classifier: Box<dyn Classifier>,
}

impl ClassificationWorkflow {
    pub fn new(config: WorkflowConfig, classifier: Box<dyn Classifier>) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            parser: LogParser::new(config.delimiter.clone()),
            extractor: FeatureExtractor::new(config.classes.clone()),
            pipeline: AlignmentPipeline::with_defaults(config.attributes, config.max_vocabulary),
            classifier,
            config,
        })
    }

    /// Use the classifier named in the config.
    pub fn from_config(config: WorkflowConfig) -> Result<Self> {
        let classifier = config.classifier.build();
        Self::new(config, classifier)
    }

    /// Swap the alignment pipeline, e.g. for deterministic test stubs.
    pub fn with_pipeline(mut self, pipeline: AlignmentPipeline) -> Self {
        self.pipeline = pipeline;
        self
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn run(&self, train_path: &Path, test_path: &Path) -> Result<WorkflowOutcome> {
        let _span = info_span!("workflow", classifier = self.classifier.name()).entered();

        let train_records = self.parser.parse(train_path)?;
        let test_records = self.parser.parse(test_path)?;
        info!(
            train = train_records.len(),
            test = test_records.len(),
            "parsed change logs"
        );

        let train = self.extractor.extract(&train_records, true)?;
        let test = self.extractor.extract(&test_records, false)?;
        self.snapshot("train", train_path, "raw", &train)?;
        self.snapshot("test", test_path, "raw", &test)?;

        let fitted = self.pipeline.fit(&train)?;
        let train = self.align(&fitted, "train", train_path, train)?;
        let mut test = self.align(&fitted, "test", test_path, test)?;
        info!(
            columns = train.num_attributes(),
            selected = ?fitted.selected_names(),
            "aligned train and test datasets"
        );

        let cross_validation =
            self.classifier
                .cross_validate(&train, self.config.folds, self.config.seed)?;
        if let Some(report) = &cross_validation {
            info!(
                folds = report.folds,
                accuracy = report.accuracy(),
                "cross-validation finished"
            );
        }

        let model = self.classifier.fit(&train)?;
        let classes = model.predict(&test)?;
        test.set_labels(&classes)?;
        let predictions = predictions(&test_records, &test)?;

        write_predictions(&self.config.output, &predictions)?;

        Ok(WorkflowOutcome {
            predictions,
            cross_validation,
            selected_attributes: fitted
                .selected_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
            labelled_test: test,
            report_path: self.config.output.clone(),
        })
    }

    fn align(
        &self,
        fitted: &FittedAlignment,
        split: &str,
        source: &Path,
        dataset: Dataset,
    ) -> Result<Dataset> {
        let filtered = self.pipeline.vectorize(fitted, dataset)?;
        self.snapshot(split, source, "filtered", &filtered)?;
        let selected = self.pipeline.select(fitted, filtered)?;
        self.snapshot(split, source, "selected", &selected)?;
        Ok(selected)
    }

    /// Snapshots are named `<split>-<file stem>-<stage>.arff` so train and
    /// test logs sharing a file name never overwrite each other.
    fn snapshot(
        &self,
        split: &str,
        source: &Path,
        stage: &str,
        dataset: &Dataset,
    ) -> Result<()> {
        let Some(dir) = &self.config.snapshot_dir else {
            return Ok(());
        };
        let stem = source
            .file_stem()
            .map(|s| format!("{split}-{}", s.to_string_lossy()))
            .unwrap_or_else(|| split.to_string());
        arff::write_snapshot(dir, &stem, stage, dataset)
            .context(format!("writing {stage} snapshot"))?;
        Ok(())
    }
}

/// Pair each test record id with the label written back into its row.
fn predictions(records: &[ChangeRecord], labelled: &Dataset) -> Result<Vec<Prediction>> {
    let label_index = labelled.label_index();
    let spec = labelled.label_attribute();
    records
        .iter()
        .zip(labelled.rows())
        .map(|(record, row)| {
            let label = row[label_index]
                .as_discrete()
                .and_then(|class| spec.nominal_value(class))
                .ok_or_else(|| {
                    Error::capability(
                        "prediction",
                        format!("no label predicted for record {}", record.id()),
                    )
                })?;
            Ok(Prediction {
                id: record.id(),
                label: label.to_string(),
            })
        })
        .collect()
}
