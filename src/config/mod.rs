//! Workflow configuration.
//!
//! A [`WorkflowConfig`] is an explicit value handed to the workflow. It is
//! built from defaults, optionally overlaid by a `.vandalcheck.toml` file,
//! and finally by command-line overrides.

mod loader;

pub use loader::{load_config, parse_config, CONFIG_FILE_NAME};

use crate::align::{DEFAULT_ATTRIBUTES, DEFAULT_MAX_VOCABULARY};
use crate::classify::ClassifierKind;
use crate::core::{Error, Result};
use crate::io::DEFAULT_DELIMITER;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

pub fn default_classes() -> Vec<String> {
    vec!["regular".to_string(), "vandalism".to_string()]
}

pub fn default_attributes() -> usize {
    DEFAULT_ATTRIBUTES
}

pub fn default_delimiter() -> String {
    DEFAULT_DELIMITER.to_string()
}

pub fn default_folds() -> usize {
    10
}

pub fn default_seed() -> u64 {
    1
}

pub fn default_max_vocabulary() -> usize {
    DEFAULT_MAX_VOCABULARY
}

pub fn default_output() -> PathBuf {
    PathBuf::from("predictions.txt")
}

/// Root configuration for a classification run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WorkflowConfig {
    /// Class labels, in the order used for the label domain
    #[serde(default = "default_classes")]
    pub classes: Vec<String>,

    /// Number of attributes kept by selection
    #[serde(default = "default_attributes")]
    pub attributes: usize,

    /// Field delimiter in the change logs
    #[serde(default = "default_delimiter")]
    pub delimiter: String,

    /// Cross-validation folds
    #[serde(default = "default_folds")]
    pub folds: usize,

    /// Seed for fold assignment
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Upper bound on the bag-of-words vocabulary
    #[serde(default = "default_max_vocabulary")]
    pub max_vocabulary: usize,

    /// Where the prediction report is written
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Directory for ARFF snapshots of intermediate datasets
    #[serde(default)]
    pub snapshot_dir: Option<PathBuf>,

    #[serde(default)]
    pub classifier: ClassifierKind,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            classes: default_classes(),
            attributes: default_attributes(),
            delimiter: default_delimiter(),
            folds: default_folds(),
            seed: default_seed(),
            max_vocabulary: default_max_vocabulary(),
            output: default_output(),
            snapshot_dir: None,
            classifier: ClassifierKind::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn validate(&self) -> Result<()> {
        if self.classes.is_empty() {
            return Err(Error::Configuration("at least one class is required".into()));
        }
        let mut seen = HashSet::new();
        for class in &self.classes {
            if class.is_empty() {
                return Err(Error::Configuration("class names must not be empty".into()));
            }
            if !seen.insert(class.as_str()) {
                return Err(Error::Configuration(format!("duplicate class '{class}'")));
            }
        }
        if self.attributes == 0 {
            return Err(Error::Configuration(
                "attributes must select at least one column".into(),
            ));
        }
        if self.folds < 2 {
            return Err(Error::Configuration(format!(
                "folds must be at least 2, got {}",
                self.folds
            )));
        }
        if self.delimiter.is_empty() {
            return Err(Error::Configuration("delimiter must not be empty".into()));
        }
        if self.max_vocabulary == 0 {
            return Err(Error::Configuration(
                "max_vocabulary must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// Overlay every value set in `overrides`.
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(classes) = overrides.classes {
            self.classes = classes;
        }
        if let Some(attributes) = overrides.attributes {
            self.attributes = attributes;
        }
        if let Some(delimiter) = overrides.delimiter {
            self.delimiter = delimiter;
        }
        if let Some(folds) = overrides.folds {
            self.folds = folds;
        }
        if let Some(seed) = overrides.seed {
            self.seed = seed;
        }
        if let Some(max_vocabulary) = overrides.max_vocabulary {
            self.max_vocabulary = max_vocabulary;
        }
        if let Some(output) = overrides.output {
            self.output = output;
        }
        if overrides.snapshot_dir.is_some() {
            self.snapshot_dir = overrides.snapshot_dir;
        }
        if let Some(classifier) = overrides.classifier {
            self.classifier = classifier;
        }
        self
    }
}

/// Values supplied on the command line; `None` keeps the configured value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub classes: Option<Vec<String>>,
    pub attributes: Option<usize>,
    pub delimiter: Option<String>,
    pub folds: Option<usize>,
    pub seed: Option<u64>,
    pub max_vocabulary: Option<usize>,
    pub output: Option<PathBuf>,
    pub snapshot_dir: Option<PathBuf>,
    pub classifier: Option<ClassifierKind>,
}
