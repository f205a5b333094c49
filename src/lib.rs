//! Wiki vandalism detection.
//!
//! Raw change logs are parsed into [`ChangeRecord`]s, turned into feature
//! rows, aligned so train and test share one column layout, and classified.
//! [`ClassificationWorkflow`] drives the whole run.

pub mod align;
pub mod classify;
pub mod cli;
pub mod config;
pub mod core;
pub mod dataset;
pub mod features;
pub mod io;
pub mod workflow;

// Re-export commonly used types
pub use crate::align::{AlignedDatasets, AlignmentPipeline, FittedAlignment};
pub use crate::classify::{Classifier, ClassifierKind, CrossValidationReport, Model};
pub use crate::config::WorkflowConfig;
pub use crate::core::{ChangeRecord, Comment, Edit, EditKind, Error, Label, Result};
pub use crate::dataset::{AttributeKind, AttributeSpec, Dataset, Value};
pub use crate::features::FeatureExtractor;
pub use crate::io::{LogParser, Prediction};
pub use crate::workflow::{ClassificationWorkflow, WorkflowOutcome};
