use crate::classify::ClassifierKind;
use crate::config::ConfigOverrides;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Cross-validation table and a one-line summary (default)
    #[default]
    Terminal,
    /// Run summary as JSON
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "vandalcheck")]
#[command(about = "Classify wiki edits as regular or vandalism", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Labelled training change log
    pub train: PathBuf,

    /// Unlabelled change log to classify
    pub test: PathBuf,

    /// Prediction report path [default: predictions.txt]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Number of attributes kept by selection [default: 40]
    #[arg(short = 'k', long = "attributes")]
    pub attributes: Option<usize>,

    /// Cross-validation folds [default: 10]
    #[arg(long)]
    pub folds: Option<usize>,

    /// Seed for fold assignment [default: 1]
    #[arg(long)]
    pub seed: Option<u64>,

    /// Field delimiter in the change logs [default: TAB]
    #[arg(long)]
    pub delimiter: Option<String>,

    /// Class labels, comma separated [default: regular,vandalism]
    #[arg(long, value_delimiter = ',')]
    pub classes: Option<Vec<String>>,

    /// Upper bound on the bag-of-words vocabulary [default: 1000]
    #[arg(long = "max-vocabulary")]
    pub max_vocabulary: Option<usize>,

    /// Learning algorithm
    #[arg(long, value_enum)]
    pub classifier: Option<ClassifierKind>,

    /// Write ARFF snapshots of intermediate datasets to this directory
    #[arg(long = "snapshot-dir")]
    pub snapshot_dir: Option<PathBuf>,

    /// How the run summary is printed to stdout
    #[arg(short, long, value_enum, default_value = "terminal")]
    pub format: OutputFormat,

    /// Configuration file [default: .vandalcheck.toml if present]
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl Cli {
    /// Flags that override the loaded configuration.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            classes: self.classes.clone(),
            attributes: self.attributes,
            delimiter: self.delimiter.clone(),
            folds: self.folds,
            seed: self.seed,
            max_vocabulary: self.max_vocabulary,
            output: self.output.clone(),
            snapshot_dir: self.snapshot_dir.clone(),
            classifier: self.classifier,
        }
    }

    /// Default log filter for the verbosity count; `RUST_LOG` takes precedence.
    pub fn log_filter(&self) -> &'static str {
        match self.verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}
