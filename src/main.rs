use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use vandalcheck::cli::{Cli, OutputFormat};
use vandalcheck::config::load_config;
use vandalcheck::workflow::ClassificationWorkflow;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    let cwd = std::env::current_dir().context("failed to read the working directory")?;
    let config = load_config(cli.config.as_deref(), &cwd)?.merge(cli.overrides());
    let workflow = ClassificationWorkflow::from_config(config)?;

    let outcome = workflow
        .run(&cli.train, &cli.test)
        .with_context(|| {
            format!(
                "failed to classify {} using {}",
                cli.test.display(),
                cli.train.display()
            )
        })?;

    match cli.format {
        OutputFormat::Terminal => {
            if let Some(report) = &outcome.cross_validation {
                println!("{report}");
            }
            println!(
                "Wrote {} predictions to {}",
                outcome.predictions.len(),
                outcome.report_path.display()
            );
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome.summary())?);
        }
    }
    Ok(())
}

fn init_logging(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
