use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::WorkflowConfig;
use crate::core::{Error, Result};

/// Config file picked up from the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = ".vandalcheck.toml";

fn read_config_file(path: &Path) -> std::io::Result<String> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse config from a TOML string. Missing keys take their defaults.
pub fn parse_config(contents: &str) -> Result<WorkflowConfig> {
    toml::from_str::<WorkflowConfig>(contents)
        .map_err(|e| Error::Configuration(format!("failed to parse config: {e}")))
}

/// Try the implicit config file; an unreadable or invalid file is ignored.
fn try_load_config_from_path(config_path: &Path) -> Option<WorkflowConfig> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) => {
            handle_read_error(config_path, &e);
            return None;
        }
    };

    match parse_config(&contents) {
        Ok(config) => {
            log::debug!("Loaded config from {}", config_path.display());
            Some(config)
        }
        Err(e) => {
            log::warn!("{} in {}. Using defaults.", e, config_path.display());
            None
        }
    }
}

fn handle_read_error(config_path: &Path, error: &std::io::Error) {
    // Only log actual errors, not "file not found"
    if error.kind() != std::io::ErrorKind::NotFound {
        log::warn!(
            "Failed to read config file {}: {}",
            config_path.display(),
            error
        );
    }
}

/// Load the workflow configuration.
///
/// An explicit path must exist and parse. Without one, `.vandalcheck.toml`
/// in `dir` is used when present, falling back to defaults.
pub fn load_config(explicit: Option<&Path>, dir: &Path) -> Result<WorkflowConfig> {
    if let Some(path) = explicit {
        let contents = read_config_file(path)
            .map_err(|e| Error::file_system("failed to read config file", path, e))?;
        let config = parse_config(&contents)
            .map_err(|e| e.with_context(format!("config file {}", path.display())))?;
        log::debug!("Loaded config from {}", path.display());
        return Ok(config);
    }

    let implicit: PathBuf = dir.join(CONFIG_FILE_NAME);
    Ok(try_load_config_from_path(&implicit).unwrap_or_else(|| {
        log::debug!("No {} found. Using default config.", CONFIG_FILE_NAME);
        WorkflowConfig::default()
    }))
}
