pub mod log_parser;
pub mod report;

pub use log_parser::{LogParser, DEFAULT_DELIMITER, HEADER_FIELDS};
pub use report::{format_predictions, write_predictions, Prediction};

use crate::core::{Error, Result};
use std::fs;
use std::path::Path;

/// Read a text file, replacing invalid UTF-8 sequences with U+FFFD.
///
/// Change logs are wiki dumps and occasionally carry Latin-1 bytes in user
/// names or edit text; those must not abort the run.
pub fn read_file(path: &Path) -> Result<String> {
    let bytes = fs::read(path).map_err(|e| Error::file_system("failed to read file", path, e))?;
    Ok(match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
    })
}

pub fn write_file(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| Error::file_system("failed to write file", path, e))
}

pub fn ensure_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        fs::create_dir_all(path)
            .map_err(|e| Error::file_system("failed to create directory", path, e))?;
    }
    Ok(())
}
