//! Subcommand implementations.

use serde_json::Value;
use std::io::{self, Read};
use thiserror::Error;

pub mod canonicalize;
#[cfg(feature = "dev-tools")]
pub mod sign;
pub mod signature;
pub mod verify;

/// Input errors surfaced by the CLI before any check runs.
#[derive(Error, Debug)]
pub enum CliError {
    /// A file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
    /// A file is not valid JSON.
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
    /// A flag value could not be used.
    #[error("{0}")]
    InvalidArgument(String),
}

/// Reads and parses a JSON file.
pub fn read_json_file(path: &str) -> Result<Value, CliError> {
    let text = read_text_file(path)?;
    parse_json(path, &text)
}

/// Reads JSON from `path`, or from stdin when no path is given.
pub fn read_json_or_stdin(path: Option<&str>) -> Result<Value, CliError> {
    match path {
        Some(path) => read_json_file(path),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|source| CliError::Read {
                    path: "<stdin>".to_string(),
                    source,
                })?;
            parse_json("<stdin>", &buffer)
        }
    }
}

/// Reads a whole UTF-8 file.
pub fn read_text_file(path: &str) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })
}

fn parse_json(path: &str, text: &str) -> Result<Value, CliError> {
    serde_json::from_str(text).map_err(|source| CliError::Json {
        path: path.to_string(),
        source,
    })
}
