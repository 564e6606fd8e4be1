use std::path::PathBuf;
use thiserror::Error;

/// Core error types.
///
/// Expected verification failures are reported inside the verification
/// result; these errors cover inputs the verifier cannot even start on.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Canonicalization error.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] trustreceipt_canonical::CanonicalizationError),
    /// Receipt (de)serialization failed.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Receipt document has an unusable shape.
    #[error("invalid receipt: {0}")]
    InvalidReceipt(String),
    /// Supplied content could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that was being read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A schema could not be compiled into a validator.
    #[error("schema compile error: {0}")]
    SchemaCompile(String),
    /// Verifier configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
