//! Error taxonomy for the issuance workflow
//!
//! Every stage returns `Result<T, PkiError>`. Nothing is retried: each variant
//! reflects either a configuration mistake or an environment problem, so the
//! caller propagates it to the top level and the process exits non-zero.

use std::path::PathBuf;

use crate::export::Artifact;

/// Errors produced while resolving, building or exporting the hierarchy
#[derive(Debug, thiserror::Error)]
pub enum PkiError {
    /// A value from `info.txt` or `hosts.txt` is missing or malformed
    #[error("invalid configuration value for `{field}`: {reason}")]
    Configuration { field: String, reason: String },

    /// An input file exists but could not be read
    #[error("failed to read input file {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The application config file could not be loaded
    #[error("failed to load application config {}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    /// The PKI engine could not produce a key pair or certificate
    #[error("key generation failed: {0}")]
    KeyGeneration(String),

    /// The generated leaf does not chain to the generated CA
    #[error("certificate chain verification failed: {0}")]
    ChainVerification(String),

    /// The PKI engine could not encode an artifact
    #[error("failed to encode {artifact}: {reason}")]
    Encoding { artifact: Artifact, reason: String },

    /// Two encodings of the same certificate disagree
    #[error("{artifact} does not match its certificate: {reason}")]
    InconsistentExport { artifact: Artifact, reason: String },

    /// The output directory could not be created
    #[error("failed to create output directory {}: {source}", path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An artifact could not be written to disk
    #[error("failed to write {artifact} to {}: {source}", path.display())]
    Export {
        artifact: Artifact,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl PkiError {
    pub(crate) fn configuration(field: impl Into<String>, reason: impl Into<String>) -> Self {
        PkiError::Configuration {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PkiError>;
