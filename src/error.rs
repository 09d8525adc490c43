//! Error taxonomy for a single `generate` call.
//!
//! All three variants are terminal: inference is pure and deterministic, so
//! retrying the same input reproduces the same failure. Exit codes and
//! presentation are the caller's problem.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// The input byte stream is not a well-formed JSON document.
    #[error("failed to decode JSON input: {0}")]
    DecodeJson(#[from] serde_json::Error),

    /// The input byte stream is not a well-formed YAML document.
    #[error("failed to decode YAML input: {0}")]
    DecodeYaml(#[from] serde_yaml::Error),

    /// The document decoded, but its top level carries no inferable field
    /// shape (a scalar, an empty sequence, or a sequence of non-mappings).
    #[error("unsupported top-level shape: {0}")]
    UnsupportedShape(String),

    /// The emitter produced source the formatter rejects. This is always an
    /// internal consistency bug, never a user input problem; the offending
    /// generated source is attached for diagnosis.
    #[error("error formatting generated source: {message}, was formatting:\n{source_text}")]
    Emit {
        message: String,
        source_text: String,
    },
}
