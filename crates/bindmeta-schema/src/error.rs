//! Errors for loading declaration inputs.
//!
//! Attribute misuse is not an error here: it is reported as a
//! [`SchemaViolation`](crate::violation::SchemaViolation) in a batch.

#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    #[error("failed to read file: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid declaration json at {path}: {source}")]
    ParseJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
