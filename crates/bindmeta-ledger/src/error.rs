//! Errors for ledger and symbol-surface inputs.
//!
//! Malformed directive lines are not errors here: they are collected as
//! [`LedgerParseError`](crate::ledger::LedgerParseError) and skipped.

#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("failed to read file: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid symbol surface json at {path}: {source}")]
    ParseJson {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}
