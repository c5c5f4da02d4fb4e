//! Line-oriented ledger files.
//!
//! Each non-blank, non-comment line is a directive:
//!
//! ```text
//! # comment
//! !missing-pinvoke! CFBundleGetPackageInfoInDirectory is not bound
//! !unknown-native-enum! AVAudioSessionInterruptionOptions is not bound
//! ```
//!
//! Directives are order-independent and keyed by `(category, symbol)`.
//! Acknowledgment is exact: no wildcards, no prefixes.

use crate::category::LedgerCategory;
use crate::error::LedgerError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

pub const COMMENT_MARKER: char = '#';

fn directive_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^!([^!\s]*)!\s+(\S+)(?:\s+(.*))?$").expect("directive regex must compile")
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct LedgerEntry {
    pub category: LedgerCategory,
    pub symbol: String,
    /// Human-readable justification, e.g. `is not bound`.
    pub status: String,
    pub origin: String,
    pub line: usize,
}

/// A malformed directive line. The line is skipped; parsing continues.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{origin}:{line}: {reason}: `{raw}`")]
pub struct LedgerParseError {
    pub origin: String,
    pub line: usize,
    pub raw: String,
    pub reason: String,
}

/// A ledger together with the lines that could not be parsed.
#[derive(Debug, Clone, Default)]
pub struct ParsedLedger {
    pub ledger: MissingSymbolLedger,
    pub errors: Vec<LedgerParseError>,
}

impl ParsedLedger {
    /// Fold another parse result in; the first entry per key is kept.
    pub fn merge(&mut self, other: ParsedLedger) {
        self.ledger.merge(other.ledger);
        self.errors.extend(other.errors);
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissingSymbolLedger {
    entries: BTreeMap<(LedgerCategory, String), LedgerEntry>,
}

impl MissingSymbolLedger {
    pub fn parse(text: &str, origin: &str) -> ParsedLedger {
        let mut ledger = Self::default();
        let mut errors = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with(COMMENT_MARKER) {
                continue;
            }
            match parse_directive(trimmed, origin, line_no + 1) {
                Ok(entry) => {
                    ledger.insert(entry);
                }
                Err(reason) => {
                    let error = LedgerParseError {
                        origin: origin.to_string(),
                        line: line_no + 1,
                        raw: trimmed.to_string(),
                        reason,
                    };
                    tracing::warn!(%error, "skipping malformed ledger line");
                    errors.push(error);
                }
            }
        }
        tracing::debug!(origin, entries = ledger.len(), errors = errors.len(), "parsed ledger");
        ParsedLedger { ledger, errors }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<ParsedLedger, LedgerError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LedgerError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self::parse(&text, &path.display().to_string()))
    }

    /// Insert unless `(category, symbol)` is already present. Returns whether
    /// the entry was added.
    pub fn insert(&mut self, entry: LedgerEntry) -> bool {
        let key = (entry.category, entry.symbol.clone());
        if let Some(existing) = self.entries.get(&key) {
            tracing::warn!(
                category = %entry.category,
                symbol = %entry.symbol,
                first = %format!("{}:{}", existing.origin, existing.line),
                duplicate = %format!("{}:{}", entry.origin, entry.line),
                "duplicate ledger directive"
            );
            return false;
        }
        self.entries.insert(key, entry);
        true
    }

    pub fn merge(&mut self, other: MissingSymbolLedger) {
        for entry in other.entries.into_values() {
            self.insert(entry);
        }
    }

    /// True only for an exact `(symbol, category)` match.
    pub fn is_acknowledged(&self, symbol: &str, category: LedgerCategory) -> bool {
        self.entries.contains_key(&(category, symbol.to_string()))
    }

    pub fn get(&self, symbol: &str, category: LedgerCategory) -> Option<&LedgerEntry> {
        self.entries.get(&(category, symbol.to_string()))
    }

    /// Entries ordered by `(category, symbol)`.
    pub fn entries(&self) -> impl Iterator<Item = &LedgerEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn parse_directive(line: &str, origin: &str, line_no: usize) -> Result<LedgerEntry, String> {
    let caps = directive_re()
        .captures(line)
        .ok_or_else(|| "expected `!<category>! <symbol> <status>`".to_string())?;
    let category: LedgerCategory = caps[1].parse()?;
    let status = caps
        .get(3)
        .map(|m| m.as_str().trim())
        .filter(|status| !status.is_empty())
        .ok_or_else(|| format!("missing status phrase for `{}`", &caps[2]))?;
    Ok(LedgerEntry {
        category,
        symbol: caps[2].to_string(),
        status: status.to_string(),
        origin: origin.to_string(),
        line: line_no,
    })
}
