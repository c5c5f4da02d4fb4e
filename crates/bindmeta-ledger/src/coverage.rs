//! Completeness check: native symbol surface vs. generated bindings.
//!
//! Every native symbol absent from the bound set must be acknowledged by an
//! exact ledger entry, otherwise it is a coverage gap. Ledger entries for
//! symbols that are bound, or that the native surface no longer has, are
//! stale and should be removed.

use crate::category::LedgerCategory;
use crate::error::LedgerError;
use crate::ledger::{LedgerEntry, MissingSymbolLedger};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::Path;

pub const COVERAGE_REPORT_KIND: &str = "bindmeta.ledger_coverage.v1";

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NativeSymbol {
    pub category: LedgerCategory,
    pub name: String,
}

/// The native symbol surface and the symbols generated bindings cover.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SymbolSurface {
    #[serde(default)]
    pub native: Vec<NativeSymbol>,
    #[serde(default)]
    pub bound: BTreeSet<String>,
}

impl SymbolSurface {
    pub fn from_json_str(text: &str, origin: &str) -> Result<Self, LedgerError> {
        serde_json::from_str(text).map_err(|source| LedgerError::ParseJson {
            path: origin.to_string(),
            source,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, LedgerError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| LedgerError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text, &path.display().to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StaleReason {
    /// The symbol is bound now.
    Bound,
    /// The native surface no longer exposes the symbol under this category.
    NotNative,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaleEntry {
    pub category: LedgerCategory,
    pub symbol: String,
    pub reason: StaleReason,
    pub origin: String,
    pub line: usize,
}

impl StaleEntry {
    fn new(entry: &LedgerEntry, reason: StaleReason) -> Self {
        Self {
            category: entry.category,
            symbol: entry.symbol.clone(),
            reason,
            origin: entry.origin.clone(),
            line: entry.line,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    pub report_kind: String,
    /// `complete` or `gaps`.
    pub result: String,
    pub gaps: Vec<NativeSymbol>,
    pub acknowledged: Vec<NativeSymbol>,
    pub stale: Vec<StaleEntry>,
}

impl CoverageReport {
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }
}

pub fn check_coverage(surface: &SymbolSurface, ledger: &MissingSymbolLedger) -> CoverageReport {
    let native: BTreeSet<&NativeSymbol> = surface.native.iter().collect();

    let mut gaps = Vec::new();
    let mut acknowledged = Vec::new();
    for symbol in &native {
        if surface.bound.contains(&symbol.name) {
            continue;
        }
        if ledger.is_acknowledged(&symbol.name, symbol.category) {
            acknowledged.push((*symbol).clone());
        } else {
            tracing::debug!(category = %symbol.category, symbol = %symbol.name, "coverage gap");
            gaps.push((*symbol).clone());
        }
    }

    let stale: Vec<StaleEntry> = ledger
        .entries()
        .filter_map(|entry| {
            if surface.bound.contains(&entry.symbol) {
                return Some(StaleEntry::new(entry, StaleReason::Bound));
            }
            let key = NativeSymbol {
                category: entry.category,
                name: entry.symbol.clone(),
            };
            (!native.contains(&key)).then(|| StaleEntry::new(entry, StaleReason::NotNative))
        })
        .collect();

    let result = if gaps.is_empty() { "complete" } else { "gaps" };
    CoverageReport {
        report_kind: COVERAGE_REPORT_KIND.to_string(),
        result: result.to_string(),
        gaps,
        acknowledged,
        stale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> SymbolSurface {
        SymbolSurface::from_json_str(
            r#"{
                "native": [
                    {"category": "missing-pinvoke", "name": "CFBundleGetInfo"},
                    {"category": "missing-pinvoke", "name": "CFBundleCopyURL"},
                    {"category": "missing-field", "name": "kCFBundleNameKey"},
                    {"category": "missing-protocol", "name": "NSCopying"},
                    {"category": "missing-pinvoke", "name": "CFBundleCopyURL"}
                ],
                "bound": ["CFBundleCopyURL", "NSCopying"]
            }"#,
            "surface.json",
        )
        .unwrap()
    }

    fn ledger() -> MissingSymbolLedger {
        MissingSymbolLedger::parse(
            "\
!missing-pinvoke! CFBundleGetInfo is not bound
!missing-protocol! NSCopying bound later
!missing-field! kCFBundleRemoved gone from sdk
!missing-pinvoke! kCFBundleNameKey wrong category
",
            "CoreFoundation.ignore",
        )
        .ledger
    }

    #[test]
    fn classifies_gaps_acknowledged_and_stale() {
        let report = check_coverage(&surface(), &ledger());
        assert!(!report.is_complete());
        assert_eq!(report.result, "gaps");
        let names = |symbols: &[NativeSymbol]| {
            symbols.iter().map(|s| s.name.clone()).collect::<Vec<_>>()
        };
        assert_eq!(names(&report.gaps), vec!["kCFBundleNameKey".to_string()]);
        assert_eq!(names(&report.acknowledged), vec!["CFBundleGetInfo".to_string()]);
        insta::assert_json_snapshot!(report.stale, @r#"
        [
          {
            "category": "missing-pinvoke",
            "symbol": "kCFBundleNameKey",
            "reason": "not_native",
            "origin": "CoreFoundation.ignore",
            "line": 4
          },
          {
            "category": "missing-field",
            "symbol": "kCFBundleRemoved",
            "reason": "not_native",
            "origin": "CoreFoundation.ignore",
            "line": 3
          },
          {
            "category": "missing-protocol",
            "symbol": "NSCopying",
            "reason": "bound",
            "origin": "CoreFoundation.ignore",
            "line": 2
          }
        ]
        "#);
    }

    #[test]
    fn complete_when_every_unbound_symbol_is_acknowledged() {
        let mut surface = surface();
        surface.bound.insert("kCFBundleNameKey".to_string());
        let report = check_coverage(&surface, &ledger());
        assert!(report.is_complete());
        assert_eq!(report.result, "complete");
    }

    #[test]
    fn malformed_surface_names_origin() {
        let err = SymbolSurface::from_json_str("{\"native\": 3}", "surface.json").unwrap_err();
        assert!(err.to_string().contains("surface.json"));
    }
}
