//! # Bindmeta Ledger
//!
//! The curated allow-list of native symbols deliberately left unbound.
//!
//! A completeness checker diffs the native symbol surface against the
//! generated bindings; anything unbound must be acknowledged here by an exact
//! `(category, symbol)` directive or it is reported as a coverage gap.

pub mod category;
pub mod coverage;
pub mod error;
pub mod ledger;

pub use category::LedgerCategory;
pub use coverage::{
    COVERAGE_REPORT_KIND, CoverageReport, NativeSymbol, StaleEntry, StaleReason, SymbolSurface,
    check_coverage,
};
pub use error::LedgerError;
pub use ledger::{LedgerEntry, LedgerParseError, MissingSymbolLedger, ParsedLedger};
