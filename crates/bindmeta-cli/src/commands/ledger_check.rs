use crate::support::{
    EXIT_FINDINGS, EXIT_INPUT, exit_with, load_ledgers_or_exit, print_json_or_exit,
};
use bindmeta_ledger::{CoverageReport, LedgerParseError, SymbolSurface, check_coverage};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LedgerCheckOutput {
    #[serde(flatten)]
    coverage: CoverageReport,
    ledger_entries: usize,
    ledger_parse_errors: Vec<LedgerParseError>,
}

pub fn run(ledgers: Vec<String>, surface: String, json_output: bool) {
    let parsed = load_ledgers_or_exit(&ledgers);
    let symbols = SymbolSurface::from_path(&surface).unwrap_or_else(|e| exit_with(EXIT_INPUT, e));
    let output = LedgerCheckOutput {
        coverage: check_coverage(&symbols, &parsed.ledger),
        ledger_entries: parsed.ledger.len(),
        ledger_parse_errors: parsed.errors,
    };

    if json_output {
        print_json_or_exit(&output, "ledger-check");
    } else {
        print_human_summary(&output);
    }

    if !output.coverage.is_complete() || !output.ledger_parse_errors.is_empty() {
        std::process::exit(EXIT_FINDINGS);
    }
}

fn print_human_summary(output: &LedgerCheckOutput) {
    let coverage = &output.coverage;
    println!("bindmeta ledger-check");
    println!("  Ledger entries: {}", output.ledger_entries);
    println!("  Acknowledged: {}", coverage.acknowledged.len());
    println!("  Gaps: {}", coverage.gaps.len());
    for gap in &coverage.gaps {
        println!("    - !{}! {}", gap.category, gap.name);
    }
    if !coverage.stale.is_empty() {
        println!("  Stale entries: {}", coverage.stale.len());
        for entry in &coverage.stale {
            println!(
                "    - {}:{} !{}! {} ({:?})",
                entry.origin, entry.line, entry.category, entry.symbol, entry.reason
            );
        }
    }
    for error in &output.ledger_parse_errors {
        println!("  Parse error: {error}");
    }
    println!("  Result: {}", coverage.result);
}
