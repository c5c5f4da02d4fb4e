use crate::support::{
    EXIT_FINDINGS, load_declarations_or_exit, load_ledgers_or_exit, print_json_or_exit,
};
use bindmeta_ledger::LedgerParseError;
use bindmeta_schema::{ValidationReport, validate_set};
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct FileReport {
    path: String,
    #[serde(flatten)]
    report: ValidationReport,
}

/// Every diagnostic of one run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckDiagnostics {
    result: String,
    failure_classes: Vec<String>,
    files: Vec<FileReport>,
    ledger_parse_errors: Vec<LedgerParseError>,
}

pub fn run(declarations: Vec<String>, ledgers: Vec<String>, json_output: bool) {
    let files: Vec<FileReport> = declarations
        .into_iter()
        .map(|path| {
            let set = load_declarations_or_exit(&path);
            let report = validate_set(&set);
            tracing::debug!(path = %path, result = %report.result, "validated declarations");
            FileReport { path, report }
        })
        .collect();
    let ledger_parse_errors = load_ledgers_or_exit(&ledgers).errors;

    let failure_classes: Vec<String> = files
        .iter()
        .flat_map(|file| file.report.failure_classes.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let clean =
        files.iter().all(|file| file.report.is_accepted()) && ledger_parse_errors.is_empty();
    let diagnostics = CheckDiagnostics {
        result: if clean { "accepted" } else { "rejected" }.to_string(),
        failure_classes,
        files,
        ledger_parse_errors,
    };

    if json_output {
        print_json_or_exit(&diagnostics, "check");
    } else {
        print_human_summary(&diagnostics);
    }

    if !clean {
        std::process::exit(EXIT_FINDINGS);
    }
}

fn print_human_summary(diagnostics: &CheckDiagnostics) {
    println!("bindmeta check");
    for file in &diagnostics.files {
        println!(
            "  {}: {} ({} issue(s))",
            file.path,
            file.report.result,
            file.report.issues.len()
        );
        for issue in &file.report.issues {
            println!("    - {issue}");
        }
    }
    if !diagnostics.ledger_parse_errors.is_empty() {
        println!("  Ledger parse errors:");
        for error in &diagnostics.ledger_parse_errors {
            println!("    - {error}");
        }
    }
    println!("  Result: {}", diagnostics.result);
    if !diagnostics.failure_classes.is_empty() {
        println!("  Failure Classes: {}", diagnostics.failure_classes.join(", "));
    }
}
