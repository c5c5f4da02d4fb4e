use crate::support::{EXIT_FINDINGS, load_declarations_or_exit, print_json_or_exit};
use bindmeta_schema::{
    BorrowedByDefault, DefaultCtor, ResolvedDeclaration, ValidationReport, resolve_set,
};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResolveOutput<'a> {
    path: &'a str,
    report: &'a ValidationReport,
    /// Empty when the report is rejected; emission halts on any violation.
    declarations: &'a [ResolvedDeclaration],
}

pub fn run(declarations: String, json_output: bool) {
    let set = load_declarations_or_exit(&declarations);
    let resolution = resolve_set(&set, &BorrowedByDefault);
    let accepted = resolution.report.is_accepted();
    let emitted: &[ResolvedDeclaration] = if accepted {
        &resolution.declarations
    } else {
        &[]
    };

    if json_output {
        let output = ResolveOutput {
            path: &declarations,
            report: &resolution.report,
            declarations: emitted,
        };
        print_json_or_exit(&output, "resolve");
    } else {
        println!("bindmeta resolve");
        println!("  File: {declarations}");
        println!("  Result: {}", resolution.report.result);
        for issue in &resolution.report.issues {
            println!("    - {issue}");
        }
        for declaration in emitted {
            println!(
                "  {} ({} member(s), default ctor: {})",
                declaration.name,
                declaration.members.len(),
                describe_default_ctor(declaration)
            );
        }
    }

    if !accepted {
        std::process::exit(EXIT_FINDINGS);
    }
}

fn describe_default_ctor(declaration: &ResolvedDeclaration) -> String {
    match declaration.default_ctor {
        DefaultCtor::Emit { visibility } => visibility.to_string(),
        DefaultCtor::Omit => "omitted".to_string(),
    }
}
