use bindmeta_ledger::{MissingSymbolLedger, ParsedLedger};
use bindmeta_platform::{PlatformError, VersionConstants};
use bindmeta_schema::DeclarationSet;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

pub const EXIT_FINDINGS: i32 = 1;
pub const EXIT_INPUT: i32 = 2;
pub const EXIT_FATAL: i32 = 3;
pub const DEFAULT_LOG_FILTER: &str = "bindmeta=warn";

/// Structured logs go to stderr; stdout is reserved for reports.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

pub fn exit_with(code: i32, message: impl std::fmt::Display) -> ! {
    eprintln!("error: {message}");
    std::process::exit(code);
}

pub fn load_declarations_or_exit(path: &str) -> DeclarationSet {
    DeclarationSet::from_path(path).unwrap_or_else(|e| exit_with(EXIT_INPUT, e))
}

/// Unreadable descriptors exit 2; misconfigured ones are fatal and exit 3.
pub fn platform_exit_code(err: &PlatformError) -> i32 {
    if err.is_fatal() { EXIT_FATAL } else { EXIT_INPUT }
}

pub fn load_constants_or_exit(descriptor: &str) -> VersionConstants {
    VersionConstants::from_path(descriptor)
        .map(VersionConstants::with_env_overrides)
        .unwrap_or_else(|e| exit_with(platform_exit_code(&e), e))
}

/// Parse and merge ledgers in order.
pub fn load_ledgers_or_exit(paths: &[String]) -> ParsedLedger {
    let mut merged = ParsedLedger::default();
    for path in paths {
        let parsed =
            MissingSymbolLedger::from_path(path).unwrap_or_else(|e| exit_with(EXIT_INPUT, e));
        merged.merge(parsed);
    }
    merged
}

pub fn print_json_or_exit<T: Serialize>(value: &T, what: &str) {
    let rendered = serde_json::to_string_pretty(value).unwrap_or_else(|err| {
        exit_with(EXIT_INPUT, format!("failed to render {what} json: {err}"))
    });
    println!("{rendered}");
}
