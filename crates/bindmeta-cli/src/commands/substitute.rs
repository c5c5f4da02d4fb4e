use crate::support::{EXIT_FINDINGS, EXIT_INPUT, exit_with, load_constants_or_exit};

pub fn run(template: String, descriptor: String, output: Option<String>) {
    let constants = load_constants_or_exit(&descriptor);
    let text = std::fs::read_to_string(&template)
        .unwrap_or_else(|e| exit_with(EXIT_INPUT, format!("failed to read {template}: {e}")));
    let rendered = constants
        .substitute(&text)
        .unwrap_or_else(|e| exit_with(EXIT_FINDINGS, format!("{template}: {e}")));

    match output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .unwrap_or_else(|e| exit_with(EXIT_INPUT, format!("failed to write {path}: {e}")));
            tracing::debug!(template = %template, output = %path, "substituted template");
        }
        None => print!("{rendered}"),
    }
}
