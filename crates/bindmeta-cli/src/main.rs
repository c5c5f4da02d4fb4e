//! Bindmeta CLI: the `bindmeta` command.

mod cli;
mod commands;
mod support;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    support::init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            declarations,
            ledger,
            json,
        } => commands::check::run(declarations, ledger, json),

        Commands::Resolve { declarations, json } => commands::resolve::run(declarations, json),

        Commands::Schema { json } => commands::schema::run(json),

        Commands::Version {
            platform,
            min,
            descriptor,
            json,
        } => commands::version::run(platform, min, descriptor, json),

        Commands::Constants { descriptor, json } => commands::constants::run(descriptor, json),

        Commands::Substitute {
            template,
            descriptor,
            output,
        } => commands::substitute::run(template, descriptor, output),

        Commands::LedgerCheck {
            ledger,
            surface,
            json,
        } => commands::ledger_check::run(ledger, surface, json),
    }
}
