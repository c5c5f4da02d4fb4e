use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "bindmeta",
    about = "Bindmeta: attribute schema checks, platform version constants, and missing-symbol ledgers",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate declaration files and report every schema violation
    Check {
        /// Declaration JSON files
        #[arg(required = true)]
        declarations: Vec<String>,

        /// Ledger files to parse alongside (malformed lines are reported)
        #[arg(long)]
        ledger: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve one declaration file into fully-populated binding records
    Resolve {
        /// Declaration JSON file
        declarations: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the attribute schema registry
    Schema {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Resolve the SDK (or minimum) version for one platform
    Version {
        /// Platform identifier: macOS, iOS, watchOS, or tvOS
        platform: String,

        /// Report the minimum supported OS version instead of the SDK version
        #[arg(long)]
        min: bool,

        /// Path to the toolchain descriptor
        #[arg(long, default_value = "bindmeta.toml")]
        descriptor: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List and validate every configured version constant
    Constants {
        /// Path to the toolchain descriptor
        #[arg(long, default_value = "bindmeta.toml")]
        descriptor: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace @NAME@ placeholders in a template with version constants
    Substitute {
        /// Template file
        #[arg(long)]
        template: String,

        /// Path to the toolchain descriptor
        #[arg(long, default_value = "bindmeta.toml")]
        descriptor: String,

        /// Write the result here instead of stdout
        #[arg(long)]
        output: Option<String>,
    },

    /// Compare the native symbol surface against bindings and the ledger
    LedgerCheck {
        /// Ledger files, merged in order (first directive per key wins)
        #[arg(long, required = true)]
        ledger: Vec<String>,

        /// Symbol surface JSON: {"native": [{category, name}], "bound": [name]}
        #[arg(long)]
        surface: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}
