//! Errors for version constants and the platform resolver.

use crate::platform::Platform;

#[derive(Debug, thiserror::Error)]
pub enum PlatformError {
    #[error("unsupported platform `{0}` (expected one of macOS, iOS, watchOS, tvOS)")]
    UnsupportedPlatform(String),

    #[error("invalid version `{input}`: {reason}")]
    InvalidVersion { input: String, reason: String },

    #[error("version constant {name} = `{value}` is invalid: {reason}")]
    InvalidConstant {
        name: String,
        value: String,
        reason: String,
    },

    #[error("platform {platform} is configured more than once: {}", keys.join(", "))]
    DuplicatePlatform { platform: Platform, keys: Vec<String> },

    #[error("version constant {name} is not configured")]
    MissingConstant { name: String },

    #[error("unknown placeholder(s): {}", names.join(", "))]
    UnknownPlaceholders { names: Vec<String> },

    #[error("failed to read file: {path}: {source}")]
    ReadFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid toml at {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

impl PlatformError {
    /// Tooling misconfiguration rather than unreadable input.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedPlatform(_)
                | Self::InvalidVersion { .. }
                | Self::InvalidConstant { .. }
                | Self::MissingConstant { .. }
                | Self::DuplicatePlatform { .. }
        )
    }
}
