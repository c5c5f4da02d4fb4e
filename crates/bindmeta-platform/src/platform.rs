//! The closed set of platforms a binding build targets.

use crate::error::PlatformError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    MacOS,
    #[serde(rename = "ios")]
    IOS,
    WatchOS,
    TvOS,
}

impl Platform {
    pub const ALL: [Platform; 4] = [Self::MacOS, Self::IOS, Self::WatchOS, Self::TvOS];

    /// Display name, e.g. `watchOS`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MacOS => "macOS",
            Self::IOS => "iOS",
            Self::WatchOS => "watchOS",
            Self::TvOS => "tvOS",
        }
    }

    /// Descriptor table key, e.g. `watchos`.
    pub fn key(self) -> &'static str {
        match self {
            Self::MacOS => "macos",
            Self::IOS => "ios",
            Self::WatchOS => "watchos",
            Self::TvOS => "tvos",
        }
    }

    /// Placeholder name of the SDK version constant.
    pub fn sdk_placeholder(self) -> &'static str {
        match self {
            Self::MacOS => "MACOS_SDK_VERSION",
            Self::IOS => "IOS_SDK_VERSION",
            Self::WatchOS => "WATCHOS_SDK_VERSION",
            Self::TvOS => "TVOS_SDK_VERSION",
        }
    }

    /// Placeholder name of the minimum OS version constant.
    pub fn min_placeholder(self) -> &'static str {
        match self {
            Self::MacOS => "MIN_MACOS_VERSION",
            Self::IOS => "MIN_IOS_VERSION",
            Self::WatchOS => "MIN_WATCHOS_VERSION",
            Self::TvOS => "MIN_TVOS_VERSION",
        }
    }
}

impl std::str::FromStr for Platform {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|platform| platform.key() == lowered)
            .ok_or_else(|| PlatformError::UnsupportedPlatform(s.to_string()))
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("macOS".parse::<Platform>().unwrap(), Platform::MacOS);
        assert_eq!("IOS".parse::<Platform>().unwrap(), Platform::IOS);
        assert_eq!("watchos".parse::<Platform>().unwrap(), Platform::WatchOS);
        assert_eq!(" tvOS ".parse::<Platform>().unwrap(), Platform::TvOS);
    }

    #[test]
    fn rejects_identifiers_outside_closed_set() {
        for text in ["visionOS", "macCatalyst", "linux", ""] {
            let err = text.parse::<Platform>().unwrap_err();
            assert!(matches!(err, PlatformError::UnsupportedPlatform(_)));
            assert!(err.is_fatal());
        }
    }

    #[test]
    fn display_round_trips_through_parse() {
        for platform in Platform::ALL {
            assert_eq!(platform.to_string().parse::<Platform>().unwrap(), platform);
        }
    }
}
