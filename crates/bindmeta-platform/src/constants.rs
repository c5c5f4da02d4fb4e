//! Build-configured version constants.
//!
//! Ten named strings: SDK and minimum OS version per platform, the toolchain
//! version, and the minimum runtime version. They are loaded from a TOML
//! descriptor, optionally overridden from the environment, and spliced into
//! templates through `@NAME@` placeholders. Values are kept as raw strings;
//! parsing happens at the point of use.

use crate::error::PlatformError;
use crate::platform::Platform;
use crate::version::PlatformVersion;
use regex::Regex;
use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use std::sync::OnceLock;

pub const TOOLCHAIN_VERSION: &str = "TOOLCHAIN_VERSION";
pub const MIN_RUNTIME_VERSION: &str = "MIN_RUNTIME_VERSION";
pub const ENV_OVERRIDE_PREFIX: &str = "BINDMETA_";
pub const DEFAULT_DESCRIPTOR_PATH: &str = "bindmeta.toml";

/// Every placeholder name, in descriptor order.
pub fn placeholder_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Platform::ALL
        .into_iter()
        .flat_map(|platform| [platform.sdk_placeholder(), platform.min_placeholder()])
        .collect();
    names.push(TOOLCHAIN_VERSION);
    names.push(MIN_RUNTIME_VERSION);
    names
}

fn is_known_name(name: &str) -> bool {
    placeholder_names().contains(&name)
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"@([A-Z][A-Z0-9_]*)@").expect("placeholder regex must compile"))
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct Descriptor {
    toolchain: ToolchainSection,
    #[serde(default)]
    platforms: BTreeMap<String, PlatformSection>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ToolchainSection {
    version: String,
    min_runtime: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PlatformSection {
    sdk: String,
    min: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VersionConstants {
    values: BTreeMap<String, String>,
}

impl VersionConstants {
    /// Parse a descriptor. Every platform in the closed set must be present
    /// with both an `sdk` and a `min` entry.
    pub fn from_toml_str(text: &str, origin: &str) -> Result<Self, PlatformError> {
        let descriptor: Descriptor =
            toml::from_str(text).map_err(|source| PlatformError::ParseToml {
                path: origin.to_string(),
                source,
            })?;

        let mut values = BTreeMap::new();
        let mut seen: BTreeMap<Platform, String> = BTreeMap::new();
        for (key, section) in descriptor.platforms {
            let platform: Platform = key.parse()?;
            if let Some(first) = seen.get(&platform) {
                return Err(PlatformError::DuplicatePlatform {
                    platform,
                    keys: vec![first.clone(), key],
                });
            }
            seen.insert(platform, key);
            values.insert(platform.sdk_placeholder().to_string(), section.sdk);
            values.insert(platform.min_placeholder().to_string(), section.min);
        }
        for platform in Platform::ALL {
            if !values.contains_key(platform.sdk_placeholder()) {
                return Err(PlatformError::MissingConstant {
                    name: platform.sdk_placeholder().to_string(),
                });
            }
        }
        values.insert(TOOLCHAIN_VERSION.to_string(), descriptor.toolchain.version);
        values.insert(MIN_RUNTIME_VERSION.to_string(), descriptor.toolchain.min_runtime);
        tracing::debug!(origin, constants = values.len(), "loaded version descriptor");
        Ok(Self { values })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, PlatformError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PlatformError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text, &path.display().to_string())
    }

    /// Replace constants for which `lookup("BINDMETA_<NAME>")` yields a value.
    pub fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        for name in placeholder_names() {
            let var = format!("{ENV_OVERRIDE_PREFIX}{name}");
            if let Some(value) = lookup(&var) {
                tracing::debug!(name, value = %value, "version constant overridden");
                self.values.insert(name.to_string(), value);
            }
        }
        self
    }

    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|var| std::env::var(var).ok())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Set a constant by placeholder name.
    pub fn set(&mut self, name: &str, value: impl Into<String>) -> Result<(), PlatformError> {
        if !is_known_name(name) {
            return Err(PlatformError::UnknownPlaceholders {
                names: vec![name.to_string()],
            });
        }
        self.values.insert(name.to_string(), value.into());
        Ok(())
    }

    /// Parse the named constant.
    pub fn parse(&self, name: &str) -> Result<PlatformVersion, PlatformError> {
        let value = self
            .get(name)
            .ok_or_else(|| PlatformError::MissingConstant {
                name: name.to_string(),
            })?;
        value.parse().map_err(|err| match err {
            PlatformError::InvalidVersion { reason, .. } => PlatformError::InvalidConstant {
                name: name.to_string(),
                value: value.to_string(),
                reason,
            },
            other => other,
        })
    }

    /// `(name, value)` pairs in name order.
    pub fn placeholders(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Every constant that is missing or does not parse.
    pub fn validate(&self) -> Vec<PlatformError> {
        placeholder_names()
            .into_iter()
            .filter_map(|name| self.parse(name).err())
            .collect()
    }

    /// Replace every `@NAME@` in `template`. Unknown names fail the whole
    /// substitution and are all listed.
    pub fn substitute(&self, template: &str) -> Result<String, PlatformError> {
        let mut unknown = BTreeSet::new();
        let output = placeholder_re().replace_all(template, |caps: &regex::Captures<'_>| {
            let name = &caps[1];
            match self.get(name) {
                Some(value) => value.to_string(),
                None => {
                    unknown.insert(name.to_string());
                    caps[0].to_string()
                }
            }
        });
        if !unknown.is_empty() {
            return Err(PlatformError::UnknownPlaceholders {
                names: unknown.into_iter().collect(),
            });
        }
        Ok(output.into_owned())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) const DESCRIPTOR: &str = r#"
[toolchain]
version = "17.0.0"
min_runtime = "6.0"

[platforms.macos]
sdk = "14.2"
min = "10.15"

[platforms.ios]
sdk = "17.2"
min = "11.0"

[platforms.watchos]
sdk = "10.2"
min = "4.0"

[platforms.tvos]
sdk = "17.2"
min = "11.0"
"#;

    pub(crate) fn constants() -> VersionConstants {
        VersionConstants::from_toml_str(DESCRIPTOR, "inline").unwrap()
    }

    #[test]
    fn loads_all_ten_constants() {
        let constants = constants();
        assert_eq!(constants.placeholders().count(), 10);
        assert_eq!(constants.get("MACOS_SDK_VERSION"), Some("14.2"));
        assert_eq!(constants.get("MIN_WATCHOS_VERSION"), Some("4.0"));
        assert_eq!(constants.get(TOOLCHAIN_VERSION), Some("17.0.0"));
        assert_eq!(constants.get(MIN_RUNTIME_VERSION), Some("6.0"));
        assert!(constants.validate().is_empty());
    }

    #[test]
    fn missing_platform_is_rejected() {
        let text = DESCRIPTOR.replace("[platforms.tvos]\nsdk = \"17.2\"\nmin = \"11.0\"\n", "");
        let err = VersionConstants::from_toml_str(&text, "inline").unwrap_err();
        assert!(
            matches!(
                err,
                PlatformError::MissingConstant { ref name } if name == "TVOS_SDK_VERSION"
            ),
            "{err}"
        );
    }

    #[test]
    fn unknown_platform_key_is_unsupported() {
        let text = format!("{DESCRIPTOR}\n[platforms.visionos]\nsdk = \"1.0\"\nmin = \"1.0\"\n");
        let err = VersionConstants::from_toml_str(&text, "inline").unwrap_err();
        assert!(matches!(err, PlatformError::UnsupportedPlatform(ref id) if id == "visionos"));
    }

    #[test]
    fn platform_keys_differing_only_in_case_are_rejected() {
        let text = format!("{DESCRIPTOR}\n[platforms.iOS]\nsdk = \"99.0\"\nmin = \"1.0\"\n");
        let err = VersionConstants::from_toml_str(&text, "inline").unwrap_err();
        match &err {
            PlatformError::DuplicatePlatform { platform, keys } => {
                assert_eq!(*platform, Platform::IOS);
                assert_eq!(keys, &vec!["iOS".to_string(), "ios".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.is_fatal());
    }

    #[test]
    fn malformed_toml_names_origin() {
        let err = VersionConstants::from_toml_str("[toolchain", "bindmeta.toml").unwrap_err();
        assert!(matches!(err, PlatformError::ParseToml { .. }));
        assert!(err.to_string().contains("bindmeta.toml"));
    }

    #[test]
    fn overrides_replace_named_constants() {
        let constants = constants().with_overrides(|var| {
            (var == "BINDMETA_IOS_SDK_VERSION").then(|| "17.4".to_string())
        });
        assert_eq!(constants.get("IOS_SDK_VERSION"), Some("17.4"));
        assert_eq!(constants.get("TVOS_SDK_VERSION"), Some("17.2"));
    }

    #[test]
    fn validate_lists_every_invalid_constant() {
        let mut constants = constants();
        constants.set("MIN_IOS_VERSION", "eleven").unwrap();
        constants.set(TOOLCHAIN_VERSION, "17..0").unwrap();
        let errors = constants.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors.iter().all(PlatformError::is_fatal));
        let rendered: Vec<String> = errors.iter().map(ToString::to_string).collect();
        assert!(rendered.iter().any(|line| line.contains("MIN_IOS_VERSION")));
        assert!(rendered.iter().any(|line| line.contains(TOOLCHAIN_VERSION)));
    }

    #[test]
    fn set_rejects_unknown_names() {
        let mut constants = constants();
        assert!(constants.set("VISIONOS_SDK_VERSION", "1.0").is_err());
    }

    #[test]
    fn substitute_replaces_every_occurrence() {
        let template =
            "sdk=@IOS_SDK_VERSION@ min=@MIN_IOS_VERSION@ again=@IOS_SDK_VERSION@ mail@host";
        let output = constants().substitute(template).unwrap();
        assert_eq!(output, "sdk=17.2 min=11.0 again=17.2 mail@host");
    }

    #[test]
    fn substitute_reports_all_unknown_placeholders() {
        let err = constants()
            .substitute("@IOS_SDK_VERSION@ @NOPE@ @ALSO_NOPE@ @NOPE@")
            .unwrap_err();
        match err {
            PlatformError::UnknownPlaceholders { names } => {
                assert_eq!(names, vec!["ALSO_NOPE".to_string(), "NOPE".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
