//! Per-platform version lookup over the configured constants.

use crate::constants::{MIN_RUNTIME_VERSION, TOOLCHAIN_VERSION, VersionConstants};
use crate::error::PlatformError;
use crate::platform::Platform;
use crate::version::PlatformVersion;

/// Resolves SDK and minimum OS versions.
///
/// Every lookup parses the current constant string; nothing is cached, so a
/// reconfigured constant is observed on the next call.
#[derive(Debug, Clone)]
pub struct VersionResolver {
    constants: VersionConstants,
}

impl VersionResolver {
    pub fn new(constants: VersionConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &VersionConstants {
        &self.constants
    }

    /// Reconfigure one constant by placeholder name.
    pub fn set_constant(
        &mut self,
        name: &str,
        value: impl Into<String>,
    ) -> Result<(), PlatformError> {
        self.constants.set(name, value)
    }

    /// SDK version for a platform identifier such as `"iOS"`.
    pub fn version_for(&self, platform: &str) -> Result<PlatformVersion, PlatformError> {
        self.sdk_version(platform.parse()?)
    }

    /// Minimum supported OS version for a platform identifier.
    pub fn min_version_for(&self, platform: &str) -> Result<PlatformVersion, PlatformError> {
        self.min_version(platform.parse()?)
    }

    pub fn sdk_version(&self, platform: Platform) -> Result<PlatformVersion, PlatformError> {
        tracing::debug!(%platform, "resolving sdk version");
        self.constants.parse(platform.sdk_placeholder())
    }

    pub fn min_version(&self, platform: Platform) -> Result<PlatformVersion, PlatformError> {
        tracing::debug!(%platform, "resolving minimum version");
        self.constants.parse(platform.min_placeholder())
    }

    pub fn toolchain_version(&self) -> Result<PlatformVersion, PlatformError> {
        self.constants.parse(TOOLCHAIN_VERSION)
    }

    pub fn min_runtime_version(&self) -> Result<PlatformVersion, PlatformError> {
        self.constants.parse(MIN_RUNTIME_VERSION)
    }

    /// Whether `version` satisfies the platform's minimum.
    pub fn supports(
        &self,
        platform: Platform,
        version: &PlatformVersion,
    ) -> Result<bool, PlatformError> {
        Ok(*version >= self.min_version(platform)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::tests::constants;

    fn resolver() -> VersionResolver {
        VersionResolver::new(constants())
    }

    #[test]
    fn resolves_sdk_and_min_versions() {
        let resolver = resolver();
        assert_eq!(resolver.version_for("iOS").unwrap().to_string(), "17.2");
        assert_eq!(resolver.min_version_for("macos").unwrap().to_string(), "10.15");
        assert_eq!(resolver.toolchain_version().unwrap().to_string(), "17.0.0");
        assert_eq!(resolver.min_runtime_version().unwrap().to_string(), "6.0");
        assert!(resolver.version_for("iOS").unwrap() >= resolver.min_version_for("iOS").unwrap());
    }

    #[test]
    fn unsupported_platform_is_fatal() {
        let err = resolver().version_for("visionOS").unwrap_err();
        assert!(matches!(err, PlatformError::UnsupportedPlatform(_)));
        assert!(err.is_fatal());
        assert!(resolver().min_version_for("").is_err());
    }

    #[test]
    fn reconfigured_constant_is_observed_on_next_access() {
        let mut resolver = resolver();
        assert_eq!(resolver.sdk_version(Platform::TvOS).unwrap().to_string(), "17.2");
        resolver.set_constant("TVOS_SDK_VERSION", "18.0").unwrap();
        assert_eq!(resolver.sdk_version(Platform::TvOS).unwrap().to_string(), "18.0");
    }

    #[test]
    fn invalid_constant_surfaces_on_access() {
        let mut resolver = resolver();
        resolver.set_constant("MIN_WATCHOS_VERSION", "4.x").unwrap();
        let err = resolver.min_version(Platform::WatchOS).unwrap_err();
        assert!(matches!(
            err,
            PlatformError::InvalidConstant { ref name, .. } if name == "MIN_WATCHOS_VERSION"
        ));
    }

    #[test]
    fn supports_compares_against_minimum() {
        let resolver = resolver();
        let v = |text: &str| text.parse::<PlatformVersion>().unwrap();
        assert!(resolver.supports(Platform::MacOS, &v("10.15")).unwrap());
        assert!(resolver.supports(Platform::MacOS, &v("11")).unwrap());
        assert!(!resolver.supports(Platform::MacOS, &v("10.9")).unwrap());
    }
}
