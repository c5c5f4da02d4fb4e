//! # Bindmeta Platform
//!
//! SDK and minimum OS versions for the closed platform set
//! {macOS, iOS, watchOS, tvOS}, plus the toolchain and minimum runtime
//! versions. Constants come from a TOML descriptor and reach generated
//! sources through `@NAME@` placeholder substitution.

pub mod constants;
pub mod error;
pub mod platform;
pub mod resolver;
pub mod version;

pub use constants::{
    DEFAULT_DESCRIPTOR_PATH, ENV_OVERRIDE_PREFIX, MIN_RUNTIME_VERSION, TOOLCHAIN_VERSION,
    VersionConstants, placeholder_names,
};
pub use error::PlatformError;
pub use platform::Platform;
pub use resolver::VersionResolver;
pub use version::PlatformVersion;
