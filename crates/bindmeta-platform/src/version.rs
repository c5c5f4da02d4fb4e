//! Dot-separated numeric versions.
//!
//! Ordering is numeric per component, with missing trailing components
//! treated as zero: `10.10 > 9.9` and `14.2 == 14.2.0`.

use crate::error::PlatformError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

pub const MAX_COMPONENTS: usize = 4;

#[derive(Debug, Clone)]
pub struct PlatformVersion {
    components: Vec<u32>,
}

impl PlatformVersion {
    pub fn new(components: &[u32]) -> Result<Self, PlatformError> {
        if components.is_empty() || components.len() > MAX_COMPONENTS {
            return Err(PlatformError::InvalidVersion {
                input: format!("{components:?}"),
                reason: format!("expected 1 to {MAX_COMPONENTS} components"),
            });
        }
        Ok(Self {
            components: components.to_vec(),
        })
    }

    pub fn major(&self) -> u32 {
        self.component(0)
    }

    pub fn minor(&self) -> u32 {
        self.component(1)
    }

    pub fn patch(&self) -> u32 {
        self.component(2)
    }

    /// Component `index`, zero when absent.
    pub fn component(&self, index: usize) -> u32 {
        self.components.get(index).copied().unwrap_or(0)
    }

    pub fn components(&self) -> &[u32] {
        &self.components
    }

    /// Components with trailing zeros removed; equal versions share this form.
    fn significant(&self) -> &[u32] {
        let len = self
            .components
            .iter()
            .rposition(|component| *component != 0)
            .map_or(0, |idx| idx + 1);
        &self.components[..len]
    }
}

impl std::str::FromStr for PlatformVersion {
    type Err = PlatformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let invalid = |reason: String| PlatformError::InvalidVersion {
            input: s.to_string(),
            reason,
        };
        if trimmed.is_empty() {
            return Err(invalid("empty version string".to_string()));
        }
        let mut components = Vec::new();
        for (idx, part) in trimmed.split('.').enumerate() {
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(invalid(format!(
                    "component {idx} (`{part}`) is not a non-negative integer"
                )));
            }
            let value = part
                .parse::<u32>()
                .map_err(|e| invalid(format!("component {idx} (`{part}`): {e}")))?;
            components.push(value);
        }
        if components.len() > MAX_COMPONENTS {
            return Err(invalid(format!(
                "{} components, at most {MAX_COMPONENTS} allowed",
                components.len()
            )));
        }
        Ok(Self { components })
    }
}

impl std::fmt::Display for PlatformVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (idx, component) in self.components.iter().enumerate() {
            if idx > 0 {
                f.write_str(".")?;
            }
            write!(f, "{component}")?;
        }
        Ok(())
    }
}

impl PartialEq for PlatformVersion {
    fn eq(&self, other: &Self) -> bool {
        self.significant() == other.significant()
    }
}

impl Eq for PlatformVersion {}

impl Hash for PlatformVersion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.significant().hash(state);
    }
}

impl Ord for PlatformVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.components.len().max(other.components.len());
        (0..len)
            .map(|idx| self.component(idx).cmp(&other.component(idx)))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    }
}

impl PartialOrd for PlatformVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Serialize for PlatformVersion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PlatformVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(text: &str) -> PlatformVersion {
        text.parse().unwrap()
    }

    #[test]
    fn parse_then_format_round_trips() {
        for text in ["14.2", "10.10", "9.9", "17.0.1", "6.0", "13"] {
            assert_eq!(v(text).to_string(), text);
        }
        assert_eq!(v("014.02").to_string(), "14.2");
        assert_eq!(v(" 15.4 ").to_string(), "15.4");
    }

    #[test]
    fn ordering_is_numeric_per_component() {
        assert!(v("10.10") > v("9.9"));
        assert!(v("10.10") > v("10.9"));
        assert!(v("14.2") < v("14.2.1"));
        assert_eq!(v("14.2"), v("14.2.0"));
        assert_eq!(v("14.2").cmp(&v("14.2.0")), Ordering::Equal);
    }

    #[test]
    fn rejects_malformed_strings() {
        for text in ["", "14.", ".2", "14..2", "v14", "14.-2", "1.2.3.4.5", "14.2b"] {
            assert!(text.parse::<PlatformVersion>().is_err(), "{text:?} should fail");
        }
    }

    #[test]
    fn accessors_default_missing_components_to_zero() {
        let version = v("17.2");
        assert_eq!(version.major(), 17);
        assert_eq!(version.minor(), 2);
        assert_eq!(version.patch(), 0);
        assert_eq!(version.components(), &[17, 2]);
    }

    #[test]
    fn new_bounds_component_count() {
        assert!(PlatformVersion::new(&[]).is_err());
        assert!(PlatformVersion::new(&[1, 2, 3, 4, 5]).is_err());
        assert_eq!(PlatformVersion::new(&[11, 0]).unwrap().to_string(), "11.0");
    }
}
