//! The fixed set of ledger categories.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LedgerCategory {
    MissingPinvoke,
    MissingField,
    MissingProtocol,
    UnknownNativeEnum,
}

impl LedgerCategory {
    pub const ALL: [LedgerCategory; 4] = [
        Self::MissingPinvoke,
        Self::MissingField,
        Self::MissingProtocol,
        Self::UnknownNativeEnum,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MissingPinvoke => "missing-pinvoke",
            Self::MissingField => "missing-field",
            Self::MissingProtocol => "missing-protocol",
            Self::UnknownNativeEnum => "unknown-native-enum",
        }
    }
}

impl std::str::FromStr for LedgerCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("unknown ledger category `{s}`"))
    }
}

impl std::fmt::Display for LedgerCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_every_category_name() {
        for category in LedgerCategory::ALL {
            assert_eq!(category.as_str().parse::<LedgerCategory>(), Ok(category));
        }
    }

    #[test]
    fn category_names_are_exact() {
        assert!("Missing-Pinvoke".parse::<LedgerCategory>().is_err());
        assert!("missing-selector".parse::<LedgerCategory>().is_err());
        assert!("".parse::<LedgerCategory>().is_err());
    }
}
