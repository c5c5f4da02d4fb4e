//! Managed-side type expressions used as projection targets.
//!
//! Syntax: a type name optionally followed by `?` (nullable wrapper) and/or
//! `[]` (homogeneous array), e.g. `int`, `int?`, `CGRect[]`, `int?[]`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Value types every binding knows about without declaring them.
pub const BUILTIN_VALUE_TYPES: &[&str] = &[
    "bool", "byte", "sbyte", "char", "short", "ushort", "int", "uint", "long", "ulong", "nint",
    "nuint", "nfloat", "float", "double", "decimal", "CGPoint", "CGSize", "CGRect",
    "CGAffineTransform", "CGVector", "NSRange", "CMTime", "CMTimeRange", "UIEdgeInsets",
    "NSDirectionalEdgeInsets", "UIOffset", "CATransform3D",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum ManagedType {
    Named { name: String, value_type: bool },
    Nullable { inner: Box<ManagedType> },
    Array { element: Box<ManagedType> },
}

impl ManagedType {
    /// The type with one outer nullable wrapper removed.
    pub fn unwrap_nullable(&self) -> &ManagedType {
        match self {
            Self::Nullable { inner } => inner,
            other => other,
        }
    }

    pub fn is_nullable(&self) -> bool {
        matches!(self, Self::Nullable { .. })
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Self::Array { .. })
    }

    /// True for named value types and nullable wrappers around them.
    pub fn is_value_type(&self) -> bool {
        match self.unwrap_nullable() {
            Self::Named { value_type, .. } => *value_type,
            _ => false,
        }
    }
}

impl std::fmt::Display for ManagedType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named { name, .. } => f.write_str(name),
            Self::Nullable { inner } => write!(f, "{inner}?"),
            Self::Array { element } => write!(f, "{element}[]"),
        }
    }
}

/// Knows which type names denote value types.
#[derive(Debug, Clone)]
pub struct TypeCatalog {
    value_types: BTreeSet<String>,
}

impl TypeCatalog {
    pub fn new<I, S>(extra_value_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut value_types: BTreeSet<String> = BUILTIN_VALUE_TYPES
            .iter()
            .map(|name| name.to_string())
            .collect();
        value_types.extend(extra_value_types.into_iter().map(Into::into));
        Self { value_types }
    }

    pub fn is_value_type(&self, name: &str) -> bool {
        self.value_types.contains(name)
    }

    pub fn parse(&self, text: &str) -> Result<ManagedType, String> {
        let trimmed = text.trim();
        if let Some(element) = trimmed.strip_suffix("[]") {
            let element = self.parse(element)?;
            if element.is_array() {
                return Err(format!("nested arrays are not supported: `{trimmed}`"));
            }
            return Ok(ManagedType::Array {
                element: Box::new(element),
            });
        }
        if let Some(inner) = trimmed.strip_suffix('?') {
            let inner = self.parse(inner)?;
            if !matches!(inner, ManagedType::Named { .. }) {
                return Err(format!("nullable wrapper must wrap a named type: `{trimmed}`"));
            }
            if !inner.is_value_type() {
                return Err(format!("nullable wrapper requires a value type: `{trimmed}`"));
            }
            return Ok(ManagedType::Nullable {
                inner: Box::new(inner),
            });
        }
        let valid = !trimmed.is_empty()
            && trimmed
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        if !valid {
            return Err(format!("invalid type name: `{trimmed}`"));
        }
        Ok(ManagedType::Named {
            name: trimmed.to_string(),
            value_type: self.is_value_type(trimmed),
        })
    }
}

impl Default for TypeCatalog {
    fn default() -> Self {
        Self::new(std::iter::empty::<String>())
    }
}
