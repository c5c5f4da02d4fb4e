//! Opaque code snippets keyed by insertion point.
//!
//! Snippet text is never parsed; it is spliced verbatim.

use crate::attribute::Attribute;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertionPoint {
    /// Before any generated code in the member body.
    Prologue,
    /// After parameter validation and marshalling.
    Pre,
    /// Before return and before parameter cleanup.
    Post,
    /// Inside the generated resource-release routine of the interface.
    Dispose,
}

impl InsertionPoint {
    pub fn for_attribute(attribute: &Attribute) -> Option<(Self, &str)> {
        match attribute {
            Attribute::Prologue { code } => Some((Self::Prologue, code.as_str())),
            Attribute::Pre { code } => Some((Self::Pre, code.as_str())),
            Attribute::Post { code } => Some((Self::Post, code.as_str())),
            Attribute::Dispose { code } => Some((Self::Dispose, code.as_str())),
            _ => None,
        }
    }
}

/// Member-level snippets: at most one per insertion point.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnippetSet(BTreeMap<InsertionPoint, String>);

impl SnippetSet {
    /// Collects member snippets; the first snippet per point wins.
    pub fn from_attributes(attributes: &[Attribute]) -> Self {
        let mut map = BTreeMap::new();
        for (point, code) in attributes.iter().filter_map(InsertionPoint::for_attribute) {
            if point == InsertionPoint::Dispose {
                continue;
            }
            map.entry(point).or_insert_with(|| code.to_string());
        }
        Self(map)
    }

    pub fn get(&self, point: InsertionPoint) -> Option<&str> {
        self.0.get(&point).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Interface-level dispose snippets in declaration order.
pub fn dispose_snippets(attributes: &[Attribute]) -> Vec<String> {
    attributes
        .iter()
        .filter_map(|attr| match attr {
            Attribute::Dispose { code } => Some(code.clone()),
            _ => None,
        })
        .collect()
}
