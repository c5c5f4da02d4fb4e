//! Ownership adjustments at call sites.
//!
//! Every call site (a method's return value, a property's value, each
//! parameter) resolves to exactly one [`Ownership`]. Explicit attributes win;
//! otherwise an [`OwnershipPolicy`] supplies the platform convention.

use crate::attribute::Attribute;
use crate::declaration::{MemberDeclaration, ParameterDeclaration};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Ownership {
    /// The managed wrapper does not adjust the native reference count.
    Borrowed,
    /// The wrapper takes the object over uniquely and releases it when done.
    Owned,
    /// The binding increments the native reference count after the call.
    Retain,
    /// The binding decrements the native reference count after the call.
    Release,
}

impl std::fmt::Display for Ownership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Borrowed => write!(f, "borrowed"),
            Self::Owned => write!(f, "owned"),
            Self::Retain => write!(f, "retain"),
            Self::Release => write!(f, "release"),
        }
    }
}

/// Fallback applied when a call site carries no ownership attribute.
///
/// Implementations must be pure; the pass may call them from several threads.
pub trait OwnershipPolicy: Send + Sync {
    fn default_return(&self, member: &MemberDeclaration) -> Ownership;

    fn default_parameter(
        &self,
        member: &MemberDeclaration,
        parameter: &ParameterDeclaration,
    ) -> Ownership;
}

/// Treats every unannotated call site as borrowed.
#[derive(Debug, Clone, Copy, Default)]
pub struct BorrowedByDefault;

impl OwnershipPolicy for BorrowedByDefault {
    fn default_return(&self, _member: &MemberDeclaration) -> Ownership {
        Ownership::Borrowed
    }

    fn default_parameter(
        &self,
        _member: &MemberDeclaration,
        _parameter: &ParameterDeclaration,
    ) -> Ownership {
        Ownership::Borrowed
    }
}

/// Explicit ownership directive an attribute contributes to a call site.
pub(crate) fn directive(attribute: &Attribute) -> Option<Ownership> {
    match attribute {
        Attribute::Retain { .. } => Some(Ownership::Retain),
        Attribute::Release => Some(Ownership::Release),
        Attribute::Factory => Some(Ownership::Owned),
        Attribute::ForcedType { owns: true } => Some(Ownership::Owned),
        Attribute::ForcedType { owns: false } => Some(Ownership::Borrowed),
        _ => None,
    }
}

/// Collapses the directives found at one call site.
///
/// Returns `Err` with the distinct directives when they disagree.
pub(crate) fn settle<'a>(
    attributes: impl IntoIterator<Item = &'a Attribute>,
) -> Result<Option<Ownership>, Vec<Ownership>> {
    let mut found: Vec<Ownership> = attributes.into_iter().filter_map(directive).collect();
    found.sort();
    found.dedup();
    match found.len() {
        0 => Ok(None),
        1 => Ok(found.pop()),
        _ => Err(found),
    }
}
