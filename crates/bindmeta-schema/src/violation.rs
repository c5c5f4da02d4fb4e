//! Schema violations and the batch report they are collected into.
//!
//! Validation is fail-slow: every check pushes into a [`ViolationSink`] and the
//! pass always runs to completion. Callers decide what a rejected report means.

use crate::attribute::{AttributeKind, ElementKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

pub mod failure_class {
    pub const ATTACHMENT_DISALLOWED: &str = "attachment_disallowed";
    pub const DUPLICATE_ATTRIBUTE: &str = "duplicate_attribute";
    pub const EXCLUSIVE_CONFLICT: &str = "exclusive_conflict";
    pub const DUPLICATE_DECLARATION: &str = "duplicate_declaration";
    pub const DUPLICATE_MEMBER: &str = "duplicate_member";
    pub const CATEGORY_WITHOUT_BASE_TYPE: &str = "category_without_base_type";
    pub const EMPTY_PAYLOAD: &str = "empty_payload";
    pub const OWNERSHIP_CONFLICT: &str = "ownership_conflict";
    pub const PLAIN_STRING_NON_STRING: &str = "plain_string_non_string";
    pub const BIND_AS_PROTOCOL_OR_MODEL: &str = "bind_as_protocol_or_model";
    pub const BIND_AS_INVALID_TARGET: &str = "bind_as_invalid_target";
    pub const BIND_AS_UNSUPPORTED_EXCHANGE: &str = "bind_as_unsupported_exchange_type";
    pub const BIND_AS_SHAPE_MISMATCH: &str = "bind_as_shape_mismatch";
    pub const ASYNC_CALLBACK_NOT_LAST: &str = "async_callback_not_last";
    pub const ASYNC_UNSUPPORTED_SHAPE: &str = "async_unsupported_callback_shape";
    pub const ASYNC_AMBIGUOUS_MODE: &str = "async_ambiguous_mode";
    pub const STRONG_DICTIONARY_UNRESOLVED: &str = "strong_dictionary_unresolved";
    pub const STRONG_DICTIONARY_CYCLE: &str = "strong_dictionary_cycle";
}

/// One attribute misuse found on one declaration element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SchemaViolation {
    /// Dotted path to the offending element, e.g. `UIView.addSubview(view)`.
    pub element: String,
    pub element_kind: ElementKind,
    pub attribute: Option<AttributeKind>,
    pub failure_class: String,
    pub reason: String,
}

impl std::fmt::Display for SchemaViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.attribute {
            Some(kind) => write!(
                f,
                "{} ({}) [{kind}] {}: {}",
                self.element, self.element_kind, self.failure_class, self.reason
            ),
            None => write!(
                f,
                "{} ({}) {}: {}",
                self.element, self.element_kind, self.failure_class, self.reason
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub result: String,
    pub failure_classes: Vec<String>,
    pub issues: Vec<SchemaViolation>,
}

impl ValidationReport {
    pub fn from_violations(mut issues: Vec<SchemaViolation>) -> Self {
        issues.sort_by(|a, b| {
            (&a.element, &a.failure_class, &a.reason).cmp(&(
                &b.element,
                &b.failure_class,
                &b.reason,
            ))
        });
        issues.dedup();
        let failure_classes: Vec<String> = issues
            .iter()
            .map(|issue| issue.failure_class.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        Self {
            result: if issues.is_empty() {
                "accepted".to_string()
            } else {
                "rejected".to_string()
            },
            failure_classes,
            issues,
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.issues.is_empty()
    }
}

/// Accumulates violations during a single pass.
#[derive(Debug, Default)]
pub struct ViolationSink {
    violations: Vec<SchemaViolation>,
}

impl ViolationSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        element: &ElementPath,
        attribute: Option<AttributeKind>,
        failure_class: &str,
        reason: impl Into<String>,
    ) {
        let reason = reason.into();
        tracing::debug!(
            element = %element.path,
            failure_class,
            %reason,
            "schema violation"
        );
        self.violations.push(SchemaViolation {
            element: element.path.clone(),
            element_kind: element.kind,
            attribute,
            failure_class: failure_class.to_string(),
            reason,
        });
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn into_report(self) -> ValidationReport {
        ValidationReport::from_violations(self.violations)
    }
}

/// Location of an element inside a declaration set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementPath {
    pub path: String,
    pub kind: ElementKind,
}

impl ElementPath {
    pub fn interface(name: &str) -> Self {
        Self {
            path: name.to_string(),
            kind: ElementKind::Interface,
        }
    }

    pub fn member(&self, name: &str, kind: ElementKind) -> Self {
        Self {
            path: format!("{}.{name}", self.path),
            kind,
        }
    }

    pub fn parameter(&self, name: &str) -> Self {
        Self {
            path: format!("{}({name})", self.path),
            kind: ElementKind::Parameter,
        }
    }

    pub fn return_value(&self) -> Self {
        Self {
            path: format!("{}->return", self.path),
            kind: ElementKind::ReturnValue,
        }
    }
}
