//! Canonical attribute schema table.
//!
//! This module is the single authority for where each attribute kind may be
//! attached, whether it may repeat on one element, and which exclusive group
//! (if any) it belongs to.

use crate::attribute::{AttributeKind, ElementKind};
use serde::Serialize;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};

pub const SCHEMA_REGISTRY_KIND: &str = "bindmeta.attribute_schema.v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeCategory {
    TypeShape,
    MemberShape,
    Naming,
    Ownership,
    Marshalling,
    Visibility,
    CodeInjection,
    AsyncTransformation,
    NotificationShaping,
    DictionaryWrapper,
}

/// Groups of attribute kinds of which at most one may apply per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExclusiveGroup {
    DefaultCtorVisibility,
    MemberVisibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AttributeSpec {
    pub kind: AttributeKind,
    pub category: AttributeCategory,
    pub targets: &'static [ElementKind],
    pub repeatable: bool,
    pub exclusive_group: Option<ExclusiveGroup>,
}

impl AttributeSpec {
    pub fn allows(&self, element: ElementKind) -> bool {
        self.targets.contains(&element)
    }
}

const INTERFACE: &[ElementKind] = &[ElementKind::Interface];
const METHOD: &[ElementKind] = &[ElementKind::Method];
const MEMBER_CODE: &[ElementKind] = &[ElementKind::Method, ElementKind::Property];
const ALL_MEMBERS: &[ElementKind] =
    &[ElementKind::Method, ElementKind::Property, ElementKind::Field];
const VALUE_SITES: &[ElementKind] = &[
    ElementKind::Property,
    ElementKind::Parameter,
    ElementKind::ReturnValue,
];

const fn spec(
    kind: AttributeKind,
    category: AttributeCategory,
    targets: &'static [ElementKind],
) -> AttributeSpec {
    AttributeSpec {
        kind,
        category,
        targets,
        repeatable: false,
        exclusive_group: None,
    }
}

const fn repeatable(mut base: AttributeSpec) -> AttributeSpec {
    base.repeatable = true;
    base
}

const fn exclusive(mut base: AttributeSpec, group: ExclusiveGroup) -> AttributeSpec {
    base.exclusive_group = Some(group);
    base
}

/// Schema entry for one attribute kind.
pub fn attribute_spec(kind: AttributeKind) -> AttributeSpec {
    use AttributeCategory as C;
    use AttributeKind as K;
    match kind {
        K::BaseType => spec(kind, C::TypeShape, INTERFACE),
        K::Category => spec(kind, C::TypeShape, INTERFACE),
        K::Protocolize => spec(kind, C::TypeShape, VALUE_SITES),
        K::Protocol => spec(kind, C::TypeShape, INTERFACE),
        K::Model => spec(kind, C::TypeShape, INTERFACE),
        K::Abstract => spec(kind, C::MemberShape, MEMBER_CODE),
        K::Static => spec(kind, C::MemberShape, ALL_MEMBERS),
        K::Export => spec(kind, C::Naming, MEMBER_CODE),
        K::Retain => spec(
            kind,
            C::Ownership,
            &[ElementKind::Property, ElementKind::Parameter],
        ),
        K::Release => spec(
            kind,
            C::Ownership,
            &[ElementKind::Method, ElementKind::ReturnValue],
        ),
        K::Factory => spec(kind, C::Ownership, METHOD),
        K::ForcedType => spec(
            kind,
            C::Ownership,
            &[ElementKind::Parameter, ElementKind::ReturnValue],
        ),
        K::PlainString => spec(
            kind,
            C::Marshalling,
            &[ElementKind::Property, ElementKind::Parameter],
        ),
        K::DisableZeroCopy => spec(
            kind,
            C::Marshalling,
            &[
                ElementKind::Interface,
                ElementKind::Method,
                ElementKind::Property,
                ElementKind::Parameter,
            ],
        ),
        K::BindAs => spec(kind, C::Marshalling, VALUE_SITES),
        K::Internal => exclusive(
            spec(
                kind,
                C::Visibility,
                &[
                    ElementKind::Interface,
                    ElementKind::Method,
                    ElementKind::Property,
                    ElementKind::Field,
                ],
            ),
            ExclusiveGroup::MemberVisibility,
        ),
        K::Protected => exclusive(
            spec(kind, C::Visibility, MEMBER_CODE),
            ExclusiveGroup::MemberVisibility,
        ),
        K::DefaultCtorVisibility | K::PrivateDefaultCtor | K::DisableDefaultCtor => exclusive(
            spec(kind, C::Visibility, INTERFACE),
            ExclusiveGroup::DefaultCtorVisibility,
        ),
        K::Prologue | K::Pre | K::Post => spec(kind, C::CodeInjection, MEMBER_CODE),
        K::Dispose => repeatable(spec(kind, C::CodeInjection, INTERFACE)),
        K::Async => spec(kind, C::AsyncTransformation, METHOD),
        K::Notification => repeatable(spec(kind, C::NotificationShaping, &[ElementKind::Field])),
        K::EventArgs => spec(kind, C::NotificationShaping, METHOD),
        K::DelegateName => spec(kind, C::NotificationShaping, METHOD),
        K::StrongDictionary => spec(
            kind,
            C::DictionaryWrapper,
            &[ElementKind::Interface, ElementKind::Property],
        ),
    }
}

pub fn attribute_schema() -> Vec<AttributeSpec> {
    AttributeKind::ALL
        .iter()
        .map(|kind| attribute_spec(*kind))
        .collect()
}

/// Hex SHA-256 over the canonical JSON rendering of the schema table.
pub fn schema_digest() -> String {
    let rows = serde_json::to_vec(&attribute_schema()).expect("schema table must serialize");
    let hash = Sha256::digest(&rows);
    hash.iter().map(|byte| format!("{byte:02x}")).collect()
}

pub fn attribute_schema_json() -> Value {
    json!({
        "schema": 1,
        "registryKind": SCHEMA_REGISTRY_KIND,
        "digest": schema_digest(),
        "attributes": attribute_schema(),
    })
}
