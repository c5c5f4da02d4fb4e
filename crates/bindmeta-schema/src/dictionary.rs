//! StrongDictionary key resolution.
//!
//! Key resolution order per property:
//!
//! 1. an export name containing `.` is used as a literal key path;
//! 2. an export name without `.` is appended to the key container;
//! 3. otherwise the key is `<KeyContainer>.<MemberName><Suffix>`.
//!
//! A property carrying its own `StrongDictionary` attribute recurses into the
//! interface named by its type, resolving that interface's keys against the
//! property's key container instead of the parent's.

use crate::attribute::{Attribute, AttributeKind, ElementKind};
use crate::declaration::{BindingDeclaration, DeclarationSet, MemberDeclaration, MemberKind};
use crate::violation::{ElementPath, ViolationSink, failure_class};
use serde::{Deserialize, Serialize};

pub const DEFAULT_KEY_SUFFIX: &str = "Key";
pub const KEY_PATH_SEPARATOR: char = '.';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeySource {
    LiteralPath,
    ContainerExport,
    Synthesized,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryKey {
    pub member: String,
    pub key: String,
    pub source: KeySource,
    pub nested: Option<DictionaryProjection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryProjection {
    pub interface: String,
    pub key_container: String,
    pub suffix: String,
    pub keys: Vec<DictionaryKey>,
}

/// Resolves the key for one dictionary member.
pub fn resolve_key(
    key_container: &str,
    suffix: &str,
    member_name: &str,
    export: Option<&str>,
) -> (String, KeySource) {
    match export {
        Some(name) if name.contains(KEY_PATH_SEPARATOR) => {
            (name.to_string(), KeySource::LiteralPath)
        }
        Some(name) => (
            format!("{key_container}{KEY_PATH_SEPARATOR}{name}"),
            KeySource::ContainerExport,
        ),
        None => (
            format!("{key_container}{KEY_PATH_SEPARATOR}{member_name}{suffix}"),
            KeySource::Synthesized,
        ),
    }
}

pub(crate) fn export_name(attributes: &[Attribute]) -> Option<&str> {
    attributes.iter().find_map(|attr| match attr {
        Attribute::Export { selector } => Some(selector.as_str()),
        _ => None,
    })
}

pub(crate) fn strong_dictionary(attributes: &[Attribute]) -> Option<(&str, &str)> {
    attributes.iter().find_map(|attr| match attr {
        Attribute::StrongDictionary {
            key_container,
            suffix,
        } => Some((
            key_container.as_str(),
            suffix.as_deref().unwrap_or(DEFAULT_KEY_SUFFIX),
        )),
        _ => None,
    })
}

/// Projects `declaration` as a dictionary-backed wrapper keyed by `key_container`.
pub fn project_dictionary(
    set: &DeclarationSet,
    declaration: &BindingDeclaration,
    key_container: &str,
    suffix: &str,
    sink: &mut ViolationSink,
) -> DictionaryProjection {
    let mut visiting = vec![declaration.name.clone()];
    project_inner(set, declaration, key_container, suffix, sink, &mut visiting)
}

fn project_inner(
    set: &DeclarationSet,
    declaration: &BindingDeclaration,
    key_container: &str,
    suffix: &str,
    sink: &mut ViolationSink,
    visiting: &mut Vec<String>,
) -> DictionaryProjection {
    let root = ElementPath::interface(&declaration.name);
    let keys = declaration
        .members
        .iter()
        .filter(|member| member.kind == MemberKind::Property)
        .map(|member| {
            let path = root.member(&member.name, ElementKind::Property);
            let (key, source) = resolve_key(
                key_container,
                suffix,
                &member.name,
                export_name(&member.attributes),
            );
            let nested = nested_projection(set, member, &path, sink, visiting);
            DictionaryKey {
                member: member.name.clone(),
                key,
                source,
                nested,
            }
        })
        .collect();
    DictionaryProjection {
        interface: declaration.name.clone(),
        key_container: key_container.to_string(),
        suffix: suffix.to_string(),
        keys,
    }
}

/// Resolves a property-level StrongDictionary against its own key container.
pub(crate) fn nested_projection(
    set: &DeclarationSet,
    member: &MemberDeclaration,
    path: &ElementPath,
    sink: &mut ViolationSink,
    visiting: &mut Vec<String>,
) -> Option<DictionaryProjection> {
    let (container, suffix) = strong_dictionary(&member.attributes)?;
    let Some(type_name) = member.type_ref.as_ref().map(|type_ref| type_ref.name.as_str()) else {
        sink.push(
            path,
            Some(AttributeKind::StrongDictionary),
            failure_class::STRONG_DICTIONARY_UNRESOLVED,
            "nested dictionary property has no type",
        );
        return None;
    };
    let Some(target) = set.declaration(type_name) else {
        sink.push(
            path,
            Some(AttributeKind::StrongDictionary),
            failure_class::STRONG_DICTIONARY_UNRESOLVED,
            format!("nested dictionary type `{type_name}` is not declared"),
        );
        return None;
    };
    if visiting.iter().any(|name| name == type_name) {
        sink.push(
            path,
            Some(AttributeKind::StrongDictionary),
            failure_class::STRONG_DICTIONARY_CYCLE,
            format!("nested dictionary `{type_name}` recurses into itself"),
        );
        return None;
    }
    visiting.push(type_name.to_string());
    let projection = project_inner(set, target, container, suffix, sink, visiting);
    visiting.pop();
    Some(projection)
}
