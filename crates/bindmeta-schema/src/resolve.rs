//! The schema pass: validate a [`DeclarationSet`] and resolve every
//! declaration into a fully-populated configuration record.
//!
//! One pass does both. Every check pushes into a shared [`ViolationSink`], so
//! a run reports every violation it finds rather than stopping at the first.
//! Absent attributes resolve to explicit defaults, never to `None`-means-default.

use crate::async_projection::{AsyncProjection, project_async};
use crate::attribute::{Attribute, AttributeKind, Visibility, has_attr};
use crate::bind_as::{BindAsProjection, project_bind_as};
use crate::declaration::{
    BindingDeclaration, DeclarationSet, MemberDeclaration, MemberKind, ParameterDeclaration,
    TypeRef,
};
use crate::dictionary::{
    DictionaryProjection, export_name, nested_projection, project_dictionary, strong_dictionary,
};
use crate::managed_type::TypeCatalog;
use crate::ownership::{BorrowedByDefault, Ownership, OwnershipPolicy, settle};
use crate::registry::{ExclusiveGroup, attribute_spec};
use crate::snippet::{SnippetSet, dispose_snippets};
use crate::violation::{ElementPath, ValidationReport, ViolationSink, failure_class};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// What the generator does with the parameterless constructor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "directive", rename_all = "snake_case")]
pub enum DefaultCtor {
    Emit { visibility: Visibility },
    Omit,
}

impl Default for DefaultCtor {
    fn default() -> Self {
        Self::Emit {
            visibility: Visibility::Public,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum StringMarshalling {
    /// Marshalled through a native string object.
    Native { zero_copy: bool },
    /// Marshalled as a plain C string.
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationShape {
    pub event_args: Option<String>,
    pub notification_center: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventArgsShape {
    pub name: String,
    pub skip_generation: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedParameter {
    pub name: String,
    pub ownership: Ownership,
    pub bind_as: Option<BindAsProjection>,
    pub marshalling: Option<StringMarshalling>,
    pub protocolized: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMember {
    pub name: String,
    pub kind: MemberKind,
    pub selector: Option<String>,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub snippets: SnippetSet,
    /// Ownership of the returned value (methods) or the property value.
    pub value_ownership: Option<Ownership>,
    pub value_bind_as: Option<BindAsProjection>,
    /// String marshalling of the returned value (methods) or the property
    /// value; `None` for non-string values.
    pub value_marshalling: Option<StringMarshalling>,
    pub protocolized: bool,
    pub parameters: Vec<ResolvedParameter>,
    pub async_projection: Option<AsyncProjection>,
    pub notifications: Vec<NotificationShape>,
    pub event_args: Option<EventArgsShape>,
    pub delegate_name: Option<String>,
    pub dictionary: Option<DictionaryProjection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDeclaration {
    pub name: String,
    pub base_type: Option<String>,
    pub registered_name: Option<String>,
    pub is_category: bool,
    pub is_protocol: bool,
    pub is_model: bool,
    pub visibility: Visibility,
    pub default_ctor: DefaultCtor,
    pub zero_copy: bool,
    pub dispose_snippets: Vec<String>,
    pub dictionary: Option<DictionaryProjection>,
    pub members: Vec<ResolvedMember>,
}

/// Output of one pass: resolved records plus the violation batch.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub declarations: Vec<ResolvedDeclaration>,
    pub report: ValidationReport,
}

impl Resolution {
    /// Halts emission when any violation was found.
    pub fn into_result(self) -> Result<Vec<ResolvedDeclaration>, ValidationReport> {
        if self.report.is_accepted() {
            Ok(self.declarations)
        } else {
            Err(self.report)
        }
    }
}

/// Validates `set` without keeping the resolved records.
pub fn validate_set(set: &DeclarationSet) -> ValidationReport {
    resolve_set(set, &BorrowedByDefault).report
}

pub fn resolve_set(set: &DeclarationSet, policy: &dyn OwnershipPolicy) -> Resolution {
    let resolver = Resolver {
        set,
        catalog: TypeCatalog::new(set.value_types.iter().cloned()),
        policy,
    };
    let mut sink = ViolationSink::new();

    let mut seen = BTreeSet::new();
    for declaration in &set.declarations {
        if !seen.insert(declaration.name.as_str()) {
            sink.push(
                &ElementPath::interface(&declaration.name),
                None,
                failure_class::DUPLICATE_DECLARATION,
                format!("interface `{}` is declared more than once", declaration.name),
            );
        }
    }

    let declarations = set
        .declarations
        .iter()
        .map(|declaration| resolver.resolve_declaration(declaration, &mut sink))
        .collect();
    let report = sink.into_report();
    tracing::debug!(
        declarations = set.declarations.len(),
        violations = report.issues.len(),
        result = %report.result,
        "schema pass finished"
    );
    Resolution {
        declarations,
        report,
    }
}

struct Resolver<'a> {
    set: &'a DeclarationSet,
    catalog: TypeCatalog,
    policy: &'a dyn OwnershipPolicy,
}

/// Interface-level facts members need while resolving.
struct InterfaceContext {
    bind_as_excluded: bool,
    zero_copy: bool,
    is_dictionary: bool,
}

impl Resolver<'_> {
    fn resolve_declaration(
        &self,
        declaration: &BindingDeclaration,
        sink: &mut ViolationSink,
    ) -> ResolvedDeclaration {
        let path = ElementPath::interface(&declaration.name);
        let attrs = &declaration.attributes;
        check_attachment(&path, attrs, sink);

        let (base_type, registered_name) = attrs
            .iter()
            .find_map(|attr| match attr {
                Attribute::BaseType { base, name, .. } => Some((Some(base.clone()), name.clone())),
                _ => None,
            })
            .unwrap_or((None, None));
        let is_category = has_attr(attrs, AttributeKind::Category);
        if is_category && base_type.is_none() {
            sink.push(
                &path,
                Some(AttributeKind::Category),
                failure_class::CATEGORY_WITHOUT_BASE_TYPE,
                "category interfaces must name the type they extend with baseType",
            );
        }
        let is_protocol = has_attr(attrs, AttributeKind::Protocol);
        let is_model = has_attr(attrs, AttributeKind::Model);

        let context = InterfaceContext {
            bind_as_excluded: is_protocol || is_model,
            zero_copy: !has_attr(attrs, AttributeKind::DisableZeroCopy),
            is_dictionary: strong_dictionary(attrs).is_some(),
        };

        let dictionary = strong_dictionary(attrs).map(|(container, suffix)| {
            project_dictionary(self.set, declaration, container, suffix, sink)
        });

        let mut seen_members = BTreeSet::new();
        let mut members = Vec::with_capacity(declaration.members.len());
        for member in &declaration.members {
            let signature: Vec<&str> = member.parameters.iter().map(|p| p.name.as_str()).collect();
            if !seen_members.insert((member.name.as_str(), member.kind, signature)) {
                sink.push(
                    &path.member(&member.name, member.kind.element_kind()),
                    None,
                    failure_class::DUPLICATE_MEMBER,
                    format!("member `{}` is declared more than once", member.name),
                );
            }
            members.push(self.resolve_member(&path, &context, member, sink));
        }

        tracing::debug!(
            declaration = %declaration.name,
            members = members.len(),
            "resolved declaration"
        );

        ResolvedDeclaration {
            name: declaration.name.clone(),
            base_type,
            registered_name,
            is_category,
            is_protocol,
            is_model,
            visibility: if has_attr(attrs, AttributeKind::Internal) {
                Visibility::Internal
            } else {
                Visibility::Public
            },
            default_ctor: default_ctor(attrs),
            zero_copy: context.zero_copy,
            dispose_snippets: dispose_snippets(attrs),
            dictionary,
            members,
        }
    }

    fn resolve_member(
        &self,
        parent: &ElementPath,
        context: &InterfaceContext,
        member: &MemberDeclaration,
        sink: &mut ViolationSink,
    ) -> ResolvedMember {
        let path = parent.member(&member.name, member.kind.element_kind());
        let attrs = &member.attributes;
        check_attachment(&path, attrs, sink);

        let zero_copy = context.zero_copy && !has_attr(attrs, AttributeKind::DisableZeroCopy);

        let mut parameters = Vec::with_capacity(member.parameters.len());
        for parameter in &member.parameters {
            parameters.push(self.resolve_parameter(
                &path, context, member, parameter, zero_copy, sink,
            ));
        }

        let (value_ownership, value_bind_as, value_marshalling, protocolized) =
            match member.kind {
                MemberKind::Method => match &member.return_value {
                    Some(ret) => {
                        let ret_path = path.return_value();
                        check_attachment(&ret_path, &ret.attributes, sink);
                        let ownership = self.site_ownership(
                            &ret_path,
                            attrs.iter().chain(&ret.attributes),
                            || self.policy.default_return(member),
                            sink,
                        );
                        let bind_as = self.site_bind_as(
                            &ret_path,
                            context,
                            &ret.attributes,
                            Some(&ret.type_ref),
                            sink,
                        );
                        let marshalling = ret
                            .type_ref
                            .is_string()
                            .then_some(StringMarshalling::Native { zero_copy });
                        let protocolized = has_attr(&ret.attributes, AttributeKind::Protocolize);
                        (Some(ownership), bind_as, marshalling, protocolized)
                    }
                    None => (None, None, None, false),
                },
                MemberKind::Property => {
                    let ownership = self.site_ownership(
                        &path,
                        attrs.iter(),
                        || self.policy.default_return(member),
                        sink,
                    );
                    let bind_as =
                        self.site_bind_as(&path, context, attrs, member.type_ref.as_ref(), sink);
                    let marshalling =
                        string_marshalling(&path, attrs, member.type_ref.as_ref(), zero_copy, sink);
                    (
                        Some(ownership),
                        bind_as,
                        marshalling,
                        has_attr(attrs, AttributeKind::Protocolize),
                    )
                }
                MemberKind::Field => (None, None, None, false),
            };

        let async_projection = attrs.iter().find_map(|attr| match attr {
            Attribute::Async {
                result_type,
                method_name,
                result_type_name,
            } => Some((result_type, method_name, result_type_name)),
            _ => None,
        });
        let async_projection = async_projection.and_then(|(result_type, method_name, type_name)| {
            project_async(
                member,
                result_type.as_deref(),
                method_name.as_deref(),
                type_name.as_deref(),
            )
            .map_err(|(class, reason)| sink.push(&path, Some(AttributeKind::Async), class, reason))
            .ok()
        });

        let dictionary = if context.is_dictionary {
            None
        } else {
            nested_projection(self.set, member, &path, sink, &mut Vec::new())
        };

        ResolvedMember {
            name: member.name.clone(),
            kind: member.kind,
            selector: export_name(attrs).map(ToOwned::to_owned),
            visibility: member_visibility(attrs),
            is_static: has_attr(attrs, AttributeKind::Static),
            is_abstract: has_attr(attrs, AttributeKind::Abstract),
            snippets: SnippetSet::from_attributes(attrs),
            value_ownership,
            value_bind_as,
            value_marshalling,
            protocolized,
            parameters,
            async_projection,
            notifications: attrs
                .iter()
                .filter_map(|attr| match attr {
                    Attribute::Notification {
                        event_args,
                        notification_center,
                    } => Some(NotificationShape {
                        event_args: event_args.clone(),
                        notification_center: notification_center.clone(),
                    }),
                    _ => None,
                })
                .collect(),
            event_args: attrs.iter().find_map(|attr| match attr {
                Attribute::EventArgs {
                    name,
                    skip_generation,
                } => Some(EventArgsShape {
                    name: name.clone(),
                    skip_generation: *skip_generation,
                }),
                _ => None,
            }),
            delegate_name: attrs.iter().find_map(|attr| match attr {
                Attribute::DelegateName { name } => Some(name.clone()),
                _ => None,
            }),
            dictionary,
        }
    }

    fn resolve_parameter(
        &self,
        member_path: &ElementPath,
        context: &InterfaceContext,
        member: &MemberDeclaration,
        parameter: &ParameterDeclaration,
        zero_copy: bool,
        sink: &mut ViolationSink,
    ) -> ResolvedParameter {
        let path = member_path.parameter(&parameter.name);
        let attrs = &parameter.attributes;
        check_attachment(&path, attrs, sink);
        let zero_copy = zero_copy && !has_attr(attrs, AttributeKind::DisableZeroCopy);
        ResolvedParameter {
            name: parameter.name.clone(),
            ownership: self.site_ownership(
                &path,
                attrs.iter(),
                || self.policy.default_parameter(member, parameter),
                sink,
            ),
            bind_as: self.site_bind_as(&path, context, attrs, Some(&parameter.type_ref), sink),
            marshalling: string_marshalling(
                &path,
                attrs,
                Some(&parameter.type_ref),
                zero_copy,
                sink,
            ),
            protocolized: has_attr(attrs, AttributeKind::Protocolize),
        }
    }

    /// Exactly one ownership adjustment per call site.
    fn site_ownership<'b>(
        &self,
        path: &ElementPath,
        attributes: impl IntoIterator<Item = &'b Attribute>,
        fallback: impl FnOnce() -> Ownership,
        sink: &mut ViolationSink,
    ) -> Ownership {
        match settle(attributes) {
            Ok(Some(ownership)) => ownership,
            Ok(None) => fallback(),
            Err(conflicting) => {
                let rendered: Vec<String> = conflicting.iter().map(ToString::to_string).collect();
                sink.push(
                    path,
                    None,
                    failure_class::OWNERSHIP_CONFLICT,
                    format!(
                        "conflicting ownership directives at one call site: {}",
                        rendered.join(", ")
                    ),
                );
                fallback()
            }
        }
    }

    fn site_bind_as(
        &self,
        path: &ElementPath,
        context: &InterfaceContext,
        attributes: &[Attribute],
        native: Option<&TypeRef>,
        sink: &mut ViolationSink,
    ) -> Option<BindAsProjection> {
        let (target, origin) = attributes.iter().find_map(|attr| match attr {
            Attribute::BindAs { target, origin } => Some((target.as_str(), origin.as_deref())),
            _ => None,
        })?;
        if context.bind_as_excluded {
            sink.push(
                path,
                Some(AttributeKind::BindAs),
                failure_class::BIND_AS_PROTOCOL_OR_MODEL,
                "bindAs is not supported inside protocol or model interfaces",
            );
            return None;
        }
        let Some(native) = native else {
            sink.push(
                path,
                Some(AttributeKind::BindAs),
                failure_class::BIND_AS_UNSUPPORTED_EXCHANGE,
                "element has no native type to convert from",
            );
            return None;
        };
        project_bind_as(target, origin, native, &self.catalog)
            .map_err(|(class, reason)| sink.push(path, Some(AttributeKind::BindAs), class, reason))
            .ok()
    }
}

/// Attachment point, multiplicity, exclusive-group and payload checks.
fn check_attachment(path: &ElementPath, attributes: &[Attribute], sink: &mut ViolationSink) {
    let mut counts: BTreeMap<AttributeKind, usize> = BTreeMap::new();
    let mut groups: BTreeMap<ExclusiveGroup, BTreeSet<AttributeKind>> = BTreeMap::new();

    for attribute in attributes {
        let kind = attribute.kind();
        let spec = attribute_spec(kind);
        if !spec.allows(path.kind) {
            let allowed: Vec<&str> = spec.targets.iter().map(|target| target.as_str()).collect();
            sink.push(
                path,
                Some(kind),
                failure_class::ATTACHMENT_DISALLOWED,
                format!(
                    "`{kind}` may only be attached to {}, not to a {}",
                    allowed.join(", "),
                    path.kind
                ),
            );
        }
        *counts.entry(kind).or_default() += 1;
        if let Some(group) = spec.exclusive_group {
            groups.entry(group).or_default().insert(kind);
        }
        if let Some(field) = empty_payload(attribute) {
            sink.push(
                path,
                Some(kind),
                failure_class::EMPTY_PAYLOAD,
                format!("`{kind}` requires a non-empty `{field}`"),
            );
        }
    }

    for (kind, count) in counts {
        if count > 1 && !attribute_spec(kind).repeatable {
            sink.push(
                path,
                Some(kind),
                failure_class::DUPLICATE_ATTRIBUTE,
                format!("`{kind}` appears {count} times but is not repeatable"),
            );
        }
    }

    for (group, kinds) in groups {
        if kinds.len() > 1 {
            let rendered: Vec<&str> = kinds.iter().map(|kind| kind.as_str()).collect();
            sink.push(
                path,
                kinds.iter().next_back().copied(),
                failure_class::EXCLUSIVE_CONFLICT,
                format!(
                    "at most one {group:?} directive may apply, found: {}",
                    rendered.join(", ")
                ),
            );
        }
    }
}

fn empty_payload(attribute: &Attribute) -> Option<&'static str> {
    let (field, value) = match attribute {
        Attribute::BaseType { base, .. } => ("base", base),
        Attribute::Export { selector } => ("selector", selector),
        Attribute::BindAs { target, .. } => ("target", target),
        Attribute::EventArgs { name, .. } => ("name", name),
        Attribute::DelegateName { name } => ("name", name),
        Attribute::StrongDictionary { key_container, .. } => ("keyContainer", key_container),
        _ => return None,
    };
    value.trim().is_empty().then_some(field)
}

fn default_ctor(attributes: &[Attribute]) -> DefaultCtor {
    attributes
        .iter()
        .find_map(|attr| match attr {
            Attribute::DisableDefaultCtor => Some(DefaultCtor::Omit),
            Attribute::PrivateDefaultCtor => Some(DefaultCtor::Emit {
                visibility: Visibility::Private,
            }),
            Attribute::DefaultCtorVisibility { visibility } => Some(DefaultCtor::Emit {
                visibility: *visibility,
            }),
            _ => None,
        })
        .unwrap_or_default()
}

fn member_visibility(attributes: &[Attribute]) -> Visibility {
    attributes
        .iter()
        .find_map(|attr| match attr {
            Attribute::Internal => Some(Visibility::Internal),
            Attribute::Protected => Some(Visibility::Protected),
            _ => None,
        })
        .unwrap_or_default()
}

fn string_marshalling(
    path: &ElementPath,
    attributes: &[Attribute],
    type_ref: Option<&TypeRef>,
    zero_copy: bool,
    sink: &mut ViolationSink,
) -> Option<StringMarshalling> {
    let is_string = type_ref.is_some_and(TypeRef::is_string);
    let plain = has_attr(attributes, AttributeKind::PlainString);
    if plain && !is_string {
        sink.push(
            path,
            Some(AttributeKind::PlainString),
            failure_class::PLAIN_STRING_NON_STRING,
            "plainString applies only to string-typed elements",
        );
        return None;
    }
    match (is_string, plain) {
        (true, true) => Some(StringMarshalling::Plain),
        (true, false) => Some(StringMarshalling::Native { zero_copy }),
        _ => None,
    }
}
