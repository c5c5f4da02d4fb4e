//! The attribute vocabulary.
//!
//! An [`Attribute`] is a `(kind, parameters)` pair attached to one element of
//! a binding declaration. Attributes carry no behavior of their own; the
//! [`registry`](crate::registry) says where each kind may appear and the
//! [`resolve`](crate::resolve) pass interprets them.

use serde::{Deserialize, Serialize};

/// The kind of declaration element an attribute is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Interface,
    Method,
    Property,
    Field,
    Parameter,
    ReturnValue,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Interface => "interface",
            Self::Method => "method",
            Self::Property => "property",
            Self::Field => "field",
            Self::Parameter => "parameter",
            Self::ReturnValue => "return_value",
        }
    }
}

impl std::fmt::Display for ElementKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Emitted access level of a generated member or constructor.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    #[default]
    Public,
    Protected,
    Internal,
    Private,
}

impl std::fmt::Display for Visibility {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Public => write!(f, "public"),
            Self::Protected => write!(f, "protected"),
            Self::Internal => write!(f, "internal"),
            Self::Private => write!(f, "private"),
        }
    }
}

/// A schema attribute with its parameters.
///
/// Serialized internally tagged by `kind`, e.g.
/// `{"kind": "forcedType", "owns": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Attribute {
    // Type shape
    BaseType {
        base: String,
        name: Option<String>,
        #[serde(default)]
        events: Vec<String>,
        #[serde(default)]
        delegates: Vec<String>,
        #[serde(default)]
        singleton: bool,
    },
    Category {
        #[serde(default)]
        all_static: bool,
    },
    Protocolize {
        #[serde(default = "default_protocolize_version")]
        version: u32,
    },
    Protocol {
        name: Option<String>,
        #[serde(default)]
        is_informal: bool,
    },
    Model,
    Abstract,
    Static,
    Export {
        selector: String,
    },

    // Ownership
    Retain {
        wrap_name: Option<String>,
    },
    Release,
    Factory,
    ForcedType {
        #[serde(default)]
        owns: bool,
    },

    // Marshalling
    PlainString,
    DisableZeroCopy,
    BindAs {
        target: String,
        origin: Option<String>,
    },

    // Visibility
    Internal,
    Protected,
    DefaultCtorVisibility {
        visibility: Visibility,
    },
    PrivateDefaultCtor,
    DisableDefaultCtor,

    // Code injection
    Prologue {
        code: String,
    },
    Pre {
        code: String,
    },
    Post {
        code: String,
    },
    Dispose {
        code: String,
    },

    // Async transformation
    Async {
        result_type: Option<String>,
        method_name: Option<String>,
        result_type_name: Option<String>,
    },

    // Notification / event shaping
    Notification {
        event_args: Option<String>,
        notification_center: Option<String>,
    },
    EventArgs {
        name: String,
        #[serde(default)]
        skip_generation: bool,
    },
    DelegateName {
        name: String,
    },

    // Dictionary-backed wrapper
    StrongDictionary {
        key_container: String,
        suffix: Option<String>,
    },
}

fn default_protocolize_version() -> u32 {
    2
}

impl Attribute {
    pub fn kind(&self) -> AttributeKind {
        match self {
            Self::BaseType { .. } => AttributeKind::BaseType,
            Self::Category { .. } => AttributeKind::Category,
            Self::Protocolize { .. } => AttributeKind::Protocolize,
            Self::Protocol { .. } => AttributeKind::Protocol,
            Self::Model => AttributeKind::Model,
            Self::Abstract => AttributeKind::Abstract,
            Self::Static => AttributeKind::Static,
            Self::Export { .. } => AttributeKind::Export,
            Self::Retain { .. } => AttributeKind::Retain,
            Self::Release => AttributeKind::Release,
            Self::Factory => AttributeKind::Factory,
            Self::ForcedType { .. } => AttributeKind::ForcedType,
            Self::PlainString => AttributeKind::PlainString,
            Self::DisableZeroCopy => AttributeKind::DisableZeroCopy,
            Self::BindAs { .. } => AttributeKind::BindAs,
            Self::Internal => AttributeKind::Internal,
            Self::Protected => AttributeKind::Protected,
            Self::DefaultCtorVisibility { .. } => AttributeKind::DefaultCtorVisibility,
            Self::PrivateDefaultCtor => AttributeKind::PrivateDefaultCtor,
            Self::DisableDefaultCtor => AttributeKind::DisableDefaultCtor,
            Self::Prologue { .. } => AttributeKind::Prologue,
            Self::Pre { .. } => AttributeKind::Pre,
            Self::Post { .. } => AttributeKind::Post,
            Self::Dispose { .. } => AttributeKind::Dispose,
            Self::Async { .. } => AttributeKind::Async,
            Self::Notification { .. } => AttributeKind::Notification,
            Self::EventArgs { .. } => AttributeKind::EventArgs,
            Self::DelegateName { .. } => AttributeKind::DelegateName,
            Self::StrongDictionary { .. } => AttributeKind::StrongDictionary,
        }
    }
}

/// Parameterless mirror of [`Attribute`], used as a key into the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AttributeKind {
    BaseType,
    Category,
    Protocolize,
    Protocol,
    Model,
    Abstract,
    Static,
    Export,
    Retain,
    Release,
    Factory,
    ForcedType,
    PlainString,
    DisableZeroCopy,
    BindAs,
    Internal,
    Protected,
    DefaultCtorVisibility,
    PrivateDefaultCtor,
    DisableDefaultCtor,
    Prologue,
    Pre,
    Post,
    Dispose,
    Async,
    Notification,
    EventArgs,
    DelegateName,
    StrongDictionary,
}

impl AttributeKind {
    pub const ALL: &'static [AttributeKind] = &[
        Self::BaseType,
        Self::Category,
        Self::Protocolize,
        Self::Protocol,
        Self::Model,
        Self::Abstract,
        Self::Static,
        Self::Export,
        Self::Retain,
        Self::Release,
        Self::Factory,
        Self::ForcedType,
        Self::PlainString,
        Self::DisableZeroCopy,
        Self::BindAs,
        Self::Internal,
        Self::Protected,
        Self::DefaultCtorVisibility,
        Self::PrivateDefaultCtor,
        Self::DisableDefaultCtor,
        Self::Prologue,
        Self::Pre,
        Self::Post,
        Self::Dispose,
        Self::Async,
        Self::Notification,
        Self::EventArgs,
        Self::DelegateName,
        Self::StrongDictionary,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::BaseType => "baseType",
            Self::Category => "category",
            Self::Protocolize => "protocolize",
            Self::Protocol => "protocol",
            Self::Model => "model",
            Self::Abstract => "abstract",
            Self::Static => "static",
            Self::Export => "export",
            Self::Retain => "retain",
            Self::Release => "release",
            Self::Factory => "factory",
            Self::ForcedType => "forcedType",
            Self::PlainString => "plainString",
            Self::DisableZeroCopy => "disableZeroCopy",
            Self::BindAs => "bindAs",
            Self::Internal => "internal",
            Self::Protected => "protected",
            Self::DefaultCtorVisibility => "defaultCtorVisibility",
            Self::PrivateDefaultCtor => "privateDefaultCtor",
            Self::DisableDefaultCtor => "disableDefaultCtor",
            Self::Prologue => "prologue",
            Self::Pre => "pre",
            Self::Post => "post",
            Self::Dispose => "dispose",
            Self::Async => "async",
            Self::Notification => "notification",
            Self::EventArgs => "eventArgs",
            Self::DelegateName => "delegateName",
            Self::StrongDictionary => "strongDictionary",
        }
    }
}

impl std::fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

pub(crate) fn has_attr(attributes: &[Attribute], kind: AttributeKind) -> bool {
    attributes.iter().any(|attr| attr.kind() == kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn attributes_deserialize_from_kind_tag() {
        let forced: Attribute =
            serde_json::from_value(json!({"kind": "forcedType", "owns": true})).unwrap();
        assert_eq!(forced, Attribute::ForcedType { owns: true });

        let borrowed: Attribute = serde_json::from_value(json!({"kind": "forcedType"})).unwrap();
        assert_eq!(borrowed, Attribute::ForcedType { owns: false });

        let dict: Attribute = serde_json::from_value(
            json!({"kind": "strongDictionary", "keyContainer": "FooKeys"}),
        )
        .unwrap();
        assert_eq!(
            dict,
            Attribute::StrongDictionary {
                key_container: "FooKeys".to_string(),
                suffix: None,
            }
        );

        let model: Attribute = serde_json::from_value(json!({"kind": "model"})).unwrap();
        assert_eq!(model.kind(), AttributeKind::Model);
    }

    #[test]
    fn kind_names_match_serde_tags() {
        for kind in AttributeKind::ALL {
            let rendered = serde_json::to_value(kind).unwrap();
            assert_eq!(rendered.as_str(), Some(kind.as_str()));
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let result: Result<Attribute, _> = serde_json::from_value(json!({"kind": "sealed"}));
        assert!(result.is_err());
    }
}
