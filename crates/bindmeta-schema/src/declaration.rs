//! Binding declarations: the annotated interface descriptions a generator reads.

use crate::attribute::{Attribute, ElementKind};
use crate::error::SchemaError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Native type name used for error callback parameters.
pub const NATIVE_ERROR_TYPE: &str = "NSError";
/// Managed string type name.
pub const MANAGED_STRING_TYPE: &str = "string";

/// The unit a single generation run consumes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationSet {
    /// Additional managed value types (structs, enums) known to the binding.
    #[serde(default)]
    pub value_types: Vec<String>,
    #[serde(default)]
    pub declarations: Vec<BindingDeclaration>,
}

impl DeclarationSet {
    pub fn from_json_str(text: &str, origin: &str) -> Result<Self, SchemaError> {
        serde_json::from_str(text).map_err(|source| SchemaError::ParseJson {
            path: origin.to_string(),
            source,
        })
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&text, &path.display().to_string())
    }

    pub fn declaration(&self, name: &str) -> Option<&BindingDeclaration> {
        self.declarations.iter().find(|decl| decl.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct BindingDeclaration {
    pub name: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    #[serde(default)]
    pub members: Vec<MemberDeclaration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Method,
    Property,
    Field,
}

impl MemberKind {
    pub fn element_kind(self) -> ElementKind {
        match self {
            Self::Method => ElementKind::Method,
            Self::Property => ElementKind::Property,
            Self::Field => ElementKind::Field,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct MemberDeclaration {
    pub name: String,
    pub kind: MemberKind,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Value type of a property or field.
    #[serde(rename = "type")]
    pub type_ref: Option<TypeRef>,
    #[serde(default)]
    pub parameters: Vec<ParameterDeclaration>,
    /// Absent for `void` methods.
    pub return_value: Option<ReturnDeclaration>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDeclaration {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ReturnDeclaration {
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// A reference to a native-side type as written in the declaration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TypeRef {
    pub name: String,
    #[serde(default)]
    pub nullable: bool,
    #[serde(default)]
    pub array: bool,
    /// Present when the type is a block/callback.
    pub callback: Option<CallbackSignature>,
}

impl TypeRef {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nullable: false,
            array: false,
            callback: None,
        }
    }

    pub fn is_error(&self) -> bool {
        !self.array && self.name == NATIVE_ERROR_TYPE
    }

    pub fn is_string(&self) -> bool {
        !self.array && self.name == MANAGED_STRING_TYPE
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CallbackSignature {
    #[serde(default)]
    pub parameters: Vec<CallbackParameter>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CallbackParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub type_ref: TypeRef,
}
