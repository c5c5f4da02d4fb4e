//! # Bindmeta Schema
//!
//! The attribute schema registry for binding declarations.
//!
//! A binding generator reads interface declarations decorated with schema
//! attributes and emits binding code. This crate owns the declarative
//! contract between the two: which attributes exist, where they may be
//! attached, how often, and what each one resolves to.
//!
//! ## Architecture
//!
//! ```text
//! Attribute / AttributeKind   ← vocabulary (tagged variants)
//!     │
//! registry                    ← attachment points, multiplicity, exclusive groups
//!     │
//! DeclarationSet              ← interfaces → members → parameters / return value
//!     │
//! resolve_set                 ← one pass: SchemaViolation batch + ResolvedDeclaration
//!     ├── ownership           (pluggable default policy)
//!     ├── bind_as             (exchange type → managed target)
//!     ├── async_projection    (callback → awaitable)
//!     ├── dictionary          (StrongDictionary key resolution)
//!     └── snippet             (opaque text by insertion point)
//! ```
//!
//! Everything here is a pure read over immutable input; a generator may run
//! independent declaration sets on separate threads without locking.

pub mod async_projection;
pub mod attribute;
pub mod bind_as;
pub mod declaration;
pub mod dictionary;
pub mod error;
pub mod managed_type;
pub mod ownership;
pub mod registry;
pub mod resolve;
pub mod snippet;
pub mod violation;

pub use async_projection::{AsyncMode, AsyncProjection, AsyncResult, CallbackShape};
pub use attribute::{Attribute, AttributeKind, ElementKind, Visibility};
pub use bind_as::{BindAsProjection, ExchangeType};
pub use declaration::{
    BindingDeclaration, CallbackParameter, CallbackSignature, DeclarationSet, MemberDeclaration,
    MemberKind, ParameterDeclaration, ReturnDeclaration, TypeRef,
};
pub use dictionary::{DictionaryKey, DictionaryProjection, KeySource, resolve_key};
pub use error::SchemaError;
pub use managed_type::{ManagedType, TypeCatalog};
pub use ownership::{BorrowedByDefault, Ownership, OwnershipPolicy};
pub use registry::{
    AttributeCategory, AttributeSpec, ExclusiveGroup, attribute_schema, attribute_schema_json,
    attribute_spec, schema_digest,
};
pub use resolve::{
    DefaultCtor, ResolvedDeclaration, ResolvedMember, ResolvedParameter, Resolution,
    StringMarshalling, resolve_set, validate_set,
};
pub use snippet::{InsertionPoint, SnippetSet};
pub use violation::{SchemaViolation, ValidationReport, failure_class};
