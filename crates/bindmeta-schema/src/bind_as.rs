//! BindAs: projecting a native exchange value to a more specific managed type.

use crate::declaration::TypeRef;
use crate::managed_type::{ManagedType, TypeCatalog};
use crate::violation::failure_class;
use serde::{Deserialize, Serialize};

/// The native wrapper a BindAs value travels in across the boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExchangeType {
    /// `NSNumber`
    BoxedNumber,
    /// `NSValue`
    OpaqueValue,
    /// `NSString` backing a smart enum.
    StringBackedEnum,
}

impl ExchangeType {
    pub fn from_native(name: &str) -> Option<Self> {
        match name {
            "NSNumber" => Some(Self::BoxedNumber),
            "NSValue" => Some(Self::OpaqueValue),
            "NSString" => Some(Self::StringBackedEnum),
            _ => None,
        }
    }

    pub fn native_name(self) -> &'static str {
        match self {
            Self::BoxedNumber => "NSNumber",
            Self::OpaqueValue => "NSValue",
            Self::StringBackedEnum => "NSString",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BindAsProjection {
    pub target: ManagedType,
    pub exchange: ExchangeType,
    pub is_nullable: bool,
    pub is_value_type: bool,
    pub is_array: bool,
    /// Conversion applied to each element (arrays) or to the value itself.
    pub element: ManagedType,
}

impl BindAsProjection {
    pub fn new(target: ManagedType, exchange: ExchangeType) -> Self {
        let element = match &target {
            ManagedType::Array { element } => (**element).clone(),
            other => other.clone(),
        };
        Self {
            is_nullable: target.is_nullable(),
            is_value_type: target.is_value_type(),
            is_array: target.is_array(),
            element,
            target,
            exchange,
        }
    }
}

/// Checks a BindAs attribute against the native type it decorates.
///
/// `origin` overrides the declared native type name when present.
pub fn project_bind_as(
    target: &str,
    origin: Option<&str>,
    native: &TypeRef,
    catalog: &TypeCatalog,
) -> Result<BindAsProjection, (&'static str, String)> {
    let target_type = catalog
        .parse(target)
        .map_err(|reason| (failure_class::BIND_AS_INVALID_TARGET, reason))?;

    let native_name = origin.unwrap_or(native.name.as_str());
    let Some(exchange) = ExchangeType::from_native(native_name) else {
        return Err((
            failure_class::BIND_AS_UNSUPPORTED_EXCHANGE,
            format!("`{native_name}` is not an exchange type (NSNumber, NSValue, NSString)"),
        ));
    };

    if native.array != target_type.is_array() {
        return Err((
            failure_class::BIND_AS_SHAPE_MISMATCH,
            format!(
                "native `{native_name}{}` and target `{target_type}` disagree on array shape",
                if native.array { "[]" } else { "" }
            ),
        ));
    }

    let projection = BindAsProjection::new(target_type, exchange);
    if !projection.element.is_value_type() {
        return Err((
            failure_class::BIND_AS_INVALID_TARGET,
            format!(
                "target `{}` must be a value type to convert from {}",
                projection.element,
                exchange.native_name()
            ),
        ));
    }
    Ok(projection)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn native(name: &str, array: bool) -> TypeRef {
        TypeRef {
            array,
            ..TypeRef::named(name)
        }
    }

    #[test]
    fn nullable_value_type_reports_flags() {
        let catalog = TypeCatalog::default();
        let projection =
            project_bind_as("int?", None, &native("NSNumber", false), &catalog).unwrap();
        assert!(projection.is_nullable);
        assert!(projection.is_value_type);
        assert!(!projection.is_array);
        assert_eq!(projection.exchange, ExchangeType::BoxedNumber);
    }

    #[test]
    fn reference_type_target_is_not_nullable() {
        let catalog = TypeCatalog::default();
        let target = catalog.parse("NSObject").unwrap();
        let projection = BindAsProjection::new(target, ExchangeType::OpaqueValue);
        assert!(!projection.is_nullable);
        assert!(!projection.is_value_type);
    }

    #[test]
    fn arrays_convert_every_element() {
        let catalog = TypeCatalog::new(["AVFileType"]);
        let projection =
            project_bind_as("AVFileType[]", None, &native("NSString", true), &catalog).unwrap();
        assert!(projection.is_array);
        assert_eq!(projection.exchange, ExchangeType::StringBackedEnum);
        assert_eq!(projection.element.to_string(), "AVFileType");
    }

    #[test]
    fn rejects_shape_mismatch_and_non_exchange_types() {
        let catalog = TypeCatalog::default();
        let (class, _) =
            project_bind_as("CGRect[]", None, &native("NSValue", false), &catalog).unwrap_err();
        assert_eq!(class, failure_class::BIND_AS_SHAPE_MISMATCH);

        let (class, _) =
            project_bind_as("CGRect", None, &native("NSData", false), &catalog).unwrap_err();
        assert_eq!(class, failure_class::BIND_AS_UNSUPPORTED_EXCHANGE);

        let (class, _) =
            project_bind_as("NSObject", None, &native("NSValue", false), &catalog).unwrap_err();
        assert_eq!(class, failure_class::BIND_AS_INVALID_TARGET);
    }

    #[test]
    fn origin_overrides_declared_native_type() {
        let catalog = TypeCatalog::default();
        let projection = project_bind_as(
            "double",
            Some("NSNumber"),
            &native("NSObject", false),
            &catalog,
        )
        .unwrap();
        assert_eq!(projection.exchange, ExchangeType::BoxedNumber);
    }
}
